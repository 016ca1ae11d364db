/*! Weighted finite-state transducers for speech decoding graphs.

Implements the transducer data model used to represent grammars, lexicons
and recognition lattices, together with the classical operations that
combine and prune them: arc sorting, composition with an epsilon-matching
filter, trimming, projection and n-shortest-paths. Every operation is
parameterized over an abstract [`Semiring`](semiring::Semiring), so the
same graph code serves min-cost search ([`TropicalWeight`]) and
log-probability accumulation ([`LogWeight`]).

Machines come in two storage variants: the growable
[`VectorFst`](fst::VectorFst) that builders produce, and the frozen
[`ConstFst`](fst::ConstFst) that model deserialization produces.

[`TropicalWeight`]: semiring::TropicalWeight
[`LogWeight`]: semiring::LogWeight

# Usage example

```
use latticefst::fst::{Arc, Fst, MutableFst, VectorFst};
use latticefst::ops::n_shortest_paths;
use latticefst::semiring::{Semiring, TropicalWeight};
use latticefst::symbols::SymbolTable;

let syms = SymbolTable::from_symbols(["<eps>", "a"]);
let mut fst = VectorFst::<TropicalWeight>::new();
fst.set_input_symbols(syms.clone());
fst.set_output_symbols(syms);
let s0 = fst.add_state().unwrap();
let s1 = fst.add_state().unwrap();
fst.set_start(s0);
fst.set_final(s1, TropicalWeight::one());
fst.add_arc(s0, Arc::new(1, 1, TropicalWeight(0.5), s1)).unwrap();

let best = n_shortest_paths(&fst, 1).unwrap();
assert_eq!(best.num_states(), 2);
```
*/

pub mod fst;
pub mod ops;
pub mod semiring;
pub mod symbols;

pub(crate) mod constants;
pub(crate) mod types;

pub use crate::constants::EPSILON;
pub use crate::types::{Label, StateId};

#[cfg(test)]
pub(crate) mod test_util;
