/*! Transducer storage.

Two concrete variants share the same trait surface: [`VectorFst`] grows and
shrinks freely and is what builders and graph operations produce;
[`ConstFst`] is the frozen result of loading a persisted model; its state
and arc counts are fixed at construction and only arc *contents* may change.
The split is a capability split, not a hierarchy: `ConstFst` implements the
mutation trait too, failing fast with [`FstError::Frozen`] on anything that
would change the machine's shape.
*/

mod arc;
mod const_fst;
pub mod io;
mod text;
mod vector;

pub use self::arc::Arc;
pub use self::const_fst::ConstFst;
pub use self::text::text;
pub use self::vector::VectorFst;

use thiserror::Error;

use crate::semiring::Semiring;
use crate::symbols::SymbolTable;
use crate::types::StateId;

#[derive(Debug, Error)]
pub enum FstError {
    /// A shape-changing operation was invoked on a frozen fst.
    #[error("operation requires a growable fst, but this fst is frozen")]
    Frozen,

    #[error("state {0} is out of bounds")]
    NoSuchState(StateId),

    /// The start state may never be deleted.
    #[error("the start state cannot be deleted")]
    DeleteStart,

    /// A frozen state's arc slots (including the single reserved
    /// augmentation slot) are all occupied.
    #[error("state {state} has no free arc slot")]
    ArcCapacity { state: StateId },
}

/// Read access to a transducer.
pub trait Fst<W: Semiring> {
    fn start(&self) -> Option<StateId>;

    fn num_states(&self) -> usize;

    fn num_arcs(&self, state: StateId) -> usize;

    /// The weight of accepting at `state`; `W::zero()` means non-accepting.
    fn final_weight(&self, state: StateId) -> W;

    #[inline(always)]
    fn is_final(&self, state: StateId) -> bool {
        self.final_weight(state) != W::zero()
    }

    fn arcs(&self, state: StateId) -> &[Arc<W>];

    fn input_symbols(&self) -> &SymbolTable;

    fn output_symbols(&self) -> &SymbolTable;
}

/// Write access to a transducer. Implemented by both storage variants;
/// methods that would change a frozen machine's shape return
/// [`FstError::Frozen`] there.
pub trait MutableFst<W: Semiring>: Fst<W> {
    fn set_start(&mut self, state: StateId);

    fn set_final(&mut self, state: StateId, weight: W);

    fn add_state(&mut self) -> Result<StateId, FstError>;

    /// Append an arc to `state`. On the frozen variant this fills the one
    /// reserved trailing slot and fails once that is occupied.
    fn add_arc(&mut self, state: StateId, arc: Arc<W>) -> Result<(), FstError>;

    fn arcs_mut(&mut self, state: StateId) -> &mut [Arc<W>];

    /// Remove `state` and every arc targeting it, then renumber.
    fn delete_state(&mut self, state: StateId) -> Result<(), FstError>;

    /// Batch form of [`delete_state`](MutableFst::delete_state): remove all
    /// listed states and every arc targeting any of them, then renumber the
    /// survivors contiguously.
    fn delete_states(&mut self, states: &[StateId]) -> Result<(), FstError>;

    fn set_input_symbols(&mut self, symbols: SymbolTable);

    fn set_output_symbols(&mut self, symbols: SymbolTable);
}
