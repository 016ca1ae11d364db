/*! Transducer composition.

[`compose`] is the epsilon-free construction: a breadth-first walk over
pairs of source states, memoized so every reachable pair maps to exactly
one output state. [`compose_filtered`] wraps it with the classical 3-state
epsilon filter: both inputs are rewritten by [`augment`] so that true
epsilon labels become one of two sentinel ids and every state gains a
single sentinel self-loop, then a filter machine between the two forbids
the double-epsilon interleavings that would otherwise duplicate paths.
*/

use hashbrown::HashMap;
use log::{debug, warn};
use std::collections::VecDeque;

use crate::constants::EPSILON;
use crate::fst::{Arc, Fst, FstError, MutableFst, VectorFst};
use crate::semiring::Semiring;
use crate::symbols::SymbolTable;
use crate::types::{Label, StateId};

const EPS1_SYMBOL: &str = "<eps1>";
const EPS2_SYMBOL: &str = "<eps2>";

/// Which label side of a machine an augmentation rewrites: `Input` for the
/// right-hand machine of a composition, `Output` for the left-hand one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpsSide {
    Input,
    Output,
}

fn pair_state<W, A, B>(
    a: &A,
    b: &B,
    out: &mut VectorFst<W>,
    memo: &mut HashMap<(StateId, StateId), StateId>,
    queue: &mut VecDeque<(StateId, StateId)>,
    pair: (StateId, StateId),
) -> StateId
where
    W: Semiring,
    A: Fst<W>,
    B: Fst<W>,
{
    if let Some(&id) = memo.get(&pair) {
        return id;
    }
    let id = out
        .add_state()
        .expect("growable fst never refuses add_state");
    out.set_final(id, a.final_weight(pair.0).times(b.final_weight(pair.1)));
    memo.insert(pair, id);
    queue.push_back(pair);
    id
}

/// Epsilon-free composition. `C` accepts `(x, z)` iff some `y` exists with
/// `a` accepting `(x, y)` and `b` accepting `(y, z)`; matched arc pairs
/// multiply their weights with `times`.
///
/// With `sorted = true` the inner arc scan stops as soon as
/// `a1.olabel < a2.ilabel`, which is only valid when `a`'s arcs are sorted
/// by output label and `b`'s by input label (see
/// [`arc_sort`](crate::ops::arc_sort)).
///
/// Returns `None` when `a`'s output symbol table and `b`'s input symbol
/// table are not identical, or when either machine has no start state.
pub fn compose<W, A, B>(a: &A, b: &B, sorted: bool) -> Option<VectorFst<W>>
where
    W: Semiring,
    A: Fst<W>,
    B: Fst<W>,
{
    if a.output_symbols() != b.input_symbols() {
        warn!("compose: output/input symbol tables do not agree, refusing");
        return None;
    }
    let (astart, bstart) = match (a.start(), b.start()) {
        (Some(astart), Some(bstart)) => (astart, bstart),
        _ => {
            debug!("compose: an input has no start state");
            return None;
        }
    };

    let mut out = VectorFst::new();
    out.set_input_symbols(a.input_symbols().clone());
    out.set_output_symbols(b.output_symbols().clone());

    let mut memo: HashMap<(StateId, StateId), StateId> = HashMap::new();
    let mut queue: VecDeque<(StateId, StateId)> = VecDeque::new();

    let start = pair_state(a, b, &mut out, &mut memo, &mut queue, (astart, bstart));
    out.set_start(start);

    while let Some((s1, s2)) = queue.pop_front() {
        let src = memo[&(s1, s2)];
        for a1 in a.arcs(s1) {
            for a2 in b.arcs(s2) {
                if sorted && a1.olabel < a2.ilabel {
                    break;
                }
                if a1.olabel == a2.ilabel {
                    let dest = pair_state(
                        a,
                        b,
                        &mut out,
                        &mut memo,
                        &mut queue,
                        (a1.nextstate, a2.nextstate),
                    );
                    out.add_arc(
                        src,
                        Arc::new(
                            a1.ilabel,
                            a2.olabel,
                            a1.weight.times(a2.weight),
                            dest,
                        ),
                    )
                    .expect("growable fst never refuses arcs");
                }
            }
        }
    }

    debug!(
        "compose: {} x {} states -> {} pair states",
        a.num_states(),
        b.num_states(),
        out.num_states()
    );
    Some(out)
}

/// Rewrite a machine for filtered composition: every true epsilon label on
/// the chosen side becomes a sentinel id just past the affected symbol
/// table, and every state gains one self-loop carrying the other sentinel.
///
/// This mutates the machine in place. On the frozen variant the self-loop
/// lands in the reserved trailing arc slot and the call fails once that
/// slot is taken, so a machine cannot be augmented twice.
pub fn augment<W: Semiring, F: MutableFst<W>>(side: EpsSide, fst: &mut F) -> Result<(), FstError> {
    let base = match side {
        EpsSide::Input => fst.input_symbols().len(),
        EpsSide::Output => fst.output_symbols().len(),
    } as Label;
    let (e1, e2) = (base, base + 1);

    for state in 0..fst.num_states() as StateId {
        for arc in fst.arcs_mut(state) {
            match side {
                EpsSide::Output => {
                    if arc.olabel == EPSILON {
                        arc.olabel = e2;
                    }
                }
                EpsSide::Input => {
                    if arc.ilabel == EPSILON {
                        arc.ilabel = e1;
                    }
                }
            }
        }
        let self_loop = match side {
            EpsSide::Output => Arc::new(EPSILON, e1, W::one(), state),
            EpsSide::Input => Arc::new(e2, EPSILON, W::one(), state),
        };
        fst.add_arc(state, self_loop)?;
    }

    match side {
        EpsSide::Input => {
            let mut table = fst.input_symbols().clone();
            table.add_symbol(EPS1_SYMBOL);
            table.add_symbol(EPS2_SYMBOL);
            fst.set_input_symbols(table);
        }
        EpsSide::Output => {
            let mut table = fst.output_symbols().clone();
            table.add_symbol(EPS1_SYMBOL);
            table.add_symbol(EPS2_SYMBOL);
            fst.set_output_symbols(table);
        }
    }
    Ok(())
}

/// The 3-state epsilon filter over `syms` plus the two sentinels. State 0
/// loops on every real symbol and on the paired sentinel move; states 1
/// and 2 remember that one side has just idled and only allow that same
/// side to idle again until a real symbol passes through.
fn epsilon_filter<W: Semiring>(syms: &SymbolTable) -> VectorFst<W> {
    let base = syms.len() as Label;
    let (e1, e2) = (base, base + 1);
    let mut table = syms.clone();
    table.add_symbol(EPS1_SYMBOL);
    table.add_symbol(EPS2_SYMBOL);

    let mut filter = VectorFst::new();
    let s0 = filter.add_state().expect("growable fst never refuses add_state");
    let s1 = filter.add_state().expect("growable fst never refuses add_state");
    let s2 = filter.add_state().expect("growable fst never refuses add_state");
    filter.set_start(s0);
    for state in [s0, s1, s2] {
        filter.set_final(state, W::one());
    }

    let one = W::one();
    let add = |filter: &mut VectorFst<W>, src, i, o, dst| {
        filter
            .add_arc(src, Arc::new(i, o, one, dst))
            .expect("growable fst never refuses arcs");
    };

    add(&mut filter, s0, e2, e1, s0);
    add(&mut filter, s0, e1, e1, s1);
    add(&mut filter, s0, e2, e2, s2);
    add(&mut filter, s1, e1, e1, s1);
    add(&mut filter, s2, e2, e2, s2);
    for label in 1..base {
        add(&mut filter, s0, label, label, s0);
        add(&mut filter, s1, label, label, s0);
        add(&mut filter, s2, label, label, s0);
    }

    filter.set_input_symbols(table.clone());
    filter.set_output_symbols(table);
    filter
}

/// Epsilon-correct composition: augment both inputs, slide the filter in
/// between, and compose twice. The inputs themselves are left untouched;
/// the augmentations run on working copies.
///
/// Returns `None` under the same preconditions as [`compose`].
pub fn compose_filtered<W, A, B>(a: &A, b: &B) -> Option<VectorFst<W>>
where
    W: Semiring,
    A: Fst<W>,
    B: Fst<W>,
{
    if a.output_symbols() != b.input_symbols() {
        warn!("compose: output/input symbol tables do not agree, refusing");
        return None;
    }
    let filter = epsilon_filter::<W>(a.output_symbols());

    let mut left = VectorFst::from_fst(a);
    let mut right = VectorFst::from_fst(b);
    augment(EpsSide::Output, &mut left).expect("growable fst never refuses arcs");
    augment(EpsSide::Input, &mut right).expect("growable fst never refuses arcs");

    let half = compose(&left, &filter, false)?;
    compose(&half, &right, false)
}
