use log::debug;

use crate::fst::{Fst, MutableFst, VectorFst};
use crate::semiring::Semiring;
use crate::types::StateId;

/// States reachable from `start` by a forward depth-first walk.
fn accessible<W: Semiring, F: Fst<W>>(fst: &F, start: StateId) -> Vec<bool> {
    let mut seen = vec![false; fst.num_states()];
    let mut stack = vec![start];
    seen[start as usize] = true;
    while let Some(state) = stack.pop() {
        for arc in fst.arcs(state) {
            if !seen[arc.nextstate as usize] {
                seen[arc.nextstate as usize] = true;
                stack.push(arc.nextstate);
            }
        }
    }
    seen
}

/// States that can reach a final state, by a depth-first walk of the
/// reversed adjacency seeded with every final state.
fn coaccessible<W: Semiring, F: Fst<W>>(fst: &F) -> Vec<bool> {
    let mut preds: Vec<Vec<StateId>> = vec![vec![]; fst.num_states()];
    for state in 0..fst.num_states() as StateId {
        for arc in fst.arcs(state) {
            preds[arc.nextstate as usize].push(state);
        }
    }
    let mut seen = vec![false; fst.num_states()];
    let mut stack = vec![];
    for state in 0..fst.num_states() as StateId {
        if fst.is_final(state) && !seen[state as usize] {
            seen[state as usize] = true;
            stack.push(state);
        }
    }
    while let Some(state) = stack.pop() {
        for &pred in &preds[state as usize] {
            if !seen[pred as usize] {
                seen[pred as usize] = true;
                stack.push(pred);
            }
        }
    }
    seen
}

/// Trim a machine: produce a new fst without the states that are neither
/// accessible from the start nor able to reach a final state. The set of
/// weighted start-to-final paths is preserved exactly, survivors are
/// renumbered contiguously, and the start state always survives (it is
/// accessible by definition).
pub fn connect<W: Semiring, F: Fst<W>>(fst: &F) -> VectorFst<W> {
    let mut out = VectorFst::from_fst(fst);
    let start = match out.start() {
        Some(start) => start,
        None => {
            debug!("connect: no start state, nothing to trim");
            return out;
        }
    };

    let accessible = accessible(&out, start);
    let coaccessible = coaccessible(&out);
    let dead: Vec<StateId> = (0..out.num_states() as StateId)
        .filter(|&s| !accessible[s as usize] && !coaccessible[s as usize])
        .collect();

    if !dead.is_empty() {
        debug!("connect: deleting {} of {} states", dead.len(), out.num_states());
        out.delete_states(&dead)
            .expect("dead set never contains the start state");
    }
    out
}
