//! Small shared helpers for the unit tests.

use crate::constants::EPSILON;
use crate::fst::Fst;
use crate::semiring::Semiring;
use crate::types::{Label, StateId};

const MAX_PATH_ARCS: usize = 16;

/// Every accepted path of `fst` up to [`MAX_PATH_ARCS`] arcs long, as
/// `(input labels, output labels, weight)` with epsilons dropped from the
/// label sequences and the final weight folded into the path weight.
/// Sorted by weight, then labels, so path sets compare deterministically.
pub(crate) fn accepted_paths<W: Semiring, F: Fst<W>>(
    fst: &F,
) -> Vec<(Vec<Label>, Vec<Label>, W)> {
    let mut paths = vec![];
    if let Some(start) = fst.start() {
        walk(fst, start, &mut vec![], &mut vec![], W::one(), &mut paths, 0);
    }
    paths.sort_by(|a, b| {
        a.2.value()
            .partial_cmp(&b.2.value())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
            .then_with(|| a.1.cmp(&b.1))
    });
    paths
}

fn walk<W: Semiring, F: Fst<W>>(
    fst: &F,
    state: StateId,
    ilabels: &mut Vec<Label>,
    olabels: &mut Vec<Label>,
    weight: W,
    paths: &mut Vec<(Vec<Label>, Vec<Label>, W)>,
    depth: usize,
) {
    if fst.is_final(state) {
        paths.push((
            ilabels.clone(),
            olabels.clone(),
            weight.times(fst.final_weight(state)),
        ));
    }
    if depth == MAX_PATH_ARCS {
        return;
    }
    for arc in fst.arcs(state) {
        if arc.ilabel != EPSILON {
            ilabels.push(arc.ilabel);
        }
        if arc.olabel != EPSILON {
            olabels.push(arc.olabel);
        }
        walk(
            fst,
            arc.nextstate,
            ilabels,
            olabels,
            weight.times(arc.weight),
            paths,
            depth + 1,
        );
        if arc.ilabel != EPSILON {
            ilabels.pop();
        }
        if arc.olabel != EPSILON {
            olabels.pop();
        }
    }
}
