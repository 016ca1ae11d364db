use crate::fst::MutableFst;
use crate::semiring::Semiring;
use crate::types::StateId;

/// Which label a sort orders arcs by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    ILabel,
    OLabel,
}

/// Reorder every state's arcs in place by the chosen label. Weights, labels
/// and destinations are untouched; the sort is stable, so arcs sharing a
/// label keep their insertion order.
///
/// Sorting by output label on the left machine and input label on the right
/// is the precondition for [`compose`](crate::ops::compose) with
/// `sorted = true`.
pub fn arc_sort<W: Semiring, F: MutableFst<W>>(fst: &mut F, by: SortBy) {
    for state in 0..fst.num_states() as StateId {
        let arcs = fst.arcs_mut(state);
        match by {
            SortBy::ILabel => arcs.sort_by_key(|arc| arc.ilabel),
            SortBy::OLabel => arcs.sort_by_key(|arc| arc.olabel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::{Arc, Fst, VectorFst};
    use crate::semiring::TropicalWeight;
    use crate::types::Label;

    fn unsorted_fst() -> VectorFst<TropicalWeight> {
        let mut fst = VectorFst::new();
        let s0 = fst.add_state().unwrap();
        let s1 = fst.add_state().unwrap();
        fst.set_start(s0);
        fst.set_final(s1, TropicalWeight::one());
        for (i, o) in [(3, 1), (1, 3), (2, 2), (1, 2)] {
            fst.add_arc(s0, Arc::new(i, o, TropicalWeight(0.0), s1)).unwrap();
        }
        fst
    }

    fn ilabels(fst: &VectorFst<TropicalWeight>) -> Vec<Label> {
        fst.arcs(0).iter().map(|a| a.ilabel).collect()
    }

    #[test]
    fn sorts_by_input_label() {
        let mut fst = unsorted_fst();
        arc_sort(&mut fst, SortBy::ILabel);
        assert_eq!(ilabels(&fst), vec![1, 1, 2, 3]);
        // stable: the (1,3) arc was inserted before (1,2)
        assert_eq!(fst.arcs(0)[0].olabel, 3);
        assert_eq!(fst.arcs(0)[1].olabel, 2);
    }

    #[test]
    fn sorts_by_output_label() {
        let mut fst = unsorted_fst();
        arc_sort(&mut fst, SortBy::OLabel);
        let olabels: Vec<Label> = fst.arcs(0).iter().map(|a| a.olabel).collect();
        assert_eq!(olabels, vec![1, 2, 2, 3]);
    }

    #[test]
    fn sorting_twice_changes_nothing() {
        let mut once = unsorted_fst();
        arc_sort(&mut once, SortBy::ILabel);
        let mut twice = unsorted_fst();
        arc_sort(&mut twice, SortBy::ILabel);
        arc_sort(&mut twice, SortBy::ILabel);
        assert_eq!(once.arcs(0), twice.arcs(0));
    }
}
