use log::debug;

use crate::constants::EPSILON;
use crate::fst::{Arc, Fst, MutableFst, VectorFst};
use crate::semiring::Semiring;
use crate::types::StateId;

/// Normalize a machine so it has exactly one accepting state: a fresh state
/// with final weight `one()` is appended, every previously final state gets
/// an epsilon arc into it carrying its old final weight, and the old final
/// weights are cleared. Path weights are unchanged. Returns the id of the
/// unified final state.
pub fn extend_final<W: Semiring>(fst: &mut VectorFst<W>) -> StateId {
    let finals: Vec<StateId> = (0..fst.num_states() as StateId)
        .filter(|&s| fst.is_final(s))
        .collect();
    let unified = fst
        .add_state()
        .expect("growable fst never refuses add_state");
    fst.set_final(unified, W::one());
    for state in finals {
        let weight = fst.final_weight(state);
        fst.add_arc(state, Arc::new(EPSILON, EPSILON, weight, unified))
            .expect("growable fst never refuses arcs");
        fst.set_final(state, W::zero());
    }
    unified
}

/// The reversed machine: arcs flipped, the unified final state (appended by
/// [`extend_final`], so the result has one more state than the input)
/// becomes the start, and the old start becomes the only final state with
/// weight `one()`. State ids are preserved, which is what lets
/// shortest-distance results computed here be read against the original
/// machine.
pub fn reverse<W: Semiring, F: Fst<W>>(fst: &F) -> VectorFst<W> {
    let mut ext = VectorFst::from_fst(fst);
    let old_start = match ext.start() {
        Some(start) => start,
        None => {
            debug!("reverse: no start state");
            return VectorFst::new();
        }
    };
    let unified = extend_final(&mut ext);

    let mut rev = VectorFst::new();
    rev.set_input_symbols(fst.input_symbols().clone());
    rev.set_output_symbols(fst.output_symbols().clone());
    for _ in 0..ext.num_states() {
        rev.add_state().expect("growable fst never refuses add_state");
    }
    rev.set_start(unified);
    rev.set_final(old_start, W::one());
    for state in 0..ext.num_states() as StateId {
        for arc in ext.arcs(state) {
            rev.add_arc(
                arc.nextstate,
                Arc::new(arc.ilabel, arc.olabel, arc.weight, state),
            )
            .expect("growable fst never refuses arcs");
        }
    }
    rev
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semiring::TropicalWeight;

    fn two_final_fst() -> VectorFst<TropicalWeight> {
        let mut fst = VectorFst::new();
        for _ in 0..3 {
            fst.add_state().unwrap();
        }
        fst.set_start(0);
        fst.set_final(1, TropicalWeight(0.5));
        fst.set_final(2, TropicalWeight(1.5));
        fst.add_arc(0, Arc::new(1, 1, TropicalWeight(1.0), 1)).unwrap();
        fst.add_arc(0, Arc::new(2, 2, TropicalWeight(2.0), 2)).unwrap();
        fst
    }

    #[test]
    fn extend_final_unifies_accepting_states() {
        let mut fst = two_final_fst();
        let unified = extend_final(&mut fst);
        assert_eq!(unified, 3);
        assert_eq!(fst.final_weight(unified), TropicalWeight::one());
        assert!(!fst.is_final(1));
        assert!(!fst.is_final(2));
        // old final weights moved onto the epsilon arcs
        let arc1 = fst.arcs(1)[0];
        assert_eq!((arc1.ilabel, arc1.olabel), (EPSILON, EPSILON));
        assert_eq!(arc1.weight, TropicalWeight(0.5));
        assert_eq!(arc1.nextstate, unified);
        let arc2 = fst.arcs(2)[0];
        assert_eq!(arc2.weight, TropicalWeight(1.5));
    }

    #[test]
    fn reverse_flips_arcs_and_swaps_roles() {
        let fst = two_final_fst();
        let rev = reverse(&fst);
        assert_eq!(rev.num_states(), 4);
        assert_eq!(rev.start(), Some(3));
        assert!(rev.is_final(0));
        // the original 0 -1:1-> 1 arc now leaves state 1
        let back = rev
            .arcs(1)
            .iter()
            .find(|arc| arc.nextstate == 0)
            .unwrap();
        assert_eq!(back.ilabel, 1);
        assert_eq!(back.weight, TropicalWeight(1.0));
        // the unified final's incoming epsilon arcs now leave the new start
        assert_eq!(rev.num_arcs(3), 2);
    }

    #[test]
    fn reverse_of_startless_machine_is_empty() {
        let mut fst = VectorFst::<TropicalWeight>::new();
        fst.add_state().unwrap();
        let rev = reverse(&fst);
        assert_eq!(rev.num_states(), 0);
        assert_eq!(rev.start(), None);
    }
}
