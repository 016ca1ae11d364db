use super::{Arc, Fst, FstError, MutableFst};
use crate::semiring::Semiring;
use crate::symbols::SymbolTable;
use crate::types::StateId;

#[derive(Debug, Clone, PartialEq)]
struct VectorState<W> {
    final_weight: W,
    arcs: Vec<Arc<W>>,
}

/// The growable transducer variant: states and arcs may be appended and
/// deleted at any time. Builders (grammar and dictionary loaders) and every
/// operation that allocates a result use this type.
#[derive(Debug, Clone)]
pub struct VectorFst<W: Semiring> {
    states: Vec<VectorState<W>>,
    start: Option<StateId>,
    isyms: SymbolTable,
    osyms: SymbolTable,
}

impl<W: Semiring> Default for VectorFst<W> {
    fn default() -> Self {
        VectorFst::new()
    }
}

impl<W: Semiring> VectorFst<W> {
    pub fn new() -> VectorFst<W> {
        VectorFst {
            states: vec![],
            start: None,
            isyms: SymbolTable::new(),
            osyms: SymbolTable::new(),
        }
    }

    /// Copy any transducer into a growable one, preserving state ids.
    pub fn from_fst<F: Fst<W>>(fst: &F) -> VectorFst<W> {
        let mut out = VectorFst::new();
        out.isyms = fst.input_symbols().clone();
        out.osyms = fst.output_symbols().clone();
        for state in 0..fst.num_states() as StateId {
            let id = out
                .add_state()
                .expect("growable fst never refuses add_state");
            debug_assert_eq!(id, state);
            out.states[state as usize].final_weight = fst.final_weight(state);
            out.states[state as usize].arcs.extend_from_slice(fst.arcs(state));
        }
        out.start = fst.start();
        out
    }

    fn assert_state(&self, state: StateId) {
        assert!(
            (state as usize) < self.states.len(),
            "state {} out of bounds ({} states)",
            state,
            self.states.len()
        );
    }
}

impl<W: Semiring> Fst<W> for VectorFst<W> {
    #[inline(always)]
    fn start(&self) -> Option<StateId> {
        self.start
    }

    #[inline(always)]
    fn num_states(&self) -> usize {
        self.states.len()
    }

    #[inline(always)]
    fn num_arcs(&self, state: StateId) -> usize {
        self.states[state as usize].arcs.len()
    }

    #[inline(always)]
    fn final_weight(&self, state: StateId) -> W {
        self.states[state as usize].final_weight
    }

    #[inline(always)]
    fn arcs(&self, state: StateId) -> &[Arc<W>] {
        &self.states[state as usize].arcs
    }

    #[inline(always)]
    fn input_symbols(&self) -> &SymbolTable {
        &self.isyms
    }

    #[inline(always)]
    fn output_symbols(&self) -> &SymbolTable {
        &self.osyms
    }
}

impl<W: Semiring> MutableFst<W> for VectorFst<W> {
    fn set_start(&mut self, state: StateId) {
        self.assert_state(state);
        self.start = Some(state);
    }

    fn set_final(&mut self, state: StateId, weight: W) {
        self.assert_state(state);
        self.states[state as usize].final_weight = weight;
    }

    fn add_state(&mut self) -> Result<StateId, FstError> {
        let id = self.states.len() as StateId;
        self.states.push(VectorState {
            final_weight: W::zero(),
            arcs: vec![],
        });
        Ok(id)
    }

    fn add_arc(&mut self, state: StateId, arc: Arc<W>) -> Result<(), FstError> {
        self.assert_state(state);
        self.states[state as usize].arcs.push(arc);
        Ok(())
    }

    fn arcs_mut(&mut self, state: StateId) -> &mut [Arc<W>] {
        &mut self.states[state as usize].arcs
    }

    fn delete_state(&mut self, state: StateId) -> Result<(), FstError> {
        self.delete_states(&[state])
    }

    fn delete_states(&mut self, states: &[StateId]) -> Result<(), FstError> {
        if states.is_empty() {
            return Ok(());
        }
        let mut dead = vec![false; self.states.len()];
        for &state in states {
            if state as usize >= self.states.len() {
                return Err(FstError::NoSuchState(state));
            }
            if Some(state) == self.start {
                return Err(FstError::DeleteStart);
            }
            dead[state as usize] = true;
        }

        // Old id -> new id for the survivors; NO_STATE marks the dead.
        let mut remap = vec![crate::types::NO_STATE; self.states.len()];
        let mut next = 0 as StateId;
        for (old, is_dead) in dead.iter().enumerate() {
            if !is_dead {
                remap[old] = next;
                next += 1;
            }
        }

        let old_states = std::mem::take(&mut self.states);
        self.states.reserve(next as usize);
        for (old, mut state) in old_states.into_iter().enumerate() {
            if dead[old] {
                continue;
            }
            state
                .arcs
                .retain(|arc| !dead[arc.nextstate as usize]);
            for arc in &mut state.arcs {
                arc.nextstate = remap[arc.nextstate as usize];
            }
            self.states.push(state);
        }
        self.start = self.start.map(|s| remap[s as usize]);
        Ok(())
    }

    fn set_input_symbols(&mut self, symbols: SymbolTable) {
        self.isyms = symbols;
    }

    fn set_output_symbols(&mut self, symbols: SymbolTable) {
        self.osyms = symbols;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semiring::TropicalWeight;

    fn three_state_fst() -> VectorFst<TropicalWeight> {
        let mut fst = VectorFst::new();
        let s0 = fst.add_state().unwrap();
        let s1 = fst.add_state().unwrap();
        let s2 = fst.add_state().unwrap();
        fst.set_start(s0);
        fst.set_final(s2, TropicalWeight::one());
        fst.add_arc(s0, Arc::new(1, 1, TropicalWeight(0.5), s1)).unwrap();
        fst.add_arc(s1, Arc::new(2, 2, TropicalWeight(0.5), s2)).unwrap();
        fst.add_arc(s2, Arc::new(3, 3, TropicalWeight(1.0), s1)).unwrap();
        fst
    }

    #[test]
    fn build_and_read_back() {
        let fst = three_state_fst();
        assert_eq!(fst.num_states(), 3);
        assert_eq!(fst.start(), Some(0));
        assert_eq!(fst.num_arcs(0), 1);
        assert!(fst.is_final(2));
        assert!(!fst.is_final(0));
        assert_eq!(fst.arcs(0)[0].nextstate, 1);
    }

    #[test]
    fn delete_states_renumbers_and_strips_arcs() {
        let mut fst = three_state_fst();
        fst.delete_states(&[1]).unwrap();
        assert_eq!(fst.num_states(), 2);
        // old state 2 became state 1 and lost its arc into the deleted state
        assert_eq!(fst.start(), Some(0));
        assert_eq!(fst.num_arcs(0), 0);
        assert_eq!(fst.num_arcs(1), 0);
        assert!(fst.is_final(1));
    }

    #[test]
    fn delete_start_is_refused() {
        let mut fst = three_state_fst();
        assert!(matches!(
            fst.delete_states(&[0, 1]),
            Err(FstError::DeleteStart)
        ));
        // refused wholesale: nothing was deleted
        assert_eq!(fst.num_states(), 3);
    }

    #[test]
    fn self_loops_survive_renumbering() {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state().unwrap();
        let s1 = fst.add_state().unwrap();
        let s2 = fst.add_state().unwrap();
        fst.set_start(s0);
        fst.add_arc(s2, Arc::new(1, 1, TropicalWeight(0.0), s2)).unwrap();
        fst.set_final(s2, TropicalWeight::one());
        fst.delete_states(&[s1]).unwrap();
        assert_eq!(fst.arcs(1)[0].nextstate, 1);
    }

    #[test]
    fn from_fst_copies_everything() {
        let fst = three_state_fst();
        let copy = VectorFst::from_fst(&fst);
        assert_eq!(copy.num_states(), fst.num_states());
        assert_eq!(copy.start(), fst.start());
        for s in 0..fst.num_states() as StateId {
            assert_eq!(copy.arcs(s), fst.arcs(s));
            assert_eq!(copy.final_weight(s), fst.final_weight(s));
        }
    }
}
