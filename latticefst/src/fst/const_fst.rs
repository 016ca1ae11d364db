use super::{Arc, Fst, FstError, MutableFst};
use crate::semiring::Semiring;
use crate::symbols::SymbolTable;
use crate::types::StateId;

/// Fixed-capacity state storage. `arcs` always holds `num_arcs + 1` slots:
/// the trailing one is reserved for the single self-loop the epsilon-filter
/// augmentation adds per state, so a loaded model can be composed without
/// copying it into growable storage first.
#[derive(Debug, Clone)]
struct ConstState<W> {
    final_weight: W,
    arcs: Box<[Arc<W>]>,
    num_arcs: usize,
}

/// The frozen transducer variant, built only by model deserialization
/// ([`ConstFst::read`](crate::fst::io)). State and arc counts never change;
/// arc contents, final weights and symbol tables may be overwritten in
/// place, which is what ArcSort, Project and the composition augmentation
/// need.
#[derive(Debug, Clone)]
pub struct ConstFst<W: Semiring> {
    states: Vec<ConstState<W>>,
    start: Option<StateId>,
    isyms: SymbolTable,
    osyms: SymbolTable,
}

impl<W: Semiring> ConstFst<W> {
    /// Assemble a frozen fst from loader output. Each state's arc vector is
    /// its exact arc sequence; the reserved slot is allocated here.
    pub(crate) fn from_parts(
        state_parts: Vec<(W, Vec<Arc<W>>)>,
        start: Option<StateId>,
        isyms: SymbolTable,
        osyms: SymbolTable,
    ) -> ConstFst<W> {
        let states = state_parts
            .into_iter()
            .enumerate()
            .map(|(id, (final_weight, mut arcs))| {
                let num_arcs = arcs.len();
                // reserved augmentation slot, invisible until filled
                arcs.push(Arc::new(
                    crate::constants::EPSILON,
                    crate::constants::EPSILON,
                    W::zero(),
                    id as StateId,
                ));
                ConstState {
                    final_weight,
                    arcs: arcs.into_boxed_slice(),
                    num_arcs,
                }
            })
            .collect();
        ConstFst {
            states,
            start,
            isyms,
            osyms,
        }
    }
}

impl<W: Semiring> Fst<W> for ConstFst<W> {
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
        self.states[state as usize].num_arcs
    }

    #[inline(always)]
    fn final_weight(&self, state: StateId) -> W {
        self.states[state as usize].final_weight
    }

    #[inline(always)]
    fn arcs(&self, state: StateId) -> &[Arc<W>] {
        let state = &self.states[state as usize];
        &state.arcs[..state.num_arcs]
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

impl<W: Semiring> MutableFst<W> for ConstFst<W> {
    fn set_start(&mut self, state: StateId) {
        assert!((state as usize) < self.states.len());
        self.start = Some(state);
    }

    fn set_final(&mut self, state: StateId, weight: W) {
        self.states[state as usize].final_weight = weight;
    }

    fn add_state(&mut self) -> Result<StateId, FstError> {
        Err(FstError::Frozen)
    }

    fn add_arc(&mut self, state: StateId, arc: Arc<W>) -> Result<(), FstError> {
        let slot = &mut self.states[state as usize];
        if slot.num_arcs >= slot.arcs.len() {
            return Err(FstError::ArcCapacity { state });
        }
        slot.arcs[slot.num_arcs] = arc;
        slot.num_arcs += 1;
        Ok(())
    }

    fn arcs_mut(&mut self, state: StateId) -> &mut [Arc<W>] {
        let state = &mut self.states[state as usize];
        &mut state.arcs[..state.num_arcs]
    }

    fn delete_state(&mut self, _state: StateId) -> Result<(), FstError> {
        Err(FstError::Frozen)
    }

    fn delete_states(&mut self, _states: &[StateId]) -> Result<(), FstError> {
        Err(FstError::Frozen)
    }

    fn set_input_symbols(&mut self, symbols: SymbolTable) {
        self.isyms = symbols;
    }

    fn set_output_symbols(&mut self, symbols: SymbolTable) {
        self.osyms = symbols;
    }
}
