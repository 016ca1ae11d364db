use crate::fst::MutableFst;
use crate::semiring::Semiring;
use crate::types::StateId;

/// Which side of the label pair survives a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    /// Copy input labels onto output labels; the output symbol table is
    /// replaced by the input one.
    Input,
    /// Copy output labels onto input labels; the input symbol table is
    /// replaced by the output one.
    Output,
}

/// Collapse a transducer into an acceptor by copying one label of every arc
/// onto the other. Weights and destinations are untouched. On the frozen
/// variant only the visible arc sequence is rewritten; an unfilled reserved
/// augmentation slot is not part of it and stays as it is.
pub fn project<W: Semiring, F: MutableFst<W>>(fst: &mut F, ptype: ProjectType) {
    for state in 0..fst.num_states() as StateId {
        for arc in fst.arcs_mut(state) {
            match ptype {
                ProjectType::Input => arc.olabel = arc.ilabel,
                ProjectType::Output => arc.ilabel = arc.olabel,
            }
        }
    }
    match ptype {
        ProjectType::Input => {
            let isyms = fst.input_symbols().clone();
            fst.set_output_symbols(isyms);
        }
        ProjectType::Output => {
            let osyms = fst.output_symbols().clone();
            fst.set_input_symbols(osyms);
        }
    }
}
