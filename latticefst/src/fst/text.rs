use itertools::Itertools;

use super::Fst;
use crate::semiring::Semiring;
use crate::types::{Label, StateId};

fn resolve(table: &crate::symbols::SymbolTable, label: Label) -> String {
    match table.symbol(label) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => label.to_string(),
    }
}

/// Render a machine as one line per arc (`src dst isym osym weight`)
/// followed by one line per final state (`state weight`), labels resolved
/// through the symbol tables where possible.
pub fn text<W: Semiring, F: Fst<W>>(fst: &F) -> String {
    let isyms = fst.input_symbols();
    let osyms = fst.output_symbols();
    let mut lines = vec![];
    for state in 0..fst.num_states() as StateId {
        for arc in fst.arcs(state) {
            lines.push(
                [
                    state.to_string(),
                    arc.nextstate.to_string(),
                    resolve(isyms, arc.ilabel),
                    resolve(osyms, arc.olabel),
                    arc.weight.to_string(),
                ]
                .iter()
                .join("\t"),
            );
        }
    }
    for state in 0..fst.num_states() as StateId {
        if fst.is_final(state) {
            lines.push(format!("{}\t{}", state, fst.final_weight(state)));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::{Arc, MutableFst, VectorFst};
    use crate::semiring::TropicalWeight;
    use crate::symbols::SymbolTable;

    #[test]
    fn arcs_then_finals() {
        let mut fst = VectorFst::<TropicalWeight>::new();
        fst.set_input_symbols(SymbolTable::from_symbols(["<eps>", "a"]));
        fst.set_output_symbols(SymbolTable::from_symbols(["<eps>", "b"]));
        let s0 = fst.add_state().unwrap();
        let s1 = fst.add_state().unwrap();
        fst.set_start(s0);
        fst.set_final(s1, TropicalWeight(0.5));
        fst.add_arc(s0, Arc::new(1, 1, TropicalWeight(1.0), s1)).unwrap();

        let rendered = text(&fst);
        assert_eq!(rendered, "0\t1\ta\tb\t1\n1\t0.5");
    }

    #[test]
    fn unknown_labels_fall_back_to_ids() {
        let mut fst = VectorFst::<TropicalWeight>::new();
        let s0 = fst.add_state().unwrap();
        fst.set_start(s0);
        fst.add_arc(s0, Arc::new(7, 9, TropicalWeight(0.0), s0)).unwrap();
        assert_eq!(text(&fst), "0\t0\t7\t9\t0");
    }
}
