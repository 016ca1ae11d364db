use crate::semiring::Semiring;
use crate::types::{Label, StateId};

/// A weighted transition. `nextstate` is a non-owning index into the arena
/// of the fst the arc belongs to, so arcs may point backwards or at their
/// own source state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc<W> {
    pub ilabel: Label,
    pub olabel: Label,
    pub weight: W,
    pub nextstate: StateId,
}

impl<W: Semiring> Arc<W> {
    #[inline(always)]
    pub fn new(ilabel: Label, olabel: Label, weight: W, nextstate: StateId) -> Arc<W> {
        Arc {
            ilabel,
            olabel,
            weight,
            nextstate,
        }
    }
}
