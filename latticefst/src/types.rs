/// Integer id of an input or output symbol. Id `0` is reserved for epsilon,
/// the "no symbol consumed or produced" label.
pub type Label = u32;

/// Index of a state inside the arena of its owning fst. States only ever
/// refer to each other by id, never by pointer, so arcs are free to form
/// cycles and self-loops.
pub type StateId = u32;

/// Sentinel for "no state", used in the persisted model format for machines
/// that have no start state set.
pub const NO_STATE: StateId = u32::MAX;
