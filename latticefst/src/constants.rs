use crate::types::Label;

/// The epsilon label.
pub const EPSILON: Label = 0;

/// Magic bytes at the head of a persisted model stream.
pub(crate) const MODEL_MAGIC: &[u8; 4] = b"LFST";
pub(crate) const MODEL_VERSION: u8 = 1;

/// Byte widths of the fixed-size records in the persisted model format.
pub(crate) const STATE_RECORD_SIZE: usize = 12;
pub(crate) const ARC_RECORD_SIZE: usize = 16;
