/*! Abstract weight algebras.

Every graph algorithm in this crate combines weights exclusively through a
[`Semiring`] implementation: `plus` merges alternative paths, `times` chains
sequential weights, and `natural_less` orders weights for pruning and
priority comparisons. Swapping the semiring changes the meaning of a whole
machine (shortest cost vs. summed log-probability) without touching any
graph code.
*/

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a weight type in the persisted model format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SemiringKind {
    Tropical = 0,
    Log = 1,
}

impl SemiringKind {
    pub fn from_tag(tag: u8) -> Option<SemiringKind> {
        match tag {
            0 => Some(SemiringKind::Tropical),
            1 => Some(SemiringKind::Log),
            _ => None,
        }
    }
}

/// A weight algebra: `(W, plus, times, zero, one)`.
///
/// Laws assumed and never checked at runtime: `plus` is commutative with
/// identity `zero()`, `times` is associative with identity `one()` and
/// distributes over `plus`, and `zero()` absorbs under `times`. Violating
/// them silently corrupts shortest-distance results.
pub trait Semiring:
    Copy + Clone + PartialEq + fmt::Debug + fmt::Display + 'static
{
    /// Tag written into persisted models carrying this weight type.
    const KIND: SemiringKind;

    /// The additive identity; also the final weight of a non-accepting state.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// Combine two alternative path weights.
    fn plus(self, rhs: Self) -> Self;

    /// Chain two sequential weights.
    fn times(self, rhs: Self) -> Self;

    /// Total order used for pruning and priority comparisons.
    fn natural_less(self, rhs: Self) -> bool;

    fn value(self) -> f32;

    fn from_value(value: f32) -> Self;
}

/// Min/plus weights: `plus` keeps the cheaper path, `times` adds costs.
/// `zero()` is positive infinity, `one()` is `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct TropicalWeight(pub f32);

impl fmt::Display for TropicalWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Semiring for TropicalWeight {
    const KIND: SemiringKind = SemiringKind::Tropical;

    #[inline(always)]
    fn zero() -> Self {
        TropicalWeight(f32::INFINITY)
    }

    #[inline(always)]
    fn one() -> Self {
        TropicalWeight(0.0)
    }

    #[inline(always)]
    fn plus(self, rhs: Self) -> Self {
        if self.0 < rhs.0 {
            self
        } else {
            rhs
        }
    }

    #[inline(always)]
    fn times(self, rhs: Self) -> Self {
        TropicalWeight(self.0 + rhs.0)
    }

    #[inline(always)]
    fn natural_less(self, rhs: Self) -> bool {
        self.0 < rhs.0
    }

    #[inline(always)]
    fn value(self) -> f32 {
        self.0
    }

    #[inline(always)]
    fn from_value(value: f32) -> Self {
        TropicalWeight(value)
    }
}

/// Negated-log weights: `times` adds, `plus` is the log-sum
/// `-ln(e^-a + e^-b)`. `zero()` is positive infinity, `one()` is `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct LogWeight(pub f32);

impl fmt::Display for LogWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Semiring for LogWeight {
    const KIND: SemiringKind = SemiringKind::Log;

    #[inline(always)]
    fn zero() -> Self {
        LogWeight(f32::INFINITY)
    }

    #[inline(always)]
    fn one() -> Self {
        LogWeight(0.0)
    }

    fn plus(self, rhs: Self) -> Self {
        if self.0 == f32::INFINITY {
            return rhs;
        }
        if rhs.0 == f32::INFINITY {
            return self;
        }
        // -ln(e^-a + e^-b) = lo - ln(1 + e^-(hi - lo)), stable for hi >> lo
        let (lo, hi) = if self.0 < rhs.0 {
            (self.0, rhs.0)
        } else {
            (rhs.0, self.0)
        };
        LogWeight(lo - (1.0 + (-(hi - lo)).exp()).ln())
    }

    #[inline(always)]
    fn times(self, rhs: Self) -> Self {
        LogWeight(self.0 + rhs.0)
    }

    #[inline(always)]
    fn natural_less(self, rhs: Self) -> bool {
        self.0 < rhs.0
    }

    #[inline(always)]
    fn value(self) -> f32 {
        self.0
    }

    #[inline(always)]
    fn from_value(value: f32) -> Self {
        LogWeight(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tropical_identities() {
        let w = TropicalWeight(1.5);
        assert_eq!(w.plus(TropicalWeight::zero()), w);
        assert_eq!(w.times(TropicalWeight::one()), w);
        assert_eq!(w.times(TropicalWeight::zero()), TropicalWeight::zero());
    }

    #[test]
    fn tropical_plus_is_min() {
        assert_eq!(
            TropicalWeight(3.0).plus(TropicalWeight(2.0)),
            TropicalWeight(2.0)
        );
        assert_eq!(
            TropicalWeight(2.0).plus(TropicalWeight(3.0)),
            TropicalWeight(2.0)
        );
    }

    #[test]
    fn tropical_times_distributes_over_plus() {
        let a = TropicalWeight(1.0);
        let b = TropicalWeight(2.0);
        let c = TropicalWeight(4.0);
        assert_eq!(a.times(b.plus(c)), a.times(b).plus(a.times(c)));
    }

    #[test]
    fn log_identities() {
        let w = LogWeight(0.7);
        assert_eq!(w.plus(LogWeight::zero()), w);
        assert_eq!(w.times(LogWeight::one()), w);
        assert_eq!(w.times(LogWeight::zero()), LogWeight::zero());
    }

    #[test]
    fn log_plus_of_equal_weights() {
        // -ln(2 * e^-w) = w - ln 2
        let w = LogWeight(1.0);
        let combined = w.plus(w);
        assert!((combined.0 - (1.0 - 2.0f32.ln())).abs() < 1e-6);
    }

    #[test]
    fn log_plus_commutes() {
        let a = LogWeight(0.25);
        let b = LogWeight(5.0);
        assert_eq!(a.plus(b), b.plus(a));
    }

    #[test]
    fn natural_less_is_strict() {
        assert!(TropicalWeight(1.0).natural_less(TropicalWeight(2.0)));
        assert!(!TropicalWeight(2.0).natural_less(TropicalWeight(1.0)));
        assert!(!TropicalWeight(1.0).natural_less(TropicalWeight(1.0)));
    }
}
