//! Cart quantity type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A proposed cart quantity, always at least 1.
///
/// Quantity fields arrive from the page as raw text (a number input's value,
/// a CLI argument). [`Quantity::parse_lenient`] applies the view layer's
/// clamping rule: anything non-numeric or below 1 becomes 1. Removal is a
/// separate operation, so a quantity of 0 is never sent to the shop API.
///
/// ## Examples
///
/// ```
/// use cartwheel_core::Quantity;
///
/// assert_eq!(Quantity::parse_lenient("3").get(), 3);
/// assert_eq!(Quantity::parse_lenient("0").get(), 1);
/// assert_eq!(Quantity::parse_lenient("").get(), 1);
/// assert_eq!(Quantity::parse_lenient("abc").get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// The smallest representable quantity.
    pub const MIN: Self = Self(1);

    /// Create a quantity, clamping values below 1 up to 1.
    #[must_use]
    pub const fn new(n: u32) -> Self {
        if n < 1 { Self(1) } else { Self(n) }
    }

    /// Parse a quantity from raw user input.
    ///
    /// Whitespace is trimmed. Non-numeric input and values below 1 both
    /// clamp to 1.
    #[must_use]
    pub fn parse_lenient(input: &str) -> Self {
        input.trim().parse::<u32>().map_or(Self::MIN, Self::new)
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_zero() {
        assert_eq!(Quantity::new(0), Quantity::MIN);
        assert_eq!(Quantity::new(1).get(), 1);
        assert_eq!(Quantity::new(10).get(), 10);
    }

    #[test]
    fn test_parse_lenient_numeric() {
        assert_eq!(Quantity::parse_lenient("3").get(), 3);
        assert_eq!(Quantity::parse_lenient(" 7 ").get(), 7);
    }

    #[test]
    fn test_parse_lenient_clamps_low_values() {
        assert_eq!(Quantity::parse_lenient("0").get(), 1);
        assert_eq!(Quantity::parse_lenient("-2").get(), 1);
    }

    #[test]
    fn test_parse_lenient_non_numeric() {
        assert_eq!(Quantity::parse_lenient("").get(), 1);
        assert_eq!(Quantity::parse_lenient("abc").get(), 1);
        assert_eq!(Quantity::parse_lenient("1.5").get(), 1);
    }

    #[test]
    fn test_serde_transparent() {
        let q = Quantity::new(4);
        assert_eq!(serde_json::to_string(&q).unwrap(), "4");

        let parsed: Quantity = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, q);
    }

    #[test]
    fn test_default_is_min() {
        assert_eq!(Quantity::default(), Quantity::MIN);
    }
}
