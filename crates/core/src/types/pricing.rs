//! Custom-sketch price quoting.
//!
//! The pricing table is consumed by the custom-art intake as a read-only
//! reference; it never touches catalog or order state. Base price steps at
//! one, two, and three subjects, then grows by a fixed increment per extra
//! subject. The paper size applies a multiplier on top (A5 discounted, A4
//! neutral, A3 and A2 at a premium).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::status::text_enum;

/// Base price for a single-person sketch.
const BASE_ONE_PERSON: Decimal = Decimal::from_parts(700, 0, 0, false, 0);
/// Base price for a two-person sketch.
const BASE_TWO_PERSONS: Decimal = Decimal::from_parts(1200, 0, 0, false, 0);
/// Base price for a three-person sketch.
const BASE_THREE_PERSONS: Decimal = Decimal::from_parts(1600, 0, 0, false, 0);
/// Increment per subject beyond three.
const PER_EXTRA_PERSON: Decimal = Decimal::from_parts(400, 0, 0, false, 0);

/// Paper sizes offered for commissioned sketches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SketchSize {
    A5,
    A4,
    A3,
    A2,
}

impl SketchSize {
    /// Price multiplier for this paper size.
    #[must_use]
    pub const fn multiplier(self) -> Decimal {
        // 0.8 / 1.0 / 1.3 / 1.6
        match self {
            Self::A5 => Decimal::from_parts(8, 0, 0, false, 1),
            Self::A4 => Decimal::from_parts(10, 0, 0, false, 1),
            Self::A3 => Decimal::from_parts(13, 0, 0, false, 1),
            Self::A2 => Decimal::from_parts(16, 0, 0, false, 1),
        }
    }
}

text_enum!(SketchSize {
    A5 => "A5",
    A4 => "A4",
    A3 => "A3",
    A2 => "A2",
});

/// Quote the price of a commissioned sketch.
///
/// `person_count` below one is treated as one. The result is rounded to a
/// whole amount, half away from zero.
#[must_use]
pub fn sketch_quote(person_count: u32, size: SketchSize) -> Decimal {
    let base = match person_count {
        0 | 1 => BASE_ONE_PERSON,
        2 => BASE_TWO_PERSONS,
        3 => BASE_THREE_PERSONS,
        n => BASE_THREE_PERSONS + PER_EXTRA_PERSON * Decimal::from(n - 3),
    };

    (base * size.multiplier()).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_base_tiers_at_neutral_size() {
        assert_eq!(sketch_quote(1, SketchSize::A4), dec!(700));
        assert_eq!(sketch_quote(2, SketchSize::A4), dec!(1200));
        assert_eq!(sketch_quote(3, SketchSize::A4), dec!(1600));
    }

    #[test]
    fn test_increment_beyond_three_persons() {
        assert_eq!(sketch_quote(4, SketchSize::A4), dec!(2000));
        assert_eq!(sketch_quote(5, SketchSize::A4), dec!(2400));
        assert_eq!(sketch_quote(10, SketchSize::A4), dec!(4400));
    }

    #[test]
    fn test_size_multipliers() {
        assert_eq!(sketch_quote(1, SketchSize::A5), dec!(560));
        assert_eq!(sketch_quote(1, SketchSize::A3), dec!(910));
        assert_eq!(sketch_quote(1, SketchSize::A2), dec!(1120));
        assert_eq!(sketch_quote(2, SketchSize::A3), dec!(1560));
        assert_eq!(sketch_quote(4, SketchSize::A2), dec!(3200));
    }

    #[test]
    fn test_zero_persons_treated_as_one() {
        assert_eq!(sketch_quote(0, SketchSize::A4), dec!(700));
    }

    #[test]
    fn test_size_parse_roundtrip() {
        for size in [
            SketchSize::A5,
            SketchSize::A4,
            SketchSize::A3,
            SketchSize::A2,
        ] {
            assert_eq!(size.to_string().parse::<SketchSize>().unwrap(), size);
        }
        assert!("A1".parse::<SketchSize>().is_err());
    }
}
