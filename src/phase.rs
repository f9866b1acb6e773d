//! # Phase Conventions
//!
//! A phase is a signed illumination fraction in `[-1.0, 1.0]`:
//!
//! - **Magnitude**: fraction of the disc that is lit (`0.0` new, `1.0` full)
//! - **Sign**: negative while waxing, positive while waning
//!
//! A full cycle runs `0.0 → -1.0` as the moon waxes and `1.0 → 0.0` as it
//! wanes. `-1.0` and `1.0` are the same physical full moon reached from
//! opposite sides of the cycle; they are kept distinct so callers can tell
//! waxing from waning.
//!
//! The arc geometry in [`crate::mask`] sweeps the opposite way to this public
//! convention. [`Terminator::from_phase`] is the only place the two are
//! reconciled.

use crate::error::{MoonError, Result};

/// Validate a phase value, rejecting anything outside `[-1, 1]` (and NaN).
pub fn check_phase(phase: f64) -> Result<f64> {
    if (-1.0..=1.0).contains(&phase) {
        Ok(phase)
    } else {
        Err(MoonError::PhaseOutOfRange(phase))
    }
}

/// Validate a shadow value, rejecting anything outside `[0, 1]` (and NaN).
pub fn check_shadow(shadow: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&shadow) {
        Ok(shadow)
    } else {
        Err(MoonError::ShadowOutOfRange(shadow))
    }
}

/// Which half of the disc the illuminated limb sits on, as seen on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LitSide {
    /// Waxing moon: the right-hand limb is lit
    Right,
    /// Waning moon: the left-hand limb is lit
    Left,
}

impl LitSide {
    /// +1.0 for the right half, -1.0 for the left half.
    pub fn sign(self) -> f64 {
        match self {
            LitSide::Right => 1.0,
            LitSide::Left => -1.0,
        }
    }
}

/// Internal description of the day/night boundary for one phase.
///
/// `bulge` is the terminator's signed horizontal semi-axis as a fraction of
/// the disc radius. `-1.0` puts the terminator on top of the lit limb (nothing
/// lit), `0.0` makes it the vertical centerline and `1.0` pushes it onto the
/// opposite limb (whole disc lit).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Terminator {
    pub side: LitSide,
    pub bulge: f64,
}

impl Terminator {
    /// Convert a public phase into terminator geometry.
    ///
    /// The value is negated first so that increasing phase sweeps the lit
    /// boundary the way the arc construction expects, then `[-1, 0)` and
    /// `[0, 1]` are each remapped onto `[-1, 1]`.
    pub fn from_phase(phase: f64) -> Self {
        let flipped = -phase;
        if flipped < 0.0 {
            // Waning: 2·((-1 - p) + 0.5) runs 1 → -1 as p runs -1 → 0
            Terminator {
                side: LitSide::Left,
                bulge: 2.0 * ((-1.0 - flipped) + 0.5),
            }
        } else {
            // Waxing (and new moon, including -0.0)
            Terminator {
                side: LitSide::Right,
                bulge: 2.0 * (flipped - 0.5),
            }
        }
    }

    /// Fraction of the disc area this terminator leaves illuminated.
    pub fn lit_fraction(&self) -> f64 {
        (self.bulge + 1.0) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_domain() {
        assert!(check_phase(-1.0).is_ok());
        assert!(check_phase(1.0).is_ok());
        assert!(check_phase(0.0).is_ok());
        assert!(matches!(
            check_phase(1.0001),
            Err(MoonError::PhaseOutOfRange(_))
        ));
        assert!(check_phase(f64::NAN).is_err());
    }

    #[test]
    fn test_shadow_domain() {
        assert!(check_shadow(0.0).is_ok());
        assert!(check_shadow(1.0).is_ok());
        assert!(matches!(
            check_shadow(-0.1),
            Err(MoonError::ShadowOutOfRange(_))
        ));
    }

    #[test]
    fn test_full_moon_from_either_side() {
        let waxing = Terminator::from_phase(-1.0);
        let waning = Terminator::from_phase(1.0);

        assert_eq!(waxing.side, LitSide::Right);
        assert_eq!(waning.side, LitSide::Left);
        assert_eq!(waxing.bulge, 1.0);
        assert_eq!(waning.bulge, 1.0);
    }

    #[test]
    fn test_new_moon_has_no_lit_area() {
        for phase in [0.0, -0.0] {
            let t = Terminator::from_phase(phase);
            assert_eq!(t.side, LitSide::Right);
            assert_eq!(t.bulge, -1.0);
            assert_eq!(t.lit_fraction(), 0.0);
        }
    }

    #[test]
    fn test_lit_fraction_matches_magnitude() {
        for phase in [-0.9, -0.5, -0.25, 0.1, 0.5, 0.75] {
            let t = Terminator::from_phase(phase);
            assert!(
                (t.lit_fraction() - f64::abs(phase)).abs() < 1e-12,
                "phase {phase} lit {}",
                t.lit_fraction()
            );
        }
    }

    #[test]
    fn test_sign_selects_side() {
        assert_eq!(Terminator::from_phase(-0.3).side, LitSide::Right);
        assert_eq!(Terminator::from_phase(0.3).side, LitSide::Left);
        assert_eq!(LitSide::Right.sign(), 1.0);
        assert_eq!(LitSide::Left.sign(), -1.0);
    }
}
