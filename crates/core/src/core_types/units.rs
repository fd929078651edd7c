//! Semantic unit types for temperature handling
//!
//! Newtype wrappers keep Celsius, Kelvin and temperature differences apart so
//! the radiative T⁴ terms can never be fed a Celsius value by accident.
//!
//! # Design Philosophy
//! - All temperature types are f64 (T⁴ in the Stefan-Boltzmann law)
//! - Total ordering via `Ord` (NaN sorts above all values)
//! - `Deref` to the raw f64 for arithmetic-heavy physics code
//! - Serde support for serialization
//!
//! # Usage
//! ```
//! use thermothin_core::core_types::units::{Celsius, Kelvin};
//!
//! let temp = Celsius::new(25.0);
//! let kelvin: Kelvin = temp.into();
//! assert!((*kelvin - 298.15).abs() < 1e-9);
//!
//! let t1 = Celsius::new(100.0);
//! let t2 = Celsius::new(200.0);
//! assert_eq!(t1.min(t2), Celsius::new(100.0));
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Sub};

/// Celsius to Kelvin conversion offset (0°C = 273.15 K)
pub const CELSIUS_KELVIN_OFFSET: f64 = 273.15;

// ============================================================================
// CELSIUS
// ============================================================================

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Celsius(f64);

impl Eq for Celsius {}

impl PartialOrd for Celsius {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Celsius {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for Celsius {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Celsius {
    /// Absolute zero in Celsius
    pub const ABSOLUTE_ZERO: Celsius = Celsius(-CELSIUS_KELVIN_OFFSET);

    /// Create a new Celsius temperature. Asserts value >= absolute zero (-273.15°C).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= -CELSIUS_KELVIN_OFFSET,
            "Celsius::new: value is below absolute zero (-273.15°C)"
        );
        Celsius(value)
    }

    /// Create a temperature from untrusted input.
    ///
    /// Returns `None` for NaN, infinities and values below absolute zero.
    #[inline]
    #[must_use]
    pub fn try_new(value: f64) -> Option<Self> {
        (value.is_finite() && value >= -CELSIUS_KELVIN_OFFSET).then_some(Celsius(value))
    }

    /// Convert to Kelvin
    #[inline]
    #[must_use]
    pub fn to_kelvin(self) -> Kelvin {
        Kelvin(self.0 + CELSIUS_KELVIN_OFFSET)
    }

    /// Clamp into `[lo, hi]`
    #[inline]
    #[must_use]
    pub fn clamp_to(self, lo: f64, hi: f64) -> Celsius {
        Celsius(self.0.clamp(lo, hi))
    }
}

impl From<Celsius> for Kelvin {
    fn from(c: Celsius) -> Kelvin {
        c.to_kelvin()
    }
}

impl Sub for Celsius {
    type Output = CelsiusDelta;
    fn sub(self, rhs: Self) -> CelsiusDelta {
        CelsiusDelta(self.0 - rhs.0)
    }
}

impl Add<CelsiusDelta> for Celsius {
    type Output = Celsius;
    fn add(self, rhs: CelsiusDelta) -> Celsius {
        Celsius(self.0 + rhs.0)
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(precision) = f.precision() {
            write!(f, "{:.*}°C", precision, self.0)
        } else {
            write!(f, "{}°C", self.0)
        }
    }
}

// ============================================================================
// CELSIUS DELTA
// ============================================================================

/// Temperature difference in Celsius (identical in magnitude to Kelvin)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CelsiusDelta(f64);

impl Eq for CelsiusDelta {}

impl PartialOrd for CelsiusDelta {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CelsiusDelta {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for CelsiusDelta {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl CelsiusDelta {
    /// Create a temperature delta (any sign)
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        CelsiusDelta(value)
    }

    /// Absolute magnitude of the difference
    #[inline]
    #[must_use]
    pub fn abs(self) -> Self {
        CelsiusDelta(self.0.abs())
    }

    /// Scale the difference by a dimensionless factor
    #[inline]
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        CelsiusDelta(self.0 * factor)
    }
}

// ============================================================================
// KELVIN
// ============================================================================

/// Absolute temperature in Kelvin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Kelvin(f64);

impl Eq for Kelvin {}

impl PartialOrd for Kelvin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Kelvin {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for Kelvin {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Kelvin {
    /// Create a new Kelvin temperature. Asserts value >= 0.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Kelvin::new: value is below absolute zero");
        Kelvin(value)
    }

    /// Convert to Celsius
    #[inline]
    #[must_use]
    pub fn to_celsius(self) -> Celsius {
        Celsius(self.0 - CELSIUS_KELVIN_OFFSET)
    }
}

impl From<Kelvin> for Celsius {
    fn from(k: Kelvin) -> Celsius {
        k.to_celsius()
    }
}

impl fmt::Display for Kelvin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(precision) = f.precision() {
            write!(f, "{:.*} K", precision, self.0)
        } else {
            write!(f, "{} K", self.0)
        }
    }
}
