// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multiplicative opacity mask.

use crate::property::{Composable, InvertError};

/// An opacity factor in `[0, 1]`.
///
/// Masks compose by multiplication. Multiplication on `[0, 1]` has no
/// inverses, so [`try_invert`](Composable::try_invert) always fails, even for
/// the identity: the mask is a one-way operator.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct AlphaMask(f32);

impl AlphaMask {
    /// Fully opaque.
    pub const OPAQUE: Self = Self(1.0);

    /// Fully transparent.
    pub const TRANSPARENT: Self = Self(0.0);

    /// Creates a mask, clamping into `[0, 1]`. NaN maps to transparent.
    #[must_use]
    pub fn new(alpha: f32) -> Self {
        if alpha.is_nan() {
            Self::TRANSPARENT
        } else {
            Self(alpha.clamp(0.0, 1.0))
        }
    }

    /// Returns the opacity factor.
    #[inline]
    #[must_use]
    pub const fn get(self) -> f32 {
        self.0
    }
}

impl Default for AlphaMask {
    fn default() -> Self {
        Self::OPAQUE
    }
}

impl From<f32> for AlphaMask {
    fn from(alpha: f32) -> Self {
        Self::new(alpha)
    }
}

impl Composable for AlphaMask {
    fn identity() -> Self {
        Self::OPAQUE
    }

    fn compose(&self, later: &Self) -> Self {
        Self::new(self.0 * later.0)
    }

    fn try_invert(&self) -> Result<Self, InvertError> {
        Err(InvertError::NotAGroup)
    }

    fn normalize(self) -> Self {
        Self::new(self.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::property::{AlphaMaskProperty, ApplyType};

    use super::*;

    const SAMPLES: [f32; 6] = [0.0, 0.1, 0.25, 0.5, 0.9, 1.0];

    #[test]
    fn new_clamps() {
        assert_eq!(AlphaMask::new(1.5), AlphaMask::OPAQUE);
        assert_eq!(AlphaMask::new(-0.5), AlphaMask::TRANSPARENT);
        assert_eq!(AlphaMask::new(f32::NAN), AlphaMask::TRANSPARENT);
        assert_eq!(AlphaMask::new(0.3).get(), 0.3);
    }

    #[test]
    fn value_mut_bypasses_clamping_but_set_value_does_not() {
        let mut p = AlphaMaskProperty::new();
        p.set_value(AlphaMask(4.0));
        assert_eq!(p.value().get(), 1.0);
        *p.value_mut() = AlphaMask(4.0);
        assert_eq!(p.value().get(), 4.0);
    }

    #[test]
    fn invert_always_fails() {
        for a in SAMPLES {
            let p = AlphaMaskProperty::from_value(AlphaMask::new(a));
            let inv = p.inverted();
            assert!(!inv.is_valid(), "alpha {a} must not be invertible");
            assert_eq!(inv.apply_type(), ApplyType::Operate);
        }
    }

    #[test]
    fn composition_is_commutative_multiplication() {
        for a in SAMPLES {
            for b in SAMPLES {
                let ab = AlphaMask::new(a).compose(&AlphaMask::new(b));
                let ba = AlphaMask::new(b).compose(&AlphaMask::new(a));
                assert_eq!(ab, ba);
                assert!((ab.get() - a * b).abs() < 1e-6);
                assert!((0.0..=1.0).contains(&ab.get()));
            }
        }
    }

    #[test]
    fn zero_absorbs_and_one_is_neutral() {
        for a in SAMPLES {
            let m = AlphaMask::new(a);
            assert_eq!(m.compose(&AlphaMask::TRANSPARENT), AlphaMask::TRANSPARENT);
            assert_eq!(AlphaMask::TRANSPARENT.compose(&m), AlphaMask::TRANSPARENT);
            assert_eq!(m.compose(&AlphaMask::OPAQUE), m);
            assert_eq!(AlphaMask::OPAQUE.compose(&m), m);
        }
    }

    #[test]
    fn identity_laws_on_property() {
        let p = AlphaMaskProperty::from_value(AlphaMask::new(0.4));
        let id = AlphaMaskProperty::new();
        assert_eq!(id.then(&p), p);
        assert_eq!(p.then(&id), p);
    }

    #[test]
    fn replace_overrides_inherited_opacity() {
        let dim = AlphaMaskProperty::from_value(AlphaMask::new(0.2));
        let solid = AlphaMaskProperty::replacing(AlphaMask::OPAQUE);
        let out = dim.then(&solid);
        assert_eq!(*out.value(), AlphaMask::OPAQUE);
        assert_eq!(out.apply_type(), ApplyType::Replace);
    }
}
