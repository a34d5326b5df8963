// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single composable properties.
//!
//! A [`Property`] wraps a value of some [`Composable`] type together with a
//! validity flag and an [`ApplyType`]. Properties compose left to right: the
//! receiver of [`apply`](Property::apply) is the *earlier* operand (closer to
//! the root of a scene graph) and the argument is the *later* one.
//!
//! Composition never fails. When an operation has no meaningful result, for
//! instance inverting a singular transform or any alpha mask, the property is
//! marked invalid instead. Invalidity propagates through every later
//! [`Operate`](ApplyType::Operate) composition, so a consumer only has to check
//! [`is_valid`](Property::is_valid) on the final result.

use core::fmt;

use crate::alpha::AlphaMask;
use crate::name::Name;
use crate::transform::Transform3d;

/// An affine transform property.
pub type AffineTransformProperty = Property<Transform3d>;

/// An opacity mask property.
pub type AlphaMaskProperty = Property<AlphaMask>;

/// A name property.
pub type NameProperty = Property<Name>;

/// How a property combines with the value it is applied on top of.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ApplyType {
    /// Combine with the earlier value using the type's composition rule.
    #[default]
    Operate,
    /// Discard the earlier value and take this one outright.
    Replace,
}

/// Why a value could not be inverted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvertError {
    /// The linear part of a transform is singular or nearly so.
    Singular,
    /// The value set has no inverses under its composition rule.
    NotAGroup,
}

impl fmt::Display for InvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singular => f.write_str("transform is not invertible (singular linear part)"),
            Self::NotAGroup => f.write_str("value has no inverse under composition"),
        }
    }
}

impl core::error::Error for InvertError {}

/// A value type with an associative composition rule and an identity.
///
/// `compose` must satisfy `identity().compose(x) == x` and
/// `x.compose(&identity()) == x`. `try_invert`, when it succeeds, must return
/// `y` with `x.compose(&y) == identity()`.
pub trait Composable: Clone + PartialEq {
    /// Returns the identity element.
    fn identity() -> Self;

    /// Returns `self` followed by `later`.
    #[must_use]
    fn compose(&self, later: &Self) -> Self;

    /// Returns the inverse of `self`, if there is one.
    fn try_invert(&self) -> Result<Self, InvertError>;

    /// Maps an arbitrary value into the type's valid domain.
    #[must_use]
    fn normalize(self) -> Self {
        self
    }
}

/// A typed, composable attribute of a scene-graph node.
#[derive(Clone, Debug, PartialEq)]
pub struct Property<V> {
    value: V,
    valid: bool,
    apply_type: ApplyType,
}

impl<V: Composable> Default for Property<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Composable> Property<V> {
    /// Creates a valid identity property with [`ApplyType::Operate`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: V::identity(),
            valid: true,
            apply_type: ApplyType::Operate,
        }
    }

    /// Creates a valid [`Operate`](ApplyType::Operate) property holding `value`.
    #[must_use]
    pub fn from_value(value: V) -> Self {
        Self {
            value: value.normalize(),
            valid: true,
            apply_type: ApplyType::Operate,
        }
    }

    /// Creates a valid [`Replace`](ApplyType::Replace) property holding `value`.
    #[must_use]
    pub fn replacing(value: V) -> Self {
        Self {
            value: value.normalize(),
            valid: true,
            apply_type: ApplyType::Replace,
        }
    }

    /// Resets the value to the identity and marks the property valid.
    ///
    /// The apply type is left unchanged.
    pub fn set_identity(&mut self) {
        self.value = V::identity();
        self.valid = true;
    }

    /// Assigns a new (normalized) value and marks the property valid.
    pub fn set_value(&mut self, value: V) {
        self.value = value.normalize();
        self.valid = true;
    }

    /// Returns the current value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Direct access to the value.
    ///
    /// Neither normalizes nor touches validity; callers keep
    /// [`is_valid`](Self::is_valid) meaningful themselves.
    #[inline]
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Returns whether the value can be trusted.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Overrides the validity flag.
    #[inline]
    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    /// Returns the apply type.
    #[inline]
    #[must_use]
    pub fn apply_type(&self) -> ApplyType {
        self.apply_type
    }

    /// Sets the apply type.
    #[inline]
    pub fn set_apply_type(&mut self, apply_type: ApplyType) {
        self.apply_type = apply_type;
    }

    /// Composes `later` on top of `self`.
    ///
    /// An [`Operate`](ApplyType::Operate) operand combines values and ANDs
    /// validity, keeping `self`'s apply type. A [`Replace`](ApplyType::Replace)
    /// operand overwrites value, validity and apply type.
    pub fn apply(&mut self, later: &Self) {
        match later.apply_type {
            ApplyType::Operate => {
                self.value = self.value.compose(&later.value);
                self.valid &= later.valid;
            }
            ApplyType::Replace => {
                self.value = later.value.clone();
                self.valid = later.valid;
                self.apply_type = ApplyType::Replace;
            }
        }
    }

    /// Returns `self` followed by `later`.
    #[must_use]
    pub fn then(&self, later: &Self) -> Self {
        let mut out = self.clone();
        out.apply(later);
        out
    }

    /// Inverts in place.
    ///
    /// Marks the property invalid if the value has no inverse or the property
    /// is a [`Replace`](ApplyType::Replace). Never marks it valid.
    pub fn invert(&mut self) {
        match self.apply_type {
            ApplyType::Operate => match self.value.try_invert() {
                Ok(inverse) => self.value = inverse,
                Err(_) => self.valid = false,
            },
            ApplyType::Replace => self.valid = false,
        }
    }

    /// Returns the inverse of `self`.
    #[must_use]
    pub fn inverted(&self) -> Self {
        let mut out = self.clone();
        out.invert();
        out
    }
}
