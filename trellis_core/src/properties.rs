// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bundles of properties composed element-wise.
//!
//! A scene graph attaches one [`PropertySet`] to every node. Two shapes are
//! provided:
//!
//! - Tuples of property sets, `(A,)` through `(A, B, C, D)`. These form an
//!   open-ended heterogeneous list with positional access. Since every
//!   [`Property`] is itself a property set, tuples of properties and nested
//!   tuples both work.
//! - [`NodeProperties`], the fixed record used by the overlay UI, with named
//!   accessors for its transform, alpha mask and name.
//!
//! Composition and inversion are pointwise. Each element tracks its own
//! validity: a tuple whose alpha mask became invalid through inversion still
//! carries a perfectly usable transform.

use alloc::string::String;

use crate::alpha::AlphaMask;
use crate::property::{
    AffineTransformProperty, AlphaMaskProperty, Composable, NameProperty, Property,
};
use crate::transform::Transform3d;

/// An ordered, fixed-arity bundle of composable properties.
pub trait PropertySet: Clone {
    /// Returns the bundle with every element at its identity.
    fn identity() -> Self;

    /// Composes `later` on top of `self`, element by element.
    fn apply(&mut self, later: &Self);

    /// Inverts every element independently.
    fn invert(&mut self);

    /// Whether every element is valid.
    fn is_valid(&self) -> bool;

    /// Returns `self` followed by `later`.
    #[must_use]
    fn then(&self, later: &Self) -> Self {
        let mut out = self.clone();
        out.apply(later);
        out
    }

    /// Returns the element-wise inverse.
    #[must_use]
    fn inverted(&self) -> Self {
        let mut out = self.clone();
        out.invert();
        out
    }
}

impl<V: Composable> PropertySet for Property<V> {
    fn identity() -> Self {
        Self::new()
    }

    fn apply(&mut self, later: &Self) {
        Self::apply(self, later);
    }

    fn invert(&mut self) {
        Self::invert(self);
    }

    fn is_valid(&self) -> bool {
        Self::is_valid(self)
    }
}

macro_rules! impl_property_set_for_tuple {
    ($($t:ident $i:tt),+) => {
        impl<$($t: PropertySet),+> PropertySet for ($($t,)+) {
            fn identity() -> Self {
                ($($t::identity(),)+)
            }

            fn apply(&mut self, later: &Self) {
                $(self.$i.apply(&later.$i);)+
            }

            fn invert(&mut self) {
                $(self.$i.invert();)+
            }

            fn is_valid(&self) -> bool {
                true $(&& self.$i.is_valid())+
            }
        }
    };
}

impl_property_set_for_tuple!(A 0);
impl_property_set_for_tuple!(A 0, B 1);
impl_property_set_for_tuple!(A 0, B 1, C 2);
impl_property_set_for_tuple!(A 0, B 1, C 2, D 3);

/// The properties attached to every node of the overlay UI.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeProperties {
    /// Placement relative to the parent.
    pub transform: AffineTransformProperty,
    /// Opacity relative to the parent.
    pub alpha_mask: AlphaMaskProperty,
    /// Diagnostic label.
    pub name: NameProperty,
}

impl NodeProperties {
    /// Identity properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the transform with a valid OPERATE transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform3d) -> Self {
        self.transform = AffineTransformProperty::from_value(transform);
        self
    }

    /// Replaces the alpha mask with a valid OPERATE mask.
    #[must_use]
    pub fn with_alpha_mask(mut self, alpha: f32) -> Self {
        self.alpha_mask = AlphaMaskProperty::from_value(AlphaMask::new(alpha));
        self
    }

    /// Attaches a REPLACE name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = NameProperty::named(name);
        self
    }

    /// The transform property.
    #[inline]
    #[must_use]
    pub fn transform(&self) -> &AffineTransformProperty {
        &self.transform
    }

    /// Mutable access to the transform property.
    #[inline]
    pub fn transform_mut(&mut self) -> &mut AffineTransformProperty {
        &mut self.transform
    }

    /// The alpha mask property.
    #[inline]
    #[must_use]
    pub fn alpha_mask(&self) -> &AlphaMaskProperty {
        &self.alpha_mask
    }

    /// Mutable access to the alpha mask property.
    #[inline]
    pub fn alpha_mask_mut(&mut self) -> &mut AlphaMaskProperty {
        &mut self.alpha_mask
    }

    /// The name property.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &NameProperty {
        &self.name
    }

    /// Mutable access to the name property.
    #[inline]
    pub fn name_mut(&mut self) -> &mut NameProperty {
        &mut self.name
    }

    /// Whether transforms and alpha masks agree within `epsilon` and all
    /// flags and names are equal.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        let (t, o) = (&self.transform, &other.transform);
        let (a, b) = (&self.alpha_mask, &other.alpha_mask);
        t.is_valid() == o.is_valid()
            && t.apply_type() == o.apply_type()
            && t.value().abs_diff_eq(o.value(), epsilon)
            && a.is_valid() == b.is_valid()
            && a.apply_type() == b.apply_type()
            && f64::from((a.value().get() - b.value().get()).abs()) <= epsilon
            && self.name == other.name
    }
}

impl PropertySet for NodeProperties {
    fn identity() -> Self {
        Self::default()
    }

    fn apply(&mut self, later: &Self) {
        self.transform.apply(&later.transform);
        self.alpha_mask.apply(&later.alpha_mask);
        self.name.apply(&later.name);
    }

    fn invert(&mut self) {
        self.transform.invert();
        self.alpha_mask.invert();
        self.name.invert();
    }

    fn is_valid(&self) -> bool {
        self.transform.is_valid() && self.alpha_mask.is_valid() && self.name.is_valid()
    }
}

impl From<(AffineTransformProperty, AlphaMaskProperty, NameProperty)> for NodeProperties {
    fn from(
        (transform, alpha_mask, name): (AffineTransformProperty, AlphaMaskProperty, NameProperty),
    ) -> Self {
        Self {
            transform,
            alpha_mask,
            name,
        }
    }
}

impl From<NodeProperties> for (AffineTransformProperty, AlphaMaskProperty, NameProperty) {
    fn from(p: NodeProperties) -> Self {
        (p.transform, p.alpha_mask, p.name)
    }
}
