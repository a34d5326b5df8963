// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Informational node names.

use alloc::string::String;
use core::fmt;

use crate::property::{Composable, InvertError, NameProperty};

/// A diagnostic label.
///
/// The empty name is the identity. Composing keeps the later name unless it
/// is empty, so an unnamed descendant inherits the nearest ancestor's name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Name(String);

impl Name {
    /// Creates a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the empty (identity) name.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Composable for Name {
    fn identity() -> Self {
        Self::default()
    }

    fn compose(&self, later: &Self) -> Self {
        if later.is_empty() {
            self.clone()
        } else {
            later.clone()
        }
    }

    fn try_invert(&self) -> Result<Self, InvertError> {
        if self.is_empty() {
            Ok(Self::default())
        } else {
            Err(InvertError::NotAGroup)
        }
    }
}

impl NameProperty {
    /// Creates a [`Replace`](crate::property::ApplyType::Replace) name
    /// property, the usual way names are attached to nodes.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::replacing(Name::new(name))
    }
}
