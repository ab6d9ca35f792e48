pub mod post;
pub mod user;

use derive_where::derive_where;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, marker::PhantomData};

/// Identifier of a stored resource, tagged with the resource kind so user and post ids can't be
/// mixed up.
#[derive_where(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Debug,
    Default,
    Hash,
    Serialize,
    Deserialize
)]
#[serde(transparent)]
pub struct Id<Marker>(u64, #[serde(skip)] PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id, PhantomData)
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    /// The id following this one, as handed out by the store's `max + 1` allocation. `None` once
    /// the id space is used up.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self::new)
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<u64> for Id<Marker> {
    fn from(value: u64) -> Self {
        Id::new(value)
    }
}

impl<Marker> From<Id<Marker>> for u64 {
    fn from(value: Id<Marker>) -> Self {
        value.get()
    }
}

/// Response body of a successful delete.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

impl Deleted {
    #[must_use]
    pub fn new() -> Self {
        Self { deleted: true }
    }
}

impl Default for Deleted {
    fn default() -> Self {
        Self::new()
    }
}
