//! Strongly-typed actor handles.

use std::fmt;

/// Handle to an actor inside a [`Population`](crate::Population).
///
/// `ActorId(n)` is the n-th slot of the population arena. Ids are assigned
/// when the population is built and stay stable for the whole run; a
/// population rebuilt from survivors assigns fresh ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

impl ActorId {
    /// The arena slot this handle addresses.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ActorId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
