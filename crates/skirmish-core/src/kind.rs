//! The closed set of actor kinds and their per-kind constants.
//!
//! Behaviour differences between kinds are data, not types: every kind
//! maps to a [`KindProfile`] in a fixed lookup table.

use std::fmt;
use std::str::FromStr;

use crate::error::KindError;

/// Category of an actor.
///
/// The numeric discriminant is the kind code used by roster files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ActorKind {
    /// Predator: hunts Pegasi, is hunted by Knights.
    Dragon = 1,
    /// Guardian: hunts Dragons, is never attacked.
    Knight = 2,
    /// Prey: never attacks, is hunted by Dragons.
    Pegasus = 3,
}

/// Per-kind movement and combat constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindProfile {
    /// Distance covered along each axis by a single movement step.
    pub move_range: i32,
    /// Maximum Euclidean distance at which this kind can attack.
    pub kill_range: i32,
    /// Human-readable label, also the default actor name.
    pub label: &'static str,
    /// Single-character glyph used by the map renderer.
    pub symbol: char,
}

const DRAGON: KindProfile = KindProfile {
    move_range: 50,
    kill_range: 30,
    label: "Dragon",
    symbol: 'D',
};

const KNIGHT: KindProfile = KindProfile {
    move_range: 30,
    kill_range: 10,
    label: "Knight",
    symbol: 'K',
};

const PEGASUS: KindProfile = KindProfile {
    move_range: 30,
    kill_range: 10,
    label: "Pegasus",
    symbol: 'P',
};

impl ActorKind {
    /// Every kind, in code order.
    pub const ALL: [ActorKind; 3] = [ActorKind::Dragon, ActorKind::Knight, ActorKind::Pegasus];

    /// The constant profile for this kind.
    pub const fn profile(self) -> &'static KindProfile {
        match self {
            Self::Dragon => &DRAGON,
            Self::Knight => &KNIGHT,
            Self::Pegasus => &PEGASUS,
        }
    }

    /// Numeric code written to roster files.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Resolve a roster-file kind code.
    pub fn from_code(code: u8) -> Result<Self, KindError> {
        match code {
            1 => Ok(Self::Dragon),
            2 => Ok(Self::Knight),
            3 => Ok(Self::Pegasus),
            _ => Err(KindError::UnknownCode { code }),
        }
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        self.profile().label
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ActorKind {
    type Err = KindError;

    /// Accepts the label (any case) or the numeric kind code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Self::from_code(code).map_err(|_| KindError::Unknown {
                input: s.to_string(),
            });
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| KindError::Unknown {
                input: s.to_string(),
            })
    }
}
