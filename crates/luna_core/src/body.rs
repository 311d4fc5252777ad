//! DE body and quantity identifiers.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

/// Quantities addressable in a JPL DE ephemeris.
///
/// Codes follow the DE numbering used by the data files themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Moon,
    Sun,
    SolarSystemBarycenter,
    EarthMoonBarycenter,
    Nutations,
    Librations,
    LunarMantleOmega,
    TtMinusTdb,
}

impl Body {
    pub const ALL: [Self; 17] = [
        Self::Mercury,
        Self::Venus,
        Self::Earth,
        Self::Mars,
        Self::Jupiter,
        Self::Saturn,
        Self::Uranus,
        Self::Neptune,
        Self::Pluto,
        Self::Moon,
        Self::Sun,
        Self::SolarSystemBarycenter,
        Self::EarthMoonBarycenter,
        Self::Nutations,
        Self::Librations,
        Self::LunarMantleOmega,
        Self::TtMinusTdb,
    ];

    /// DE query code, 1..=17.
    pub const fn code(self) -> u32 {
        match self {
            Self::Mercury => 1,
            Self::Venus => 2,
            Self::Earth => 3,
            Self::Mars => 4,
            Self::Jupiter => 5,
            Self::Saturn => 6,
            Self::Uranus => 7,
            Self::Neptune => 8,
            Self::Pluto => 9,
            Self::Moon => 10,
            Self::Sun => 11,
            Self::SolarSystemBarycenter => 12,
            Self::EarthMoonBarycenter => 13,
            Self::Nutations => 14,
            Self::Librations => 15,
            Self::LunarMantleOmega => 16,
            Self::TtMinusTdb => 17,
        }
    }

    /// Convert a DE query code into a [`Body`].
    pub const fn from_code(code: u32) -> Option<Self> {
        if code >= 1 && code <= 17 {
            Some(Self::ALL[(code - 1) as usize])
        } else {
            None
        }
    }

    /// Whether the code names a point with a position (1..=13).
    pub const fn is_positional(self) -> bool {
        self.code() <= 13
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Mercury => "mercury",
            Self::Venus => "venus",
            Self::Earth => "earth",
            Self::Mars => "mars",
            Self::Jupiter => "jupiter",
            Self::Saturn => "saturn",
            Self::Uranus => "uranus",
            Self::Neptune => "neptune",
            Self::Pluto => "pluto",
            Self::Moon => "moon",
            Self::Sun => "sun",
            Self::SolarSystemBarycenter => "ssb",
            Self::EarthMoonBarycenter => "emb",
            Self::Nutations => "nutations",
            Self::Librations => "librations",
            Self::LunarMantleOmega => "mantle",
            Self::TtMinusTdb => "tt-tdb",
        }
    }
}

impl Display for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised body name or code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown body {0:?}")]
pub struct UnknownBody(pub String);

impl FromStr for Body {
    type Err = UnknownBody;

    /// Accepts the lowercase name or the numeric DE code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if let Ok(code) = lower.parse::<u32>() {
            return Self::from_code(code).ok_or_else(|| UnknownBody(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|b| b.name() == lower)
            .ok_or_else(|| UnknownBody(s.to_string()))
    }
}
