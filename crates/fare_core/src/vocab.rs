//! Closed categorical vocabularies and the normalizer that maps raw labels onto them.
//!
//! Membership is exact string equality. Anything outside a vocabulary becomes
//! that vocabulary's `Unknown` sentinel; there is no case folding and no
//! partial matching.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel label used for values outside a vocabulary
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A closed categorical vocabulary
pub trait Category: Sized + Copy + Eq + 'static {
    /// Named members, in listing order (excludes the sentinel)
    const ALL: &'static [Self];

    /// Value substituted for labels outside the vocabulary
    const UNKNOWN: Self;

    /// Field name used for feature naming and explanations
    const FIELD: &'static str;

    fn as_str(&self) -> &'static str;

    /// Exact membership lookup over the named members
    fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|value| value.as_str() == raw)
    }

    /// Returns the member matching `raw`, or the `Unknown` sentinel
    fn normalize(raw: &str) -> Self {
        Self::from_label(raw).unwrap_or(Self::UNKNOWN)
    }

    fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

/// Operating carrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Airline {
    Vistara,
    #[serde(rename = "Air_India")]
    AirIndia,
    Indigo,
    #[serde(rename = "GO_FIRST")]
    GoFirst,
    AirAsia,
    SpiceJet,
    Unknown,
}

impl Category for Airline {
    const ALL: &'static [Self] = &[
        Self::Vistara,
        Self::AirIndia,
        Self::Indigo,
        Self::GoFirst,
        Self::AirAsia,
        Self::SpiceJet,
    ];
    const UNKNOWN: Self = Self::Unknown;
    const FIELD: &'static str = "airline";

    fn as_str(&self) -> &'static str {
        match self {
            Self::Vistara => "Vistara",
            Self::AirIndia => "Air_India",
            Self::Indigo => "Indigo",
            Self::GoFirst => "GO_FIRST",
            Self::AirAsia => "AirAsia",
            Self::SpiceJet => "SpiceJet",
            Self::Unknown => UNKNOWN_LABEL,
        }
    }
}

/// Origin or destination city.
///
/// `Unknown` only appears for out-of-vocabulary rows in historical data; the
/// request boundary accepts named cities only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum City {
    Delhi,
    Mumbai,
    Bangalore,
    Kolkata,
    Hyderabad,
    Chennai,
    Unknown,
}

impl Category for City {
    const ALL: &'static [Self] = &[
        Self::Delhi,
        Self::Mumbai,
        Self::Bangalore,
        Self::Kolkata,
        Self::Hyderabad,
        Self::Chennai,
    ];
    const UNKNOWN: Self = Self::Unknown;
    const FIELD: &'static str = "city";

    fn as_str(&self) -> &'static str {
        match self {
            Self::Delhi => "Delhi",
            Self::Mumbai => "Mumbai",
            Self::Bangalore => "Bangalore",
            Self::Kolkata => "Kolkata",
            Self::Hyderabad => "Hyderabad",
            Self::Chennai => "Chennai",
            Self::Unknown => UNKNOWN_LABEL,
        }
    }
}

/// Departure or arrival time band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeBand {
    #[serde(rename = "Early_Morning")]
    EarlyMorning,
    Morning,
    Afternoon,
    Evening,
    Night,
    #[serde(rename = "Late_Night")]
    LateNight,
    Unknown,
}

impl Category for TimeBand {
    const ALL: &'static [Self] = &[
        Self::EarlyMorning,
        Self::Morning,
        Self::Afternoon,
        Self::Evening,
        Self::Night,
        Self::LateNight,
    ];
    const UNKNOWN: Self = Self::Unknown;
    const FIELD: &'static str = "time";

    fn as_str(&self) -> &'static str {
        match self {
            Self::EarlyMorning => "Early_Morning",
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Night => "Night",
            Self::LateNight => "Late_Night",
            Self::Unknown => UNKNOWN_LABEL,
        }
    }
}

/// Number of stops. Closed vocabulary without a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stops {
    Zero,
    One,
    TwoOrMore,
}

impl Stops {
    pub const ALL: [Stops; 3] = [Stops::Zero, Stops::One, Stops::TwoOrMore];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::TwoOrMore => "two_or_more",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }

    /// Numeric code fed to the model
    pub fn code(&self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::TwoOrMore => 2,
        }
    }
}

/// Cabin class. Closed vocabulary without a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CabinClass {
    Economy,
    Business,
}

impl CabinClass {
    pub const ALL: [CabinClass; 2] = [CabinClass::Economy, CabinClass::Business];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Business => "Business",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw)
    }

    /// Numeric code fed to the model
    pub fn code(&self) -> u8 {
        match self {
            Self::Economy => 0,
            Self::Business => 1,
        }
    }
}

macro_rules! impl_display {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display!(Airline, City, TimeBand, Stops, CabinClass);

fn labels<C: Category>(include_unknown: bool) -> Vec<String> {
    let mut out: Vec<String> = C::ALL.iter().map(|c| c.as_str().to_string()).collect();
    if include_unknown {
        out.push(UNKNOWN_LABEL.to_string());
    }
    out
}

/// Allowed values per request field, as published by the metadata endpoint
pub fn allowed_values() -> BTreeMap<&'static str, Vec<String>> {
    BTreeMap::from([
        ("airline", labels::<Airline>(true)),
        ("city", labels::<City>(false)),
        ("time", labels::<TimeBand>(true)),
        (
            "stops",
            Stops::ALL.iter().map(|s| s.as_str().to_string()).collect(),
        ),
        (
            "class",
            CabinClass::ALL.iter().map(|c| c.as_str().to_string()).collect(),
        ),
    ])
}
