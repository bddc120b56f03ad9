//! Display names for the small integer codes carried in packets.
//!
//! None of these are consulted by the decoder; decoded records keep the raw
//! codes and presentation layers map them here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::generation::Generation;

/// Wheel position, in the order used by every four-element wheel array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tyre {
    RL = 0,
    RR = 1,
    FL = 2,
    FR = 3,
}

/// Wheel array order.
pub const TYRES: [Tyre; 4] = [Tyre::RL, Tyre::RR, Tyre::FL, Tyre::FR];

impl Tyre {
    /// Index into a wheel array (`tyres_pressure`, `wheel_speed`, ...).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        TYRES.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Tyre::RL => "rear left",
            Tyre::RR => "rear right",
            Tyre::FL => "front left",
            Tyre::FR => "front right",
        }
    }
}

impl fmt::Display for Tyre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const TRACKS: [&str; 33] = [
    "Melbourne",
    "Paul Ricard",
    "Shanghai",
    "Sakhir",
    "Catalunya",
    "Monaco",
    "Montreal",
    "Silverstone",
    "Hockenheim",
    "Hungaroring",
    "Spa",
    "Monza",
    "Singapore",
    "Suzuka",
    "Abu Dhabi",
    "Texas",
    "Brazil",
    "Austria",
    "Sochi",
    "Mexico",
    "Baku",
    "Sakhir Short",
    "Silverstone Short",
    "Texas Short",
    "Suzuka Short",
    "Hanoi",
    "Zandvoort",
    "Imola",
    "Portimão",
    "Jeddah",
    "Miami",
    "Las Vegas",
    "Losail",
];

/// Track name for a session's `track_id`. `-1` and unmapped ids are
/// `"Unknown"`.
pub fn track_name(track_id: i8) -> &'static str {
    usize::try_from(track_id)
        .ok()
        .and_then(|idx| TRACKS.get(idx).copied())
        .unwrap_or("Unknown")
}

const SESSION_TYPES_2022: [&str; 14] = [
    "Unknown",
    "Practice 1",
    "Practice 2",
    "Practice 3",
    "Short Practice",
    "Qualifying 1",
    "Qualifying 2",
    "Qualifying 3",
    "Short Qualifying",
    "One-Shot Qualifying",
    "Race",
    "Race 2",
    "Race 3",
    "Time Trial",
];

const SESSION_TYPES_2024: [&str; 19] = [
    "Unknown",
    "Practice 1",
    "Practice 2",
    "Practice 3",
    "Short Practice",
    "Qualifying 1",
    "Qualifying 2",
    "Qualifying 3",
    "Short Qualifying",
    "One-Shot Qualifying",
    "Sprint Shootout 1",
    "Sprint Shootout 2",
    "Sprint Shootout 3",
    "Short Sprint Shootout",
    "One-Shot Sprint Shootout",
    "Race",
    "Race 2",
    "Race 3",
    "Time Trial",
];

/// Session type name. The numbering changed when sprint shootouts were
/// added, so the generation is required.
pub fn session_type_name(generation: Generation, session_type: u8) -> &'static str {
    let table: &[&str] = match generation {
        Generation::F2022 => &SESSION_TYPES_2022,
        Generation::F2024 => &SESSION_TYPES_2024,
    };
    table
        .get(usize::from(session_type))
        .copied()
        .unwrap_or("Unknown")
}

/// Name of an `actual_tyre_compound` code.
pub fn actual_compound_name(compound: u8) -> &'static str {
    match compound {
        7 => "Intermediate",
        8 => "Wet",
        9 => "Dry (classic)",
        10 => "Wet (classic)",
        11 => "Super Soft (F2)",
        12 => "Soft (F2)",
        13 => "Medium (F2)",
        14 => "Hard (F2)",
        15 => "Wet (F2)",
        16 => "C5",
        17 => "C4",
        18 => "C3",
        19 => "C2",
        20 => "C1",
        21 => "C0",
        _ => "Unknown",
    }
}

/// Name of a `visual_tyre_compound` code.
pub fn visual_compound_name(compound: u8) -> &'static str {
    match compound {
        7 => "Intermediate",
        8 => "Wet",
        15 => "Wet (F2)",
        16 => "Soft",
        17 => "Medium",
        18 => "Hard",
        19 => "Super Soft (F2)",
        20 => "Soft (F2)",
        21 => "Medium (F2)",
        22 => "Hard (F2)",
        _ => "Unknown",
    }
}

pub fn weather_name(weather: u8) -> &'static str {
    match weather {
        0 => "Clear",
        1 => "Light Cloud",
        2 => "Overcast",
        3 => "Light Rain",
        4 => "Heavy Rain",
        5 => "Storm",
        _ => "Unknown",
    }
}
