//! Format generations.
//!
//! Each game release defines its own header layout and its own full set of
//! packet schemas; the generation is read from the first two header bytes.

use core::fmt;

use serde::{Deserialize, Serialize};

pub const PACKET_FORMAT_2022: u16 = 2022;
pub const PACKET_FORMAT_2024: u16 = 2024;

/// Header size of the 2022 layout (no `game_year`, no `overall_frame_identifier`).
pub const HEADER_SIZE_2022: usize = 24;
/// Header size of the 2024 layout.
pub const HEADER_SIZE_2024: usize = 29;

/// Smallest header any known generation can carry.
pub const MIN_HEADER_SIZE: usize = HEADER_SIZE_2022;

/// A supported packet-format generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Generation {
    /// F1 22 (`packet_format` 2022).
    F2022,
    /// F1 24 (`packet_format` 2024).
    F2024,
}

impl Generation {
    pub const ALL: [Generation; 2] = [Generation::F2022, Generation::F2024];

    pub const fn from_packet_format(packet_format: u16) -> Option<Self> {
        match packet_format {
            PACKET_FORMAT_2022 => Some(Generation::F2022),
            PACKET_FORMAT_2024 => Some(Generation::F2024),
            _ => None,
        }
    }

    pub const fn packet_format(self) -> u16 {
        match self {
            Generation::F2022 => PACKET_FORMAT_2022,
            Generation::F2024 => PACKET_FORMAT_2024,
        }
    }

    pub const fn header_size(self) -> usize {
        match self {
            Generation::F2022 => HEADER_SIZE_2022,
            Generation::F2024 => HEADER_SIZE_2024,
        }
    }

    /// Whether the header carries `game_year` and `overall_frame_identifier`.
    pub const fn has_extended_header(self) -> bool {
        matches!(self, Generation::F2024)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F1 {}", self.packet_format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packet_format_round_trips() {
        for generation in Generation::ALL {
            assert_eq!(
                Generation::from_packet_format(generation.packet_format()),
                Some(generation)
            );
        }
        assert_eq!(Generation::from_packet_format(2023), None);
        assert_eq!(Generation::from_packet_format(0), None);
    }

    #[test]
    fn header_sizes() {
        assert_eq!(Generation::F2022.header_size(), 24);
        assert_eq!(Generation::F2024.header_size(), 29);
        assert!(Generation::ALL.iter().all(|g| g.header_size() >= MIN_HEADER_SIZE));
        assert_eq!(Generation::F2024.to_string(), "F1 2024");
    }
}
