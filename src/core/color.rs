//! Player colors.
//!
//! The four colors are fixed. Seat order follows `Color::ALL`: seat 0 is red,
//! seat 1 green, seat 2 yellow, seat 3 blue.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the four Ludo colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    /// All colors in seat order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Yellow, Color::Blue];

    /// Seat index owning this color.
    #[must_use]
    pub const fn seat(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Green => 1,
            Color::Yellow => 2,
            Color::Blue => 3,
        }
    }

    /// Color seated at `seat`, if the seat exists.
    #[must_use]
    pub fn from_seat(seat: usize) -> Option<Color> {
        Color::ALL.get(seat).copied()
    }

    /// Lowercase name, as used in pawn ids and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Color::Red),
            "green" => Ok(Color::Green),
            "yellow" => Ok(Color::Yellow),
            "blue" => Ok(Color::Blue),
            other => Err(format!("unknown color `{other}`")),
        }
    }
}
