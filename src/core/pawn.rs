//! Pawns and their track locations.
//!
//! ## Location Encoding
//!
//! A pawn's location is relative to its own color's track:
//! - `-1`: in base, not yet released
//! - `0..=50`: on the shared ring, counted from the color's entry cell
//! - `51..=56`: inside the color's private home stretch
//! - `99`: arrived home (terminal)
//!
//! The integer form is what crosses the wire; `Location` only admits these values.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::color::Color;

/// A validated pawn location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub struct Location(i8);

impl Location {
    /// In base.
    pub const BASE: Location = Location(-1);
    /// The color's entry cell on the ring.
    pub const START: Location = Location(0);
    /// Arrived home.
    pub const HOME: Location = Location(99);

    /// Last relative ring index before the turn into the home stretch.
    pub const LAST_RING: i8 = 50;
    /// First home-stretch index.
    pub const FIRST_STRETCH: i8 = 51;
    /// Last home-stretch index.
    pub const LAST_STRETCH: i8 = 56;
    /// A move summing to this value reaches home exactly.
    pub const FINISH_LINE: i8 = 57;

    /// Validate a raw location.
    #[must_use]
    pub fn new(raw: i8) -> Option<Self> {
        match raw {
            -1 | 99 => Some(Self(raw)),
            0..=56 => Some(Self(raw)),
            _ => None,
        }
    }

    /// The raw integer encoding.
    #[must_use]
    pub const fn raw(self) -> i8 {
        self.0
    }

    #[must_use]
    pub const fn is_in_base(self) -> bool {
        self.0 == -1
    }

    #[must_use]
    pub const fn is_home(self) -> bool {
        self.0 == 99
    }

    /// On the shared ring (where captures happen).
    #[must_use]
    pub const fn is_on_ring(self) -> bool {
        self.0 >= 0 && self.0 <= Self::LAST_RING
    }

    /// Inside the private home stretch.
    #[must_use]
    pub const fn is_in_home_stretch(self) -> bool {
        self.0 >= Self::FIRST_STRETCH && self.0 <= Self::LAST_STRETCH
    }

    /// Relative ring index when on the ring.
    #[must_use]
    pub fn ring_offset(self) -> Option<u8> {
        self.is_on_ring().then_some(self.0 as u8)
    }
}

impl TryFrom<i8> for Location {
    type Error = String;

    fn try_from(raw: i8) -> Result<Self, Self::Error> {
        Location::new(raw).ok_or_else(|| format!("invalid pawn location {raw}"))
    }
}

impl From<Location> for i8 {
    fn from(location: Location) -> Self {
        location.0
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Location::BASE => f.write_str("base"),
            Location::HOME => f.write_str("home"),
            Location(n) => write!(f, "{n}"),
        }
    }
}

/// Stable pawn identifier: owning color plus slot index 0..=3.
///
/// Textual form is `"<color>-<slot>"`, e.g. `red-2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PawnId {
    pub color: Color,
    pub slot: u8,
}

impl PawnId {
    /// Pawns per player.
    pub const SLOTS: u8 = 4;

    /// Create a pawn id. Returns `None` for an out-of-range slot.
    #[must_use]
    pub fn new(color: Color, slot: u8) -> Option<Self> {
        (slot < Self::SLOTS).then_some(Self { color, slot })
    }
}

impl std::fmt::Display for PawnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.color, self.slot)
    }
}

impl FromStr for PawnId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (color, slot) = s
            .split_once('-')
            .ok_or_else(|| format!("malformed pawn id `{s}`"))?;
        let color: Color = color.parse()?;
        let slot: u8 = slot
            .parse()
            .map_err(|_| format!("malformed pawn slot in `{s}`"))?;
        PawnId::new(color, slot).ok_or_else(|| format!("pawn slot out of range in `{s}`"))
    }
}

impl TryFrom<String> for PawnId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PawnId> for String {
    fn from(id: PawnId) -> Self {
        id.to_string()
    }
}

/// A single pawn.
///
/// `slot` is fixed at creation and never reassigned, including when the
/// pawn is captured back to base.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pawn {
    pub id: PawnId,
    pub location: Location,
}

impl Pawn {
    /// A pawn in base.
    #[must_use]
    pub fn new(id: PawnId) -> Self {
        Self {
            id,
            location: Location::BASE,
        }
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.id.color
    }

    #[must_use]
    pub fn slot(&self) -> u8 {
        self.id.slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_validation() {
        assert_eq!(Location::new(-1), Some(Location::BASE));
        assert_eq!(Location::new(99), Some(Location::HOME));
        assert!(Location::new(56).is_some());
        assert!(Location::new(57).is_none());
        assert!(Location::new(-2).is_none());
        assert!(Location::new(98).is_none());
    }

    #[test]
    fn test_location_regions() {
        assert!(Location::BASE.is_in_base());
        assert!(Location::START.is_on_ring());
        assert!(Location::new(50).unwrap().is_on_ring());
        assert!(!Location::new(51).unwrap().is_on_ring());
        assert!(Location::new(51).unwrap().is_in_home_stretch());
        assert!(Location::new(56).unwrap().is_in_home_stretch());
        assert!(!Location::HOME.is_in_home_stretch());
        assert_eq!(Location::new(12).unwrap().ring_offset(), Some(12));
        assert_eq!(Location::new(53).unwrap().ring_offset(), None);
    }

    #[test]
    fn test_location_wire_form_is_integer() {
        let json = serde_json::to_string(&Location::BASE).unwrap();
        assert_eq!(json, "-1");
        assert!(serde_json::from_str::<Location>("70").is_err());
    }

    #[test]
    fn test_pawn_id_text_form() {
        let id = PawnId::new(Color::Green, 3).unwrap();
        assert_eq!(id.to_string(), "green-3");
        assert_eq!("green-3".parse::<PawnId>(), Ok(id));
        assert!("green-4".parse::<PawnId>().is_err());
        assert!("green".parse::<PawnId>().is_err());
        assert!("teal-0".parse::<PawnId>().is_err());
    }

    #[test]
    fn test_pawn_id_serde() {
        let id = PawnId::new(Color::Red, 0).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"red-0\"");
    }

    #[test]
    fn test_new_pawn_in_base() {
        let pawn = Pawn::new(PawnId::new(Color::Blue, 2).unwrap());
        assert!(pawn.location.is_in_base());
        assert_eq!(pawn.slot(), 2);
        assert_eq!(pawn.color(), Color::Blue);
    }
}
