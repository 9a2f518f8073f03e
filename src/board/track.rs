//! Track arithmetic: ring indices, safe cells, legal targets and hop paths.
//!
//! Everything here is pure. Locations are relative to the moving pawn's
//! color; the shared ring is indexed globally from red's entry cell.

use smallvec::SmallVec;

use crate::core::{Color, FinishRule, Location};

/// Cells on the shared ring.
pub const RING_LEN: u8 = 52;

/// Ring-global safe cells: each color's entry cell and its arm's star cell.
pub const SAFE_CELLS: [u8; 8] = [0, 8, 13, 21, 26, 34, 39, 47];

/// Die value needed to leave base.
pub const RELEASE_ROLL: u8 = 6;

/// Path of a single move, excluding the starting cell.
pub type HopPath = SmallVec<[Location; 6]>;

/// Global ring index of a color's entry cell.
#[must_use]
pub const fn start_offset(color: Color) -> u8 {
    match color {
        Color::Red => 0,
        Color::Green => 13,
        Color::Yellow => 26,
        Color::Blue => 39,
    }
}

/// Map a color-relative ring index to the global ring index.
///
/// ```
/// use ludo_engine::board::relative_to_global;
/// use ludo_engine::core::Color;
///
/// assert_eq!(relative_to_global(Color::Green, 0), 13);
/// assert_eq!(relative_to_global(Color::Blue, 20), 7);
/// ```
#[must_use]
pub const fn relative_to_global(color: Color, relative: u8) -> u8 {
    ((start_offset(color) as u16 + relative as u16) % RING_LEN as u16) as u8
}

/// Whether a ring cell is immune to capture.
#[must_use]
pub fn is_safe_cell(global: u8) -> bool {
    SAFE_CELLS.contains(&global)
}

/// Global ring index of a pawn, if it is on the ring.
#[must_use]
pub fn ring_cell(color: Color, location: Location) -> Option<u8> {
    location.ring_offset().map(|rel| relative_to_global(color, rel))
}

/// Where a pawn lands with `dice`, or `None` if it cannot move.
#[must_use]
pub fn target_location(location: Location, dice: u8, rule: FinishRule) -> Option<Location> {
    if !(1..=6).contains(&dice) || location.is_home() {
        return None;
    }
    if location.is_in_base() {
        return (dice == RELEASE_ROLL).then_some(Location::START);
    }

    let sum = location.raw() + dice as i8;
    match sum {
        s if s < Location::FINISH_LINE => Location::new(s),
        s if s == Location::FINISH_LINE => Some(Location::HOME),
        _ => match rule {
            FinishRule::OvershootToHome => Some(Location::HOME),
            FinishRule::Exact => None,
        },
    }
}

/// Legality under an explicit finish rule.
#[must_use]
pub fn is_legal_move_with(location: Location, dice: u8, rule: FinishRule) -> bool {
    target_location(location, dice, rule).is_some()
}

/// Legality under the default finish rule (overshoot lands home).
///
/// ```
/// use ludo_engine::board::is_legal_move;
/// use ludo_engine::core::Location;
///
/// assert!(!is_legal_move(Location::BASE, 5));
/// assert!(is_legal_move(Location::BASE, 6));
/// assert!(is_legal_move(Location::new(55).unwrap(), 4));
/// assert!(!is_legal_move(Location::HOME, 1));
/// ```
#[must_use]
pub fn is_legal_move(location: Location, dice: u8) -> bool {
    is_legal_move_with(location, dice, FinishRule::default())
}

/// Cells a pawn passes through, ending at its target.
///
/// Release is a single hop onto the entry cell. Otherwise one hop per cell,
/// stopping at home. Empty when the move is illegal.
#[must_use]
pub fn hop_path(location: Location, dice: u8, rule: FinishRule) -> HopPath {
    let mut path = HopPath::new();
    let Some(target) = target_location(location, dice, rule) else {
        return path;
    };
    if location.is_in_base() {
        path.push(target);
        return path;
    }

    let mut cell = location.raw();
    while cell + 1 < Location::FINISH_LINE && cell < location.raw() + dice as i8 {
        cell += 1;
        if let Some(step) = Location::new(cell) {
            path.push(step);
        }
    }
    if target.is_home() {
        path.push(Location::HOME);
    }
    path
}
