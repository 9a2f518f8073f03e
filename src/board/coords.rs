//! Presentation coordinates on the 15x15 board grid.
//!
//! Only renderers need these; the rules never look at `(x, y)`.

use crate::core::{Color, Location};

use super::track::{ring_cell, HopPath};

/// Grid cell `(x, y)`, origin top-left.
pub type Coordinate = (u8, u8);

/// Ring cells in global order, starting at red's entry cell and running clockwise.
pub const RING_PATH: [Coordinate; 52] = [
    // red arm, outbound
    (1, 6), (2, 6), (3, 6), (4, 6), (5, 6),
    // up green's arm
    (6, 5), (6, 4), (6, 3), (6, 2), (6, 1), (6, 0),
    (7, 0), (8, 0),
    // down green's arm
    (8, 1), (8, 2), (8, 3), (8, 4), (8, 5),
    // out along yellow's arm
    (9, 6), (10, 6), (11, 6), (12, 6), (13, 6), (14, 6),
    (14, 7), (14, 8),
    // back along yellow's arm
    (13, 8), (12, 8), (11, 8), (10, 8), (9, 8),
    // down blue's arm
    (8, 9), (8, 10), (8, 11), (8, 12), (8, 13), (8, 14),
    (7, 14), (6, 14),
    // up blue's arm
    (6, 13), (6, 12), (6, 11), (6, 10), (6, 9),
    // out along red's arm
    (5, 8), (4, 8), (3, 8), (2, 8), (1, 8), (0, 8),
    (0, 7), (0, 6),
];

/// Home-stretch cells for relative locations 51..=56.
#[must_use]
pub const fn home_stretch(color: Color) -> [Coordinate; 6] {
    match color {
        Color::Red => [(1, 7), (2, 7), (3, 7), (4, 7), (5, 7), (6, 7)],
        Color::Green => [(7, 1), (7, 2), (7, 3), (7, 4), (7, 5), (7, 6)],
        Color::Yellow => [(13, 7), (12, 7), (11, 7), (10, 7), (9, 7), (8, 7)],
        Color::Blue => [(7, 13), (7, 12), (7, 11), (7, 10), (7, 9), (7, 8)],
    }
}

/// The four base slots of a color's quadrant.
#[must_use]
pub const fn base_slots(color: Color) -> [Coordinate; 4] {
    match color {
        Color::Red => [(1, 1), (1, 4), (4, 1), (4, 4)],
        Color::Green => [(10, 1), (10, 4), (13, 1), (13, 4)],
        Color::Yellow => [(10, 10), (10, 13), (13, 10), (13, 13)],
        Color::Blue => [(1, 10), (1, 13), (4, 10), (4, 13)],
    }
}

/// Where finished pawns of a color are drawn.
#[must_use]
pub const fn center_cell(color: Color) -> Coordinate {
    match color {
        Color::Red => (6, 7),
        Color::Green => (7, 6),
        Color::Yellow => (8, 7),
        Color::Blue => (7, 8),
    }
}

/// Board coordinate of a pawn.
///
/// ```
/// use ludo_engine::board::coordinate_of;
/// use ludo_engine::core::{Color, Location};
///
/// assert_eq!(coordinate_of(Color::Green, Location::START, 0), (8, 1));
/// assert_eq!(coordinate_of(Color::Red, Location::BASE, 3), (4, 4));
/// ```
#[must_use]
pub fn coordinate_of(color: Color, location: Location, slot: u8) -> Coordinate {
    if location.is_in_base() {
        return base_slots(color)[slot as usize % 4];
    }
    if location.is_home() {
        return center_cell(color);
    }
    if location.is_in_home_stretch() {
        return home_stretch(color)[(location.raw() - Location::FIRST_STRETCH) as usize];
    }
    match ring_cell(color, location) {
        Some(global) => RING_PATH[global as usize],
        None => center_cell(color),
    }
}

/// Coordinates for a hop path, for replaying a move cell by cell.
#[must_use]
pub fn path_coordinates(color: Color, path: &HopPath, slot: u8) -> Vec<Coordinate> {
    path.iter().map(|&loc| coordinate_of(color, loc, slot)).collect()
}
