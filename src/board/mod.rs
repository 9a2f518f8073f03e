//! Board topology.
//!
//! Stateless mapping between a pawn's color-relative location and the board:
//! - `track`: ring indices, safe cells, legal targets, hop paths
//! - `coords`: 15x15 grid coordinates for renderers

pub mod coords;
pub mod track;

pub use coords::{base_slots, center_cell, coordinate_of, home_stretch, path_coordinates, Coordinate, RING_PATH};
pub use track::{
    hop_path, is_legal_move, is_legal_move_with, is_safe_cell, relative_to_global, ring_cell, start_offset,
    target_location, HopPath, RELEASE_ROLL, RING_LEN, SAFE_CELLS,
};
