//! Bot policy for non-human seats.

pub mod policy;

pub use policy::{decide, BaseFirst, FirstLegal, MovePolicy, UniformRandom};
