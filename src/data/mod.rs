//! Normalized numeric representations and input conversion.

pub mod container;
pub mod normalize;
pub mod sample;

pub use container::{Column, NumericContainer, Table};
pub use normalize::normalize;
