//! Core functionality used across the crate.

pub mod orientation;
pub mod region;

pub use orientation::Orientation;
pub use region::Region;

/// A contiguous molecule upon which a region is located.
pub type Chrom = String;
/// The exact, 0-based position upon a chromosome.
pub type Position = usize;
