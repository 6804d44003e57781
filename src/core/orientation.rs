//! The orientation in which a view lays out genomic coordinates.

use std::io;
use std::str::FromStr;

/// An error related to the parsing of an orientation.
#[derive(Debug)]
pub struct ParseOrientationError(io::Error);

impl std::fmt::Display for ParseOrientationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse orientation error: {}", self.0)
    }
}

impl std::error::Error for ParseOrientationError {}

/// The direction in which increasing pixel offsets map to genomic
/// coordinates within a view.
///
/// Every place in the crate that must distinguish the two directions
/// consults this value through [`Orientation::genomic_order`] (or one of the
/// small helpers built upon it) rather than branching on a boolean, so that
/// the forward and reverse code paths cannot silently diverge.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Orientation {
    /// Pixel-increasing order maps to genomic-coordinate-increasing order
    /// (`+`).
    Forward,
    /// Pixel-increasing order maps to genomic-coordinate-decreasing order
    /// (`-`), used for reverse-strand display.
    Reverse,
}

impl Orientation {
    /// Indicates whether this is the reverse orientation.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockview::core::Orientation;
    ///
    /// assert!(!Orientation::Forward.is_reverse());
    /// assert!(Orientation::Reverse.is_reverse());
    /// ```
    pub fn is_reverse(&self) -> bool {
        matches!(self, Orientation::Reverse)
    }

    /// Orders a pixel-ordered pair of genomic coordinates into genomic
    /// order, returning `(lower, upper)`.
    ///
    /// The arguments must be given in pixel order (the coordinate under the
    /// smaller pixel offset first). For [`Orientation::Forward`], pixel
    /// order _is_ genomic order; for [`Orientation::Reverse`], the pair is
    /// flipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockview::core::Orientation;
    ///
    /// assert_eq!(Orientation::Forward.genomic_order(10.0, 20.0), (10.0, 20.0));
    /// assert_eq!(Orientation::Reverse.genomic_order(20.0, 10.0), (10.0, 20.0));
    /// ```
    pub fn genomic_order(&self, px_lower: f64, px_upper: f64) -> (f64, f64) {
        match self {
            Orientation::Forward => (px_lower, px_upper),
            Orientation::Reverse => (px_upper, px_lower),
        }
    }

    /// Orders a genomic-ordered pair of coordinates into pixel order: the
    /// coordinate under the smaller pixel offset first.
    ///
    /// This is the inverse of [`Orientation::genomic_order`] (the two happen
    /// to be the same flip, but call sites read better when they name the
    /// order they want).
    ///
    /// # Examples
    ///
    /// ```
    /// use blockview::core::Orientation;
    ///
    /// assert_eq!(Orientation::Forward.pixel_order(10.0, 20.0), (10.0, 20.0));
    /// assert_eq!(Orientation::Reverse.pixel_order(10.0, 20.0), (20.0, 10.0));
    /// ```
    pub fn pixel_order(&self, genomic_lower: f64, genomic_upper: f64) -> (f64, f64) {
        match self {
            Orientation::Forward => (genomic_lower, genomic_upper),
            Orientation::Reverse => (genomic_upper, genomic_lower),
        }
    }
}

impl FromStr for Orientation {
    type Err = ParseOrientationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Forward),
            "-" => Ok(Self::Reverse),
            c => Err(ParseOrientationError(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is not a valid orientation", c),
            ))),
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Forward => write!(f, "+"),
            Orientation::Reverse => write!(f, "-"),
        }
    }
}
