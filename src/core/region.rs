//! A contiguous genomic interval with fixed chromosome bounds and a mutable
//! viewport window.
//!
//! A [`Region`] is created once, at block initialization, with its bounds
//! pinned to the full extent of its chromosome. From then on, only the
//! current window (`start`/`stop`) moves, and only the viewport controller
//! moves it. The window is 0-based and half-open, and can never leave the
//! bounds:
//!
//! ```text
//! bound_start <= start <= stop <= bound_stop
//! ```
//!
//! This invariant is checked once at every external-input boundary (here, in
//! [`Region::try_new`]); interior mutations are debug-asserted only, since a
//! violation there is a programming error rather than bad input.

use crate::core::Chrom;
use crate::core::Position;

/// An error related to a region.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The window extends outside of the chromosome bounds.
    OutOfBounds {
        /// The offending window.
        window: (Position, Position),
        /// The chromosome bounds the window must fall within.
        bounds: (Position, Position),
    },
    /// The window start is greater than the window stop.
    InvertedWindow(Position, Position),
    /// The chromosome name is empty.
    EmptyChrom,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::OutOfBounds { window, bounds } => write!(
                f,
                "window {}-{} falls outside of chromosome bounds {}-{}",
                window.0, window.1, bounds.0, bounds.1
            ),
            Error::InvertedWindow(start, stop) => {
                write!(f, "window start {} is greater than window stop {}", start, stop)
            }
            Error::EmptyChrom => write!(f, "chromosome name cannot be empty"),
        }
    }
}

impl std::error::Error for Error {}

/// One contiguous genomic interval currently considered part of a view.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Region {
    /// The chromosome upon which this region is located.
    chrom: Chrom,

    /// The lower chromosome bound, fixed at creation.
    bound_start: Position,

    /// The upper chromosome bound, fixed at creation.
    bound_stop: Position,

    /// The current window start (0-based, inclusive).
    start: Position,

    /// The current window stop (0-based, exclusive).
    stop: Position,
}

impl Region {
    /// Attempts to create a new [`Region`].
    ///
    /// # Examples
    ///
    /// ```
    /// use blockview::core::Region;
    /// use blockview::core::region::Error;
    ///
    /// let region = Region::try_new("chr1", 0, 249_000_000, 1_000_000, 1_010_000)?;
    /// assert_eq!(region.len(), 10_000);
    ///
    /// let err = Region::try_new("chr1", 0, 1_000, 500, 2_000).unwrap_err();
    /// assert!(matches!(err, Error::OutOfBounds { .. }));
    ///
    /// let err = Region::try_new("chr1", 0, 1_000, 800, 200).unwrap_err();
    /// assert!(matches!(err, Error::InvertedWindow(_, _)));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        chrom: impl Into<Chrom>,
        bound_start: Position,
        bound_stop: Position,
        start: Position,
        stop: Position,
    ) -> Result<Region, Error> {
        let chrom = chrom.into();

        // (1) The chromosome name must be non-empty.
        if chrom.is_empty() {
            return Err(Error::EmptyChrom);
        }

        // (2) The window must not be inverted.
        if start > stop {
            return Err(Error::InvertedWindow(start, stop));
        }

        // (3) The window must fall within the chromosome bounds.
        if start < bound_start || stop > bound_stop {
            return Err(Error::OutOfBounds {
                window: (start, stop),
                bounds: (bound_start, bound_stop),
            });
        }

        Ok(Region {
            chrom,
            bound_start,
            bound_stop,
            start,
            stop,
        })
    }

    /// Gets the chromosome name.
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// Gets the lower chromosome bound.
    pub fn bound_start(&self) -> Position {
        self.bound_start
    }

    /// Gets the upper chromosome bound.
    pub fn bound_stop(&self) -> Position {
        self.bound_stop
    }

    /// Gets the current window start (0-based, inclusive).
    pub fn start(&self) -> Position {
        self.start
    }

    /// Gets the current window stop (0-based, exclusive).
    pub fn stop(&self) -> Position {
        self.stop
    }

    /// Gets the number of base pairs in the current window.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockview::core::Region;
    ///
    /// let region = Region::try_new("chr1", 0, 1_000, 100, 350)?;
    /// assert_eq!(region.len(), 250);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    /// Indicates whether the current window is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    /// Gets the number of base pairs between the chromosome bounds.
    pub fn bound_len(&self) -> usize {
        self.bound_stop - self.bound_start
    }

    /// Indicates whether the current window covers the full chromosome
    /// bounds.
    pub fn covers_bounds(&self) -> bool {
        self.start == self.bound_start && self.stop == self.bound_stop
    }

    /// Sets the current window.
    ///
    /// This is the single interior mutation point for a region, reserved for
    /// the viewport controller. The window invariant is debug-asserted: the
    /// controller clamps to the chromosome bounds before ever calling this.
    pub(crate) fn set_window(&mut self, start: Position, stop: Position) {
        debug_assert!(start <= stop, "window inverted: {}-{}", start, stop);
        debug_assert!(
            self.bound_start <= start && stop <= self.bound_stop,
            "window {}-{} outside bounds {}-{}",
            start,
            stop,
            self.bound_start,
            self.bound_stop
        );

        self.start = start;
        self.stop = stop;
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.stop)
    }
}
