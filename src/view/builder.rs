//! Specifications from which views are built.
//!
//! A [`ViewSpec`] describes one view's worth of requested regions; the
//! [`Viewport`](crate::viewport::Viewport) consumes a list of them at block
//! initialization, resolves the shared initial resolution, and produces the
//! actual [`View`](crate::view::View) values. Requested pixel widths are
//! transient: they participate in resolving the initial resolution and are
//! dropped once it is fixed.

use nonempty::NonEmpty;

use crate::core::Orientation;
use crate::core::Position;
use crate::core::Region;
use crate::genome::Genome;
use crate::position;
use crate::position::InvalidRegion;
use crate::view::DEFAULT_REGION_SPACE;
use crate::view::DEFAULT_RIGHT_PAD;
use crate::view::MAX_PX_PER_BP;

/// An error related to building a view from its specification.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The specification contains no regions.
    EmptyView,

    /// A region failed validation against the genome reference.
    InvalidRegion(InvalidRegion),

    /// A region's window contains no base pairs.
    EmptyRegion(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EmptyView => write!(f, "view specification contains no regions"),
            Error::InvalidRegion(err) => write!(f, "invalid region: {err}"),
            Error::EmptyRegion(region) => {
                write!(f, "region {region} contains no base pairs")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A requested region within a view specification.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionSpec {
    /// The chromosome name.
    chrom: String,

    /// The requested window start (0-based, inclusive).
    start: Position,

    /// The requested window stop (0-based, exclusive).
    stop: Position,

    /// An explicit pixel width for the region, if any. Consumed during
    /// initial-resolution resolution and dropped thereafter.
    width: Option<f64>,
}

impl RegionSpec {
    /// Creates a new region specification.
    pub fn new(chrom: impl Into<String>, start: Position, stop: Position) -> RegionSpec {
        RegionSpec {
            chrom: chrom.into(),
            start,
            stop,
            width: None,
        }
    }

    /// Sets an explicit pixel width for the region.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Gets the chromosome name.
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// Gets the requested window start.
    pub fn start(&self) -> Position {
        self.start
    }

    /// Gets the requested window stop.
    pub fn stop(&self) -> Position {
        self.stop
    }

    /// Gets the explicit pixel width, if any.
    pub fn width(&self) -> Option<f64> {
        self.width
    }
}

/// A specification for one view.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewSpec {
    /// The requested regions, in geometry order.
    regions: Vec<RegionSpec>,

    /// The orientation of the view.
    orientation: Orientation,

    /// The pixel gap between adjacent regions.
    region_space: f64,

    /// The pixel pad to the right of the view.
    right_pad: f64,
}

impl ViewSpec {
    /// Creates a new view specification from its regions.
    pub fn new(regions: Vec<RegionSpec>) -> ViewSpec {
        ViewSpec {
            regions,
            orientation: Orientation::Forward,
            region_space: DEFAULT_REGION_SPACE,
            right_pad: DEFAULT_RIGHT_PAD,
        }
    }

    /// Sets the orientation of the view.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the pixel gap between adjacent regions.
    pub fn with_region_space(mut self, region_space: f64) -> Self {
        self.region_space = region_space;
        self
    }

    /// Sets the pixel pad to the right of the view.
    pub fn with_right_pad(mut self, right_pad: f64) -> Self {
        self.right_pad = right_pad;
        self
    }

    /// Gets the requested regions.
    pub fn regions(&self) -> &[RegionSpec] {
        &self.regions
    }

    /// Gets the orientation of the view.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Validates the specification against a genome reference and prepares
    /// the materials the viewport needs to build the view: the regions
    /// (bounds pinned to their chromosomes) and the clamped transient pixel
    /// widths.
    pub(crate) fn prepare(&self, genome: &Genome) -> Result<Prepared, Error> {
        let mut regions = Vec::with_capacity(self.regions.len());
        let mut widths = Vec::with_capacity(self.regions.len());

        for spec in &self.regions {
            position::validate_region(genome, &spec.chrom, spec.start, spec.stop)
                .map_err(Error::InvalidRegion)?;

            if spec.start == spec.stop {
                return Err(Error::EmptyRegion(format!(
                    "{}:{}-{}",
                    spec.chrom, spec.start, spec.stop
                )));
            }

            // SAFETY: the window was just validated against the reference.
            let chromosome = genome.chromosome(&spec.chrom).unwrap();
            let region =
                Region::try_new(chromosome.name(), 0, chromosome.length(), spec.start, spec.stop)
                    .unwrap();

            // Forbid absurd over-zoom at initialization: an explicit width
            // may not stretch one base pair across more than MAX_PX_PER_BP
            // pixels.
            let width = spec
                .width
                .map(|requested| requested.min(MAX_PX_PER_BP * region.len() as f64));

            regions.push(region);
            widths.push(width);
        }

        let regions = NonEmpty::from_vec(regions).ok_or(Error::EmptyView)?;

        Ok(Prepared {
            regions,
            widths,
            orientation: self.orientation,
            region_space: self.region_space,
            right_pad: self.right_pad,
        })
    }
}

/// The validated materials for one view, ready for resolution.
#[derive(Debug)]
pub(crate) struct Prepared {
    /// The regions, bounds pinned to their chromosomes.
    pub(crate) regions: NonEmpty<Region>,

    /// The clamped transient pixel widths, one per region.
    pub(crate) widths: Vec<Option<f64>>,

    /// The orientation of the view.
    pub(crate) orientation: Orientation,

    /// The pixel gap between adjacent regions.
    pub(crate) region_space: f64,

    /// The pixel pad to the right of the view.
    pub(crate) right_pad: f64,
}
