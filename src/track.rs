//! The track contract and the track kinds shipped with the core.
//!
//! A track is a self-contained row renderer: it consumes view geometry,
//! performs its own (possibly asynchronous) data fetch, draws its own marks
//! through the shared [`Surface`](crate::surface::Surface), and reports its
//! geometry back as [`Metrics`]. The core knows nothing about what a track
//! draws; it only schedules updates, lays rows out vertically, and folds
//! label widths into the shared columns.
//!
//! The fixed set of kinds is a tagged variant, [`Kind`], rather than a
//! string field: dispatch happens through the one [`Track`] capability
//! trait, and the kind exists for policy decisions (exactly one
//! [`Kind::Ruler`] sits at index 0 of a block, and the ruler cannot be
//! dragged).
//!
//! ## The update contract
//!
//! [`Track::update`] returns a [`LocalBoxFuture`]: updates are
//! single-threaded, cooperative tasks joined with an all-complete barrier
//! by the [`TrackSet`](crate::track::manager::TrackSet). An implementation
//! must:
//!
//! - re-read the geometry it needs from the provided [`UpdateContext`]
//!   (never cache view geometry across updates);
//! - borrow the surface only for synchronous stretches, never across an
//!   await point;
//! - report fetch failures as [`Error`] values rather than panicking: a
//!   failing track renders its own inline error state, and the layout
//!   settles around its previous height.

use futures::future::LocalBoxFuture;

use crate::surface::LayerId;
use crate::surface::SharedSurface;
use crate::surface::Surface;
use crate::viewport::ViewId;
use crate::viewport::ViewRange;

pub mod manager;
pub mod reorder;
pub mod ruler;
pub mod template;

pub use manager::TrackSet;
pub use reorder::DragReorder;
pub use ruler::Ruler;
pub use template::Template;

/// An error related to a track update.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The track's data fetch failed.
    Fetch(String),

    /// The track failed while drawing.
    Render(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Fetch(reason) => write!(f, "fetch failed: {reason}"),
            Error::Render(reason) => write!(f, "render failed: {reason}"),
        }
    }
}

impl std::error::Error for Error {}

/// The kind of a track.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    /// The coordinate ruler. Exactly one per block, always at index 0.
    Ruler,

    /// A numerical signal track (coverage and the like).
    Signal,

    /// A feature track (genes, repeats, and other positioned glyphs).
    Feature,

    /// Any other track built directly on the template contract.
    Template,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Ruler => write!(f, "ruler"),
            Kind::Signal => write!(f, "signal"),
            Kind::Feature => write!(f, "feature"),
            Kind::Template => write!(f, "template"),
        }
    }
}

impl std::str::FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ruler" => Ok(Kind::Ruler),
            "signal" => Ok(Kind::Signal),
            "feature" => Ok(Kind::Feature),
            "template" => Ok(Kind::Template),
            other => Err(format!("{other} is not a valid track kind")),
        }
    }
}

/// The geometry a track reports back from an update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    /// The full row height, pads included.
    pub height: f64,

    /// The pad above the track's content.
    pub top_pad: f64,

    /// The pad below the track's content.
    pub bottom_pad: f64,

    /// The width of the track's left label column.
    pub left_width: f64,

    /// The width of the track's right label column.
    pub right_width: f64,
}

impl Default for Metrics {
    fn default() -> Self {
        Metrics {
            height: 40.0,
            top_pad: 0.0,
            bottom_pad: 0.0,
            left_width: 0.0,
            right_width: 0.0,
        }
    }
}

/// The read-only context handed to every track update.
#[derive(Clone, Debug)]
pub struct UpdateContext<'a> {
    /// The visible-range snapshot of every view.
    views: &'a [ViewRange],

    /// The shared surface to draw onto.
    surface: &'a SharedSurface,
}

impl<'a> UpdateContext<'a> {
    /// Creates a new update context.
    pub fn new(views: &'a [ViewRange], surface: &'a SharedSurface) -> UpdateContext<'a> {
        UpdateContext { views, surface }
    }

    /// Gets the visible-range snapshot of every view.
    pub fn views(&self) -> &[ViewRange] {
        self.views
    }

    /// Gets the shared surface.
    pub fn surface(&self) -> &SharedSurface {
        self.surface
    }
}

/// The capability interface every concrete track implements.
pub trait Track {
    /// Gets the kind of the track.
    fn kind(&self) -> Kind;

    /// Gets the display name of the track.
    fn name(&self) -> &str;

    /// Called once per view when the track is attached to a block, so the
    /// track can create its per-view drawing layers.
    fn attach_view(&mut self, view: ViewId, surface: &mut dyn Surface);

    /// Gets the track's per-view drawing layers, for the layout manager to
    /// position and translate.
    fn view_layers(&self) -> Vec<(ViewId, LayerId)>;

    /// Re-fetches and redraws the track against the given geometry,
    /// resolving to the track's new [`Metrics`].
    fn update<'a>(&'a mut self, ctx: UpdateContext<'a>) -> LocalBoxFuture<'a, Result<Metrics, Error>>;
}

impl std::fmt::Debug for dyn Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Track")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_strings() -> Result<(), Box<dyn std::error::Error>> {
        for kind in [Kind::Ruler, Kind::Signal, Kind::Feature, Kind::Template] {
            assert_eq!(kind.to_string().parse::<Kind>()?, kind);
        }

        let err = "bigwig".parse::<Kind>().unwrap_err();
        assert_eq!(err, "bigwig is not a valid track kind");

        Ok(())
    }
}
