//! The configuration a block is constructed from, and the fatal errors
//! construction can raise.
//!
//! Construction errors are deliberately all-or-nothing: a block either
//! initializes completely or raises a typed [`InitError`] carrying a
//! human-readable message for the caller to surface (e.g., as a static
//! overlay). No partial initialization is ever attempted.

use crate::position::Basis;
use crate::track::Track;
use crate::view::ViewSpec;
use crate::viewport;

/// A fatal error raised during block construction.
#[derive(Debug)]
pub enum InitError {
    /// The holder's pixel width is not a positive, finite number, so there is
    /// nothing to render into.
    InvalidHolder(String),

    /// No regions were configured.
    NoRegions,

    /// The viewport could not be built from the configured views.
    Viewport(viewport::Error),

    /// The configured track list contains a ruler; the block always
    /// provides its own.
    DuplicateRuler(String),
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitError::InvalidHolder(width) => {
                write!(f, "cannot initialize block: invalid holder width: {width}")
            }
            InitError::NoRegions => {
                write!(f, "cannot initialize block: no regions were configured")
            }
            InitError::Viewport(err) => {
                write!(f, "cannot initialize block: {err}")
            }
            InitError::DuplicateRuler(name) => {
                write!(
                    f,
                    "cannot initialize block: track \"{name}\" is a ruler, and the block always \
                     provides its own"
                )
            }
        }
    }
}

impl std::error::Error for InitError {}

/// The configuration a block is constructed from.
#[derive(Debug)]
pub struct Config {
    /// The views to lay out, in left-to-right order.
    pub(crate) views: Vec<ViewSpec>,

    /// The configured tracks, in display order. The ruler is not included:
    /// the block installs its own at index 0.
    pub(crate) tracks: Vec<Box<dyn Track>>,

    /// The holder's pixel width.
    pub(crate) width: f64,

    /// The coordinate basis used for typed position strings.
    pub(crate) basis: Basis,
}

impl Config {
    /// Creates a new configuration for a holder of the given pixel width.
    pub fn new(width: f64) -> Config {
        Config {
            views: Vec::new(),
            tracks: Vec::new(),
            width,
            basis: Basis::default(),
        }
    }

    /// Pushes a view specification into the configuration.
    pub fn view(mut self, spec: ViewSpec) -> Self {
        self.views.push(spec);
        self
    }

    /// Pushes a track into the configuration.
    pub fn track(mut self, track: Box<dyn Track>) -> Self {
        self.tracks.push(track);
        self
    }

    /// Sets the coordinate basis used for typed position strings.
    pub fn basis(mut self, basis: Basis) -> Self {
        self.basis = basis;
        self
    }
}
