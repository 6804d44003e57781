//! `blockview` is a crate for laying out and navigating genome-browser
//! "block" views: one or more genomic regions (each potentially
//! discontinuous) rendered as horizontal pixel strips with stacked data
//! tracks that stay precisely aligned to base-pair coordinates under
//! panning, zooming, and track reordering.
//!
//! The crate provides three main points of entry:
//!
//! - The [`viewport::Viewport`]: the algorithmic core, owning the
//!   bidirectional mapping between a continuous pixel axis and a piecewise,
//!   possibly reverse-oriented, multi-region genomic coordinate space. All
//!   zoom and pan operations funnel through
//!   [`viewport::Viewport::zoom_to_px`], with
//!   [`viewport::Viewport::px_offset_to_coord`] as its clamping inverse.
//! - The [`track::TrackSet`]: the track lifecycle manager, firing every
//!   track's asynchronous update concurrently, joining on an all-complete
//!   barrier, and only then settling the shared layout so no track ever
//!   reads another's half-updated geometry.
//! - The [`Block`]: one assembled browser instance, wiring a genome
//!   reference, a viewport, the mandatory ruler track, and the interactive
//!   entry points (navigate, zoom, pan, reorder) behind an advisory
//!   mutation gate.
//!
//! Rendering is abstracted behind the [`surface::Surface`] trait, a flat
//! set of positioned layers carrying primitive marks, so the core runs
//! identically under a DOM adapter, a canvas adapter, or the in-memory
//! [`surface::Recording`] used by tests and demos. Concrete data tracks
//! (coverage signals, feature glyphs, and the like) live outside the crate
//! and implement the [`track::Track`] contract; the [`track::Ruler`] and
//! the minimal [`track::Template`] ship here.
//!
//! Below is a representative session: build a reference, configure a block
//! over one region of chr1, and zoom in twofold.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use blockview::Block;
//! use blockview::Config;
//! use blockview::Genome;
//! use blockview::surface::Recording;
//! use blockview::surface::SharedSurface;
//! use blockview::track::Kind;
//! use blockview::track::Template;
//! use blockview::view::RegionSpec;
//! use blockview::view::ViewSpec;
//! use blockview::viewport::Zoom;
//! use futures::executor::block_on;
//!
//! let genome = Genome::builder()
//!     .name("hg38")
//!     .chromosome("chr1", 248_956_422)
//!     .default_coord("chr1", 1_000_000, 1_010_000)
//!     .try_build()?;
//!
//! let surface: SharedSurface = Rc::new(RefCell::new(Recording::new()));
//!
//! let config = Config::new(1_280.0)
//!     .view(ViewSpec::new(vec![
//!         RegionSpec::new("chr1", 1_000_000, 1_010_000).with_width(800.0),
//!     ]))
//!     .track(Box::new(Template::new("coverage", Kind::Signal, 40.0)));
//!
//! block_on(async {
//!     let mut block = Block::try_new(surface, genome, config).await?;
//!     let view = block.viewport().first_view();
//!
//!     // 10,000 bp over 800 px.
//!     assert_eq!(block.viewport().view(view).bp_per_px(), 12.5);
//!
//!     assert_eq!(block.zoom_in(view, 2).await?, Zoom::Applied);
//!     assert_eq!(block.viewport().view(view).bp_per_px(), 6.25);
//!
//!     Ok::<(), Box<dyn std::error::Error>>(())
//! })?;
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Concurrency model
//!
//! The crate is single-threaded and cooperative: track updates are
//! `LocalBoxFuture`s joined with an all-complete barrier, and the shared
//! surface is an `Rc<RefCell<_>>` whose borrows never span an await point.
//! There is no cancellation: a new interactive gesture is rejected while
//! an earlier one is settling, via the [`viewport::MutationGate`] and the
//! advisory per-track busy flags.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod block;
pub mod core;
pub mod genome;
pub mod position;
pub mod surface;
pub mod track;
pub mod view;
pub mod viewport;

pub use block::Block;
pub use block::Config;
pub use genome::Genome;
