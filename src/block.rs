//! The block: one genome-browser instance, assembled.
//!
//! A [`Block`] owns the genome reference, the [`Viewport`] arena, the
//! [`TrackSet`], the shared surface, and the mutation gate, and exposes the
//! interactive entry points a UI funnels user gestures through:
//!
//! - type-to-navigate ([`Block::navigate`]),
//! - zoom by fold ([`Block::zoom_in`] / [`Block::zoom_out`]),
//! - drag-to-pan ([`Block::pan_by`]),
//! - drag-to-reorder ([`Block::begin_drag`] / [`Block::drag_by`] /
//!   [`Block::release_drag`]).
//!
//! Every entry point consults the gate first and refuses to overlap an
//! in-flight mutation; structural state is rewritten synchronously and the
//! asynchronous track re-render is awaited before the gate reopens.

use crate::genome::Genome;
use crate::position;
use crate::position::Basis;
use crate::surface::SharedSurface;
use crate::track::DragReorder;
use crate::track::Kind;
use crate::track::Ruler;
use crate::track::TrackSet;
use crate::track::reorder;
use crate::viewport;
use crate::viewport::MutationGate;
use crate::viewport::Pan;
use crate::viewport::ViewId;
use crate::viewport::ViewRange;
use crate::viewport::Viewport;
use crate::viewport::Zoom;
use crate::viewport::gate;

pub mod config;

pub use config::Config;
pub use config::InitError;

/// An error related to an interactive block operation.
#[derive(Debug)]
pub enum Error {
    /// Another structural mutation is in flight.
    Busy(gate::BusyError),

    /// The viewport rejected the operation's arguments.
    Viewport(viewport::Error),

    /// The reorder controller rejected the drag.
    Reorder(reorder::Error),

    /// A drag operation was applied with no drag in progress.
    NoDragInProgress,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Busy(err) => write!(f, "{err}"),
            Error::Viewport(err) => write!(f, "{err}"),
            Error::Reorder(err) => write!(f, "{err}"),
            Error::NoDragInProgress => write!(f, "no drag is in progress"),
        }
    }
}

impl std::error::Error for Error {}

/// The outcome of a navigate request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Navigate {
    /// The input parsed as a position and the first view jumped to it.
    Jumped,

    /// The input did not parse as a position; the caller should fall back
    /// to its gene-name search flow.
    NotFound,
}

/// The hook fired when a drag changes the track order.
type OrderChangedHook = Box<dyn Fn(&[String])>;

/// One genome-browser instance.
pub struct Block {
    /// The genome reference.
    genome: Genome,

    /// The viewport arena.
    viewport: Viewport,

    /// The tracks and their layout bookkeeping.
    tracks: TrackSet,

    /// The shared rendering surface.
    surface: SharedSurface,

    /// The mutation gate serializing interactive gestures.
    gate: MutationGate,

    /// The coordinate basis used for typed position strings.
    basis: Basis,

    /// The drag in progress, if any.
    drag: Option<DragReorder>,

    /// The hook fired when a drag changes the track order.
    on_order_changed: Option<OrderChangedHook>,
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block")
            .field("genome", &self.genome.name())
            .field("views", &self.viewport.len())
            .field("tracks", &self.tracks.order())
            .field("phase", &self.gate.phase())
            .finish_non_exhaustive()
    }
}

impl Block {
    /// Attempts to construct and fully initialize a block: the
    /// configuration is validated, the viewport is built, the ruler is
    /// installed at index 0 followed by every configured track, and the
    /// first update batch runs to completion.
    ///
    /// Construction is all-or-nothing; any failure is a typed
    /// [`InitError`] and nothing is left half-initialized.
    pub async fn try_new(
        surface: SharedSurface,
        genome: Genome,
        config: Config,
    ) -> Result<Block, InitError> {
        let Config {
            views,
            tracks: configured,
            width,
            basis,
        } = config;

        if !width.is_finite() || width <= 0.0 {
            return Err(InitError::InvalidHolder(width.to_string()));
        }

        if views.is_empty() {
            return Err(InitError::NoRegions);
        }

        if let Some(ruler) = configured.iter().find(|track| track.kind() == Kind::Ruler) {
            return Err(InitError::DuplicateRuler(ruler.name().to_string()));
        }

        let viewport = Viewport::try_new(&genome, views, width).map_err(InitError::Viewport)?;

        let mut tracks = TrackSet::new();

        {
            let mut borrowed = surface.borrow_mut();

            // The ruler always occupies index 0, unshifted.
            tracks.attach(Box::new(Ruler::new()), &viewport, &mut *borrowed);

            for track in configured {
                tracks.attach(track, &viewport, &mut *borrowed);
            }
        }

        let mut block = Block {
            genome,
            viewport,
            tracks,
            surface,
            gate: MutationGate::default(),
            basis,
            drag: None,
            on_order_changed: None,
        };

        tracing::info!(
            genome = block.genome.name(),
            views = block.viewport.len(),
            tracks = block.tracks.len(),
            "block initialized"
        );

        block
            .tracks
            .update_all(&block.viewport, &block.surface)
            .await;

        Ok(block)
    }

    /// Gets the genome reference.
    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Gets the viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Gets the tracks and their layout bookkeeping.
    pub fn tracks(&self) -> &TrackSet {
        &self.tracks
    }

    /// Takes the serializable snapshot of every view's visible range.
    pub fn view_ranges(&self) -> Vec<ViewRange> {
        self.viewport.view_ranges()
    }

    /// Indicates whether any interactive operation is in flight, either at
    /// the gate or on an individual track. Advisory: UI controls consult
    /// this to disable themselves.
    pub fn is_busy(&self) -> bool {
        self.gate.is_busy() || self.tracks.is_busy()
    }

    /// Installs the hook fired when a drag changes the track order.
    pub fn on_order_changed(&mut self, hook: impl Fn(&[String]) + 'static) {
        self.on_order_changed = Some(Box::new(hook));
    }

    /// Navigates to a typed position string.
    ///
    /// A string that does not parse as a position reports
    /// [`Navigate::NotFound`] without touching any state, so the caller can
    /// fall back to its gene-name search flow.
    pub async fn navigate(&mut self, input: &str) -> Result<Navigate, Error> {
        let region = match position::parse_position(input, &self.genome, self.basis) {
            Some(region) => region,
            None => return Ok(Navigate::NotFound),
        };

        self.gate.try_begin().map_err(Error::Busy)?;

        tracing::info!(input, %region, "navigating to typed position");

        self.viewport.jump_to(self.viewport.first_view(), region);
        self.gate.begin_settling();

        self.tracks.update_all(&self.viewport, &self.surface).await;
        self.gate.finish();

        Ok(Navigate::Jumped)
    }

    /// Zooms a view to the genomic span currently under the pixel window
    /// `[px1, px2]`: the structural half of a rubber-band zoom gesture.
    pub async fn zoom_to_px(&mut self, view: ViewId, px1: f64, px2: f64) -> Result<(), Error> {
        self.gate.try_begin().map_err(Error::Busy)?;

        self.viewport.zoom_to_px(view, px1, px2);
        self.gate.begin_settling();

        self.tracks.update_all(&self.viewport, &self.surface).await;
        self.gate.finish();

        Ok(())
    }

    /// Zooms a view in by a fold around its midpoint.
    pub async fn zoom_in(&mut self, view: ViewId, fold: u32) -> Result<Zoom, Error> {
        self.gate.try_begin().map_err(Error::Busy)?;

        match self.viewport.zoom_in(view, fold) {
            Err(err) => {
                self.gate.finish();
                Err(Error::Viewport(err))
            }
            Ok(Zoom::AtLimit) => {
                self.gate.finish();
                Ok(Zoom::AtLimit)
            }
            Ok(Zoom::Applied) => {
                self.gate.begin_settling();
                self.tracks.update_all(&self.viewport, &self.surface).await;
                self.gate.finish();
                Ok(Zoom::Applied)
            }
        }
    }

    /// Zooms a view out by a fold around its midpoint.
    pub async fn zoom_out(&mut self, view: ViewId, fold: u32) -> Result<Zoom, Error> {
        self.gate.try_begin().map_err(Error::Busy)?;

        match self.viewport.zoom_out(view, fold) {
            Err(err) => {
                self.gate.finish();
                Err(Error::Viewport(err))
            }
            Ok(Zoom::AtLimit) => {
                self.gate.finish();
                Ok(Zoom::AtLimit)
            }
            Ok(Zoom::Applied) => {
                self.gate.begin_settling();
                self.tracks.update_all(&self.viewport, &self.surface).await;
                self.gate.finish();
                Ok(Zoom::Applied)
            }
        }
    }

    /// Pans a view by a pixel delta.
    ///
    /// A pan that would cross a chromosome bound reports [`Pan::AtBound`]
    /// and leaves everything untouched. Otherwise every track is marked
    /// busy and translated by the delta immediately (zero-latency visual
    /// feedback) before the geometry is recomputed and the tracks
    /// re-render at the corrected position.
    pub async fn pan_by(&mut self, view: ViewId, xoff: f64) -> Result<Pan, Error> {
        self.gate.try_begin().map_err(Error::Busy)?;

        if self.viewport.pan_hits_bound(view, xoff) {
            self.gate.finish();
            return Ok(Pan::AtBound);
        }

        self.tracks.set_all_busy();
        self.tracks
            .translate_all_x(&mut *self.surface.borrow_mut(), xoff);

        let outcome = self.viewport.pan_by(view, xoff);
        debug_assert_eq!(outcome, Pan::Panned);

        self.gate.begin_settling();
        self.tracks.update_all(&self.viewport, &self.surface).await;
        self.gate.finish();

        Ok(Pan::Panned)
    }

    /// Begins a drag on the track at the given index.
    pub fn begin_drag(&mut self, index: usize) -> Result<(), Error> {
        self.gate.try_begin().map_err(Error::Busy)?;

        match DragReorder::begin(&mut self.tracks, index) {
            Ok(drag) => {
                self.drag = Some(drag);
                Ok(())
            }
            Err(err) => {
                self.gate.finish();
                Err(Error::Reorder(err))
            }
        }
    }

    /// Applies a pointer movement to the drag in progress.
    pub fn drag_by(&mut self, dy: f64) -> Result<(), Error> {
        let drag = self.drag.as_mut().ok_or(Error::NoDragInProgress)?;

        drag.drag_by(&mut self.tracks, &mut *self.surface.borrow_mut(), dy);
        Ok(())
    }

    /// Releases the drag in progress, firing the order-changed hook when
    /// the display order actually changed. Returns whether it did.
    pub fn release_drag(&mut self) -> Result<bool, Error> {
        let drag = self.drag.take().ok_or(Error::NoDragInProgress)?;

        let moved = drag.release(&mut self.tracks, &mut *self.surface.borrow_mut());
        self.gate.finish();

        if moved {
            if let Some(hook) = &self.on_order_changed {
                let order = self
                    .tracks
                    .order()
                    .into_iter()
                    .map(String::from)
                    .collect::<Vec<_>>();

                hook(&order);
            }
        }

        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::executor::block_on;

    use super::*;
    use crate::surface::Recording;
    use crate::track::Template;
    use crate::view::RegionSpec;
    use crate::view::ViewSpec;

    /// A small reference shared by the tests in this module.
    fn genome() -> Genome {
        Genome::builder()
            .name("test")
            .chromosome("chr1", 249_000_000)
            .chromosome("chr17", 83_257_441)
            .default_coord("chr1", 1_000_000, 1_010_000)
            .try_build()
            .unwrap()
    }

    /// A fully initialized block with two template tracks.
    fn block() -> (Rc<RefCell<Recording>>, Block) {
        let recording = Rc::new(RefCell::new(Recording::new()));
        let surface: SharedSurface = recording.clone();

        let config = Config::new(1_280.0)
            .view(ViewSpec::new(vec![
                RegionSpec::new("chr1", 1_000_000, 1_010_000).with_width(800.0),
            ]))
            .track(Box::new(Template::new("coverage", Kind::Signal, 40.0)))
            .track(Box::new(Template::new("genes", Kind::Feature, 60.0)));

        let block = block_on(Block::try_new(surface, genome(), config)).unwrap();
        (recording, block)
    }

    #[test]
    fn test_initialization_installs_the_ruler_first_and_settles() {
        let (_, block) = block();

        assert_eq!(block.tracks().order(), vec!["ruler", "coverage", "genes"]);
        assert_eq!(block.tracks().track(0).kind(), Kind::Ruler);
        assert!(!block.is_busy());

        // The ruler reported its height, so the template tracks sit below
        // it.
        assert_eq!(block.tracks().frame(0).y(), 2.0);
        assert_eq!(block.tracks().frame(1).y(), 36.0);
        assert_eq!(block.tracks().frame(2).y(), 76.0);
    }

    #[test]
    fn test_construction_errors_are_fatal_and_typed() {
        let surface: SharedSurface = Rc::new(RefCell::new(Recording::new()));

        // An unusable holder width.
        let config = Config::new(0.0).view(ViewSpec::new(vec![
            RegionSpec::new("chr1", 0, 10_000),
        ]));
        let err = block_on(Block::try_new(surface.clone(), genome(), config)).unwrap_err();
        assert!(matches!(err, InitError::InvalidHolder(_)));

        // No regions at all.
        let config = Config::new(1_280.0);
        let err = block_on(Block::try_new(surface.clone(), genome(), config)).unwrap_err();
        assert!(matches!(err, InitError::NoRegions));

        // A configured ruler collides with the block's own.
        let config = Config::new(1_280.0)
            .view(ViewSpec::new(vec![RegionSpec::new("chr1", 0, 10_000)]))
            .track(Box::new(Ruler::new()));
        let err = block_on(Block::try_new(surface.clone(), genome(), config)).unwrap_err();
        assert!(matches!(err, InitError::DuplicateRuler(_)));
        assert!(err.to_string().contains("provides its own"));

        // An invalid region surfaces the viewport's error.
        let config = Config::new(1_280.0).view(ViewSpec::new(vec![
            RegionSpec::new("chr9", 0, 10_000),
        ]));
        let err = block_on(Block::try_new(surface, genome(), config)).unwrap_err();
        assert!(matches!(err, InitError::Viewport(_)));
    }

    #[test]
    fn test_navigation_jumps_or_falls_back() {
        let (_, mut block) = block();
        let view = block.viewport().first_view();

        // A typed coordinate jumps the first view.
        let outcome = block_on(block.navigate("chr17:7,668,402-7,687,550")).unwrap();
        assert_eq!(outcome, Navigate::Jumped);

        let region = block.viewport().view(view).region(0);
        assert_eq!(region.chrom(), "chr17");
        assert_eq!(region.start(), 7_668_401);
        assert_eq!(region.stop(), 7_687_550);

        // A gene symbol is not a position: the caller falls back to its
        // search flow and the view stays put.
        let outcome = block_on(block.navigate("TP53")).unwrap();
        assert_eq!(outcome, Navigate::NotFound);
        assert_eq!(block.viewport().view(view).region(0).chrom(), "chr17");
    }

    #[test]
    fn test_zoom_gestures_round_trip_through_the_gate() {
        let (_, mut block) = block();
        let view = block.viewport().first_view();

        let before = block.viewport().view(view).bp_per_px();

        assert_eq!(block_on(block.zoom_in(view, 2)).unwrap(), Zoom::Applied);
        assert!(block.viewport().view(view).bp_per_px() < before);
        assert!(!block.is_busy());

        assert_eq!(block_on(block.zoom_out(view, 2)).unwrap(), Zoom::Applied);

        // An invalid fold is rejected synchronously and the gate reopens.
        let err = block_on(block.zoom_in(view, 1)).unwrap_err();
        assert!(matches!(
            err,
            Error::Viewport(viewport::Error::InvalidFold(1))
        ));
        assert!(!block.is_busy());
    }

    #[test]
    fn test_a_rubber_band_zoom_lands_on_the_pixel_window() {
        let (_, mut block) = block();
        let view = block.viewport().first_view();

        block_on(block.zoom_to_px(view, 200.0, 600.0)).unwrap();

        let region = block.viewport().view(view).region(0);
        assert_eq!((region.start(), region.stop()), (1_002_500, 1_007_500));
        assert!(!block.is_busy());
    }

    #[test]
    fn test_pan_applies_or_reports_the_bound() {
        let (_, mut block) = block();
        let view = block.viewport().first_view();

        assert_eq!(block_on(block.pan_by(view, -80.0)).unwrap(), Pan::Panned);

        let region = block.viewport().view(view).region(0);
        assert_eq!((region.start(), region.stop()), (1_001_000, 1_011_000));
        assert!(!block.is_busy());

        // Navigate to the very start of the chromosome, where a rightward
        // pan has nowhere to go.
        block_on(block.navigate("chr1:1-10000")).unwrap();
        assert_eq!(block_on(block.pan_by(view, 80.0)).unwrap(), Pan::AtBound);
        assert!(!block.is_busy());
    }

    #[test]
    fn test_reordering_through_the_block_fires_the_hook() {
        let (_, mut block) = block();

        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        block.on_order_changed(move |order| {
            *sink.borrow_mut() = order.to_vec();
        });

        // Drag "coverage" (40 px) down past "genes" (60 px).
        block.begin_drag(1).unwrap();
        block.drag_by(61.0).unwrap();
        assert!(block.release_drag().unwrap());

        assert_eq!(block.tracks().order(), vec!["ruler", "genes", "coverage"]);
        assert_eq!(
            *seen.borrow(),
            vec![
                String::from("ruler"),
                String::from("genes"),
                String::from("coverage")
            ]
        );

        // A drag cannot begin on the pinned ruler, and the gate reopens
        // after the rejection.
        let err = block.begin_drag(0).unwrap_err();
        assert!(matches!(err, Error::Reorder(reorder::Error::RulerPinned)));
        assert!(!block.is_busy());

        // Drag operations without a drag in progress are rejected.
        assert!(matches!(block.drag_by(5.0), Err(Error::NoDragInProgress)));
        assert!(matches!(
            block.release_drag(),
            Err(Error::NoDragInProgress)
        ));
    }

    #[test]
    fn test_a_drag_holds_the_gate_closed() {
        let (_, mut block) = block();
        let view = block.viewport().first_view();

        block.begin_drag(1).unwrap();

        let err = block_on(block.zoom_in(view, 2)).unwrap_err();
        assert!(matches!(err, Error::Busy(_)));

        block.release_drag().unwrap();
        assert!(block_on(block.zoom_in(view, 2)).is_ok());
    }
}
