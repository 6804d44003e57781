//! The viewport controller: the owner of every view and of the mapping
//! between the pixel axis and genomic coordinates.
//!
//! A [`Viewport`] is an arena: it owns all [`View`]s in a flat collection,
//! and hands out opaque [`ViewId`] handles. Tracks and UI controls hold
//! handles only and read geometry through accessor methods, so no cyclic
//! object graph ever forms.
//!
//! The two central operations are inverses of each other:
//!
//! - [`Viewport::px_offset_to_coord`] maps a signed pixel offset (relative
//!   to the left edge of the first visible region) to a `(region index,
//!   fractional genomic coordinate)` pair. It never fails: drag gestures
//!   routinely overshoot, so out-of-range input clamps to the outer
//!   chromosome bounds.
//! - [`Viewport::zoom_to_px`] rewrites a view's region windows and
//!   resolution so that the genomic span currently under a pixel window
//!   `[px1, px2]` exactly fills the view. Every zoom and pan operation
//!   funnels through it.
//!
//! All structural state (`region` windows, visible indices, `bp_per_px`) is
//! mutated here and nowhere else; the mutation is fully synchronous, so
//! every track in a subsequent update batch observes the same geometry.

use nonempty::NonEmpty;

use crate::core::Orientation;
use crate::core::Region;
use crate::genome::Genome;
use crate::view::View;
use crate::view::ViewSpec;
use crate::view::builder;

pub mod gate;

pub use gate::MutationGate;
pub use gate::Phase;

/// The minimum ideal pixel width used when resolving the initial
/// resolution.
const MIN_INITIAL_PX: f64 = 800.0;

/// The fraction of the container width considered ideal for the initial
/// layout.
const IDEAL_WIDTH_FRACTION: f64 = 0.63;

/// The slack, in base pairs, tolerated when flooring or ceiling a
/// fractional coordinate. Guards repeated no-op zooms against
/// floating-point drift.
const COORD_EPS: f64 = 1e-6;

/// An error related to a [`Viewport`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// No view specifications were provided.
    NoViews,

    /// The container width is not a positive, finite number of pixels.
    InvalidContainerWidth(String),

    /// A view specification failed to build.
    View(builder::Error),

    /// A zoom fold below two was requested.
    InvalidFold(u32),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoViews => write!(f, "no view specifications were provided"),
            Error::InvalidContainerWidth(width) => {
                write!(f, "invalid container width: {width}")
            }
            Error::View(err) => write!(f, "invalid view: {err}"),
            Error::InvalidFold(fold) => {
                write!(f, "zoom fold must be at least 2, found {fold}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// An opaque handle to a [`View`] within a [`Viewport`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ViewId(usize);

impl ViewId {
    /// Gets the index of the view within its viewport.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

/// The outcome of a zoom gesture.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Zoom {
    /// The zoom was applied.
    Applied,

    /// The view is already at the applicable resolution limit; nothing
    /// changed. This is an expected steady-state condition, not a failure.
    AtLimit,
}

/// The outcome of a pan gesture.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pan {
    /// The pan was applied.
    Panned,

    /// The pan would move past a chromosome bound; nothing changed. This is
    /// an expected steady-state condition, not a failure.
    AtBound,
}

/// The visible range of one region, within a [`ViewRange`] snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionRange {
    /// The chromosome name.
    pub chrom: String,

    /// The visible window start (0-based, inclusive).
    pub start: usize,

    /// The visible window stop (0-based, exclusive).
    pub stop: usize,

    /// The pixel width the window currently occupies.
    pub pixel_width: f64,
}

/// A serializable snapshot of one view's visible range: exactly what
/// tracks and data fetchers need in order to request the visible data.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewRange {
    /// The view this snapshot was taken from.
    pub view: ViewId,

    /// The orientation of the view.
    pub orientation: Orientation,

    /// The pixel gap between adjacent regions.
    pub region_space: f64,

    /// The current resolution, in base pairs per pixel.
    pub bp_per_px: f64,

    /// The visible regions, in pixel order.
    pub regions: Vec<RegionRange>,
}

/// The arena owning every view of a block.
#[derive(Debug)]
pub struct Viewport {
    /// The views, indexed by [`ViewId`].
    views: Vec<View>,
}

impl Viewport {
    /// Attempts to create a new [`Viewport`] from view specifications,
    /// resolving the shared initial resolution.
    ///
    /// Regions carrying an explicit pixel width contribute it to the
    /// resolution; for all remaining regions, one shared resolution is
    /// computed from the ideal pixel width
    /// `max(0.63 * container_width, 800)`. The transient widths are
    /// consumed here and do not survive into the views.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockview::genome::Genome;
    /// use blockview::view::RegionSpec;
    /// use blockview::view::ViewSpec;
    /// use blockview::viewport::Viewport;
    ///
    /// let genome = Genome::builder()
    ///     .name("test")
    ///     .chromosome("chr1", 249_000_000)
    ///     .default_coord("chr1", 0, 10_000)
    ///     .try_build()?;
    ///
    /// let spec = ViewSpec::new(vec![
    ///     RegionSpec::new("chr1", 1_000_000, 1_010_000).with_width(800.0),
    /// ]);
    ///
    /// let viewport = Viewport::try_new(&genome, vec![spec], 1_280.0)?;
    /// let view = viewport.view(viewport.view_ids().next().unwrap());
    ///
    /// assert_eq!(view.bp_per_px(), 12.5);
    /// assert_eq!(view.width(), 800.0);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        genome: &Genome,
        specs: Vec<ViewSpec>,
        container_width: f64,
    ) -> Result<Viewport, Error> {
        if specs.is_empty() {
            return Err(Error::NoViews);
        }

        if !container_width.is_finite() || container_width <= 0.0 {
            return Err(Error::InvalidContainerWidth(container_width.to_string()));
        }

        let mut prepared = Vec::with_capacity(specs.len());
        for spec in &specs {
            prepared.push(spec.prepare(genome).map_err(Error::View)?);
        }

        // (1) Partition the requested base pairs into those covered by an
        // explicit pixel width and those that are not.
        let mut uncovered_bp = 0usize;
        let mut covered_bp = 0usize;
        let mut covered_px = 0.0f64;

        for view in &prepared {
            for (region, width) in view.regions.iter().zip(view.widths.iter()) {
                match width {
                    Some(px) => {
                        covered_bp += region.len();
                        covered_px += px;
                    }
                    None => uncovered_bp += region.len(),
                }
            }
        }

        // (2) Resolve one shared resolution. Regions without an explicit
        // width share the ideal pixel width; if every region is covered,
        // the explicit widths decide.
        let bp_per_px = match uncovered_bp {
            0 => covered_bp as f64 / covered_px,
            _ => {
                let ideal_px = (IDEAL_WIDTH_FRACTION * container_width).max(MIN_INITIAL_PX);
                uncovered_bp as f64 / ideal_px
            }
        };

        let views = prepared
            .into_iter()
            .map(|view| {
                View::new(
                    view.regions,
                    view.orientation,
                    view.region_space,
                    view.right_pad,
                    bp_per_px,
                )
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            views = views.len(),
            bp_per_px,
            "resolved initial viewport resolution"
        );

        Ok(Viewport { views })
    }

    /// Gets a view by handle.
    pub fn view(&self, id: ViewId) -> &View {
        &self.views[id.0]
    }

    /// Returns an iterator over the handles of every view, in layout order.
    pub fn view_ids(&self) -> impl Iterator<Item = ViewId> {
        (0..self.views.len()).map(ViewId)
    }

    /// Gets the handle of the first view.
    pub fn first_view(&self) -> ViewId {
        ViewId(0)
    }

    /// Gets the number of views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Indicates whether the viewport holds no views.
    ///
    /// Note that a viewport built through [`Viewport::try_new`] always holds
    /// at least one view.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Takes the serializable snapshot of every view's visible range.
    pub fn view_ranges(&self) -> Vec<ViewRange> {
        self.view_ids()
            .map(|id| {
                let view = self.view(id);

                ViewRange {
                    view: id,
                    orientation: view.orientation(),
                    region_space: view.region_space(),
                    bp_per_px: view.bp_per_px(),
                    regions: view
                        .visible_regions()
                        .map(|region| RegionRange {
                            chrom: region.chrom().to_string(),
                            start: region.start(),
                            stop: region.stop(),
                            pixel_width: region.len() as f64 / view.bp_per_px(),
                        })
                        .collect(),
                }
            })
            .collect()
    }

    /// Maps a signed pixel offset along a view's pixel axis to a
    /// `(region index, fractional genomic coordinate)` pair.
    ///
    /// The offset is relative to the left edge of the first visible region.
    /// Positive offsets walk rightward from there, negative offsets walk
    /// leftward; walking off either end clamps to the outer chromosome
    /// bound. This function never fails.
    pub fn px_offset_to_coord(&self, id: ViewId, px: f64) -> (usize, f64) {
        px_offset_to_coord(self.view(id), px)
    }

    /// Rewrites a view so that the genomic span currently under the pixel
    /// window `[px1, px2]` exactly fills the view. This is the single mutation
    /// primitive behind every zoom and pan operation.
    ///
    /// The pixel pair need not be sorted. The view's total pixel width is
    /// held constant: only its content changes resolution.
    pub fn zoom_to_px(&mut self, id: ViewId, px1: f64, px2: f64) {
        let view = &mut self.views[id.0];

        let px_start = px1.min(px2);
        let px_stop = px1.max(px2);

        if px_stop - px_start < f64::EPSILON {
            tracing::debug!(%id, px1, px2, "ignoring zero-width zoom window");
            return;
        }

        // (1) Map both pixel edges to fractional genomic coordinates.
        let (ridx1, coord1) = px_offset_to_coord(view, px_start);
        let (ridx2, coord2) = px_offset_to_coord(view, px_stop);

        // (2) Commit the new region windows and accumulate the total base
        // pairs now in the viewport.
        let total_bp = match ridx1 == ridx2 {
            true => set_single_region_window(view, ridx1, coord1, coord2),
            false => set_crossing_region_windows(view, ridx1, coord1, ridx2, coord2),
        };

        // (3) Recompute the resolution, holding the view's pixel width
        // constant across the zoom.
        let spanned = ridx2 - ridx1 + 1;
        let content_px = view.width() - (spanned as f64 - 1.0) * view.region_space();
        debug_assert!(content_px > 0.0);

        view.set_bp_per_px(total_bp as f64 / content_px);
        view.set_visible_range(ridx1, ridx2);
        view.recompute_width();

        tracing::debug!(
            %id,
            px1,
            px2,
            spanned,
            total_bp,
            bp_per_px = view.bp_per_px(),
            "zoomed view to pixel window"
        );
    }

    /// Indicates whether panning by the given pixel delta would move the
    /// boundary region's visible edge past its chromosome bound on the side
    /// being approached.
    pub fn pan_hits_bound(&self, id: ViewId, xoff: f64) -> bool {
        let view = self.view(id);

        if xoff > 0.0 {
            // Revealing content to the pixel left of the anchor region.
            let anchor = view.region(view.start_index());
            match view.orientation() {
                Orientation::Forward => anchor.start() == anchor.bound_start(),
                Orientation::Reverse => anchor.stop() == anchor.bound_stop(),
            }
        } else if xoff < 0.0 {
            // Revealing content to the pixel right of the last region.
            let last = view.region(view.stop_index());
            match view.orientation() {
                Orientation::Forward => last.stop() == last.bound_stop(),
                Orientation::Reverse => last.start() == last.bound_start(),
            }
        } else {
            true
        }
    }

    /// Pans a view by a pixel delta.
    ///
    /// A pan that would move past a chromosome bound is rejected as
    /// [`Pan::AtBound`] without mutating anything (the caller snaps its
    /// translated layers back). Otherwise the shifted window is recomputed
    /// through [`Viewport::zoom_to_px`].
    pub fn pan_by(&mut self, id: ViewId, xoff: f64) -> Pan {
        if self.pan_hits_bound(id, xoff) {
            tracing::debug!(%id, xoff, "pan rejected at chromosome bound");
            return Pan::AtBound;
        }

        let width = self.view(id).width();
        self.zoom_to_px(id, -xoff, width - xoff);

        Pan::Panned
    }

    /// Indicates whether a view can zoom in any further.
    ///
    /// Zooming in is disabled once one base pair would stretch across more
    /// than [`MAX_PX_PER_BP`](crate::view::MAX_PX_PER_BP) pixels; past that
    /// point there is no more detail available.
    pub fn can_zoom_in(&self, id: ViewId) -> bool {
        self.view(id).bp_per_px() > 1.0 / crate::view::MAX_PX_PER_BP
    }

    /// Indicates whether a view can zoom out any further.
    ///
    /// Zooming out is disabled once the visible range already covers each
    /// boundary region's full chromosome extent.
    pub fn can_zoom_out(&self, id: ViewId) -> bool {
        !self.view(id).covers_full_extent()
    }

    /// Zooms in by a fold around the view's horizontal midpoint.
    ///
    /// A fold below two is an invalid argument and is rejected with an
    /// error; a view already at the resolution floor reports
    /// [`Zoom::AtLimit`] without mutating anything.
    pub fn zoom_in(&mut self, id: ViewId, fold: u32) -> Result<Zoom, Error> {
        if fold < 2 {
            return Err(Error::InvalidFold(fold));
        }

        if !self.can_zoom_in(id) {
            return Ok(Zoom::AtLimit);
        }

        let width = self.view(id).width();
        let distance = (width / (fold as f64 * 2.0)).floor();

        if distance < 1.0 {
            return Ok(Zoom::AtLimit);
        }

        let mid = width / 2.0;
        self.zoom_to_px(id, mid - distance, mid + distance);

        Ok(Zoom::Applied)
    }

    /// Zooms out by a fold around the view's horizontal midpoint.
    ///
    /// A fold below two is an invalid argument and is rejected with an
    /// error; a view already showing its regions' full chromosome extents
    /// reports [`Zoom::AtLimit`] without mutating anything.
    pub fn zoom_out(&mut self, id: ViewId, fold: u32) -> Result<Zoom, Error> {
        if fold < 2 {
            return Err(Error::InvalidFold(fold));
        }

        if !self.can_zoom_out(id) {
            return Ok(Zoom::AtLimit);
        }

        let width = self.view(id).width();
        let distance = (width * (fold as f64 - 1.0) / 2.0).floor();

        self.zoom_to_px(id, -distance, width + distance);

        Ok(Zoom::Applied)
    }

    /// Replaces a view's regions with a single freshly parsed region,
    /// holding the view's pixel width constant: the structural half of a
    /// navigate-to-position jump.
    ///
    /// The resolution clamps to the zoom-in floor, so jumping to a tiny
    /// region cannot over-zoom past
    /// [`MAX_PX_PER_BP`](crate::view::MAX_PX_PER_BP).
    pub fn jump_to(&mut self, id: ViewId, region: Region) {
        let view = &mut self.views[id.0];
        let width = view.width();

        let bp_per_px = (region.len() as f64 / width).max(1.0 / crate::view::MAX_PX_PER_BP);

        tracing::debug!(%id, %region, bp_per_px, "jumping view to region");

        view.replace_regions(NonEmpty::new(region));
        view.set_bp_per_px(bp_per_px);
        view.recompute_width();
    }
}

/// Floors a fractional coordinate, forgiving floating-point drift just
/// above an integer.
fn floor_bp(coord: f64) -> f64 {
    (coord + COORD_EPS).floor()
}

/// Ceils a fractional coordinate, forgiving floating-point drift just
/// below an integer.
fn ceil_bp(coord: f64) -> f64 {
    (coord - COORD_EPS).ceil()
}

/// The inverse mapping behind [`Viewport::px_offset_to_coord`].
fn px_offset_to_coord(view: &View, px: f64) -> (usize, f64) {
    match px > 0.0 {
        true => walk_px_right(view, px),
        false => walk_px_left(view, -px),
    }
}

/// Walks rightward from the anchor region's left visible edge until the
/// pixel offset is exhausted, clamping at the last region's outer
/// chromosome bound.
fn walk_px_right(view: &View, px: f64) -> (usize, f64) {
    let last = view.regions().len() - 1;
    let mut ridx = view.start_index();
    let mut px_remaining = px;

    loop {
        let region = view.region(ridx);
        let anchor = ridx == view.start_index();

        // The anchor region enters at its current visible edge; every
        // region after it enters at its full chromosome span.
        let (entry, remaining_bp) = match (view.orientation(), anchor) {
            (Orientation::Forward, true) => (region.start(), region.bound_stop() - region.start()),
            (Orientation::Forward, false) => (region.bound_start(), region.bound_len()),
            (Orientation::Reverse, true) => (region.stop(), region.stop() - region.bound_start()),
            (Orientation::Reverse, false) => (region.bound_stop(), region.bound_len()),
        };

        let remaining_px = remaining_bp as f64 / view.bp_per_px();

        if remaining_px >= px_remaining || ridx == last {
            let delta_bp = (px_remaining * view.bp_per_px()).clamp(0.0, remaining_bp as f64);

            let coord = match view.orientation() {
                Orientation::Forward => entry as f64 + delta_bp,
                Orientation::Reverse => entry as f64 - delta_bp,
            };

            return (ridx, coord);
        }

        px_remaining -= remaining_px + view.region_space();
        ridx += 1;
    }
}

/// Walks leftward from the anchor region's left visible edge until the
/// pixel offset is exhausted, clamping at the first region's outer
/// chromosome bound. The `px` argument is the magnitude of the
/// (non-positive) offset.
fn walk_px_left(view: &View, px: f64) -> (usize, f64) {
    let mut ridx = view.start_index();
    let mut px_remaining = px;

    loop {
        let region = view.region(ridx);
        let anchor = ridx == view.start_index();

        let (entry, remaining_bp) = match (view.orientation(), anchor) {
            (Orientation::Forward, true) => (region.start(), region.start() - region.bound_start()),
            (Orientation::Forward, false) => (region.bound_stop(), region.bound_len()),
            (Orientation::Reverse, true) => (region.stop(), region.bound_stop() - region.stop()),
            (Orientation::Reverse, false) => (region.bound_start(), region.bound_len()),
        };

        let remaining_px = remaining_bp as f64 / view.bp_per_px();

        if remaining_px >= px_remaining || ridx == 0 {
            let delta_bp = (px_remaining * view.bp_per_px()).clamp(0.0, remaining_bp as f64);

            // Walking left runs against the pixel axis, so the coordinate
            // moves opposite to the rightward walk.
            let coord = match view.orientation() {
                Orientation::Forward => entry as f64 - delta_bp,
                Orientation::Reverse => entry as f64 + delta_bp,
            };

            return (ridx, coord);
        }

        px_remaining -= remaining_px + view.region_space();
        ridx -= 1;
    }
}

/// Commits the new window when both zoom edges fall within one region.
/// Returns the total base pairs now in the viewport.
fn set_single_region_window(view: &mut View, ridx: usize, coord1: f64, coord2: f64) -> usize {
    let region = view.region(ridx);
    let bound_start = region.bound_start() as f64;
    let bound_stop = region.bound_stop() as f64;

    let (genomic_lo, genomic_hi) = view.orientation().genomic_order(coord1, coord2);

    let mut start = floor_bp(genomic_lo).max(bound_start) as usize;
    let mut stop = ceil_bp(genomic_hi).min(bound_stop) as usize;

    // Both edges can collapse onto the same integer when the zoom window
    // was clamped entirely against a chromosome bound; keep at least one
    // base pair in the viewport.
    if start == stop {
        match stop < region.bound_stop() {
            true => stop += 1,
            false => start -= 1,
        }
    }

    view.region_mut(ridx).set_window(start, stop);
    stop - start
}

/// Commits the new windows when the zoom edges fall in different regions:
/// both boundary regions clip to their chromosome bound on the side away
/// from the zoom window, and fully spanned regions in between contribute
/// their whole chromosome span. Returns the total base pairs now in the
/// viewport.
fn set_crossing_region_windows(
    view: &mut View,
    ridx1: usize,
    coord1: f64,
    ridx2: usize,
    coord2: f64,
) -> usize {
    let orientation = view.orientation();
    let mut total_bp = 0usize;

    for ridx in ridx1..=ridx2 {
        let region = view.region(ridx);
        let bound_start = region.bound_start();
        let bound_stop = region.bound_stop();

        let (start, stop) = if ridx == ridx1 {
            // The first touched region: its new edge is under the zoom
            // window's left pixel; the far side clips to the chromosome
            // bound in the pixel-rightward direction.
            match orientation {
                Orientation::Forward => {
                    (floor_bp(coord1).max(bound_start as f64) as usize, bound_stop)
                }
                Orientation::Reverse => {
                    (bound_start, ceil_bp(coord1).min(bound_stop as f64) as usize)
                }
            }
        } else if ridx == ridx2 {
            // The last touched region, mirrored.
            match orientation {
                Orientation::Forward => {
                    (bound_start, ceil_bp(coord2).min(bound_stop as f64) as usize)
                }
                Orientation::Reverse => {
                    (floor_bp(coord2).max(bound_start as f64) as usize, bound_stop)
                }
            }
        } else {
            // Fully spanned intermediate regions contribute their whole
            // chromosome span.
            (bound_start, bound_stop)
        };

        view.region_mut(ridx).set_window(start, stop);
        total_bp += stop - start;
    }

    total_bp
}
