//! The track lifecycle manager: parallel updates, layout reflow, and the
//! advisory busy protocol.
//!
//! A [`TrackSet`] owns every track of a block together with a per-track
//! [`Frame`] of layout bookkeeping (the vertical offset, the reported
//! metrics, the busy flag). Updates are fired concurrently and joined with
//! an all-complete barrier; only after the whole batch resolves do
//! [`TrackSet::settle_width`] and [`TrackSet::settle_height`] run, so a
//! fast track's reflow can never read a slow track's half-updated height.
//!
//! A failing track never blocks the batch: its error is recorded on its
//! frame, its previous metrics keep standing in for layout, and its busy
//! flag clears with everyone else's.

use futures::future::join_all;

use crate::surface::SharedSurface;
use crate::surface::Surface;
use crate::track::Metrics;
use crate::track::Track;
use crate::track::UpdateContext;
use crate::viewport::Viewport;

/// The pad between the left label column and the first view.
const LEFT_PAD: f64 = 10.0;

/// The pad between the last view and the right label column.
const RIGHT_PAD: f64 = 10.0;

/// The minimum width of the left label column.
const MIN_LEFT_COLUMN: f64 = 100.0;

/// The per-track layout bookkeeping owned by the manager.
///
/// The original design stored these fields on the track objects themselves;
/// keeping them here leaves tracks holding nothing but opaque handles.
#[derive(Debug, Default)]
pub struct Frame {
    /// The track's cumulative vertical offset.
    y: f64,

    /// Whether the track is mid-update (or mid-drag). Busy tracks are not
    /// snapped during height settling, preserving their temporarily
    /// translated position.
    busy: bool,

    /// Whether the track is hidden. Hidden tracks are skipped by updates,
    /// layout, and reordering.
    hidden: bool,

    /// The most recent update failure, if any.
    error: Option<String>,

    /// The geometry most recently reported by the track. A failed update
    /// keeps the previous metrics so the layout can still settle.
    metrics: Metrics,
}

impl Frame {
    /// Gets the track's cumulative vertical offset.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Indicates whether the track is mid-update or mid-drag.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Indicates whether the track is hidden.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Gets the most recent update failure, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Gets the geometry most recently reported by the track.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Marks the track busy, for drags and pans.
    pub(crate) fn set_busy(&mut self) {
        self.busy = true;
    }

    /// Clears the busy flag.
    pub(crate) fn clear_busy(&mut self) {
        self.busy = false;
    }
}

/// The aggregate layout dimensions of a block.
#[derive(Debug, Default)]
pub struct Layout {
    /// The shared left label column width.
    left_column: f64,

    /// The shared right label column width.
    right_column: f64,

    /// The total block width.
    width: f64,

    /// The total block height.
    height: f64,

    /// The x offset of each view's left edge, indexed like the viewport's
    /// views.
    view_x: Vec<f64>,
}

impl Layout {
    /// Gets the shared left label column width.
    pub fn left_column(&self) -> f64 {
        self.left_column
    }

    /// Gets the shared right label column width.
    pub fn right_column(&self) -> f64 {
        self.right_column
    }

    /// Gets the total block width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Gets the total block height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Gets the x offset of a view's left edge.
    pub fn view_x(&self, index: usize) -> f64 {
        self.view_x.get(index).copied().unwrap_or(0.0)
    }
}

/// The track lifecycle manager.
#[derive(Debug, Default)]
pub struct TrackSet {
    /// The tracks, in display order.
    tracks: Vec<Box<dyn Track>>,

    /// The per-track layout bookkeeping, parallel to `tracks`.
    frames: Vec<Frame>,

    /// The aggregate layout dimensions.
    layout: Layout,
}

impl TrackSet {
    /// Creates a new, empty track set.
    pub fn new() -> TrackSet {
        TrackSet::default()
    }

    /// Attaches a track: creates its per-view drawing layers and takes over
    /// its layout bookkeeping. Returns the track's index.
    pub fn attach(
        &mut self,
        mut track: Box<dyn Track>,
        viewport: &Viewport,
        surface: &mut dyn Surface,
    ) -> usize {
        for view in viewport.view_ids() {
            track.attach_view(view, surface);
        }

        tracing::debug!(track = track.name(), "attached track");

        self.tracks.push(track);
        self.frames.push(Frame::default());
        self.tracks.len() - 1
    }

    /// Gets the number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Indicates whether the set holds no tracks.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Gets a track by index.
    pub fn track(&self, index: usize) -> &dyn Track {
        &*self.tracks[index]
    }

    /// Gets a track's frame by index.
    pub fn frame(&self, index: usize) -> &Frame {
        &self.frames[index]
    }

    /// Gets a track's frame mutably, for the reorder controller.
    pub(crate) fn frame_mut(&mut self, index: usize) -> &mut Frame {
        &mut self.frames[index]
    }

    /// Gets the aggregate layout dimensions.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Gets the display order of the tracks, by name.
    pub fn order(&self) -> Vec<&str> {
        self.tracks.iter().map(|track| track.name()).collect()
    }

    /// Indicates whether any track is mid-update or mid-drag.
    ///
    /// This is advisory, not enforced: callers of interactive operations
    /// consult it and refuse to start a new structural mutation while it
    /// holds.
    pub fn is_busy(&self) -> bool {
        self.frames.iter().any(|frame| frame.busy)
    }

    /// Hides or reveals a track.
    pub fn set_hidden(&mut self, index: usize, hidden: bool) {
        self.frames[index].hidden = hidden;
    }

    /// Marks every visible track busy, for pan gestures that translate
    /// layers before geometry is recomputed. Hidden tracks are skipped:
    /// they take no part in the update batch that would clear the flag.
    pub(crate) fn set_all_busy(&mut self) {
        for frame in &mut self.frames {
            if !frame.hidden {
                frame.busy = true;
            }
        }
    }

    /// Translates every visible track's layers horizontally, the
    /// zero-latency visual half of a pan gesture.
    pub(crate) fn translate_all_x(&mut self, surface: &mut dyn Surface, dx: f64) {
        for (track, frame) in self.tracks.iter().zip(self.frames.iter()) {
            if frame.hidden {
                continue;
            }

            for (_, layer) in track.view_layers() {
                surface.translate_layer(layer, dx, 0.0);
            }
        }
    }

    /// Swaps two tracks' positions in the display order, frames included.
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.tracks.swap(a, b);
        self.frames.swap(a, b);
    }

    /// Updates every track concurrently, then settles the layout once.
    pub async fn update_all(&mut self, viewport: &Viewport, surface: &SharedSurface) {
        self.update_batch(viewport, surface, |_| true).await
    }

    /// Updates a subset of tracks concurrently, then settles the layout
    /// once.
    pub async fn update_only(
        &mut self,
        indices: &[usize],
        viewport: &Viewport,
        surface: &SharedSurface,
    ) {
        self.update_batch(viewport, surface, |index| indices.contains(&index))
            .await
    }

    /// The shared update path: fire the selected tracks' updates, await the
    /// all-complete barrier, then settle width and height exactly once.
    async fn update_batch(
        &mut self,
        viewport: &Viewport,
        surface: &SharedSurface,
        selected: impl Fn(usize) -> bool,
    ) {
        let ranges = viewport.view_ranges();

        {
            let TrackSet { tracks, frames, .. } = self;

            let updates = tracks
                .iter_mut()
                .zip(frames.iter_mut())
                .enumerate()
                .filter(|(index, (_, frame))| selected(*index) && !frame.hidden)
                .map(|(_, (track, frame))| {
                    // The busy flag rises before the update is issued and
                    // falls as each track's own future resolves.
                    frame.busy = true;

                    let ctx = UpdateContext::new(&ranges, surface);

                    async move {
                        let result = track.update(ctx).await;

                        match result {
                            Ok(metrics) => {
                                frame.metrics = metrics;
                                frame.error = None;
                            }
                            Err(err) => {
                                tracing::warn!(
                                    track = track.name(),
                                    %err,
                                    "track update failed"
                                );
                                frame.error = Some(err.to_string());
                            }
                        }

                        frame.busy = false;
                    }
                })
                .collect::<Vec<_>>();

            join_all(updates).await;
        }

        self.settle_width(viewport, &mut *surface.borrow_mut());
        self.settle_height(&mut *surface.borrow_mut());
    }

    /// Recomputes the shared label columns, the per-view x offsets, and the
    /// total block width.
    pub fn settle_width(&mut self, viewport: &Viewport, surface: &mut dyn Surface) {
        let visible = self.frames.iter().filter(|frame| !frame.hidden);
        let (left_column, right_column) = visible.fold(
            (MIN_LEFT_COLUMN, 0.0f64),
            |(left, right), frame| {
                (
                    left.max(frame.metrics.left_width),
                    right.max(frame.metrics.right_width),
                )
            },
        );

        self.layout.left_column = left_column;
        self.layout.right_column = right_column;

        // The middle width: every view plus its right pad, except that the
        // last view's pad is absorbed by the block-level right pad.
        let mut middle = 0.0;
        let mut view_x = Vec::with_capacity(viewport.len());
        let mut x = self.layout.left_column + LEFT_PAD;

        for id in viewport.view_ids() {
            let view = viewport.view(id);
            view_x.push(x);

            middle += view.width() + view.right_pad();
            x += view.width() + view.right_pad();
        }

        if let Some(last) = viewport.view_ids().last() {
            middle -= viewport.view(last).right_pad();
        }

        self.layout.view_x = view_x;
        self.layout.width =
            self.layout.left_column + LEFT_PAD + middle + RIGHT_PAD + self.layout.right_column;

        surface.resize(self.layout.width, self.layout.height);

        tracing::debug!(
            width = self.layout.width,
            left_column = self.layout.left_column,
            "settled block width"
        );
    }

    /// Walks the tracks in display order, assigning each its cumulative
    /// vertical offset and snapping its layers into place, except for busy
    /// tracks, whose temporarily translated position is preserved until
    /// their own update resolves.
    pub fn settle_height(&mut self, surface: &mut dyn Surface) {
        let mut y = 0.0;

        for (track, frame) in self.tracks.iter().zip(self.frames.iter_mut()) {
            if frame.hidden {
                continue;
            }

            y += frame.metrics.top_pad;
            frame.y = y;

            if !frame.busy {
                for (view, layer) in track.view_layers() {
                    let x = self
                        .layout
                        .view_x
                        .get(view.index())
                        .copied()
                        .unwrap_or(0.0);
                    surface.set_layer_offset(layer, x, y);
                }
            }

            y += frame.metrics.height - frame.metrics.top_pad;
        }

        self.layout.height = y;
        surface.resize(self.layout.width, self.layout.height);

        tracing::debug!(height = self.layout.height, "settled block height");
    }
}
