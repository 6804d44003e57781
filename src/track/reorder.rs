//! Drag-based vertical track reordering.
//!
//! A drag is a little state machine layered on the manager's `y`/height
//! bookkeeping: while the pointer moves, the dragged track's layers are
//! translated directly for immediate feedback (no data refetch); once the
//! accumulated delta exceeds the adjacent visible track's row height, the
//! two tracks swap places, the un-dragged track snaps to its new offset,
//! and the drag anchor resets so further movement is relative to the new
//! position.
//!
//! The dragged track is marked busy for the duration of the drag, which is
//! exactly what keeps [`TrackSet::settle_height`] from snapping it while
//! the pointer is still down.

use crate::surface::Surface;
use crate::track::Kind;
use crate::track::TrackSet;

/// An error related to starting a drag.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// No track exists at the given index.
    NoSuchTrack(usize),

    /// The ruler cannot be dragged.
    RulerPinned,

    /// A hidden track cannot be dragged.
    HiddenTrack(usize),

    /// Another interactive operation is in flight.
    Busy,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NoSuchTrack(index) => write!(f, "no track at index {index}"),
            Error::RulerPinned => write!(f, "the ruler cannot be dragged"),
            Error::HiddenTrack(index) => {
                write!(f, "the track at index {index} is hidden")
            }
            Error::Busy => write!(f, "another interactive operation is in flight"),
        }
    }
}

impl std::error::Error for Error {}

/// An in-progress track drag.
#[derive(Debug)]
pub struct DragReorder {
    /// The dragged track's current index in the display order.
    index: usize,

    /// The accumulated drag delta since the last swap (or since the drag
    /// began).
    dy: f64,

    /// Whether any swap has happened during this drag.
    moved: bool,
}

impl DragReorder {
    /// Begins a drag on the track at the given index.
    ///
    /// The ruler and hidden tracks are not draggable, and a drag cannot
    /// start while any track is busy.
    pub fn begin(tracks: &mut TrackSet, index: usize) -> Result<DragReorder, Error> {
        if index >= tracks.len() {
            return Err(Error::NoSuchTrack(index));
        }

        if tracks.track(index).kind() == Kind::Ruler {
            return Err(Error::RulerPinned);
        }

        if tracks.frame(index).is_hidden() {
            return Err(Error::HiddenTrack(index));
        }

        if tracks.is_busy() {
            return Err(Error::Busy);
        }

        tracks.frame_mut(index).set_busy();

        tracing::debug!(track = tracks.track(index).name(), "drag began");

        Ok(DragReorder {
            index,
            dy: 0.0,
            moved: false,
        })
    }

    /// Gets the dragged track's current index in the display order.
    pub fn track_index(&self) -> usize {
        self.index
    }

    /// Applies a pointer movement: translates the dragged track
    /// immediately, and swaps it past the adjacent visible track whenever
    /// the accumulated delta exceeds that track's row height.
    pub fn drag_by(&mut self, tracks: &mut TrackSet, surface: &mut dyn Surface, dy: f64) {
        self.dy += dy;

        for (_, layer) in tracks.track(self.index).view_layers() {
            surface.translate_layer(layer, 0.0, dy);
        }

        // A fast pointer can cross more than one neighbor between events.
        loop {
            if self.dy > 0.0 {
                let below = match next_visible_below(tracks, self.index) {
                    Some(below) => below,
                    None => break,
                };

                let threshold = tracks.frame(below).metrics().height;
                if self.dy <= threshold {
                    break;
                }

                self.swap_with(tracks, surface, below);
                self.dy -= threshold;
            } else if self.dy < 0.0 {
                let above = match next_visible_above(tracks, self.index) {
                    Some(above) => above,
                    None => break,
                };

                // The ruler's slot at the top of the block is never swapped
                // into.
                if tracks.track(above).kind() == Kind::Ruler {
                    break;
                }

                let threshold = tracks.frame(above).metrics().height;
                if -self.dy <= threshold {
                    break;
                }

                self.swap_with(tracks, surface, above);
                self.dy += threshold;
            } else {
                break;
            }
        }
    }

    /// Ends the drag: the dragged track snaps to its final offset, and the
    /// caller learns whether the display order changed (so it can fire its
    /// order-changed notification).
    pub fn release(self, tracks: &mut TrackSet, surface: &mut dyn Surface) -> bool {
        tracks.frame_mut(self.index).clear_busy();
        tracks.settle_height(surface);

        tracing::debug!(
            track = tracks.track(self.index).name(),
            moved = self.moved,
            "drag released"
        );

        self.moved
    }

    /// Swaps the dragged track with a neighbor and re-settles so the
    /// un-dragged track (and everything below) snaps to its new offset;
    /// the dragged track itself is busy and stays where the pointer put
    /// it.
    fn swap_with(&mut self, tracks: &mut TrackSet, surface: &mut dyn Surface, neighbor: usize) {
        tracing::debug!(
            dragged = tracks.track(self.index).name(),
            neighbor = tracks.track(neighbor).name(),
            "tracks swapped during drag"
        );

        tracks.swap(self.index, neighbor);
        tracks.settle_height(surface);

        self.index = neighbor;
        self.moved = true;
    }
}

/// Finds the nearest non-hidden track below the given index.
fn next_visible_below(tracks: &TrackSet, index: usize) -> Option<usize> {
    (index + 1..tracks.len()).find(|&candidate| !tracks.frame(candidate).is_hidden())
}

/// Finds the nearest non-hidden track above the given index.
fn next_visible_above(tracks: &TrackSet, index: usize) -> Option<usize> {
    (0..index)
        .rev()
        .find(|&candidate| !tracks.frame(candidate).is_hidden())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::executor::block_on;

    use super::*;
    use crate::genome::Genome;
    use crate::surface::Recording;
    use crate::surface::SharedSurface;
    use crate::track::Ruler;
    use crate::track::Template;
    use crate::viewport::Viewport;
    use crate::view::RegionSpec;
    use crate::view::ViewSpec;

    /// A viewport with a single 10,000 bp region over 800 px.
    fn viewport() -> Viewport {
        let genome = Genome::builder()
            .name("test")
            .chromosome("chr1", 249_000_000)
            .default_coord("chr1", 0, 10_000)
            .try_build()
            .unwrap();

        let spec = ViewSpec::new(vec![
            RegionSpec::new("chr1", 1_000_000, 1_010_000).with_width(800.0),
        ]);

        Viewport::try_new(&genome, vec![spec], 1_280.0).unwrap()
    }

    /// Three settled template tracks with heights 30, 40, and 50.
    fn three_tracks(
        viewport: &Viewport,
        shared: &SharedSurface,
    ) -> TrackSet {
        let mut tracks = TrackSet::new();

        for (name, height) in [("alpha", 30.0), ("beta", 40.0), ("gamma", 50.0)] {
            tracks.attach(
                Box::new(Template::new(name, Kind::Template, height)),
                viewport,
                &mut *shared.borrow_mut(),
            );
        }

        block_on(tracks.update_all(viewport, shared));
        tracks
    }

    #[test]
    fn test_dragging_past_the_neighbor_swaps_the_two_tracks() {
        let viewport = viewport();
        let recording = Rc::new(RefCell::new(Recording::new()));
        let shared: SharedSurface = recording.clone();
        let mut tracks = three_tracks(&viewport, &shared);

        // Dragging the 30 px track down 45 px crosses the 40 px track
        // below it.
        let mut drag = DragReorder::begin(&mut tracks, 0).unwrap();
        drag.drag_by(&mut tracks, &mut *shared.borrow_mut(), 45.0);

        assert_eq!(drag.track_index(), 1);

        let moved = drag.release(&mut tracks, &mut *shared.borrow_mut());
        assert!(moved);

        assert_eq!(tracks.order(), vec!["beta", "alpha", "gamma"]);
        assert_eq!(tracks.frame(0).y(), 0.0);
        assert_eq!(tracks.frame(1).y(), 40.0);
        assert_eq!(tracks.frame(2).y(), 70.0);
        assert!(!tracks.is_busy());
    }

    #[test]
    fn test_dragging_upward_mirrors_the_swap() {
        let viewport = viewport();
        let recording = Rc::new(RefCell::new(Recording::new()));
        let shared: SharedSurface = recording.clone();
        let mut tracks = three_tracks(&viewport, &shared);

        // Dragging the 50 px track up 45 px crosses the 40 px track above
        // it.
        let mut drag = DragReorder::begin(&mut tracks, 2).unwrap();
        drag.drag_by(&mut tracks, &mut *shared.borrow_mut(), -45.0);
        let moved = drag.release(&mut tracks, &mut *shared.borrow_mut());

        assert!(moved);
        assert_eq!(tracks.order(), vec!["alpha", "gamma", "beta"]);
    }

    #[test]
    fn test_a_small_drag_snaps_back_without_reordering() {
        let viewport = viewport();
        let recording = Rc::new(RefCell::new(Recording::new()));
        let shared: SharedSurface = recording.clone();
        let mut tracks = three_tracks(&viewport, &shared);

        let (_, layer) = tracks.track(0).view_layers()[0];
        let home = recording.borrow().layer_offset(layer).unwrap();

        let mut drag = DragReorder::begin(&mut tracks, 0).unwrap();
        drag.drag_by(&mut tracks, &mut *shared.borrow_mut(), 25.0);

        // Mid-drag, the layer is visually displaced.
        assert_eq!(
            recording.borrow().layer_offset(layer),
            Some((home.0, home.1 + 25.0))
        );

        let moved = drag.release(&mut tracks, &mut *shared.borrow_mut());

        assert!(!moved);
        assert_eq!(tracks.order(), vec!["alpha", "beta", "gamma"]);
        assert_eq!(recording.borrow().layer_offset(layer), Some(home));
    }

    #[test]
    fn test_one_large_drag_can_cross_two_neighbors() {
        let viewport = viewport();
        let recording = Rc::new(RefCell::new(Recording::new()));
        let shared: SharedSurface = recording.clone();
        let mut tracks = three_tracks(&viewport, &shared);

        // 95 px crosses the 40 px neighbor and then the 50 px one.
        let mut drag = DragReorder::begin(&mut tracks, 0).unwrap();
        drag.drag_by(&mut tracks, &mut *shared.borrow_mut(), 95.0);
        drag.release(&mut tracks, &mut *shared.borrow_mut());

        assert_eq!(tracks.order(), vec!["beta", "gamma", "alpha"]);
    }

    #[test]
    fn test_the_ruler_is_pinned() {
        let viewport = viewport();
        let recording = Rc::new(RefCell::new(Recording::new()));
        let shared: SharedSurface = recording.clone();

        let mut tracks = TrackSet::new();
        tracks.attach(
            Box::new(Ruler::new()),
            &viewport,
            &mut *shared.borrow_mut(),
        );
        tracks.attach(
            Box::new(Template::new("alpha", Kind::Signal, 30.0)),
            &viewport,
            &mut *shared.borrow_mut(),
        );
        block_on(tracks.update_all(&viewport, &shared));

        // The ruler itself cannot be dragged.
        let err = DragReorder::begin(&mut tracks, 0).unwrap_err();
        assert_eq!(err, Error::RulerPinned);

        // And nothing can be dragged up into its slot.
        let mut drag = DragReorder::begin(&mut tracks, 1).unwrap();
        drag.drag_by(&mut tracks, &mut *shared.borrow_mut(), -500.0);
        let moved = drag.release(&mut tracks, &mut *shared.borrow_mut());

        assert!(!moved);
        assert_eq!(tracks.order(), vec!["ruler", "alpha"]);
    }

    #[test]
    fn test_hidden_neighbors_are_skipped_when_swapping() {
        let viewport = viewport();
        let recording = Rc::new(RefCell::new(Recording::new()));
        let shared: SharedSurface = recording.clone();
        let mut tracks = three_tracks(&viewport, &shared);

        // With "beta" hidden, dragging "alpha" down is measured against
        // "gamma" (50 px): 45 px is not enough...
        tracks.set_hidden(1, true);

        let mut drag = DragReorder::begin(&mut tracks, 0).unwrap();
        drag.drag_by(&mut tracks, &mut *shared.borrow_mut(), 45.0);
        assert!(!drag.release(&mut tracks, &mut *shared.borrow_mut()));

        // ...but 55 px is.
        let mut drag = DragReorder::begin(&mut tracks, 0).unwrap();
        drag.drag_by(&mut tracks, &mut *shared.borrow_mut(), 55.0);
        assert!(drag.release(&mut tracks, &mut *shared.borrow_mut()));

        assert_eq!(tracks.order(), vec!["gamma", "beta", "alpha"]);
    }

    #[test]
    fn test_a_drag_cannot_begin_while_tracks_are_busy() {
        let viewport = viewport();
        let recording = Rc::new(RefCell::new(Recording::new()));
        let shared: SharedSurface = recording.clone();
        let mut tracks = three_tracks(&viewport, &shared);

        tracks.frame_mut(2).set_busy();

        let err = DragReorder::begin(&mut tracks, 0).unwrap_err();
        assert_eq!(err, Error::Busy);

        let err = DragReorder::begin(&mut tracks, 9).unwrap_err();
        assert_eq!(err, Error::NoSuchTrack(9));
    }
}
