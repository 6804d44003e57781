//! A view: an ordered, gap-separated sequence of regions rendered as one
//! continuous horizontal pixel strip.
//!
//! All regions of a view share one resolution (`bp_per_px`), and the
//! currently visible sub-range of regions is bounded by `start_index` and
//! `stop_index` (supporting "zoomed into the middle" multi-region display).
//! A view is created at block initialization and then mutated by every zoom
//! and pan operation; it is never destroyed during a session.

use nonempty::NonEmpty;

use crate::core::Orientation;
use crate::core::Region;

pub mod builder;
pub mod scale;

pub use builder::RegionSpec;
pub use builder::ViewSpec;
pub use scale::Scale;

/// The maximum number of pixels one base pair may occupy.
///
/// Zooming in past this resolution offers no further detail, so interactive
/// zoom-in is disabled at the floor of `1.0 / MAX_PX_PER_BP` base pairs per
/// pixel, and initial layout clamps requested pixel widths accordingly.
pub const MAX_PX_PER_BP: f64 = 20.0;

/// The default pixel gap rendered between adjacent regions of a view.
pub const DEFAULT_REGION_SPACE: f64 = 10.0;

/// The default pixel pad rendered to the right of a view.
pub const DEFAULT_RIGHT_PAD: f64 = 10.0;

/// An ordered sequence of regions rendered as one continuous pixel strip.
#[derive(Clone, Debug)]
pub struct View {
    /// The regions of the view, in geometry order (never reordered).
    regions: NonEmpty<Region>,

    /// The index of the first currently visible region.
    start_index: usize,

    /// The index of the last currently visible region.
    stop_index: usize,

    /// The current resolution, in base pairs per pixel. Shared uniformly
    /// across all visible regions.
    bp_per_px: f64,

    /// The direction in which pixels map to genomic coordinates.
    orientation: Orientation,

    /// The fixed pixel gap between adjacent regions.
    region_space: f64,

    /// The pixel pad to the right of the view.
    right_pad: f64,

    /// The total pixel width of the visible region range, including
    /// inter-region gaps. Derived; recomputed whenever the visible range or
    /// resolution changes.
    width: f64,
}

impl View {
    /// Creates a new view showing every region at the given resolution.
    pub(crate) fn new(
        regions: NonEmpty<Region>,
        orientation: Orientation,
        region_space: f64,
        right_pad: f64,
        bp_per_px: f64,
    ) -> View {
        let stop_index = regions.len() - 1;

        let mut view = View {
            regions,
            start_index: 0,
            stop_index,
            bp_per_px,
            orientation,
            region_space,
            right_pad,
            width: 0.0,
        };

        view.recompute_width();
        view
    }

    /// Gets the regions of the view.
    pub fn regions(&self) -> &NonEmpty<Region> {
        &self.regions
    }

    /// Gets a region by index.
    ///
    /// The index must be within `0..self.regions().len()`; indices only ever
    /// originate from the view itself.
    pub fn region(&self, index: usize) -> &Region {
        // SAFETY: callers pass indices produced by this view.
        self.regions.get(index).unwrap()
    }

    /// Gets the index of the first currently visible region.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Gets the index of the last currently visible region.
    pub fn stop_index(&self) -> usize {
        self.stop_index
    }

    /// Gets the current resolution, in base pairs per pixel.
    pub fn bp_per_px(&self) -> f64 {
        self.bp_per_px
    }

    /// Gets the orientation of the view.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Gets the fixed pixel gap between adjacent regions.
    pub fn region_space(&self) -> f64 {
        self.region_space
    }

    /// Gets the pixel pad to the right of the view.
    pub fn right_pad(&self) -> f64 {
        self.right_pad
    }

    /// Gets the total pixel width of the visible region range, including
    /// inter-region gaps.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns an iterator over the currently visible regions.
    pub fn visible_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions
            .iter()
            .skip(self.start_index)
            .take(self.stop_index - self.start_index + 1)
    }

    /// Gets the total number of base pairs across the currently visible
    /// regions.
    pub fn visible_bp(&self) -> usize {
        self.visible_regions().map(|region| region.len()).sum()
    }

    /// Gets the summed pixel width of the gaps between visible regions.
    pub fn gap_px(&self) -> f64 {
        (self.stop_index - self.start_index) as f64 * self.region_space
    }

    /// Indicates whether the visible range already covers each boundary
    /// region's full chromosome extent (used to disable zooming out).
    pub fn covers_full_extent(&self) -> bool {
        self.region(self.start_index).covers_bounds()
            && self.region(self.stop_index).covers_bounds()
    }

    /// Computes the axis scale for the currently visible regions: one
    /// segment per region, mapping its genomic domain (in pixel order) onto
    /// cumulative pixel offsets including inter-region gaps.
    pub fn scale(&self) -> Scale {
        Scale::of(self)
    }

    /// Gets a mutable region by index, for the viewport controller.
    pub(crate) fn region_mut(&mut self, index: usize) -> &mut Region {
        // SAFETY: callers pass indices produced by this view.
        self.regions.get_mut(index).unwrap()
    }

    /// Sets the visible region range, for the viewport controller.
    pub(crate) fn set_visible_range(&mut self, start_index: usize, stop_index: usize) {
        debug_assert!(start_index <= stop_index && stop_index < self.regions.len());

        self.start_index = start_index;
        self.stop_index = stop_index;
    }

    /// Sets the resolution, for the viewport controller.
    pub(crate) fn set_bp_per_px(&mut self, bp_per_px: f64) {
        debug_assert!(bp_per_px > 0.0);

        self.bp_per_px = bp_per_px;
    }

    /// Replaces the regions of the view wholesale, for navigation jumps.
    pub(crate) fn replace_regions(&mut self, regions: NonEmpty<Region>) {
        self.start_index = 0;
        self.stop_index = regions.len() - 1;
        self.regions = regions;
    }

    /// Recomputes the derived width from the visible base pairs, the
    /// resolution, and the inter-region gaps.
    pub(crate) fn recompute_width(&mut self) {
        self.width = self.visible_bp() as f64 / self.bp_per_px + self.gap_px();
    }
}

#[cfg(test)]
mod tests {
    use nonempty::NonEmpty;

    use super::*;
    use crate::core::Orientation;
    use crate::core::Region;

    /// A two-region view at two base pairs per pixel.
    fn view() -> View {
        let regions = NonEmpty::from_vec(vec![
            Region::try_new("chrA", 0, 1_000, 0, 1_000).unwrap(),
            Region::try_new("chrB", 0, 1_000, 0, 1_000).unwrap(),
        ])
        .unwrap();

        View::new(regions, Orientation::Forward, 10.0, 10.0, 2.0)
    }

    #[test]
    fn test_width_includes_inter_region_gaps() {
        let view = view();

        assert_eq!(view.visible_bp(), 2_000);
        assert_eq!(view.gap_px(), 10.0);
        assert_eq!(view.width(), 1_010.0);
    }

    #[test]
    fn test_full_extent_detection() {
        let mut view = view();
        assert!(view.covers_full_extent());

        view.region_mut(0).set_window(100, 1_000);
        assert!(!view.covers_full_extent());
    }
}
