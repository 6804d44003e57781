//! The axis scale of a view: per visible region, a genomic domain mapped
//! onto a cumulative pixel range.
//!
//! The scale is a read-only snapshot derived from a [`View`](crate::view::View)
//! whenever its geometry changes. Tracks use it to place marks without any
//! knowledge of the region walk: a segment's domain is given in *pixel*
//! order, so for a reverse-oriented view the first domain edge is the larger
//! genomic coordinate.

use crate::view::View;

/// One visible region's slice of the axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// The index of the region within the view.
    region_index: usize,

    /// The genomic coordinates under the segment's left and right pixel
    /// edges (pixel order, not genomic order).
    domain: (f64, f64),

    /// The pixel offsets of the segment's left and right edges, relative to
    /// the view's left edge.
    range: (f64, f64),
}

impl Segment {
    /// Gets the index of the region within the view.
    pub fn region_index(&self) -> usize {
        self.region_index
    }

    /// Gets the genomic coordinates under the segment's pixel edges, in
    /// pixel order.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Gets the pixel offsets of the segment's edges.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Maps a genomic coordinate to a pixel offset within this segment.
    ///
    /// Returns [`None`] when the coordinate falls outside the segment's
    /// domain.
    pub fn to_px(&self, coord: f64) -> Option<f64> {
        let (d0, d1) = self.domain;
        let (lo, hi) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };

        if coord < lo || coord > hi {
            return None;
        }

        let (r0, r1) = self.range;
        Some(r0 + (coord - d0) * (r1 - r0) / (d1 - d0))
    }
}

/// The axis scale of a view.
#[derive(Clone, Debug, PartialEq)]
pub struct Scale {
    /// The per-region segments, in pixel order.
    segments: Vec<Segment>,
}

impl Scale {
    /// Computes the scale of a view's currently visible regions.
    pub(crate) fn of(view: &View) -> Scale {
        let mut segments = Vec::new();
        let mut cursor = 0.0;

        for (offset, region) in view.visible_regions().enumerate() {
            let region_index = view.start_index() + offset;
            let px = region.len() as f64 / view.bp_per_px();

            let domain = view
                .orientation()
                .pixel_order(region.start() as f64, region.stop() as f64);

            segments.push(Segment {
                region_index,
                domain,
                range: (cursor, cursor + px),
            });

            cursor += px + view.region_space();
        }

        Scale { segments }
    }

    /// Gets the segments of the scale, in pixel order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Maps a genomic coordinate within a particular region to a pixel
    /// offset.
    ///
    /// Returns [`None`] when the region is not visible or the coordinate is
    /// outside its visible window.
    pub fn to_px(&self, region_index: usize, coord: f64) -> Option<f64> {
        self.segments
            .iter()
            .find(|segment| segment.region_index == region_index)?
            .to_px(coord)
    }
}

#[cfg(test)]
mod tests {
    use nonempty::NonEmpty;

    use super::*;
    use crate::core::Orientation;
    use crate::core::Region;
    use crate::view::View;

    /// Builds a two-region view with the given orientation.
    fn view(orientation: Orientation) -> View {
        let regions = NonEmpty::from_vec(vec![
            Region::try_new("chrA", 0, 1_000, 0, 1_000).unwrap(),
            Region::try_new("chrB", 0, 1_000, 0, 1_000).unwrap(),
        ])
        .unwrap();

        View::new(regions, orientation, 10.0, 10.0, 2.0)
    }

    #[test]
    fn test_forward_segments_run_in_genomic_order() {
        let scale = view(Orientation::Forward).scale();
        let segments = scale.segments();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].domain(), (0.0, 1_000.0));
        assert_eq!(segments[0].range(), (0.0, 500.0));
        assert_eq!(segments[1].domain(), (0.0, 1_000.0));
        assert_eq!(segments[1].range(), (510.0, 1_010.0));
    }

    #[test]
    fn test_reverse_segments_flip_their_domains() {
        let scale = view(Orientation::Reverse).scale();
        let segments = scale.segments();

        assert_eq!(segments[0].domain(), (1_000.0, 0.0));
        assert_eq!(segments[1].domain(), (1_000.0, 0.0));
    }

    #[test]
    fn test_to_px_maps_coordinates_within_a_segment() {
        let scale = view(Orientation::Forward).scale();

        assert_eq!(scale.to_px(0, 500.0), Some(250.0));
        assert_eq!(scale.to_px(1, 0.0), Some(510.0));
        assert_eq!(scale.to_px(1, 1_000.0), Some(1_010.0));
        assert_eq!(scale.to_px(0, 1_500.0), None);
        assert_eq!(scale.to_px(2, 0.0), None);
    }

    #[test]
    fn test_to_px_maps_reverse_coordinates() {
        let scale = view(Orientation::Reverse).scale();

        // The high genomic edge sits under the low pixel edge.
        assert_eq!(scale.to_px(0, 1_000.0), Some(0.0));
        assert_eq!(scale.to_px(0, 0.0), Some(500.0));
        assert_eq!(scale.to_px(0, 750.0), Some(125.0));
    }
}
