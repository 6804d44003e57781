//! The coordinate ruler track.
//!
//! The ruler is the one track every block carries: it sits at index 0,
//! cannot be reordered, and draws the genomic axis for every view: a
//! baseline per region, tick marks on a 1-2-5 ladder, and compact
//! coordinate labels. It fetches nothing, so its update resolves
//! immediately.

use futures::FutureExt as _;
use futures::future::LocalBoxFuture;

use crate::core::Orientation;
use crate::surface::LayerId;
use crate::surface::Surface;
use crate::track::Error;
use crate::track::Kind;
use crate::track::Metrics;
use crate::track::Track;
use crate::track::UpdateContext;
use crate::viewport::ViewId;

/// The full row height of the ruler.
const RULER_HEIGHT: f64 = 36.0;

/// The y coordinate of the baseline within the ruler row.
const BASELINE_Y: f64 = 24.0;

/// The length of a tick mark, drawn downward from the baseline.
const TICK_LENGTH: f64 = 6.0;

/// The y coordinate of the coordinate labels.
const LABEL_Y: f64 = 16.0;

/// The minimum pixel spacing between labeled ticks.
const LABEL_MIN_PX: f64 = 80.0;

/// The 1-2-5 ladder of candidate tick intervals, in base pairs.
const TICK_LADDER: [usize; 27] = [
    1,
    2,
    5,
    10,
    20,
    50,
    100,
    200,
    500,
    1_000,
    2_000,
    5_000,
    10_000,
    20_000,
    50_000,
    100_000,
    200_000,
    500_000,
    1_000_000,
    2_000_000,
    5_000_000,
    10_000_000,
    20_000_000,
    50_000_000,
    100_000_000,
    200_000_000,
    500_000_000,
];

/// Picks the smallest tick interval whose pixel spacing at the given
/// resolution is at least [`LABEL_MIN_PX`].
fn tick_interval(bp_per_px: f64) -> usize {
    for interval in TICK_LADDER {
        if interval as f64 / bp_per_px >= LABEL_MIN_PX {
            return interval;
        }
    }

    // SAFETY: the ladder always has a last element.
    *TICK_LADDER.last().unwrap()
}

/// Formats a coordinate compactly (`7.5M`, `12.3K`, `250`).
fn format_position(pos: usize) -> String {
    if pos >= 1_000_000 {
        format!("{:.1}M", pos as f64 / 1_000_000.0)
    } else if pos >= 1_000 {
        format!("{:.1}K", pos as f64 / 1_000.0)
    } else {
        pos.to_string()
    }
}

/// The coordinate ruler track.
#[derive(Debug, Default)]
pub struct Ruler {
    /// The per-view drawing layers.
    layers: Vec<(ViewId, LayerId)>,
}

impl Ruler {
    /// Creates a new ruler.
    pub fn new() -> Ruler {
        Ruler::default()
    }
}

impl Track for Ruler {
    fn kind(&self) -> Kind {
        Kind::Ruler
    }

    fn name(&self) -> &str {
        "ruler"
    }

    fn attach_view(&mut self, view: ViewId, surface: &mut dyn Surface) {
        let layer = surface.create_layer(&format!("ruler-{view}"));
        self.layers.push((view, layer));
    }

    fn view_layers(&self) -> Vec<(ViewId, LayerId)> {
        self.layers.clone()
    }

    fn update<'a>(
        &'a mut self,
        ctx: UpdateContext<'a>,
    ) -> LocalBoxFuture<'a, Result<Metrics, Error>> {
        async move {
            let mut surface = ctx.surface().borrow_mut();

            for range in ctx.views() {
                let layer = match self
                    .layers
                    .iter()
                    .find(|(view, _)| *view == range.view)
                {
                    Some((_, layer)) => *layer,
                    None => continue,
                };

                surface.clear_layer(layer);

                let interval = tick_interval(range.bp_per_px);
                let mut cursor = 0.0;

                for region in &range.regions {
                    // The baseline and the chromosome name for this region.
                    surface.draw_line(
                        layer,
                        cursor,
                        BASELINE_Y,
                        cursor + region.pixel_width,
                        BASELINE_Y,
                    );
                    surface.draw_text(layer, cursor + 2.0, 8.0, &region.chrom);

                    // Ticks at every interval multiple strictly inside the
                    // window.
                    let mut tick = ((region.start / interval) + 1) * interval;

                    while tick < region.stop {
                        let px = cursor
                            + match range.orientation {
                                Orientation::Forward => {
                                    (tick - region.start) as f64 / range.bp_per_px
                                }
                                Orientation::Reverse => {
                                    (region.stop - tick) as f64 / range.bp_per_px
                                }
                            };

                        surface.draw_line(layer, px, BASELINE_Y, px, BASELINE_Y + TICK_LENGTH);
                        surface.draw_text(layer, px, LABEL_Y, &format_position(tick));

                        tick += interval;
                    }

                    cursor += region.pixel_width + range.region_space;
                }
            }

            Ok(Metrics {
                height: RULER_HEIGHT,
                top_pad: 2.0,
                bottom_pad: 2.0,
                left_width: 0.0,
                right_width: 0.0,
            })
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::genome::Genome;
    use crate::surface::Recording;
    use crate::surface::recording::Mark;
    use crate::view::RegionSpec;
    use crate::view::ViewSpec;
    use crate::viewport::Viewport;

    #[test]
    fn test_the_tick_ladder_tracks_resolution() {
        // At 12.5 bp per px, an 80 px spacing needs at least 1,000 bp.
        assert_eq!(tick_interval(12.5), 1_000);
        // At one base pair per pixel, 100 bp ticks land 100 px apart.
        assert_eq!(tick_interval(1.0), 100);
        // Fully zoomed out on chr1 (about 311 Kbp per px).
        assert_eq!(tick_interval(311_250.0), 50_000_000);
    }

    #[test]
    fn test_position_formatting() {
        assert_eq!(format_position(250), "250");
        assert_eq!(format_position(12_300), "12.3K");
        assert_eq!(format_position(7_500_000), "7.5M");
    }

    #[test]
    fn test_the_ruler_draws_ticks_inside_the_window() -> Result<(), Box<dyn std::error::Error>> {
        let genome = Genome::builder()
            .name("test")
            .chromosome("chr1", 249_000_000)
            .default_coord("chr1", 0, 10_000)
            .try_build()?;

        let spec = ViewSpec::new(vec![
            RegionSpec::new("chr1", 1_000_000, 1_010_000).with_width(800.0),
        ]);
        let viewport = Viewport::try_new(&genome, vec![spec], 1_280.0)?;

        // Keep a concrete handle so the recording can be inspected after
        // the update.
        let recording = std::rc::Rc::new(std::cell::RefCell::new(Recording::new()));
        let surface: crate::surface::SharedSurface = recording.clone();

        let mut ruler = Ruler::new();

        {
            let mut borrowed = surface.borrow_mut();
            for view in viewport.view_ids() {
                ruler.attach_view(view, &mut *borrowed);
            }
        }

        let ranges = viewport.view_ranges();
        let metrics = block_on(ruler.update(UpdateContext::new(&ranges, &surface)))?;
        assert_eq!(metrics.height, RULER_HEIGHT);

        let (_, layer) = ruler.view_layers()[0];
        let recording = recording.borrow();
        let marks = recording.marks(layer);

        // At 12.5 bp per px, ticks fall every 1,000 bp: nine of them sit
        // strictly inside 1,000,000-1,010,000. Each tick is a line and a
        // label; the region itself contributes a baseline and its name.
        let ticks = marks
            .iter()
            .filter(|mark| matches!(mark, Mark::Line { x1, x2, .. } if x1 == x2))
            .count();
        assert_eq!(ticks, 9);

        let labels = marks
            .iter()
            .filter_map(|mark| match mark {
                Mark::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert!(labels.contains(&"chr1"));
        assert!(labels.contains(&"1.0M"));

        Ok(())
    }

    #[test]
    fn test_the_ruler_mirrors_ticks_on_a_reverse_view() -> Result<(), Box<dyn std::error::Error>>
    {
        let genome = Genome::builder()
            .name("test")
            .chromosome("chr1", 249_000_000)
            .default_coord("chr1", 0, 10_000)
            .try_build()?;

        let spec = ViewSpec::new(vec![
            RegionSpec::new("chr1", 1_000_000, 1_002_000).with_width(800.0),
        ])
        .with_orientation(Orientation::Reverse);
        let viewport = Viewport::try_new(&genome, vec![spec], 1_280.0)?;

        let recording = std::rc::Rc::new(std::cell::RefCell::new(Recording::new()));
        let surface: crate::surface::SharedSurface = recording.clone();

        let mut ruler = Ruler::new();
        ruler.attach_view(viewport.first_view(), &mut *surface.borrow_mut());

        let ranges = viewport.view_ranges();
        block_on(ruler.update(UpdateContext::new(&ranges, &surface)))?;

        // 2,000 bp over 800 px is 2.5 bp per px; ticks land every 200 bp
        // (80 px). In a reverse view the first tick (1,000,200) sits
        // 1,800 bp below the window stop, i.e. 720 px from the left edge,
        // and the ticks march leftward from there.
        let (_, layer) = ruler.view_layers()[0];
        let recording = recording.borrow();

        let tick_xs = recording
            .marks(layer)
            .iter()
            .filter_map(|mark| match mark {
                Mark::Line { x1, x2, .. } if x1 == x2 => Some(*x1),
                _ => None,
            })
            .collect::<Vec<_>>();

        assert_eq!(
            tick_xs,
            vec![720.0, 640.0, 560.0, 480.0, 400.0, 320.0, 240.0, 160.0, 80.0]
        );

        Ok(())
    }
}
