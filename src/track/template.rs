//! A minimal concrete track built directly on the template contract.
//!
//! Real signal and feature tracks live outside the core and carry their own
//! fetch and drawing logic; the [`Template`] track stands in for them in
//! unit tests and demos. It draws one placeholder rectangle per view,
//! labels itself in the left column, and can be configured to simulate a
//! failing data fetch.

use futures::FutureExt as _;
use futures::future::LocalBoxFuture;

use crate::surface::LayerId;
use crate::surface::Surface;
use crate::track::Error;
use crate::track::Kind;
use crate::track::Metrics;
use crate::track::Track;
use crate::track::UpdateContext;
use crate::viewport::ViewId;

/// The horizontal gap between a label and the track body.
const LABEL_PAD: f64 = 15.0;

/// A minimal concrete track.
#[derive(Debug)]
pub struct Template {
    /// The display name, drawn as the left label.
    name: String,

    /// The kind reported to the block.
    kind: Kind,

    /// The full row height.
    height: f64,

    /// The pad above the content.
    top_pad: f64,

    /// The pad below the content.
    bottom_pad: f64,

    /// Whether updates should simulate a failed data fetch.
    fail: bool,

    /// The per-view drawing layers.
    layers: Vec<(ViewId, LayerId)>,

    /// How many updates have completed, failed ones included.
    updates: usize,
}

impl Template {
    /// Creates a new template track.
    pub fn new(name: impl Into<String>, kind: Kind, height: f64) -> Template {
        Template {
            name: name.into(),
            kind,
            height,
            top_pad: 0.0,
            bottom_pad: 0.0,
            fail: false,
            layers: Vec::new(),
            updates: 0,
        }
    }

    /// Sets the pads above and below the content.
    pub fn with_pads(mut self, top_pad: f64, bottom_pad: f64) -> Self {
        self.top_pad = top_pad;
        self.bottom_pad = bottom_pad;
        self
    }

    /// Makes every update simulate a failed data fetch.
    pub fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Gets how many updates have completed, failed ones included.
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl Track for Template {
    fn kind(&self) -> Kind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn attach_view(&mut self, view: ViewId, surface: &mut dyn Surface) {
        let layer = surface.create_layer(&format!("{}-{view}", self.name));
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
            self.updates += 1;

            if self.fail {
                return Err(Error::Fetch(format!("{}: simulated fetch failure", self.name)));
            }

            let mut surface = ctx.surface().borrow_mut();
            let mut left_width = 0.0f64;

            for range in ctx.views() {
                let layer = match self.layers.iter().find(|(view, _)| *view == range.view) {
                    Some((_, layer)) => *layer,
                    None => continue,
                };

                surface.clear_layer(layer);

                let body_px = range
                    .regions
                    .iter()
                    .map(|region| region.pixel_width)
                    .sum::<f64>()
                    + (range.regions.len() as f64 - 1.0) * range.region_space;

                let content = self.height - self.top_pad - self.bottom_pad;
                surface.draw_rect(layer, 0.0, 0.0, body_px, content);

                // The left label, anchored off the body's left edge.
                let text_px = surface.draw_text(layer, -LABEL_PAD, content / 2.0, &self.name);
                left_width = left_width.max(text_px + LABEL_PAD);
            }

            Ok(Metrics {
                height: self.height,
                top_pad: self.top_pad,
                bottom_pad: self.bottom_pad,
                left_width,
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
    use crate::view::RegionSpec;
    use crate::view::ViewSpec;
    use crate::viewport::Viewport;

    #[test]
    fn test_an_update_reports_its_label_width() -> Result<(), Box<dyn std::error::Error>> {
        let genome = Genome::builder()
            .name("test")
            .chromosome("chr1", 249_000_000)
            .default_coord("chr1", 0, 10_000)
            .try_build()?;

        let spec = ViewSpec::new(vec![
            RegionSpec::new("chr1", 1_000_000, 1_010_000).with_width(800.0),
        ]);
        let viewport = Viewport::try_new(&genome, vec![spec], 1_280.0)?;

        let surface = crate::surface::shared(Recording::new());
        let mut track = Template::new("coverage", Kind::Signal, 40.0);
        track.attach_view(viewport.first_view(), &mut *surface.borrow_mut());

        let ranges = viewport.view_ranges();
        let metrics = block_on(track.update(UpdateContext::new(&ranges, &surface)))?;

        // "coverage" measures 8 * 7 px, plus the label pad.
        assert_eq!(metrics.left_width, 56.0 + 15.0);
        assert_eq!(metrics.height, 40.0);
        assert_eq!(track.updates(), 1);

        Ok(())
    }

    #[test]
    fn test_a_failing_update_reports_a_fetch_error() -> Result<(), Box<dyn std::error::Error>> {
        let genome = Genome::builder()
            .name("test")
            .chromosome("chr1", 249_000_000)
            .default_coord("chr1", 0, 10_000)
            .try_build()?;

        let spec = ViewSpec::new(vec![
            RegionSpec::new("chr1", 1_000_000, 1_010_000).with_width(800.0),
        ]);
        let viewport = Viewport::try_new(&genome, vec![spec], 1_280.0)?;

        let surface = crate::surface::shared(Recording::new());
        let mut track = Template::new("broken", Kind::Feature, 30.0).with_failure();
        track.attach_view(viewport.first_view(), &mut *surface.borrow_mut());

        let ranges = viewport.view_ranges();
        let err = block_on(track.update(UpdateContext::new(&ranges, &surface))).unwrap_err();

        assert_eq!(
            err,
            Error::Fetch(String::from("broken: simulated fetch failure"))
        );

        Ok(())
    }
}
