//! An in-memory surface that records every operation.
//!
//! Tests assert against the recorded layers and marks; the demo binary uses
//! the same surface to show what a block would have drawn. Text measurement
//! uses a fixed per-character width, which is all the layout math needs.

use crate::surface::LayerId;
use crate::surface::Surface;

/// The pixel width assumed for one character of text.
const CHAR_PX: f64 = 7.0;

/// One recorded mark.
#[derive(Clone, Debug, PartialEq)]
pub enum Mark {
    /// A line from one point to another.
    Line {
        /// The starting x coordinate.
        x1: f64,
        /// The starting y coordinate.
        y1: f64,
        /// The ending x coordinate.
        x2: f64,
        /// The ending y coordinate.
        y2: f64,
    },

    /// A rectangle.
    Rect {
        /// The left edge.
        x: f64,
        /// The top edge.
        y: f64,
        /// The width.
        width: f64,
        /// The height.
        height: f64,
    },

    /// A text run.
    Text {
        /// The anchor x coordinate.
        x: f64,
        /// The anchor y coordinate.
        y: f64,
        /// The text itself.
        text: String,
    },
}

/// One recorded layer.
#[derive(Clone, Debug, Default)]
struct Layer {
    /// The diagnostic label the layer was created with.
    label: String,

    /// The current x offset.
    x: f64,

    /// The current y offset.
    y: f64,

    /// The marks drawn onto the layer, in order.
    marks: Vec<Mark>,

    /// Whether the layer has been removed.
    removed: bool,
}

/// An in-memory surface that records every operation.
#[derive(Debug, Default)]
pub struct Recording {
    /// The layers, indexed by [`LayerId`].
    layers: Vec<Layer>,

    /// The current surface width.
    width: f64,

    /// The current surface height.
    height: f64,
}

impl Recording {
    /// Creates a new, empty recording surface.
    pub fn new() -> Recording {
        Recording::default()
    }

    /// Gets the current surface size.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Gets a layer's current offset, or [`None`] if it was removed or
    /// never existed.
    pub fn layer_offset(&self, layer: LayerId) -> Option<(f64, f64)> {
        self.layers
            .get(layer.index())
            .filter(|layer| !layer.removed)
            .map(|layer| (layer.x, layer.y))
    }

    /// Gets a layer's diagnostic label.
    pub fn layer_label(&self, layer: LayerId) -> Option<&str> {
        self.layers
            .get(layer.index())
            .filter(|layer| !layer.removed)
            .map(|layer| layer.label.as_str())
    }

    /// Gets the marks currently on a layer.
    pub fn marks(&self, layer: LayerId) -> &[Mark] {
        self.layers
            .get(layer.index())
            .filter(|layer| !layer.removed)
            .map(|layer| layer.marks.as_slice())
            .unwrap_or_default()
    }

    /// Gets the number of live layers.
    pub fn layer_count(&self) -> usize {
        self.layers.iter().filter(|layer| !layer.removed).count()
    }

    /// Gets a mutable handle to a live layer.
    fn layer_mut(&mut self, layer: LayerId) -> Option<&mut Layer> {
        self.layers
            .get_mut(layer.index())
            .filter(|layer| !layer.removed)
    }
}

impl Surface for Recording {
    fn create_layer(&mut self, label: &str) -> LayerId {
        let id = LayerId::from_raw(self.layers.len());

        self.layers.push(Layer {
            label: label.to_string(),
            ..Default::default()
        });

        id
    }

    fn remove_layer(&mut self, layer: LayerId) {
        if let Some(layer) = self.layer_mut(layer) {
            layer.removed = true;
            layer.marks.clear();
        }
    }

    fn clear_layer(&mut self, layer: LayerId) {
        if let Some(layer) = self.layer_mut(layer) {
            layer.marks.clear();
        }
    }

    fn set_layer_offset(&mut self, layer: LayerId, x: f64, y: f64) {
        if let Some(layer) = self.layer_mut(layer) {
            layer.x = x;
            layer.y = y;
        }
    }

    fn translate_layer(&mut self, layer: LayerId, dx: f64, dy: f64) {
        if let Some(layer) = self.layer_mut(layer) {
            layer.x += dx;
            layer.y += dy;
        }
    }

    fn draw_line(&mut self, layer: LayerId, x1: f64, y1: f64, x2: f64, y2: f64) {
        if let Some(layer) = self.layer_mut(layer) {
            layer.marks.push(Mark::Line { x1, y1, x2, y2 });
        }
    }

    fn draw_rect(&mut self, layer: LayerId, x: f64, y: f64, width: f64, height: f64) {
        if let Some(layer) = self.layer_mut(layer) {
            layer.marks.push(Mark::Rect {
                x,
                y,
                width,
                height,
            });
        }
    }

    fn draw_text(&mut self, layer: LayerId, x: f64, y: f64, text: &str) -> f64 {
        let width = text.chars().count() as f64 * CHAR_PX;

        if let Some(layer) = self.layer_mut(layer) {
            layer.marks.push(Mark::Text {
                x,
                y,
                text: text.to_string(),
            });
        }

        width
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}
