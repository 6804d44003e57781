//! The renderable surface a block draws onto.
//!
//! The core never touches a concrete UI toolkit. Instead, it draws through
//! the [`Surface`] trait: a flat set of named layers (one per track per
//! view, plus whatever a track wants for itself), each carrying an offset
//! and a list of primitive marks. A DOM/SVG adapter, a canvas adapter, and
//! the in-memory [`Recording`] surface used by tests and the demo binary
//! all implement the same contract.
//!
//! The surface is shared across the block and its tracks as
//! [`SharedSurface`], an `Rc<RefCell<_>>`: the system is single-threaded
//! and cooperative, so interior mutability is the honest model of a shared
//! drawing target. Borrows must never be held across an await point.

use std::cell::RefCell;
use std::rc::Rc;

pub mod recording;

pub use recording::Recording;

/// An opaque handle to a layer on a [`Surface`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct LayerId(usize);

impl LayerId {
    /// Creates a layer handle from a raw index.
    ///
    /// Reserved for [`Surface`] implementations; the core only ever passes
    /// back handles it was given.
    pub fn from_raw(index: usize) -> LayerId {
        LayerId(index)
    }

    /// Gets the raw index of the layer.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// A renderable surface: layers, offsets, and primitive marks.
///
/// Methods take `&mut self` and are infallible: a surface that can fail
/// (e.g., a remote canvas) is expected to buffer and reconcile on its own
/// schedule, the way a browser DOM does.
pub trait Surface: std::fmt::Debug {
    /// Creates a new layer with a diagnostic label and returns its handle.
    fn create_layer(&mut self, label: &str) -> LayerId;

    /// Removes a layer and everything on it.
    fn remove_layer(&mut self, layer: LayerId);

    /// Clears a layer's marks, keeping the layer and its offset.
    fn clear_layer(&mut self, layer: LayerId);

    /// Sets a layer's offset absolutely.
    fn set_layer_offset(&mut self, layer: LayerId, x: f64, y: f64);

    /// Translates a layer's offset relatively.
    fn translate_layer(&mut self, layer: LayerId, dx: f64, dy: f64);

    /// Draws a line onto a layer, in layer-local coordinates.
    fn draw_line(&mut self, layer: LayerId, x1: f64, y1: f64, x2: f64, y2: f64);

    /// Draws a rectangle onto a layer, in layer-local coordinates.
    fn draw_rect(&mut self, layer: LayerId, x: f64, y: f64, width: f64, height: f64);

    /// Draws a text run onto a layer and returns its rendered pixel width
    /// (label columns are sized from this measurement).
    fn draw_text(&mut self, layer: LayerId, x: f64, y: f64, text: &str) -> f64;

    /// Resizes the whole surface.
    fn resize(&mut self, width: f64, height: f64);
}

/// The shared handle under which a block and its tracks reach the surface.
pub type SharedSurface = Rc<RefCell<dyn Surface>>;

/// Wraps a surface into a [`SharedSurface`].
pub fn shared(surface: impl Surface + 'static) -> SharedSurface {
    Rc::new(RefCell::new(surface))
}
