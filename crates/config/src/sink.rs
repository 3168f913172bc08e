// Presentation-layer seam for palette changes

use crate::palette::Palette;

/// One-way notification to the presentation layer when the effective palette
/// changes. Fire-and-forget: a sink that fails to apply does not roll back
/// the store entry.
pub trait PaletteSink {
    fn apply_palette(&mut self, palette: &Palette);
}

/// Sink that drops notifications. Default for headless use.
#[derive(Debug, Default)]
pub struct NullPaletteSink;

impl PaletteSink for NullPaletteSink {
    fn apply_palette(&mut self, _palette: &Palette) {}
}

/// Sink that records every applied palette, for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingPaletteSink {
    pub applied: Vec<Palette>,
}

impl PaletteSink for RecordingPaletteSink {
    fn apply_palette(&mut self, palette: &Palette) {
        self.applied.push(*palette);
    }
}

// Shared-handle sink: lets a caller keep a handle to a sink after handing it
// to the store (single-threaded execution model, so Rc/RefCell suffices).
impl<S: PaletteSink> PaletteSink for std::rc::Rc<std::cell::RefCell<S>> {
    fn apply_palette(&mut self, palette: &Palette) {
        self.borrow_mut().apply_palette(palette);
    }
}
