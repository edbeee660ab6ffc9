//! Glyph cell: The atomic unit of display state.
//!
//! A [`GlyphCell`] holds everything a renderer needs to draw one character
//! cell: the glyph index into the active font, foreground and background
//! colors, mirror flags and an optional shared effect.
//!
//! Cells are plain values. They only become observable display state once
//! they live inside a [`CellSurface`](super::CellSurface), which owns them as
//! a dense row-major array and tracks whether any of them changed.

use bitflags::bitflags;
use std::fmt;
use std::rc::Rc;

/// True-color RGB representation.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Default foreground (white)
    pub const DEFAULT_FG: Self = Self::WHITE;
    /// Default background (black)
    pub const DEFAULT_BG: Self = Self::BLACK;

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Rgb {
    /// Convert from a 24-bit hex color (e.g., 0xFF5500)
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

/// A tint laid over a whole display object by the renderer.
///
/// The core only carries the value; blending is up to the renderer.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, Debug)]
pub struct Tint {
    /// Tint color.
    pub color: Rgb,
    /// Opacity (0 = no tint).
    pub alpha: u8,
}

impl Tint {
    /// No tint at all.
    pub const NONE: Self = Self::new(Rgb::BLACK, 0);

    /// Create a new tint.
    #[inline]
    pub const fn new(color: Rgb, alpha: u8) -> Self {
        Self { color, alpha }
    }

    /// Check if the tint has any visible effect.
    #[inline]
    pub const fn is_none(&self) -> bool {
        self.alpha == 0
    }
}

bitflags! {
    /// Glyph mirroring.
    ///
    /// The empty set means no mirroring; both flags can be combined.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Mirror: u8 {
        /// Flip the glyph top to bottom.
        const VERTICAL = 0b0000_0001;
        /// Flip the glyph left to right.
        const HORIZONTAL = 0b0000_0010;
    }
}

impl fmt::Debug for Mirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// An effect attached to a cell (blink, fade, ...).
///
/// Effects are driven by the host, not by the core. The core only stores a
/// shared handle so that many cells can point at one effect instance.
pub trait CellEffect: fmt::Debug {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Whether the effect has run to completion and may be detached.
    fn is_finished(&self) -> bool {
        false
    }
}

/// Shared reference to a cell effect.
///
/// Cloning a cell clones the handle, never the effect itself.
pub type EffectHandle = Rc<dyn CellEffect>;

/// The full visual state of one character cell.
#[derive(Clone, Default)]
pub struct GlyphCell {
    glyph: u32,
    foreground: Rgb,
    background: Rgb,
    mirror: Mirror,
    effect: Option<EffectHandle>,
}

impl GlyphCell {
    /// Create a cell with explicit colors and glyph.
    #[inline]
    pub const fn new(foreground: Rgb, background: Rgb, glyph: u32) -> Self {
        Self {
            glyph,
            foreground,
            background,
            mirror: Mirror::empty(),
            effect: None,
        }
    }

    /// Create a cell showing a character with default colors.
    ///
    /// The glyph index is the character's code point, which is what
    /// code-page fonts indexed by character expect.
    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self::new(Rgb::DEFAULT_FG, Rgb::DEFAULT_BG, c as u32)
    }

    /// Glyph index into the active font.
    #[inline]
    pub const fn glyph(&self) -> u32 {
        self.glyph
    }

    /// The glyph as a character, when it maps to a valid code point.
    #[inline]
    pub fn glyph_char(&self) -> Option<char> {
        char::from_u32(self.glyph)
    }

    /// Foreground color.
    #[inline]
    pub const fn foreground(&self) -> Rgb {
        self.foreground
    }

    /// Background color.
    #[inline]
    pub const fn background(&self) -> Rgb {
        self.background
    }

    /// Mirror flags.
    #[inline]
    pub const fn mirror(&self) -> Mirror {
        self.mirror
    }

    /// Attached effect, if any.
    #[inline]
    pub const fn effect(&self) -> Option<&EffectHandle> {
        self.effect.as_ref()
    }

    /// Set the glyph index.
    #[inline]
    pub const fn set_glyph(&mut self, glyph: u32) -> &mut Self {
        self.glyph = glyph;
        self
    }

    /// Set the foreground color.
    #[inline]
    pub const fn set_foreground(&mut self, foreground: Rgb) -> &mut Self {
        self.foreground = foreground;
        self
    }

    /// Set the background color.
    #[inline]
    pub const fn set_background(&mut self, background: Rgb) -> &mut Self {
        self.background = background;
        self
    }

    /// Set the mirror flags.
    #[inline]
    pub const fn set_mirror(&mut self, mirror: Mirror) -> &mut Self {
        self.mirror = mirror;
        self
    }

    /// Attach or detach an effect.
    #[inline]
    pub fn set_effect(&mut self, effect: Option<EffectHandle>) -> &mut Self {
        self.effect = effect;
        self
    }

    /// Set the glyph (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_glyph(mut self, glyph: u32) -> Self {
        self.glyph = glyph;
        self
    }

    /// Set the foreground color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_foreground(mut self, foreground: Rgb) -> Self {
        self.foreground = foreground;
        self
    }

    /// Set the background color (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }

    /// Set the mirror flags (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_mirror(mut self, mirror: Mirror) -> Self {
        self.mirror = mirror;
        self
    }

    /// Attach an effect (builder pattern).
    #[inline]
    #[must_use]
    pub fn with_effect(mut self, effect: EffectHandle) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Copy glyph, colors, mirror and effect from another cell.
    #[inline]
    pub fn copy_appearance_from(&mut self, other: &Self) {
        self.clone_from(other);
    }

    /// Reset to the given defaults, dropping mirror and effect.
    #[inline]
    pub fn reset(&mut self, foreground: Rgb, background: Rgb, glyph: u32) {
        *self = Self::new(foreground, background, glyph);
    }
}

impl PartialEq for GlyphCell {
    /// Effects compare by identity: two cells are equal only when they share
    /// the same effect instance (or both have none).
    fn eq(&self, other: &Self) -> bool {
        self.glyph == other.glyph
            && self.foreground == other.foreground
            && self.background == other.background
            && self.mirror == other.mirror
            && match (&self.effect, &other.effect) {
                (None, None) => true,
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                _ => false,
            }
    }
}

impl Eq for GlyphCell {}

impl fmt::Debug for GlyphCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphCell")
            .field("glyph", &self.glyph)
            .field("fg", &self.foreground)
            .field("bg", &self.background)
            .field("mirror", &self.mirror)
            .field("effect", &self.effect.as_ref().map(|e| e.name()))
            .finish()
    }
}
