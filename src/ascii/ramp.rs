//! Glyph ramps for brightness mapping.

use std::fmt;
use std::str::FromStr;

/// Standard 10-level ramp, densest first.
///
/// Brightness grows left to right: the darkest visible cells get `@`,
/// the brightest get a space.
pub const STANDARD_RAMP: &str = "@%#*+=-:. ";

/// Ordered glyphs from densest to sparsest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphRamp {
    glyphs: Vec<char>,
}

impl GlyphRamp {
    /// Build a ramp from a string. Returns `None` when the string is empty.
    pub fn new(glyphs: &str) -> Option<Self> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.is_empty() {
            None
        } else {
            Some(Self { glyphs })
        }
    }

    /// The glyphs in ramp order.
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false; ramps have at least one glyph.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Glyph at `index`, clamped to the last level.
    #[inline]
    pub fn glyph(&self, index: usize) -> char {
        self.glyphs[index.min(self.glyphs.len() - 1)]
    }
}

impl Default for GlyphRamp {
    fn default() -> Self {
        Self {
            glyphs: STANDARD_RAMP.chars().collect(),
        }
    }
}

impl FromStr for GlyphRamp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or_else(|| "Glyph ramp must contain at least one character".to_string())
    }
}

impl fmt::Display for GlyphRamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.glyphs {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
