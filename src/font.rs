//! Label font loading. Loading never fails: a missing or broken font file is
//! replaced by the DejaVu Sans copy compiled into the binary.

use std::fmt;
use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use imageproc::drawing::text_size;
use log::{debug, warn};

use crate::error::Error;

const BUNDLED_FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans/DejaVuSans.ttf");

/// Pixel extent of a laid-out string.
///
/// `top` is the distance from the `y` passed to `draw_text_mut` down to the
/// first row of ink. Glyphs are laid out on a baseline one ascent below that
/// `y`, so `top` is usually positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
    pub top: i32,
}

/// Where a [`LabelFont`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSource {
    Preferred,
    Bundled,
}

#[derive(Clone)]
pub struct LabelFont {
    font: FontArc,
    source: FontSource,
}

impl fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelFont")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl LabelFont {
    /// Loads `preferred` if given and readable, the bundled font otherwise.
    pub fn load(preferred: Option<&Path>) -> Self {
        if let Some(path) = preferred {
            match read_font(path) {
                Ok(font) => {
                    debug!("using label font {}", path.display());
                    return Self {
                        font,
                        source: FontSource::Preferred,
                    };
                }
                Err(err) => warn!("{err}; using bundled DejaVu Sans"),
            }
        }
        Self::bundled()
    }

    pub fn bundled() -> Self {
        // The bundled bytes are a fixed asset; `bundled_font_parses` covers them.
        let font = FontArc::try_from_slice(BUNDLED_FONT_BYTES)
            .expect("bundled DejaVu Sans must parse");
        Self {
            font,
            source: FontSource::Bundled,
        }
    }

    pub fn font(&self) -> &FontArc {
        &self.font
    }

    pub fn source(&self) -> FontSource {
        self.source
    }

    /// Ink extent of `text` at `size` pixels, laid out the way
    /// `draw_text_mut` lays it out.
    pub fn measure(&self, text: &str, size: f32) -> TextExtent {
        let scale = PxScale::from(size);
        let (width, _) = text_size(scale, &self.font, text);
        let scaled = self.font.as_scaled(scale);

        let mut caret = 0.0;
        let mut rows: Option<(f32, f32)> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            let glyph = id.with_scale_and_position(scale, point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            rows = Some(match rows {
                Some((lo, hi)) => (lo.min(bounds.min.y), hi.max(bounds.max.y)),
                None => (bounds.min.y, bounds.max.y),
            });
        }

        match rows {
            Some((lo, hi)) => TextExtent {
                width,
                height: (hi - lo).max(0.0) as u32,
                top: lo as i32,
            },
            None => TextExtent {
                width,
                height: 0,
                top: 0,
            },
        }
    }
}

fn read_font(path: &Path) -> Result<FontArc, Error> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    FontArc::try_from_vec(bytes).map_err(|_| Error::InvalidFont(path.to_path_buf()))
}
