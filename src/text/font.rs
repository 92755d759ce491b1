use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;

use crate::{
    foundation::error::{PromoError, PromoResult},
    text::wrap::TextMeasure,
};

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl TextBrushRgba8 {
    const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
}

/// A font face registered with a [`FontBook`].
#[derive(Clone, Debug)]
pub struct RegisteredFont {
    /// Family name as reported by the font.
    pub family: String,
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Face index within the file (non-zero only for collections).
    pub index: u32,
}

/// One shaped line of text, positioned relative to its layout box.
pub struct ShapedLine {
    /// Face the glyphs index into.
    pub font: RegisteredFont,
    /// Glyphs with x relative to the left edge and y on the baseline.
    pub glyphs: Vec<vello_cpu::Glyph>,
    /// Advance width in pixels.
    pub width: f32,
    /// Baseline offset from the top of the layout box.
    pub baseline: f32,
    /// Ascent above the baseline.
    pub ascent: f32,
    /// Descent below the baseline.
    pub descent: f32,
}

impl ShapedLine {
    /// Offset from the top of the layout box to the vertical middle of the line.
    pub fn middle(&self) -> f32 {
        self.baseline + (self.descent - self.ascent) / 2.0
    }
}

impl std::fmt::Debug for ShapedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedLine")
            .field("family", &self.font.family)
            .field("glyphs", &self.glyphs.len())
            .field("width", &self.width)
            .field("baseline", &self.baseline)
            .finish()
    }
}

/// Font registry plus a Parley shaping context.
///
/// Fonts come from explicit files or directories; with system fallback enabled, families that
/// are not registered are looked up among the installed system fonts on first use.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    faces: Vec<RegisteredFont>,
    system: Option<usvg::fontdb::Database>,
    resolved: HashMap<String, RegisteredFont>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    /// Empty registry without system fallback.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: Vec::new(),
            system: None,
            resolved: HashMap::new(),
        }
    }

    /// Empty registry that falls back to installed system fonts.
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "indexed system fonts");
        Self {
            system: Some(db),
            ..Self::new()
        }
    }

    /// Whether any face is registered or reachable through system fallback.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.system.as_ref().is_none_or(|db| db.is_empty())
    }

    /// Registered family names, in registration order.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.faces.iter().map(|f| f.family.as_str())
    }

    /// Register every face in `bytes`; returns the family names it provided.
    pub fn register_bytes(&mut self, bytes: Vec<u8>) -> PromoResult<Vec<String>> {
        let shared = Arc::new(bytes);
        self.resolved.clear();
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(shared.as_ref().clone()), None);
        if families.is_empty() {
            return Err(PromoError::validation(
                "no font families registered from font bytes",
            ));
        }

        let mut names = Vec::with_capacity(families.len());
        for (family_id, fonts) in families {
            let family = self
                .font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| PromoError::validation("registered font family has no name"))?
                .to_string();
            let index = fonts.first().map(|f| f.index()).unwrap_or(0);
            if !self.faces.iter().any(|f| f.family == family) {
                self.faces.push(RegisteredFont {
                    family: family.clone(),
                    bytes: shared.clone(),
                    index,
                });
            }
            names.push(family);
        }
        Ok(names)
    }

    /// Register a font file.
    pub fn register_file(&mut self, path: impl AsRef<Path>) -> PromoResult<Vec<String>> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        self.register_bytes(bytes)
    }

    /// Register every `.ttf`/`.otf`/`.ttc` file found under `dir`, recursively.
    ///
    /// Unreadable or invalid files are skipped. Returns the number of files registered.
    pub fn register_dir(&mut self, dir: impl AsRef<Path>) -> PromoResult<usize> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(PromoError::validation(format!(
                "font directory '{}' does not exist",
                dir.display()
            )));
        }

        let mut files = Vec::new();
        collect_font_files(dir, &mut files);
        files.sort();

        let mut registered = 0usize;
        for path in files {
            match self.register_file(&path) {
                Ok(_) => registered += 1,
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "skipping font"),
            }
        }
        Ok(registered)
    }

    /// Pick the face for a font identifier such as `'Noto Sans KR', sans-serif`.
    ///
    /// Families are tried in order against registered fonts, then against system fonts. When
    /// nothing matches, the first available face is used and a warning is logged once per
    /// identifier (resolutions are cached until another font is registered).
    pub fn select(&mut self, font_id: &str) -> PromoResult<RegisteredFont> {
        if let Some(face) = self.resolved.get(font_id) {
            return Ok(face.clone());
        }

        let candidates = parse_family_list(font_id);
        let face = match self.find_registered(&candidates) {
            Some(face) => face,
            None => match self.load_system_match(&candidates)? {
                Some(face) => face,
                None => {
                    let Some(first) = self.faces.first().cloned() else {
                        return Err(PromoError::evaluation(format!(
                            "no font available for '{font_id}' (register a font file or directory)"
                        )));
                    };
                    tracing::warn!(
                        requested = font_id,
                        using = %first.family,
                        "font not found; falling back"
                    );
                    first
                }
            },
        };

        self.resolved.insert(font_id.to_string(), face.clone());
        Ok(face)
    }

    fn find_registered(&self, candidates: &[String]) -> Option<RegisteredFont> {
        candidates.iter().find_map(|name| {
            self.faces
                .iter()
                .find(|f| f.family.eq_ignore_ascii_case(name))
                .cloned()
        })
    }

    /// Shape `text` on a single line, bold, at `size_px`.
    pub fn shape_line(
        &mut self,
        font_id: &str,
        text: &str,
        size_px: f32,
    ) -> PromoResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PromoError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let font = self.select(font_id)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::BOLD,
        ));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::WHITE));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let (baseline, ascent, descent) = layout
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                (m.baseline, m.ascent, m.descent)
            })
            .unwrap_or((size_px * 0.8, size_px * 0.8, size_px * 0.2));

        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        Ok(ShapedLine {
            font,
            glyphs,
            width: layout.width(),
            baseline,
            ascent,
            descent,
        })
    }

    /// Load the best system face for `candidates`.
    ///
    /// With nothing registered yet, an arbitrary system face is registered as the fallback and
    /// `None` is returned so the caller reports the miss.
    fn load_system_match(&mut self, candidates: &[String]) -> PromoResult<Option<RegisteredFont>> {
        let Some(db) = self.system.as_ref() else {
            return Ok(None);
        };

        let families: Vec<usvg::fontdb::Family<'_>> = candidates
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "sans-serif" => usvg::fontdb::Family::SansSerif,
                "serif" => usvg::fontdb::Family::Serif,
                "monospace" => usvg::fontdb::Family::Monospace,
                "cursive" => usvg::fontdb::Family::Cursive,
                "fantasy" => usvg::fontdb::Family::Fantasy,
                _ => usvg::fontdb::Family::Name(name.as_str()),
            })
            .collect();
        let query = usvg::fontdb::Query {
            families: &families,
            weight: usvg::fontdb::Weight::BOLD,
            stretch: usvg::fontdb::Stretch::Normal,
            style: usvg::fontdb::Style::Normal,
        };
        let matched = db.query(&query);
        let id = matched.or_else(|| {
            self.faces
                .is_empty()
                .then(|| db.faces().next().map(|f| f.id))
                .flatten()
        });
        let Some(bytes) = id.and_then(|id| db.with_face_data(id, |data, _index| data.to_vec()))
        else {
            return Ok(None);
        };

        let names = self.register_bytes(bytes)?;
        tracing::debug!(families = ?names, "loaded system font");
        if matched.is_none() {
            return Ok(None);
        }
        Ok(self
            .find_registered(candidates)
            .or_else(|| self.find_registered(&names[..1])))
    }
}

impl TextMeasure for FontBook {
    fn measure_text(&mut self, font: &str, text: &str, size_px: f32) -> PromoResult<f32> {
        Ok(self.shape_line(font, text, size_px)?.width)
    }
}

/// Split a CSS-style family list into unquoted names, dropping empties.
pub fn parse_family_list(font_id: &str) -> Vec<String> {
    font_id
        .split(',')
        .map(|s| s.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn collect_font_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_font_files(&path, out);
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext == "ttf" || ext == "otf" || ext == "ttc" {
            out.push(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
