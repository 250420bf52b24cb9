// this_file: src/fonts.rs

//! Font loading, measurement, and caching.
//!
//! Fonts are memory-mapped and parsed with ttf-parser; [`FaceMetrics`]
//! implements the layout engine's [`FontMetrics`] by scaling horizontal
//! advances and vertical metrics from font units to pixels. [`MeasuredFace`]
//! adds an LRU cache over per-line measurements, since the shrink search
//! re-measures the same lines across iterations. [`FontLibrary`] scans a
//! directory of font files and picks one via an injected strategy.

use crate::error::{Error, Result};
use crate::metrics::{FontMetrics, MetricsSource, TextSize};
use camino::{Utf8Path, Utf8PathBuf};
use lru::LruCache;
use memmap2::Mmap;
use std::collections::HashSet;
use std::fs::File;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use ttf_parser::Face;

/// File extensions recognized as font files when scanning a directory.
const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

/// Default capacity for per-line measurement caches.
const MEASURE_CACHE_SIZE: usize = 256;

/// A loaded, parsed font file.
pub struct FontFace {
    /// Memory-mapped font data
    #[allow(dead_code)]
    mmap: Arc<Mmap>,
    /// Parsed face (zero-copy view into mmap)
    face: Face<'static>,
    path: Utf8PathBuf,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("path", &self.path)
            .field("glyphs", &self.face.number_of_glyphs())
            .finish()
    }
}

impl FontFace {
    /// Memory-map and parse a font file.
    pub fn open(path: &Utf8Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FontNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path.as_std_path()).map_err(|e| Error::Mmap {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mmap = unsafe {
            Mmap::map(&file).map_err(|e| Error::Mmap {
                path: path.to_path_buf(),
                source: e,
            })?
        };
        let mmap = Arc::new(mmap);

        // The slice stays valid for as long as the Arc<Mmap> held alongside it.
        let font_data: &'static [u8] =
            unsafe { std::slice::from_raw_parts(mmap.as_ptr(), mmap.len()) };

        let face = Face::parse(font_data, 0).map_err(|e| Error::InvalidFont {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            mmap,
            face,
            path: path.to_path_buf(),
        })
    }

    /// Path this face was loaded from.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Whether the face has a glyph for `c`.
    pub fn can_render(&self, c: char) -> bool {
        self.face.glyph_index(c).is_some()
    }

    /// Characters in `text` the face has no glyph for. Useful for building
    /// a filter's forbidden-character set from actual font coverage.
    pub fn coverage_gaps(&self, text: &str) -> HashSet<char> {
        text.chars()
            .filter(|c| !c.is_whitespace() && !self.can_render(*c))
            .collect()
    }

    /// Raw metrics at the given point size, without caching.
    pub fn metrics_at(&self, point_size: f32) -> FaceMetrics<'_> {
        FaceMetrics {
            face: &self.face,
            point_size,
        }
    }
}

impl MetricsSource for FontFace {
    fn at_size(&self, point_size: f32) -> Result<Box<dyn FontMetrics + '_>> {
        Ok(Box::new(MeasuredFace::new(
            self.metrics_at(point_size),
            MEASURE_CACHE_SIZE,
        )))
    }
}

/// [`FontMetrics`] backed by a parsed face at a fixed point size.
pub struct FaceMetrics<'a> {
    face: &'a Face<'static>,
    point_size: f32,
}

impl FaceMetrics<'_> {
    fn scale(&self) -> f32 {
        self.point_size / self.face.units_per_em() as f32
    }

    /// Horizontal advance for one character, in font units. Characters
    /// without a glyph fall back to half an em, matching how missing
    /// glyphs are typically boxed.
    fn advance_units(&self, c: char) -> u32 {
        self.face
            .glyph_index(c)
            .and_then(|id| self.face.glyph_hor_advance(id))
            .map(u32::from)
            .unwrap_or_else(|| u32::from(self.face.units_per_em()) / 2)
    }
}

impl FontMetrics for FaceMetrics<'_> {
    fn measure(&self, text: &str) -> TextSize {
        let scale = self.scale();
        let width_units: u32 = text.chars().map(|c| self.advance_units(c)).sum();
        let line_units =
            i32::from(self.face.ascender()) - i32::from(self.face.descender())
                + i32::from(self.face.line_gap());
        TextSize {
            width: (width_units as f32 * scale).ceil() as u32,
            height: (line_units.max(0) as f32 * scale).ceil() as u32,
        }
    }

    fn point_size(&self) -> f32 {
        self.point_size
    }
}

/// Caching wrapper around any [`FontMetrics`].
pub struct MeasuredFace<M> {
    inner: M,
    cache: Mutex<LruCache<String, TextSize>>,
}

impl<M: FontMetrics> MeasuredFace<M> {
    pub fn new(inner: M, cache_size: usize) -> Self {
        let cache_size = NonZeroUsize::new(cache_size)
            .unwrap_or_else(|| NonZeroUsize::new(MEASURE_CACHE_SIZE).unwrap());
        Self {
            inner,
            cache: Mutex::new(LruCache::new(cache_size)),
        }
    }
}

impl<M: FontMetrics> FontMetrics for MeasuredFace<M> {
    fn measure(&self, text: &str) -> TextSize {
        let mut cache = self.cache.lock().unwrap();
        if let Some(size) = cache.get(text) {
            return *size;
        }
        let size = self.inner.measure(text);
        cache.put(text.to_string(), size);
        size
    }

    fn point_size(&self) -> f32 {
        self.inner.point_size()
    }
}

/// Strategy for choosing one font out of a scanned set.
pub trait FontPicker {
    /// Index of the chosen font, given how many are available (> 0).
    fn pick(&self, count: usize) -> usize;
}

/// Picks a font from the wall clock's nanoseconds. Each bot run gets an
/// arbitrary face without carrying a PRNG dependency.
pub struct TimeSeededPicker;

impl FontPicker for TimeSeededPicker {
    fn pick(&self, count: usize) -> usize {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        nanos as usize % count
    }
}

/// Always picks the same index (clamped to the available range).
pub struct FixedPicker(pub usize);

impl FontPicker for FixedPicker {
    fn pick(&self, count: usize) -> usize {
        self.0.min(count - 1)
    }
}

/// A directory of font files.
#[derive(Debug)]
pub struct FontLibrary {
    fonts: Vec<Utf8PathBuf>,
}

impl FontLibrary {
    /// Scan `dir` for font files (non-recursive).
    pub fn scan(dir: &Utf8Path) -> Result<Self> {
        let mut fonts = Vec::new();
        for entry in dir.read_dir_utf8()? {
            let entry = entry?;
            let path = entry.path();
            if let Some(ext) = path.extension() {
                if FONT_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                    fonts.push(path.to_path_buf());
                }
            }
        }
        fonts.sort();
        if fonts.is_empty() {
            return Err(Error::EmptyFontDir {
                path: dir.to_path_buf(),
            });
        }
        log::debug!("Scanned {}: {} font files", dir, fonts.len());
        Ok(Self { fonts })
    }

    /// All scanned font paths, sorted.
    pub fn paths(&self) -> &[Utf8PathBuf] {
        &self.fonts
    }

    /// Load the face chosen by `picker`.
    pub fn pick(&self, picker: &dyn FontPicker) -> Result<FontFace> {
        let index = picker.pick(self.fonts.len());
        let path = &self.fonts[index];
        log::info!("Selected font {}", path);
        FontFace::open(path)
    }
}
