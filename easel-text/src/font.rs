//! Font loading.
//!
//! Every [`Font`] owns its own `cosmic-text` [`FontSystem`] whose database
//! holds only the faces read from the font file, so shaping can never fall
//! back to an unrelated system font. The system sits behind a shared
//! mutex: cloning a `Font` is cheap and every [`crate::Text`] keeps a clone,
//! so dropping the caller's handle never invalidates live text.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cosmic_text::{fontdb, FontSystem, Style, SwashCache, Weight};
use parking_lot::{Mutex, MutexGuard};
use thiserror::Error;

/// Locale handed to `cosmic-text`; only affects fallback ordering, which a
/// single-file database never needs.
const LOCALE: &str = "en-US";

/// Well-known locations of a regular sans-serif face, tried by
/// [`system_font_path`].
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Error, Debug)]
pub enum TextError {
    #[error("failed to read font file {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no usable font face in {path}")]
    Parse { path: PathBuf },
}

/// Shaping state shared by a font and all text drawn with it.
pub(crate) struct FontCore {
    pub(crate) system: FontSystem,
    pub(crate) cache: SwashCache,
    pub(crate) family: String,
    /// Whether the file has a bold face; otherwise bold is synthesized.
    pub(crate) bold: bool,
    /// Slanted style present in the file; otherwise italic is synthesized.
    pub(crate) italic: Option<Style>,
}

/// A font loaded from a TTF/OpenType file.
#[derive(Clone)]
pub struct Font {
    core: Arc<Mutex<FontCore>>,
    path: Arc<PathBuf>,
    faces: usize,
}

impl Font {
    /// Load a font file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| TextError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        let mut db = fontdb::Database::new();
        db.load_font_data(data);
        let faces = db.len();
        let family = db
            .faces()
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .ok_or_else(|| TextError::Parse {
                path: path.to_path_buf(),
            })?;

        let bold = db.faces().any(|face| face.weight.0 >= Weight::SEMIBOLD.0);
        let italic = db
            .faces()
            .map(|face| face.style)
            .find(|style| *style != Style::Normal);

        log::info!(
            "Font loaded: {} ({} face{}) from {}",
            family,
            faces,
            if faces == 1 { "" } else { "s" },
            path.display()
        );

        let core = FontCore {
            system: FontSystem::new_with_locale_and_db(LOCALE.to_string(), db),
            cache: SwashCache::new(),
            family,
            bold,
            italic,
        };
        Ok(Self {
            core: Arc::new(Mutex::new(core)),
            path: Arc::new(path.to_path_buf()),
            faces,
        })
    }

    /// Family name of the first face in the file.
    pub fn family(&self) -> String {
        self.core.lock().family.clone()
    }

    /// Number of faces the file contained.
    pub fn face_count(&self) -> usize {
        self.faces
    }

    /// Whether the file has a bold face of its own.
    pub fn has_bold(&self) -> bool {
        self.core.lock().bold
    }

    /// Whether the file has an italic or oblique face of its own.
    pub fn has_italic(&self) -> bool {
        self.core.lock().italic.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of live handles (this one, its clones and every text using it).
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.core)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, FontCore> {
        self.core.lock()
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("path", &self.path)
            .field("faces", &self.faces)
            .finish()
    }
}

/// First regular sans-serif system font found at a well-known location.
///
/// `EASEL_FONT` overrides the search when set.
pub fn system_font_path() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os("EASEL_FONT") {
        return Some(PathBuf::from(p));
    }
    SYSTEM_FONTS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

// ===================================================================
// Tests
// ===================================================================
