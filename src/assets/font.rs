use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::foundation::error::{PostergenError, PostergenResult};

/// Font bytes chosen for one text field.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    /// File the bytes were read from.
    pub path: PathBuf,
    /// Raw TTF/OTF bytes.
    pub bytes: Arc<Vec<u8>>,
    /// `true` when the requested font was unusable and the default font was substituted.
    pub is_fallback: bool,
}

/// Path-and-fallback font policy.
///
/// A requested font that cannot be read resolves to the process-wide default font. Bytes are
/// cached per path for the lifetime of the library.
#[derive(Debug)]
pub struct FontLibrary {
    assets_root: PathBuf,
    default_font: PathBuf,
    cache: HashMap<PathBuf, Arc<Vec<u8>>>,
}

impl FontLibrary {
    /// Relative font paths resolve against `assets_root`.
    pub fn new(assets_root: impl Into<PathBuf>, default_font: impl Into<PathBuf>) -> Self {
        Self {
            assets_root: assets_root.into(),
            default_font: default_font.into(),
            cache: HashMap::new(),
        }
    }

    /// Path of the default font after resolution against the assets root.
    pub fn default_font_path(&self) -> PathBuf {
        self.absolutize(&self.default_font)
    }

    /// Resolve `requested` (or the default font when `None`).
    ///
    /// Only fails when the default font itself is unreadable.
    pub fn resolve(&mut self, requested: Option<&Path>) -> PostergenResult<ResolvedFont> {
        if let Some(req) = requested {
            let path = self.absolutize(req);
            match self.load(&path) {
                Ok(bytes) => {
                    return Ok(ResolvedFont {
                        path,
                        bytes,
                        is_fallback: false,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        font = %path.display(),
                        error = %e,
                        "font not usable, falling back to default font"
                    );
                }
            }
        }

        let path = self.default_font_path();
        let bytes = self.load(&path).map_err(|e| {
            PostergenError::overlay(format!(
                "default font '{}' is not readable: {e}",
                path.display()
            ))
        })?;
        Ok(ResolvedFont {
            path,
            bytes,
            is_fallback: requested.is_some(),
        })
    }

    fn absolutize(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.assets_root.join(p)
        }
    }

    fn load(&mut self, path: &Path) -> std::io::Result<Arc<Vec<u8>>> {
        if let Some(bytes) = self.cache.get(path) {
            return Ok(bytes.clone());
        }
        let bytes = std::fs::read(path)?;
        if bytes.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "font file is empty",
            ));
        }
        let bytes = Arc::new(bytes);
        self.cache.insert(path.to_path_buf(), bytes.clone());
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;

/// First TrueType font found in common system locations, for font-dependent tests.
#[cfg(test)]
pub(crate) fn probe_system_font() -> Option<PathBuf> {
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    if let Some(p) = CANDIDATES.iter().map(PathBuf::from).find(|p| p.is_file()) {
        return Some(p);
    }

    fn scan(dir: &Path, depth: usize) -> Option<PathBuf> {
        let rd = std::fs::read_dir(dir).ok()?;
        for entry in rd.flatten() {
            let path = entry.path();
            if path.is_dir() && depth > 0 {
                if let Some(found) = scan(&path, depth - 1) {
                    return Some(found);
                }
            } else if path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf"))
            {
                return Some(path);
            }
        }
        None
    }
    scan(Path::new("/usr/share/fonts"), 4)
}
