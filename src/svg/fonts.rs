use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Lazily built font database shared by SVG parsing and text rendering.
///
/// Clones share one database; it is built by whichever clone asks first.
#[derive(Clone)]
pub struct FontSet {
    load_system_fonts: bool,
    dirs: Vec<PathBuf>,
    db: Arc<OnceLock<Arc<usvg::fontdb::Database>>>,
}

impl Default for FontSet {
    fn default() -> Self {
        Self::new(true)
    }
}

impl FontSet {
    /// Empty set; system fonts are loaded on first use when `load_system_fonts` is set.
    pub fn new(load_system_fonts: bool) -> Self {
        Self {
            load_system_fonts,
            dirs: Vec::new(),
            db: Arc::default(),
        }
    }

    /// Also load every `.ttf`/`.otf`/`.ttc` file directly inside `dir`.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.push(dir.into());
        self.db = Arc::default();
        self
    }

    /// The database, built on first call. Scanning system fonts blocks, so call this off the
    /// async executor.
    pub fn database(&self) -> Arc<usvg::fontdb::Database> {
        Arc::clone(self.db.get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            if self.load_system_fonts {
                db.load_system_fonts();
            }
            for dir in &self.dirs {
                load_fonts_from_dir(&mut db, dir);
            }
            tracing::debug!(faces = db.len(), "font database ready");
            Arc::new(db)
        }))
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "font directory not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(err) = db.load_font_file(&path) {
            tracing::debug!(path = %path.display(), error = %err, "skipping font file");
        }
    }
}
