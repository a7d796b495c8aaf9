pub(crate) mod dirs;

use log::{debug, warn};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use usvg::fontdb::{Database, Source};

use crate::options::FALLBACK_FONTS;
use crate::{FontFamily, Settings};

const FONT_WEIGHTS: [&str; 3] = ["Regular", "Medium", "Bold"];
const GENERIC_FAMILY: &str = "monospace";

static SYSTEM_FONTS: Lazy<Database> = Lazy::new(|| {
    let mut db = Database::new();
    db.load_system_fonts();
    debug!("loaded {} system font faces", db.len());
    db
});

/// Font database and `font-family` list used by every text layer of one
/// screenshot.
#[derive(Clone)]
pub(crate) struct FontSet {
    pub(crate) db: Arc<Database>,
    pub(crate) family_list: String,
    /// Family loaded from the bundled font files, when one was found.
    pub(crate) bundled: Option<String>,
}

impl FontSet {
    /// Resolves `family` in order: bundled files (all weights present, so the
    /// renderer can fall back from medium to regular), the first installed
    /// fallback family, then the generic monospace family.
    pub(crate) fn load(family: FontFamily, settings: &Settings) -> Self {
        let mut db = if settings.system_fonts {
            SYSTEM_FONTS.clone()
        } else {
            Database::new()
        };

        let bundled = family
            .bundle()
            .and_then(|(dir_name, ext)| load_bundled(&mut db, settings, dir_name, ext));
        if bundled.is_none() && family != FontFamily::System {
            debug!("no bundled files for {family}, using fallback fonts");
        }

        let installed = installed_families(&db);
        let mut families: Vec<String> = Vec::new();
        if let Some(name) = &bundled {
            families.push(name.clone());
        }
        for name in FALLBACK_FONTS {
            if installed.contains(&name.to_ascii_lowercase()) {
                families.push((*name).to_string());
            }
        }
        if let Some(first) = families.first() {
            db.set_monospace_family(first.clone());
        }
        families.push(GENERIC_FAMILY.to_string());

        let family_list = families
            .iter()
            .map(|name| quote_family(name))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            db: Arc::new(db),
            family_list,
            bundled,
        }
    }
}

fn load_bundled(db: &mut Database, settings: &Settings, dir_name: &str, ext: &str) -> Option<String> {
    let dirs = match dirs::resolve_font_dirs(settings) {
        Ok(dirs) => dirs,
        Err(err) => {
            warn!("font directories unavailable: {err}");
            return None;
        }
    };
    let mut family = None;
    for dir in dirs {
        for weight in FONT_WEIGHTS {
            let path = dir.join(dir_name).join(format!("{dir_name}-{weight}.{ext}"));
            if let Some(name) = load_font_file(db, &path) {
                debug!("loaded bundled font {}", path.display());
                family.get_or_insert(name);
            }
        }
        if family.is_some() {
            break;
        }
    }
    family
}

fn load_font_file(db: &mut Database, path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    let ids = db.load_font_source(Source::File(path.to_path_buf()));
    let id = ids.first()?;
    let face = db.face(*id)?;
    face.families.first().map(|(name, _)| name.clone())
}

fn installed_families(db: &Database) -> HashSet<String> {
    let mut families = HashSet::new();
    for face in db.faces() {
        for (family, _) in &face.families {
            families.insert(family.to_ascii_lowercase());
        }
    }
    families
}

fn quote_family(name: &str) -> String {
    if name == GENERIC_FAMILY {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', ""))
    }
}
