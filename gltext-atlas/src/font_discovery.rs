use std::collections::BTreeMap;

use cosmic_text::{fontdb, FontSystem};

/// An installed font family and the faces it provides.
#[derive(Debug, Clone)]
pub struct FontFamily {
    pub name: String,
    pub faces: Vec<fontdb::ID>,
    pub monospaced: bool,
}

pub struct FontDiscovery {
    font_system: FontSystem,
}

impl FontDiscovery {
    pub fn new() -> Self {
        // FontSystem::new loads the system fonts
        Self { font_system: FontSystem::new() }
    }

    /// Lists all installed font families, sorted by name.
    pub fn discover_families(&self) -> Vec<FontFamily> {
        let db = self.font_system.db();
        let mut families: BTreeMap<String, FontFamily> = BTreeMap::new();

        // group faces by family name
        for face in db.faces() {
            let family_name = face
                .families
                .first()
                .map(|(name, _)| name.clone())
                .unwrap_or_else(|| "Unknown".to_string());

            let family = families.entry(family_name.clone()).or_insert_with(|| FontFamily {
                name: family_name,
                faces: Vec::new(),
                monospaced: true,
            });

            family.faces.push(face.id);
            family.monospaced &= face.monospaced;
        }

        families.into_values().collect()
    }

    /// Finds the face named `name`, matched case-insensitively against family
    /// names first and PostScript names second.
    ///
    /// For a family match, the regular upright face is preferred.
    pub fn resolve(&self, name: &str) -> Option<fontdb::ID> {
        resolve_face(self.font_system.db(), name)
    }

    pub fn into_font_system(self) -> FontSystem {
        self.font_system
    }
}

impl Default for FontDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_face(db: &fontdb::Database, name: &str) -> Option<fontdb::ID> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    let by_family = db
        .faces()
        .filter(|face| face.families.iter().any(|(family, _)| family.to_lowercase() == wanted))
        .min_by_key(|face| regular_distance(face));

    by_family
        .or_else(|| db.faces().find(|face| face.post_script_name.to_lowercase() == wanted))
        .map(|face| face.id)
}

fn regular_distance(face: &fontdb::FaceInfo) -> (bool, u16) {
    let slanted = face.style != fontdb::Style::Normal;
    let weight_delta = face.weight.0.abs_diff(fontdb::Weight::NORMAL.0);
    (slanted, weight_delta)
}
