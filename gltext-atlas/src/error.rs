use gltext_data::LayoutError;

/// Failures while resolving a font or building its atlas.
///
/// No partial atlas is produced when any of these occur.
#[derive(thiserror::Error, Debug)]
pub enum AtlasError {
    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Invalid font size {0}; must be a positive number of pixels")]
    InvalidFontSize(f32),

    #[error("Unable to read font data: {0}")]
    FontData(String),

    #[error("Atlas layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Rasterized atlas is inconsistent: {0}")]
    Validation(String),
}
