use gltext_atlas::AtlasError;
use wasm_bindgen::JsValue;

/// Error categories.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Failed to initialize WebGL context or retrieve DOM elements.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// Shader compilation, linking, or program creation errors.
    #[error("Shader error: {0}")]
    Shader(String),

    /// WebGL resource creation or management errors.
    #[error("Resource error: {0}")]
    Resource(String),

    /// External data loading or parsing errors.
    #[error("Data error: {0}")]
    Data(String),

    /// The font could not be resolved, measured or laid out.
    #[error("Font error: {0}")]
    Font(#[from] AtlasError),
}

impl Error {
    // Initialization errors
    pub fn window_not_found() -> Self {
        Self::Initialization("Unable to retrieve window".to_string())
    }

    pub fn document_not_found() -> Self {
        Self::Initialization("Unable to retrieve document".to_string())
    }

    pub fn canvas_not_found() -> Self {
        Self::Initialization("Unable to retrieve canvas".to_string())
    }

    pub fn webgl_context_failed() -> Self {
        Self::Initialization("Failed to retrieve WebGL2 rendering context".to_string())
    }

    pub fn canvas_context_failed() -> Self {
        Self::Initialization("Failed to retrieve canvas rendering context".to_string())
    }

    // Shader errors
    pub fn shader_creation_failed(detail: &str) -> Self {
        Self::Shader(format!("Shader creation failed: {detail}"))
    }

    pub fn shader_program_creation_failed() -> Self {
        Self::Shader("Shader program creation failed".to_string())
    }

    pub fn shader_link_failed(log: String) -> Self {
        Self::Shader(format!("Shader linking failed: {log}"))
    }

    // Resource errors
    pub fn buffer_creation_failed(buffer_type: &str) -> Self {
        Self::Resource(format!("Failed to create {buffer_type} buffer"))
    }

    pub fn buffer_capacity_invalid(max_vertices: usize, max_indices: usize) -> Self {
        Self::Resource(format!(
            "Buffer capacity must be non-zero: {max_vertices} vertices, {max_indices} indices"
        ))
    }

    pub fn vertex_array_creation_failed() -> Self {
        Self::Resource("Failed to create vertex array object".to_string())
    }

    pub fn texture_creation_failed() -> Self {
        Self::Resource("Failed to create texture".to_string())
    }

    pub fn uniform_location_failed(name: &str) -> Self {
        Self::Resource(format!("Failed to get uniform location: {name}"))
    }

    // Data errors
    pub fn image_load_failed(detail: &str) -> Self {
        Self::Data(format!("Failed to load image: {detail}"))
    }

    pub fn deserialization_failed(message: String) -> Self {
        Self::Data(format!("Failed to deserialize: {message}"))
    }
}

impl From<Error> for JsValue {
    fn from(error: Error) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use gltext_data::LayoutError;

    use super::*;

    #[test]
    fn test_font_errors_keep_their_cause() {
        let layout = LayoutError::CellSizeOutOfRange { cell_width: 4, cell_height: 200 };
        let error: Error = AtlasError::from(layout).into();

        assert!(matches!(error, Error::Font(AtlasError::Layout(_))));
        assert!(error.to_string().starts_with("Font error: "));
    }

    #[test]
    fn test_helper_messages() {
        assert_eq!(
            Error::uniform_location_failed("u_Color").to_string(),
            "Resource error: Failed to get uniform location: u_Color"
        );
        assert_eq!(
            Error::buffer_capacity_invalid(0, 6).to_string(),
            "Resource error: Buffer capacity must be non-zero: 0 vertices, 6 indices"
        );
    }
}
