use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("element `{0}` not found in document")]
    MissingElement(&'static str),
    #[error("invalid gallery data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<wasm_bindgen::JsValue> for GalleryError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        GalleryError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}
