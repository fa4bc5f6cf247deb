use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while attaching the page behaviour to the DOM.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("missing element {0}")]
    MissingElement(String),
    #[error("canvas has no 2d context")]
    NoCanvasContext,
    #[error("js error: {0}")]
    Js(String),
}

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        PageError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<PageError> for JsValue {
    fn from(err: PageError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type PageResult<T> = Result<T, PageError>;
