use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures at the browser boundary. Core gameplay has no error paths.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("canvas 2d context unavailable")]
    NoCanvasContext,
    #[error("invalid config: {0}")]
    Config(String),
    #[error("js error: {0}")]
    Js(String),
}

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type GameResult<T> = Result<T, GameError>;
