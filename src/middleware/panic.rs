use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tower_http::catch_panic::CatchPanicLayer;

use crate::response::JsonApiResponse;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Turns handler panics into a 500 envelope. Panic details are only
/// echoed back in debug builds.
pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_to_json as PanicHandler)
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic"
    }
}

fn panic_to_json(panic: Box<dyn Any + Send + 'static>) -> Response {
    let data = if cfg!(debug_assertions) {
        json!({ "panic": panic_message(panic.as_ref()) })
    } else {
        Value::Null
    };

    JsonApiResponse {
        status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        message: "Internal server error".to_string(),
        data,
    }
    .into_response()
}
