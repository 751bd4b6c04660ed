use axum::extract::FromRequest;

use crate::error::WebError;

/// `axum::Json` whose rejections (bad syntax, missing fields, unknown enum
/// values, wrong content type) answer 400 through `WebError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(WebError))]
pub struct AppJson<T>(pub T);
