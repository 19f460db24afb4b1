//! Extractors whose rejections use the crate's `{"error": ...}` body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::errors::AppError;

/// JSON body; malformed or mistyped input is a 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string; a missing or non-numeric `id` is a 400.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
