//! JSON extraction with request validation.
//!
//! [`ValidatedJson<T>`] deserializes a request body the way `axum::Json`
//! does, then runs the DTO's `validator` rules. Malformed bodies surface as
//! 400 with a short field-level message where one can be derived; rule
//! violations surface as 422 listing every failed rule. The token-lifecycle
//! DTOs are flat string records, so no nested-path reporting is needed.

use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use shiftline_core::AppError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

/// Client-facing message for a body that never reached validation.
///
/// serde's own messages leak deserializer internals ("missing field
/// `password` at line 1 column 20"), so only the field name is kept.
fn rejection_message(rejection: &JsonRejection) -> String {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return "Missing 'Content-Type: application/json' header".to_string();
    }

    match missing_field(&rejection.body_text()) {
        Some(field) => format!("{} is required", field),
        None => "Invalid request body".to_string(),
    }
}

fn missing_field(body_text: &str) -> Option<String> {
    body_text
        .split_once("missing field `")
        .and_then(|(_, rest)| rest.split('`').next())
        .map(str::to_string)
}

/// Flattens every failed rule into one comma-separated line, sorted so the
/// output is stable across `ValidationErrors`' hash-map iteration order.
fn rule_violations(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(anyhow!(rejection_message(&rejection))))?;

        value.validate().map_err(|errors| {
            AppError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                anyhow!(rule_violations(&errors)),
            )
        })?;

        Ok(ValidatedJson(value))
    }
}
