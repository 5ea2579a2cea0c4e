//! Request validation helpers
//!
//! Payload structs derive `validator::Validate`; failures are flattened into
//! the `errors[]` list of a 400 response. Malformed JSON bodies are reported
//! the same way instead of axum's plain-text rejection.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use validator::{Validate, ValidationErrors};

use crate::utils::{AppError, AppResult};

/// One message per failed rule, ordered by field name
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid ({})", e.code),
            })
        })
        .collect()
}

/// Unwrap a JSON body and run its `Validate` rules
pub fn validate_payload<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    let Json(payload) = json_body(payload)?;
    payload
        .validate()
        .map_err(|e| AppError::validation_errors(validation_messages(&e)))?;
    Ok(payload)
}

/// Map a JSON extraction failure to a validation error
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<Json<T>> {
    payload.map_err(|rejection| AppError::validation(rejection.body_text()))
}
