use axum::{
    async_trait,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use common::FieldErrors;
use std::error::Error;
use tracing::warn;

use crate::schemas::{ErrorResponse, HandlerError};

/// Key for messages that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// JSON request body whose rejections use the API error shape.
///
/// A body that parses but does not fit the request type is a validation
/// failure reported against the offending field.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection_response(rejection)),
        }
    }
}

fn json_rejection_response(rejection: JsonRejection) -> HandlerError {
    warn!("Rejected request body: {}", rejection.body_text());

    let detail = match &rejection {
        JsonRejection::JsonDataError(err) => err.source().map(|source| source.to_string()),
        JsonRejection::JsonSyntaxError(err) => err.source().map(|source| source.to_string()),
        _ => None,
    };

    match (&rejection, detail) {
        (JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_), Some(detail)) => {
            let (field, message) = split_field_path(&detail);
            let mut fields = FieldErrors::new();
            fields.insert(field, vec![message]);

            let mut body = ErrorResponse::new("VALIDATION_ERROR", "Invalid input");
            body.fields = Some(fields);
            (StatusCode::BAD_REQUEST, Json(body))
        }
        (JsonRejection::MissingJsonContentType(_), _) => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(ErrorResponse::new("UNSUPPORTED_MEDIA_TYPE", rejection.body_text())),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("BAD_REQUEST", rejection.body_text())),
        ),
    }
}

/// Splits `duration: invalid type: ...` into the top-level field name and
/// the message. Errors without a path go under [`NON_FIELD_ERRORS`].
fn split_field_path(detail: &str) -> (String, String) {
    let detail = match detail.rfind(" at line ") {
        Some(idx) => &detail[..idx],
        None => detail,
    };

    if let Some((path, message)) = detail.split_once(": ") {
        let is_path = !path.is_empty()
            && path
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'));
        if is_path {
            let field = path.split(['.', '[']).next().unwrap_or(path);
            return (field.to_string(), message.to_string());
        }
    }

    (NON_FIELD_ERRORS.to_string(), detail.to_string())
}
