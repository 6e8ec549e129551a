use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    response::{IntoResponse, Response},
};
use crates::domain::errors::ValidationError;
use serde::{Deserialize, Serialize};

use crate::usecases::subscriptions::SubscriptionError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl IntoResponse for SubscriptionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            // Don't leak internal error detail to client
            SubscriptionError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for SubscriptionError {
    fn from(rejection: JsonRejection) -> Self {
        ValidationError::MalformedRequest(rejection.body_text()).into()
    }
}

impl From<QueryRejection> for SubscriptionError {
    fn from(rejection: QueryRejection) -> Self {
        ValidationError::MalformedRequest(rejection.body_text()).into()
    }
}

impl From<PathRejection> for SubscriptionError {
    fn from(rejection: PathRejection) -> Self {
        ValidationError::MalformedRequest(rejection.body_text()).into()
    }
}
