//! Conversion of AppError into HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let code = error_to_code(&self);

        let error_response = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::new(code, &format!("{entity} not found"))
                .with_details(json!({ "field": field, "value": value })),
            AppError::Validation { field, reason } => {
                ErrorResponse::new(code, reason).with_details(json!({ "field": field }))
            }
            AppError::ValidationErrors { errors } => {
                let details: Vec<_> = errors
                    .iter()
                    .map(|e| json!({ "field": e.field, "message": e.message }))
                    .collect();
                ErrorResponse::new(code, "Request validation failed")
                    .with_details(json!({ "errors": details }))
            }
            AppError::BadRequest { message } => ErrorResponse::new(code, message),
            AppError::Scheduler {
                job_id, operation, ..
            } => ErrorResponse::new(code, "Scheduler operation failed")
                .with_details(json!({ "job_id": job_id.to_string(), "operation": operation })),
            // internal details are not leaked to clients
            AppError::Configuration { .. } | AppError::Internal { .. } => {
                ErrorResponse::new(code, "An internal error occurred")
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Maps an AppError variant to its HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::ValidationErrors { .. } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Scheduler { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Validation { .. } => "VALIDATION_ERROR",
        AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Scheduler { .. } => "SCHEDULER_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn not_found_maps_to_404() {
        let error = AppError::NotFound {
            entity: "CronJob".to_string(),
            field: "id".to_string(),
            value: "123".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::NOT_FOUND);
        assert_eq!(error_to_code(&error), "NOT_FOUND");
    }

    #[test]
    fn validation_maps_to_400() {
        let error = AppError::Validation {
            field: "start_date".to_string(),
            reason: "bad format".to_string(),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::BAD_REQUEST);
        assert_eq!(error_to_code(&error), "VALIDATION_ERROR");
    }

    #[test]
    fn scheduler_maps_to_500() {
        let error = AppError::Scheduler {
            job_id: Uuid::new_v4(),
            operation: "arm",
            source: anyhow::anyhow!("boom"),
        };
        assert_eq!(error_to_status_code(&error), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_to_code(&error), "SCHEDULER_ERROR");
    }

    #[test]
    fn internal_response_does_not_leak_source() {
        let error = AppError::Internal {
            source: anyhow::anyhow!("secret database string"),
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
