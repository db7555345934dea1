use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single rejected configuration field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Field-level detail returned by a configuration handler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// `Ok(value)` when nothing was recorded, otherwise the collected errors
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Service type already registered: {service_type}")]
    DuplicateType { service_type: String },

    #[error("Unsupported service type: {service_type}")]
    UnknownType { service_type: String },

    #[error("Invalid configuration for {service_type}: {errors}")]
    InvalidConfig {
        service_type: String,
        errors: ValidationErrors,
    },

    #[error("Failed to construct {service_type} service: {cause}")]
    Construction { service_type: String, cause: String },

    #[error("Database driver {kind} factory already registered: {driver}")]
    DuplicateDriver { driver: String, kind: &'static str },

    #[error("Unknown database driver: {driver}")]
    UnknownDriver { driver: String },

    #[error("Connection failed to {database}: {cause}")]
    ConnectionFailed { database: String, cause: String },

    #[error("Query {query} failed in {database}: {cause}")]
    QueryFailed {
        database: String,
        query: String,
        cause: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<ValidationErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String) -> Self {
        Self {
            error: error.to_string(),
            message,
            service_type: None,
            fields: None,
            cause: None,
        }
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, error_response) = match self {
            RegistryError::DuplicateType { service_type } => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    service_type: Some(service_type),
                    ..ErrorResponse::new("duplicate_service_type", message)
                },
            ),
            RegistryError::UnknownType { service_type } => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    service_type: Some(service_type),
                    ..ErrorResponse::new("unknown_service_type", message)
                },
            ),
            RegistryError::InvalidConfig {
                service_type,
                errors,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    service_type: Some(service_type),
                    fields: Some(errors),
                    ..ErrorResponse::new("invalid_config", message)
                },
            ),
            RegistryError::Construction {
                service_type,
                cause,
            } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    service_type: Some(service_type),
                    cause: Some(cause),
                    ..ErrorResponse::new("construction_failed", message)
                },
            ),
            RegistryError::DuplicateDriver { .. } => (
                StatusCode::CONFLICT,
                ErrorResponse::new("duplicate_driver", message),
            ),
            RegistryError::UnknownDriver { .. } => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("unknown_driver", message),
            ),
            RegistryError::ConnectionFailed { cause, .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse {
                    cause: Some(cause),
                    ..ErrorResponse::new("connection_failed", message)
                },
            ),
            RegistryError::QueryFailed { cause, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    cause: Some(cause),
                    ..ErrorResponse::new("query_failed", message)
                },
            ),
            RegistryError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("internal_error", msg),
            ),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<tokio_postgres::Error> for RegistryError {
    fn from(err: tokio_postgres::Error) -> Self {
        RegistryError::Internal(err.to_string())
    }
}

impl From<deadpool_postgres::PoolError> for RegistryError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        RegistryError::Internal(format!("Pool error: {}", err))
    }
}

impl From<anyhow::Error> for RegistryError {
    fn from(err: anyhow::Error) -> Self {
        RegistryError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
