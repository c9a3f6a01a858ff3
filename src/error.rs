//! Error handling.

use axum::{
    extract::rejection::JsonRejection,
    http::header,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ndarray::ShapeError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{event, Level};

/// Dashboard server error type
///
/// This type encapsulates the various errors that may occur.
/// Each variant may result in a different API error response.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Error reading an input file
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing a CSV input file
    #[error("failed to parse {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Input file is readable but its content is unusable
    #[error("invalid data file {}: {reason}", path.display())]
    DataFile { path: PathBuf, reason: String },

    /// Requested dashboard is not mounted
    #[error("unknown dashboard {name}")]
    UnknownDashboard { name: String },

    /// Requested output is not declared by the dashboard
    #[error("unknown output {output}")]
    UnknownOutput { output: String },

    /// Requested plotted quantity is not supported
    #[error("unknown quantity {key}")]
    UnknownQuantity { key: String },

    /// Requested scenario was not loaded
    #[error("unknown scenario {key}")]
    UnknownScenario { key: String },

    /// A control value could not be interpreted
    #[error("invalid value for {target}: {reason}")]
    InvalidInput { target: String, reason: String },

    /// Error deserialising request data into UpdateRequest
    #[error("request data is not valid")]
    RequestDataJsonRejection(#[from] JsonRejection),

    /// Error validating UpdateRequest (single error)
    #[error("request data is not valid")]
    RequestDataValidationSingle(#[from] validator::ValidationError),

    /// Error validating UpdateRequest (multiple errors)
    #[error("request data is not valid")]
    RequestDataValidation(#[from] validator::ValidationErrors),

    /// Error creating an ndarray from loaded values
    #[error("failed to create array from shape")]
    ShapeInvalid(#[from] ShapeError),

    /// Error building the callback thread pool
    #[error("failed to build thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl DashboardError {
    /// Returns an [DashboardError::InvalidInput] for the given control target.
    pub fn invalid_input(target: impl ToString, reason: impl ToString) -> Self {
        DashboardError::InvalidInput {
            target: target.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns an [DashboardError::DataFile] for the given path.
    pub fn data_file(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DashboardError::DataFile {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl IntoResponse for DashboardError {
    /// Convert from a `DashboardError` into an [axum::response::Response].
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

/// Body of error response
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorBody {
    /// Main error message
    message: String,

    /// Optional list of causes
    #[serde(skip_serializing_if = "Option::is_none")]
    caused_by: Option<Vec<String>>,
}

impl ErrorBody {
    /// Return a new ErrorBody
    ///
    /// # Arguments
    ///
    /// * `error`: The error that occurred
    fn new<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        let message = error.to_string();
        let mut caused_by = None;
        let mut current = error.source();
        while let Some(source) = current {
            let mut causes: Vec<String> = caused_by.unwrap_or_default();
            causes.push(source.to_string());
            caused_by = Some(causes);
            current = source.source();
        }
        // Remove duplicate entries.
        if let Some(caused_by) = caused_by.as_mut() {
            caused_by.dedup()
        }
        ErrorBody { message, caused_by }
    }
}

/// A response to send in error cases
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorResponse {
    /// HTTP status of the response
    #[serde(skip)]
    status: StatusCode,

    /// Response body
    error: ErrorBody,
}

impl ErrorResponse {
    /// Return a new ErrorResponse
    ///
    /// # Arguments
    ///
    /// * `status`: HTTP status of the response
    /// * `error`: The error that occurred. This will be formatted into a suitable `ErrorBody`
    fn new<E>(status: StatusCode, error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        ErrorResponse {
            status,
            error: ErrorBody::new(error),
        }
    }

    /// Return a 400 bad request ErrorResponse
    fn bad_request<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// Return a 404 not found ErrorResponse
    fn not_found<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    /// Return a 500 internal server error ErrorResponse
    fn internal_server_error<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl From<DashboardError> for ErrorResponse {
    /// Convert from a `DashboardError` into an `ErrorResponse`.
    fn from(error: DashboardError) -> Self {
        let response = match &error {
            // Bad request
            DashboardError::InvalidInput { .. }
            | DashboardError::UnknownQuantity { .. }
            | DashboardError::UnknownScenario { .. }
            | DashboardError::RequestDataJsonRejection(_)
            | DashboardError::RequestDataValidationSingle(_)
            | DashboardError::RequestDataValidation(_) => Self::bad_request(&error),

            // Not found
            DashboardError::UnknownDashboard { .. } | DashboardError::UnknownOutput { .. } => {
                Self::not_found(&error)
            }

            // Internal server error
            DashboardError::Io { .. }
            | DashboardError::Csv { .. }
            | DashboardError::DataFile { .. }
            | DashboardError::ShapeInvalid(_)
            | DashboardError::ThreadPool(_) => Self::internal_server_error(&error),
        };

        // Log server errors.
        if response.status.is_server_error() {
            event!(Level::ERROR, "{}", error.to_string());
            let mut current = error.source();
            while let Some(source) = current {
                event!(Level::ERROR, "Caused by: {}", source.to_string());
                current = source.source();
            }
        }

        response
    }
}

impl IntoResponse for ErrorResponse {
    /// Convert from an `ErrorResponse` into an `axum::response::Response`.
    ///
    /// Renders the response as JSON.
    fn into_response(self) -> Response {
        let json_body = serde_json::to_string_pretty(&self);
        match json_body {
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialise error response: {}", err),
            )
                .into_response(),
            Ok(json_body) => (
                self.status,
                [(&header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string())],
                json_body,
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use hyper::HeaderMap;

    // Jump through the hoops to get the body as a string.
    async fn body_string(response: Response) -> String {
        String::from_utf8(
            hyper::body::to_bytes(response.into_body())
                .await
                .unwrap()
                .to_vec(),
        )
        .unwrap()
    }

    async fn test_dashboard_error(
        error: DashboardError,
        status: StatusCode,
        message: &str,
        caused_by: Option<Vec<&'static str>>,
    ) {
        let response = error.into_response();
        assert_eq!(status, response.status());
        let mut headers = HeaderMap::new();
        headers.insert(&header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert_eq!(headers, *response.headers());
        let error_response: ErrorResponse =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(message.to_string(), error_response.error.message);
        // Map Vec items from str to String
        let caused_by = caused_by.map(|cb| cb.iter().map(|s| s.to_string()).collect());
        assert_eq!(caused_by, error_response.error.caused_by);
    }

    #[tokio::test]
    async fn io_error() {
        let error = DashboardError::Io {
            path: "data/foo.csv".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let message = "failed to read data/foo.csv";
        let caused_by = Some(vec!["no such file"]);
        test_dashboard_error(error, StatusCode::INTERNAL_SERVER_ERROR, message, caused_by).await;
    }

    #[tokio::test]
    async fn data_file_error() {
        let error = DashboardError::data_file("data/foo.csv", "missing column rgi_id");
        let message = "invalid data file data/foo.csv: missing column rgi_id";
        test_dashboard_error(error, StatusCode::INTERNAL_SERVER_ERROR, message, None).await;
    }

    #[tokio::test]
    async fn unknown_dashboard() {
        let error = DashboardError::UnknownDashboard {
            name: "foo".to_string(),
        };
        let message = "unknown dashboard foo";
        test_dashboard_error(error, StatusCode::NOT_FOUND, message, None).await;
    }

    #[tokio::test]
    async fn unknown_output() {
        let error = DashboardError::UnknownOutput {
            output: "foo.figure".to_string(),
        };
        let message = "unknown output foo.figure";
        test_dashboard_error(error, StatusCode::NOT_FOUND, message, None).await;
    }

    #[tokio::test]
    async fn unknown_quantity() {
        let error = DashboardError::UnknownQuantity {
            key: "mass".to_string(),
        };
        let message = "unknown quantity mass";
        test_dashboard_error(error, StatusCode::BAD_REQUEST, message, None).await;
    }

    #[tokio::test]
    async fn invalid_input() {
        let error = DashboardError::invalid_input("area_slider.value", "expected two numbers");
        let message = "invalid value for area_slider.value: expected two numbers";
        test_dashboard_error(error, StatusCode::BAD_REQUEST, message, None).await;
    }

    #[tokio::test]
    async fn request_data_validation_single() {
        let validation_error = validator::ValidationError::new("foo");
        let error = DashboardError::RequestDataValidationSingle(validation_error);
        let message = "request data is not valid";
        let caused_by = Some(vec!["Validation error: foo [{}]"]);
        test_dashboard_error(error, StatusCode::BAD_REQUEST, message, caused_by).await;
    }

    #[tokio::test]
    async fn request_data_validation() {
        let mut validation_errors = validator::ValidationErrors::new();
        let validation_error = validator::ValidationError::new("foo");
        validation_errors.add("bar", validation_error);
        let error = DashboardError::RequestDataValidation(validation_errors);
        let message = "request data is not valid";
        let caused_by = Some(vec!["bar: Validation error: foo [{}]"]);
        test_dashboard_error(error, StatusCode::BAD_REQUEST, message, caused_by).await;
    }

    #[tokio::test]
    async fn shape_error() {
        let error = DashboardError::ShapeInvalid(ShapeError::from_kind(
            ndarray::ErrorKind::OutOfBounds,
        ));
        let message = "failed to create array from shape";
        let caused_by = Some(vec!["ShapeError/OutOfBounds: out of bounds indexing"]);
        test_dashboard_error(error, StatusCode::INTERNAL_SERVER_ERROR, message, caused_by).await;
    }
}
