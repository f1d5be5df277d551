use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::Debug;

use crate::planner::PlanError;

#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        read_error(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        read_error(err)
    }
}

impl From<PlanError> for Error {
    fn from(err: PlanError) -> Self {
        let code = match err {
            PlanError::InvalidRoute(_) => 102,
            PlanError::InvalidParameters(_) => 103,
            PlanError::RangeExhausted { .. } => 104,
        };

        Error {
            code,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn missing_endpoints_error() -> Error {
    Error {
        code: 101,
        message: "Start and end locations are required.".into(),
    }
}

pub fn missing_column_error(column: &str) -> Error {
    Error {
        code: 105,
        message: format!("missing column \"{}\"", column),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn database_error<T: Debug>(_: T) -> Error {
    Error {
        code: 2,
        message: "database error".into(),
    }
}

pub fn reqwest_error(_: reqwest::Error) -> Error {
    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn unexpected_error() -> Error {
    Error {
        code: 5,
        message: "unexpected error".into(),
    }
}

pub fn config_error(name: &str) -> Error {
    Error {
        code: 6,
        message: format!("invalid configuration value for {}", name),
    }
}

pub fn read_error<T: Debug>(err: T) -> Error {
    tracing::error!("failed to read input: {:?}", err);

    Error {
        code: 7,
        message: "read error".into(),
    }
}

#[test]
fn plan_errors_are_client_facing() {
    let err: Error = PlanError::RangeExhausted {
        lat: 1.0,
        lng: 2.0,
        max_range: 500.0,
    }
    .into();

    assert_eq!(err.code, 104);
    assert!(err.message.contains("500"));

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn internal_errors_hide_their_message() {
    let response = upstream_error().into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = config_error("VEHICLE_MPG").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
