//! Response bodies and error mapping.
//!
//! # Status mapping
//! - Malformed JSON body → 422 Unprocessable Entity
//! - Any broker failure (blank identifier, backend error, deadline) → 504
//! - Missing or wrong credentials → 401 with a Basic challenge
//!
//! Errors are rendered as `{"Description": "..."}`.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::broker::{BrokerError, Credentials};
use crate::http::auth::BASIC_CHALLENGE;

/// Error returned by a broker API handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to decode JSON request body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("{operation} failed: {source}")]
    Broker {
        operation: &'static str,
        source: BrokerError,
    },

    #[error("not authorized")]
    Unauthorized,
}

impl ApiError {
    /// Wrap a broker failure with the operation that produced it.
    pub fn broker(operation: &'static str, source: BrokerError) -> Self {
        ApiError::Broker { operation, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Decode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            // Validation failures share the backend status; platforms already
            // integrated against this broker expect 504 for both.
            ApiError::Broker { .. } => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    #[serde(rename = "Description")]
    pub description: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorBody {
            description: self.to_string(),
        });

        match self {
            ApiError::Unauthorized => {
                (status, [(header::WWW_AUTHENTICATE, BASIC_CHALLENGE)], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

/// Body of a successful provision.
#[derive(Debug, Serialize)]
pub struct ProvisionResponse {
    pub dashboard_url: String,
}

/// Body of a successful bind.
#[derive(Debug, Serialize)]
pub struct BindResponse {
    pub credentials: Credentials,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub syslog_drain_url: Option<String>,
}

/// `{}`, returned by deprovision and unbind.
#[derive(Debug, Serialize)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            ApiError::Decode(decode).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::broker("provisioning", BrokerError::Blank { field: "plan_id" }).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_broker_error_message() {
        let err = ApiError::broker("binding", BrokerError::Blank { field: "binding_id" });
        assert_eq!(err.to_string(), "binding failed: binding_id is blank");

        let body = serde_json::to_value(ErrorBody {
            description: err.to_string(),
        })
        .unwrap();
        assert_eq!(body["Description"], "binding failed: binding_id is blank");
    }

    #[test]
    fn test_unauthorized_has_challenge() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            BASIC_CHALLENGE
        );
    }

    #[test]
    fn test_success_bodies() {
        assert_eq!(serde_json::to_string(&Empty {}).unwrap(), "{}");

        let bind = BindResponse {
            credentials: Credentials::new(),
            syslog_drain_url: None,
        };
        assert_eq!(serde_json::to_string(&bind).unwrap(), r#"{"credentials":{}}"#);
    }
}
