//! Request bodies and query strings of the broker API.
//!
//! Absent fields decode to the empty string. Whether an identifier is
//! acceptable is decided by the validating broker, not by the decoder.
//! Bodies must be JSON objects.

use serde::{
    de::{DeserializeOwned, Error as _},
    Deserialize, Serialize,
};
use serde_json::{Map, Value};

use crate::http::response::ApiError;

/// Body of `PUT /v2/service_instances/{instance_id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvisionDetails {
    pub service_id: String,
    pub plan_id: String,
    pub organization_guid: String,
    pub space_guid: String,

    /// Opaque, service-specific configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

/// The application or route a binding is created for.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BindResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_guid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

/// Body of `PUT /v2/service_instances/{instance_id}/service_bindings/{binding_id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BindDetails {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub app_guid: String,
    pub plan_id: String,
    pub service_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_resource: Option<BindResource>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

/// Query string of both DELETE routes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlanQuery {
    pub service_id: String,
    pub plan_id: String,
}

impl PlanQuery {
    /// Read `service_id` and `plan_id` from a raw query string.
    ///
    /// The first occurrence of a repeated key wins. Absent keys and an absent
    /// query string leave the field empty.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut service_id = None;
        let mut plan_id = None;

        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "service_id" if service_id.is_none() => service_id = Some(value.into_owned()),
                "plan_id" if plan_id.is_none() => plan_id = Some(value.into_owned()),
                _ => {}
            }
        }

        Self {
            service_id: service_id.unwrap_or_default(),
            plan_id: plan_id.unwrap_or_default(),
        }
    }
}

/// Decode a JSON request body into `T`.
///
/// Anything other than a JSON object is rejected, so arrays are never
/// mapped onto struct fields by position.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(ApiError::Decode)?;
    if !value.is_object() {
        return Err(ApiError::Decode(serde_json::Error::custom(
            "request body must be a JSON object",
        )));
    }
    serde_json::from_value(value).map_err(ApiError::Decode)
}
