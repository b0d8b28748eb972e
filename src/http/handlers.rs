//! Broker API handlers.
//!
//! Each handler pulls identifiers from the path, the query string or the
//! JSON body, calls the validated broker once, and shapes the response.

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::request::{decode_json, BindDetails, PlanQuery, ProvisionDetails};
use crate::http::response::{ApiError, BindResponse, Empty, ProvisionResponse};
use crate::http::server::AppState;

/// `GET /v2/catalog`
pub async fn catalog(State(state): State<AppState>) -> Response {
    // The platform requires a JSON object here even when nothing is offered.
    Json(state.catalog.catalog()).into_response()
}

/// `PUT /v2/service_instances/{instance_id}`
pub async fn provision(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<ProvisionResponse>), ApiError> {
    let details: ProvisionDetails = decode_json(&body)?;

    tracing::debug!(
        instance_id = %instance_id,
        service_id = %details.service_id,
        plan_id = %details.plan_id,
        organization_guid = %details.organization_guid,
        space_guid = %details.space_guid,
        has_parameters = details.parameters.is_some(),
        "Provision requested"
    );

    state
        .broker
        .provision(&instance_id, &details.service_id, &details.plan_id)
        .await
        .map_err(|e| ApiError::broker("provisioning", e))?;

    Ok((
        StatusCode::CREATED,
        Json(ProvisionResponse {
            dashboard_url: state.dashboard_url.to_string(),
        }),
    ))
}

/// `DELETE /v2/service_instances/{instance_id}?service_id=&plan_id=`
pub async fn deprovision(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Empty>, ApiError> {
    let query = PlanQuery::parse(raw.as_deref());
    tracing::debug!(
        instance_id = %instance_id,
        service_id = %query.service_id,
        plan_id = %query.plan_id,
        "Deprovision requested"
    );

    state
        .broker
        .deprovision(&instance_id, &query.service_id, &query.plan_id)
        .await
        .map_err(|e| ApiError::broker("deprovision", e))?;

    Ok(Json(Empty {}))
}

/// `PUT /v2/service_instances/{instance_id}/service_bindings/{binding_id}`
pub async fn bind(
    State(state): State<AppState>,
    Path((instance_id, binding_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<(StatusCode, Json<BindResponse>), ApiError> {
    let details: BindDetails = decode_json(&body)?;

    let resource = details.bind_resource.unwrap_or_default();
    tracing::debug!(
        instance_id = %instance_id,
        binding_id = %binding_id,
        service_id = %details.service_id,
        plan_id = %details.plan_id,
        app_guid = resource.app_guid.as_deref().unwrap_or(&details.app_guid),
        route = resource.route.as_deref().unwrap_or_default(),
        has_parameters = details.parameters.is_some(),
        "Bind requested"
    );

    let credentials = state
        .broker
        .bind(&instance_id, &binding_id, &details.service_id, &details.plan_id)
        .await
        .map_err(|e| ApiError::broker("binding", e))?;

    Ok((
        StatusCode::CREATED,
        Json(BindResponse {
            credentials,
            syslog_drain_url: state.syslog_drain_url.as_deref().map(str::to_string),
        }),
    ))
}

/// `DELETE /v2/service_instances/{instance_id}/service_bindings/{binding_id}?service_id=&plan_id=`
pub async fn unbind(
    State(state): State<AppState>,
    Path((instance_id, binding_id)): Path<(String, String)>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Empty>, ApiError> {
    let query = PlanQuery::parse(raw.as_deref());
    tracing::debug!(
        instance_id = %instance_id,
        binding_id = %binding_id,
        service_id = %query.service_id,
        plan_id = %query.plan_id,
        "Unbind requested"
    );

    state
        .broker
        .unbind(&instance_id, &binding_id, &query.service_id, &query.plan_id)
        .await
        .map_err(|e| ApiError::broker("unbinding", e))?;

    Ok(Json(Empty {}))
}
