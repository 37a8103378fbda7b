use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde_json::{Map, Value};

use crate::auth::extractor::{AdminAccess, ReadAccess};
use crate::error::AppError;
use crate::models::{ApiResponse, EmailConfig, EmailConfigRequest, OrganizationList};
use crate::state::SharedState;

type Payload = Result<Json<Map<String, Value>>, JsonRejection>;

pub async fn get(
    access: ReadAccess,
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<EmailConfig>>, AppError> {
    let config = state.store.get(&code)?;

    tracing::debug!(organization = %code, access = ?access.level, "Configuration retrieved");

    Ok(Json(ApiResponse::ok(
        config,
        "Configuration retrieved successfully",
    )))
}

pub async fn create(
    _admin: AdminAccess,
    State(state): State<SharedState>,
    Path(code): Path<String>,
    payload: Payload,
) -> Result<Json<ApiResponse<EmailConfig>>, AppError> {
    let Json(fields) = payload?;
    let config = EmailConfigRequest::try_from(fields)?.validate(&code)?;

    state.store.create(&code, config.clone())?;

    tracing::info!(organization = %code, "Configuration created");

    Ok(Json(ApiResponse::ok(
        config,
        "Configuration created successfully",
    )))
}

pub async fn update(
    _admin: AdminAccess,
    State(state): State<SharedState>,
    Path(code): Path<String>,
    payload: Payload,
) -> Result<Json<ApiResponse<EmailConfig>>, AppError> {
    let Json(fields) = payload?;
    let config = EmailConfigRequest::try_from(fields)?.validate(&code)?;

    state.store.update(&code, config.clone())?;

    tracing::info!(organization = %code, "Configuration updated");

    Ok(Json(ApiResponse::ok(
        config,
        "Configuration updated successfully",
    )))
}

pub async fn delete(
    _admin: AdminAccess,
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.store.delete(&code)?;

    tracing::info!(organization = %code, "Configuration deleted");

    Ok(Json(ApiResponse::<()>::message(format!(
        "Configuration deleted for organization: {code}"
    ))))
}

pub async fn list(
    _admin: AdminAccess,
    State(state): State<SharedState>,
) -> Json<ApiResponse<OrganizationList>> {
    let organizations = state.store.list();
    let count = organizations.len();

    Json(ApiResponse::ok(
        OrganizationList {
            organizations,
            count,
        },
        format!("{count} organization(s) configured"),
    ))
}
