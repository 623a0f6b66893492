//! HTTP处理器

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::FixedOffset;
use clinic_core::{
    Appointment, Assistant, Deleted, Drug, Patient, Prescription, Record, Template, TemplatePatch,
    TemplateRequest,
};
use clinic_store::{Practice, Repository};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiResult;
use crate::validation::Validate;

/// 处理器共享状态
#[derive(Clone)]
pub struct AppState {
    pub practice: Practice,
    /// 按日期归档预约时使用的偏移
    pub offset: FixedOffset,
    pub service_name: String,
}

impl AppState {
    pub fn new(practice: Practice, offset: FixedOffset) -> Self {
        Self {
            practice,
            offset,
            service_name: "Clinic Records API".to_string(),
        }
    }
}

/// 以通用增删改查路由暴露的实体
pub trait Resource: Record + Serialize + DeserializeOwned + Validate {
    fn repository(practice: &Practice) -> Arc<dyn Repository<Self>>;
}

impl Resource for Patient {
    fn repository(practice: &Practice) -> Arc<dyn Repository<Self>> {
        practice.patients.clone()
    }
}

impl Resource for Appointment {
    fn repository(practice: &Practice) -> Arc<dyn Repository<Self>> {
        practice.appointments.clone()
    }
}

impl Resource for Assistant {
    fn repository(practice: &Practice) -> Arc<dyn Repository<Self>> {
        practice.assistants.clone()
    }
}

impl Resource for Drug {
    fn repository(practice: &Practice) -> Arc<dyn Repository<Self>> {
        practice.drugs.clone()
    }
}

impl Resource for Prescription {
    fn repository(practice: &Practice) -> Arc<dyn Repository<Self>> {
        practice.prescriptions.clone()
    }
}

/// API根路径处理器
pub async fn api_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "health": "/health",
            "api": "/api/v1",
            "views": "/api/v1/views"
        }
    }))
}

/// 健康检查处理器
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn list_records<T: Resource>(State(state): State<AppState>) -> ApiResult<Json<Vec<T>>> {
    let records = T::repository(&state.practice).get_all().await?;
    Ok(Json(records))
}

pub async fn get_record<T: Resource>(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<T>> {
    let record = T::repository(&state.practice).get_by_id(id).await?;
    Ok(Json(record))
}

pub async fn create_record<T: Resource>(
    State(state): State<AppState>,
    payload: Result<Json<T>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<T>)> {
    let Json(record) = payload?;
    record.validate()?;

    let created = T::repository(&state.practice).create(record).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_record<T>(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    payload: Result<Json<T::Patch>, JsonRejection>,
) -> ApiResult<Json<T>>
where
    T: Resource,
    T::Patch: DeserializeOwned + Validate,
{
    let Json(patch) = payload?;
    patch.validate()?;

    let updated = T::repository(&state.practice).update(id, patch).await?;
    Ok(Json(updated))
}

pub async fn delete_record<T: Resource>(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<Deleted>> {
    let deleted = T::repository(&state.practice).delete(id).await?;
    Ok(Json(deleted))
}

/// 模板查询参数
#[derive(Debug, Default, Deserialize)]
pub struct TemplateQueryParams {
    pub category: Option<String>,
}

pub async fn list_templates(
    State(state): State<AppState>,
    Query(params): Query<TemplateQueryParams>,
) -> ApiResult<Json<Vec<Template>>> {
    let catalog = &state.practice.templates;
    let templates = match params.category.as_deref() {
        Some(category) => catalog.get_templates_by_category(category).await?,
        None => catalog.get_templates().await?,
    };
    Ok(Json(templates))
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<Template>> {
    let template = state.practice.templates.get_template(id).await?;
    Ok(Json(template))
}

pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    payload: Result<Json<TemplatePatch>, JsonRejection>,
) -> ApiResult<Json<Template>> {
    let Json(patch) = payload?;
    patch.validate()?;

    let template = state.practice.templates.update_template(id, patch).await?;
    Ok(Json(template))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<Deleted>> {
    let deleted = state.practice.templates.delete_template(id).await?;
    Ok(Json(deleted))
}

/// 将处方另存为模板，用药列表取自存储中的处方
pub async fn save_as_template(
    State(state): State<AppState>,
    Path(prescription_id): Path<u32>,
    payload: Result<Json<TemplateRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Template>)> {
    let Json(request) = payload?;
    request.validate()?;

    info!("Saving prescription {} as template '{}'", prescription_id, request.name);
    let template = state
        .practice
        .templates
        .save_as_template(prescription_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(template)))
}
