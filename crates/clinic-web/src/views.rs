//! 派生视图处理器

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::Json,
};
use chrono::Utc;
use clinic_core::{
    utils::{date_key, parse_date},
    Appointment, ClinicError, Drug, Medication, Patient, Prescription, Template, ALL_CATEGORIES,
};
use clinic_views::{
    add_drug, appointments_on, apply_template, build_dashboard, filter_drugs, filter_patients,
    filter_templates, patient_summary, prescription_draft, search_prescriptions, Dashboard,
    PatientSummary, PrescriptionRow,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiResult;
use crate::handlers::AppState;

/// 日期查询参数
#[derive(Debug, Deserialize)]
pub struct DateQueryParams {
    /// `YYYY-MM-DD`
    pub date: String,
}

/// 检索参数
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub category: Option<String>,
}

/// 草稿参数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftParams {
    pub patient_id: u32,
    /// 逗号分隔的药品标识，追加在模板用药之后
    #[serde(default)]
    pub drug_ids: Option<String>,
}

impl DraftParams {
    fn drug_ids(&self) -> Result<Vec<u32>, ClinicError> {
        let Some(raw) = self.drug_ids.as_deref() else {
            return Ok(Vec::new());
        };

        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse()
                    .map_err(|_| ClinicError::Validation(format!("Invalid drug id: {}", part)))
            })
            .collect()
    }
}

/// 指定日期的预约
pub async fn appointments_by_date(
    State(state): State<AppState>,
    Query(params): Query<DateQueryParams>,
) -> ApiResult<Json<Vec<Appointment>>> {
    let date = parse_date(&params.date)?;
    let appointments = state.practice.appointments.get_all().await?;

    let matched = appointments_on(&appointments, date, &state.offset);
    debug!("{} appointments on {}", matched.len(), date_key(date));
    Ok(Json(matched))
}

pub async fn template_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Template>>> {
    let templates = state.practice.templates.get_templates().await?;
    let category = params.category.as_deref().unwrap_or(ALL_CATEGORIES);
    Ok(Json(filter_templates(&templates, &params.q, category)))
}

pub async fn drug_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Drug>>> {
    let drugs = state.practice.drugs.get_all().await?;
    Ok(Json(filter_drugs(&drugs, &params.q)))
}

pub async fn patient_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Patient>>> {
    let patients = state.practice.patients.get_all().await?;
    Ok(Json(filter_patients(&patients, &params.q)))
}

/// 处方检索，结果附带患者姓名
pub async fn prescription_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<PrescriptionRow>>> {
    let practice = &state.practice;
    let (prescriptions, patients) =
        tokio::try_join!(practice.prescriptions.get_all(), practice.patients.get_all())?;

    Ok(Json(search_prescriptions(&prescriptions, &patients, &params.q)))
}

pub async fn patient_overview(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<PatientSummary>> {
    let practice = &state.practice;
    let (patient, appointments, prescriptions) = tokio::try_join!(
        practice.patients.get_by_id(id),
        practice.appointments.get_all(),
        practice.prescriptions.get_all()
    )?;

    Ok(Json(patient_summary(
        patient,
        &appointments,
        &prescriptions,
        Utc::now(),
        &state.offset,
    )))
}

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<Dashboard>> {
    let practice = &state.practice;
    let (patients, appointments, prescriptions) = tokio::try_join!(
        practice.patients.get_all(),
        practice.appointments.get_all(),
        practice.prescriptions.get_all()
    )?;

    Ok(Json(build_dashboard(
        &patients,
        &appointments,
        &prescriptions,
        Utc::now(),
        &state.offset,
    )))
}

/// 以模板开立处方草稿，草稿不写入存储
pub async fn template_draft(
    State(state): State<AppState>,
    Path(template_id): Path<u32>,
    Query(params): Query<DraftParams>,
) -> ApiResult<Json<Prescription>> {
    let drug_ids = params.drug_ids()?;
    let practice = &state.practice;
    let (template, patient) = tokio::try_join!(
        practice.templates.get_template(template_id),
        practice.patients.get_by_id(params.patient_id)
    )?;

    let mut draft = prescription_draft(&template, patient.id, Utc::now());
    for drug_id in drug_ids {
        let drug = practice.drugs.get_by_id(drug_id).await?;
        add_drug(&mut draft, &drug);
    }

    debug!(
        "Drafted prescription for patient {} from template {} ({} medications)",
        patient.id,
        template.id,
        draft.medications.len()
    );
    Ok(Json(draft))
}

/// 把模板用药合并进调用方提交的草稿
pub async fn apply_template_to_draft(
    State(state): State<AppState>,
    Path(template_id): Path<u32>,
    payload: Result<Json<Prescription>, JsonRejection>,
) -> ApiResult<Json<Prescription>> {
    let Json(mut draft) = payload?;
    let template = state.practice.templates.get_template(template_id).await?;

    apply_template(&mut draft, &template);
    Ok(Json(draft))
}

/// 药品库条目对应的默认用药
pub async fn drug_medication(
    State(state): State<AppState>,
    Path(drug_id): Path<u32>,
) -> ApiResult<Json<Medication>> {
    let drug = state.practice.drugs.get_by_id(drug_id).await?;
    Ok(Json(Medication::from_drug(&drug)))
}
