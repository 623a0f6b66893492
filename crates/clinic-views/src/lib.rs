//! # Clinic Views
//!
//! 基于存储输出的纯函数视图：
//! - 日历：年龄计算、按日期归档预约
//! - 检索：模板、药品、患者、处方过滤
//! - 仪表盘：当日统计和患者概览
//! - 处方草稿：由模板或药品库生成未保存的处方

pub mod calendar;
pub mod dashboard;
pub mod drafts;
pub mod search;

pub use calendar::{age_from_birth_date, appointments_for_patient, appointments_on};
pub use dashboard::{build_dashboard, patient_summary, Dashboard, DashboardStats, PatientSummary};
pub use drafts::{add_drug, apply_template, prescription_draft};
pub use search::{
    filter_drugs, filter_patients, filter_templates, search_prescriptions, PrescriptionRow,
    UNKNOWN_PATIENT,
};
