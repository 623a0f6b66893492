//! 仪表盘与患者概览

use chrono::{DateTime, Days, FixedOffset, Utc};
use clinic_core::{utils::local_date, Appointment, AppointmentStatus, Patient, Prescription};
use serde::Serialize;

use crate::calendar::{age_from_birth_date, appointments_for_patient, appointments_on};

/// 仪表盘列表的条目上限
const PREVIEW_LIMIT: usize = 5;

/// 近期处方的天数窗口
const RECENT_PRESCRIPTION_DAYS: i64 = 7;

/// 仪表盘统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_patients: usize,
    pub today_appointments: usize,
    /// 今日仍处于 scheduled 状态的预约
    pub pending_tasks: usize,
    pub recent_prescriptions: usize,
}

/// 仪表盘
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub today_appointments: Vec<Appointment>,
    pub tomorrow_appointments: Vec<Appointment>,
    /// 最近加入的患者，新的在前
    pub recent_patients: Vec<Patient>,
}

pub fn build_dashboard(
    patients: &[Patient],
    appointments: &[Appointment],
    prescriptions: &[Prescription],
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> Dashboard {
    let today = local_date(&now, offset);
    let today_appointments = appointments_on(appointments, today, offset);
    let tomorrow_appointments = today
        .checked_add_days(Days::new(1))
        .map(|tomorrow| appointments_on(appointments, tomorrow, offset))
        .unwrap_or_default();

    let recent_prescriptions = prescriptions
        .iter()
        .filter(|p| (now - p.date).num_days() <= RECENT_PRESCRIPTION_DAYS)
        .count();

    let stats = DashboardStats {
        total_patients: patients.len(),
        today_appointments: today_appointments.len(),
        pending_tasks: today_appointments
            .iter()
            .filter(|apt| apt.status == AppointmentStatus::Scheduled)
            .count(),
        recent_prescriptions,
    };

    Dashboard {
        stats,
        today_appointments: today_appointments.into_iter().take(PREVIEW_LIMIT).collect(),
        tomorrow_appointments,
        recent_patients: patients.iter().rev().take(PREVIEW_LIMIT).cloned().collect(),
    }
}

/// 患者详情页所需的数据
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub patient: Patient,
    pub age: i32,
    pub appointments: Vec<Appointment>,
    pub prescriptions: Vec<Prescription>,
}

pub fn patient_summary(
    patient: Patient,
    appointments: &[Appointment],
    prescriptions: &[Prescription],
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> PatientSummary {
    let age = age_from_birth_date(patient.date_of_birth, local_date(&now, offset));
    PatientSummary {
        age,
        appointments: appointments_for_patient(appointments, patient.id),
        prescriptions: prescriptions
            .iter()
            .filter(|p| p.patient_id == patient.id)
            .cloned()
            .collect(),
        patient,
    }
}
