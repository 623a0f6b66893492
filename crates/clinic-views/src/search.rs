//! 列表检索过滤
//!
//! 所有检索均为大小写不敏感的子串匹配。

use clinic_core::{Drug, Patient, Prescription, Template, ALL_CATEGORIES};
use serde::Serialize;
use std::collections::HashMap;

/// 处方关联不到患者时显示的姓名
pub const UNKNOWN_PATIENT: &str = "Unknown Patient";

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// 模板过滤：分类精确匹配（`All` 跳过），检索词匹配名称、描述或分类
pub fn filter_templates(templates: &[Template], search: &str, category: &str) -> Vec<Template> {
    let needle = search.to_lowercase();
    templates
        .iter()
        .filter(|t| category == ALL_CATEGORIES || t.category == category)
        .filter(|t| {
            needle.is_empty()
                || contains(&t.name, &needle)
                || contains(&t.description, &needle)
                || contains(&t.category, &needle)
        })
        .cloned()
        .collect()
}

/// 药品过滤：匹配商品名或通用名
pub fn filter_drugs(drugs: &[Drug], term: &str) -> Vec<Drug> {
    let needle = term.to_lowercase();
    drugs
        .iter()
        .filter(|d| contains(&d.name, &needle) || contains(&d.generic_name, &needle))
        .cloned()
        .collect()
}

/// 患者过滤：匹配姓名、邮箱或电话
pub fn filter_patients(patients: &[Patient], term: &str) -> Vec<Patient> {
    let needle = term.to_lowercase();
    patients
        .iter()
        .filter(|p| {
            contains(&p.name, &needle) || contains(&p.email, &needle) || contains(&p.phone, &needle)
        })
        .cloned()
        .collect()
}

/// 带患者姓名的处方列表行
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionRow {
    #[serde(flatten)]
    pub prescription: Prescription,
    pub patient_name: String,
}

/// 处方检索：匹配患者姓名、任一药品名或医嘱；空白检索词返回全部
pub fn search_prescriptions(
    prescriptions: &[Prescription],
    patients: &[Patient],
    term: &str,
) -> Vec<PrescriptionRow> {
    let names: HashMap<u32, &str> = patients.iter().map(|p| (p.id, p.name.as_str())).collect();
    let rows = prescriptions.iter().map(|prescription| PrescriptionRow {
        patient_name: names
            .get(&prescription.patient_id)
            .copied()
            .unwrap_or(UNKNOWN_PATIENT)
            .to_string(),
        prescription: prescription.clone(),
    });

    if term.trim().is_empty() {
        return rows.collect();
    }

    let needle = term.to_lowercase();
    rows.filter(|row| {
        contains(&row.patient_name, &needle)
            || row
                .prescription
                .medications
                .iter()
                .any(|med| contains(&med.name, &needle))
            || contains(&row.prescription.instructions, &needle)
    })
    .collect()
}
