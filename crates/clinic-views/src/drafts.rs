//! 处方草稿
//!
//! 草稿只是未保存的 `Prescription`，标识为 0。使用模板不会改变模板的
//! `usage_count`。

use chrono::{DateTime, Utc};
use clinic_core::{Drug, Medication, Prescription, Template};

/// 以模板开立草稿：复制模板用药，并记录来源模板
pub fn prescription_draft(template: &Template, patient_id: u32, now: DateTime<Utc>) -> Prescription {
    Prescription {
        id: 0,
        patient_id,
        doctor_id: None,
        date: now,
        medications: template.medications.clone(),
        instructions: String::new(),
        template_id: Some(template.id),
    }
}

/// 把模板用药合并进已有草稿，名称相同的条目保留草稿中的版本
pub fn apply_template(draft: &mut Prescription, template: &Template) {
    for medication in &template.medications {
        let present = draft
            .medications
            .iter()
            .any(|existing| existing.name.eq_ignore_ascii_case(&medication.name));
        if !present {
            draft.medications.push(medication.clone());
        }
    }
    draft.template_id = Some(template.id);
}

/// 从药品库添加一条用药，剂量取药品规格
pub fn add_drug(draft: &mut Prescription, drug: &Drug) -> Medication {
    let medication = Medication::from_drug(drug);
    draft.medications.push(medication.clone());
    medication
}
