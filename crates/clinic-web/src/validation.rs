//! 请求载荷校验
//!
//! 存储层只检查标识是否存在，字段层面的规则在进入存储之前由这里执行。

use clinic_core::{
    Appointment, AppointmentPatch, Assistant, AssistantPatch, ClinicError, Drug, DrugPatch,
    Medication, Patient, PatientPatch, Prescription, PrescriptionPatch, Result, TemplatePatch,
    TemplateRequest, APPOINTMENT_TYPES,
};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").unwrap());

/// 载荷校验
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 收集全部违规项后一次性返回
#[derive(Debug, Default)]
struct Violations(Vec<String>);

impl Violations {
    fn required(&mut self, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.0.push(message.to_string());
        }
    }

    /// 补丁中出现的字段不能为空白
    fn present(&mut self, value: Option<&String>, message: &str) {
        if let Some(value) = value {
            self.required(value, message);
        }
    }

    fn email(&mut self, value: &str) {
        if value.trim().is_empty() {
            self.0.push("Email is required".to_string());
        } else if !EMAIL_RE.is_match(value) {
            self.0.push("Email is invalid".to_string());
        }
    }

    fn check(&mut self, ok: bool, message: &str) {
        if !ok {
            self.0.push(message.to_string());
        }
    }

    /// 预约类型必须是已知类型之一
    fn appointment_type(&mut self, kind: &str) {
        if kind.trim().is_empty() {
            self.0.push("Appointment type is required".to_string());
        } else if !APPOINTMENT_TYPES.contains(&kind) {
            self.0.push(format!("Unknown appointment type: {}", kind));
        }
    }

    fn medications(&mut self, medications: &[Medication]) {
        self.check(!medications.is_empty(), "Please add at least one medication");
        self.check(
            medications.iter().all(|med| !med.name.trim().is_empty()),
            "Medication name is required",
        );
    }

    fn finish(self) -> Result<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ClinicError::Validation(self.0.join("; ")))
        }
    }
}

impl Validate for Patient {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::default();
        v.required(&self.name, "Name is required");
        v.email(&self.email);
        v.required(&self.phone, "Phone is required");
        v.required(&self.gender, "Gender is required");
        v.finish()
    }
}

impl Validate for PatientPatch {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::default();
        v.present(self.name.as_ref(), "Name is required");
        if let Some(email) = &self.email {
            v.email(email);
        }
        v.present(self.phone.as_ref(), "Phone is required");
        v.present(self.gender.as_ref(), "Gender is required");
        v.finish()
    }
}

impl Validate for Appointment {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::default();
        v.check(self.patient_id != 0, "Patient is required");
        v.appointment_type(&self.kind);
        v.check(self.duration > 0, "Duration must be positive");
        v.finish()
    }
}

impl Validate for AppointmentPatch {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::default();
        v.check(self.patient_id != Some(0), "Patient is required");
        if let Some(kind) = &self.kind {
            v.appointment_type(kind);
        }
        v.check(self.duration != Some(0), "Duration must be positive");
        v.finish()
    }
}

impl Validate for Assistant {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::default();
        v.required(&self.name, "Name is required");
        v.email(&self.email);
        v.required(&self.role, "Role is required");
        v.finish()
    }
}

impl Validate for AssistantPatch {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::default();
        v.present(self.name.as_ref(), "Name is required");
        if let Some(email) = &self.email {
            v.email(email);
        }
        v.present(self.role.as_ref(), "Role is required");
        v.finish()
    }
}

impl Validate for Drug {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::default();
        v.required(&self.name, "Name is required");
        v.finish()
    }
}

impl Validate for DrugPatch {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::default();
        v.present(self.name.as_ref(), "Name is required");
        v.finish()
    }
}

impl Validate for Prescription {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::default();
        v.check(self.patient_id != 0, "Please select a patient");
        v.medications(&self.medications);
        v.finish()
    }
}

impl Validate for PrescriptionPatch {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::default();
        v.check(self.patient_id != Some(0), "Please select a patient");
        if let Some(medications) = &self.medications {
            v.medications(medications);
        }
        v.finish()
    }
}

impl Validate for TemplateRequest {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::default();
        v.required(&self.name, "Please enter a template name");
        v.required(&self.category, "Category is required");
        v.finish()
    }
}

impl Validate for TemplatePatch {
    fn validate(&self) -> Result<()> {
        let mut v = Violations::default();
        v.present(self.name.as_ref(), "Please enter a template name");
        v.present(self.category.as_ref(), "Category is required");
        if let Some(medications) = &self.medications {
            v.medications(medications);
        }
        v.finish()
    }
}
