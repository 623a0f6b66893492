//! 核心数据模型定义
//!
//! 每种实体都带有由存储分配的整数标识 `Id`，其余字段采用 camelCase 命名，
//! 与前端使用的 JSON 结构保持一致。更新时使用对应的 `*Patch` 类型做浅合并。

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// 模板分类过滤时表示"全部"的哨兵值
pub const ALL_CATEGORIES: &str = "All";

/// 模板库已知分类
pub const TEMPLATE_CATEGORIES: [&str; 7] = [
    "General",
    "Chronic Care",
    "Pediatric",
    "Mental Health",
    "Neurology",
    "Cardiology",
    "Dermatology",
];

/// 预约类型
pub const APPOINTMENT_TYPES: [&str; 8] = [
    "Consultation",
    "Follow-up",
    "Check-up",
    "Emergency",
    "Procedure",
    "Lab Results",
    "Vaccination",
    "Physical Therapy",
];

/// 助理权限项
pub const PERMISSION_KEYS: [&str; 8] = [
    "viewPatients",
    "editPatients",
    "scheduleAppointments",
    "viewAppointments",
    "managePrescriptions",
    "viewPrescriptions",
    "accessDrugDatabase",
    "viewReports",
];

pub const DEFAULT_ASSISTANT_ROLE: &str = "Medical Assistant";

/// 可存入记录存储的实体
///
/// 标识由存储负责分配和维护；`merge` 只覆盖补丁中出现的字段。
pub trait Record: Clone + Send + Sync + 'static {
    /// 更新载荷，所有字段可选
    type Patch: Send + 'static;

    /// 实体名称，用于日志和错误信息
    const KIND: &'static str;

    fn id(&self) -> u32;

    fn set_id(&mut self, id: u32);

    fn merge(&mut self, patch: Self::Patch);
}

/// 删除确认
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub success: bool,
}

impl Deleted {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// 区分"字段缺失"和"字段为 null"
fn double_option<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

macro_rules! overlay {
    ($target:expr, $patch:expr, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )*
    };
}

/// 患者
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(rename = "Id", default)]
    pub id: u32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub current_medications: Vec<String>,
    #[serde(default)]
    pub medical_history: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub allergies: Option<Vec<String>>,
    pub current_medications: Option<Vec<String>>,
    pub medical_history: Option<Vec<String>>,
}

impl Record for Patient {
    type Patch = PatientPatch;
    const KIND: &'static str = "Patient";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn merge(&mut self, patch: PatientPatch) {
        overlay!(self, patch, [
            name,
            email,
            phone,
            date_of_birth,
            gender,
            address,
            allergies,
            current_medications,
            medical_history,
        ]);
    }
}

/// 预约状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

fn default_duration() -> u32 {
    30
}

/// 预约
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "Id", default)]
    pub id: u32,
    pub patient_id: u32,
    /// 创建时的患者姓名快照，不随患者记录同步
    #[serde(default)]
    pub patient_name: String,
    pub date_time: DateTime<Utc>,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    pub patient_id: Option<u32>,
    pub patient_name: Option<String>,
    pub date_time: Option<DateTime<Utc>>,
    pub duration: Option<u32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
}

impl Record for Appointment {
    type Patch = AppointmentPatch;
    const KIND: &'static str = "Appointment";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn merge(&mut self, patch: AppointmentPatch) {
        overlay!(self, patch, [
            patient_id,
            patient_name,
            date_time,
            duration,
            kind,
            status,
            notes,
        ]);
    }
}

fn default_role() -> String {
    DEFAULT_ASSISTANT_ROLE.to_string()
}

fn default_active() -> bool {
    true
}

/// 诊所助理
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assistant {
    #[serde(rename = "Id", default)]
    pub id: u32,
    pub name: String,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "Assistant::default_permissions")]
    pub permissions: BTreeMap<String, bool>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Assistant {
    /// 新助理默认只能查看预约
    pub fn default_permissions() -> BTreeMap<String, bool> {
        PERMISSION_KEYS
            .iter()
            .map(|key| (key.to_string(), *key == "viewAppointments"))
            .collect()
    }

    pub fn has_permission(&self, key: &str) -> bool {
        self.permissions.get(key).copied().unwrap_or(false)
    }

    /// 已授予的权限数量
    pub fn granted_permissions(&self) -> usize {
        self.permissions.values().filter(|granted| **granted).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub permissions: Option<BTreeMap<String, bool>>,
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub created_at: Option<Option<DateTime<Utc>>>,
}

impl Record for Assistant {
    type Patch = AssistantPatch;
    const KIND: &'static str = "Assistant";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn merge(&mut self, patch: AssistantPatch) {
        overlay!(self, patch, [name, email, role, permissions, active, created_at]);
    }
}

/// 药品参考信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drug {
    #[serde(rename = "Id", default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub generic_name: String,
    #[serde(default)]
    pub dosage_form: String,
    #[serde(default)]
    pub strength: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub interactions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrugPatch {
    pub name: Option<String>,
    pub generic_name: Option<String>,
    pub dosage_form: Option<String>,
    pub strength: Option<String>,
    pub warnings: Option<Vec<String>>,
    pub interactions: Option<Vec<String>>,
}

impl Record for Drug {
    type Patch = DrugPatch;
    const KIND: &'static str = "Drug";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn merge(&mut self, patch: DrugPatch) {
        overlay!(self, patch, [
            name,
            generic_name,
            dosage_form,
            strength,
            warnings,
            interactions,
        ]);
    }
}

/// 处方中的单条用药
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub name: String,
    #[serde(default)]
    pub generic_name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub instructions: String,
}

impl Medication {
    /// 以药品参考信息生成默认用药条目
    pub fn from_drug(drug: &Drug) -> Self {
        Self {
            name: drug.name.clone(),
            generic_name: drug.generic_name.clone(),
            dosage: drug.strength.clone(),
            frequency: "Take as needed".to_string(),
            duration: "7 days".to_string(),
            instructions: String::new(),
        }
    }
}

/// 处方
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    #[serde(rename = "Id", default)]
    pub id: u32,
    pub patient_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub instructions: String,
    /// 来源模板，自定义处方为 null
    #[serde(default)]
    pub template_id: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionPatch {
    pub patient_id: Option<u32>,
    #[serde(default, deserialize_with = "double_option")]
    pub doctor_id: Option<Option<String>>,
    pub date: Option<DateTime<Utc>>,
    pub medications: Option<Vec<Medication>>,
    pub instructions: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub template_id: Option<Option<u32>>,
}

impl Record for Prescription {
    type Patch = PrescriptionPatch;
    const KIND: &'static str = "Prescription";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn merge(&mut self, patch: PrescriptionPatch) {
        overlay!(self, patch, [
            patient_id,
            doctor_id,
            date,
            medications,
            instructions,
            template_id,
        ]);
    }
}

/// 处方模板
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(rename = "Id", default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub usage_count: u32,
    #[serde(default)]
    pub medications: Vec<Medication>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub usage_count: Option<u32>,
    pub medications: Option<Vec<Medication>>,
}

impl Record for Template {
    type Patch = TemplatePatch;
    const KIND: &'static str = "Template";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn merge(&mut self, patch: TemplatePatch) {
        overlay!(self, patch, [
            name,
            description,
            category,
            created_at,
            updated_at,
            usage_count,
            medications,
        ]);
    }
}

/// 另存为模板时调用方提供的字段
///
/// 用药列表总是取自处方本身，载荷里的 `medications` 会被忽略。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "TemplateRequest::default_category")]
    pub category: String,
}

impl TemplateRequest {
    fn default_category() -> String {
        TEMPLATE_CATEGORIES[0].to_string()
    }
}

impl Default for TemplateRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            category: Self::default_category(),
        }
    }
}
