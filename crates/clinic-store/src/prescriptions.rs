//! 处方与处方模板存储
//!
//! 模板集合由处方存储持有，拥有独立的标识空间。另存为模板时用药列表
//! 总是取自处方当前内容，而不是调用方的载荷。

use async_trait::async_trait;
use chrono::Utc;
use clinic_core::{
    Deleted, Prescription, PrescriptionPatch, Result, Template, TemplatePatch, TemplateRequest,
    ALL_CATEGORIES,
};
use tracing::info;

use crate::allocator::IdPolicy;
use crate::store::{MemoryStore, Repository};

/// 模板库操作
#[async_trait]
pub trait TemplateCatalog: Send + Sync {
    async fn get_templates(&self) -> Result<Vec<Template>>;

    /// `"All"` 返回全部模板，否则按分类精确匹配
    async fn get_templates_by_category(&self, category: &str) -> Result<Vec<Template>>;

    async fn get_template(&self, id: u32) -> Result<Template>;

    /// 以处方的用药列表创建新模板
    async fn save_as_template(&self, prescription_id: u32, request: TemplateRequest) -> Result<Template>;

    async fn update_template(&self, id: u32, patch: TemplatePatch) -> Result<Template>;

    async fn delete_template(&self, id: u32) -> Result<Deleted>;
}

/// 处方及其模板库的内存存储
#[derive(Debug, Clone)]
pub struct PrescriptionStore {
    prescriptions: MemoryStore<Prescription>,
    templates: MemoryStore<Template>,
}

impl PrescriptionStore {
    pub fn new(
        prescriptions: Vec<Prescription>,
        templates: Vec<Template>,
        policy: IdPolicy,
    ) -> Result<Self> {
        Ok(Self {
            prescriptions: MemoryStore::seeded(prescriptions, policy)?,
            templates: MemoryStore::seeded(templates, policy)?,
        })
    }
}

/// 模板是否属于给定分类过滤
pub fn in_category(template: &Template, category: &str) -> bool {
    category == ALL_CATEGORIES || template.category == category
}

#[async_trait]
impl Repository<Prescription> for PrescriptionStore {
    async fn get_all(&self) -> Result<Vec<Prescription>> {
        self.prescriptions.get_all().await
    }

    async fn get_by_id(&self, id: u32) -> Result<Prescription> {
        self.prescriptions.get_by_id(id).await
    }

    async fn create(&self, record: Prescription) -> Result<Prescription> {
        self.prescriptions.create(record).await
    }

    async fn update(&self, id: u32, patch: PrescriptionPatch) -> Result<Prescription> {
        self.prescriptions.update(id, patch).await
    }

    async fn delete(&self, id: u32) -> Result<Deleted> {
        self.prescriptions.delete(id).await
    }
}

#[async_trait]
impl TemplateCatalog for PrescriptionStore {
    async fn get_templates(&self) -> Result<Vec<Template>> {
        self.templates.get_all().await
    }

    async fn get_templates_by_category(&self, category: &str) -> Result<Vec<Template>> {
        let mut templates = self.templates.get_all().await?;
        templates.retain(|template| in_category(template, category));
        Ok(templates)
    }

    async fn get_template(&self, id: u32) -> Result<Template> {
        self.templates.get_by_id(id).await
    }

    async fn save_as_template(&self, prescription_id: u32, request: TemplateRequest) -> Result<Template> {
        let prescription = self.prescriptions.get_by_id(prescription_id).await?;

        let now = Utc::now();
        let template = Template {
            id: 0,
            name: request.name,
            description: request.description,
            category: request.category,
            created_at: now,
            updated_at: now,
            usage_count: 0,
            medications: prescription.medications,
        };

        let template = self.templates.create(template).await?;
        info!(
            "Saved prescription {} as template {} ({})",
            prescription_id, template.id, template.name
        );
        Ok(template)
    }

    async fn update_template(&self, id: u32, patch: TemplatePatch) -> Result<Template> {
        self.templates.update(id, patch).await
    }

    async fn delete_template(&self, id: u32) -> Result<Deleted> {
        self.templates.delete(id).await
    }
}
