//! 模拟网络延迟
//!
//! `Delayed` 包装任意存储，在每个操作执行前等待配置的时长。等待和操作
//! 在独立任务中运行：调用方放弃等待后，操作仍会完成并修改状态。

use async_trait::async_trait;
use clinic_core::{
    ClinicError, Deleted, Record, Result, Template, TemplatePatch, TemplateRequest,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::prescriptions::TemplateCatalog;
use crate::store::Repository;

/// 各类操作的延迟
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyProfile {
    /// 列表查询
    pub list: Duration,
    /// 单条查询
    pub get: Duration,
    /// 创建、更新、另存模板
    pub write: Duration,
    pub delete: Duration,
}

impl LatencyProfile {
    /// 与前端模拟 API 一致的延迟
    pub fn api_like() -> Self {
        Self {
            list: Duration::from_millis(300),
            get: Duration::from_millis(200),
            write: Duration::from_millis(400),
            delete: Duration::from_millis(300),
        }
    }

    pub fn none() -> Self {
        Self {
            list: Duration::ZERO,
            get: Duration::ZERO,
            write: Duration::ZERO,
            delete: Duration::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::none()
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self::api_like()
    }
}

/// 带延迟的存储装饰器
#[derive(Debug, Clone)]
pub struct Delayed<R> {
    inner: R,
    profile: LatencyProfile,
}

impl<R> Delayed<R>
where
    R: Clone + Send + Sync + 'static,
{
    pub fn new(inner: R, profile: LatencyProfile) -> Self {
        Self { inner, profile }
    }

    pub fn profile(&self) -> &LatencyProfile {
        &self.profile
    }

    async fn run<F, Fut, O>(&self, delay: Duration, op: F) -> Result<O>
    where
        F: FnOnce(R) -> Fut + Send + 'static,
        Fut: Future<Output = Result<O>> + Send + 'static,
        O: Send + 'static,
    {
        let inner = self.inner.clone();
        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            op(inner).await
        });

        handle
            .await
            .map_err(|e| ClinicError::Internal(format!("Store operation aborted: {}", e)))?
    }
}

#[async_trait]
impl<T, R> Repository<T> for Delayed<R>
where
    T: Record,
    R: Repository<T> + Clone + 'static,
{
    async fn get_all(&self) -> Result<Vec<T>> {
        self.run(self.profile.list, |store| async move { store.get_all().await })
            .await
    }

    async fn get_by_id(&self, id: u32) -> Result<T> {
        self.run(self.profile.get, move |store| async move { store.get_by_id(id).await })
            .await
    }

    async fn create(&self, record: T) -> Result<T> {
        self.run(self.profile.write, move |store| async move { store.create(record).await })
            .await
    }

    async fn update(&self, id: u32, patch: T::Patch) -> Result<T> {
        self.run(self.profile.write, move |store| async move {
            store.update(id, patch).await
        })
        .await
    }

    async fn delete(&self, id: u32) -> Result<Deleted> {
        self.run(self.profile.delete, move |store| async move { store.delete(id).await })
            .await
    }
}

#[async_trait]
impl<R> TemplateCatalog for Delayed<R>
where
    R: TemplateCatalog + Clone + 'static,
{
    async fn get_templates(&self) -> Result<Vec<Template>> {
        self.run(self.profile.list, |store| async move { store.get_templates().await })
            .await
    }

    async fn get_templates_by_category(&self, category: &str) -> Result<Vec<Template>> {
        let category = category.to_string();
        self.run(self.profile.list, move |store| async move {
            store.get_templates_by_category(&category).await
        })
        .await
    }

    async fn get_template(&self, id: u32) -> Result<Template> {
        self.run(self.profile.get, move |store| async move { store.get_template(id).await })
            .await
    }

    async fn save_as_template(&self, prescription_id: u32, request: TemplateRequest) -> Result<Template> {
        self.run(self.profile.write, move |store| async move {
            store.save_as_template(prescription_id, request).await
        })
        .await
    }

    async fn update_template(&self, id: u32, patch: TemplatePatch) -> Result<Template> {
        self.run(self.profile.write, move |store| async move {
            store.update_template(id, patch).await
        })
        .await
    }

    async fn delete_template(&self, id: u32) -> Result<Deleted> {
        self.run(self.profile.delete, move |store| async move {
            store.delete_template(id).await
        })
        .await
    }
}
