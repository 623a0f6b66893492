//! 通用内存记录存储

use async_trait::async_trait;
use clinic_core::{ClinicError, Deleted, Record, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::allocator::{IdAllocator, IdPolicy};

/// 单一实体集合的增删改查接口
///
/// 所有返回值都是独立的副本，调用方修改副本不会影响存储内部状态。
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// 按插入顺序返回全部记录
    async fn get_all(&self) -> Result<Vec<T>>;

    async fn get_by_id(&self, id: u32) -> Result<T>;

    /// 分配新标识并追加到集合末尾，载荷中的标识被忽略
    async fn create(&self, record: T) -> Result<T>;

    /// 浅合并补丁，保留原标识和位置
    async fn update(&self, id: u32, patch: T::Patch) -> Result<T>;

    async fn delete(&self, id: u32) -> Result<Deleted>;
}

#[derive(Debug)]
struct Collection<T> {
    records: Vec<T>,
    allocator: IdAllocator,
}

impl<T: Record> Collection<T> {
    fn position(&self, id: u32) -> Result<usize> {
        self.records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| ClinicError::not_found(T::KIND, id))
    }

    fn allocate(&mut self) -> Result<u32> {
        let ids = self.records.iter().map(Record::id);
        self.allocator.allocate(ids)
    }
}

/// 以 `Vec` 为容器的记录存储
///
/// 克隆得到的是同一集合的句柄。
#[derive(Debug)]
pub struct MemoryStore<T> {
    inner: Arc<RwLock<Collection<T>>>,
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Record> MemoryStore<T> {
    pub fn new(policy: IdPolicy) -> Self {
        Self::from_collection(Collection {
            records: Vec::new(),
            allocator: IdAllocator::new(policy),
        })
    }

    /// 用种子记录初始化
    ///
    /// 标识为 0 的记录在所有显式标识登记之后按顺序分配新标识；
    /// 重复的显式标识返回验证错误。
    pub fn seeded(records: Vec<T>, policy: IdPolicy) -> Result<Self> {
        let mut allocator = IdAllocator::new(policy);
        let mut ids = HashSet::with_capacity(records.len());

        for id in records.iter().map(Record::id).filter(|id| *id != 0) {
            if !ids.insert(id) {
                return Err(ClinicError::Validation(format!(
                    "Duplicate {} id {} in seed data",
                    T::KIND,
                    id
                )));
            }
            allocator.observe(id);
        }

        let mut seeded = Vec::with_capacity(records.len());
        for mut record in records {
            if record.id() == 0 {
                let id = allocator.allocate(ids.iter().copied())?;
                ids.insert(id);
                record.set_id(id);
            }
            seeded.push(record);
        }

        debug!("Seeded {} store with {} records", T::KIND, seeded.len());
        Ok(Self::from_collection(Collection {
            records: seeded,
            allocator,
        }))
    }

    fn from_collection(collection: Collection<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(collection)),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl<T: Record> Repository<T> for MemoryStore<T> {
    async fn get_all(&self) -> Result<Vec<T>> {
        let collection = self.inner.read().await;
        debug!("Listing {} {} records", collection.records.len(), T::KIND);
        Ok(collection.records.clone())
    }

    async fn get_by_id(&self, id: u32) -> Result<T> {
        let collection = self.inner.read().await;
        let index = collection.position(id)?;
        Ok(collection.records[index].clone())
    }

    async fn create(&self, mut record: T) -> Result<T> {
        let mut collection = self.inner.write().await;
        let id = collection.allocate()?;
        record.set_id(id);
        collection.records.push(record.clone());

        info!("Created {} {}", T::KIND, id);
        Ok(record)
    }

    async fn update(&self, id: u32, patch: T::Patch) -> Result<T> {
        let mut collection = self.inner.write().await;
        let index = collection.position(id)?;

        let mut updated = collection.records[index].clone();
        updated.merge(patch);
        updated.set_id(id);
        collection.records[index] = updated.clone();

        info!("Updated {} {}", T::KIND, id);
        Ok(updated)
    }

    async fn delete(&self, id: u32) -> Result<Deleted> {
        let mut collection = self.inner.write().await;
        let index = collection.position(id)?;
        collection.records.remove(index);

        info!("Deleted {} {}", T::KIND, id);
        Ok(Deleted::ok())
    }
}
