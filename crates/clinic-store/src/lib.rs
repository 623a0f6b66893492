//! # Clinic Store
//!
//! 内存记录存储：
//! - 标识分配器：按 max+1 规则为新记录分配整数标识
//! - 通用记录存储：患者、预约、助理、药品、处方共用的增删改查
//! - 处方模板存储：从处方另存模板、按分类查询
//! - 延迟装饰器：在每个操作前注入可配置的模拟网络延迟
//! - 种子数据：启动时一次性载入的初始记录

pub mod allocator;
pub mod fixtures;
pub mod latency;
pub mod practice;
pub mod prescriptions;
pub mod store;

pub use allocator::{IdAllocator, IdPolicy};
pub use fixtures::Seed;
pub use latency::{Delayed, LatencyProfile};
pub use practice::{Practice, StoreOptions};
pub use prescriptions::{in_category, PrescriptionStore, TemplateCatalog};
pub use store::{MemoryStore, Repository};
