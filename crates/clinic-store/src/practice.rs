//! 诊所存储容器
//!
//! 启动时构造一次，以 `Arc` 句柄传给所有使用方。

use clinic_core::{Appointment, Assistant, Drug, Patient, Prescription, Record, Result};
use std::sync::Arc;
use tracing::info;

use crate::allocator::IdPolicy;
use crate::fixtures::Seed;
use crate::latency::{Delayed, LatencyProfile};
use crate::prescriptions::{PrescriptionStore, TemplateCatalog};
use crate::store::{MemoryStore, Repository};

/// 存储构造选项
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    pub id_policy: IdPolicy,
    /// `None` 表示不注入延迟
    pub latency: Option<LatencyProfile>,
}

/// 全部实体存储
///
/// `prescriptions` 与 `templates` 指向同一个处方存储。
#[derive(Clone)]
pub struct Practice {
    pub patients: Arc<dyn Repository<Patient>>,
    pub appointments: Arc<dyn Repository<Appointment>>,
    pub assistants: Arc<dyn Repository<Assistant>>,
    pub drugs: Arc<dyn Repository<Drug>>,
    pub prescriptions: Arc<dyn Repository<Prescription>>,
    pub templates: Arc<dyn TemplateCatalog>,
}

impl Practice {
    /// 种子中出现重复标识时返回验证错误
    pub fn new(seed: Seed, options: &StoreOptions) -> Result<Self> {
        let latency = options.latency.filter(|profile| !profile.is_zero());
        let policy = options.id_policy;

        let store = PrescriptionStore::new(seed.prescriptions, seed.templates, policy)?;
        let (prescriptions, templates): (Arc<dyn Repository<Prescription>>, Arc<dyn TemplateCatalog>) =
            match latency {
                Some(profile) => {
                    let delayed = Delayed::new(store, profile);
                    (Arc::new(delayed.clone()), Arc::new(delayed))
                }
                None => (Arc::new(store.clone()), Arc::new(store)),
            };

        info!(
            "Initialised practice stores (policy: {:?}, latency: {})",
            policy,
            if latency.is_some() { "simulated" } else { "off" }
        );

        Ok(Self {
            patients: repository(seed.patients, policy, latency)?,
            appointments: repository(seed.appointments, policy, latency)?,
            assistants: repository(seed.assistants, policy, latency)?,
            drugs: repository(seed.drugs, policy, latency)?,
            prescriptions,
            templates,
        })
    }

    /// 空存储，不注入延迟
    pub fn empty() -> Result<Self> {
        Self::new(Seed::default(), &StoreOptions::default())
    }
}

fn repository<T: Record>(
    records: Vec<T>,
    policy: IdPolicy,
    latency: Option<LatencyProfile>,
) -> Result<Arc<dyn Repository<T>>> {
    let store = MemoryStore::seeded(records, policy)?;
    Ok(match latency {
        Some(profile) => Arc::new(Delayed::new(store, profile)),
        None => Arc::new(store),
    })
}
