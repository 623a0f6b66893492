//! 种子数据
//!
//! 内置种子随 crate 编译；也可以从目录载入同名 JSON 文件。

use clinic_core::{Appointment, Assistant, Drug, Patient, Prescription, Result, Template};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{info, warn};

/// 各集合的初始记录
#[derive(Debug, Clone, Default)]
pub struct Seed {
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
    pub assistants: Vec<Assistant>,
    pub drugs: Vec<Drug>,
    pub prescriptions: Vec<Prescription>,
    pub templates: Vec<Template>,
}

impl Seed {
    /// 内置演示数据
    pub fn builtin() -> Result<Self> {
        Ok(Self {
            patients: serde_json::from_str(include_str!("../fixtures/patients.json"))?,
            appointments: serde_json::from_str(include_str!("../fixtures/appointments.json"))?,
            assistants: serde_json::from_str(include_str!("../fixtures/assistants.json"))?,
            drugs: serde_json::from_str(include_str!("../fixtures/drugs.json"))?,
            prescriptions: serde_json::from_str(include_str!("../fixtures/prescriptions.json"))?,
            templates: serde_json::from_str(include_str!("../fixtures/templates.json"))?,
        })
    }

    /// 从目录载入，缺失的文件对应空集合
    pub async fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let seed = Self {
            patients: load_file(dir, "patients.json").await?,
            appointments: load_file(dir, "appointments.json").await?,
            assistants: load_file(dir, "assistants.json").await?,
            drugs: load_file(dir, "drugs.json").await?,
            prescriptions: load_file(dir, "prescriptions.json").await?,
            templates: load_file(dir, "templates.json").await?,
        };

        info!("Loaded fixtures from {}", dir.display());
        Ok(seed)
    }
}

async fn load_file<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<Vec<T>> {
    let path = dir.join(name);
    if !tokio::fs::try_exists(&path).await? {
        warn!("Fixture {} not found, starting with an empty collection", path.display());
        return Ok(Vec::new());
    }

    let data = tokio::fs::read(&path).await?;
    Ok(serde_json::from_slice(&data)?)
}
