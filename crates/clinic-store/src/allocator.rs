//! 标识分配器

use clinic_core::{ClinicError, Result};
use serde::{Deserialize, Serialize};

/// 标识复用策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdPolicy {
    /// 取当前集合最大标识加一；删除最大记录后该编号会被再次分配
    #[default]
    ReuseFreed,
    /// 记录历史最高标识，进程生命周期内不再复用
    NeverReuse,
}

/// 集合内的标识分配器
#[derive(Debug, Clone)]
pub struct IdAllocator {
    policy: IdPolicy,
    high_water: u32,
}

impl IdAllocator {
    pub fn new(policy: IdPolicy) -> Self {
        Self {
            policy,
            high_water: 0,
        }
    }

    /// 记录一个已存在的标识（种子数据载入时调用）
    pub fn observe(&mut self, id: u32) {
        self.high_water = self.high_water.max(id);
    }

    /// 分配下一个标识，空集合从 1 开始
    pub fn allocate<I>(&mut self, existing: I) -> Result<u32>
    where
        I: IntoIterator<Item = u32>,
    {
        let current_max = existing.into_iter().max().unwrap_or(0);
        let base = match self.policy {
            IdPolicy::ReuseFreed => current_max,
            IdPolicy::NeverReuse => current_max.max(self.high_water),
        };

        let next = base
            .checked_add(1)
            .ok_or_else(|| ClinicError::Internal("Identifier space exhausted".to_string()))?;

        self.high_water = self.high_water.max(next);
        Ok(next)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(IdPolicy::default())
    }
}
