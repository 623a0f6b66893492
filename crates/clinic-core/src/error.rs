//! 错误定义模块

use thiserror::Error;

/// 诊所系统统一错误类型
#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("验证错误: {0}")]
    Validation(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

impl ClinicError {
    /// 按实体类型和标识符构造未找到错误
    pub fn not_found(kind: &str, id: u32) -> Self {
        ClinicError::NotFound(format!("{} {} not found", kind, id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClinicError::NotFound(_))
    }
}

/// 诊所系统统一结果类型
pub type Result<T> = std::result::Result<T, ClinicError>;
