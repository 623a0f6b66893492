//! # Clinic Web
//!
//! 诊所记录系统的 HTTP JSON 接口：
//! - 患者、预约、助理、药品、处方的增删改查
//! - 处方模板库
//! - 检索、日历和仪表盘等派生视图

pub mod error;
pub mod handlers;
pub mod server;
pub mod validation;
pub mod views;

pub use error::{ApiError, ApiResult};
pub use handlers::{AppState, Resource};
pub use server::{create_app, WebServer};
pub use validation::Validate;
