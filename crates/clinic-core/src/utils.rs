//! 通用工具函数

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::{ClinicError, Result};

/// 由分钟数构造固定时区偏移
pub fn fixed_offset(minutes: i32) -> Result<FixedOffset> {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| ClinicError::Config(format!("Invalid UTC offset: {} minutes", minutes)))
}

/// 时间戳在给定偏移下的日历日期
pub fn local_date(timestamp: &DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    timestamp.with_timezone(offset).date_naive()
}

/// 将日期格式化为 `YYYY-MM-DD`
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 解析 `YYYY-MM-DD` 日期
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| ClinicError::Validation(format!("Invalid date '{}': {}", value, e)))
}
