//! 时间类型模块
//!
//! `Timestamp` 包装服务端下发的 ISO 8601 / RFC 3339 时间字符串，
//! 提供界面展示所需的格式化方法。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 服务端时间戳（UTC）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// 从 RFC 3339 字符串解析
    ///
    /// 返回 None 如果解析失败
    pub fn parse(s: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// 获取毫秒值
    #[inline]
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// 日期展示格式，如 `Mar 1, 2024`
    pub fn format_date(&self) -> String {
        self.0.format("%b %-d, %Y").to_string()
    }

    /// 日期时间展示格式，如 `Mar 1, 2024 10:00`
    pub fn format_datetime(&self) -> String {
        self.0.format("%b %-d, %Y %H:%M").to_string()
    }
}
