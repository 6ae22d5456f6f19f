//! 时间工具函数 — 业务时区转换
//!
//! 所有日期解析统一在 API handler 层完成，
//! repository 层只接收 `YYYY-MM-DD` 字符串和 `i64` Unix millis。

use chrono::NaiveDate;
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 验证日期不在未来 (业务时区)
pub fn validate_not_future(date: NaiveDate, tz: Tz) -> AppResult<()> {
    let today = today(tz);
    if date > today {
        return Err(AppError::validation(format!(
            "Date {} is in the future (today is {})",
            date, today
        )));
    }
    Ok(())
}

/// 当前业务日期 (业务时区)
pub fn today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

/// 当前业务日期字符串 (YYYY-MM-DD)
pub fn today_string(tz: Tz) -> String {
    today(tz).format("%Y-%m-%d").to_string()
}
