//! 时间工具函数: 日期与时刻解析
//!
//! 数据库中日期存为 `YYYY-MM-DD`，时刻存为 `HH:MM[:SS[.ffffff]]`。
//! 所有解析统一在这里完成，失败时返回校验错误。

use chrono::{NaiveDate, NaiveTime, Timelike};

use super::{AppError, AppResult};

/// 日期格式 (YYYY-MM-DD)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 格式化日期 (YYYY-MM-DD)
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 解析并规范化为 `YYYY-MM-DD`
///
/// 存储与按字符串比较的日期都必须经过这里 (`2099-1-5` → `2099-01-05`)。
pub fn normalize_date(date: &str) -> AppResult<String> {
    parse_date(date.trim()).map(format_date)
}

/// [`normalize_date`] 的 Option 版本，空串视为未设置
pub fn normalize_optional_date(date: Option<&str>) -> AppResult<Option<String>> {
    match date.map(str::trim) {
        None | Some("") => Ok(None),
        Some(date) => normalize_date(date).map(Some),
    }
}

/// 解析时刻字符串，接受 `HH:MM`、`HH:MM:SS`、`HH:MM:SS.ffffff`
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    try_parse_time(time)
        .ok_or_else(|| AppError::validation(format!("Invalid time format: {}", time)))
}

/// [`parse_time`] 的 Option 版本
pub fn try_parse_time(time: &str) -> Option<NaiveTime> {
    let time = time.trim();
    NaiveTime::parse_from_str(time, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
        .ok()
}

/// 从零点开始的分钟数
pub fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// 格式化为 `HH:MM`
pub fn format_hm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// 本地今天 (服务器时区)
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// 验证日期不在过去
pub fn validate_not_past(date: NaiveDate, today: NaiveDate) -> AppResult<()> {
    if date < today {
        return Err(AppError::new(shared::ErrorCode::BookingDateInPast)
            .with_detail("date", format_date(date)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-04").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
        assert!(parse_date("04/03/2024").is_err());
    }

    #[test]
    fn test_normalize_date_pads() {
        assert_eq!(normalize_date("2099-1-5").unwrap(), "2099-01-05");
        assert_eq!(normalize_date(" 2099-01-05 ").unwrap(), "2099-01-05");
        assert!(normalize_date("2099-13-01").is_err());
        assert_eq!(normalize_optional_date(Some("")).unwrap(), None);
        assert_eq!(
            normalize_optional_date(Some("2024-3-1")).unwrap().as_deref(),
            Some("2024-03-01")
        );
    }

    #[test]
    fn test_parse_time_formats() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(parse_time("09:00").unwrap(), nine);
        assert_eq!(parse_time("09:00:00").unwrap(), nine);
        assert_eq!(parse_time("09:00:00.000000").unwrap(), nine);
        assert!(parse_time("9h").is_err());
    }

    #[test]
    fn test_minutes_of_day() {
        assert_eq!(minutes_of_day(parse_time("09:15").unwrap()), 555);
        assert_eq!(minutes_of_day(parse_time("00:00").unwrap()), 0);
    }

    #[test]
    fn test_validate_not_past() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert!(validate_not_past(today, today).is_ok());
        let err = validate_not_past(today.pred_opt().unwrap(), today).unwrap_err();
        assert_eq!(err.code, shared::ErrorCode::BookingDateInPast);
    }
}
