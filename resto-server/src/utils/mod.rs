//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`ApiResponse`] - API 响应结构 (from shared::error)
//! - [`logger`] - 日志初始化
//! - [`time`] - 日期/时间解析
//! - [`validation`] - 输入校验 (文本长度、时间顺序、区间重叠)

pub mod logger;
pub mod result;
pub mod time;
pub mod validation;

pub use result::AppResult;
pub use shared::error::{ApiResponse, AppError, ErrorCategory, ErrorCode};
