//! 工具模块 - 日志与请求校验
//!
//! # 内容
//!
//! - [`logger`] - tracing 初始化
//! - [`validation`] - validator 错误展开为 `errors[]`

pub mod logger;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorCode};
pub use validation::{validate_payload, validation_messages};
