use thiserror::Error;

use crate::db::StorageError;

/// 服务器启动/运行错误
///
/// 请求级错误使用 [`shared::error::AppError`]；这里只包含会导致进程退出的错误。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("存储初始化失败: {0}")]
    Storage(#[from] StorageError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
