use std::path::PathBuf;
use std::sync::Arc;

use crate::core::{Config, Result};
use crate::db::DbService;
use crate::orders::OrderService;
use crate::services::{CloudinaryUploader, MediaUploader};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 克隆成本低 (内部均为 Arc)，每个请求处理器都会拿到一份。
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Arc<Config>,
    /// redb 文档存储
    pub db: DbService,
    /// 图片托管
    pub media: Arc<dyn MediaUploader>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 创建工作目录
    /// 2. 打开数据库 (work_dir/crave.redb)
    /// 3. 构造 Cloudinary 上传客户端
    pub async fn initialize(config: &Config) -> Result<Self> {
        tokio::fs::create_dir_all(&config.work_dir).await?;

        let db_path = config.database_path();
        let db = DbService::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Database opened");

        if !config.media.is_configured() {
            tracing::warn!("Cloudinary credentials missing, image uploads will fail");
        }
        let media = Arc::new(CloudinaryUploader::new(config.media.clone()));

        Ok(Self::with_parts(config.clone(), db, media))
    }

    /// 使用现成组件构造 (测试用内存数据库、模拟上传)
    pub fn with_parts(config: Config, db: DbService, media: Arc<dyn MediaUploader>) -> Self {
        Self {
            config: Arc::new(config),
            db,
            media,
        }
    }

    pub fn orders(&self) -> OrderService {
        OrderService::new(self.db.clone(), self.config.timezone)
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }
}
