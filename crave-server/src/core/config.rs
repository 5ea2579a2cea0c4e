use std::path::PathBuf;

use chrono_tz::Tz;

use crate::services::media::MediaConfig;

/// 服务器配置 - CraveBites 后端的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (`.env` 文件由 dotenv 预先加载)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 5000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时(毫秒) |
/// | TIMEZONE | UTC | 营业时区，用于按日统计 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | CLOUDINARY_CLOUD_NAME | - | 图片托管 cloud name |
/// | CLOUDINARY_API_KEY | - | 图片托管 API key |
/// | CLOUDINARY_API_SECRET | - | 图片托管 API secret |
/// | CLOUDINARY_FOLDER | cravebites | 上传目录 |
/// | MAX_UPLOAD_BYTES | 5242880 | 上传大小上限 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/crave HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
    /// 营业时区，按日统计销售额时使用
    pub timezone: Tz,
    /// 日志级别
    pub log_level: String,
    /// 是否输出 JSON 格式日志
    pub log_json: bool,
    /// 图片托管配置，构造上传器时传入
    pub media: MediaConfig,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            timezone: parse_timezone(std::env::var("TIMEZONE").ok().as_deref())
                .unwrap_or(chrono_tz::UTC),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            media: MediaConfig::from_env(),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 记录被忽略的无效配置
    ///
    /// [`Config::from_env`] 在日志初始化之前运行，所以回退值在这里补记警告。
    pub fn warn_on_fallbacks(&self) {
        if let Err(raw) = parse_timezone(std::env::var("TIMEZONE").ok().as_deref()) {
            tracing::warn!(
                timezone = %raw,
                fallback = %self.timezone,
                "TIMEZONE 不是有效的 IANA 时区，按日统计使用回退时区"
            );
        }
    }

    /// 数据库文件路径
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("crave.redb")
    }

    /// 日志目录
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }
}

/// 解析 IANA 时区名；未设置时为 UTC，无效时返回原始值
pub fn parse_timezone(raw: Option<&str>) -> Result<Tz, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(chrono_tz::UTC),
        Some(name) => name.parse::<Tz>().map_err(|_| name.to_string()),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
