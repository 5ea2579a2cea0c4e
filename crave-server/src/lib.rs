//! CraveBites Server - 外卖点餐后端
//!
//! # 架构概述
//!
//! - **订单** (`orders`): 订单校验、编号生成、状态与支付
//! - **报表** (`reports`): 基于已送达订单的销售统计
//! - **数据库** (`db`): 嵌入式 redb 文档存储
//! - **HTTP API** (`api`): RESTful 接口
//! - **服务** (`services`): 路由装配、图片托管
//!
//! # 模块结构
//!
//! ```text
//! crave-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── db/            # redb 存储与仓库
//! ├── orders/        # 订单编号、校验、服务
//! ├── reports/       # 销售报表
//! ├── services/      # HTTP 装配、图片上传
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod reports;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use orders::OrderService;
pub use services::{build_app, build_router};
pub use utils::{AppError, AppResult, ErrorCode};

// Re-export 日志初始化函数
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env 并初始化日志
///
/// 必须在 [`Config::from_env`] 之前调用，否则 .env 中的变量不会生效。
pub fn setup_environment() -> std::io::Result<Config> {
    // .env 是可选的
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    std::fs::create_dir_all(config.log_dir())?;
    init_logger_with_file(
        Some(config.log_level.as_str()),
        config.log_json,
        Some(config.log_dir().as_path()),
    );
    config.warn_on_fallbacks();
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   ______                     ____  _ __
  / ____/________ __   _____ / __ )(_) /____  _____
 / /   / ___/ __ `/ | / / _ \/ __  / / __/ _ \/ ___/
/ /___/ /  / /_/ /| |/ /  __/ /_/ / / /_/  __(__  )
\____/_/   \__,_/ |___/\___/_____/_/\__/\___/____/
    "#
    );
}
