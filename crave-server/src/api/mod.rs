//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`upload`] - 图片上传接口
//! - [`categories`] - 分类管理接口
//! - [`products`] - 商品管理接口
//! - [`orders`] - 订单与销售报表接口

pub mod health;
pub mod upload;

// 数据模型 API
pub mod categories;
pub mod orders;
pub mod products;

// Re-export 处理器常用类型
pub use crate::utils::AppResult;
