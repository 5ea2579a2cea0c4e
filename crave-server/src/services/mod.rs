//! 服务模块 - HTTP 路由装配与外部协作者

pub mod https;
pub mod media;

pub use https::{build_app, build_router};
pub use media::{CloudinaryUploader, MediaConfig, MediaUploader, UploadedMedia};
