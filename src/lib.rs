//! EduPortal - 在线教学平台核心库
//!
//! 课程活动的提交资格判断、成绩计算与提交生命周期，以及访问后端 REST 接口的客户端。
//!
//! # 架构
//! - `client`: 后端接口客户端（Transport / FileStore）
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `services`: 提交资格、成绩计算、提交生命周期（纯函数）
//! - `utils`: 校验工具函数

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;
