//! # `bourse-api` - HTTP API 网关
//!
//! 本 crate 是 Bourse 看板的 HTTP/REST 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收来自浏览器看板的 HTTP 请求
//! - 解析列表类别、历史区间、移动平均窗口等查询参数
//! - 调用下层 `DashboardManager` 完成流水线计算
//! - 将领域模型转换为 DTO 返回给前端

pub mod error;
pub mod routes;
pub mod server;
pub mod types;
