// ==========================================
// 绝缘导体规格计算系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供外层 (CLI/GUI) 调用
// ==========================================

pub mod calculator_api;
pub mod error;

// 重导出核心类型
pub use calculator_api::{CalculatorApi, CalculatorSelection};
pub use error::{ApiError, ApiResult};
