// ==========================================
// 绝缘导体规格计算系统 - 服务层
// ==========================================
// 职责: 协调引擎/存储的有状态服务
// ==========================================

pub mod autosave;

pub use autosave::{AutosaveService, DEFAULT_DEBOUNCE_MS, DEFAULT_ERROR_DISPLAY_MS};
