// ==========================================
// 绝缘导体规格计算系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误为用户友好的错误消息
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 输入不完整，计算被抑制 (尺寸/长度缺失或非正)
    #[error("输入不完整，计算未求值: {0}")]
    IncompleteInputs(String),

    /// 预设不存在
    #[error("未知绝缘预设: {0}")]
    UnknownPreset(String),

    /// 预设对当前材质不可用
    #[error("预设 {preset} 不适用于材质 {material}")]
    PresetUnavailable { preset: String, material: String },

    /// 仓储层错误透传
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
