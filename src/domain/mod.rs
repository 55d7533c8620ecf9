// ==========================================
// 绝缘导体规格计算系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、预设目录
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod calculation;
pub mod competitor;
pub mod instruction;
pub mod preset;
pub mod types;

// 重导出核心类型
pub use calculation::{
    BareResult, CalcResult, CalculationInputs, CalculationRecord, CalculationSnapshot,
    DualLayerBreakdown, InsulationResult,
};
pub use competitor::CompetitorRate;
pub use instruction::{InstructionStatus, InvalidTransition, WorkInstruction};
pub use preset::{
    find_preset, presets_for_material, DualLayerSpec, FactorRule, FactorValue, InsulationPreset,
    ThicknessRule, VoltageOption, CATALOG, DEFAULT_FACTOR, DEFAULT_THICKNESS,
};
pub use types::{CalcMode, Material, SaveMode, SaveStatus, Shape};
