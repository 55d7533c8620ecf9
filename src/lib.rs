// ==========================================
// 绝缘导体规格计算系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 工程师决策支持工具 (规格换算 + 台账记录)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 闭式计算公式
pub mod engine;

// 数据仓储层 - 数据访问
pub mod repository;

// 服务层 - 自动保存协议
pub mod service;

// 配置层 - 系统配置
pub mod config;

// 身份边界
pub mod identity;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CalcMode, Material, SaveMode, SaveStatus, Shape};

// 领域实体
pub use domain::{
    BareResult, CalcResult, CalculationInputs, CalculationRecord, CalculationSnapshot,
    CompetitorRate, DualLayerBreakdown, InstructionStatus, InsulationPreset, InsulationResult,
    WorkInstruction, CATALOG,
};

// 目录查找
pub use domain::preset::{find_preset, presets_for_material};

// 引擎
pub use engine::{
    fingerprint, FactorEngine, GeometryEngine, PricingEngine, DEFAULT_SPEED_M_HR,
};

// 服务
pub use service::AutosaveService;

// 仓储
pub use repository::{
    CalculationRecordRepository, CompetitorRateRepository, RecordStore, RepositoryError,
    RepositoryResult, WorkInstructionRepository,
};

// 身份
pub use identity::{AnonymousIdentity, FixedIdentityProvider, IdentityProvider};

// API
pub use api::{ApiError, ApiResult, CalculatorApi, CalculatorSelection};

// 应用
pub use app::{get_default_db_path, AppState};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "绝缘导体规格计算系统";
