// ==========================================
// 绝缘导体规格计算系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod calculation_repo;
pub mod competitor_repo;
pub mod error;
pub mod instruction_repo;
pub mod record_store;

// 重导出核心仓储
pub use calculation_repo::CalculationRecordRepository;
pub use competitor_repo::CompetitorRateRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use instruction_repo::WorkInstructionRepository;
pub use record_store::RecordStore;
