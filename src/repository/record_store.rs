// ==========================================
// 绝缘导体规格计算系统 - 记录存储边界
// ==========================================
// 职责: 持久化存储的契约定义 (仅边界，不约定线格式)
// 自动保存协议只依赖本 trait，不依赖具体实现
// ==========================================

use crate::domain::calculation::CalculationRecord;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

/// 计算记录存储契约
///
/// 语义约定:
/// - insert 返回记录 id；对 AUTO 记录，实现方应将
///   (owner, fingerprint) 唯一冲突视为"已持久化"并返回既有 id
/// - list_* 一律按创建时间新→旧排序
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 插入记录，返回记录 id
    async fn insert(&self, record: &CalculationRecord) -> RepositoryResult<String>;

    /// 按 (owner, fingerprint) 查找既有记录
    async fn find_by_fingerprint(
        &self,
        owner_id: &str,
        fingerprint: &str,
    ) -> RepositoryResult<Option<CalculationRecord>>;

    /// 查询指定归属者的全部记录 (新→旧)
    async fn list_by_owner(&self, owner_id: &str) -> RepositoryResult<Vec<CalculationRecord>>;

    /// 查询全部记录 (新→旧)
    async fn list_all(&self) -> RepositoryResult<Vec<CalculationRecord>>;
}
