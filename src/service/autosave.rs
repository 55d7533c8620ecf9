// ==========================================
// 绝缘导体规格计算系统 - 自动保存服务
// ==========================================
// 职责: 防抖 + 指纹去重的幂等自动保存协议
// 状态机: IDLE → PENDING → {SAVED, ERROR} → IDLE
// ==========================================
// 防抖语义: debounce 而非 throttle —
// 每次状态变更作废先前的挂起定时器，只保存"最后稳定状态"，
// 任一中间态都不落库；同一会话任意时刻至多一个挂起定时器。
// 取消实现: JoinHandle::abort + 代数 (generation) 双重校验，
// 仅持有当前代数的任务允许提交。
// ==========================================
// 竞争口径: check-then-insert 非事务。越过取消窗口的并发提交
// 依赖存储层 (owner, fingerprint) AUTO 唯一索引退化为幂等插入。
// ==========================================

use crate::domain::calculation::{CalculationRecord, CalculationSnapshot};
use crate::domain::types::{SaveMode, SaveStatus};
use crate::engine::fingerprint::fingerprint;
use crate::identity::IdentityProvider;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::RecordStore;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

/// 缺省防抖延迟（毫秒）
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// ERROR 状态展示时长（毫秒），到期自动回 IDLE
pub const DEFAULT_ERROR_DISPLAY_MS: u64 = 3000;

// ==========================================
// 会话内部状态
// ==========================================
struct SessionInner {
    /// 防抖代数；每次 schedule 递增，旧任务校验失配后放弃提交
    generation: u64,
    status: SaveStatus,
    pending: Option<JoinHandle<()>>,
    last_saved_record_id: Option<String>,
}

// ==========================================
// AutosaveService - 自动保存服务
// ==========================================
pub struct AutosaveService {
    store: Arc<dyn RecordStore>,
    identity: Arc<dyn IdentityProvider>,
    debounce: Duration,
    error_display: Duration,
    inner: Arc<Mutex<SessionInner>>,
}

impl AutosaveService {
    pub fn new(store: Arc<dyn RecordStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::with_timing(
            store,
            identity,
            Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            Duration::from_millis(DEFAULT_ERROR_DISPLAY_MS),
        )
    }

    /// 指定防抖/错误展示时长创建 (配置层与测试使用)
    pub fn with_timing(
        store: Arc<dyn RecordStore>,
        identity: Arc<dyn IdentityProvider>,
        debounce: Duration,
        error_display: Duration,
    ) -> Self {
        Self {
            store,
            identity,
            debounce,
            error_display,
            inner: Arc::new(Mutex::new(SessionInner {
                generation: 0,
                status: SaveStatus::Idle,
                pending: None,
                last_saved_record_id: None,
            })),
        }
    }

    /// 当前会话保存状态
    pub fn status(&self) -> SaveStatus {
        self.inner.lock().map(|g| g.status).unwrap_or(SaveStatus::Idle)
    }

    /// 最近一次提交 (或命中既有记录) 的记录 id
    pub fn last_saved_record_id(&self) -> Option<String> {
        self.inner
            .lock()
            .ok()
            .and_then(|g| g.last_saved_record_id.clone())
    }

    // ==========================================
    // 自动保存调度
    // ==========================================

    /// 计算状态变更后调度一次防抖提交
    ///
    /// - 无归属身份: no-op (自动保存静默跳过)
    /// - 作废任何先前挂起的定时器，转入 PENDING
    /// - 定时器到点后: 先查 (owner, fingerprint)，命中则复用既有
    ///   记录转 SAVED；未命中插入 AUTO 记录转 SAVED
    /// - 存储失败转 ERROR，错误展示超时后自动回 IDLE，不重试
    #[instrument(skip(self, snapshot), fields(mode = %snapshot.mode, shape = %snapshot.shape))]
    pub fn schedule(&self, snapshot: CalculationSnapshot) {
        let Some(owner_id) = self.identity.current_owner_id() else {
            debug!("自动保存跳过: 无归属身份");
            return;
        };

        let fp = fingerprint(&snapshot);

        let generation = {
            let mut guard = match self.inner.lock() {
                Ok(g) => g,
                Err(_) => return,
            };
            if let Some(handle) = guard.pending.take() {
                handle.abort();
            }
            guard.generation += 1;
            guard.status = SaveStatus::Pending;
            guard.generation
        };

        let store = Arc::clone(&self.store);
        let inner = Arc::clone(&self.inner);
        let debounce = self.debounce;
        let error_display = self.error_display;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            // 休眠期间若有新调度，本任务已被作废
            if !generation_is_current(&inner, generation) {
                return;
            }

            let outcome = commit_auto(&store, &snapshot, &owner_id, &fp).await;

            let mut guard = match inner.lock() {
                Ok(g) => g,
                Err(_) => return,
            };
            if guard.generation != generation {
                return;
            }

            match outcome {
                Ok(record_id) => {
                    guard.status = SaveStatus::Saved;
                    guard.last_saved_record_id = Some(record_id);
                }
                Err(e) => {
                    warn!("自动保存失败: {}", e);
                    guard.status = SaveStatus::Error;
                    drop(guard);

                    // 错误展示超时后自动回 IDLE (仍受代数校验约束)
                    let inner_clear = Arc::clone(&inner);
                    tokio::spawn(async move {
                        tokio::time::sleep(error_display).await;
                        if let Ok(mut g) = inner_clear.lock() {
                            if g.generation == generation && g.status == SaveStatus::Error {
                                g.status = SaveStatus::Idle;
                            }
                        }
                    });
                }
            }
        });

        if let Ok(mut guard) = self.inner.lock() {
            guard.pending = Some(handle);
        }
    }

    // ==========================================
    // 显式保存
    // ==========================================

    /// 显式保存：绕过去重，总是插入 MANUAL 记录
    ///
    /// 独立于防抖状态机；调用期即 SAVING，
    /// Ok 即 SAVED，Err 即 ERROR，由调用方展示
    pub async fn manual_save(&self, snapshot: &CalculationSnapshot) -> RepositoryResult<String> {
        let owner_id = self
            .identity
            .current_owner_id()
            .ok_or(RepositoryError::NoOwner)?;

        let fp = fingerprint(snapshot);
        let record = CalculationRecord::from_snapshot(snapshot, &owner_id, &fp, SaveMode::Manual);
        self.store.insert(&record).await
    }

    /// 等待挂起的提交结束 (测试与进程收尾使用)
    pub async fn flush(&self) {
        let handle = {
            match self.inner.lock() {
                Ok(mut g) => g.pending.take(),
                Err(_) => None,
            }
        };
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

fn generation_is_current(inner: &Arc<Mutex<SessionInner>>, generation: u64) -> bool {
    inner
        .lock()
        .map(|g| g.generation == generation)
        .unwrap_or(false)
}

/// 提交一次自动保存: 查重 → 命中复用 / 未命中插入
async fn commit_auto(
    store: &Arc<dyn RecordStore>,
    snapshot: &CalculationSnapshot,
    owner_id: &str,
    fp: &str,
) -> RepositoryResult<String> {
    if let Some(existing) = store.find_by_fingerprint(owner_id, fp).await? {
        debug!(record_id = %existing.record_id, "指纹命中，复用既有记录");
        return Ok(existing.record_id);
    }

    let record = CalculationRecord::from_snapshot(snapshot, owner_id, fp, SaveMode::Auto);
    store.insert(&record).await
}
