// ==========================================
// 绝缘导体规格计算系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 说明: 全部仓储共享同一 SQLite 连接 (Arc<Mutex>)，
// 避免多连接下 PRAGMA/busy 行为不一致
// ==========================================

use std::sync::{Arc, Mutex};

use anyhow::Context;
use rusqlite::Connection;

use crate::api::CalculatorApi;
use crate::config::ConfigManager;
use crate::db;
use crate::engine::{FactorEngine, PricingEngine};
use crate::identity::IdentityProvider;
use crate::repository::{
    CalculationRecordRepository, CompetitorRateRepository, RecordStore, WorkInstructionRepository,
};
use crate::service::AutosaveService;

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 计算器 API (求值 + 自动保存编排)
    pub calculator_api: Arc<CalculatorApi>,

    /// 自动保存服务
    pub autosave: Arc<AutosaveService>,

    /// 计算记录存储
    pub record_store: Arc<dyn RecordStore>,

    /// 竞争对手报价仓储
    pub competitor_repo: Arc<CompetitorRateRepository>,

    /// 生产工单仓储
    pub instruction_repo: Arc<WorkInstructionRepository>,

    /// 配置管理
    pub config: Arc<ConfigManager>,

    /// 系数反解引擎
    pub factor_engine: FactorEngine,

    /// LME 价格派生引擎
    pub pricing_engine: PricingEngine,
}

impl AppState {
    /// 创建应用状态
    ///
    /// # 参数
    /// - db_path: 数据库文件路径 (不存在则创建并建表)
    /// - identity: 身份提供方
    pub fn new(db_path: &str, identity: Arc<dyn IdentityProvider>) -> anyhow::Result<Self> {
        let conn = db::open_sqlite_connection(db_path)
            .with_context(|| format!("无法打开数据库: {}", db_path))?;
        db::init_schema(&conn).context("schema 初始化失败")?;

        let shared = Arc::new(Mutex::new(conn));

        let config = Arc::new(
            ConfigManager::from_connection(Arc::clone(&shared))
                .map_err(|e| anyhow::anyhow!("配置管理器初始化失败: {}", e))?,
        );

        let record_store: Arc<dyn RecordStore> = Arc::new(
            CalculationRecordRepository::from_connection(Arc::clone(&shared)),
        );
        let competitor_repo = Arc::new(CompetitorRateRepository::from_connection(Arc::clone(
            &shared,
        )));
        let instruction_repo = Arc::new(WorkInstructionRepository::from_connection(Arc::clone(
            &shared,
        )));

        let debounce = config
            .autosave_debounce()
            .map_err(|e| anyhow::anyhow!("读取防抖配置失败: {}", e))?;
        let error_display = config
            .error_display()
            .map_err(|e| anyhow::anyhow!("读取错误展示配置失败: {}", e))?;

        let autosave = Arc::new(AutosaveService::with_timing(
            Arc::clone(&record_store),
            Arc::clone(&identity),
            debounce,
            error_display,
        ));

        let calculator_api = Arc::new(CalculatorApi::new(
            Arc::clone(&autosave),
            Arc::clone(&record_store),
            identity,
        ));

        Ok(Self {
            db_path: db_path.to_string(),
            calculator_api,
            autosave,
            record_store,
            competitor_repo,
            instruction_repo,
            config,
            factor_engine: FactorEngine::new(),
            pricing_engine: PricingEngine::new(),
        })
    }
}

/// 缺省数据库路径
///
/// 优先级: 环境变量 CONDUCTOR_CALC_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("CONDUCTOR_CALC_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./conductor_calc.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("conductor-calc");
        std::fs::create_dir_all(&dir).ok();
        path = dir.join("conductor_calc.db");
    }

    path.to_string_lossy().to_string()
}

// 保留类型别名便于测试直接操作底层连接
pub type SharedConnection = Arc<Mutex<Connection>>;
