// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、快速时序配置等功能
// ==========================================

use conductor_calc::app::AppState;
use conductor_calc::config::{config_keys, ConfigManager};
use conductor_calc::identity::FixedIdentityProvider;
use rusqlite::Connection;
use std::error::Error;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path)?;
    conductor_calc::db::configure_sqlite_connection(&conn)?;
    conductor_calc::db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接
#[allow(dead_code)]
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(conductor_calc::db::open_sqlite_connection(db_path)?)
}

/// 写入测试用快速时序配置 (防抖 50ms / 错误展示 100ms)
#[allow(dead_code)]
pub fn insert_fast_timing_config(db_path: &str) -> Result<(), Box<dyn Error>> {
    let config = ConfigManager::new(db_path)?;
    config.set_config_value(config_keys::AUTOSAVE_DEBOUNCE_MS, "50")?;
    config.set_config_value(config_keys::ERROR_DISPLAY_MS, "100")?;
    Ok(())
}

/// 创建测试用 AppState (固定身份 + 快速时序)
#[allow(dead_code)]
pub fn create_test_state(db_path: &str, owner: &str) -> Result<AppState, Box<dyn Error>> {
    insert_fast_timing_config(db_path)?;
    let identity = Arc::new(FixedIdentityProvider::new(owner));
    Ok(AppState::new(db_path, identity)?)
}

/// 统计 calculation_record 行数
#[allow(dead_code)]
pub fn count_records(db_path: &str, save_mode: Option<&str>) -> Result<i64, Box<dyn Error>> {
    let conn = open_test_connection(db_path)?;
    let count = match save_mode {
        Some(mode) => conn.query_row(
            "SELECT COUNT(*) FROM calculation_record WHERE save_mode = ?1",
            rusqlite::params![mode],
            |row| row.get(0),
        )?,
        None => conn.query_row("SELECT COUNT(*) FROM calculation_record", [], |row| {
            row.get(0)
        })?,
    };
    Ok(count)
}
