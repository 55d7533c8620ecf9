// ==========================================
// 绝缘导体规格计算系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 配置键全集
pub mod config_keys {
    /// 自动保存防抖延迟（毫秒）
    pub const AUTOSAVE_DEBOUNCE_MS: &str = "autosave_debounce_ms";
    /// ERROR 状态展示时长（毫秒）
    pub const ERROR_DISPLAY_MS: &str = "error_display_ms";
    /// 计算器缺省目标重量 (kg)
    pub const DEFAULT_TARGET_WEIGHT_KG: &str = "default_target_weight_kg";
    /// 计算器缺省每轴重量 (kg)
    pub const DEFAULT_QTY_PER_SPOOL_KG: &str = "default_qty_per_spool_kg";
}

/// 计算器输入缺省值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculatorDefaults {
    pub target_weight_kg: f64,
    pub qty_per_spool_kg: f64,
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 配置值（upsert）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn get_u64_or(&self, key: &str, default: u64) -> Result<u64, Box<dyn Error>> {
        match self.get_config_value(key)? {
            Some(v) => Ok(v.trim().parse::<u64>().unwrap_or(default)),
            None => Ok(default),
        }
    }

    fn get_f64_or(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        match self.get_config_value(key)? {
            Some(v) => Ok(v.trim().parse::<f64>().unwrap_or(default)),
            None => Ok(default),
        }
    }

    /// 自动保存防抖延迟
    pub fn autosave_debounce(&self) -> Result<Duration, Box<dyn Error>> {
        let ms = self.get_u64_or(
            config_keys::AUTOSAVE_DEBOUNCE_MS,
            crate::service::DEFAULT_DEBOUNCE_MS,
        )?;
        Ok(Duration::from_millis(ms))
    }

    /// ERROR 状态展示时长
    pub fn error_display(&self) -> Result<Duration, Box<dyn Error>> {
        let ms = self.get_u64_or(
            config_keys::ERROR_DISPLAY_MS,
            crate::service::DEFAULT_ERROR_DISPLAY_MS,
        )?;
        Ok(Duration::from_millis(ms))
    }

    /// 计算器输入缺省值
    pub fn calculator_defaults(&self) -> Result<CalculatorDefaults, Box<dyn Error>> {
        Ok(CalculatorDefaults {
            target_weight_kg: self.get_f64_or(config_keys::DEFAULT_TARGET_WEIGHT_KG, 100.0)?,
            qty_per_spool_kg: self.get_f64_or(config_keys::DEFAULT_QTY_PER_SPOOL_KG, 25.0)?,
        })
    }
}
