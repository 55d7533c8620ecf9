// ==========================================
// 绝缘导体规格计算系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 集中建表语句，保证各仓储看到同一 schema
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化 schema（幂等，可对已建库重复执行）
///
/// 约束说明：
/// - calculation_record 上的部分唯一索引只约束 AUTO 记录，
///   使自动保存的 check-then-insert 竞争退化为"已持久化"而非重复记录；
///   MANUAL 记录不受该索引限制，允许重复插入
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS calculation_record (
            record_id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            mode TEXT NOT NULL,
            material TEXT NOT NULL,
            shape TEXT NOT NULL,
            preset_name TEXT,
            voltage_label TEXT,
            fingerprint TEXT NOT NULL,
            save_mode TEXT NOT NULL,
            inputs_json TEXT NOT NULL,
            result_json TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_calc_owner_created
            ON calculation_record(owner_id, created_at DESC);

        CREATE UNIQUE INDEX IF NOT EXISTS idx_calc_auto_dedup
            ON calculation_record(owner_id, fingerprint)
            WHERE save_mode = 'AUTO';

        CREATE TABLE IF NOT EXISTS competitor_rate (
            rate_id TEXT PRIMARY KEY,
            competitor_name TEXT NOT NULL,
            material TEXT NOT NULL,
            base_rate REAL NOT NULL,
            premium REAL NOT NULL,
            effective_rate REAL NOT NULL,
            rate_date TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_competitor_material
            ON competitor_rate(material, created_at DESC);

        CREATE TABLE IF NOT EXISTS work_instruction (
            instruction_id TEXT PRIMARY KEY,
            order_number TEXT NOT NULL,
            customer TEXT NOT NULL,
            size TEXT NOT NULL,
            material TEXT NOT NULL,
            insulation_type TEXT NOT NULL,
            target_weight_kg REAL NOT NULL,
            speed_m_hr REAL NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_instruction_status
            ON work_instruction(status);

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        INSERT OR IGNORE INTO schema_version (version) VALUES (1);
        "#,
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
