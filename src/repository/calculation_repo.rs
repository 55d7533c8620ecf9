// ==========================================
// 绝缘导体规格计算系统 - 计算记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::calculation::{CalcResult, CalculationInputs, CalculationRecord};
use crate::domain::types::{CalcMode, Material, SaveMode, Shape};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::RecordStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// CalculationRecordRepository - 计算记录仓储
// ==========================================
pub struct CalculationRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CalculationRecordRepository {
    /// 创建新的仓储实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn row_to_record(row: &Row<'_>) -> Result<CalculationRecord, rusqlite::Error> {
        let mode_str: String = row.get(2)?;
        let material_str: String = row.get(3)?;
        let shape_str: String = row.get(4)?;
        let save_mode_str: String = row.get(8)?;
        let inputs_json: String = row.get(9)?;
        let result_json: String = row.get(10)?;
        let created_at_str: String = row.get(11)?;

        let inputs: CalculationInputs = serde_json::from_str(&inputs_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let result: CalcResult = serde_json::from_str(&result_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(CalculationRecord {
            record_id: row.get(0)?,
            owner_id: row.get(1)?,
            mode: CalcMode::from_db_str(&mode_str).unwrap_or(CalcMode::Insulated),
            material: Material::from_db_str(&material_str).unwrap_or(Material::Aluminium),
            shape: Shape::from_db_str(&shape_str).unwrap_or(Shape::Strip),
            preset_name: row.get(5)?,
            voltage_label: row.get(6)?,
            fingerprint: row.get(7)?,
            save_mode: SaveMode::from_db_str(&save_mode_str).unwrap_or(SaveMode::Manual),
            inputs,
            result,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    const SELECT_COLUMNS: &'static str = r#"
        record_id, owner_id, mode, material, shape,
        preset_name, voltage_label, fingerprint, save_mode,
        inputs_json, result_json, created_at
    "#;

    fn insert_row(&self, record: &CalculationRecord) -> RepositoryResult<()> {
        let inputs_json = serde_json::to_string(&record.inputs)?;
        let result_json = serde_json::to_string(&record.result)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO calculation_record (
                record_id, owner_id, mode, material, shape,
                preset_name, voltage_label, fingerprint, save_mode,
                inputs_json, result_json, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                record.record_id,
                record.owner_id,
                record.mode.as_str(),
                record.material.as_str(),
                record.shape.as_str(),
                record.preset_name,
                record.voltage_label,
                record.fingerprint,
                record.save_mode.as_str(),
                inputs_json,
                result_json,
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn find_row(
        &self,
        owner_id: &str,
        fingerprint: &str,
    ) -> RepositoryResult<Option<CalculationRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM calculation_record \
             WHERE owner_id = ?1 AND fingerprint = ?2 \
             ORDER BY created_at DESC, rowid DESC LIMIT 1",
            Self::SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let result = stmt.query_row(params![owner_id, fingerprint], Self::row_to_record);
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_rows(&self, owner_id: Option<&str>) -> RepositoryResult<Vec<CalculationRecord>> {
        let conn = self.get_conn()?;
        let mut records = Vec::new();

        match owner_id {
            Some(owner) => {
                let sql = format!(
                    "SELECT {} FROM calculation_record WHERE owner_id = ?1 \
                     ORDER BY created_at DESC, rowid DESC",
                    Self::SELECT_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params![owner], Self::row_to_record)?;
                for row in rows {
                    records.push(row?);
                }
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM calculation_record \
                     ORDER BY created_at DESC, rowid DESC",
                    Self::SELECT_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map([], Self::row_to_record)?;
                for row in rows {
                    records.push(row?);
                }
            }
        }

        Ok(records)
    }
}

#[async_trait]
impl RecordStore for CalculationRecordRepository {
    /// 插入记录
    ///
    /// AUTO 记录命中 (owner, fingerprint) 部分唯一索引时，
    /// 不视为错误：返回既有记录的 id (幂等插入)
    async fn insert(&self, record: &CalculationRecord) -> RepositoryResult<String> {
        match self.insert_row(record) {
            Ok(()) => Ok(record.record_id.clone()),
            Err(RepositoryError::UniqueConstraintViolation(msg))
                if record.save_mode == SaveMode::Auto =>
            {
                match self.find_row(&record.owner_id, &record.fingerprint)? {
                    Some(existing) => Ok(existing.record_id),
                    None => Err(RepositoryError::UniqueConstraintViolation(msg)),
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn find_by_fingerprint(
        &self,
        owner_id: &str,
        fingerprint: &str,
    ) -> RepositoryResult<Option<CalculationRecord>> {
        self.find_row(owner_id, fingerprint)
    }

    async fn list_by_owner(&self, owner_id: &str) -> RepositoryResult<Vec<CalculationRecord>> {
        self.list_rows(Some(owner_id))
    }

    async fn list_all(&self) -> RepositoryResult<Vec<CalculationRecord>> {
        self.list_rows(None)
    }
}
