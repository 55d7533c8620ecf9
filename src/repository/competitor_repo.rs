// ==========================================
// 绝缘导体规格计算系统 - 竞争对手报价仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::competitor::CompetitorRate;
use crate::domain::types::Material;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// CompetitorRateRepository - 竞争对手报价仓储
// ==========================================
pub struct CompetitorRateRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CompetitorRateRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn row_to_rate(row: &Row<'_>) -> Result<CompetitorRate, rusqlite::Error> {
        let material_str: String = row.get(2)?;
        let created_at_str: String = row.get(8)?;

        Ok(CompetitorRate {
            rate_id: row.get(0)?,
            competitor_name: row.get(1)?,
            material: Material::from_db_str(&material_str).unwrap_or(Material::Copper),
            base_rate: row.get(3)?,
            premium: row.get(4)?,
            effective_rate: row.get(5)?,
            rate_date: row.get(6)?,
            notes: row.get(7)?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    /// 插入报价记录
    pub fn insert(&self, rate: &CompetitorRate) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO competitor_rate (
                rate_id, competitor_name, material,
                base_rate, premium, effective_rate,
                rate_date, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                rate.rate_id,
                rate.competitor_name,
                rate.material.as_str(),
                rate.base_rate,
                rate.premium,
                rate.effective_rate,
                rate.rate_date,
                rate.notes,
                rate.created_at.to_rfc3339(),
            ],
        )?;
        Ok(rate.rate_id.clone())
    }

    /// 按材质查询 (新→旧)
    pub fn list_by_material(&self, material: Material) -> RepositoryResult<Vec<CompetitorRate>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT rate_id, competitor_name, material,
                   base_rate, premium, effective_rate,
                   rate_date, notes, created_at
            FROM competitor_rate
            WHERE material = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map(params![material.as_str()], Self::row_to_rate)?;
        let mut rates = Vec::new();
        for row in rows {
            rates.push(row?);
        }
        Ok(rates)
    }

    /// 查询全部 (新→旧)
    pub fn list_all(&self) -> RepositoryResult<Vec<CompetitorRate>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT rate_id, competitor_name, material,
                   base_rate, premium, effective_rate,
                   rate_date, notes, created_at
            FROM competitor_rate
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map([], Self::row_to_rate)?;
        let mut rates = Vec::new();
        for row in rows {
            rates.push(row?);
        }
        Ok(rates)
    }
}
