// ==========================================
// 绝缘导体规格计算系统 - 生产工单仓储
// ==========================================
// 红线: Repository 不含业务逻辑，只负责数据访问；
// 状态链校验在领域实体完成，仓储只做持久化与并发防护
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::instruction::{InstructionStatus, WorkInstruction};
use crate::domain::types::Material;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// WorkInstructionRepository - 生产工单仓储
// ==========================================
pub struct WorkInstructionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WorkInstructionRepository {
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

    fn row_to_instruction(row: &Row<'_>) -> Result<WorkInstruction, rusqlite::Error> {
        let material_str: String = row.get(4)?;
        let status_str: String = row.get(8)?;
        let created_at_str: String = row.get(9)?;

        Ok(WorkInstruction {
            instruction_id: row.get(0)?,
            order_number: row.get(1)?,
            customer: row.get(2)?,
            size: row.get(3)?,
            material: Material::from_db_str(&material_str).unwrap_or(Material::Aluminium),
            insulation_type: row.get(5)?,
            target_weight_kg: row.get(6)?,
            speed_m_hr: row.get(7)?,
            status: InstructionStatus::from_db_str(&status_str)
                .unwrap_or(InstructionStatus::Pending),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }

    /// 插入工单
    pub fn insert(&self, instruction: &WorkInstruction) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO work_instruction (
                instruction_id, order_number, customer, size,
                material, insulation_type, target_weight_kg, speed_m_hr,
                status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                instruction.instruction_id,
                instruction.order_number,
                instruction.customer,
                instruction.size,
                instruction.material.as_str(),
                instruction.insulation_type,
                instruction.target_weight_kg,
                instruction.speed_m_hr,
                instruction.status.as_str(),
                instruction.created_at.to_rfc3339(),
            ],
        )?;
        Ok(instruction.instruction_id.clone())
    }

    /// 按 id 查询
    pub fn find_by_id(&self, instruction_id: &str) -> RepositoryResult<Option<WorkInstruction>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT instruction_id, order_number, customer, size,
                   material, insulation_type, target_weight_kg, speed_m_hr,
                   status, created_at
            FROM work_instruction
            WHERE instruction_id = ?1
            "#,
        )?;

        let result = stmt.query_row(params![instruction_id], Self::row_to_instruction);
        match result {
            Ok(instruction) => Ok(Some(instruction)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 按状态查询 (新→旧)
    pub fn list_by_status(
        &self,
        status: InstructionStatus,
    ) -> RepositoryResult<Vec<WorkInstruction>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT instruction_id, order_number, customer, size,
                   material, insulation_type, target_weight_kg, speed_m_hr,
                   status, created_at
            FROM work_instruction
            WHERE status = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map(params![status.as_str()], Self::row_to_instruction)?;
        let mut instructions = Vec::new();
        for row in rows {
            instructions.push(row?);
        }
        Ok(instructions)
    }

    /// 状态流转并持久化
    ///
    /// 先经领域实体校验状态链，再以"当前状态"作写入条件，
    /// 防止并发下的状态跳变
    pub fn update_status(
        &self,
        instruction_id: &str,
        next: InstructionStatus,
    ) -> RepositoryResult<WorkInstruction> {
        let mut instruction = self.find_by_id(instruction_id)?.ok_or_else(|| {
            RepositoryError::NotFound {
                entity: "WorkInstruction".to_string(),
                id: instruction_id.to_string(),
            }
        })?;

        let previous = instruction.status;
        instruction
            .transition_to(next)
            .map_err(|e| RepositoryError::InvalidStateTransition {
                from: e.from.to_string(),
                to: e.to.to_string(),
            })?;

        let conn = self.get_conn()?;
        let updated = conn.execute(
            "UPDATE work_instruction SET status = ?1 WHERE instruction_id = ?2 AND status = ?3",
            params![next.as_str(), instruction_id, previous.as_str()],
        )?;

        if updated == 0 {
            return Err(RepositoryError::InvalidStateTransition {
                from: previous.to_string(),
                to: next.to_string(),
            });
        }

        Ok(instruction)
    }
}
