// ==========================================
// 绝缘导体规格计算系统 - 生产工单实体
// ==========================================
// 职责: 由计算派生的生产工单及其状态流转
// 状态链: PENDING → ACTIVE → COMPLETED，单向不可回退
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::types::Material;

// ==========================================
// 工单状态 (Instruction Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstructionStatus {
    Pending,   // 待下达
    Active,    // 生产中
    Completed, // 已完成
}

impl InstructionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstructionStatus::Pending => "PENDING",
            InstructionStatus::Active => "ACTIVE",
            InstructionStatus::Completed => "COMPLETED",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(InstructionStatus::Pending),
            "ACTIVE" => Some(InstructionStatus::Active),
            "COMPLETED" => Some(InstructionStatus::Completed),
            _ => None,
        }
    }

    /// 是否允许流转到目标状态 (仅允许沿链前进一步)
    pub fn can_transition_to(&self, next: InstructionStatus) -> bool {
        matches!(
            (self, next),
            (InstructionStatus::Pending, InstructionStatus::Active)
                | (InstructionStatus::Active, InstructionStatus::Completed)
        )
    }
}

impl fmt::Display for InstructionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 非法状态流转
#[derive(Debug, Error, PartialEq, Eq)]
#[error("非法工单状态流转: {from} → {to}")]
pub struct InvalidTransition {
    pub from: InstructionStatus,
    pub to: InstructionStatus,
}

// ==========================================
// 生产工单 (Work Instruction)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkInstruction {
    pub instruction_id: String,
    pub order_number: String,
    pub customer: String,
    /// 规格描述，如 "10.0 x 2.0 mm"
    pub size: String,
    pub material: Material,
    pub insulation_type: String,
    /// 目标重量 (kg)
    pub target_weight_kg: f64,
    /// 生产速度 (m/hr)
    pub speed_m_hr: f64,
    pub status: InstructionStatus,
    pub created_at: DateTime<Utc>,
}

impl WorkInstruction {
    pub fn new(
        order_number: &str,
        customer: &str,
        size: &str,
        material: Material,
        insulation_type: &str,
        target_weight_kg: f64,
        speed_m_hr: f64,
    ) -> Self {
        Self {
            instruction_id: Uuid::new_v4().to_string(),
            order_number: order_number.to_string(),
            customer: customer.to_string(),
            size: size.to_string(),
            material,
            insulation_type: insulation_type.to_string(),
            target_weight_kg,
            speed_m_hr,
            status: InstructionStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// 状态流转，非法流转返回错误
    pub fn transition_to(&mut self, next: InstructionStatus) -> Result<(), InvalidTransition> {
        if !self.status.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// 按工单速度估算总工时 (hr)
    ///
    /// 产出速率公式与计算引擎一致: rate = bareArea * density * speed / 1000
    pub fn production_hours(&self, bare_area: f64, density: f64) -> f64 {
        let rate_kg_hr = bare_area * density * self.speed_m_hr / 1000.0;
        self.target_weight_kg / rate_kg_hr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WorkInstruction {
        WorkInstruction::new(
            "SO-1042",
            "Prakash Transformers",
            "10.0 x 2.0 mm",
            Material::Aluminium,
            "Dfg 225 yarn",
            500.0,
            256.0,
        )
    }

    #[test]
    fn test_transition_chain() {
        let mut wi = sample();
        assert_eq!(wi.status, InstructionStatus::Pending);
        wi.transition_to(InstructionStatus::Active).unwrap();
        wi.transition_to(InstructionStatus::Completed).unwrap();
        assert_eq!(wi.status, InstructionStatus::Completed);
    }

    #[test]
    fn test_backward_transition_rejected() {
        let mut wi = sample();
        wi.transition_to(InstructionStatus::Active).unwrap();
        wi.transition_to(InstructionStatus::Completed).unwrap();

        let err = wi.transition_to(InstructionStatus::Active).unwrap_err();
        assert_eq!(err.from, InstructionStatus::Completed);
        assert_eq!(err.to, InstructionStatus::Active);

        // 跳级也不允许
        let mut wi2 = sample();
        assert!(wi2.transition_to(InstructionStatus::Completed).is_err());
    }

    #[test]
    fn test_production_hours() {
        let wi = sample();
        // bareArea=20, density=2.709 → rate = 20*2.709*256/1000 ≈ 13.87 kg/hr
        let hours = wi.production_hours(20.0, 2.709);
        assert!((hours - 500.0 / (20.0 * 2.709 * 256.0 / 1000.0)).abs() < 1e-9);
    }
}
