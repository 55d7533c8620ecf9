// ==========================================
// 绝缘导体规格计算系统 - 竞争对手报价实体
// ==========================================
// 职责: 竞争对手基准价 + 升水的台账记录
// 派生: effective_rate = base_rate + premium，插入时计算
// ==========================================

use crate::domain::types::Material;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 竞争对手报价记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorRate {
    pub rate_id: String,
    pub competitor_name: String,
    pub material: Material,
    /// 基准价 (本币/kg)
    pub base_rate: f64,
    /// 升水 (本币/kg)
    pub premium: f64,
    /// 到手价 = base_rate + premium
    pub effective_rate: f64,
    /// 报价日期 (YYYY-MM-DD)
    pub rate_date: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CompetitorRate {
    /// 创建新报价记录，到手价由基准价与升水派生
    pub fn new(
        competitor_name: &str,
        material: Material,
        base_rate: f64,
        premium: f64,
        rate_date: &str,
        notes: Option<String>,
    ) -> Self {
        Self {
            rate_id: Uuid::new_v4().to_string(),
            competitor_name: competitor_name.to_string(),
            material,
            base_rate,
            premium,
            effective_rate: base_rate + premium,
            rate_date: rate_date.to_string(),
            notes,
            created_at: Utc::now(),
        }
    }
}
