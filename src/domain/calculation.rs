// ==========================================
// 绝缘导体规格计算系统 - 计算实体定义
// ==========================================
// 职责: 计算输入/结果快照与保存记录实体
// 红线: 记录一经创建不可变更，无删除路径
// ==========================================

use crate::domain::types::{CalcMode, Material, SaveMode, Shape};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// 计算输入 (Calculation Inputs)
// ==========================================
// 全部为非负实数；为零的门控值抑制计算
// (不求值，结果缺席，绝不产生除零)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationInputs {
    /// 扁线宽度 (mm)
    pub width: f64,
    /// 扁线厚度 (mm)
    pub thickness: f64,
    /// 圆线直径 (mm)
    pub dia: f64,
    /// 单层绝缘厚度 (mm)
    pub insulation_thickness: f64,
    /// 双层: 第一层厚度 (mm)
    pub layer1_thickness: f64,
    /// 双层: 第二层厚度 (mm)
    pub layer2_thickness: f64,
    /// 绝缘系数 (解析值或人工覆写)
    pub factor: f64,
    /// 双层: 第一层系数
    pub layer1_factor: f64,
    /// 双层: 第二层系数
    pub layer2_factor: f64,
    /// 成品目标重量 (kg)
    pub target_weight_kg: f64,
    /// 每轴重量 (kg)
    pub qty_per_spool_kg: f64,
    /// 裸导体模式: 长度 (m)
    pub length_m: f64,
}

impl Default for CalculationInputs {
    fn default() -> Self {
        Self {
            width: 0.0,
            thickness: 0.0,
            dia: 0.0,
            insulation_thickness: 0.0,
            layer1_thickness: 0.0,
            layer2_thickness: 0.0,
            factor: 1.0,
            layer1_factor: 1.0,
            layer2_factor: 1.0,
            target_weight_kg: 100.0,
            qty_per_spool_kg: 25.0,
            length_m: 0.0,
        }
    }
}

impl CalculationInputs {
    /// 指定形状下截面尺寸是否齐备 (正数)
    ///
    /// 引擎前置条件: bareArea > 0，由调用方在此门控
    pub fn has_positive_section(&self, shape: Shape) -> bool {
        match shape {
            Shape::Strip => self.width > 0.0 && self.thickness > 0.0,
            Shape::Wire => self.dia > 0.0,
        }
    }
}

// ==========================================
// 双层分解 (Dual Layer Breakdown)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DualLayerBreakdown {
    /// 第一层相对裸截面的重量增幅 (%)
    pub layer1_percent_increase: f64,
    /// 第二层相对第一层后截面的重量增幅 (%)
    pub layer2_percent_increase: f64,
    /// 由外向内反推: 剥除第二层后的重量 (kg)
    pub weight_after_layer1_kg: f64,
}

// ==========================================
// 绝缘计算结果 (Insulation Result)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsulationResult {
    /// 裸截面积 (mm²)
    pub bare_area: f64,
    /// 绝缘后截面积 (mm²)
    pub insulated_area: f64,
    /// 重量增幅 (%)；双层时为复合有效增幅，非 p1+p2
    pub percent_increase: f64,
    /// 所需裸导体重量 (kg)
    pub bare_weight_required_kg: f64,
    /// 每轴米数 (m)
    pub meters_per_spool: f64,
    /// 产出速率 (kg/hr)
    pub production_rate_kg_hr: f64,
    /// 总工时 (hr)
    pub total_hours_required: f64,
    /// 包覆后宽度 (扁线) 或直径 (圆线) (mm)
    pub covered_width_or_dia: f64,
    /// 包覆后厚度 (仅扁线) (mm)
    pub covered_thickness: Option<f64>,
    /// 双层分解 (仅双层计算)
    pub dual_layer: Option<DualLayerBreakdown>,
}

// ==========================================
// 裸导体计算结果 (Bare Result)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BareResult {
    /// 裸截面积 (mm²)
    pub bare_area: f64,
    /// 给定长度下的重量 (kg)
    pub weight_kg: f64,
}

// ==========================================
// 计算结果 (Calc Result)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalcResult {
    Insulated(InsulationResult),
    Bare(BareResult),
}

impl CalcResult {
    pub fn bare_area(&self) -> f64 {
        match self {
            CalcResult::Insulated(r) => r.bare_area,
            CalcResult::Bare(r) => r.bare_area,
        }
    }
}

// ==========================================
// 计算状态快照 (Calculation Snapshot)
// ==========================================
// 选择项 + 原始输入 + 计算结果的完整快照，
// 指纹与保存记录均由它派生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationSnapshot {
    pub mode: CalcMode,
    pub material: Material,
    pub shape: Shape,
    pub preset_name: Option<String>,
    pub voltage_label: Option<String>,
    pub inputs: CalculationInputs,
    pub result: CalcResult,
}

// ==========================================
// 保存记录 (Calculation Record)
// ==========================================
// MANUAL 显式保存总是插入；AUTO 按 (owner, fingerprint) 去重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub record_id: String,
    pub owner_id: String,
    pub mode: CalcMode,
    pub material: Material,
    pub shape: Shape,
    pub preset_name: Option<String>,
    pub voltage_label: Option<String>,
    /// 去重指纹，仅用于判重，不用于展示
    pub fingerprint: String,
    pub save_mode: SaveMode,
    pub inputs: CalculationInputs,
    pub result: CalcResult,
    pub created_at: DateTime<Utc>,
}

impl CalculationRecord {
    /// 由快照构建新记录
    pub fn from_snapshot(
        snapshot: &CalculationSnapshot,
        owner_id: &str,
        fingerprint: &str,
        save_mode: SaveMode,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            mode: snapshot.mode,
            material: snapshot.material,
            shape: snapshot.shape,
            preset_name: snapshot.preset_name.clone(),
            voltage_label: snapshot.voltage_label.clone(),
            fingerprint: fingerprint.to_string(),
            save_mode,
            inputs: snapshot.inputs,
            result: snapshot.result,
            created_at: Utc::now(),
        }
    }
}
