// ==========================================
// 绝缘导体规格计算系统 - 领域类型定义
// ==========================================
// 密度常量: 铝 2.709 / 铜 8.89 (kg/dm³)
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 导体材质 (Material)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Material {
    Aluminium, // 铝
    Copper,    // 铜
}

impl Material {
    /// 材质密度 (kg/dm³)
    ///
    /// 固定常量，不随温度/牌号变化
    pub fn density(&self) -> f64 {
        match self {
            Material::Aluminium => 2.709,
            Material::Copper => 8.89,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Aluminium => "ALUMINIUM",
            Material::Copper => "COPPER",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "ALUMINIUM" => Some(Material::Aluminium),
            "COPPER" => Some(Material::Copper),
            _ => None,
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 截面形状 (Shape)
// ==========================================
// 决定几何公式族: 扁线 w*t / 圆线 0.785*d²
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shape {
    Strip, // 扁线 (矩形截面)
    Wire,  // 圆线 (圆形截面)
}

impl Shape {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Strip => "STRIP",
            Shape::Wire => "WIRE",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "STRIP" => Some(Shape::Strip),
            "WIRE" => Some(Shape::Wire),
            _ => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 计算模式 (Calculation Mode)
// ==========================================
// BARE 模式忽略所有预设/系数字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalcMode {
    Insulated, // 绝缘计算
    Bare,      // 裸导体计算
}

impl CalcMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalcMode::Insulated => "INSULATED",
            CalcMode::Bare => "BARE",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "INSULATED" => Some(CalcMode::Insulated),
            "BARE" => Some(CalcMode::Bare),
            _ => None,
        }
    }
}

impl fmt::Display for CalcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 保存方式 (Save Mode)
// ==========================================
// MANUAL: 用户显式保存，总是插入新记录
// AUTO: 自动保存协议插入，按指纹去重
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaveMode {
    Manual,
    Auto,
}

impl SaveMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveMode::Manual => "MANUAL",
            SaveMode::Auto => "AUTO",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "MANUAL" => Some(SaveMode::Manual),
            "AUTO" => Some(SaveMode::Auto),
            _ => None,
        }
    }
}

impl fmt::Display for SaveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 自动保存状态 (Save Status)
// ==========================================
// 状态机: IDLE → PENDING → {SAVED, ERROR} → IDLE
// ERROR 在展示超时后自动回到 IDLE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaveStatus {
    Idle,
    Pending,
    Saved,
    Error,
}

impl SaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveStatus::Idle => "IDLE",
            SaveStatus::Pending => "PENDING",
            SaveStatus::Saved => "SAVED",
            SaveStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
