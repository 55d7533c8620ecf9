// ==========================================
// 绝缘导体规格计算系统 - 系数反解引擎
// ==========================================
// 职责: 由实测重量增幅反解经验绝缘系数
// 前置条件: covering > 0，由调用方门控 (否则除零)
// ==========================================

/// 反解参数 (扁线截面)
#[derive(Debug, Clone, Copy)]
pub struct ReverseFactorParams {
    pub width: f64,
    pub thickness: f64,
    pub covering: f64,
    /// 实测重量增幅 (%)
    pub percentage_increase: f64,
    pub density: f64,
}

// ==========================================
// FactorEngine - 系数反解引擎
// ==========================================
pub struct FactorEngine;

impl FactorEngine {
    pub fn new() -> Self {
        Self
    }

    /// 反解绝缘系数
    ///
    /// 公式:
    /// - bareArea = w * t
    /// - insulatedArea = (w+c) * (t+c)
    /// - factor = bareArea * d * pct / ((insulatedArea - bareArea) * 100)
    pub fn reverse_factor(&self, p: &ReverseFactorParams) -> f64 {
        let bare_area = p.width * p.thickness;
        let insulated_area = (p.width + p.covering) * (p.thickness + p.covering);

        bare_area * p.density * p.percentage_increase
            / ((insulated_area - bare_area) * 100.0)
    }
}

impl Default for FactorEngine {
    fn default() -> Self {
        Self::new()
    }
}
