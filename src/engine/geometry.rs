// ==========================================
// 绝缘导体规格计算系统 - 几何/重量计算引擎
// ==========================================
// 职责: 扁线/圆线 × 单层/双层的截面与重量闭式公式
// 红线: 公式为台账固定口径，逐位复现，不做迭代/拟合
// ==========================================
// 前置条件: bareArea > 0 (正尺寸) 由调用方门控；
// 引擎本身不校验，误用时允许产出 Infinity/NaN，不 panic
// ==========================================

use crate::domain::calculation::{DualLayerBreakdown, InsulationResult};

/// 缺省生产速度 (m/hr)
pub const DEFAULT_SPEED_M_HR: f64 = 256.0;

/// 圆截面面积系数，台账口径固定取 0.785，非 π/4
pub const WIRE_AREA_COEFF: f64 = 0.785;

// ==========================================
// 参数结构
// ==========================================

/// 扁线单层参数
#[derive(Debug, Clone, Copy)]
pub struct StripSingleParams {
    pub width: f64,
    pub thickness: f64,
    pub covering: f64,
    pub factor: f64,
    pub density: f64,
    pub target_weight_kg: f64,
    pub qty_per_spool_kg: f64,
}

/// 圆线单层参数
#[derive(Debug, Clone, Copy)]
pub struct WireSingleParams {
    pub dia: f64,
    pub covering: f64,
    pub factor: f64,
    pub density: f64,
    pub target_weight_kg: f64,
    pub qty_per_spool_kg: f64,
}

/// 扁线双层参数
#[derive(Debug, Clone, Copy)]
pub struct StripDualParams {
    pub width: f64,
    pub thickness: f64,
    pub layer1_covering: f64,
    pub layer2_covering: f64,
    pub layer1_factor: f64,
    pub layer2_factor: f64,
    pub density: f64,
    pub target_weight_kg: f64,
    pub qty_per_spool_kg: f64,
}

/// 圆线双层参数
#[derive(Debug, Clone, Copy)]
pub struct WireDualParams {
    pub dia: f64,
    pub layer1_covering: f64,
    pub layer2_covering: f64,
    pub layer1_factor: f64,
    pub layer2_factor: f64,
    pub density: f64,
    pub target_weight_kg: f64,
    pub qty_per_spool_kg: f64,
}

// ==========================================
// GeometryEngine - 几何/重量计算引擎
// ==========================================
pub struct GeometryEngine;

impl GeometryEngine {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 单层计算
    // ==========================================

    /// 扁线单层
    ///
    /// 公式:
    /// - bareArea = w * t
    /// - insulatedArea = (w+c) * (t+c)
    /// - percentIncrease = (insulatedArea - bareArea) * f * 100 / (bareArea * d)
    /// - bareWeight = W * 100 / (100 + percentIncrease)
    pub fn strip_single(&self, p: &StripSingleParams) -> InsulationResult {
        let bare_area = p.width * p.thickness;
        let covered_width = p.width + p.covering;
        let covered_thickness = p.thickness + p.covering;
        let insulated_area = covered_width * covered_thickness;

        let percent_increase =
            (insulated_area - bare_area) * p.factor * 100.0 / (bare_area * p.density);
        let bare_weight = p.target_weight_kg * 100.0 / (100.0 + percent_increase);

        self.finish_single(
            bare_area,
            insulated_area,
            percent_increase,
            bare_weight,
            covered_width,
            Some(covered_thickness),
            p.density,
            p.qty_per_spool_kg,
        )
    }

    /// 圆线单层 (面积按 0.785 * d²)
    pub fn wire_single(&self, p: &WireSingleParams) -> InsulationResult {
        let bare_area = WIRE_AREA_COEFF * p.dia * p.dia;
        let covered_dia = p.dia + p.covering;
        let insulated_area = WIRE_AREA_COEFF * covered_dia * covered_dia;

        let percent_increase =
            (insulated_area - bare_area) * p.factor * 100.0 / (bare_area * p.density);
        let bare_weight = p.target_weight_kg * 100.0 / (100.0 + percent_increase);

        self.finish_single(
            bare_area,
            insulated_area,
            percent_increase,
            bare_weight,
            covered_dia,
            None,
            p.density,
            p.qty_per_spool_kg,
        )
    }

    // ==========================================
    // 双层计算
    // ==========================================
    // 两层依次叠加到外廓尺寸 (非各自独立包覆裸芯)；
    // 各层增幅相对"该层包覆前"的截面；
    // 反推由外向内: 先剥第二层再剥第一层
    // ==========================================

    /// 扁线双层
    ///
    /// - layer1Area = (w+c1)*(t+c1)
    /// - layer2Area = (w+c1+c2)*(t+c1+c2)
    /// - p1 = (layer1Area-bareArea)*f1*100/(bareArea*d)
    /// - p2 = (layer2Area-layer1Area)*f2*100/(layer1Area*d)
    /// - weightAfterLayer1 = W*100/(100+p2)
    /// - bareWeight = weightAfterLayer1*100/(100+p1)
    ///
    /// 汇总 percentIncrease = (W-bareWeight)/bareWeight*100，
    /// 即 p1 与 p2 的复合值，不等于 p1+p2
    pub fn strip_dual(&self, p: &StripDualParams) -> InsulationResult {
        let bare_area = p.width * p.thickness;
        let layer1_area = (p.width + p.layer1_covering) * (p.thickness + p.layer1_covering);
        let covered_width = p.width + p.layer1_covering + p.layer2_covering;
        let covered_thickness = p.thickness + p.layer1_covering + p.layer2_covering;
        let layer2_area = covered_width * covered_thickness;

        self.finish_dual(
            bare_area,
            layer1_area,
            layer2_area,
            covered_width,
            Some(covered_thickness),
            p.layer1_factor,
            p.layer2_factor,
            p.density,
            p.target_weight_kg,
            p.qty_per_spool_kg,
        )
    }

    /// 圆线双层 (各包覆直径均按 0.785 * d²)
    pub fn wire_dual(&self, p: &WireDualParams) -> InsulationResult {
        let bare_area = WIRE_AREA_COEFF * p.dia * p.dia;
        let dia1 = p.dia + p.layer1_covering;
        let layer1_area = WIRE_AREA_COEFF * dia1 * dia1;
        let covered_dia = p.dia + p.layer1_covering + p.layer2_covering;
        let layer2_area = WIRE_AREA_COEFF * covered_dia * covered_dia;

        self.finish_dual(
            bare_area,
            layer1_area,
            layer2_area,
            covered_dia,
            None,
            p.layer1_factor,
            p.layer2_factor,
            p.density,
            p.target_weight_kg,
            p.qty_per_spool_kg,
        )
    }

    // ==========================================
    // 裸导体计算
    // ==========================================

    /// 裸导体重量: weight = bareArea * d * L / 1000
    pub fn bare_weight_kg(&self, bare_area: f64, density: f64, length_m: f64) -> f64 {
        bare_area * density * length_m / 1000.0
    }

    /// 扁线裸截面积
    pub fn strip_bare_area(&self, width: f64, thickness: f64) -> f64 {
        width * thickness
    }

    /// 圆线裸截面积
    pub fn wire_bare_area(&self, dia: f64) -> f64 {
        WIRE_AREA_COEFF * dia * dia
    }

    // ==========================================
    // 公共尾部: 每轴米数/产出速率/总工时
    // ==========================================
    // 三项始终基于裸截面积，双层时亦然

    #[allow(clippy::too_many_arguments)]
    fn finish_single(
        &self,
        bare_area: f64,
        insulated_area: f64,
        percent_increase: f64,
        bare_weight: f64,
        covered_width_or_dia: f64,
        covered_thickness: Option<f64>,
        density: f64,
        qty_per_spool_kg: f64,
    ) -> InsulationResult {
        let (meters_per_spool, production_rate, total_hours) =
            self.spool_and_rate(bare_area, density, qty_per_spool_kg, bare_weight);

        InsulationResult {
            bare_area,
            insulated_area,
            percent_increase,
            bare_weight_required_kg: bare_weight,
            meters_per_spool,
            production_rate_kg_hr: production_rate,
            total_hours_required: total_hours,
            covered_width_or_dia,
            covered_thickness,
            dual_layer: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn finish_dual(
        &self,
        bare_area: f64,
        layer1_area: f64,
        layer2_area: f64,
        covered_width_or_dia: f64,
        covered_thickness: Option<f64>,
        layer1_factor: f64,
        layer2_factor: f64,
        density: f64,
        target_weight_kg: f64,
        qty_per_spool_kg: f64,
    ) -> InsulationResult {
        let p1 = (layer1_area - bare_area) * layer1_factor * 100.0 / (bare_area * density);
        let p2 = (layer2_area - layer1_area) * layer2_factor * 100.0 / (layer1_area * density);

        let weight_after_layer1 = target_weight_kg * 100.0 / (100.0 + p2);
        let bare_weight = weight_after_layer1 * 100.0 / (100.0 + p1);
        let percent_increase = (target_weight_kg - bare_weight) / bare_weight * 100.0;

        let (meters_per_spool, production_rate, total_hours) =
            self.spool_and_rate(bare_area, density, qty_per_spool_kg, bare_weight);

        InsulationResult {
            bare_area,
            insulated_area: layer2_area,
            percent_increase,
            bare_weight_required_kg: bare_weight,
            meters_per_spool,
            production_rate_kg_hr: production_rate,
            total_hours_required: total_hours,
            covered_width_or_dia,
            covered_thickness,
            dual_layer: Some(DualLayerBreakdown {
                layer1_percent_increase: p1,
                layer2_percent_increase: p2,
                weight_after_layer1_kg: weight_after_layer1,
            }),
        }
    }

    fn spool_and_rate(
        &self,
        bare_area: f64,
        density: f64,
        qty_per_spool_kg: f64,
        bare_weight: f64,
    ) -> (f64, f64, f64) {
        let meters_per_spool = qty_per_spool_kg * 1000.0 / (bare_area * density);
        let production_rate = bare_area * density * DEFAULT_SPEED_M_HR / 1000.0;
        let total_hours = bare_weight / production_rate;
        (meters_per_spool, production_rate, total_hours)
    }
}

impl Default for GeometryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALU: f64 = 2.709;

    fn engine() -> GeometryEngine {
        GeometryEngine::new()
    }

    #[test]
    fn test_strip_single_reference_case() {
        // 台账核对用例: 10 x 2 扁线, 包覆 0.5, 系数 1.5
        let r = engine().strip_single(&StripSingleParams {
            width: 10.0,
            thickness: 2.0,
            covering: 0.5,
            factor: 1.5,
            density: ALU,
            target_weight_kg: 100.0,
            qty_per_spool_kg: 25.0,
        });

        assert!((r.bare_area - 20.0).abs() < 1e-9);
        assert!((r.insulated_area - 26.25).abs() < 1e-9);
        assert!((r.percent_increase - 17.304).abs() < 0.01);
        assert!((r.bare_weight_required_kg - 85.255).abs() < 0.01);
        assert!((r.meters_per_spool - 461.4).abs() < 0.1);
        assert_eq!(r.covered_width_or_dia, 10.5);
        assert_eq!(r.covered_thickness, Some(2.5));
        assert!(r.dual_layer.is_none());

        // 产出/工时
        let rate = 20.0 * ALU * DEFAULT_SPEED_M_HR / 1000.0;
        assert!((r.production_rate_kg_hr - rate).abs() < 1e-9);
        assert!((r.total_hours_required - r.bare_weight_required_kg / rate).abs() < 1e-9);
    }

    #[test]
    fn test_wire_single_reference_case() {
        let r = engine().wire_single(&WireSingleParams {
            dia: 4.0,
            covering: 0.5,
            factor: 1.5,
            density: ALU,
            target_weight_kg: 100.0,
            qty_per_spool_kg: 25.0,
        });

        assert!((r.bare_area - 12.56).abs() < 0.001);
        assert!((r.percent_increase - 14.71).abs() < 0.01);
        assert!((r.bare_weight_required_kg - 87.18).abs() < 0.01);
        assert_eq!(r.covered_width_or_dia, 4.5);
        assert_eq!(r.covered_thickness, None);
    }

    #[test]
    fn test_wire_area_uses_0785_not_pi_over_4() {
        let area = engine().wire_bare_area(4.0);
        assert_eq!(area, 0.785 * 16.0);
        assert!((area - std::f64::consts::FRAC_PI_4 * 16.0).abs() > 1e-3);
    }

    #[test]
    fn test_strip_dual_reference_case() {
        // 台账核对用例: 10 x 3 扁线, Poly 0.35 @1.08 + Dfg 0.50 @1.45
        let r = engine().strip_dual(&StripDualParams {
            width: 10.0,
            thickness: 3.0,
            layer1_covering: 0.35,
            layer2_covering: 0.50,
            layer1_factor: 1.08,
            layer2_factor: 1.45,
            density: ALU,
            target_weight_kg: 100.0,
            qty_per_spool_kg: 25.0,
        });

        let dual = r.dual_layer.expect("双层计算应产出分解");
        assert!((r.bare_area - 30.0).abs() < 1e-9);
        assert!((r.insulated_area - 41.7725).abs() < 1e-4);
        assert!((dual.layer1_percent_increase - 6.209).abs() < 0.01);
        assert!((dual.layer2_percent_increase - 10.96).abs() < 0.01);
        assert!((dual.weight_after_layer1_kg - 90.12).abs() < 0.01);
        assert!((r.bare_weight_required_kg - 84.85).abs() < 0.01);
    }

    #[test]
    fn test_dual_aggregate_is_compound_not_sum() {
        let r = engine().strip_dual(&StripDualParams {
            width: 10.0,
            thickness: 3.0,
            layer1_covering: 0.35,
            layer2_covering: 0.50,
            layer1_factor: 1.08,
            layer2_factor: 1.45,
            density: ALU,
            target_weight_kg: 100.0,
            qty_per_spool_kg: 25.0,
        });
        let dual = r.dual_layer.unwrap();

        // 复合: (1+p1/100)*(1+p2/100)-1
        let compound = ((1.0 + dual.layer1_percent_increase / 100.0)
            * (1.0 + dual.layer2_percent_increase / 100.0)
            - 1.0)
            * 100.0;
        let naive_sum = dual.layer1_percent_increase + dual.layer2_percent_increase;

        assert!((r.percent_increase - compound).abs() < 1e-9);
        assert!((r.percent_increase - naive_sum).abs() > 0.01);
    }

    #[test]
    fn test_wire_dual_layer_sequencing() {
        let r = engine().wire_dual(&WireDualParams {
            dia: 4.0,
            layer1_covering: 0.35,
            layer2_covering: 0.50,
            layer1_factor: 1.08,
            layer2_factor: 1.45,
            density: ALU,
            target_weight_kg: 100.0,
            qty_per_spool_kg: 25.0,
        });

        // 各层面积按累计包覆直径
        assert!((r.bare_area - 0.785 * 16.0).abs() < 1e-9);
        assert!((r.insulated_area - 0.785 * 4.85 * 4.85).abs() < 1e-9);
        assert_eq!(r.covered_width_or_dia, 4.85);

        let dual = r.dual_layer.unwrap();
        let layer1_area = 0.785 * 4.35 * 4.35;
        let expected_p2 = (r.insulated_area - layer1_area) * 1.45 * 100.0 / (layer1_area * ALU);
        assert!((dual.layer2_percent_increase - expected_p2).abs() < 1e-9);
    }

    #[test]
    fn test_bare_weight_for_length() {
        // 10 x 2 铝扁线 1000m → 54.18 kg
        let e = engine();
        let area = e.strip_bare_area(10.0, 2.0);
        let w = e.bare_weight_kg(area, ALU, 1000.0);
        assert!((w - 54.18).abs() < 0.01);
    }

    #[test]
    fn test_spool_metrics_use_bare_area_in_dual_mode() {
        let e = engine();
        let dual = e.strip_dual(&StripDualParams {
            width: 10.0,
            thickness: 2.0,
            layer1_covering: 0.35,
            layer2_covering: 0.50,
            layer1_factor: 1.08,
            layer2_factor: 1.45,
            density: ALU,
            target_weight_kg: 100.0,
            qty_per_spool_kg: 25.0,
        });
        let single = e.strip_single(&StripSingleParams {
            width: 10.0,
            thickness: 2.0,
            covering: 0.5,
            factor: 1.5,
            density: ALU,
            target_weight_kg: 100.0,
            qty_per_spool_kg: 25.0,
        });

        // 包覆方式不同不影响每轴米数与产出速率 (均基于裸截面)
        assert!((dual.meters_per_spool - single.meters_per_spool).abs() < 1e-9);
        assert!((dual.production_rate_kg_hr - single.production_rate_kg_hr).abs() < 1e-9);
    }
}
