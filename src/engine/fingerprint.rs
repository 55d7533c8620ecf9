// ==========================================
// 绝缘导体规格计算系统 - 状态指纹
// ==========================================
// 职责: 由计算快照派生确定性去重指纹
// 红线: 仅用于判重，不用于展示；
// 数值字段一律按固定小数位渲染，避免浮点噪声造成指纹抖动
// ==========================================

use crate::domain::calculation::{CalcResult, CalculationSnapshot};

/// 指纹数值渲染的小数位数
pub const FINGERPRINT_PRECISION: usize = 4;

/// 字段分隔符
const SEP: &str = "|";

/// 计算快照指纹 (BLAKE3 十六进制)
pub fn fingerprint(snapshot: &CalculationSnapshot) -> String {
    let canonical = canonical_state_string(snapshot);
    blake3::hash(canonical.as_bytes()).to_hex().to_string()
}

/// 规范化状态串: 固定字段序 + 固定精度
///
/// 哈希的输入口径；字段顺序一经发布不可调整，
/// 否则历史记录的去重判定全部失效
pub fn canonical_state_string(snapshot: &CalculationSnapshot) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(32);

    // 选择项
    parts.push(snapshot.mode.as_str().to_string());
    parts.push(snapshot.material.as_str().to_string());
    parts.push(snapshot.shape.as_str().to_string());
    parts.push(snapshot.preset_name.clone().unwrap_or_default());
    parts.push(snapshot.voltage_label.clone().unwrap_or_default());

    // 原始输入
    let i = &snapshot.inputs;
    parts.push(fixed("w", i.width));
    parts.push(fixed("t", i.thickness));
    parts.push(fixed("d", i.dia));
    parts.push(fixed("ins", i.insulation_thickness));
    parts.push(fixed("c1", i.layer1_thickness));
    parts.push(fixed("c2", i.layer2_thickness));
    parts.push(fixed("f", i.factor));
    parts.push(fixed("f1", i.layer1_factor));
    parts.push(fixed("f2", i.layer2_factor));
    parts.push(fixed("wt", i.target_weight_kg));
    parts.push(fixed("spool", i.qty_per_spool_kg));
    parts.push(fixed("len", i.length_m));

    // 计算结果
    match &snapshot.result {
        CalcResult::Insulated(r) => {
            parts.push(fixed("ba", r.bare_area));
            parts.push(fixed("ia", r.insulated_area));
            parts.push(fixed("pct", r.percent_increase));
            parts.push(fixed("bw", r.bare_weight_required_kg));
            parts.push(fixed("mps", r.meters_per_spool));
            parts.push(fixed("rate", r.production_rate_kg_hr));
            parts.push(fixed("hrs", r.total_hours_required));
            parts.push(fixed("cw", r.covered_width_or_dia));
            match r.covered_thickness {
                Some(ct) => parts.push(fixed("ct", ct)),
                None => parts.push("ct=".to_string()),
            }
            match &r.dual_layer {
                Some(dl) => {
                    parts.push(fixed("p1", dl.layer1_percent_increase));
                    parts.push(fixed("p2", dl.layer2_percent_increase));
                    parts.push(fixed("w1", dl.weight_after_layer1_kg));
                }
                None => parts.push("dl=".to_string()),
            }
        }
        CalcResult::Bare(r) => {
            parts.push(fixed("ba", r.bare_area));
            parts.push(fixed("bwt", r.weight_kg));
        }
    }

    parts.join(SEP)
}

fn fixed(label: &str, value: f64) -> String {
    format!("{}={:.prec$}", label, value, prec = FINGERPRINT_PRECISION)
}
