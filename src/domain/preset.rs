// ==========================================
// 绝缘导体规格计算系统 - 绝缘预设目录
// ==========================================
// 职责: 静态绝缘体系目录 + 系数/厚度解析规则
// 红线: 目录为进程级不可变数据，运行期不变更
// ==========================================
// 解析优先级 (resolve_factor):
//   1) 电压等级选项 (材质特定 > 通用)
//   2) 预设级材质特定系数
//   3) 预设级通用系数，缺省回退 1.0
// 解析优先级 (resolve_default_thickness):
//   1) 双层缺省之和
//   2) 形状特定缺省
//   3) 通用缺省，缺省回退 0.0
// ==========================================

use crate::domain::types::{Material, Shape};

// ==========================================
// 系数取值 (Factor Value)
// ==========================================
// 通用值或按材质拆分值
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FactorValue {
    /// 铝/铜共用同一系数
    Generic(f64),
    /// 按材质拆分
    PerMaterial { aluminium: f64, copper: f64 },
}

impl FactorValue {
    /// 取指定材质的系数
    pub fn for_material(&self, material: Material) -> f64 {
        match self {
            FactorValue::Generic(f) => *f,
            FactorValue::PerMaterial { aluminium, copper } => match material {
                Material::Aluminium => *aluminium,
                Material::Copper => *copper,
            },
        }
    }
}

// ==========================================
// 电压等级选项 (Voltage Option)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageOption {
    /// 展示标签，如 "8 kV"
    pub label: &'static str,
    /// 该电压等级下的系数
    pub factor: FactorValue,
}

// ==========================================
// 系数规则 (Factor Rule)
// ==========================================
// 封闭变体集: 每种结构上不同的预设形态一个变体，
// 使优先级规则可被 match 穷尽检查
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FactorRule {
    /// 未定义系数，解析回退 1.0
    None,
    /// 固定系数 (通用或按材质)
    Fixed(FactorValue),
    /// 按电压等级取系数；无标签或标签未命中时回退 1.0
    VoltageKeyed(&'static [VoltageOption]),
}

// ==========================================
// 缺省厚度规则 (Thickness Rule)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThicknessRule {
    /// 未定义，解析回退 0.0
    None,
    /// 扁线/圆线共用缺省厚度 (mm)
    Uniform(f64),
    /// 按形状拆分缺省厚度 (mm)
    PerShape { strip: f64, wire: f64 },
}

// ==========================================
// 双层绝缘描述 (Dual Layer Spec)
// ==========================================
// 两层依次包覆 (如先聚酯后玻璃丝)；
// 存在时其缺省厚度之和优先于任何单层缺省
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualLayerSpec {
    pub layer1_name: &'static str,
    pub layer2_name: &'static str,
    /// 第一层缺省厚度 (mm)
    pub default_layer1_thickness: f64,
    /// 第二层缺省厚度 (mm)
    pub default_layer2_thickness: f64,
    /// 第一层缺省系数
    pub default_layer1_factor: f64,
    /// 第二层缺省系数
    pub default_layer2_factor: f64,
}

impl DualLayerSpec {
    /// 双层缺省总厚度 (mm)
    pub fn total_default_thickness(&self) -> f64 {
        self.default_layer1_thickness + self.default_layer2_thickness
    }
}

// ==========================================
// 绝缘预设 (Insulation Preset)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsulationPreset {
    /// 目录内唯一名称
    pub name: &'static str,
    pub factor: FactorRule,
    pub thickness: ThicknessRule,
    pub dual_layer: Option<DualLayerSpec>,
    /// 仅对单一材质有效时填写
    pub material_restriction: Option<Material>,
}

impl InsulationPreset {
    /// 预设对指定材质是否可用
    pub fn available_for(&self, material: Material) -> bool {
        match self.material_restriction {
            Some(restricted) => restricted == material,
            None => true,
        }
    }

    /// 解析绝缘系数
    ///
    /// 优先级:
    /// 1) voltage_label 命中电压选项 → 该选项系数 (材质特定优先)
    /// 2) 预设级材质特定系数
    /// 3) 预设级通用系数，缺省 1.0
    ///
    /// 解析本身永不失败；未知预设名属调用方缺陷，
    /// 调用方应先经 find_preset 校验存在性
    pub fn resolve_factor(&self, material: Material, voltage_label: Option<&str>) -> f64 {
        if let FactorRule::VoltageKeyed(options) = self.factor {
            if let Some(label) = voltage_label {
                if let Some(opt) = options.iter().find(|o| o.label.eq_ignore_ascii_case(label)) {
                    return opt.factor.for_material(material);
                }
            }
            // 无标签或未命中: 落入最终回退
            return DEFAULT_FACTOR;
        }

        match self.factor {
            FactorRule::Fixed(value) => value.for_material(material),
            _ => DEFAULT_FACTOR,
        }
    }

    /// 解析缺省绝缘厚度 (mm)
    ///
    /// 双层缺省存在时返回其和，优先于形状特定缺省
    pub fn resolve_default_thickness(&self, shape: Shape) -> f64 {
        if let Some(dual) = &self.dual_layer {
            return dual.total_default_thickness();
        }

        match self.thickness {
            ThicknessRule::Uniform(t) => t,
            ThicknessRule::PerShape { strip, wire } => match shape {
                Shape::Strip => strip,
                Shape::Wire => wire,
            },
            ThicknessRule::None => DEFAULT_THICKNESS,
        }
    }
}

/// 未定义系数时的中性回退值
pub const DEFAULT_FACTOR: f64 = 1.0;

/// 未定义缺省厚度时的回退值 (mm)
pub const DEFAULT_THICKNESS: f64 = 0.0;

// ==========================================
// 静态预设目录
// ==========================================
// 数据来源: 生产现场实测系数台账
pub const CATALOG: &[InsulationPreset] = &[
    InsulationPreset {
        name: "Dfg 225 yarn",
        factor: FactorRule::Fixed(FactorValue::Generic(1.45)),
        thickness: ThicknessRule::Uniform(0.50),
        dual_layer: None,
        material_restriction: None,
    },
    InsulationPreset {
        name: "Dfg 900 yarn",
        factor: FactorRule::Fixed(FactorValue::Generic(1.40)),
        thickness: ThicknessRule::Uniform(0.50),
        dual_layer: None,
        material_restriction: None,
    },
    InsulationPreset {
        name: "Polyester",
        factor: FactorRule::Fixed(FactorValue::PerMaterial {
            aluminium: 1.40,
            copper: 1.30,
        }),
        thickness: ThicknessRule::PerShape {
            strip: 0.50,
            wire: 0.40,
        },
        dual_layer: None,
        material_restriction: None,
    },
    InsulationPreset {
        name: "Poly + Dfg 225",
        factor: FactorRule::VoltageKeyed(&[
            VoltageOption {
                label: "8 kV",
                factor: FactorValue::Generic(1.45),
            },
            VoltageOption {
                label: "18 kV",
                factor: FactorValue::Generic(1.35),
            },
        ]),
        thickness: ThicknessRule::None,
        dual_layer: Some(DualLayerSpec {
            layer1_name: "Poly",
            layer2_name: "Dfg 225",
            default_layer1_thickness: 0.35,
            default_layer2_thickness: 0.50,
            default_layer1_factor: 1.08,
            default_layer2_factor: 1.45,
        }),
        material_restriction: None,
    },
    InsulationPreset {
        name: "Poly + Paper",
        // 名称带 "+" 但工艺上按单层包覆处理
        factor: FactorRule::Fixed(FactorValue::Generic(0.95)),
        thickness: ThicknessRule::PerShape {
            strip: 0.50,
            wire: 0.40,
        },
        dual_layer: None,
        material_restriction: None,
    },
    InsulationPreset {
        name: "Enamel",
        // 台账未给出漆包系数，解析回退中性值 1.0
        factor: FactorRule::None,
        thickness: ThicknessRule::Uniform(0.12),
        dual_layer: None,
        material_restriction: None,
    },
    InsulationPreset {
        name: "Enamel + Dfg 900",
        factor: FactorRule::Fixed(FactorValue::Generic(1.40)),
        thickness: ThicknessRule::None,
        dual_layer: Some(DualLayerSpec {
            layer1_name: "Enamel",
            layer2_name: "Dfg 900",
            default_layer1_thickness: 0.10,
            default_layer2_thickness: 0.50,
            default_layer1_factor: 1.00,
            default_layer2_factor: 1.40,
        }),
        material_restriction: None,
    },
    InsulationPreset {
        name: "Paper",
        factor: FactorRule::Fixed(FactorValue::Generic(0.90)),
        thickness: ThicknessRule::Uniform(0.50),
        dual_layer: None,
        // 纸包仅用于铝扁线 (变压器绕组)
        material_restriction: Some(Material::Aluminium),
    },
];

/// 按名称查找预设 (不区分大小写)
pub fn find_preset(name: &str) -> Option<&'static InsulationPreset> {
    CATALOG.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// 指定材质可用的预设列表
pub fn presets_for_material(material: Material) -> Vec<&'static InsulationPreset> {
    CATALOG
        .iter()
        .filter(|p| p.available_for(material))
        .collect()
}
