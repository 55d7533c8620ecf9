// ==========================================
// 绝缘导体规格计算系统 - 计算器 API
// ==========================================
// 职责: 选择项 + 原始输入 → 解析 → 求值 → 指纹 → 防抖保存
// 的完整会话编排；对外提供查询历史记录接口
// ==========================================
// 求值门控: 非正截面尺寸 (或裸模式非正长度) 抑制计算，
// 返回 None 而非错误；公式层前置条件由此保证
// ==========================================

use std::sync::Arc;
use tracing::debug;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::calculation::{
    BareResult, CalcResult, CalculationInputs, CalculationRecord, CalculationSnapshot,
};
use crate::domain::preset::{find_preset, InsulationPreset};
use crate::domain::types::{CalcMode, Material, SaveStatus, Shape};
use crate::engine::geometry::{
    GeometryEngine, StripDualParams, StripSingleParams, WireDualParams, WireSingleParams,
};
use crate::identity::IdentityProvider;
use crate::repository::record_store::RecordStore;
use crate::service::autosave::AutosaveService;

// ==========================================
// CalculatorSelection - 会话选择项
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorSelection {
    pub mode: CalcMode,
    pub material: Material,
    pub shape: Shape,
    pub preset_name: Option<String>,
    pub voltage_label: Option<String>,
}

// ==========================================
// CalculatorApi - 计算器 API
// ==========================================
pub struct CalculatorApi {
    geometry: GeometryEngine,
    autosave: Arc<AutosaveService>,
    store: Arc<dyn RecordStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl CalculatorApi {
    pub fn new(
        autosave: Arc<AutosaveService>,
        store: Arc<dyn RecordStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            geometry: GeometryEngine::new(),
            autosave,
            store,
            identity,
        }
    }

    // ==========================================
    // 预设解析
    // ==========================================

    /// 校验选择项中的预设引用，返回目录条目
    ///
    /// INSULATED 模式下预设名必须存在且对当前材质可用；
    /// BARE 模式忽略预设
    fn validated_preset(
        &self,
        selection: &CalculatorSelection,
    ) -> ApiResult<Option<&'static InsulationPreset>> {
        if selection.mode == CalcMode::Bare {
            return Ok(None);
        }

        let Some(name) = selection.preset_name.as_deref() else {
            return Ok(None);
        };

        let preset =
            find_preset(name).ok_or_else(|| ApiError::UnknownPreset(name.to_string()))?;

        if !preset.available_for(selection.material) {
            return Err(ApiError::PresetUnavailable {
                preset: preset.name.to_string(),
                material: selection.material.to_string(),
            });
        }

        Ok(Some(preset))
    }

    /// 按预设解析结果填充输入缺省值
    ///
    /// 对应交互口径: 切换预设/电压等级时预填系数与厚度，
    /// 用户仍可在此之上人工覆写
    pub fn apply_preset_defaults(
        &self,
        selection: &CalculatorSelection,
        inputs: &mut CalculationInputs,
    ) -> ApiResult<()> {
        let Some(preset) = self.validated_preset(selection)? else {
            return Ok(());
        };

        inputs.factor =
            preset.resolve_factor(selection.material, selection.voltage_label.as_deref());

        match &preset.dual_layer {
            Some(dual) => {
                inputs.layer1_thickness = dual.default_layer1_thickness;
                inputs.layer2_thickness = dual.default_layer2_thickness;
                inputs.layer1_factor = dual.default_layer1_factor;
                inputs.layer2_factor = dual.default_layer2_factor;
                inputs.insulation_thickness = dual.total_default_thickness();
            }
            None => {
                inputs.insulation_thickness = preset.resolve_default_thickness(selection.shape);
            }
        }

        Ok(())
    }

    // ==========================================
    // 求值
    // ==========================================

    /// 求值当前状态
    ///
    /// 门控不满足时返回 Ok(None)（计算被抑制，不是错误）
    pub fn evaluate(
        &self,
        selection: &CalculatorSelection,
        inputs: &CalculationInputs,
    ) -> ApiResult<Option<CalcResult>> {
        let preset = self.validated_preset(selection)?;

        if !inputs.has_positive_section(selection.shape) {
            return Ok(None);
        }

        let density = selection.material.density();

        let result = match selection.mode {
            CalcMode::Bare => {
                if inputs.length_m <= 0.0 {
                    return Ok(None);
                }
                let bare_area = match selection.shape {
                    Shape::Strip => self.geometry.strip_bare_area(inputs.width, inputs.thickness),
                    Shape::Wire => self.geometry.wire_bare_area(inputs.dia),
                };
                CalcResult::Bare(BareResult {
                    bare_area,
                    weight_kg: self.geometry.bare_weight_kg(bare_area, density, inputs.length_m),
                })
            }
            CalcMode::Insulated => {
                let dual = preset.and_then(|p| p.dual_layer.as_ref());
                match (selection.shape, dual.is_some()) {
                    (Shape::Strip, false) => {
                        CalcResult::Insulated(self.geometry.strip_single(&StripSingleParams {
                            width: inputs.width,
                            thickness: inputs.thickness,
                            covering: inputs.insulation_thickness,
                            factor: inputs.factor,
                            density,
                            target_weight_kg: inputs.target_weight_kg,
                            qty_per_spool_kg: inputs.qty_per_spool_kg,
                        }))
                    }
                    (Shape::Wire, false) => {
                        CalcResult::Insulated(self.geometry.wire_single(&WireSingleParams {
                            dia: inputs.dia,
                            covering: inputs.insulation_thickness,
                            factor: inputs.factor,
                            density,
                            target_weight_kg: inputs.target_weight_kg,
                            qty_per_spool_kg: inputs.qty_per_spool_kg,
                        }))
                    }
                    (Shape::Strip, true) => {
                        CalcResult::Insulated(self.geometry.strip_dual(&StripDualParams {
                            width: inputs.width,
                            thickness: inputs.thickness,
                            layer1_covering: inputs.layer1_thickness,
                            layer2_covering: inputs.layer2_thickness,
                            layer1_factor: inputs.layer1_factor,
                            layer2_factor: inputs.layer2_factor,
                            density,
                            target_weight_kg: inputs.target_weight_kg,
                            qty_per_spool_kg: inputs.qty_per_spool_kg,
                        }))
                    }
                    (Shape::Wire, true) => {
                        CalcResult::Insulated(self.geometry.wire_dual(&WireDualParams {
                            dia: inputs.dia,
                            layer1_covering: inputs.layer1_thickness,
                            layer2_covering: inputs.layer2_thickness,
                            layer1_factor: inputs.layer1_factor,
                            layer2_factor: inputs.layer2_factor,
                            density,
                            target_weight_kg: inputs.target_weight_kg,
                            qty_per_spool_kg: inputs.qty_per_spool_kg,
                        }))
                    }
                }
            }
        };

        Ok(Some(result))
    }

    // ==========================================
    // 变更入口
    // ==========================================

    /// 状态变更入口: 求值并调度防抖自动保存
    ///
    /// 计算被抑制时不调度保存 (无结果即无可保存状态)
    pub fn recompute(
        &self,
        selection: &CalculatorSelection,
        inputs: &CalculationInputs,
    ) -> ApiResult<Option<CalcResult>> {
        let result = self.evaluate(selection, inputs)?;

        if let Some(result) = result {
            let snapshot = self.snapshot(selection, inputs, result);
            self.autosave.schedule(snapshot);
            debug!(status = %self.autosave.status(), "已调度自动保存");
        }

        Ok(result)
    }

    /// 显式保存: 总是插入 MANUAL 记录，绕过指纹去重
    pub async fn manual_save(
        &self,
        selection: &CalculatorSelection,
        inputs: &CalculationInputs,
    ) -> ApiResult<String> {
        let result = self.evaluate(selection, inputs)?.ok_or_else(|| {
            ApiError::IncompleteInputs("截面尺寸或长度缺失".to_string())
        })?;

        let snapshot = self.snapshot(selection, inputs, result);
        Ok(self.autosave.manual_save(&snapshot).await?)
    }

    /// 自动保存状态 (供展示层轮询)
    pub fn save_status(&self) -> SaveStatus {
        self.autosave.status()
    }

    // ==========================================
    // 历史记录查询
    // ==========================================

    /// 当前归属者的记录 (新→旧)；未登录返回空表
    pub async fn history(&self) -> ApiResult<Vec<CalculationRecord>> {
        match self.identity.current_owner_id() {
            Some(owner) => Ok(self.store.list_by_owner(&owner).await?),
            None => Ok(Vec::new()),
        }
    }

    /// 全部记录 (新→旧)
    pub async fn history_all(&self) -> ApiResult<Vec<CalculationRecord>> {
        Ok(self.store.list_all().await?)
    }

    fn snapshot(
        &self,
        selection: &CalculatorSelection,
        inputs: &CalculationInputs,
        result: CalcResult,
    ) -> CalculationSnapshot {
        CalculationSnapshot {
            mode: selection.mode,
            material: selection.material,
            shape: selection.shape,
            preset_name: selection.preset_name.clone(),
            voltage_label: selection.voltage_label.clone(),
            inputs: *inputs,
            result,
        }
    }
}
