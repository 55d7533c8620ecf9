// ==========================================
// 计算引擎集成测试
// ==========================================
// 测试目标: 经 CalculatorApi 验证台账口径公式与求值门控
// ==========================================

mod test_helpers;

use conductor_calc::domain::types::{CalcMode, Material, Shape};
use conductor_calc::{ApiError, CalcResult, CalculationInputs, CalculatorSelection};

fn insulated_selection(shape: Shape, preset: Option<&str>, kv: Option<&str>) -> CalculatorSelection {
    CalculatorSelection {
        mode: CalcMode::Insulated,
        material: Material::Aluminium,
        shape,
        preset_name: preset.map(str::to_string),
        voltage_label: kv.map(str::to_string),
    }
}

fn unwrap_insulated(result: CalcResult) -> conductor_calc::InsulationResult {
    match result {
        CalcResult::Insulated(r) => r,
        CalcResult::Bare(_) => panic!("期望绝缘计算结果"),
    }
}

#[tokio::test]
async fn test_strip_single_layer_via_api() {
    let (_tmp, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let state = test_helpers::create_test_state(&db_path, "tester").expect("state");

    let selection = insulated_selection(Shape::Strip, None, None);
    let inputs = CalculationInputs {
        width: 10.0,
        thickness: 2.0,
        insulation_thickness: 0.5,
        factor: 1.5,
        ..Default::default()
    };

    let result = state
        .calculator_api
        .evaluate(&selection, &inputs)
        .expect("求值不应失败")
        .expect("门控满足，应有结果");
    let r = unwrap_insulated(result);

    assert!((r.bare_area - 20.0).abs() < 1e-9);
    assert!((r.insulated_area - 26.25).abs() < 1e-9);
    assert!((r.percent_increase - 17.304).abs() < 0.01);
    assert!((r.bare_weight_required_kg - 85.255).abs() < 0.01);
    assert!((r.meters_per_spool - 461.4).abs() < 0.1);
}

#[tokio::test]
async fn test_wire_single_layer_via_api() {
    let (_tmp, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let state = test_helpers::create_test_state(&db_path, "tester").expect("state");

    let selection = insulated_selection(Shape::Wire, None, None);
    let inputs = CalculationInputs {
        dia: 4.0,
        insulation_thickness: 0.5,
        factor: 1.5,
        ..Default::default()
    };

    let r = unwrap_insulated(
        state
            .calculator_api
            .evaluate(&selection, &inputs)
            .unwrap()
            .unwrap(),
    );

    assert!((r.bare_area - 12.56).abs() < 0.001);
    assert!((r.percent_increase - 14.71).abs() < 0.01);
    assert!((r.bare_weight_required_kg - 87.18).abs() < 0.01);
}

#[tokio::test]
async fn test_dual_layer_preset_defaults_flow() {
    let (_tmp, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let state = test_helpers::create_test_state(&db_path, "tester").expect("state");

    // Poly + Dfg 225: 缺省 0.35@1.08 + 0.50@1.45
    let selection = insulated_selection(Shape::Strip, Some("Poly + Dfg 225"), Some("8 kV"));
    let mut inputs = CalculationInputs {
        width: 10.0,
        thickness: 3.0,
        ..Default::default()
    };
    state
        .calculator_api
        .apply_preset_defaults(&selection, &mut inputs)
        .expect("预设解析不应失败");

    assert!((inputs.layer1_thickness - 0.35).abs() < 1e-9);
    assert!((inputs.layer2_thickness - 0.50).abs() < 1e-9);
    assert!((inputs.layer1_factor - 1.08).abs() < 1e-9);
    assert!((inputs.layer2_factor - 1.45).abs() < 1e-9);
    // 电压选项系数预填到单值系数位
    assert!((inputs.factor - 1.45).abs() < 1e-9);
    // 总绝缘厚度 = 双层缺省之和
    assert!((inputs.insulation_thickness - 0.85).abs() < 1e-9);

    let r = unwrap_insulated(
        state
            .calculator_api
            .evaluate(&selection, &inputs)
            .unwrap()
            .unwrap(),
    );
    let dual = r.dual_layer.expect("双层预设应产出分解");

    assert!((dual.layer1_percent_increase - 6.209).abs() < 0.01);
    assert!((dual.layer2_percent_increase - 10.96).abs() < 0.01);
    assert!((dual.weight_after_layer1_kg - 90.12).abs() < 0.01);
    assert!((r.bare_weight_required_kg - 84.85).abs() < 0.01);

    // 18 kV 改变电压系数但不改变层缺省
    let selection_18 = insulated_selection(Shape::Strip, Some("Poly + Dfg 225"), Some("18 kV"));
    let mut inputs_18 = CalculationInputs::default();
    state
        .calculator_api
        .apply_preset_defaults(&selection_18, &mut inputs_18)
        .unwrap();
    assert!((inputs_18.factor - 1.35).abs() < 1e-9);
    assert!((inputs_18.layer1_factor - 1.08).abs() < 1e-9);
}

#[tokio::test]
async fn test_bare_mode_calculation() {
    let (_tmp, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let state = test_helpers::create_test_state(&db_path, "tester").expect("state");

    let selection = CalculatorSelection {
        mode: CalcMode::Bare,
        material: Material::Aluminium,
        shape: Shape::Strip,
        preset_name: None,
        voltage_label: None,
    };
    let inputs = CalculationInputs {
        width: 10.0,
        thickness: 2.0,
        length_m: 1000.0,
        ..Default::default()
    };

    let result = state
        .calculator_api
        .evaluate(&selection, &inputs)
        .unwrap()
        .unwrap();
    match result {
        CalcResult::Bare(r) => {
            assert!((r.bare_area - 20.0).abs() < 1e-9);
            assert!((r.weight_kg - 54.18).abs() < 0.01);
        }
        CalcResult::Insulated(_) => panic!("BARE 模式应产出裸导体结果"),
    }
}

#[tokio::test]
async fn test_evaluation_suppressed_on_incomplete_inputs() {
    let (_tmp, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let state = test_helpers::create_test_state(&db_path, "tester").expect("state");

    // 缺厚度的扁线: 抑制
    let selection = insulated_selection(Shape::Strip, None, None);
    let inputs = CalculationInputs {
        width: 10.0,
        ..Default::default()
    };
    assert!(state
        .calculator_api
        .evaluate(&selection, &inputs)
        .unwrap()
        .is_none());

    // 裸模式缺长度: 抑制
    let bare = CalculatorSelection {
        mode: CalcMode::Bare,
        material: Material::Aluminium,
        shape: Shape::Strip,
        preset_name: None,
        voltage_label: None,
    };
    let bare_inputs = CalculationInputs {
        width: 10.0,
        thickness: 2.0,
        length_m: 0.0,
        ..Default::default()
    };
    assert!(state
        .calculator_api
        .evaluate(&bare, &bare_inputs)
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_preset_reference_validation() {
    let (_tmp, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let state = test_helpers::create_test_state(&db_path, "tester").expect("state");

    let unknown = insulated_selection(Shape::Strip, Some("Nylon"), None);
    let inputs = CalculationInputs {
        width: 10.0,
        thickness: 2.0,
        ..Default::default()
    };
    assert!(matches!(
        state.calculator_api.evaluate(&unknown, &inputs),
        Err(ApiError::UnknownPreset(_))
    ));

    // Paper 仅限铝
    let mut copper_paper = insulated_selection(Shape::Strip, Some("Paper"), None);
    copper_paper.material = Material::Copper;
    assert!(matches!(
        state.calculator_api.evaluate(&copper_paper, &inputs),
        Err(ApiError::PresetUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_reverse_factor_and_pricing() {
    let (_tmp, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let state = test_helpers::create_test_state(&db_path, "tester").expect("state");

    let factor = state
        .factor_engine
        .reverse_factor(&conductor_calc::engine::ReverseFactorParams {
            width: 10.0,
            thickness: 2.0,
            covering: 0.5,
            percentage_increase: 10.0,
            density: 2.709,
        });
    let expected = (20.0 * 2.709 * 10.0) / ((26.25 - 20.0) * 100.0);
    assert!((factor - expected).abs() < 1e-12);

    let rates = state.pricing_engine.lme_copper(10000.0, 90.0);
    assert_eq!(rates.lme_plus_premium, 10190.0);
    assert!((rates.csp_rate - 970.8).abs() < 0.5);
    assert!((rates.wwmai_rate - 1018.56).abs() < 0.5);
}
