// ==========================================
// 绝缘导体规格计算系统 - CLI 主入口
// ==========================================
// 用法:
//   conductor-calc catalog
//   conductor-calc strip <width> <thickness> [preset] [kV标签]
//   conductor-calc wire <dia> [preset] [kV标签]
//   conductor-calc bare-strip <width> <thickness> <length_m>
//   conductor-calc lme <lme_usd> <sbi_rate>
//   conductor-calc history
// ==========================================

use std::sync::Arc;

use anyhow::{bail, Context};
use conductor_calc::app::{get_default_db_path, AppState};
use conductor_calc::domain::preset::presets_for_material;
use conductor_calc::domain::types::{CalcMode, Material, Shape};
use conductor_calc::identity::FixedIdentityProvider;
use conductor_calc::{CalculationInputs, CalculatorSelection};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    conductor_calc::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", conductor_calc::APP_NAME);
    tracing::info!("系统版本: {}", conductor_calc::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let owner =
        std::env::var("CONDUCTOR_CALC_OWNER").unwrap_or_else(|_| "local-engineer".to_string());
    let identity = Arc::new(FixedIdentityProvider::new(&owner));

    let state = AppState::new(&db_path, identity).context("无法初始化AppState")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("catalog");

    match command {
        "catalog" => print_catalog(),
        "strip" => {
            let width = parse_f64(&args, 1, "width")?;
            let thickness = parse_f64(&args, 2, "thickness")?;
            run_insulated(&state, Shape::Strip, width, thickness, 0.0, &args, 3).await?;
        }
        "wire" => {
            let dia = parse_f64(&args, 1, "dia")?;
            run_insulated(&state, Shape::Wire, 0.0, 0.0, dia, &args, 2).await?;
        }
        "bare-strip" => {
            let width = parse_f64(&args, 1, "width")?;
            let thickness = parse_f64(&args, 2, "thickness")?;
            let length_m = parse_f64(&args, 3, "length_m")?;
            run_bare(&state, width, thickness, length_m).await?;
        }
        "lme" => {
            let lme = parse_f64(&args, 1, "lme_usd")?;
            let sbi = parse_f64(&args, 2, "sbi_rate")?;
            let rates = state.pricing_engine.lme_copper(lme, sbi);
            println!("LME + 升水: {:.2} USD/t", rates.lme_plus_premium);
            println!("CSP:   {:.2}", rates.csp_rate);
            println!("WWMAI: {:.2}", rates.wwmai_rate);
        }
        "history" => {
            let records = state.calculator_api.history().await?;
            println!("共 {} 条记录 (新→旧)", records.len());
            for r in records {
                println!(
                    "{} | {} | {} {} {} | {}",
                    r.created_at.to_rfc3339(),
                    r.save_mode,
                    r.mode,
                    r.material,
                    r.shape,
                    r.preset_name.as_deref().unwrap_or("-"),
                );
            }
        }
        other => bail!("未知命令: {}", other),
    }

    Ok(())
}

fn parse_f64(args: &[String], index: usize, name: &str) -> anyhow::Result<f64> {
    let raw = args
        .get(index)
        .with_context(|| format!("缺少参数: {}", name))?;
    raw.parse::<f64>()
        .with_context(|| format!("参数 {} 不是数值: {}", name, raw))
}

fn print_catalog() {
    for material in [Material::Aluminium, Material::Copper] {
        println!("== {} (密度 {} kg/dm³) ==", material, material.density());
        for preset in presets_for_material(material) {
            let factor = preset.resolve_factor(material, None);
            let thickness = preset.resolve_default_thickness(Shape::Strip);
            println!(
                "  {:<18} 系数 {:.2}  缺省厚度 {:.2} mm{}",
                preset.name,
                factor,
                thickness,
                if preset.dual_layer.is_some() { "  (双层)" } else { "" },
            );
        }
    }
}

async fn run_insulated(
    state: &AppState,
    shape: Shape,
    width: f64,
    thickness: f64,
    dia: f64,
    args: &[String],
    preset_index: usize,
) -> anyhow::Result<()> {
    let selection = CalculatorSelection {
        mode: CalcMode::Insulated,
        material: Material::Aluminium,
        shape,
        preset_name: args.get(preset_index).cloned(),
        voltage_label: args.get(preset_index + 1).cloned(),
    };

    let mut inputs = CalculationInputs {
        width,
        thickness,
        dia,
        ..Default::default()
    };
    state
        .calculator_api
        .apply_preset_defaults(&selection, &mut inputs)?;

    match state.calculator_api.recompute(&selection, &inputs)? {
        Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
        None => println!("输入不完整，计算未求值"),
    }

    // 等待防抖提交落库后退出
    state.autosave.flush().await;
    tracing::info!("保存状态: {}", state.autosave.status());
    Ok(())
}

async fn run_bare(
    state: &AppState,
    width: f64,
    thickness: f64,
    length_m: f64,
) -> anyhow::Result<()> {
    let selection = CalculatorSelection {
        mode: CalcMode::Bare,
        material: Material::Aluminium,
        shape: Shape::Strip,
        preset_name: None,
        voltage_label: None,
    };
    let inputs = CalculationInputs {
        width,
        thickness,
        length_m,
        ..Default::default()
    };

    match state.calculator_api.recompute(&selection, &inputs)? {
        Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
        None => println!("输入不完整，计算未求值"),
    }

    state.autosave.flush().await;
    tracing::info!("保存状态: {}", state.autosave.status());
    Ok(())
}
