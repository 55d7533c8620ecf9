// ==========================================
// 绝缘导体规格计算系统 - 引擎层
// ==========================================
// 职责: 闭式计算公式与指纹派生，全部为纯函数
// 红线: 公式层不返回 Result、不 panic；前置条件由调用方门控
// ==========================================

pub mod factor;
pub mod fingerprint;
pub mod geometry;
pub mod pricing;

// 重导出核心引擎
pub use factor::{FactorEngine, ReverseFactorParams};
pub use fingerprint::{canonical_state_string, fingerprint, FINGERPRINT_PRECISION};
pub use geometry::{
    GeometryEngine, StripDualParams, StripSingleParams, WireDualParams, WireSingleParams,
    DEFAULT_SPEED_M_HR, WIRE_AREA_COEFF,
};
pub use pricing::{
    LmeCopperRates, PricingEngine, HANDLING_CHARGES, LME_PREMIUM, MULTIPLIER_CSP, MULTIPLIER_WWMAI,
};
