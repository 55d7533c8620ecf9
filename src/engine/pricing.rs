// ==========================================
// 绝缘导体规格计算系统 - LME 铜价派生引擎
// ==========================================
// 职责: 由 LME 现货价 + 汇率派生 CSP/WWMAI 本币报价
// 纯函数，无状态，除常规数值溢出外无失败模式
// ==========================================

/// LME 固定升水 (USD/t)
pub const LME_PREMIUM: f64 = 190.0;

/// 装卸杂费 (本币/t)
pub const HANDLING_CHARGES: f64 = 4250.0;

/// CSP 口径乘数
pub const MULTIPLIER_CSP: f64 = 1.055;

/// WWMAI 口径乘数
pub const MULTIPLIER_WWMAI: f64 = 1.106;

/// LME 铜价派生结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmeCopperRates {
    /// LME + 升水 (USD/t)
    pub lme_plus_premium: f64,
    /// CSP 口径本币价 (本币/kg)
    pub csp_rate: f64,
    /// WWMAI 口径本币价 (本币/kg)
    pub wwmai_rate: f64,
}

// ==========================================
// PricingEngine - 价格派生引擎
// ==========================================
pub struct PricingEngine;

impl PricingEngine {
    pub fn new() -> Self {
        Self
    }

    /// LME 铜价派生
    ///
    /// 公式:
    /// - lmePlusPremium = lme + 190
    /// - cspRate   = (lmePlusPremium * 1.055 * sbi + 4250) / 1000
    /// - wwmaiRate = (lmePlusPremium * 1.106 * sbi + 4250) / 1000
    pub fn lme_copper(&self, lme: f64, sbi_rate: f64) -> LmeCopperRates {
        let lme_plus_premium = lme + LME_PREMIUM;

        let csp_rate = (lme_plus_premium * MULTIPLIER_CSP * sbi_rate + HANDLING_CHARGES) / 1000.0;
        let wwmai_rate =
            (lme_plus_premium * MULTIPLIER_WWMAI * sbi_rate + HANDLING_CHARGES) / 1000.0;

        LmeCopperRates {
            lme_plus_premium,
            csp_rate,
            wwmai_rate,
        }
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new()
    }
}
