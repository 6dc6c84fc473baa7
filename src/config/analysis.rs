use super::traits::ConfigSection;
use crate::engines::metrics::DEFAULT_RISK_FREE_ANNUAL;
use crate::error::PortfolioLabError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Annual risk-free rate used by Sharpe, Sortino, alpha and M2
    pub risk_free_annual: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            risk_free_annual: DEFAULT_RISK_FREE_ANNUAL,
        }
    }
}

impl AnalysisConfig {
    /// Checks a risk-free rate from either the config file or a request.
    pub fn check_risk_free(rate: f64) -> Result<(), PortfolioLabError> {
        if !rate.is_finite() || rate <= -1.0 || rate >= 1.0 {
            return Err(PortfolioLabError::Configuration(format!(
                "Risk-free rate must be a finite fraction in (-1, 1), got {}",
                rate
            )));
        }
        Ok(())
    }
}

impl ConfigSection for AnalysisConfig {
    fn section_name() -> &'static str {
        "analysis"
    }

    fn validate(&self) -> Result<(), PortfolioLabError> {
        Self::check_risk_free(self.risk_free_annual)
    }
}
