//! The kernel's stance: how much it currently leans toward control, growth
//! or survival, and how urgent and confident it feels.
//!
//! Stance lives only in memory. Each update decays the three leanings,
//! nudges them from the latest [`Observations`], then renormalises so they
//! sum to one.

use core::fmt;

use serde::Serialize;

use crate::sense::Observations;

const DECAY: f64 = 0.92;
const CONTROL_PUSH: f64 = 0.14;
const SURVIVAL_PUSH: f64 = 0.16;
const GROWTH_PUSH: f64 = 0.12;
const INFLATION_CONTROL_PUSH: f64 = 0.05;

/// Dominant leaning of the stance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StanceMode {
    /// Order first.
    Control,
    /// Expansion first.
    Growth,
    /// Keep the state afloat.
    Survival,
}

impl StanceMode {
    /// Upper-case label used in narration and as an RNG subkey.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Control => "CONTROL",
            Self::Growth => "GROWTH",
            Self::Survival => "SURVIVAL",
        }
    }
}

impl fmt::Display for StanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kernel stance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StanceState {
    /// Weight on order and security.
    pub control: f64,
    /// Weight on output and investment.
    pub growth: f64,
    /// Weight on solvency and supply.
    pub survival: f64,
    /// Highest current risk, in `[0, 1]`.
    pub urgency: f64,
    /// Inverse of recent price volatility, in `[0.05, 1]`.
    pub confidence: f64,
    /// Slow-moving average of confidence, in `[0.1, 1]`.
    pub trust_in_operator: f64,
}

impl Default for StanceState {
    fn default() -> Self {
        Self {
            control: 0.34,
            growth: 0.33,
            survival: 0.33,
            urgency: 0.25,
            confidence: 0.65,
            trust_in_operator: 0.55,
        }
    }
}

impl StanceState {
    /// Fold one set of observations into the stance.
    pub fn update(&mut self, obs: &Observations) {
        let risks = obs.risks;
        let shortages = obs.shortages.len();

        self.control *= DECAY;
        self.growth *= DECAY;
        self.survival *= DECAY;

        if risks.social > 0.45 || obs.unrest_trend > 0.2 {
            self.control += CONTROL_PUSH;
        }
        if risks.fiscal > 0.5 || shortages >= 3 {
            self.survival += SURVIVAL_PUSH;
        }
        if risks.social < 0.3 && shortages <= 1 {
            self.growth += GROWTH_PUSH;
        }
        if obs.inflation > 2.0 {
            self.control += INFLATION_CONTROL_PUSH;
        }
        self.normalize();

        self.urgency = risks.peak().min(1.0);
        self.confidence = (1.0 - obs.volatility / 15.0).clamp(0.05, 1.0);
        self.trust_in_operator = self
            .confidence
            .mul_add(0.02, self.trust_in_operator * 0.98)
            .clamp(0.1, 1.0);
    }

    /// The strongest leaning. Ties go to control, then growth.
    pub fn dominant(&self) -> StanceMode {
        let mut mode = StanceMode::Control;
        let mut top = self.control;
        if self.growth > top {
            mode = StanceMode::Growth;
            top = self.growth;
        }
        if self.survival > top {
            mode = StanceMode::Survival;
        }
        mode
    }

    fn normalize(&mut self) {
        let total = self.control + self.growth + self.survival;
        if total <= 0.0 {
            let neutral = Self::default();
            self.control = neutral.control;
            self.growth = neutral.growth;
            self.survival = neutral.survival;
            return;
        }
        self.control /= total;
        self.growth /= total;
        self.survival /= total;
    }
}
