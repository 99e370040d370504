//! Observations the kernel derives from a saved state.
//!
//! The kernel looks at the market and world each time it answers, compares
//! them with the last world it saw, and boils the result down to four risk
//! scores in `[0, 1]` that drive the stance engine.

use serde::Serialize;
use shinon_types::{GameState, GoodId, WorldState};
use shinon_world::find_shortages;

/// Number of shortages at which shortage risk saturates.
const SHORTAGE_RISK_SATURATION: f64 = 4.0;
/// Treasury below which fiscal risk starts to rise.
const FISCAL_COMFORT: f64 = 25_000.0;
/// Inflation (percent per turn) at which inflation risk saturates.
const INFLATION_RISK_SATURATION: f64 = 10.0;

/// Risk scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RiskScores {
    /// Share of the shortage saturation point reached.
    pub shortage: f64,
    /// How far the treasury sits below the comfort level.
    pub fiscal: f64,
    /// Unrest as a fraction of its ceiling.
    pub social: f64,
    /// Positive inflation relative to its saturation point.
    pub inflation: f64,
}

impl RiskScores {
    /// The largest of the social, fiscal and shortage risks.
    pub fn peak(&self) -> f64 {
        self.social.max(self.fiscal).max(self.shortage)
    }
}

/// What the kernel sees in one state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Observations {
    /// Goods in shortage.
    pub shortages: Vec<GoodId>,
    /// Mean price change in percent.
    pub inflation: f64,
    /// Mean absolute price change in percent.
    pub volatility: f64,
    /// Unrest change since the last world seen.
    pub unrest_trend: f64,
    /// Treasury change since the last world seen.
    pub treasury_trend: f64,
    /// Derived risk scores.
    pub risks: RiskScores,
}

/// Build observations for `state`, comparing against `last_world` when the
/// kernel has seen one before.
pub fn observe(
    state: &GameState,
    last_world: Option<&WorldState>,
    shortage_threshold: f64,
) -> Observations {
    let shortages = find_shortages(&state.market, shortage_threshold);

    let deltas: Vec<f64> = state
        .market
        .values()
        .filter(|good| good.last_price > 0.0)
        .map(|good| (good.price - good.last_price) / good.last_price)
        .collect();
    let (inflation, volatility) = if deltas.is_empty() {
        (0.0, 0.0)
    } else {
        let n = deltas.len() as f64;
        (
            deltas.iter().sum::<f64>() / n * 100.0,
            deltas.iter().map(|d| d.abs()).sum::<f64>() / n * 100.0,
        )
    };

    let (unrest_trend, treasury_trend) = last_world.map_or((0.0, 0.0), |prev| {
        (
            state.world.unrest - prev.unrest,
            (state.world.treasury - prev.treasury) as f64,
        )
    });

    let world = &state.world;
    let risks = RiskScores {
        shortage: (shortages.len() as f64 / SHORTAGE_RISK_SATURATION).min(1.0),
        fiscal: ((FISCAL_COMFORT - world.treasury as f64) / FISCAL_COMFORT).clamp(0.0, 1.0),
        social: (world.unrest / 100.0).min(1.0),
        inflation: (inflation.max(0.0) / INFLATION_RISK_SATURATION).min(1.0),
    };

    Observations {
        shortages,
        inflation,
        volatility,
        unrest_trend,
        treasury_trend,
        risks,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use shinon_world::{Catalog, initial_state};

    use super::*;

    fn state() -> GameState {
        initial_state(&Catalog::builtin().unwrap())
    }

    #[test]
    fn fresh_world_has_no_price_movement() {
        let obs = observe(&state(), None, 0.12);
        assert!(obs.inflation.abs() < 1e-9);
        assert!(obs.volatility.abs() < 1e-9);
        assert!(obs.unrest_trend.abs() < 1e-9);
        assert!(obs.risks.fiscal.abs() < 1e-9, "treasury starts above comfort");
    }

    #[test]
    fn price_rise_shows_as_inflation() {
        let mut s = state();
        for good in s.market.values_mut() {
            good.price = good.last_price * 1.05;
        }
        let obs = observe(&s, None, 0.12);
        assert!((obs.inflation - 5.0).abs() < 1e-6);
        assert!((obs.volatility - 5.0).abs() < 1e-6);
        assert!((obs.risks.inflation - 0.5).abs() < 1e-6);
    }

    #[test]
    fn risks_saturate() {
        let mut s = state();
        s.world.treasury = -80_000;
        s.world.unrest = 100.0;
        for good in s.market.values_mut() {
            good.supply = 0.0;
        }
        let obs = observe(&s, None, 0.12);
        assert_eq!(obs.shortages.len(), s.market.len());
        assert!((obs.risks.shortage - 1.0).abs() < f64::EPSILON);
        assert!((obs.risks.fiscal - 1.0).abs() < f64::EPSILON);
        assert!((obs.risks.social - 1.0).abs() < f64::EPSILON);
        assert!((obs.risks.peak() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trends_compare_with_last_world() {
        let s = state();
        let mut prev = s.world.clone();
        prev.unrest -= 2.0;
        prev.treasury += 1000;
        let obs = observe(&s, Some(&prev), 0.12);
        assert!((obs.unrest_trend - 2.0).abs() < 1e-9);
        assert!((obs.treasury_trend + 1000.0).abs() < 1e-9);
    }
}
