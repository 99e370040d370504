//! Derived market metrics: shortages, inflation, volatility, top movers.

use shinon_types::{GoodId, PriceMove};

use crate::economy::Market;

/// Number of top price movers reported.
pub const TOP_MOVERS: usize = 3;

/// Metrics derived by diffing two market snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketMetrics {
    /// Goods whose supply falls short of demand.
    pub shortages: Vec<GoodId>,
    /// Mean relative price change, in percent.
    pub inflation: f64,
    /// Mean absolute relative price change, in percent.
    pub volatility: f64,
    /// Up to [`TOP_MOVERS`] largest moves by magnitude.
    pub top_movers: Vec<PriceMove>,
}

/// Goods with `supply < demand * (1 - threshold)`, in id order.
pub fn find_shortages(market: &Market, threshold: f64) -> Vec<GoodId> {
    market
        .values()
        .filter(|good| good.supply < good.demand * (1.0 - threshold))
        .map(|good| good.id.clone())
        .collect()
}

/// Compare `after` against `before` prices.
///
/// Goods missing from `before` or with a non-positive previous price count
/// as unchanged.
pub fn compute_metrics(before: &Market, after: &Market, threshold: f64) -> MarketMetrics {
    // Goods without a positive previous price have no relative change.
    let deltas: Vec<(GoodId, f64)> = after
        .values()
        .filter_map(|good| {
            let prev = before.get(&good.id).filter(|prev| prev.price > 0.0)?;
            Some((good.id.clone(), (good.price - prev.price) / prev.price))
        })
        .collect();

    let (inflation, volatility) = if deltas.is_empty() {
        (0.0, 0.0)
    } else {
        let count = deltas.len() as f64;
        (
            deltas.iter().map(|(_, d)| d).sum::<f64>() / count * 100.0,
            deltas.iter().map(|(_, d)| d.abs()).sum::<f64>() / count * 100.0,
        )
    };

    let mut movers = deltas;
    // Stable sort keeps id order among equal magnitudes.
    movers.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    let top_movers = movers
        .into_iter()
        .take(TOP_MOVERS)
        .map(|(good, delta)| PriceMove {
            good,
            delta_pct: delta * 100.0,
        })
        .collect();

    MarketMetrics {
        shortages: find_shortages(after, threshold),
        inflation,
        volatility,
        top_movers,
    }
}
