//! Read-only views rendered as plain-text tables.
//!
//! Every function here is pure: it takes data the kernel already loaded
//! and returns the view body. Headers come from the localisation table;
//! column names stay in English in both locales.

use shinon_core::{GoalProgress, IntelHintView, PolicyStatusRow, UnlockStatusRow};
use shinon_types::{GameState, HistoryRecord, Locale, PolicyRuntime};
use shinon_world::{Catalog, find_shortages};

use crate::i18n::{MessageKey, render, text};
use crate::stance::StanceState;

/// Number of history rows the history view shows.
pub const HISTORY_ROWS: usize = 10;

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_owned()
}

/// Render rows under a header line, padding every column to its widest
/// cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");
    let mut out = vec![format_row(headers.iter().copied(), &widths), separator];
    for row in rows {
        out.push(format_row(row.iter().map(String::as_str), &widths));
    }
    out.join("\n")
}

fn price_delta_pct(price: f64, last_price: f64) -> f64 {
    if last_price > 0.0 {
        (price - last_price) / last_price * 100.0
    } else {
        0.0
    }
}

fn none(locale: Locale) -> &'static str {
    text(locale, MessageKey::None)
}

/// World overview.
pub fn dashboard(
    locale: Locale,
    state: &GameState,
    stance: &StanceState,
    collapse_active: bool,
    shortage_threshold: f64,
) -> String {
    let world = &state.world;
    let shortages: Vec<String> = find_shortages(&state.market, shortage_threshold)
        .iter()
        .map(ToString::to_string)
        .collect();

    let mut movers: Vec<(&str, f64)> = state
        .market
        .values()
        .map(|good| (good.id.as_str(), price_delta_pct(good.price, good.last_price)))
        .collect();
    movers.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    let movers: Vec<String> = movers
        .iter()
        .take(3)
        .map(|(good, delta)| format!("{good}:{delta:+.2}%"))
        .collect();

    let active: Vec<String> = state
        .active_policies
        .values()
        .filter(|rt| rt.remaining_ticks > 0)
        .map(|rt: &PolicyRuntime| {
            format!(
                "{} (remaining {}, cooldown {})",
                rt.policy_id, rt.remaining_ticks, rt.cooldown_ticks
            )
        })
        .collect();

    let list = |items: &[String]| {
        if items.is_empty() {
            none(locale).to_owned()
        } else {
            items.join(", ")
        }
    };

    [
        text(locale, MessageKey::ViewDashboard).to_owned(),
        format!(
            "turn={} treasury={} population={}",
            world.turn, world.treasury, world.population
        ),
        format!(
            "prosperity={:.2} stability={:.2} unrest={:.2} tech={:.2}",
            world.prosperity, world.stability, world.unrest, world.tech_level
        ),
        format!("shortages: {}", list(&shortages)),
        format!("top movers: {}", list(&movers)),
        format!("active policies: {}", list(&active)),
        format!(
            "stance mix: control={:.2} growth={:.2} survival={:.2}",
            stance.control, stance.growth, stance.survival
        ),
        text(
            locale,
            if collapse_active {
                MessageKey::CollapseActive
            } else {
                MessageKey::CollapseInactive
            },
        )
        .to_owned(),
    ]
    .join("\n")
}

/// Goods with supply, demand, price and last change.
pub fn market(locale: Locale, state: &GameState) -> String {
    let rows: Vec<Vec<String>> = state
        .market
        .values()
        .map(|good| {
            vec![
                good.id.to_string(),
                format!("{:.2}", good.supply),
                format!("{:.2}", good.demand),
                format!("{:.2}", good.price),
                format!("{:+.2}%", price_delta_pct(good.price, good.last_price)),
            ]
        })
        .collect();
    format!(
        "{}\n{}",
        text(locale, MessageKey::ViewMarket),
        render_table(&["good", "supply", "demand", "price", "delta"], &rows)
    )
}

/// Policy catalog with lifecycle status.
pub fn policies(locale: Locale, rows: &[PolicyStatusRow]) -> String {
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.id.to_string(),
                row.status.to_string(),
                row.remaining_ticks.to_string(),
                row.cooldown_ticks.to_string(),
                row.label.clone(),
            ]
        })
        .collect();
    format!(
        "{}\n{}\n\n{}",
        text(locale, MessageKey::ViewPolicies),
        render_table(&["policy", "status", "rem", "cd", "label"], &table),
        text(locale, MessageKey::EnactSyntax)
    )
}

/// Sector capacity, efficiency and upkeep.
pub fn industry(locale: Locale, state: &GameState) -> String {
    let rows: Vec<Vec<String>> = state
        .sectors
        .values()
        .map(|sector| {
            vec![
                sector.id.to_string(),
                format!("{:.2}", sector.capacity),
                format!("{:.2}", sector.efficiency),
                format!("{:.2}", sector.upkeep),
            ]
        })
        .collect();
    format!(
        "{}\n{}",
        text(locale, MessageKey::ViewIndustry),
        render_table(&["sector", "capacity", "efficiency", "upkeep"], &rows)
    )
}

/// Most recent turns, newest first.
pub fn history(locale: Locale, records: &[HistoryRecord]) -> String {
    let header = text(locale, MessageKey::ViewHistory);
    if records.is_empty() {
        return format!("{header}\n{}", text(locale, MessageKey::HistoryEmpty));
    }
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            let events: Vec<&str> = record.summary.events.iter().map(|e| e.as_str()).collect();
            vec![
                record.turn.to_string(),
                record.action.to_string(),
                record.cost.to_string(),
                format!("{:+.2}%", record.summary.inflation),
                record.summary.net_cashflow.to_string(),
                if events.is_empty() {
                    none(locale).to_owned()
                } else {
                    events.join(",")
                },
            ]
        })
        .collect();
    format!(
        "{header}\n{}",
        render_table(&["turn", "action", "cost", "inflation", "cashflow", "events"], &rows)
    )
}

/// Explanation pages: prices, shortages, one policy, or the topic list.
pub fn explain(locale: Locale, topic: &str, catalog: &Catalog) -> String {
    let header = text(locale, MessageKey::ViewExplain);
    let normalized = topic.trim().to_lowercase();
    match normalized.as_str() {
        "price" | "prices" => format!(
            "{header}\n{}\n{}",
            text(locale, MessageKey::ExplainPrices),
            text(locale, MessageKey::ExplainShortages)
        ),
        "shortage" | "shortages" => {
            format!("{header}\n{}", text(locale, MessageKey::ExplainShortagesDetail))
        }
        other => match other.strip_prefix("policy ") {
            Some(id) => {
                let id = id.trim().to_uppercase();
                match catalog.policy(&id) {
                    Some(policy) => format!(
                        "{header}\n{id}: {}\ncost={} duration={} cooldown={} magnitude=[{}..{} step {}] default={}",
                        policy.description,
                        policy.cost,
                        policy.duration_ticks,
                        policy.cooldown_ticks,
                        policy.magnitude.min,
                        policy.magnitude.max,
                        policy.magnitude.step,
                        policy.magnitude.default,
                    ),
                    None => format!("{header}\n{}", text(locale, MessageKey::ExplainUnknownPolicy)),
                }
            }
            None => format!(
                "{header}\n{}\n{}",
                text(locale, MessageKey::ExplainTopics),
                text(locale, MessageKey::ExplainHint)
            ),
        },
    }
}

/// Unlock rows and the next turn an unlock can land.
pub fn unlocks(locale: Locale, rows: &[UnlockStatusRow], next_unlock_turn: i64) -> String {
    let header = text(locale, MessageKey::UnlockHeader);
    if rows.is_empty() {
        return format!("{header}\n{}", text(locale, MessageKey::UnlockNone));
    }
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.policy_id.to_string(),
                if row.unlocked { "unlocked" } else { "locked" }.to_owned(),
                row.unlocked_turn.map_or_else(|| "-".to_owned(), |t| t.to_string()),
                row.source.clone(),
            ]
        })
        .collect();
    format!(
        "{header}\n{}\n{}: {next_unlock_turn}",
        render_table(&["policy", "status", "turn", "source"], &table),
        text(locale, MessageKey::UnlockNext)
    )
}

/// Soft goal progress.
pub fn goals(locale: Locale, goals: &[GoalProgress]) -> String {
    let header = text(locale, MessageKey::GoalsHeader);
    if goals.is_empty() {
        return format!("{header}\n{}", text(locale, MessageKey::GoalsNone));
    }
    let rows: Vec<Vec<String>> = goals
        .iter()
        .map(|goal| {
            vec![
                goal.id.clone(),
                goal.label.clone(),
                format!("{:.2}", goal.current),
                format!("{} {:.2}", goal.comparison.symbol(), goal.target),
                format!("{:.0}%", goal.progress * 100.0),
                if goal.done { "yes" } else { "no" }.to_owned(),
            ]
        })
        .collect();
    format!(
        "{header}\n{}",
        render_table(&["id", "goal", "current", "target", "progress", "done"], &rows)
    )
}

/// One intel hint, or a note that none applies.
pub fn intel(locale: Locale, hint: Option<&IntelHintView>) -> String {
    let header = text(locale, MessageKey::IntelHeader);
    match hint {
        Some(hint) => format!("{header}\n- {}", hint.text),
        None => format!("{header}\n{}", text(locale, MessageKey::IntelNone)),
    }
}

/// Command overview, with a note about the command that was not understood.
pub fn help(locale: Locale, unknown: Option<&str>) -> String {
    let mut out = format!(
        "{}\n{}",
        text(locale, MessageKey::ViewHelp),
        text(locale, MessageKey::HelpBody)
    );
    if let Some(command) = unknown {
        out.push('\n');
        out.push_str(&render(locale, MessageKey::UnknownCommand, &[("command", command)]));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use shinon_world::initial_state;

    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn table_columns_align() {
        let table = render_table(
            &["a", "long header"],
            &[vec!["wide cell".to_owned(), "x".to_owned()]],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].find("long"), lines[2].find('x'));
        assert!(lines[1].starts_with("---------"));
    }

    #[test]
    fn market_lists_every_good() {
        let catalog = catalog();
        let out = market(Locale::En, &initial_state(&catalog));
        for id in catalog.goods.keys() {
            assert!(out.contains(id.as_str()), "{id}");
        }
        assert!(out.starts_with("== MARKET =="));
    }

    #[test]
    fn dashboard_reports_collapse_flag() {
        let catalog = catalog();
        let state = initial_state(&catalog);
        let calm = dashboard(Locale::En, &state, &StanceState::default(), false, 0.12);
        assert!(calm.contains("collapse: inactive"));
        let crisis = dashboard(Locale::De, &state, &StanceState::default(), true, 0.12);
        assert!(crisis.contains("KOLLAPS AKTIV"));
    }

    #[test]
    fn empty_history_says_so() {
        assert!(history(Locale::En, &[]).contains("No turns played yet."));
    }

    #[test]
    fn explain_topics() {
        let catalog = catalog();
        assert!(explain(Locale::En, "prices", &catalog).contains("demand/supply"));
        assert!(explain(Locale::En, "Shortages", &catalog).contains("shortage threshold"));
        assert!(explain(Locale::En, "policy tax_adjust", &catalog).contains("TAX_ADJUST: "));
        assert!(explain(Locale::En, "policy NOPE", &catalog).contains("Unknown policy"));
        assert!(explain(Locale::En, "general", &catalog).contains("Topics:"));
    }

    #[test]
    fn help_mentions_unknown_command() {
        let out = help(Locale::En, Some("fly to mars"));
        assert!(out.contains("Unknown command: fly to mars"));
        assert!(!help(Locale::En, None).contains("Unknown command"));
    }
}
