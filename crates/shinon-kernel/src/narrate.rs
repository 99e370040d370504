//! Narration for executed turns and view headers.

use shinon_core::TurnReport;
use shinon_types::{Locale, WorldState};
use shinon_world::{RngStream, pick_index};

use crate::i18n::{MessageKey, phrase, text};
use crate::planner::Plan;
use crate::stance::{StanceMode, StanceState};

/// Comment lines available per stance mode.
const PHRASES_PER_MODE: usize = 3;

/// Pick the comment line for a turn. The choice is keyed by seed, turn and
/// stance mode, so replays narrate identically.
pub fn pick_phrase(locale: Locale, seed: u64, turn: u64, mode: StanceMode) -> &'static str {
    let index = pick_index(seed, RngStream::Phrase, turn, mode.as_str(), PHRASES_PER_MODE).unwrap_or(0);
    phrase(locale, mode, index)
}

/// The `delta:` line summarising treasury, unrest and prices.
pub fn delta_line(report: &TurnReport) -> String {
    format!(
        "delta: treasury {} -> {} | unrest {:.2} -> {:.2} | inflation {:+.2}% | volatility {:.2}%",
        report.world_before.treasury,
        report.world_after.treasury,
        report.world_before.unrest,
        report.world_after.unrest,
        report.metrics.inflation,
        report.metrics.volatility,
    )
}

fn join_or_none<I>(locale: Locale, items: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let joined: Vec<String> = items.into_iter().map(|s| s.as_ref().to_owned()).collect();
    if joined.is_empty() {
        text(locale, MessageKey::None).to_owned()
    } else {
        joined.join(", ")
    }
}

fn recommendations_line(locale: Locale, plan: &Plan) -> String {
    format!(
        "{}: {}",
        text(locale, MessageKey::AdvisorLabel),
        join_or_none(locale, plan.recommendations.iter().map(|id| id.as_str()))
    )
}

/// Report for a turn that advanced.
pub fn render_action_report(
    locale: Locale,
    seed: u64,
    report: &TurnReport,
    plan: &Plan,
    stance: &StanceState,
) -> String {
    let mode = stance.dominant();
    let turn = report.world_after.turn;
    let movers = join_or_none(
        locale,
        report
            .metrics
            .top_movers
            .iter()
            .map(|m| format!("{}:{:+.2}%", m.good, m.delta_pct)),
    );
    let shortages = join_or_none(locale, report.metrics.shortages.iter().map(|g| g.as_str()));
    let events = join_or_none(locale, report.events.iter().map(|e| e.id.as_str()));

    [
        text(locale, MessageKey::KernelOnline).to_owned(),
        format!(
            "status: ACTION turn={turn} stance={mode} urgency={:.2} confidence={:.2}",
            stance.urgency, stance.confidence
        ),
        delta_line(report),
        format!(
            "delta: shortages={} ({shortages}) | top movers {movers}",
            report.metrics.shortages.len()
        ),
        format!("events: {events}"),
        format!("comment: {}", pick_phrase(locale, seed, turn, mode)),
        format!("impact: {}", plan.predicted_impact),
        recommendations_line(locale, plan),
    ]
    .join("\n")
}

/// Header shown above every read-only view.
pub fn render_view_header(locale: Locale, world: &WorldState, stance: &StanceState, plan: &Plan) -> String {
    format!(
        "{}\nstatus: VIEW turn={} stance={} urgency={:.2} confidence={:.2}\nkernel: {}",
        text(locale, MessageKey::KernelOnline),
        world.turn,
        stance.dominant(),
        stance.urgency,
        stance.confidence,
        plan.status_line,
    )
}

/// Footer shown below every read-only view.
pub fn render_view_footer(locale: Locale, plan: &Plan) -> String {
    format!(
        "{}\n{}: {}",
        recommendations_line(locale, plan),
        text(locale, MessageKey::NextLabel),
        plan.options.join(", ")
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn phrase_is_stable_per_key() {
        let a = pick_phrase(Locale::En, 5, 3, StanceMode::Growth);
        let b = pick_phrase(Locale::En, 5, 3, StanceMode::Growth);
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn phrase_follows_locale() {
        let en = pick_phrase(Locale::En, 5, 3, StanceMode::Survival);
        let de = pick_phrase(Locale::De, 5, 3, StanceMode::Survival);
        assert_ne!(en, de);
    }

    #[test]
    fn empty_lists_render_as_none() {
        assert_eq!(join_or_none(Locale::En, Vec::<String>::new()), "none");
        assert_eq!(join_or_none(Locale::De, ["a", "b"]), "a, b");
    }
}
