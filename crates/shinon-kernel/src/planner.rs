//! Advisor: ranks the policies that are available right now.
//!
//! Each policy has a static gain row giving how much it serves control,
//! growth and survival. A gain may scale with the current shortages, risk
//! scores or inflation. The utility of a policy is the stance-weighted sum
//! of its three gains; the top three available policies are recommended.

use serde::Serialize;
use shinon_core::PolicyStatusRow;
use shinon_types::{IntentKind, Locale, PolicyId, PolicyStatus};

use crate::i18n::{MessageKey, policy_note, render, text};
use crate::sense::Observations;
use crate::stance::StanceState;

/// Number of recommendations in a plan.
pub const RECOMMENDATIONS: usize = 3;

/// A gain that is a linear function of the observations.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Gain {
    base: f64,
    per_shortage: f64,
    per_social: f64,
    per_fiscal: f64,
    per_inflation: f64,
}

impl Gain {
    const fn flat(base: f64) -> Self {
        Self {
            base,
            per_shortage: 0.0,
            per_social: 0.0,
            per_fiscal: 0.0,
            per_inflation: 0.0,
        }
    }

    const fn shortages(per: f64) -> Self {
        Self {
            per_shortage: per,
            ..Self::flat(0.0)
        }
    }

    const fn social(per: f64) -> Self {
        Self {
            per_social: per,
            ..Self::flat(0.0)
        }
    }

    const fn fiscal(per: f64) -> Self {
        Self {
            per_fiscal: per,
            ..Self::flat(0.0)
        }
    }

    fn eval(&self, obs: &Observations) -> f64 {
        let inflation = obs.inflation.max(0.0);
        self.base
            + self.per_shortage * obs.shortages.len() as f64
            + self.per_social * obs.risks.social
            + self.per_fiscal * obs.risks.fiscal
            + self.per_inflation * inflation
    }
}

/// Control, growth and survival gain per policy.
const GAINS: &[(&str, [Gain; 3])] = &[
    ("SECURITY_BUDGET", [Gain::social(2.4), Gain::flat(-0.3), Gain::flat(1.2)]),
    ("RATIONING", [Gain::shortages(1.7), Gain::flat(-0.2), Gain::flat(1.5)]),
    ("TAX_ADJUST", [Gain::fiscal(0.6), Gain::flat(-0.5), Gain::flat(1.0)]),
    ("SUBSIDY_SECTOR", [Gain::shortages(1.2), Gain::flat(1.4), Gain::flat(0.8)]),
    ("FUND_RESEARCH", [Gain::flat(0.2), Gain::flat(1.8), Gain::flat(0.6)]),
    ("BUILD_INFRA", [Gain::shortages(0.8), Gain::flat(1.3), Gain::flat(0.7)]),
    ("WORK_HOURS_REFORM", [Gain::social(1.0), Gain::flat(0.8), Gain::flat(0.5)]),
    (
        "IMPORT_PROGRAM",
        [
            Gain {
                per_inflation: 0.4,
                ..Gain::shortages(1.8)
            },
            Gain::flat(0.3),
            Gain::flat(1.4),
        ],
    ),
    (
        "PRICE_STABILIZER",
        [
            Gain {
                per_inflation: 0.5,
                ..Gain::flat(0.0)
            },
            Gain::flat(0.2),
            Gain::flat(0.9),
        ],
    ),
    ("LOGISTICS_PUSH", [Gain::shortages(0.6), Gain::flat(1.1), Gain::flat(0.6)]),
    ("SOS_CREDIT", [Gain::flat(0.2), Gain::flat(-0.4), Gain::fiscal(2.5)]),
    ("RATIONING_PLUS", [Gain::shortages(2.0), Gain::flat(-0.6), Gain::flat(1.8)]),
];

/// Gain row for policies the advisor has no model of.
const DEFAULT_GAINS: [Gain; 3] = [Gain::flat(0.3), Gain::flat(0.3), Gain::flat(0.3)];

/// Communicative acts a plan performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanAct {
    /// Acknowledge an executed action.
    Confirm,
    /// Report state.
    Inform,
    /// Offer recommendations.
    Recommend,
}

/// What the kernel intends to say next.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    /// Acts, in order.
    pub acts: Vec<PlanAct>,
    /// One-line kernel status.
    pub status_line: String,
    /// Up to three recommended policies, best first.
    pub recommendations: Vec<PolicyId>,
    /// Expected effect of the selected action, or a note that views do not
    /// advance the simulation.
    pub predicted_impact: String,
    /// Suggested next commands.
    pub options: Vec<&'static str>,
}

/// Stance-weighted utility of enacting `policy_id` now.
pub fn policy_utility(policy_id: &str, stance: &StanceState, obs: &Observations) -> f64 {
    let [control, growth, survival] = GAINS
        .iter()
        .find(|(id, _)| *id == policy_id)
        .map_or(DEFAULT_GAINS, |(_, gains)| *gains);
    stance.control * control.eval(obs)
        + stance.growth * growth.eval(obs)
        + stance.survival * survival.eval(obs)
}

/// Available policies ranked by utility, best first. Equal utilities keep
/// the order of `rows`.
pub fn rank(rows: &[PolicyStatusRow], stance: &StanceState, obs: &Observations) -> Vec<(PolicyId, f64)> {
    let mut ranked: Vec<(PolicyId, f64)> = rows
        .iter()
        .filter(|row| row.status == PolicyStatus::Available)
        .map(|row| (row.id.clone(), policy_utility(row.id.as_str(), stance, obs)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Build the plan for one kernel reply.
///
/// `selected` is the policy being enacted when `kind` is
/// [`IntentKind::EnactPolicy`].
pub fn create_plan(
    kind: IntentKind,
    selected: Option<&PolicyId>,
    stance: &StanceState,
    obs: &Observations,
    rows: &[PolicyStatusRow],
    locale: Locale,
) -> Plan {
    let recommendations = rank(rows, stance, obs)
        .into_iter()
        .take(RECOMMENDATIONS)
        .map(|(id, _)| id)
        .collect();

    if kind == IntentKind::EnactPolicy {
        let selected = selected.map_or("UNKNOWN", PolicyId::as_str);
        return Plan {
            acts: vec![PlanAct::Confirm, PlanAct::Inform],
            status_line: render(locale, MessageKey::StatusArmed, &[("policy_id", selected)]),
            recommendations,
            predicted_impact: policy_note(locale, selected).to_owned(),
            options: vec!["dashboard", "market", "policies", "history", "explain prices"],
        };
    }

    Plan {
        acts: vec![PlanAct::Inform, PlanAct::Recommend],
        status_line: text(locale, MessageKey::StatusMonitoring).to_owned(),
        recommendations,
        predicted_impact: text(locale, MessageKey::PredictViewOnly).to_owned(),
        options: vec![
            "dashboard",
            "market",
            "policies",
            "industry",
            "history",
            "explain prices",
            "enact <POLICY_ID> [magnitude] [target]",
        ],
    }
}
