//! Intent interpreter: free text in, [`Intent`] out.
//!
//! Recognition runs in a fixed order and the first rule that matches wins:
//!
//! 1. Empty input is a help request.
//! 2. Exact commands (`quit`, `market`, `goals`, ...).
//! 3. `lang <code>` / `language <code>` / `sprache <code>`.
//! 4. `explain [topic]`.
//! 5. `enact|apply <POLICY_ID> [magnitude] [target]`.
//! 6. Soft view match: a view keyword, with or without a display verb.
//! 7. Policy hint: the policy whose keyword stems score highest.
//! 8. Anything else is [`IntentKind::Unknown`].
//!
//! The interpreter is pure. It never touches the catalog or the save; the
//! caller passes the policy target types it needs for rule 7.

use std::collections::BTreeMap;

use serde::Serialize;
use shinon_types::{IntentKind, PolicyId, TargetType, ViewId};

use crate::keywords::{
    ACTION_VERBS, DISPLAY_VERBS, ENACT_WORDS, EXACT_COMMANDS, EXPLAIN_WORD, GOOD_VOCABULARY,
    LANGUAGE_WORDS, SECTOR_VOCABULARY, VIEW_KEYWORDS, lookup, policy_keywords,
};

/// Confidence of a display verb plus a view keyword.
const VIEW_WITH_VERB_CONFIDENCE: f64 = 0.78;
/// Confidence of a bare view keyword.
const VIEW_KEYWORD_CONFIDENCE: f64 = 0.75;
/// Base confidence of a policy keyword hit.
const POLICY_HINT_CONFIDENCE: f64 = 0.6;
/// Bonus when a magnitude number is present.
const MAGNITUDE_BONUS: f64 = 0.25;
/// Bonus when an action verb is present.
const ACTION_VERB_BONUS: f64 = 0.10;
/// Ceiling for inferred policy intents.
const POLICY_HINT_CAP: f64 = 0.95;
/// Confidence at or above which an inferred policy runs without asking.
pub const AUTO_EXECUTE_THRESHOLD: f64 = 0.8;
/// Confidence of the fallback intent.
const UNKNOWN_CONFIDENCE: f64 = 0.2;

/// Reason an explicit enact command is rejected before validation.
pub const MISSING_POLICY_ID: &str = "missing policy_id";
/// Reason a magnitude token is rejected.
pub const MAGNITUDE_NOT_NUMERIC: &str = "magnitude is not numeric";

/// A parameter an inferred intent still needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingParam {
    /// The policy needs a sector or good and none was named.
    Target,
}

/// Typed arguments extracted from the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntentArgs {
    /// Policy to enact, upper-cased.
    pub policy_id: Option<PolicyId>,
    /// Requested magnitude.
    pub magnitude: Option<f64>,
    /// Requested target, lower-cased.
    pub target: Option<String>,
    /// Explain topic.
    pub topic: Option<String>,
    /// Requested language code.
    pub locale: Option<String>,
    /// Why an explicit command is malformed.
    pub invalid: Option<String>,
    /// The view the operator was on, for requests that keep it.
    pub view: Option<ViewId>,
}

/// A recognised operator request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intent {
    /// What was asked for.
    pub kind: IntentKind,
    /// The input exactly as typed.
    pub raw: String,
    /// Extracted arguments.
    pub args: IntentArgs,
    /// Recognition confidence in `[0, 1]`.
    pub confidence: f64,
    /// Whether an enact intent may run without confirmation.
    pub auto_execute: bool,
    /// Parameters an inferred enact intent still lacks.
    pub missing_params: Vec<MissingParam>,
}

impl Intent {
    fn new(kind: IntentKind, raw: &str, confidence: f64) -> Self {
        Self {
            kind,
            raw: raw.to_owned(),
            args: IntentArgs::default(),
            confidence,
            auto_execute: false,
            missing_params: Vec::new(),
        }
    }

    fn with_args(mut self, args: IntentArgs) -> Self {
        self.args = args;
        self
    }
}

/// Interpret one line of operator input.
pub fn parse(
    raw: &str,
    current_view: ViewId,
    policy_target_types: &BTreeMap<PolicyId, TargetType>,
) -> Intent {
    let text = raw.trim();
    if text.is_empty() {
        return Intent::new(IntentKind::Help, raw, 1.0);
    }
    let low = text.to_lowercase();

    if let Some((_, kind)) = EXACT_COMMANDS.iter().find(|(word, _)| *word == low) {
        return Intent::new(*kind, raw, 1.0);
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let first = words.first().map(|w| w.to_lowercase()).unwrap_or_default();

    if LANGUAGE_WORDS.contains(&first.as_str()) {
        let code = words.get(1).map(|w| w.to_lowercase()).unwrap_or_default();
        return Intent::new(IntentKind::LanguageChange, raw, 1.0).with_args(IntentArgs {
            locale: Some(code),
            ..IntentArgs::default()
        });
    }

    if first == EXPLAIN_WORD {
        let topic = text.get(EXPLAIN_WORD.len()..).map(str::trim).unwrap_or_default();
        let topic = if topic.is_empty() { "general" } else { topic };
        return Intent::new(IntentKind::Explain, raw, 1.0).with_args(IntentArgs {
            topic: Some(topic.to_owned()),
            ..IntentArgs::default()
        });
    }

    if ENACT_WORDS.contains(&first.as_str()) {
        return parse_enact(raw, &words);
    }

    let tokens = tokenize(&low);
    let best_policy = best_policy_match(&tokens, policy_target_types);

    if let Some(kind) = tokens
        .iter()
        .find_map(|t| VIEW_KEYWORDS.iter().find(|(word, _)| *word == t.as_str()).map(|(_, k)| *k))
    {
        let has_display_verb = tokens.iter().any(|t| DISPLAY_VERBS.contains(&t.as_str()));
        if has_display_verb {
            return Intent::new(kind, raw, VIEW_WITH_VERB_CONFIDENCE);
        }
        if best_policy.is_none() {
            return Intent::new(kind, raw, VIEW_KEYWORD_CONFIDENCE);
        }
    }

    if let Some((policy_id, target_type)) = best_policy {
        return infer_enact(raw, &tokens, policy_id, target_type);
    }

    Intent::new(IntentKind::Unknown, raw, UNKNOWN_CONFIDENCE).with_args(IntentArgs {
        view: Some(current_view),
        ..IntentArgs::default()
    })
}

fn parse_enact(raw: &str, words: &[&str]) -> Intent {
    let mut intent = Intent::new(IntentKind::EnactPolicy, raw, 1.0);
    intent.auto_execute = true;

    let Some(policy) = words.get(1) else {
        intent.args.invalid = Some(MISSING_POLICY_ID.to_owned());
        return intent;
    };
    intent.args.policy_id = Some(PolicyId::new(policy.to_uppercase()));

    if let Some(token) = words.get(2) {
        match parse_magnitude(token) {
            Some(value) => intent.args.magnitude = Some(value),
            None => {
                intent.args.invalid = Some(MAGNITUDE_NOT_NUMERIC.to_owned());
                return intent;
            }
        }
    }
    intent.args.target = words.get(3).map(|t| t.to_lowercase());
    intent
}

fn infer_enact(raw: &str, tokens: &[String], policy_id: &PolicyId, target_type: TargetType) -> Intent {
    let magnitude = tokens.iter().find_map(|t| parse_magnitude(t));
    let has_action_verb = tokens.iter().any(|t| ACTION_VERBS.contains(&t.as_str()));

    let mut confidence = POLICY_HINT_CONFIDENCE;
    if magnitude.is_some() {
        confidence += MAGNITUDE_BONUS;
    }
    if has_action_verb {
        confidence += ACTION_VERB_BONUS;
    }
    let confidence = confidence.min(POLICY_HINT_CAP);

    let vocabulary = match target_type {
        TargetType::None => None,
        TargetType::Sector => Some(SECTOR_VOCABULARY),
        TargetType::Good => Some(GOOD_VOCABULARY),
    };
    let target = vocabulary.and_then(|table| tokens.iter().find_map(|t| lookup(table, t)));

    let mut intent = Intent::new(IntentKind::EnactPolicy, raw, confidence);
    if vocabulary.is_some() && target.is_none() {
        intent.missing_params.push(MissingParam::Target);
    }
    intent.auto_execute = confidence >= AUTO_EXECUTE_THRESHOLD && intent.missing_params.is_empty();
    intent.args = IntentArgs {
        policy_id: Some(policy_id.clone()),
        magnitude,
        target: target.map(str::to_owned),
        ..IntentArgs::default()
    };
    intent
}

/// The policy whose keyword stems cover the most characters of the input.
///
/// Ties go to the lowest policy id, the map's iteration order.
fn best_policy_match<'a>(
    tokens: &[String],
    policy_target_types: &'a BTreeMap<PolicyId, TargetType>,
) -> Option<(&'a PolicyId, TargetType)> {
    let mut best: Option<(&PolicyId, TargetType, usize)> = None;
    for (policy_id, target_type) in policy_target_types {
        let score: usize = policy_keywords(policy_id.as_str())
            .iter()
            .filter(|kw| tokens.iter().any(|t| t.starts_with(**kw)))
            .map(|kw| kw.len())
            .sum();
        if score > 0 && best.is_none_or(|(_, _, top)| score > top) {
            best = Some((policy_id, *target_type, score));
        }
    }
    best.map(|(id, target_type, _)| (id, target_type))
}

/// Lower-case words with surrounding punctuation stripped.
fn tokenize(low: &str) -> Vec<String> {
    low.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '!' | '?' | '(' | ')' | '"' | '\''))
                .trim_end_matches('.')
                .to_owned()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// A finite number, or `N%` read as `N / 100`.
fn parse_magnitude(token: &str) -> Option<f64> {
    let value = match token.strip_suffix('%') {
        Some(number) => number.parse::<f64>().ok()? / 100.0,
        None => token.parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn targets() -> BTreeMap<PolicyId, TargetType> {
        [
            ("BUILD_INFRA", TargetType::Sector),
            ("FUND_RESEARCH", TargetType::None),
            ("IMPORT_PROGRAM", TargetType::Good),
            ("PRICE_STABILIZER", TargetType::Good),
            ("RATIONING", TargetType::None),
            ("RATIONING_PLUS", TargetType::None),
            ("SUBSIDY_SECTOR", TargetType::Sector),
            ("TAX_ADJUST", TargetType::None),
        ]
        .into_iter()
        .map(|(id, t)| (PolicyId::new(id), t))
        .collect()
    }

    fn run(raw: &str) -> Intent {
        parse(raw, ViewId::Dashboard, &targets())
    }

    #[test]
    fn empty_input_is_help() {
        let intent = run("   ");
        assert_eq!(intent.kind, IntentKind::Help);
        assert!((intent.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn exact_commands_ignore_case_and_padding() {
        assert_eq!(run("  QUIT ").kind, IntentKind::Quit);
        assert_eq!(run("?").kind, IntentKind::Help);
        assert_eq!(run("d").kind, IntentKind::ViewDashboard);
        assert_eq!(run("Hist").kind, IntentKind::ViewHistory);
        assert_eq!(run("unlock list").kind, IntentKind::UnlockList);
        assert_eq!(run("show goals").kind, IntentKind::ShowGoals);
        assert_eq!(run("intel").kind, IntentKind::Intel);
        assert!(!run("market").auto_execute);
    }

    #[test]
    fn language_change_carries_code() {
        let intent = run("sprache DE");
        assert_eq!(intent.kind, IntentKind::LanguageChange);
        assert_eq!(intent.args.locale.as_deref(), Some("de"));
        assert_eq!(run("lang").args.locale.as_deref(), Some(""));
    }

    #[test]
    fn explain_defaults_to_general() {
        assert_eq!(run("explain").args.topic.as_deref(), Some("general"));
        assert_eq!(run("explain policy TAX_ADJUST").args.topic.as_deref(), Some("policy TAX_ADJUST"));
    }

    #[test]
    fn explicit_enact_normalises_case() {
        let intent = run("enact import_program 10 GRAIN");
        assert_eq!(intent.kind, IntentKind::EnactPolicy);
        assert!(intent.auto_execute);
        assert_eq!(intent.args.policy_id, Some(PolicyId::new("IMPORT_PROGRAM")));
        assert_eq!(intent.args.magnitude, Some(10.0));
        assert_eq!(intent.args.target.as_deref(), Some("grain"));
        assert!(intent.args.invalid.is_none());
    }

    #[test]
    fn explicit_enact_flags_malformed_input() {
        assert_eq!(run("enact").args.invalid.as_deref(), Some(MISSING_POLICY_ID));
        let bad = run("apply TAX_ADJUST lots");
        assert_eq!(bad.args.invalid.as_deref(), Some(MAGNITUDE_NOT_NUMERIC));
        assert_eq!(bad.args.policy_id, Some(PolicyId::new("TAX_ADJUST")));
        assert_eq!(run("enact TAX_ADJUST NaN").args.invalid.as_deref(), Some(MAGNITUDE_NOT_NUMERIC));
        assert_eq!(run("enact TAX_ADJUST inf").args.invalid.as_deref(), Some(MAGNITUDE_NOT_NUMERIC));
    }

    #[test]
    fn display_verb_with_view_keyword() {
        let intent = run("show me the prices");
        assert_eq!(intent.kind, IntentKind::ViewMarket);
        assert!((intent.confidence - 0.78).abs() < 1e-9);
    }

    #[test]
    fn bare_view_keyword_without_policy_words() {
        let intent = run("how are the sectors doing");
        assert_eq!(intent.kind, IntentKind::ViewIndustry);
        assert!((intent.confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn policy_words_beat_bare_view_keyword() {
        let intent = run("subsidize industry");
        assert_eq!(intent.kind, IntentKind::EnactPolicy);
        assert_eq!(intent.args.policy_id, Some(PolicyId::new("SUBSIDY_SECTOR")));
        assert_eq!(intent.args.target.as_deref(), Some("industry"));
    }

    #[test]
    fn policy_hint_confidence_and_auto_execute() {
        let vague = run("what about taxes");
        assert_eq!(vague.args.policy_id, Some(PolicyId::new("TAX_ADJUST")));
        assert!((vague.confidence - 0.6).abs() < 1e-9);
        assert!(!vague.auto_execute);

        let verb = run("raise taxes");
        assert!((verb.confidence - 0.7).abs() < 1e-9);
        assert!(!verb.auto_execute);

        let full = run("raise taxes by 5%");
        assert!((full.confidence - 0.95).abs() < 1e-9);
        assert!(full.auto_execute);
        assert!((full.args.magnitude.unwrap() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn required_target_reported_missing() {
        let intent = run("import 10 units");
        assert_eq!(intent.args.policy_id, Some(PolicyId::new("IMPORT_PROGRAM")));
        assert_eq!(intent.missing_params, vec![MissingParam::Target]);
        assert!(!intent.auto_execute);

        let resolved = run("import 10 wheat");
        assert_eq!(resolved.args.target.as_deref(), Some("grain"));
        assert!(resolved.auto_execute);
    }

    #[test]
    fn highest_keyword_score_wins() {
        assert_eq!(run("strict emergency rationing").args.policy_id, Some(PolicyId::new("RATIONING_PLUS")));
    }

    #[test]
    fn keyword_ties_go_to_lowest_policy_id() {
        // "ration" scores the same for both rationing policies.
        assert_eq!(run("ration food").args.policy_id, Some(PolicyId::new("RATIONING")));

        let tokens = vec!["ration".to_owned()];
        let mut reversed = targets();
        reversed.remove(&PolicyId::new("RATIONING"));
        let (id, _) = best_policy_match(&tokens, &reversed).unwrap();
        assert_eq!(id.as_str(), "RATIONING_PLUS");
    }

    #[test]
    fn policies_outside_the_map_are_ignored() {
        let intent = parse("bailout loan", ViewId::Market, &targets());
        assert_eq!(intent.kind, IntentKind::Unknown);
        assert!((intent.confidence - 0.2).abs() < 1e-9);
        assert_eq!(intent.args.view, Some(ViewId::Market));
    }

    #[test]
    fn magnitude_parsing() {
        assert_eq!(parse_magnitude("1.5"), Some(1.5));
        assert_eq!(parse_magnitude("-3"), Some(-3.0));
        assert!((parse_magnitude("12%").unwrap() - 0.12).abs() < 1e-12);
        assert_eq!(parse_magnitude("abc"), None);
        assert_eq!(parse_magnitude("infinity"), None);
    }
}
