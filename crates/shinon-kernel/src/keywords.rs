//! Static vocabulary for the intent interpreter.
//!
//! Every table here is plain data. The interpreter lower-cases and
//! tokenises the operator's text, then looks tokens up in these tables.
//! Policy keywords are stems: a keyword matches any token that starts with
//! it, so `subsid` covers `subsidy`, `subsidize` and `subsidise`.

use shinon_types::IntentKind;

/// Exact commands, compared against the whole trimmed, lower-cased input.
pub const EXACT_COMMANDS: &[(&str, IntentKind)] = &[
    ("quit", IntentKind::Quit),
    ("exit", IntentKind::Quit),
    ("q", IntentKind::Quit),
    ("h", IntentKind::Help),
    ("help", IntentKind::Help),
    ("?", IntentKind::Help),
    ("dashboard", IntentKind::ViewDashboard),
    ("dash", IntentKind::ViewDashboard),
    ("d", IntentKind::ViewDashboard),
    ("market", IntentKind::ViewMarket),
    ("m", IntentKind::ViewMarket),
    ("policies", IntentKind::ViewPolicies),
    ("policy", IntentKind::ViewPolicies),
    ("p", IntentKind::ViewPolicies),
    ("industry", IntentKind::ViewIndustry),
    ("i", IntentKind::ViewIndustry),
    ("history", IntentKind::ViewHistory),
    ("hist", IntentKind::ViewHistory),
    ("unlocks", IntentKind::UnlockList),
    ("unlock list", IntentKind::UnlockList),
    ("goals", IntentKind::ShowGoals),
    ("show goals", IntentKind::ShowGoals),
    ("intel", IntentKind::Intel),
];

/// First words that introduce a language change.
pub const LANGUAGE_WORDS: &[&str] = &["lang", "language", "sprache"];

/// First word of an explain request.
pub const EXPLAIN_WORD: &str = "explain";

/// First words of an explicit enact command.
pub const ENACT_WORDS: &[&str] = &["enact", "apply"];

/// Verbs that ask for something to be displayed.
pub const DISPLAY_VERBS: &[&str] = &[
    "show", "display", "view", "open", "list", "see", "check", "zeige", "zeig", "anzeigen",
];

/// Verbs that ask for something to be done.
pub const ACTION_VERBS: &[&str] = &[
    "enact", "apply", "raise", "increase", "lower", "cut", "reduce", "fund", "build", "launch",
    "start", "impose", "boost", "deploy", "order", "import", "subsidize", "subsidise", "expand",
    "release", "erhoehe", "senke",
];

/// Tokens that point at a read-only view when no policy is mentioned.
pub const VIEW_KEYWORDS: &[(&str, IntentKind)] = &[
    ("dashboard", IntentKind::ViewDashboard),
    ("overview", IntentKind::ViewDashboard),
    ("status", IntentKind::ViewDashboard),
    ("market", IntentKind::ViewMarket),
    ("markets", IntentKind::ViewMarket),
    ("prices", IntentKind::ViewMarket),
    ("goods", IntentKind::ViewMarket),
    ("policies", IntentKind::ViewPolicies),
    ("options", IntentKind::ViewPolicies),
    ("industry", IntentKind::ViewIndustry),
    ("sectors", IntentKind::ViewIndustry),
    ("production", IntentKind::ViewIndustry),
    ("history", IntentKind::ViewHistory),
    ("unlocks", IntentKind::UnlockList),
    ("goals", IntentKind::ShowGoals),
    ("intel", IntentKind::Intel),
];

/// Keyword stems per policy id.
pub const POLICY_KEYWORDS: &[(&str, &[&str])] = &[
    ("TAX_ADJUST", &["tax", "revenue", "steuer"]),
    ("SUBSIDY_SECTOR", &["subsid", "support", "grant"]),
    ("IMPORT_PROGRAM", &["import", "shipment", "purchase"]),
    ("FUND_RESEARCH", &["research", "science", "universit", "innovat", "forschung"]),
    ("SECURITY_BUDGET", &["security", "police", "policing", "crackdown"]),
    ("RATIONING", &["ration"]),
    ("RATIONING_PLUS", &["ration", "emergency", "strict"]),
    ("WORK_HOURS_REFORM", &["hours", "workweek", "labor", "labour", "arbeitszeit"]),
    ("BUILD_INFRA", &["infra", "construct", "roads", "plants"]),
    ("PRICE_STABILIZER", &["stabiliz", "stabilis", "price", "reserve"]),
    ("LOGISTICS_PUSH", &["logistic", "freight", "transport", "warehous"]),
    ("SOS_CREDIT", &["credit", "loan", "bailout", "sos"]),
];

/// Sector vocabulary: alias to sector id.
pub const SECTOR_VOCABULARY: &[(&str, &str)] = &[
    ("agriculture", "agriculture"),
    ("farming", "agriculture"),
    ("farms", "agriculture"),
    ("farm", "agriculture"),
    ("landwirtschaft", "agriculture"),
    ("industry", "industry"),
    ("factories", "industry"),
    ("factory", "industry"),
    ("manufacturing", "industry"),
    ("industrie", "industry"),
    ("services", "services"),
    ("service", "services"),
];

/// Good vocabulary: alias to good id.
pub const GOOD_VOCABULARY: &[(&str, &str)] = &[
    ("grain", "grain"),
    ("wheat", "grain"),
    ("food", "grain"),
    ("timber", "timber"),
    ("wood", "timber"),
    ("lumber", "timber"),
    ("ore", "ore"),
    ("steel", "steel"),
    ("energy", "energy"),
    ("power", "energy"),
    ("electricity", "energy"),
    ("tools", "tools"),
    ("textiles", "textiles"),
    ("cloth", "textiles"),
    ("clothing", "textiles"),
    ("medicine", "medicine"),
    ("medicines", "medicine"),
    ("drugs", "medicine"),
];

/// Keyword stems for `policy_id`, or an empty slice for unknown ids.
pub fn policy_keywords(policy_id: &str) -> &'static [&'static str] {
    POLICY_KEYWORDS
        .iter()
        .find(|(id, _)| *id == policy_id)
        .map(|(_, words)| *words)
        .unwrap_or_default()
}

/// Resolve a token through a vocabulary table.
pub fn lookup<'a>(table: &'a [(&'a str, &'a str)], token: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, id)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_commands_are_lower_case() {
        for (word, _) in EXACT_COMMANDS {
            assert_eq!(*word, word.to_lowercase());
        }
    }

    #[test]
    fn vocabulary_ids_are_catalog_ids() {
        let sectors = ["agriculture", "industry", "services"];
        for (_, id) in SECTOR_VOCABULARY {
            assert!(sectors.contains(id), "{id}");
        }
        let goods = [
            "grain", "timber", "ore", "steel", "energy", "tools", "textiles", "medicine",
        ];
        for (_, id) in GOOD_VOCABULARY {
            assert!(goods.contains(id), "{id}");
        }
    }

    #[test]
    fn unknown_policy_has_no_keywords() {
        assert!(policy_keywords("NOPE").is_empty());
        assert!(!policy_keywords("TAX_ADJUST").is_empty());
    }

    #[test]
    fn lookup_resolves_aliases() {
        assert_eq!(lookup(GOOD_VOCABULARY, "wheat"), Some("grain"));
        assert_eq!(lookup(SECTOR_VOCABULARY, "factories"), Some("industry"));
        assert_eq!(lookup(GOOD_VOCABULARY, "gold"), None);
    }
}
