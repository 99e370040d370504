//! Enumeration types shared across the Shinon workspace.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Policy classification
// ---------------------------------------------------------------------------

/// What kind of target a policy expects when it is enacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    /// The policy applies nation-wide and ignores any target.
    #[default]
    None,
    /// The policy needs a sector id (e.g. `industry`).
    Sector,
    /// The policy needs a good id (e.g. `grain`).
    Good,
}

/// Access tier of a policy.
///
/// Standard policies are gated on the unlock set; emergency policies are
/// only offered while the collapse flag is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyTier {
    /// Unlocked through the start loadout or the unlock ramp.
    #[default]
    Standard,
    /// Available only during a fiscal collapse.
    Emergency,
}

/// Lifecycle position of a policy for the current game state.
///
/// `Locked -> Available -> Active -> Cooldown -> Available`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    /// Not yet unlocked (or an emergency policy outside a collapse).
    Locked,
    /// May be enacted this turn.
    Available,
    /// Effects are being applied each turn.
    Active,
    /// Effects ended; waiting before the policy can be enacted again.
    Cooldown,
}

impl PolicyStatus {
    /// Lower-case label used in tables and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Available => "available",
            Self::Active => "active",
            Self::Cooldown => "cooldown",
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Console surface
// ---------------------------------------------------------------------------

/// The view the console is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewId {
    /// World overview.
    #[default]
    Dashboard,
    /// Goods, prices and supply/demand.
    Market,
    /// Policy catalog with status and cost.
    Policies,
    /// Sector capacity and efficiency.
    Industry,
    /// Recent turn history.
    History,
    /// Explanation pages.
    Explain,
    /// Unlock progress.
    Unlocks,
    /// Soft goal progress.
    Goals,
    /// Intel hint.
    Intel,
    /// Command help.
    Help,
}

impl ViewId {
    /// Stable lower-case identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Market => "market",
            Self::Policies => "policies",
            Self::Industry => "industry",
            Self::History => "history",
            Self::Explain => "explain",
            Self::Unlocks => "unlocks",
            Self::Goals => "goals",
            Self::Intel => "intel",
            Self::Help => "help",
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the operator asked for, as recognised by the intent interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// Leave the console.
    Quit,
    /// Show command help.
    Help,
    /// Show the dashboard.
    ViewDashboard,
    /// Show the market table.
    ViewMarket,
    /// Show the policy table.
    ViewPolicies,
    /// Show the sector table.
    ViewIndustry,
    /// Show recent turns.
    ViewHistory,
    /// Show unlock progress.
    UnlockList,
    /// Show soft goal progress.
    ShowGoals,
    /// Show an intel hint.
    Intel,
    /// Switch narration language.
    LanguageChange,
    /// Explain a topic.
    Explain,
    /// Enact a policy and advance one turn.
    EnactPolicy,
    /// Nothing recognised.
    Unknown,
}

impl IntentKind {
    /// Stable lower-case identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::Help => "help",
            Self::ViewDashboard => "view_dashboard",
            Self::ViewMarket => "view_market",
            Self::ViewPolicies => "view_policies",
            Self::ViewIndustry => "view_industry",
            Self::ViewHistory => "view_history",
            Self::UnlockList => "unlock_list",
            Self::ShowGoals => "show_goals",
            Self::Intel => "intel",
            Self::LanguageChange => "language_change",
            Self::Explain => "explain",
            Self::EnactPolicy => "enact_policy",
            Self::Unknown => "unknown",
        }
    }

    /// The view this intent renders, if it is a read-only request.
    pub const fn view(self) -> Option<ViewId> {
        match self {
            Self::Help | Self::Unknown => Some(ViewId::Help),
            Self::ViewDashboard => Some(ViewId::Dashboard),
            Self::ViewMarket => Some(ViewId::Market),
            Self::ViewPolicies => Some(ViewId::Policies),
            Self::ViewIndustry => Some(ViewId::Industry),
            Self::ViewHistory => Some(ViewId::History),
            Self::UnlockList => Some(ViewId::Unlocks),
            Self::ShowGoals => Some(ViewId::Goals),
            Self::Intel => Some(ViewId::Intel),
            Self::Explain => Some(ViewId::Explain),
            Self::Quit | Self::LanguageChange | Self::EnactPolicy => None,
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported narration languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// German.
    De,
}

impl Locale {
    /// Two-letter language code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a language code is not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLocale(pub String);

impl fmt::Display for UnknownLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported language code: {}", self.0)
    }
}

impl std::error::Error for UnknownLocale {}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "de" => Ok(Self::De),
            other => Err(UnknownLocale(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_parses_case_insensitively() {
        assert_eq!("DE".parse::<Locale>(), Ok(Locale::De));
        assert_eq!(" en ".parse::<Locale>(), Ok(Locale::En));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn read_only_intents_map_to_views() {
        assert_eq!(IntentKind::ViewMarket.view(), Some(ViewId::Market));
        assert_eq!(IntentKind::Unknown.view(), Some(ViewId::Help));
        assert_eq!(IntentKind::EnactPolicy.view(), None);
        assert_eq!(IntentKind::LanguageChange.view(), None);
    }

    #[test]
    fn target_type_uses_snake_case() {
        let json = serde_json::to_string(&TargetType::Sector).ok();
        assert_eq!(json.as_deref(), Some("\"sector\""));
    }
}
