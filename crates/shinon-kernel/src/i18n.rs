//! English and German console strings.
//!
//! Strings are looked up by [`MessageKey`] for an explicit [`Locale`];
//! there is no process-wide language setting. Templates use `{name}`
//! placeholders filled by [`render`].

use shinon_types::Locale;

use crate::stance::StanceMode;

/// Every translatable console string. Variant names follow the text.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    KernelOnline,
    None,
    AdvisorLabel,
    NextLabel,
    FollowUp,
    ShutdownAck,
    ViewDashboard,
    ViewMarket,
    ViewPolicies,
    ViewIndustry,
    ViewHistory,
    ViewExplain,
    ViewHelp,
    HelpBody,
    HistoryEmpty,
    EnactSyntax,
    ExplainPrices,
    ExplainShortages,
    ExplainShortagesDetail,
    ExplainUnknownPolicy,
    ExplainTopics,
    ExplainHint,
    UnlockHeader,
    UnlockNone,
    UnlockNext,
    GoalsHeader,
    GoalsNone,
    IntelHeader,
    IntelNone,
    AutoIntelPrefix,
    CollapseActive,
    CollapseInactive,
    LanguageChanged,
    LanguageInvalid,
    MissingTarget,
    IntentAmbiguous,
    UnknownCommand,
    StatusArmed,
    StatusMonitoring,
    PredictViewOnly,
    InternalError,
}

/// Look up the template for `key`.
#[allow(clippy::too_many_lines)]
pub const fn text(locale: Locale, key: MessageKey) -> &'static str {
    use MessageKey as K;
    match locale {
        Locale::En => match key {
            K::KernelOnline => "SHINON KERNEL ONLINE",
            K::None => "none",
            K::AdvisorLabel => "advisor",
            K::NextLabel => "next",
            K::FollowUp => "Awaiting your next directive.",
            K::ShutdownAck => "Kernel shutting down. State is saved.",
            K::ViewDashboard => "== DASHBOARD ==",
            K::ViewMarket => "== MARKET ==",
            K::ViewPolicies => "== POLICIES ==",
            K::ViewIndustry => "== INDUSTRY ==",
            K::ViewHistory => "== HISTORY ==",
            K::ViewExplain => "== EXPLAIN ==",
            K::ViewHelp => "== HELP ==",
            K::HelpBody => concat!(
                "views: dashboard | market | policies | industry | history | unlocks | goals | intel\n",
                "act:   enact <POLICY_ID> [magnitude] [target]\n",
                "info:  explain [prices | shortages | policy <ID>]\n",
                "lang:  lang <en|de>\n",
                "quit:  quit\n",
                "Plain sentences work too, e.g. \"import 10 grain\" or \"show prices\"."
            ),
            K::HistoryEmpty => "No turns played yet.",
            K::EnactSyntax => "Syntax: enact <POLICY_ID> [magnitude] [target]",
            K::ExplainPrices => {
                "Prices follow the demand/supply ratio each turn, damped toward the previous price and kept inside each good's band."
            }
            K::ExplainShortages => "A shortage raises unrest and erodes prosperity every turn it lasts.",
            K::ExplainShortagesDetail => {
                "A good is short when supply falls below demand by more than the shortage threshold. Imports, subsidies and rationing all help."
            }
            K::ExplainUnknownPolicy => "Unknown policy. Type 'policies' for the list.",
            K::ExplainTopics => "Topics: prices, shortages, policy <ID>",
            K::ExplainHint => "Example: explain policy TAX_ADJUST",
            K::UnlockHeader => "== UNLOCKS ==",
            K::UnlockNone => "No unlock rules.",
            K::UnlockNext => "next unlock possible from turn",
            K::GoalsHeader => "== GOALS ==",
            K::GoalsNone => "No goals defined.",
            K::IntelHeader => "== INTEL ==",
            K::IntelNone => "No intel at the moment.",
            K::AutoIntelPrefix => "intel",
            K::CollapseActive => "COLLAPSE ACTIVE: emergency policies unlocked",
            K::CollapseInactive => "collapse: inactive",
            K::LanguageChanged => "Language set to {code}.",
            K::LanguageInvalid => "INVALID PARAM unsupported language '{code}' (use en or de)",
            K::MissingTarget => "{policy_id} needs a target. Try: enact {policy_id} <magnitude> <target>",
            K::IntentAmbiguous => {
                "Did you mean {policy_id}? Confirm with: enact {policy_id} [magnitude] [target]"
            }
            K::UnknownCommand => "Unknown command: {command}",
            K::StatusArmed => "Action pipeline armed for {policy_id}",
            K::StatusMonitoring => "Kernel monitoring mode; no turn advancement.",
            K::PredictViewOnly => "No simulation advance on view commands.",
            K::InternalError => "INTERNAL ERROR state could not be read",
        },
        Locale::De => match key {
            K::KernelOnline => "SHINON KERNEL ONLINE",
            K::None => "keine",
            K::AdvisorLabel => "Berater",
            K::NextLabel => "weiter",
            K::FollowUp => "Warte auf die naechste Anweisung.",
            K::ShutdownAck => "Kernel faehrt herunter. Zustand ist gespeichert.",
            K::ViewDashboard => "== UEBERSICHT ==",
            K::ViewMarket => "== MARKT ==",
            K::ViewPolicies => "== MASSNAHMEN ==",
            K::ViewIndustry => "== INDUSTRIE ==",
            K::ViewHistory => "== VERLAUF ==",
            K::ViewExplain => "== ERKLAERUNG ==",
            K::ViewHelp => "== HILFE ==",
            K::HelpBody => concat!(
                "Ansichten: dashboard | market | policies | industry | history | unlocks | goals | intel\n",
                "Handeln:   enact <POLICY_ID> [Staerke] [Ziel]\n",
                "Info:      explain [prices | shortages | policy <ID>]\n",
                "Sprache:   sprache <en|de>\n",
                "Beenden:   quit\n",
                "Auch freie Saetze gehen, z.B. \"import 10 grain\" oder \"show prices\"."
            ),
            K::HistoryEmpty => "Noch keine Runden gespielt.",
            K::EnactSyntax => "Syntax: enact <POLICY_ID> [Staerke] [Ziel]",
            K::ExplainPrices => {
                "Preise folgen jede Runde dem Verhaeltnis von Nachfrage zu Angebot, gedaempft zum Vorpreis und begrenzt auf das Preisband des Guts."
            }
            K::ExplainShortages => "Ein Engpass erhoeht die Unruhe und senkt den Wohlstand in jeder Runde.",
            K::ExplainShortagesDetail => {
                "Ein Gut ist knapp, wenn das Angebot die Nachfrage um mehr als die Engpassschwelle unterschreitet. Importe, Subventionen und Rationierung helfen."
            }
            K::ExplainUnknownPolicy => "Unbekannte Massnahme. 'policies' zeigt die Liste.",
            K::ExplainTopics => "Themen: prices, shortages, policy <ID>",
            K::ExplainHint => "Beispiel: explain policy TAX_ADJUST",
            K::UnlockHeader => "== FREISCHALTUNGEN ==",
            K::UnlockNone => "Keine Freischaltregeln.",
            K::UnlockNext => "naechste Freischaltung ab Runde",
            K::GoalsHeader => "== ZIELE ==",
            K::GoalsNone => "Keine Ziele definiert.",
            K::IntelHeader => "== LAGEBILD ==",
            K::IntelNone => "Derzeit keine Hinweise.",
            K::AutoIntelPrefix => "Lage",
            K::CollapseActive => "KOLLAPS AKTIV: Notmassnahmen freigeschaltet",
            K::CollapseInactive => "Kollaps: inaktiv",
            K::LanguageChanged => "Sprache auf {code} gesetzt.",
            K::LanguageInvalid => "INVALID PARAM Sprache '{code}' nicht unterstuetzt (en oder de)",
            K::MissingTarget => "{policy_id} braucht ein Ziel. Versuch: enact {policy_id} <Staerke> <Ziel>",
            K::IntentAmbiguous => {
                "Meinst du {policy_id}? Bestaetige mit: enact {policy_id} [Staerke] [Ziel]"
            }
            K::UnknownCommand => "Unbekannter Befehl: {command}",
            K::StatusArmed => "Aktionspfad bereit fuer {policy_id}",
            K::StatusMonitoring => "Kernel beobachtet; keine Runde vergeht.",
            K::PredictViewOnly => "Ansichten bewegen die Simulation nicht.",
            K::InternalError => "INTERNAL ERROR Zustand nicht lesbar",
        },
    }
}

/// Look up `key` and substitute `{name}` placeholders.
pub fn render(locale: Locale, key: MessageKey, args: &[(&str, &str)]) -> String {
    let mut out = text(locale, key).to_owned();
    for (name, value) in args {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

/// Narration comment for a stance mode. `index` wraps.
pub fn phrase(locale: Locale, mode: StanceMode, index: usize) -> &'static str {
    let lines: &[&str; 3] = match (locale, mode) {
        (Locale::En, StanceMode::Control) => &[
            "Order holds when the streets are quiet.",
            "Keep a firm hand on the levers.",
            "Stability first; the rest can follow.",
        ],
        (Locale::En, StanceMode::Growth) => &[
            "Capacity compounds. Invest while it is calm.",
            "The economy has room to run.",
            "Build now and harvest later.",
        ],
        (Locale::En, StanceMode::Survival) => &[
            "Every credit counts. Guard the treasury.",
            "Keep the shelves stocked and the lights on.",
            "We endure this turn, then the next.",
        ],
        (Locale::De, StanceMode::Control) => &[
            "Ordnung haelt, solange die Strassen ruhig sind.",
            "Die Hebel fest in der Hand behalten.",
            "Erst Stabilitaet, dann der Rest.",
        ],
        (Locale::De, StanceMode::Growth) => &[
            "Kapazitaet waechst mit Zinsen. Jetzt investieren.",
            "Die Wirtschaft hat Luft nach oben.",
            "Heute bauen, morgen ernten.",
        ],
        (Locale::De, StanceMode::Survival) => &[
            "Jeder Kredit zaehlt. Die Kasse schuetzen.",
            "Regale voll und Lichter an halten.",
            "Diese Runde ueberstehen, dann die naechste.",
        ],
    };
    lines.get(index % lines.len()).copied().unwrap_or_default()
}

/// Expected-effect note for a policy, with a generic line for policies the
/// advisor has no model of.
pub fn policy_note(locale: Locale, policy_id: &str) -> &'static str {
    match locale {
        Locale::En => match policy_id {
            "TAX_ADJUST" => "Expected effect: treasury up, social pressure up if magnitude positive.",
            "SUBSIDY_SECTOR" => "Expected effect: output lift in target sector, recurring fiscal cost.",
            "IMPORT_PROGRAM" => "Expected effect: targeted supply relief against treasury outflow.",
            "FUND_RESEARCH" => "Expected effect: tech growth and slower long-term inflation pressure.",
            "SECURITY_BUDGET" => "Expected effect: unrest down quickly, prosperity drag possible.",
            "RATIONING" => "Expected effect: shortage unrest dampened, prosperity reduced.",
            "WORK_HOURS_REFORM" => "Expected effect: stability up, aggregate output slightly down.",
            "BUILD_INFRA" => "Expected effect: delayed capacity gain after construction phase.",
            "PRICE_STABILIZER" => "Expected effect: target price damped while reserves last.",
            "LOGISTICS_PUSH" => "Expected effect: broad output lift, modest upkeep.",
            "SOS_CREDIT" => "Expected effect: emergency income, stability slips.",
            "RATIONING_PLUS" => "Expected effect: hard demand cut on staples, prosperity falls.",
            _ => "Expected effect: uncertain.",
        },
        Locale::De => match policy_id {
            "TAX_ADJUST" => "Erwartung: Kasse steigt, sozialer Druck steigt bei positiver Staerke.",
            "SUBSIDY_SECTOR" => "Erwartung: mehr Ausstoss im Zielsektor, laufende Kosten.",
            "IMPORT_PROGRAM" => "Erwartung: gezielte Angebotshilfe gegen Abfluss aus der Kasse.",
            "FUND_RESEARCH" => "Erwartung: Technikwachstum, langfristig weniger Inflationsdruck.",
            "SECURITY_BUDGET" => "Erwartung: Unruhe sinkt schnell, Wohlstand leidet etwas.",
            "RATIONING" => "Erwartung: weniger Engpass-Unruhe, weniger Wohlstand.",
            "WORK_HOURS_REFORM" => "Erwartung: mehr Stabilitaet, etwas weniger Ausstoss.",
            "BUILD_INFRA" => "Erwartung: Kapazitaetsgewinn nach der Bauphase.",
            "PRICE_STABILIZER" => "Erwartung: Zielpreis gedaempft, solange Reserven reichen.",
            "LOGISTICS_PUSH" => "Erwartung: breiter Ausstossgewinn, maessige Kosten.",
            "SOS_CREDIT" => "Erwartung: Notfalleinnahmen, Stabilitaet sinkt.",
            "RATIONING_PLUS" => "Erwartung: harter Nachfrageschnitt bei Grundguetern, Wohlstand faellt.",
            _ => "Erwartung: unklar.",
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_filled() {
        let line = render(Locale::En, MessageKey::MissingTarget, &[("policy_id", "IMPORT_PROGRAM")]);
        assert!(line.starts_with("IMPORT_PROGRAM needs a target"));
        assert!(!line.contains('{'));
    }

    #[test]
    fn locales_differ() {
        assert_ne!(
            text(Locale::En, MessageKey::ViewMarket),
            text(Locale::De, MessageKey::ViewMarket)
        );
        assert_eq!(
            text(Locale::De, MessageKey::KernelOnline),
            text(Locale::En, MessageKey::KernelOnline)
        );
    }

    #[test]
    fn language_errors_carry_the_invalid_prefix() {
        for locale in [Locale::En, Locale::De] {
            let line = render(locale, MessageKey::LanguageInvalid, &[("code", "fr")]);
            assert!(line.starts_with("INVALID PARAM"));
            assert!(line.contains("fr"));
        }
    }

    #[test]
    fn phrase_index_wraps() {
        assert_eq!(
            phrase(Locale::En, StanceMode::Growth, 4),
            phrase(Locale::En, StanceMode::Growth, 1)
        );
    }

    #[test]
    fn unmodeled_policy_gets_generic_note() {
        assert_eq!(policy_note(Locale::En, "MYSTERY"), "Expected effect: uncertain.");
        assert!(policy_note(Locale::De, "TAX_ADJUST").starts_with("Erwartung"));
    }
}
