//! The chat kernel: one line of operator input in, one [`KernelResponse`]
//! out.
//!
//! The kernel owns the [`SimulationEngine`] together with the presentation
//! state the engine does not persist: the stance, the short-term memory,
//! the current view and the last world it reported on. Only an executed
//! `enact` advances the simulation; every other request renders a view.

use serde::Serialize;
use shinon_core::store::meta;
use shinon_core::{EngineError, SimulationEngine, StateStore, TurnReport};
use shinon_types::{EventId, GameState, IntentKind, Locale, PolicyId, ViewId, WorldState};
use tracing::{debug, error, info};

use crate::i18n::{MessageKey, render, text};
use crate::interpret::{Intent, MissingParam, parse};
use crate::memory::{KernelMemory, MemoryEntry};
use crate::narrate::{delta_line, render_action_report, render_view_footer, render_view_header};
use crate::planner::create_plan;
use crate::sense::{Observations, observe};
use crate::stance::StanceState;
use crate::views;

/// Transcript record of one exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    /// The input as typed.
    pub user_message: String,
    /// Intent the interpreter settled on.
    pub recognized_intent: IntentKind,
    /// Policy enacted, when a turn advanced.
    pub executed_action: Option<PolicyId>,
    /// Whether the simulation moved forward.
    pub turn_advanced: bool,
    /// The `delta:` line of an advanced turn, empty otherwise.
    pub delta_summary: String,
    /// Events that fired during the turn.
    pub events: Vec<EventId>,
    /// Prompt shown after the reply.
    pub follow_up_prompt: String,
}

/// Reply to one line of input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KernelResponse {
    /// Text to print.
    pub output: String,
    /// View the kernel is on after this reply.
    pub current_view: ViewId,
    /// Whether exactly one turn was advanced.
    pub turn_advanced: bool,
    /// Whether the console should exit.
    pub should_quit: bool,
    /// Whether the narration language changed.
    pub locale_changed: bool,
    /// Transcript record.
    pub chat_turn: ChatTurn,
}

/// Chat front end over a [`SimulationEngine`].
#[derive(Debug)]
pub struct Kernel<S> {
    engine: SimulationEngine<S>,
    stance: StanceState,
    memory: KernelMemory,
    current_view: ViewId,
    last_world: Option<WorldState>,
    locale: Locale,
}

impl<S: StateStore> Kernel<S> {
    /// Wrap `engine`. The narration language is read from the save and
    /// falls back to `default_locale`.
    pub fn new(engine: SimulationEngine<S>, default_locale: Locale) -> Result<Self, EngineError> {
        let stored = engine.store().get_str_meta(meta::LANGUAGE, "")?;
        let locale = stored.parse().unwrap_or(default_locale);
        Ok(Self {
            engine,
            stance: StanceState::default(),
            memory: KernelMemory::default(),
            current_view: ViewId::Dashboard,
            last_world: None,
            locale,
        })
    }

    /// Replace the memory with one of capacity `limit`.
    #[must_use]
    pub fn with_memory_limit(mut self, limit: usize) -> Self {
        self.memory = KernelMemory::new(limit);
        self
    }

    /// The wrapped engine.
    pub const fn engine(&self) -> &SimulationEngine<S> {
        &self.engine
    }

    /// Mutable access to the wrapped engine.
    pub const fn engine_mut(&mut self) -> &mut SimulationEngine<S> {
        &mut self.engine
    }

    /// Give up the kernel and return its engine.
    pub fn into_engine(self) -> SimulationEngine<S> {
        self.engine
    }

    /// Current narration language.
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// View shown by the last reply.
    pub const fn current_view(&self) -> ViewId {
        self.current_view
    }

    /// Current stance.
    pub const fn stance(&self) -> &StanceState {
        &self.stance
    }

    /// Recent executed actions.
    pub const fn memory(&self) -> &KernelMemory {
        &self.memory
    }

    /// Start a new game and reset the presentation state. The current
    /// language is written back to the fresh save.
    pub fn new_game(&mut self, seed: u64) -> Result<GameState, EngineError> {
        let state = self.engine.new_game(seed)?;
        self.engine.store_mut().set_meta(meta::LANGUAGE, self.locale.code())?;
        self.stance = StanceState::default();
        self.memory = KernelMemory::new(self.memory.limit());
        self.current_view = ViewId::Dashboard;
        self.last_world = None;
        Ok(state)
    }

    /// Create a game with `seed` unless the save already holds one, and
    /// make sure the language is recorded. Returns whether one was created.
    pub fn ensure_game(&mut self, seed: u64) -> Result<bool, EngineError> {
        if self.engine.store().has_game()? {
            self.engine.store_mut().set_meta(meta::LANGUAGE, self.locale.code())?;
            return Ok(false);
        }
        self.new_game(seed)?;
        Ok(true)
    }

    /// Handle one line of operator input.
    pub fn handle(&mut self, raw: &str) -> KernelResponse {
        let target_types = self.engine.catalog().policy_target_types();
        let intent = parse(raw, self.current_view, &target_types);
        debug!(intent = %intent.kind, confidence = intent.confidence, "Input interpreted");

        match intent.kind {
            IntentKind::Quit => KernelResponse {
                output: text(self.locale, MessageKey::ShutdownAck).to_owned(),
                current_view: self.current_view,
                turn_advanced: false,
                should_quit: true,
                locale_changed: false,
                chat_turn: ChatTurn {
                    user_message: raw.to_owned(),
                    recognized_intent: IntentKind::Quit,
                    executed_action: None,
                    turn_advanced: false,
                    delta_summary: String::new(),
                    events: Vec::new(),
                    follow_up_prompt: String::new(),
                },
            },
            IntentKind::LanguageChange => self.change_language(&intent),
            IntentKind::EnactPolicy => self.enact(&intent),
            _ => self.view(&intent),
        }
    }

    fn change_language(&mut self, intent: &Intent) -> KernelResponse {
        let code = intent.args.locale.clone().unwrap_or_default();
        let Ok(locale) = code.parse::<Locale>() else {
            let line = render(self.locale, MessageKey::LanguageInvalid, &[("code", &code)]);
            return self.reply(intent, &line);
        };
        if let Err(err) = self.engine.store_mut().set_meta(meta::LANGUAGE, locale.code()) {
            error!(%err, "Failed to persist language");
            return self.internal_error(intent);
        }
        self.locale = locale;
        info!(locale = locale.code(), "Language changed");
        let line = render(locale, MessageKey::LanguageChanged, &[("code", locale.code())]);
        let mut response = self.reply(intent, &line);
        response.locale_changed = true;
        response
    }

    fn enact(&mut self, intent: &Intent) -> KernelResponse {
        if let Some(reason) = &intent.args.invalid {
            return self.reply(intent, &format!("INVALID PARAM {reason}"));
        }
        let Some(policy_id) = intent.args.policy_id.clone() else {
            return self.reply(intent, "INVALID PARAM missing policy_id");
        };
        if intent.missing_params.contains(&MissingParam::Target) {
            let line = render(
                self.locale,
                MessageKey::MissingTarget,
                &[("policy_id", policy_id.as_str())],
            );
            return self.reply(intent, &line);
        }
        if !intent.auto_execute {
            let line = render(
                self.locale,
                MessageKey::IntentAmbiguous,
                &[("policy_id", policy_id.as_str())],
            );
            return self.reply(intent, &line);
        }

        let outcome = self.engine.advance_turn(
            policy_id.as_str(),
            intent.args.magnitude,
            intent.args.target.as_deref(),
        );
        let Some(report) = outcome.report.filter(|_| outcome.advanced) else {
            return self.reply(intent, &outcome.message);
        };

        let output = match self.narrate_turn(&report) {
            Ok(output) => output,
            Err(err) => {
                error!(%err, turn = report.world_after.turn, "Failed to narrate turn");
                format!(
                    "{}\n{}\n{}",
                    text(self.locale, MessageKey::KernelOnline),
                    outcome.message,
                    delta_line(&report)
                )
            }
        };
        self.current_view = ViewId::Dashboard;

        let events: Vec<EventId> = report.events.iter().map(|e| e.id.clone()).collect();
        KernelResponse {
            output,
            current_view: self.current_view,
            turn_advanced: true,
            should_quit: false,
            locale_changed: false,
            chat_turn: ChatTurn {
                user_message: intent.raw.clone(),
                recognized_intent: intent.kind,
                executed_action: Some(report.action.clone()),
                turn_advanced: true,
                delta_summary: delta_line(&report),
                events,
                follow_up_prompt: text(self.locale, MessageKey::FollowUp).to_owned(),
            },
        }
    }

    fn narrate_turn(&mut self, report: &TurnReport) -> Result<String, EngineError> {
        let state = self.engine.load_state()?;
        let obs = self.sense(&state);
        self.stance.update(&obs);
        let rows = self.engine.policy_status(&state)?;
        let plan = create_plan(
            IntentKind::EnactPolicy,
            Some(&report.action),
            &self.stance,
            &obs,
            &rows,
            self.locale,
        );
        let seed = self.engine.store().seed()?.unwrap_or_default();
        let mut output = render_action_report(self.locale, seed, report, &plan, &self.stance);

        if let Some(hint) = self.engine.intel_hint(&state, true)? {
            output.push_str(&format!(
                "\n{}: {}",
                text(self.locale, MessageKey::AutoIntelPrefix),
                hint.text
            ));
        }

        self.memory.record(MemoryEntry {
            turn: state.world.turn,
            action: report.action.clone(),
            shortages: report.metrics.shortages.clone(),
            events: report.events.iter().map(|e| e.id.clone()).collect(),
            treasury: state.world.treasury,
        });
        self.last_world = Some(state.world);
        Ok(output)
    }

    fn view(&mut self, intent: &Intent) -> KernelResponse {
        match self.render_view(intent) {
            Ok(output) => self.respond(intent, output, false),
            Err(err) => {
                error!(%err, intent = %intent.kind, "Failed to render view");
                self.internal_error(intent)
            }
        }
    }

    fn render_view(&mut self, intent: &Intent) -> Result<String, EngineError> {
        let state = self.engine.load_state()?;
        let obs = self.sense(&state);
        self.stance.update(&obs);
        let rows = self.engine.policy_status(&state)?;
        let plan = create_plan(intent.kind, None, &self.stance, &obs, &rows, self.locale);
        let locale = self.locale;

        let body = match intent.kind {
            IntentKind::ViewDashboard => views::dashboard(
                locale,
                &state,
                &self.stance,
                self.engine.collapse_active()?,
                self.engine.catalog().economy.shortage_threshold,
            ),
            IntentKind::ViewMarket => views::market(locale, &state),
            IntentKind::ViewPolicies => views::policies(locale, &rows),
            IntentKind::ViewIndustry => views::industry(locale, &state),
            IntentKind::ViewHistory => views::history(locale, &self.engine.history(views::HISTORY_ROWS)?),
            IntentKind::Explain => views::explain(
                locale,
                intent.args.topic.as_deref().unwrap_or("general"),
                self.engine.catalog(),
            ),
            IntentKind::UnlockList => {
                let next = self.engine.store().get_int_meta(meta::NEXT_UNLOCK_TURN, 0)?;
                views::unlocks(locale, &self.engine.unlock_status(&state)?, next)
            }
            IntentKind::ShowGoals => views::goals(locale, &self.engine.soft_goals(&state)),
            IntentKind::Intel => views::intel(locale, self.engine.intel_hint(&state, false)?.as_ref()),
            IntentKind::Unknown => views::help(locale, Some(intent.raw.trim())),
            _ => views::help(locale, None),
        };

        // Unknown input keeps the operator where they were.
        if intent.kind != IntentKind::Unknown {
            self.current_view = intent.kind.view().unwrap_or(self.current_view);
        }
        debug!(view = %self.current_view, turn = state.world.turn, "View rendered");

        let output = format!(
            "{}\n\n{body}\n\n{}",
            render_view_header(locale, &state.world, &self.stance, &plan),
            render_view_footer(locale, &plan)
        );
        self.last_world = Some(state.world);
        Ok(output)
    }

    fn sense(&self, state: &GameState) -> Observations {
        observe(
            state,
            self.last_world.as_ref(),
            self.engine.catalog().economy.shortage_threshold,
        )
    }

    /// Non-advancing reply: the kernel banner plus one line.
    fn reply(&self, intent: &Intent, line: &str) -> KernelResponse {
        let output = format!("{}\n{line}", text(self.locale, MessageKey::KernelOnline));
        self.respond(intent, output, false)
    }

    fn internal_error(&self, intent: &Intent) -> KernelResponse {
        self.reply(intent, text(self.locale, MessageKey::InternalError))
    }

    fn respond(&self, intent: &Intent, output: String, locale_changed: bool) -> KernelResponse {
        KernelResponse {
            output,
            current_view: self.current_view,
            turn_advanced: false,
            should_quit: false,
            locale_changed,
            chat_turn: ChatTurn {
                user_message: intent.raw.clone(),
                recognized_intent: intent.kind,
                executed_action: None,
                turn_advanced: false,
                delta_summary: String::new(),
                events: Vec::new(),
                follow_up_prompt: text(self.locale, MessageKey::FollowUp).to_owned(),
            },
        }
    }
}
