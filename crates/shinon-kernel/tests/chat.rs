//! Chat behaviour of the kernel: clarification prompts, language handling
//! and view bookkeeping.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc
)]

use std::path::PathBuf;

use shinon_core::store::meta;
use shinon_core::{MemoryStore, SimulationEngine, StateStore};
use shinon_db::SqliteStore;
use shinon_kernel::Kernel;
use shinon_types::{IntentKind, Locale, PolicyId, ViewId};
use shinon_world::Catalog;

fn kernel(seed: u64) -> Kernel<MemoryStore> {
    let engine = SimulationEngine::new(Catalog::builtin().expect("catalog"), MemoryStore::new());
    let mut kernel = Kernel::new(engine, Locale::En).expect("kernel");
    kernel.new_game(seed).expect("new game");
    kernel
}

fn turn(kernel: &Kernel<MemoryStore>) -> u64 {
    kernel.engine().load_state().expect("state").world.turn
}

fn temp_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("shinon-kernel-{name}-{}.sqlite3", std::process::id()));
    cleanup(&path);
    path
}

fn cleanup(path: &PathBuf) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

#[test]
fn vague_policy_hint_asks_for_confirmation() {
    let mut kernel = kernel(11);
    let response = kernel.handle("maybe something about taxes");
    assert_eq!(response.chat_turn.recognized_intent, IntentKind::EnactPolicy);
    assert!(!response.turn_advanced);
    assert!(response.output.contains("Did you mean TAX_ADJUST?"), "{}", response.output);
    assert_eq!(turn(&kernel), 0);
}

#[test]
fn missing_target_prompts_instead_of_acting() {
    let mut kernel = kernel(11);
    let response = kernel.handle("import more please");
    assert!(!response.turn_advanced);
    assert!(response.output.contains("IMPORT_PROGRAM needs a target"), "{}", response.output);
    assert_eq!(turn(&kernel), 0);
}

#[test]
fn confident_sentence_executes() {
    let mut kernel = kernel(11);
    let response = kernel.handle("raise taxes 0.05");
    assert!(response.turn_advanced, "{}", response.output);
    assert_eq!(response.chat_turn.executed_action, Some(PolicyId::new("TAX_ADJUST")));
    assert_eq!(turn(&kernel), 1);
}

#[test]
fn malformed_enact_is_invalid() {
    let mut kernel = kernel(11);
    let response = kernel.handle("enact");
    assert!(response.output.contains("INVALID PARAM missing policy_id"));
    let response = kernel.handle("enact TAX_ADJUST lots");
    assert!(response.output.contains("INVALID PARAM magnitude is not numeric"));
    let response = kernel.handle("enact TAX_ADJUST 0.9");
    assert!(response.output.contains("INVALID PARAM magnitude out of range"), "{}", response.output);
    assert_eq!(turn(&kernel), 0);
}

#[test]
fn action_report_has_expected_lines() {
    let mut kernel = kernel(12);
    let response = kernel.handle("enact IMPORT_PROGRAM 10 grain");
    assert!(response.turn_advanced, "{}", response.output);
    let lines: Vec<&str> = response.output.lines().collect();
    assert_eq!(lines[0], "SHINON KERNEL ONLINE");
    assert!(lines[1].starts_with("status: ACTION turn=1"));
    assert_eq!(lines[2], response.chat_turn.delta_summary);
    assert!(response.output.contains("\ncomment: "));
    assert!(response.output.contains("\nadvisor: "));
    assert_eq!(response.chat_turn.follow_up_prompt, "Awaiting your next directive.");
}

#[test]
fn language_switch_changes_narration_and_persists() {
    let mut kernel = kernel(13);
    let response = kernel.handle("lang de");
    assert!(response.locale_changed);
    assert_eq!(kernel.locale(), Locale::De);
    assert_eq!(
        kernel.engine().store().get_str_meta(meta::LANGUAGE, "").expect("meta"),
        "de"
    );
    assert!(kernel.handle("market").output.contains("== MARKT =="));

    let response = kernel.handle("lang fr");
    assert!(!response.locale_changed);
    assert!(response.output.contains("INVALID PARAM"));
    assert_eq!(kernel.locale(), Locale::De);
}

#[test]
fn unknown_input_keeps_the_current_view() {
    let mut kernel = kernel(14);
    assert_eq!(kernel.handle("industry").current_view, ViewId::Industry);
    let response = kernel.handle("fly to the moon");
    assert_eq!(response.chat_turn.recognized_intent, IntentKind::Unknown);
    assert_eq!(response.current_view, ViewId::Industry);
    assert!(response.output.contains("Unknown command: fly to the moon"));
    assert!(response.output.contains("== HELP =="));
}

#[test]
fn views_set_the_current_view() {
    let mut kernel = kernel(15);
    for (command, view) in [
        ("market", ViewId::Market),
        ("policies", ViewId::Policies),
        ("history", ViewId::History),
        ("explain shortages", ViewId::Explain),
        ("unlocks", ViewId::Unlocks),
        ("goals", ViewId::Goals),
        ("intel", ViewId::Intel),
        ("help", ViewId::Help),
        ("show the dashboard", ViewId::Dashboard),
    ] {
        let response = kernel.handle(command);
        assert_eq!(response.current_view, view, "{command}");
        assert!(response.output.starts_with("SHINON KERNEL ONLINE\nstatus: VIEW turn=0"), "{command}");
        assert!(response.output.contains("\nnext: "), "{command}");
    }
}

#[test]
fn response_serializes_for_transcripts() {
    let mut kernel = kernel(17);
    let response = kernel.handle("market");
    let json = serde_json::to_value(&response).expect("json");
    assert_eq!(json["current_view"], "market");
    assert_eq!(json["chat_turn"]["recognized_intent"], "view_market");
    assert_eq!(json["chat_turn"]["turn_advanced"], false);
    assert!(json["chat_turn"]["executed_action"].is_null());
}

#[test]
fn policies_view_lists_start_loadout() {
    let mut kernel = kernel(16);
    let output = kernel.handle("policies").output;
    for id in ["TAX_ADJUST", "SUBSIDY_SECTOR", "IMPORT_PROGRAM", "SOS_CREDIT"] {
        assert!(output.contains(id), "{id}");
    }
    assert!(output.contains("Syntax: enact <POLICY_ID> [magnitude] [target]"));
}

#[test]
fn sqlite_save_keeps_language_across_sessions() {
    let path = temp_path("lang");
    {
        let store = SqliteStore::open(&path).expect("open");
        let engine = SimulationEngine::new(Catalog::builtin().expect("catalog"), store);
        let mut kernel = Kernel::new(engine, Locale::En).expect("kernel");
        kernel.ensure_game(21).expect("game");
        assert!(kernel.handle("sprache de").locale_changed);
        assert!(kernel.handle("enact TAX_ADJUST 0.05").turn_advanced);
        kernel.into_engine().into_store().close();
    }
    {
        let store = SqliteStore::open(&path).expect("reopen");
        let engine = SimulationEngine::new(Catalog::builtin().expect("catalog"), store);
        let mut kernel = Kernel::new(engine, Locale::En).expect("kernel");
        assert!(!kernel.ensure_game(21).expect("game"));
        assert_eq!(kernel.locale(), Locale::De);
        assert_eq!(kernel.engine().load_state().expect("state").world.turn, 1);
        assert!(kernel.handle("history").output.contains("TAX_ADJUST"));
        kernel.into_engine().into_store().close();
    }
    cleanup(&path);
}
