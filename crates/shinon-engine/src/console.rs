//! Plain line-based console: the new/load prompt and the chat loop.
//!
//! Input and output are generic so sessions can be scripted in tests.

use std::io::{BufRead, Write};

use shinon_core::StateStore;
use shinon_kernel::Kernel;
use tracing::info;

use crate::error::ConsoleError;

const PROMPT: &str = "> ";

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>, ConsoleError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> Result<Option<String>, ConsoleError> {
    write!(out, "{question}")?;
    out.flush()?;
    read_line(input)
}

/// Start a new game or resume the saved one.
///
/// With a save present the operator picks `n` (new) or anything else
/// (load). A new game asks for a seed; blank or unparsable input uses
/// `default_seed`. Returns the seed of a newly created game.
pub fn choose_game<S, R, W>(
    kernel: &mut Kernel<S>,
    default_seed: u64,
    input: &mut R,
    out: &mut W,
) -> Result<Option<u64>, ConsoleError>
where
    S: StateStore,
    R: BufRead,
    W: Write,
{
    if kernel.engine().store().has_game().map_err(shinon_core::EngineError::from)? {
        let answer = ask(input, out, "Save found. [n]ew game or [l]oad? ")?.unwrap_or_default();
        if !answer.eq_ignore_ascii_case("n") {
            kernel.ensure_game(default_seed)?;
            let turn = kernel.engine().load_state()?.world.turn;
            info!(turn, "Save loaded");
            writeln!(out, "Save loaded at turn {turn}.")?;
            return Ok(None);
        }
    }

    let answer = ask(input, out, &format!("Seed [{default_seed}]: "))?.unwrap_or_default();
    let seed = answer.parse().unwrap_or(default_seed);
    kernel.new_game(seed)?;
    writeln!(out, "New game started with seed {seed}.")?;
    Ok(Some(seed))
}

/// Run the chat loop until the operator quits or input ends.
///
/// Returns the number of turns advanced during the session.
pub fn run<S, R, W>(kernel: &mut Kernel<S>, input: &mut R, out: &mut W) -> Result<u64, ConsoleError>
where
    S: StateStore,
    R: BufRead,
    W: Write,
{
    let greeting = kernel.handle("dashboard");
    writeln!(out, "{}", greeting.output)?;

    let mut advanced = 0;
    loop {
        let Some(line) = ask(input, out, PROMPT)? else {
            let response = kernel.handle("quit");
            writeln!(out, "\n{}", response.output)?;
            break;
        };
        let response = kernel.handle(&line);
        writeln!(out, "{}", response.output)?;
        if response.turn_advanced {
            advanced += 1;
        }
        if response.should_quit {
            break;
        }
        writeln!(out, "{}", response.chat_turn.follow_up_prompt)?;
    }
    info!(turns = advanced, "Session ended");
    Ok(advanced)
}
