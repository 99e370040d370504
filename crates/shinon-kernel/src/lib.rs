//! Chat kernel for Shinon.
//!
//! Turns operator text into simulation actions and narrates the result.
//! A request flows interpret -> sense -> stance -> plan -> narrate; only an
//! executed `enact` reaches the turn engine.
//!
//! # Modules
//!
//! - [`interpret`] -- Rule-ordered intent parser over the [`keywords`]
//!   tables.
//! - [`sense`] -- Observations and risk scores derived from the save.
//! - [`stance`] -- The control/growth/survival stance.
//! - [`planner`] -- Advisor scoring and reply plans.
//! - [`narrate`] -- Action reports and view framing.
//! - [`views`] -- Read-only table views.
//! - [`i18n`] -- English and German message tables.
//! - [`memory`] -- Ring buffer of recent actions.
//! - [`kernel`] -- [`Kernel`], the request/response loop.
//!
//! [`Kernel`]: kernel::Kernel

pub mod i18n;
pub mod interpret;
pub mod kernel;
pub mod keywords;
pub mod memory;
pub mod narrate;
pub mod planner;
pub mod sense;
pub mod stance;
pub mod views;

pub use interpret::{Intent, IntentArgs, MissingParam, parse};
pub use kernel::{ChatTurn, Kernel, KernelResponse};
pub use memory::{KernelMemory, MemoryEntry};
pub use stance::{StanceMode, StanceState};
