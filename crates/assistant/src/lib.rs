//! `smartfood-assistant`
//!
//! **Responsibility:** the interactive food assistant.
//!
//! This crate provides:
//! - [`IntakeWizard`]: the guided add-item conversation with shelf-life prediction
//! - [`InventoryView`]: the inventory list, re-fetched after every mutation
//! - [`Dialogs`]: confirmations and prompts, for a terminal or scripted answers
//! - the `smartfood` command-line surface
//!
//! The service stays the authority: nothing here caches or edits items locally.

pub mod cli;
pub mod commands;
pub mod dialog;
pub mod notice;
pub mod reconciler;
pub mod render;
pub mod terminal;
pub mod wizard;

pub use dialog::{Dialogs, ScriptedDialogs};
pub use notice::{Notice, NoticeKind};
pub use reconciler::{EditForm, EditSession, InventoryError, InventoryView, ListPhase, Mutation};
pub use terminal::TerminalDialogs;
pub use wizard::{ExpiryChoice, IntakeStep, IntakeWizard, PredictionSummary, StepKind, WizardError};
