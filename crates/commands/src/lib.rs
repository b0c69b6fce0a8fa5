//! Forwards UI actions to the embedded editor widget's command registry.
//!
//! The shim owns no editing logic. When the widget is not mounted, or does
//! not know a command, dispatching does nothing.

mod action;
mod dispatch;

pub use action::{catalogue, ActionDescriptor, EditorAction, ParseActionError, SET_THEME_COMMAND};
pub use dispatch::{CommandDispatcher, CommandTable, CommandTarget, DispatchOutcome, EditorCommand};
