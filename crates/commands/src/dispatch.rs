use std::collections::HashMap;
use std::fmt;

use crate::action::EditorAction;

/// A command registered by the editor widget.
pub trait EditorCommand {
    fn run(&mut self, argument: Option<&str>);
}

impl<F> EditorCommand for F
where
    F: FnMut(Option<&str>),
{
    fn run(&mut self, argument: Option<&str>) {
        self(argument)
    }
}

/// Narrow capability the shim needs from an editor widget: look a command
/// up by name.
pub trait CommandTarget {
    fn find_command(&mut self, name: &str) -> Option<&mut dyn EditorCommand>;
}

/// Name-keyed command table; the adapter a concrete widget fills in.
#[derive(Default)]
pub struct CommandTable {
    commands: HashMap<String, Box<dyn EditorCommand>>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a command.
    pub fn register(&mut self, name: impl Into<String>, command: impl EditorCommand + 'static) {
        self.commands.insert(name.into(), Box::new(command));
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.commands.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.commands.keys().map(|name| name.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTable")
            .field("commands", &self.names())
            .finish()
    }
}

impl CommandTarget for CommandTable {
    fn find_command(&mut self, name: &str) -> Option<&mut dyn EditorCommand> {
        let command: &mut dyn EditorCommand = self.commands.get_mut(name)?.as_mut();
        Some(command)
    }
}

/// What happened to a dispatched action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Invoked,
    /// The widget is attached but has no such command.
    Unsupported,
    /// No widget is mounted.
    Detached,
}

/// Stateless pass-through from UI actions to the widget's command registry.
/// Unavailable commands are silent no-ops.
#[derive(Default)]
pub struct CommandDispatcher {
    target: Option<Box<dyn CommandTarget>>,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once the widget has mounted.
    pub fn attach(&mut self, target: impl CommandTarget + 'static) {
        self.target = Some(Box::new(target));
    }

    pub fn detach(&mut self) -> Option<Box<dyn CommandTarget>> {
        self.target.take()
    }

    pub fn is_attached(&self) -> bool {
        self.target.is_some()
    }

    pub fn dispatch(&mut self, action: &EditorAction) -> DispatchOutcome {
        let Some(target) = self.target.as_mut() else {
            tracing::debug!(action = %action, "no editor widget attached");
            return DispatchOutcome::Detached;
        };
        match target.find_command(action.command_id()) {
            Some(command) => {
                command.run(action.argument());
                tracing::debug!(action = %action, command = action.command_id(), "command invoked");
                DispatchOutcome::Invoked
            }
            None => {
                tracing::debug!(action = %action, command = action.command_id(), "command not supported by widget");
                DispatchOutcome::Unsupported
            }
        }
    }
}

impl fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("attached", &self.is_attached())
            .finish()
    }
}
