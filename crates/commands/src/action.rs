use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Command id the widget uses to apply a colour theme.
pub const SET_THEME_COMMAND: &str = "editor.setTheme";

/// An action surfaced in the UI that is carried out by the embedded editor
/// widget's own command registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EditorAction {
    Find,
    Replace,
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    FormatDocument,
    ToggleComment,
    GotoLine,
    JumpToBracket,
    SelectAll,
    DuplicateLine,
    MoveLinesUp,
    MoveLinesDown,
    IndentLines,
    OutdentLines,
    SetTheme(String),
}

/// Static description of an action, for listings and help output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDescriptor {
    /// Name accepted by [`EditorAction::from_str`].
    pub name: &'static str,
    pub label: &'static str,
    pub command_id: &'static str,
    pub takes_argument: bool,
}

const fn descriptor(
    name: &'static str,
    label: &'static str,
    command_id: &'static str,
) -> ActionDescriptor {
    ActionDescriptor {
        name,
        label,
        command_id,
        takes_argument: false,
    }
}

static CATALOGUE: &[ActionDescriptor] = &[
    descriptor("find", "Search", "actions.find"),
    descriptor("replace", "Replace", "editor.action.startFindReplaceAction"),
    descriptor("undo", "Undo", "undo"),
    descriptor("redo", "Redo", "redo"),
    descriptor("copy", "Copy", "editor.action.clipboardCopyAction"),
    descriptor("cut", "Cut", "editor.action.clipboardCutAction"),
    descriptor("paste", "Paste", "editor.action.clipboardPasteAction"),
    descriptor("format", "Format Document", "editor.action.formatDocument"),
    descriptor("comment", "Toggle Line Comment", "editor.action.commentLine"),
    descriptor("goto-line", "Go to Line", "editor.action.gotoLine"),
    descriptor("bracket", "Jump to Bracket", "editor.action.jumpToBracket"),
    descriptor("select-all", "Select All", "editor.action.selectAll"),
    descriptor("duplicate-line", "Duplicate Line", "editor.action.copyLinesDownAction"),
    descriptor("move-up", "Move Lines Up", "editor.action.moveLinesUpAction"),
    descriptor("move-down", "Move Lines Down", "editor.action.moveLinesDownAction"),
    descriptor("indent", "Indent Lines", "editor.action.indentLines"),
    descriptor("outdent", "Outdent Lines", "editor.action.outdentLines"),
    ActionDescriptor {
        name: "set-theme",
        label: "Switch Theme",
        command_id: SET_THEME_COMMAND,
        takes_argument: true,
    },
];

/// Every action the shim can forward, in toolbar order.
pub fn catalogue() -> &'static [ActionDescriptor] {
    CATALOGUE
}

impl EditorAction {
    /// Builds an action from its user-facing name and optional argument.
    pub fn from_parts(name: &str, argument: Option<&str>) -> Result<Self, ParseActionError> {
        let argument = argument.map(str::trim).filter(|arg| !arg.is_empty());
        let action = match name.trim().to_ascii_lowercase().as_str() {
            "find" | "search" => EditorAction::Find,
            "replace" => EditorAction::Replace,
            "undo" => EditorAction::Undo,
            "redo" => EditorAction::Redo,
            "copy" => EditorAction::Copy,
            "cut" => EditorAction::Cut,
            "paste" => EditorAction::Paste,
            "format" => EditorAction::FormatDocument,
            "comment" => EditorAction::ToggleComment,
            "goto-line" | "goto" => EditorAction::GotoLine,
            "bracket" => EditorAction::JumpToBracket,
            "select-all" => EditorAction::SelectAll,
            "duplicate-line" | "duplicate" => EditorAction::DuplicateLine,
            "move-up" => EditorAction::MoveLinesUp,
            "move-down" => EditorAction::MoveLinesDown,
            "indent" => EditorAction::IndentLines,
            "outdent" => EditorAction::OutdentLines,
            "set-theme" | "theme" => {
                let theme = argument.ok_or_else(|| ParseActionError::MissingArgument("set-theme"))?;
                return Ok(EditorAction::SetTheme(theme.to_string()));
            }
            other => return Err(ParseActionError::Unknown(other.to_string())),
        };
        if let Some(extra) = argument {
            return Err(ParseActionError::UnexpectedArgument {
                action: action.name(),
                argument: extra.to_string(),
            });
        }
        Ok(action)
    }

    pub fn descriptor(&self) -> &'static ActionDescriptor {
        let index = match self {
            EditorAction::Find => 0,
            EditorAction::Replace => 1,
            EditorAction::Undo => 2,
            EditorAction::Redo => 3,
            EditorAction::Copy => 4,
            EditorAction::Cut => 5,
            EditorAction::Paste => 6,
            EditorAction::FormatDocument => 7,
            EditorAction::ToggleComment => 8,
            EditorAction::GotoLine => 9,
            EditorAction::JumpToBracket => 10,
            EditorAction::SelectAll => 11,
            EditorAction::DuplicateLine => 12,
            EditorAction::MoveLinesUp => 13,
            EditorAction::MoveLinesDown => 14,
            EditorAction::IndentLines => 15,
            EditorAction::OutdentLines => 16,
            EditorAction::SetTheme(_) => 17,
        };
        &CATALOGUE[index]
    }

    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    /// Id of the widget command this action resolves to.
    pub fn command_id(&self) -> &'static str {
        self.descriptor().command_id
    }

    pub fn argument(&self) -> Option<&str> {
        match self {
            EditorAction::SetTheme(theme) => Some(theme),
            _ => None,
        }
    }
}

impl fmt::Display for EditorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.argument() {
            Some(argument) => write!(f, "{} {}", self.name(), argument),
            None => f.write_str(self.name()),
        }
    }
}

impl FromStr for EditorAction {
    type Err = ParseActionError;

    /// Parses `"<name> [argument]"`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        match input.split_once(char::is_whitespace) {
            Some((name, argument)) => Self::from_parts(name, Some(argument)),
            None => Self::from_parts(input, None),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseActionError {
    #[error("unknown editor action '{0}'")]
    Unknown(String),
    #[error("action '{0}' requires an argument")]
    MissingArgument(&'static str),
    #[error("action '{action}' does not take an argument (got '{argument}')")]
    UnexpectedArgument {
        action: &'static str,
        argument: String,
    },
}
