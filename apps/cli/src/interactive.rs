//! Line-oriented editor session. A reader thread forwards stdin lines over a
//! channel; the loop thread owns the workbench and ticks it between lines.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Error, Result};
use crtpad_commands::{DispatchOutcome, EditorAction};
use crtpad_shell::{tab_strip, title_bar};

use crate::app::App;
use crate::ViewArgs;

const IDLE_POLL: Duration = Duration::from_millis(250);
const MAX_WAIT: Duration = Duration::from_secs(60);

const HELP: &str = "\
edit <text>     replace the active document (\\n, \\t escapes)
append <text>   append to the active document
new [name]      create a document
open <path>     open a local file
close <id>      close a document
switch <id>     activate a document
save            write the active document to the export directory
zoom-in | zoom-out | wrap | minimap | whitespace
theme <name>    switch colour theme
run <action>    forward an editor command (see `crtpad commands`)
tabs | status | render
wait <ms>       let timers run
quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Edit(String),
    Append(String),
    New(Option<String>),
    Open(PathBuf),
    Close(String),
    Switch(String),
    Save,
    ZoomIn,
    ZoomOut,
    Wrap,
    Minimap,
    Whitespace,
    Theme(String),
    Run(EditorAction),
    Tabs,
    Status,
    Render,
    Wait(Duration),
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim_start();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest),
            None => (line, ""),
        };
        let required = |what: &str| -> Result<String> {
            let value = rest.trim();
            if value.is_empty() {
                bail!("'{verb}' needs {what}");
            }
            Ok(value.to_string())
        };

        let command = match verb {
            "edit" => ShellCommand::Edit(unescape(rest)),
            "append" => ShellCommand::Append(unescape(rest)),
            "new" => {
                let name = rest.trim();
                ShellCommand::New((!name.is_empty()).then(|| name.to_string()))
            }
            "open" => ShellCommand::Open(PathBuf::from(required("a path")?)),
            "close" => ShellCommand::Close(required("a document id")?),
            "switch" => ShellCommand::Switch(required("a document id")?),
            "save" => ShellCommand::Save,
            "zoom-in" => ShellCommand::ZoomIn,
            "zoom-out" => ShellCommand::ZoomOut,
            "wrap" => ShellCommand::Wrap,
            "minimap" => ShellCommand::Minimap,
            "whitespace" => ShellCommand::Whitespace,
            "theme" => ShellCommand::Theme(required("a theme name")?),
            "run" => ShellCommand::Run(required("an action")?.parse()?),
            "tabs" => ShellCommand::Tabs,
            "status" => ShellCommand::Status,
            "render" => ShellCommand::Render,
            "wait" => {
                let millis: u64 = required("a duration in milliseconds")?
                    .parse()
                    .context("wait expects milliseconds")?;
                ShellCommand::Wait(Duration::from_millis(millis).min(MAX_WAIT))
            }
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => bail!("unknown command '{other}' (try 'help')"),
        };
        Ok(command)
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

enum Flow {
    Continue,
    Quit,
}

pub fn run(app: &mut App, view: ViewArgs) -> Result<()> {
    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", title_bar())?;
    writeln!(out, "READY")?;
    out.flush()?;

    loop {
        let now = Instant::now();
        report_autosave(app, now, &mut out)?;
        let timeout = app.workbench.next_wakeup(now).unwrap_or(IDLE_POLL);
        match rx.recv_timeout(timeout) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let flow = line
                    .parse::<ShellCommand>()
                    .and_then(|command| execute(app, command, view, &mut out));
                match flow {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(err) => writeln!(out, "error: {err:#}")?,
                }
                out.flush()?;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    if app.workbench.has_pending_autosave() {
        tracing::info!("session closed with unsaved edits pending");
    }
    Ok(())
}

fn execute(
    app: &mut App,
    command: ShellCommand,
    view: ViewArgs,
    out: &mut impl Write,
) -> Result<Flow> {
    let now = Instant::now();
    match command {
        ShellCommand::Edit(text) => {
            app.workbench.edit_active(text, now);
        }
        ShellCommand::Append(text) => {
            let mut content = app.workbench.registry().active().content().to_string();
            content.push_str(&text);
            app.workbench.edit_active(content, now);
        }
        ShellCommand::New(name) => {
            let id = match name {
                Some(name) => app.workbench.create(name, String::new(), None),
                None => app.workbench.new_file(),
            };
            writeln!(out, "opened {id}")?;
        }
        ShellCommand::Open(path) => {
            let id = app
                .workbench
                .import_file(&path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            writeln!(out, "opened {id}")?;
        }
        ShellCommand::Close(id) => {
            let id = app.resolve_id(&id)?;
            if !app.workbench.close(&id) {
                writeln!(out, "the last open document cannot be closed")?;
            }
        }
        ShellCommand::Switch(id) => {
            let id = app.resolve_id(&id)?;
            app.workbench.switch(&id);
        }
        ShellCommand::Save => {
            let path = app.export_active(now, None)?;
            writeln!(out, "SAVED {}", path.display())?;
        }
        ShellCommand::ZoomIn => {
            writeln!(out, "SIZE: {}px", app.prefs.zoom_in())?;
        }
        ShellCommand::ZoomOut => {
            writeln!(out, "SIZE: {}px", app.prefs.zoom_out())?;
        }
        ShellCommand::Wrap => {
            writeln!(out, "WORD WRAP: {}", on_off(app.prefs.toggle_word_wrap()))?;
        }
        ShellCommand::Minimap => {
            writeln!(out, "MINIMAP: {}", on_off(app.prefs.toggle_minimap()))?;
        }
        ShellCommand::Whitespace => {
            writeln!(out, "WHITESPACE: {}", on_off(app.prefs.toggle_whitespace()))?;
        }
        ShellCommand::Theme(name) => {
            app.apply_theme(&name)?;
            writeln!(out, "THEME: {}", app.prefs.theme.to_uppercase())?;
        }
        ShellCommand::Run(action) => match app.dispatch(&action)? {
            DispatchOutcome::Invoked => writeln!(out, "ran {action}")?,
            DispatchOutcome::Unsupported => {
                writeln!(out, "'{action}' is not available in this editor")?
            }
            DispatchOutcome::Detached => writeln!(out, "editor is not ready")?,
        },
        ShellCommand::Tabs => {
            let registry = app.workbench.registry();
            writeln!(out, "{}", tab_strip(registry.documents(), registry.active_id()))?;
        }
        ShellCommand::Status => {
            writeln!(out, "{}", app.status_bar(now).render(view.width))?;
        }
        ShellCommand::Render => {
            write!(out, "{}", app.render(now, view.width, view.colour()))?;
        }
        ShellCommand::Wait(duration) => wait(app, duration, out)?,
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Sleeps for `duration` while still driving the autosave timers.
fn wait(app: &mut App, duration: Duration, out: &mut impl Write) -> Result<()> {
    let deadline = Instant::now() + duration;
    loop {
        let now = Instant::now();
        report_autosave(app, now, out)?;
        if now >= deadline {
            return Ok(());
        }
        let step = app
            .workbench
            .next_wakeup(now)
            .unwrap_or(IDLE_POLL)
            .min(deadline - now);
        thread::sleep(step);
    }
}

fn report_autosave(app: &mut App, now: Instant, out: &mut impl Write) -> Result<()> {
    if let Some(event) = app.workbench.tick(now) {
        if event.persisted {
            writeln!(out, "AUTO-SAVED")?;
        } else {
            writeln!(out, "AUTO-SAVE FAILED: storage unavailable")?;
        }
        out.flush()?;
    }
    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value {
        "ON"
    } else {
        "OFF"
    }
}
