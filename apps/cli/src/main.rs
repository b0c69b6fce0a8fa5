mod app;
mod interactive;
mod logging;

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use crtpad_commands::catalogue;
use crtpad_settings::AppConfig;
use crtpad_shell::DEFAULT_WIDTH;

use crate::app::{App, Paths};

#[derive(Parser)]
#[command(
    name = "crtpad",
    about = "Terminal-styled code editor with a persistent document list",
    author,
    version
)]
struct Cli {
    /// Workspace root (defaults to current directory).
    #[arg(long, global = true, value_name = "PATH")]
    workspace: Option<PathBuf>,
    /// Config file (defaults to `<workspace>/.crtpad/config.json`).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Key-value store file, overriding the config.
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,
    /// Raise log verbosity (`-v` info, `-vv` debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List open documents.
    List,
    /// Print the status bar for the active document.
    Status,
    /// Create a document and make it active.
    New(NewArgs),
    /// Open a local file as a new document.
    Open { path: PathBuf },
    /// Close a document; the last one stays open.
    Close { id: String },
    /// Make a document active.
    Switch { id: String },
    /// Print a document's content (active by default).
    Show { id: Option<String> },
    /// Save the active document to disk.
    Export(ExportArgs),
    /// List editor commands the widget can receive.
    Commands,
    /// List available themes.
    Themes,
    /// Print the effective configuration.
    Config {
        /// Write the defaults when no config file exists yet.
        #[arg(long)]
        init: bool,
    },
    /// Draw the editor screen once.
    Render(ViewArgs),
    /// Interactive session reading commands from stdin.
    Shell(ViewArgs),
}

#[derive(Args)]
struct NewArgs {
    /// File name; `untitled-<n>.txt` when omitted.
    #[arg(long)]
    name: Option<String>,
    /// Initial content.
    #[arg(long, requires = "name")]
    content: Option<String>,
    /// Language id overriding the one derived from the name.
    #[arg(long, requires = "name")]
    language: Option<String>,
}

#[derive(Args)]
struct ExportArgs {
    /// Target directory; defaults to the configured export directory.
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,
}

#[derive(Args, Clone, Copy)]
pub struct ViewArgs {
    /// Screen width in columns.
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,
    /// Disable ANSI colours.
    #[arg(long)]
    pub plain: bool,
}

impl ViewArgs {
    pub fn colour(&self) -> bool {
        !self.plain && io::stdout().is_terminal()
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let Cli {
        workspace,
        config,
        store,
        verbose,
        command,
    } = Cli::parse();
    logging::init(verbose);

    let workspace_root = resolve_workspace(workspace)?;
    let paths = Paths::new(workspace_root, config, store);

    match command {
        Commands::Config { init } => execute_config(&paths, init),
        Commands::Commands => {
            list_commands();
            Ok(())
        }
        Commands::List => with_app(&paths, |app| {
            list_documents(app);
            Ok(())
        }),
        Commands::Status => with_app(&paths, |app| {
            let bar = app.status_bar(Instant::now());
            println!("{}", bar.left);
            println!("{}", bar.right);
            Ok(())
        }),
        Commands::New(args) => with_app(&paths, |app| create_document(app, args)),
        Commands::Open { path } => with_app(&paths, |app| open_document(app, &path)),
        Commands::Close { id } => with_app(&paths, |app| close_document(app, &id)),
        Commands::Switch { id } => with_app(&paths, |app| {
            let id = app.resolve_id(&id)?;
            app.workbench.switch(&id);
            println!("Switched to '{}'", app.workbench.registry().active().name());
            Ok(())
        }),
        Commands::Show { id } => with_app(&paths, |app| {
            let content = app.document(id.as_deref())?.content();
            print!("{content}");
            if !content.is_empty() && !content.ends_with('\n') {
                println!();
            }
            Ok(())
        }),
        Commands::Export(args) => with_app(&paths, |app| {
            let out_dir = args.out_dir.map(resolve_input_path).transpose()?;
            let written = app.export_active(Instant::now(), out_dir.as_deref())?;
            println!("Saved {}", written.display());
            Ok(())
        }),
        Commands::Themes => with_app(&paths, |app| {
            list_themes(app);
            Ok(())
        }),
        Commands::Render(view) => with_app(&paths, |app| {
            print!("{}", app.render(Instant::now(), view.width, view.colour()));
            Ok(())
        }),
        Commands::Shell(view) => with_app(&paths, |app| interactive::run(app, view)),
    }
}

/// Opens the session, runs `action` and tears the session down. Teardown
/// drops any autosave still waiting for its quiet period.
fn with_app(paths: &Paths, action: impl FnOnce(&mut App) -> Result<()>) -> Result<()> {
    let mut app = App::open(paths)?;
    let result = action(&mut app);
    app.workbench.shutdown();
    result
}

fn list_documents(app: &App) {
    let registry = app.workbench.registry();
    for document in registry.documents() {
        let marker = if document.id() == registry.active_id() {
            '>'
        } else {
            ' '
        };
        let modified = if document.is_modified() { " *" } else { "" };
        println!(
            "{marker} {:<14} {:<24} {}{modified}",
            document.id().as_str(),
            document.name(),
            document.language()
        );
    }
}

fn create_document(app: &mut App, args: NewArgs) -> Result<()> {
    let id = match args.name {
        Some(name) => {
            let name = name.trim();
            if name.is_empty() {
                bail!("document name must not be empty");
            }
            app.workbench.create(
                name,
                args.content.unwrap_or_default(),
                args.language.as_deref(),
            )
        }
        None => app.workbench.new_file(),
    };
    let document = app.document(Some(id.as_str()))?;
    println!("Created '{}' ({}) as {}", document.name(), document.language(), id);
    Ok(())
}

fn open_document(app: &mut App, path: &Path) -> Result<()> {
    let source = resolve_input_path(path.to_path_buf())?;
    let id = app
        .workbench
        .import_file(&source)
        .with_context(|| format!("failed to open {}", source.display()))?;
    let document = app.document(Some(id.as_str()))?;
    println!(
        "Opened '{}' ({}) as {}",
        document.name(),
        document.language(),
        id
    );
    Ok(())
}

fn close_document(app: &mut App, id: &str) -> Result<()> {
    let id = app.resolve_id(id)?;
    if app.workbench.close(&id) {
        println!(
            "Closed '{id}'; active is now '{}'",
            app.workbench.registry().active().name()
        );
    } else {
        println!("Kept '{id}': the last open document cannot be closed");
    }
    Ok(())
}

fn list_commands() {
    println!("Editor commands:");
    for descriptor in catalogue() {
        let argument = if descriptor.takes_argument { " <arg>" } else { "" };
        println!(
            "  {:<16} {:<22} {}",
            format!("{}{argument}", descriptor.name),
            descriptor.label,
            descriptor.command_id
        );
    }
}

fn list_themes(app: &App) {
    println!("Available themes:");
    for theme in app.themes.themes() {
        let marker = if theme.id == app.prefs.theme { '*' } else { ' ' };
        println!("{marker} {:<16} {}", theme.id, theme.display_name());
    }
}

fn execute_config(paths: &Paths, init: bool) -> Result<()> {
    if init && !paths.config.exists() {
        AppConfig::default()
            .save(&paths.config)
            .with_context(|| format!("failed to write {}", paths.config.display()))?;
        eprintln!("Wrote defaults to {}", paths.config.display());
    }
    let config = AppConfig::load(&paths.config)
        .with_context(|| format!("failed to load config {}", paths.config.display()))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&config).context("failed to serialize config")?
    );
    Ok(())
}

fn resolve_workspace(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => resolve_input_path(path),
        None => std::env::current_dir().context("determine current directory"),
    }
}

fn resolve_input_path(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()
            .context("determine current directory")?
            .join(path))
    }
}
