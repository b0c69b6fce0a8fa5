use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use crtpad_commands::{
    CommandDispatcher, CommandTable, DispatchOutcome, EditorAction, SET_THEME_COMMAND,
};
use crtpad_core::{AutosaveTimings, Document, DocumentId, StorageKeys, Workbench};
use crtpad_settings::{AppConfig, EditorPreferences, ThemeCatalogue};
use crtpad_shell::{Screen, StatusBar};
use crtpad_storage::FileStore;

const STATE_DIR: &str = ".crtpad";

/// Filesystem locations for one workspace.
#[derive(Debug, Clone)]
pub struct Paths {
    pub workspace: PathBuf,
    pub config: PathBuf,
    /// Explicit store override; otherwise the config decides.
    pub store: Option<PathBuf>,
}

impl Paths {
    pub fn new(workspace: PathBuf, config: Option<PathBuf>, store: Option<PathBuf>) -> Self {
        let config = config
            .map(|path| resolve_against(&workspace, path))
            .unwrap_or_else(|| workspace.join(STATE_DIR).join("config.json"));
        let store = store.map(|path| resolve_against(&workspace, path));
        Self {
            workspace,
            config,
            store,
        }
    }

    pub fn theme_dir(&self) -> PathBuf {
        self.workspace.join(STATE_DIR).join("themes")
    }

    fn store_path(&self, config: &AppConfig) -> PathBuf {
        if let Some(path) = &self.store {
            return path.clone();
        }
        match &config.storage.file {
            Some(path) => resolve_against(&self.workspace, path.clone()),
            None => self.workspace.join(STATE_DIR).join("storage.json"),
        }
    }

    fn export_dir(&self, config: &AppConfig) -> PathBuf {
        match &config.export_dir {
            Some(path) => resolve_against(&self.workspace, path.clone()),
            None => self.workspace.clone(),
        }
    }
}

fn resolve_against(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// One editor session: the workbench plus the session preferences, the
/// theme catalogue and the widget command shim.
pub struct App {
    pub workbench: Workbench<FileStore>,
    pub prefs: EditorPreferences,
    pub themes: ThemeCatalogue,
    pub config: AppConfig,
    dispatcher: CommandDispatcher,
    applied_theme: Rc<RefCell<String>>,
    export_dir: PathBuf,
}

impl App {
    pub fn open(paths: &Paths) -> Result<Self> {
        let config = AppConfig::load(&paths.config)
            .with_context(|| format!("failed to load config {}", paths.config.display()))?;
        let (themes, skipped) = ThemeCatalogue::load_from_dir(paths.theme_dir())
            .map_err(|err| anyhow!("failed to load built-in themes: {err}"))?;
        for err in &skipped {
            tracing::warn!(error = %err, "skipping theme file");
        }

        let store_path = paths.store_path(&config);
        if let Some(parent) = store_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let store = FileStore::open_or_reset(&store_path)
            .with_context(|| format!("failed to open store {}", store_path.display()))?;

        let keys = StorageKeys {
            documents: config.storage.files_key.clone(),
            active: config.storage.active_key.clone(),
        };
        let timings = AutosaveTimings {
            quiet_period: config.autosave.quiet_period(),
            autosave_indicator: config.autosave.autosave_indicator(),
            save_indicator: config.autosave.save_indicator(),
        };
        let workbench = Workbench::open(store, keys, timings);

        let mut prefs = config.editor.clone();
        if !themes.contains(&prefs.theme) {
            tracing::warn!(theme = %prefs.theme, "configured theme is unknown; using default");
            prefs.set_theme(crtpad_settings::DEFAULT_THEME);
        }

        let applied_theme = Rc::new(RefCell::new(prefs.theme.clone()));
        let mut widget = CommandTable::new();
        let sink = Rc::clone(&applied_theme);
        widget.register(SET_THEME_COMMAND, move |argument: Option<&str>| {
            if let Some(theme) = argument {
                *sink.borrow_mut() = theme.to_string();
            }
        });
        let mut dispatcher = CommandDispatcher::new();
        dispatcher.attach(widget);

        Ok(Self {
            workbench,
            prefs,
            themes,
            export_dir: paths.export_dir(&config),
            config,
            dispatcher,
            applied_theme,
        })
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn resolve_id(&self, id: &str) -> Result<DocumentId> {
        let id = DocumentId::from(id);
        if !self.workbench.registry().contains(&id) {
            bail!("document '{id}' was not found");
        }
        Ok(id)
    }

    pub fn document(&self, id: Option<&str>) -> Result<&Document> {
        let registry = self.workbench.registry();
        match id {
            Some(id) => {
                let id = self.resolve_id(id)?;
                registry
                    .get(&id)
                    .ok_or_else(|| anyhow!("document '{id}' was not found"))
            }
            None => Ok(registry.active()),
        }
    }

    /// Forwards an action to the widget. A theme switch is checked against
    /// the catalogue first and mirrored into the session preferences.
    pub fn dispatch(&mut self, action: &EditorAction) -> Result<DispatchOutcome> {
        if let EditorAction::SetTheme(name) = action {
            if !self.themes.contains(name) {
                let known: Vec<_> = self.themes.ids().collect();
                bail!("theme '{name}' is unknown (available: {})", known.join(", "));
            }
        }
        let outcome = self.dispatcher.dispatch(action);
        let applied = self.applied_theme.borrow().clone();
        if applied != self.prefs.theme {
            self.prefs.set_theme(applied);
        }
        Ok(outcome)
    }

    pub fn apply_theme(&mut self, name: &str) -> Result<()> {
        self.dispatch(&EditorAction::SetTheme(name.to_string()))?;
        Ok(())
    }

    pub fn status_bar(&self, now: Instant) -> StatusBar {
        StatusBar::compose(
            self.workbench.registry().active(),
            &self.prefs,
            self.workbench.saved_indicator_visible(now),
        )
    }

    pub fn render(&self, now: Instant, width: usize, colour: bool) -> String {
        let registry = self.workbench.registry();
        let mut screen = Screen::new(registry.documents(), registry.active_id(), &self.prefs);
        screen.width = width;
        screen.autosaved_visible = self.workbench.saved_indicator_visible(now);
        if colour {
            screen.palette = self.themes.palette(&self.prefs.theme);
        }
        screen.render()
    }

    /// Writes the active document into the export directory.
    pub fn export_active(&mut self, now: Instant, out_dir: Option<&Path>) -> Result<PathBuf> {
        let dir = out_dir.unwrap_or(self.export_dir.as_path());
        self.workbench.save_active(now, |artifact| {
            artifact
                .write_into(dir)
                .with_context(|| format!("failed to export '{}'", artifact.file_name))
        })
    }
}
