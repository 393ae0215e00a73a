use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::compose::{Composer, MentionCommit, SearchRequest, SearchWorker};
use crate::io::watcher::UsersWatcher;
use crate::io::workspace_io::{self, discover_workspace, load_workspace};
use crate::logging;
use crate::model::user::MentionableUser;
use crate::ops::directory::{DirectorySource, SharedUsers};

use super::input;
use super::render;
use super::theme::Theme;

/// Main application state
pub struct App {
    pub workspace_name: String,
    /// Known-users snapshot, shared with the search threads
    pub users: SharedUsers,
    pub composer: Composer,
    pub theme: Theme,
    /// Messages submitted in this session, oldest first
    pub messages: Vec<String>,
    /// One-shot status line text (replaces the key hints until the next key)
    pub status: Option<String>,
    pub should_quit: bool,
    /// Where the suggestion popup was last drawn, for click hit-testing
    pub popup_area: Option<Rect>,
    /// Searches requested by the composer, not yet handed to the worker
    pub outbox: Vec<SearchRequest>,
}

impl App {
    pub fn new(workspace_name: String, users: SharedUsers, composer: Composer, theme: Theme) -> Self {
        App {
            workspace_name,
            users,
            composer,
            theme,
            messages: Vec::new(),
            status: None,
            should_quit: false,
            popup_area: None,
            outbox: Vec::new(),
        }
    }

    /// Remember a search the composer asked for
    pub fn queue(&mut self, request: Option<SearchRequest>) {
        if let Some(request) = request {
            self.outbox.push(request);
        }
    }

    pub fn take_requests(&mut self) -> Vec<SearchRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Copy of the known users (empty if the lock is poisoned)
    pub fn users_snapshot(&self) -> Vec<MentionableUser> {
        self.users.read().map(|u| u.to_vec()).unwrap_or_default()
    }

    /// Host side of a committed mention
    pub fn on_mention(&mut self, commit: &MentionCommit) {
        info!(
            user = %commit.user.id,
            mentioned = commit.mentioned.len(),
            "mention committed"
        );
        let names: Vec<&str> = commit.mentioned.iter().map(|u| u.label()).collect();
        self.status = Some(format!("mentioning {}", names.join(", ")));
    }

    /// Send the current text to the message list and start a fresh draft
    pub fn submit(&mut self) {
        let text = self.composer.text().trim_end().to_string();
        if text.trim().is_empty() {
            return;
        }
        info!(
            chars = text.len(),
            mentioned = self.composer.mentioned().len(),
            "message submitted"
        );
        self.messages.push(text);
        self.composer.clear();
        self.status = None;
    }

    /// Re-read the known-users snapshot after it changed on disk
    pub fn reload_users(&mut self, path: &Path) {
        match workspace_io::load_users(path) {
            Ok(users) => {
                let count = users.len();
                match self.users.write() {
                    Ok(mut guard) => *guard = users,
                    Err(_) => {
                        warn!("user directory lock poisoned; keeping old snapshot");
                        return;
                    }
                }
                info!(count, path = %path.display(), "reloaded known users");
                self.status = Some(format!("reloaded {} users", count));
            }
            Err(e) => {
                warn!(error = %e, "could not reload known users");
                self.status = Some(format!("users not reloaded: {}", e));
            }
        }
    }
}

/// Run the TUI composer
pub fn run(workspace_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = match workspace_dir {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let root = discover_workspace(&start)?;
    let workspace = load_workspace(&root)?;
    logging::init_tui(&root.join("mention.log"))?;

    let composer_config = &workspace.config.composer;
    let users: SharedUsers = Arc::new(RwLock::new(workspace.users.clone()));
    let source = DirectorySource::new(Arc::clone(&users), composer_config.max_suggestions);
    let mut worker = SearchWorker::new(Arc::new(source), composer_config.search_timeout())?;
    let watcher = match UsersWatcher::start(&workspace.users_path) {
        Ok(w) => Some(w),
        Err(e) => {
            warn!(error = %e, "not watching users file");
            None
        }
    };

    let mut app = App::new(
        workspace.name(),
        users,
        Composer::from_config(composer_config),
        Theme::from_config(&workspace.config.ui),
    );
    info!(root = %root.display(), users = workspace.users.len(), "composer started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    let result = run_event_loop(
        &mut terminal,
        &mut app,
        &mut worker,
        watcher.as_ref(),
        &workspace.users_path,
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &mut SearchWorker,
    watcher: Option<&UsersWatcher>,
    users_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }

        for request in app.take_requests() {
            worker.submit(request);
        }
        for outcome in worker.poll() {
            app.composer.apply_results(outcome.seq, outcome.result);
        }
        if watcher.is_some_and(UsersWatcher::changed) {
            app.reload_users(users_path);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
