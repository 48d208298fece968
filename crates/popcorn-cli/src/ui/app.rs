use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use popcorn_core::{DetailsState, SearchState, Session};
use popcorn_models::{WatchedEntry, WatchedStats};
use tokio::sync::mpsc;
use tracing::debug;

use super::keys::{Action, KeyBindings};
use super::render;
use super::term::TermGuard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Results,
    Watched,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Search => Focus::Results,
            Focus::Results => Focus::Watched,
            Focus::Watched => Focus::Search,
        }
    }
}

/// Immutable snapshot handed to the renderer. Taken once per frame so the
/// draw closure never touches the async state.
pub struct ViewModel {
    pub search: SearchState,
    pub details: DetailsState,
    pub watched: Vec<WatchedEntry>,
    pub stats: WatchedStats,
    pub focus: Focus,
    pub results_index: usize,
    pub watched_index: usize,
    pub staged_rating: Option<u8>,
    pub existing_rating: Option<u8>,
    pub status: Option<String>,
    pub max_rating: u8,
}

pub async fn run(session: Session) -> Result<()> {
    let mut guard = TermGuard::acquire()?;
    guard.set_title("popcorn");

    let app = BrowseApp::new(session);
    app.event_loop(&mut guard).await
}

struct BrowseApp {
    session: Session,
    global: KeyBindings,
    scoped: KeyBindings,
    focus: Focus,
    results_index: usize,
    watched_index: usize,
    staged_rating: Option<u8>,
    status: Option<String>,
    open_title: Option<String>,
    should_quit: bool,
}

impl BrowseApp {
    fn new(session: Session) -> Self {
        // Global keys work everywhere; scoped keys only outside the search
        // box, where printable characters belong to the query.
        let mut global = KeyBindings::new();
        global.bind("ctrl-c", Action::Quit);
        global.bind("Escape", Action::CloseOrQuit);
        global.bind("Enter", Action::FocusSearch);
        global.bind("Tab", Action::CycleFocus);

        let mut scoped = KeyBindings::new();
        scoped.bind("q", Action::Quit);
        scoped.bind("Up", Action::MoveUp);
        scoped.bind("Down", Action::MoveDown);
        scoped.bind("Space", Action::OpenSelected);
        scoped.bind("Right", Action::OpenSelected);
        scoped.bind("Delete", Action::RemoveWatched);
        scoped.bind("x", Action::RemoveWatched);
        scoped.bind("w", Action::CommitRating);

        Self {
            session,
            global,
            scoped,
            focus: Focus::Search,
            results_index: 0,
            watched_index: 0,
            staged_rating: None,
            status: None,
            open_title: None,
            should_quit: false,
        }
    }

    async fn event_loop(mut self, guard: &mut TermGuard) -> Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(64);
        tokio::task::spawn_blocking(move || loop {
            if tx.is_closed() {
                break;
            }
            match event::poll(Duration::from_millis(100)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.blocking_send(ev).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => continue,
                Err(_) => break,
            }
        });

        let mut changes = self.session.subscribe();
        let mut needs_redraw = true;

        loop {
            if needs_redraw {
                let vm = self.view_model().await;
                self.sync_title(guard, &vm);
                guard.terminal().draw(|f| render::draw(f, &vm))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                maybe_event = rx.recv() => {
                    match maybe_event {
                        Some(event) => needs_redraw = self.handle_event(event).await,
                        None => break,
                    }
                }
                changed = changes.changed() => {
                    if changed.is_ok() {
                        needs_redraw = true;
                    }
                }
            }
        }

        debug!("Interactive session ended");
        Ok(())
    }

    async fn view_model(&mut self) -> ViewModel {
        let search = self.session.search().state().await;
        let details = self.session.details().state().await;
        let watched = self.session.watched().entries().await;
        let stats = self.session.watched().stats().await;

        // Keep the cursors inside whatever the lists hold now.
        if self.results_index >= search.results.len() {
            self.results_index = search.results.len().saturating_sub(1);
        }
        if self.watched_index >= watched.len() {
            self.watched_index = watched.len().saturating_sub(1);
        }

        let existing_rating = match &details.movie {
            Some(movie) => self.session.watched().user_rating_for(&movie.imdb_id).await,
            None => None,
        };

        ViewModel {
            search,
            details,
            watched,
            stats,
            focus: self.focus,
            results_index: self.results_index,
            watched_index: self.watched_index,
            staged_rating: self.staged_rating,
            existing_rating,
            status: self.status.clone(),
            max_rating: self.session.max_rating(),
        }
    }

    /// Sets the terminal title to the open movie and restores it on close.
    fn sync_title(&mut self, guard: &mut TermGuard, vm: &ViewModel) {
        let wanted = vm
            .details
            .movie
            .as_ref()
            .map(|movie| format!("Movie | {}", movie.title));
        if wanted != self.open_title {
            match &wanted {
                Some(title) => guard.set_title(title),
                None => guard.set_title("popcorn"),
            }
            self.open_title = wanted;
        }
    }

    async fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key).await,
            Event::Resize(_, _) => true,
            _ => false,
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) -> bool {
        if let Some(action) = self.global.lookup(&key) {
            return self.dispatch(action).await;
        }

        if self.focus == Focus::Search {
            return self.handle_search_key(key).await;
        }

        if let KeyCode::Char(c @ '0'..='9') = key.code {
            return self.stage_rating(c).await;
        }

        if let Some(action) = self.scoped.lookup(&key) {
            return self.dispatch(action).await;
        }

        false
    }

    async fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.should_quit = true;
                true
            }
            Action::CloseOrQuit => self.close_or_quit().await,
            Action::FocusSearch => self.refocus_search().await,
            Action::CycleFocus => {
                self.focus = self.focus.next();
                true
            }
            Action::MoveUp => self.move_cursor(-1).await,
            Action::MoveDown => self.move_cursor(1).await,
            Action::OpenSelected => self.open_highlighted().await,
            Action::RemoveWatched => self.remove_highlighted().await,
            Action::CommitRating => self.commit_rating().await,
        }
    }

    async fn handle_search_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut query = self.session.search().state().await.query;
                query.push(c);
                self.session.set_query(&query).await;
                self.results_index = 0;
                self.staged_rating = None;
                true
            }
            KeyCode::Backspace => {
                let mut query = self.session.search().state().await.query;
                if query.pop().is_some() {
                    self.session.set_query(&query).await;
                    self.results_index = 0;
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Escape: close the open movie, or quit when none is open.
    async fn close_or_quit(&mut self) -> bool {
        if self.session.selection().selected().await.is_some() {
            self.session.close_details().await;
            self.staged_rating = None;
            self.status = None;
        } else {
            self.should_quit = true;
        }
        true
    }

    /// Enter: jump back to the search box and start a fresh query, unless
    /// the user is already typing there.
    async fn refocus_search(&mut self) -> bool {
        if self.focus == Focus::Search {
            return false;
        }
        self.focus = Focus::Search;
        self.staged_rating = None;
        self.session.set_query("").await;
        true
    }

    async fn move_cursor(&mut self, delta: i32) -> bool {
        match self.focus {
            Focus::Search => false,
            Focus::Results => {
                let len = self.session.search().state().await.results.len();
                step_cursor(&mut self.results_index, delta, len)
            }
            Focus::Watched => {
                let len = self.session.watched().entries().await.len();
                step_cursor(&mut self.watched_index, delta, len)
            }
        }
    }

    async fn open_highlighted(&mut self) -> bool {
        if self.focus != Focus::Results {
            return false;
        }
        let results = self.session.search().state().await.results;
        let Some(movie) = results.get(self.results_index) else {
            return false;
        };
        self.staged_rating = None;
        self.status = None;
        self.session.select(&movie.imdb_id).await;
        true
    }

    async fn remove_highlighted(&mut self) -> bool {
        if self.focus != Focus::Watched {
            return false;
        }
        let entries = self.session.watched().entries().await;
        let Some(entry) = entries.get(self.watched_index) else {
            return false;
        };
        match self.session.watched().remove(&entry.imdb_id).await {
            Ok(_) => self.status = Some(format!("Removed {}", entry.title)),
            Err(e) => self.status = Some(e.to_string()),
        }
        true
    }

    async fn stage_rating(&mut self, digit: char) -> bool {
        let Some(movie) = self.session.details().state().await.movie else {
            return false;
        };
        // An already-rated movie shows its stored rating; rating keys are dead.
        if self
            .session
            .watched()
            .user_rating_for(&movie.imdb_id)
            .await
            .is_some()
        {
            return false;
        }
        let value = match digit.to_digit(10) {
            Some(0) => 10,
            Some(d) => d as u8,
            None => return false,
        };
        let max = self.session.max_rating();
        if value > max {
            self.status = Some(format!("Rating must be between 1 and {}", max));
        } else {
            self.staged_rating = Some(value);
            self.status = None;
        }
        true
    }

    async fn commit_rating(&mut self) -> bool {
        let Some(rating) = self.staged_rating else {
            self.status = Some("Pick a rating first: 1-9, or 0 for 10".to_string());
            return true;
        };
        match self.session.add_to_watched(rating).await {
            Ok(entry) => {
                self.status = Some(format!("Added {} ({} ★)", entry.title, entry.user_rating));
                self.staged_rating = None;
            }
            Err(e) => self.status = Some(e.to_string()),
        }
        true
    }
}

fn step_cursor(index: &mut usize, delta: i32, len: usize) -> bool {
    if len == 0 {
        return false;
    }
    let current = (*index).min(len - 1);
    let next = if delta < 0 {
        current.saturating_sub(delta.unsigned_abs() as usize)
    } else {
        (current + delta as usize).min(len - 1)
    };
    *index = next;
    true
}
