//! Catalog browser state and key handling.

use crossterm::event::{KeyCode, KeyModifiers};
use showdeck_api::tmdb::TmdbGenre;
use showdeck_catalog::{CatalogView, DiscoverState, LoadOutcome, ViewType};

/// Which pane receives cursor keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    /// Show list.
    Shows,
    /// Genre filter list.
    Genres,
}

/// What a key press asks the event loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserAction {
    /// Nothing beyond a redraw.
    None,
    /// Leave the browser.
    Quit,
    /// Switch the catalog view.
    SetView(ViewType),
    /// Move to another page.
    SetPage(u32),
    /// Toggle one genre ID in the discover filter.
    ToggleGenre(String),
    /// Open a show's TMDB page.
    OpenShow(u64),
}

/// UI-only state: cursors, pane focus and a status line.
#[derive(Debug)]
pub struct BrowserState {
    /// Genres offered by the filter pane.
    pub genres: Vec<TmdbGenre>,
    /// Focused pane.
    pub active_pane: ActivePane,
    /// Cursor in the show list.
    pub show_cursor: usize,
    /// Cursor in the genre list.
    pub genre_cursor: usize,
    /// One-line message shown in the footer.
    pub status: Option<String>,
}

impl BrowserState {
    /// Creates the state with the cursor on the first show.
    #[must_use]
    pub const fn new(genres: Vec<TmdbGenre>) -> Self {
        Self {
            genres,
            active_pane: ActivePane::Shows,
            show_cursor: 0,
            genre_cursor: 0,
            status: None,
        }
    }

    /// Maps a key press to an action, moving cursors as a side effect.
    pub fn handle_key(
        &mut self,
        key: KeyCode,
        modifiers: KeyModifiers,
        discover: &DiscoverState,
        view: &CatalogView,
    ) -> BrowserAction {
        self.status = None;
        match key {
            KeyCode::Char('q') | KeyCode::Esc => BrowserAction::Quit,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => BrowserAction::Quit,
            KeyCode::Tab | KeyCode::BackTab => {
                self.active_pane = match self.active_pane {
                    ActivePane::Shows => ActivePane::Genres,
                    ActivePane::Genres => ActivePane::Shows,
                };
                BrowserAction::None
            }
            KeyCode::Char('v') => self.change_view(discover.view().next()),
            KeyCode::Char('V') => self.change_view(discover.view().prev()),
            KeyCode::Left | KeyCode::Char('h') => match discover.page().checked_sub(1) {
                Some(page) if page >= 1 => self.change_page(page),
                _ => BrowserAction::None,
            },
            KeyCode::Right | KeyCode::Char('l') => {
                if discover.page() < view.page_count() {
                    self.change_page(discover.page().saturating_add(1))
                } else {
                    BrowserAction::None
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor(false, view);
                BrowserAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor(true, view);
                BrowserAction::None
            }
            KeyCode::Char(' ') if self.active_pane == ActivePane::Genres => {
                self.toggle_current_genre(discover)
            }
            KeyCode::Enter if self.active_pane == ActivePane::Shows => view
                .items
                .get(self.show_cursor)
                .map_or(BrowserAction::None, |show| BrowserAction::OpenShow(show.id)),
            _ => BrowserAction::None,
        }
    }

    fn change_view(&mut self, view: ViewType) -> BrowserAction {
        self.show_cursor = 0;
        BrowserAction::SetView(view)
    }

    fn change_page(&mut self, page: u32) -> BrowserAction {
        self.show_cursor = 0;
        BrowserAction::SetPage(page)
    }

    fn toggle_current_genre(&mut self, discover: &DiscoverState) -> BrowserAction {
        if !discover.view().accepts_genres() {
            self.status = Some(String::from("Genre filter applies to Discover only"));
            return BrowserAction::None;
        }
        match self.genres.get(self.genre_cursor) {
            Some(genre) => {
                self.show_cursor = 0;
                BrowserAction::ToggleGenre(genre.id.to_string())
            }
            None => BrowserAction::None,
        }
    }

    fn move_cursor(&mut self, down: bool, view: &CatalogView) {
        let (cursor, len) = match self.active_pane {
            ActivePane::Shows => (&mut self.show_cursor, view.items.len()),
            ActivePane::Genres => (&mut self.genre_cursor, self.genres.len()),
        };
        if down {
            if cursor.saturating_add(1) < len {
                *cursor = cursor.saturating_add(1);
            }
        } else {
            *cursor = cursor.saturating_sub(1);
        }
    }

    /// Keeps the show cursor inside a freshly loaded list.
    pub fn clamp_to(&mut self, view: &CatalogView) {
        let last = view.items.len().saturating_sub(1);
        self.show_cursor = self.show_cursor.min(last);
    }

    /// Applies a finished refresh: clamps the cursor to `view` and reports a
    /// failed fetch in the status line.
    pub fn loaded(&mut self, outcome: &LoadOutcome, view: &CatalogView) {
        self.clamp_to(view);
        if let LoadOutcome::Failed(message) = outcome {
            self.status = Some(format!("Failed to load shows: {message}"));
        }
    }
}
