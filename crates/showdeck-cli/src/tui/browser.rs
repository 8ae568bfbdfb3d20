//! Catalog browser main loop.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use showdeck_api::tmdb::{LocalTmdbApi, TmdbGenre};
use showdeck_catalog::{CatalogKey, CatalogView, DiscoverQueryCoordinator, DiscoverState};

use super::state::{BrowserAction, BrowserState};
use super::ui::{self, Screen};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

const TMDB_TV_URL: &str = "https://www.themoviedb.org/tv/";

/// Runs the interactive browser until the user quits.
///
/// Every key press that changes the view, page or genre filter goes through
/// `coordinator`, which is refreshed before the next frame.
///
/// # Errors
///
/// Returns an error if terminal setup, drawing or event handling fails.
#[allow(clippy::future_not_send)]
pub async fn run_browser<A: LocalTmdbApi>(
    coordinator: &DiscoverQueryCoordinator<A>,
    genres: Vec<TmdbGenre>,
    display_language: &str,
) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout)).context("failed to create terminal")?;

    let mut state = BrowserState::new(genres);
    let result = run_event_loop(&mut terminal, &mut state, coordinator, display_language).await;

    // Restore the terminal even if the loop failed
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

fn redraw(
    terminal: &mut Term,
    state: &BrowserState,
    discover: &DiscoverState,
    view: &CatalogView,
    display_language: &str,
) -> Result<()> {
    terminal
        .draw(|frame| {
            ui::draw(
                frame,
                &Screen {
                    browser: state,
                    discover,
                    view,
                    display_language,
                },
            );
        })
        .context("failed to draw TUI")?;
    Ok(())
}

#[allow(clippy::future_not_send)]
async fn run_event_loop<A: LocalTmdbApi>(
    terminal: &mut Term,
    state: &mut BrowserState,
    coordinator: &DiscoverQueryCoordinator<A>,
    display_language: &str,
) -> Result<()> {
    let mut loaded: Option<CatalogKey> = None;

    loop {
        let discover = coordinator.state();
        let wanted = discover.key();
        if loaded.as_ref() != Some(&wanted) {
            redraw(terminal, state, &discover, &CatalogView::loading(), display_language)?;
            let outcome = coordinator.refresh().await;
            state.loaded(&outcome, &coordinator.current_view());
            loaded = Some(wanted);
        }

        let view = coordinator.current_view();
        redraw(terminal, state, &discover, &view, display_language)?;

        if !event::poll(Duration::from_millis(100)).context("failed to poll events")? {
            continue;
        }
        let Event::Key(key) = event::read().context("failed to read event")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let action = state.handle_key(key.code, key.modifiers, &discover, &view);
        match action {
            BrowserAction::Quit => return Ok(()),
            BrowserAction::SetView(next) => coordinator.set_view(next),
            BrowserAction::SetPage(page) => coordinator.set_page(page),
            BrowserAction::ToggleGenre(id) => coordinator.toggle_genre(&id),
            BrowserAction::OpenShow(id) => {
                let url = format!("{TMDB_TV_URL}{id}");
                if let Err(e) = open::that(&url) {
                    state.status = Some(format!("failed to open {url}: {e}"));
                }
            }
            BrowserAction::None => {}
        }
    }
}
