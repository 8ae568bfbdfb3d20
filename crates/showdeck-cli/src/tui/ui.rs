//! Rendering for the catalog browser.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Tabs};
use showdeck_catalog::display::{display_name, release_year};
use showdeck_catalog::{CatalogView, DiscoverState, DiscoverUrlState, ViewType};

use super::state::{ActivePane, BrowserState};

/// Everything one frame needs.
pub struct Screen<'a> {
    /// Cursors and focus.
    pub browser: &'a BrowserState,
    /// Coordinator state.
    pub discover: &'a DiscoverState,
    /// Last published view.
    pub view: &'a CatalogView,
    /// Language whose shows display under their original name.
    pub display_language: &'a str,
}

/// Draws the browser.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, screen: &Screen<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // view tabs
            Constraint::Min(5),    // panes
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_tabs(frame, chunks[0], screen);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(chunks[1]);
    draw_genres(frame, panes[0], screen);
    draw_shows(frame, panes[1], screen);

    draw_footer(frame, chunks[2], screen);
}

fn pane_border(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_tabs(frame: &mut Frame, area: Rect, screen: &Screen<'_>) {
    let titles: Vec<&str> = ViewType::ALL.iter().map(|v| v.label()).collect();
    let selected = ViewType::ALL
        .iter()
        .position(|v| *v == screen.discover.view())
        .unwrap_or_default();
    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title(" showdeck "));
    frame.render_widget(tabs, area);
}

fn draw_genres(frame: &mut Frame, area: Rect, screen: &Screen<'_>) {
    let active = screen.browser.active_pane == ActivePane::Genres;
    let applies = screen.discover.view().accepts_genres();
    let filter = screen.discover.genres();

    let items: Vec<ListItem> = screen
        .browser
        .genres
        .iter()
        .enumerate()
        .map(|(i, genre)| {
            let checked = filter.contains(&genre.id.to_string());
            let checkbox = if checked { "[x]" } else { "[ ]" };
            let style = if active && i == screen.browser.genre_cursor {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if !applies {
                Style::default().fg(Color::DarkGray)
            } else if checked {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(
                format!(" {checkbox} {}", genre.name),
                style,
            )))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(pane_border(active))
            .title(" Genres "),
    );
    frame.render_widget(list, area);
}

fn draw_shows(frame: &mut Frame, area: Rect, screen: &Screen<'_>) {
    let active = screen.browser.active_pane == ActivePane::Shows;
    let view = screen.view;
    let title = format!(
        " {} | page {}/{} | {} results ",
        screen.discover.view().label(),
        screen.discover.page(),
        view.page_count(),
        view.total_results
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(pane_border(active))
        .title(title);

    if view.is_loading {
        frame.render_widget(Paragraph::new(" Loading...").block(block), area);
        return;
    }
    if view.is_empty() {
        frame.render_widget(Paragraph::new(" No TV shows found.").block(block), area);
        return;
    }

    let items: Vec<ListItem> = view
        .items
        .iter()
        .enumerate()
        .map(|(i, show)| {
            let selected = active && i == screen.browser.show_cursor;
            let marker = if selected { "\u{25b8} " } else { "  " };
            let style = if selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let year = release_year(show).map_or_else(|| String::from("----"), |y| y.to_string());
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    format!(
                        "{year}  {:>4.1}  {}",
                        show.vote_average,
                        display_name(show, screen.display_language)
                    ),
                    style,
                ),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, screen: &Screen<'_>) {
    let href = DiscoverUrlState::from_state(screen.discover).to_href();
    let text = screen.browser.status.as_ref().map_or_else(
        || {
            format!(
                "{href} | Tab: pane | v/V: view | \u{2190}/\u{2192}: page | Space: genre | Enter: open | q: quit"
            )
        },
        Clone::clone,
    );
    let footer = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
