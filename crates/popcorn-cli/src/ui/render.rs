use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use popcorn_models::MovieDetails;

use super::app::{Focus, ViewModel};

pub fn draw(f: &mut Frame, vm: &ViewModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.size());

    draw_search_bar(f, chunks[0], vm);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    draw_results(f, body[0], vm);
    draw_right_pane(f, body[1], vm);
    draw_status_line(f, chunks[2], vm);
}

fn pane_block(title: &str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title.to_string())
}

fn draw_search_bar(f: &mut Frame, area: Rect, vm: &ViewModel) {
    let mut spans = vec![Span::raw("🔍 "), Span::raw(vm.search.query.as_str())];
    if vm.focus == Focus::Search {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    let bar = Paragraph::new(Line::from(spans))
        .block(pane_block("Search", vm.focus == Focus::Search));
    f.render_widget(bar, area);
}

fn draw_results(f: &mut Frame, area: Rect, vm: &ViewModel) {
    let focused = vm.focus == Focus::Results;

    if vm.search.loading {
        let loading = Paragraph::new("Loading...").block(pane_block("Results", focused));
        f.render_widget(loading, area);
        return;
    }

    if let Some(message) = &vm.search.error {
        let error = Paragraph::new(Line::from(vec![
            Span::raw("⛔ "),
            Span::styled(message.as_str(), Style::default().fg(Color::Red)),
        ]))
        .wrap(Wrap { trim: true })
        .block(pane_block("Results", focused));
        f.render_widget(error, area);
        return;
    }

    let title = format!("Found {} results", vm.search.results.len());
    let items: Vec<ListItem> = vm
        .search
        .results
        .iter()
        .map(|movie| ListItem::new(format!("{} ({})", movie.title, movie.year)))
        .collect();

    let list = List::new(items)
        .block(pane_block(&title, focused))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if focused && !vm.search.results.is_empty() {
        state.select(Some(vm.results_index));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_right_pane(f: &mut Frame, area: Rect, vm: &ViewModel) {
    if vm.details.loading {
        let loading = Paragraph::new("Loading...").block(pane_block("Details", false));
        f.render_widget(loading, area);
        return;
    }

    if let Some(message) = &vm.details.error {
        let error = Paragraph::new(Line::from(vec![
            Span::raw("⛔ "),
            Span::styled(message.as_str(), Style::default().fg(Color::Red)),
        ]))
        .wrap(Wrap { trim: true })
        .block(pane_block("Details", false));
        f.render_widget(error, area);
        return;
    }

    if let Some(movie) = &vm.details.movie {
        draw_details_card(f, area, vm, movie);
        return;
    }

    draw_watched_pane(f, area, vm);
}

fn draw_details_card(f: &mut Frame, area: Rect, vm: &ViewModel, movie: &MovieDetails) {
    let runtime = match movie.runtime_minutes {
        Some(minutes) => format!("{} min", minutes),
        None => "N/A".to_string(),
    };
    let imdb_rating = match movie.imdb_rating {
        Some(rating) => rating.to_string(),
        None => "N/A".to_string(),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            movie.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{} · {}", movie.released, runtime)),
        Line::from(movie.genre.as_str()),
        Line::from(format!("⭐ {} IMDb rating", imdb_rating)),
        Line::default(),
        Line::from(movie.plot.as_str()),
        Line::default(),
        Line::from(format!("Starring {}", movie.actors)),
        Line::from(format!("Directed by {}", movie.director)),
        Line::default(),
    ];

    match vm.existing_rating {
        Some(rating) => {
            lines.push(Line::from(format!("You rated this movie {} ⭐", rating)));
        }
        None => {
            let staged = vm.staged_rating.unwrap_or(0);
            let stars = format!(
                "{}{}",
                "★".repeat(staged as usize),
                "☆".repeat(vm.max_rating.saturating_sub(staged) as usize)
            );
            let hint = match vm.staged_rating {
                Some(rating) => format!("{} {}/{} · press w to add", stars, rating, vm.max_rating),
                None => format!("{} rate it: 1-9, 0 for 10", stars),
            };
            lines.push(Line::from(Span::styled(
                hint,
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(pane_block("Details", false));
    f.render_widget(card, area);
}

fn draw_watched_pane(f: &mut Frame, area: Rect, vm: &ViewModel) {
    let focused = vm.focus == Focus::Watched;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let summary = Paragraph::new(vec![
        Line::from(format!("# {} movies", vm.stats.count)),
        Line::from(format!(
            "⭐ {}  🌟 {}  ⏳ {} min",
            mean_label(vm.stats.mean_imdb_rating),
            mean_label(vm.stats.mean_user_rating),
            mean_label(vm.stats.mean_runtime_minutes),
        )),
    ])
    .block(pane_block("Movies you watched", false));
    f.render_widget(summary, chunks[0]);

    let items: Vec<ListItem> = vm
        .watched
        .iter()
        .map(|entry| {
            ListItem::new(format!(
                "{} · ⭐ {} · 🌟 {}",
                entry.title,
                entry
                    .imdb_rating
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "–".to_string()),
                entry.user_rating,
            ))
        })
        .collect();

    let list = List::new(items)
        .block(pane_block("Watched", focused))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if focused && !vm.watched.is_empty() {
        state.select(Some(vm.watched_index));
    }
    f.render_stateful_widget(list, chunks[1], &mut state);
}

fn draw_status_line(f: &mut Frame, area: Rect, vm: &ViewModel) {
    let line = match &vm.status {
        Some(status) => Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(
            "Tab focus · ↑↓ move · Space open · 1-9 rate · w save · x remove · Esc close · q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn mean_label(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => "–".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use popcorn_core::{DetailsState, SearchState};
    use popcorn_models::{MovieSummary, WatchedEntry, WatchedStats};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn create_view_model() -> ViewModel {
        ViewModel {
            search: SearchState::default(),
            details: DetailsState::default(),
            watched: Vec::new(),
            stats: WatchedStats::from_entries(&[]),
            focus: Focus::Search,
            results_index: 0,
            watched_index: 0,
            staged_rating: None,
            existing_rating: None,
            status: None,
            max_rating: 10,
        }
    }

    fn create_summary(imdb_id: &str, title: &str) -> MovieSummary {
        MovieSummary {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year: "2010".to_string(),
            poster_url: "https://example.com/poster.jpg".to_string(),
        }
    }

    fn render_to_text(vm: &ViewModel) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, vm)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_results_list_shows_count_and_titles() {
        let mut vm = create_view_model();
        vm.search.results = vec![
            create_summary("tt1375666", "Inception"),
            create_summary("tt0816692", "Interstellar"),
        ];

        let text = render_to_text(&vm);

        assert!(text.contains("Found 2 results"));
        assert!(text.contains("Inception (2010)"));
        assert!(text.contains("Interstellar (2010)"));
    }

    #[test]
    fn test_search_error_is_rendered() {
        let mut vm = create_view_model();
        vm.search.error = Some("Movie not found!".to_string());

        let text = render_to_text(&vm);

        assert!(text.contains("⛔"));
        assert!(text.contains("Movie not found!"));
    }

    #[test]
    fn test_loading_state_is_rendered() {
        let mut vm = create_view_model();
        vm.search.loading = true;

        let text = render_to_text(&vm);

        assert!(text.contains("Loading..."));
    }

    #[test]
    fn test_watched_summary_shows_stats() {
        let mut vm = create_view_model();
        let entry = WatchedEntry {
            imdb_id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            poster_url: "https://example.com/poster.jpg".to_string(),
            imdb_rating: Some(8.8),
            runtime_minutes: Some(148),
            user_rating: 8,
            added_at: Utc::now(),
        };
        vm.stats = WatchedStats::from_entries(std::slice::from_ref(&entry));
        vm.watched = vec![entry];

        let text = render_to_text(&vm);

        assert!(text.contains("# 1 movies"));
        assert!(text.contains("8.8"));
        assert!(text.contains("Movies you watched"));
    }

    #[test]
    fn test_details_card_shows_rating_prompt() {
        let mut vm = create_view_model();
        vm.details.movie = Some(MovieDetails {
            imdb_id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            poster_url: "https://example.com/poster.jpg".to_string(),
            runtime_minutes: Some(148),
            imdb_rating: Some(8.8),
            plot: "A thief who steals corporate secrets.".to_string(),
            released: "16 Jul 2010".to_string(),
            actors: "Leonardo DiCaprio".to_string(),
            director: "Christopher Nolan".to_string(),
            genre: "Action, Sci-Fi".to_string(),
        });
        vm.staged_rating = Some(8);

        let text = render_to_text(&vm);

        assert!(text.contains("Inception"));
        assert!(text.contains("148 min"));
        assert!(text.contains("Directed by Christopher Nolan"));
        assert!(text.contains("8/10"));
    }

    #[test]
    fn test_details_card_shows_existing_rating() {
        let mut vm = create_view_model();
        vm.details.movie = Some(MovieDetails {
            imdb_id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            poster_url: "https://example.com/poster.jpg".to_string(),
            runtime_minutes: Some(148),
            imdb_rating: Some(8.8),
            plot: String::new(),
            released: "16 Jul 2010".to_string(),
            actors: String::new(),
            director: String::new(),
            genre: String::new(),
        });
        vm.existing_rating = Some(9);

        let text = render_to_text(&vm);

        assert!(text.contains("You rated this movie 9"));
    }
}
