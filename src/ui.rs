use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::browser::InputMode;
use crate::logo::LogoArt;
use crate::state::{AppState, FetchStatus, LeagueSource, Screen, TeamDetail, TeamId, TeamRecord, league_id_label};

pub const CARD_WIDTH: u16 = 24;
pub const CARD_HEIGHT: u16 = 8;
const LOGO_HEIGHT: u16 = 4;
/// Borders plus one line for the name.
const MIN_CARD_HEIGHT: u16 = 3;

pub const LOADING_TEXT: &str = "Loading...";
pub const TEAMS_ERROR_TEXT: &str = "Error fetching teams";
pub const TEAM_ERROR_TEXT: &str = "Error fetching team";
const SEARCH_PLACEHOLDER: &str = "Search teams...";

/// Number of card columns that fit in `width` terminal cells.
pub fn grid_columns(width: u16) -> usize {
    (width / CARD_WIDTH).max(1) as usize
}

pub fn draw(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match state.screen {
        Screen::Teams => render_teams(frame, chunks[1], state),
        Screen::Team { id } => render_team(frame, chunks[1], state, id),
    }

    frame.render_widget(Paragraph::new(footer_line(state)), chunks[2]);

    if state.screen == Screen::Teams
        && let LeagueSource::Selected(_) = state.browser.source()
    {
        render_league_badge(frame, chunks[1], state);
    }

    if state.help_overlay {
        let area = frame.size();
        render_help_overlay(frame, area);
    }
}

fn header_text(state: &AppState) -> String {
    let league = league_id_label(state.current_league());
    let mut title = match state.screen {
        Screen::Teams => format!("EXPLORE TEAMS | {league}"),
        Screen::Team { .. } => format!("TEAM | {league}"),
    };
    if let Some(season) = state.season {
        title.push_str(&format!(" | {}/{:02}", season, (u32::from(season) + 1) % 100));
    }
    let line1 = format!("  .-.  {title}");
    let line2 = " (   ) teams terminal".to_string();
    let line3 = "  '-'".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_line(state: &AppState) -> Line<'static> {
    let keys = match state.screen {
        Screen::Teams => match state.browser.input_mode {
            InputMode::Search => "type to filter | Backspace delete | Ctrl+U clear | Enter/Esc done",
            InputMode::Browse => {
                if state.browser.source().is_fixed() {
                    "/ Search | ←↓↑→/hjkl Move | Enter Open | r Reload | ? Help | q Quit"
                } else {
                    "/ Search | ←↓↑→/hjkl Move | Enter Open | L League | r Reload | ? Help | q Quit"
                }
            }
        },
        Screen::Team { .. } => "b/Esc Back | r Reload | ? Help | q Quit",
    };
    let mut spans = vec![Span::raw(keys.to_string())];
    if let Some(last) = state.logs.back() {
        spans.push(Span::styled(
            format!("  {last}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    render_search(frame, sections[0], state);

    let grid_area = sections[1];
    match state.current_teams() {
        FetchStatus::Loading => render_status(frame, grid_area, LOADING_TEXT, Color::Gray),
        FetchStatus::Error(_) => render_status(frame, grid_area, TEAMS_ERROR_TEXT, Color::Red),
        FetchStatus::Success(_) => {
            let cards = state.browser.cards(state.current_teams()).unwrap_or_default();
            if cards.is_empty() && !state.browser.query().is_empty() {
                let hint = format!("No teams match \"{}\"", state.browser.query());
                render_status(frame, grid_area, &hint, Color::DarkGray);
                return;
            }
            render_grid(frame, grid_area, state, &cards);
        }
    }
}

fn render_search(frame: &mut Frame, area: Rect, state: &AppState) {
    let active = state.browser.input_mode == InputMode::Search;
    let query = state.browser.query();
    let (text, style) = if query.is_empty() && !active {
        (SEARCH_PLACEHOLDER.to_string(), Style::default().fg(Color::DarkGray))
    } else if active {
        (format!("{query}_"), Style::default().fg(Color::Yellow))
    } else {
        (query.to_string(), Style::default())
    };
    let border = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title("Search"),
    );
    frame.render_widget(input, centered_width(area, 60));
}

fn render_status(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let paragraph = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(color));
    frame.render_widget(paragraph, area);
}

fn render_grid(frame: &mut Frame, area: Rect, state: &AppState, cards: &[&TeamRecord]) {
    if cards.is_empty() || area.height == 0 || area.width == 0 {
        return;
    }
    let selected = state.browser.selected().min(cards.len() - 1);
    if area.height < MIN_CARD_HEIGHT {
        render_compact_row(frame, area, cards, selected);
        return;
    }
    // Short terminals get one row of clipped cards.
    let card_height = CARD_HEIGHT.min(area.height);
    let columns = grid_columns(area.width);
    let total_rows = cards.len().div_ceil(columns);
    let visible_rows = (area.height / card_height) as usize;
    let (first_row, last_row) = visible_range(selected / columns, total_rows, visible_rows);
    let card_width = area.width / columns as u16;

    for (row_offset, row) in (first_row..last_row).enumerate() {
        for col in 0..columns {
            let idx = row * columns + col;
            let Some(team) = cards.get(idx) else {
                break;
            };
            let card_area = Rect {
                x: area.x + col as u16 * card_width,
                y: area.y + row_offset as u16 * card_height,
                width: card_width,
                height: card_height,
            };
            render_card(frame, card_area, team, state.logos.get(&team.id), idx == selected);
        }
    }
}

/// Names only, on a single line, for areas too short to hold a bordered card.
fn render_compact_row(frame: &mut Frame, area: Rect, cards: &[&TeamRecord], selected: usize) {
    let columns = grid_columns(area.width);
    let first = (selected / columns) * columns;
    let spans: Vec<Span> = cards
        .iter()
        .enumerate()
        .skip(first)
        .take(columns)
        .map(|(idx, team)| {
            let style = if idx == selected {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            Span::styled(format!(" {:<22} ", team.name.to_uppercase()), style)
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_card(frame: &mut Frame, area: Rect, team: &TeamRecord, logo: Option<&LogoArt>, selected: bool) {
    let border_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    // The name always keeps its last row; the logo takes what is left, up to its height.
    let logo_height = inner.height.saturating_sub(1).min(LOGO_HEIGHT);
    let name_area = Rect {
        y: inner.y + logo_height,
        height: inner.height - logo_height,
        ..inner
    };
    if logo_height > 0 {
        let logo_area = Rect {
            height: logo_height,
            ..inner
        };
        render_logo(frame, centered_width(logo_area, 12), team, logo);
    }

    let mut name_style = Style::default().add_modifier(Modifier::BOLD);
    if selected {
        name_style = name_style.fg(Color::Black).bg(Color::Yellow);
    }
    let name = Paragraph::new(team.name.to_uppercase())
        .alignment(Alignment::Center)
        .style(name_style)
        .wrap(Wrap { trim: true });
    frame.render_widget(name, name_area);
}

fn render_logo(frame: &mut Frame, area: Rect, team: &TeamRecord, logo: Option<&LogoArt>) {
    let Some(art) = logo.filter(|art| !art.points.is_empty()) else {
        let initials = Paragraph::new(format!("\n{}", initials(&team.name)))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(initials, area);
        return;
    };
    let max_x = art.width.saturating_sub(1).max(1) as f64;
    let max_y = art.height.saturating_sub(1).max(1) as f64;
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, max_x])
        .y_bounds([0.0, max_y])
        .paint(|ctx| {
            for point in &art.points {
                let (r, g, b) = point.rgb;
                ctx.draw(&Points {
                    coords: &[(point.x, point.y)],
                    color: Color::Rgb(r, g, b),
                });
            }
        });
    frame.render_widget(canvas, area);
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(3)
        .collect::<String>()
        .to_uppercase()
}

fn render_team(frame: &mut Frame, area: Rect, state: &AppState, id: TeamId) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!("Team {id}"));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match state.team_detail(id) {
        None | Some(FetchStatus::Loading) => render_status(frame, inner, LOADING_TEXT, Color::Gray),
        Some(FetchStatus::Error(_)) => render_status(frame, inner, TEAM_ERROR_TEXT, Color::Red),
        Some(FetchStatus::Success(detail)) => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(16), Constraint::Min(10)])
                .split(inner);
            let logo_area = Rect {
                height: cols[0].height.min(LOGO_HEIGHT + 2),
                ..cols[0]
            };
            render_logo(frame, logo_area, &detail.team, state.logos.get(&id));
            frame.render_widget(
                Paragraph::new(team_detail_lines(detail)).wrap(Wrap { trim: false }),
                cols[1],
            );
        }
    }
}

pub fn team_detail_lines(detail: &TeamDetail) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    let field = |name: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{name:<10}"), label),
            Span::raw(value),
        ])
    };
    let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    let mut lines = vec![
        Line::from(Span::styled(
            detail.team.name.to_uppercase(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        field("Code", or_dash(detail.code.clone())),
        field("Country", or_dash(detail.country.clone())),
        field("Founded", or_dash(detail.founded.map(|y| y.to_string()))),
        field("Type", if detail.national { "National team" } else { "Club" }.to_string()),
    ];
    if let Some(venue) = &detail.venue {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Venue",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(field("Name", or_dash(venue.name.clone())));
        lines.push(field("City", or_dash(venue.city.clone())));
        lines.push(field("Capacity", or_dash(venue.capacity.map(|c| c.to_string()))));
        lines.push(field("Surface", or_dash(venue.surface.clone())));
    }
    lines
}

/// The floating league badge shown when the league comes from the shared selection.
fn render_league_badge(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = format!(" L  {} ", league_id_label(state.current_league()));
    let width = (text.chars().count() as u16 + 2).min(area.width);
    if area.height < 3 || width < 4 {
        return;
    }
    let badge = Rect {
        x: area.x + area.width - width,
        y: area.y + area.height - 3,
        width,
        height: 3,
    };
    frame.render_widget(Clear, badge);
    let widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Black).bg(Color::Magenta))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().bg(Color::Magenta)),
        );
    frame.render_widget(widget, badge);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Teams Terminal - Help",
        "",
        "Teams:",
        "  /            Search (Enter/Esc to finish)",
        "  Esc          Clear search",
        "  ←↓↑→ / hjkl  Move between cards",
        "  Enter        Open team",
        "  L            Next league (when not pinned)",
        "  r            Reload",
        "",
        "Team:",
        "  b / Esc      Back to teams",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text).block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, popup_area);
}

fn centered_width(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::{grid_columns, header_text, initials, visible_range};
    use crate::state::{AppState, LeagueId, LeagueSource};

    #[test]
    fn columns_follow_width() {
        assert_eq!(grid_columns(10), 1);
        assert_eq!(grid_columns(48), 2);
        assert_eq!(grid_columns(100), 4);
    }

    #[test]
    fn visible_rows_keep_selection_in_view() {
        assert_eq!(visible_range(0, 10, 3), (0, 3));
        assert_eq!(visible_range(9, 10, 3), (7, 10));
        assert_eq!(visible_range(5, 10, 3), (4, 7));
        assert_eq!(visible_range(1, 2, 3), (0, 2));
    }

    #[test]
    fn header_season_label_handles_largest_year() {
        let mut state = AppState::new(LeagueSource::Fixed(LeagueId(39)));
        state.season = Some(2025);
        assert!(header_text(&state).contains("2025/26"));
        state.season = Some(u16::MAX);
        assert!(header_text(&state).contains("65535/36"));
    }

    #[test]
    fn initials_take_first_letters() {
        assert_eq!(initials("Real Madrid"), "RM");
        assert_eq!(initials("Brighton & Hove Albion"), "B&H");
    }
}
