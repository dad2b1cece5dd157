//! Terminal UI rendering with ratatui
//!
//! Draws only from a `Snapshot`; nothing here touches game state.

use crate::board::Cell;
use crate::game::SessionState;
use crate::snapshot::Snapshot;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render the whole game window
pub fn render_game(frame: &mut Frame, snap: &Snapshot) {
    let area = frame.area();
    let (board_width, board_height) = board_extent(snap.board.rows(), snap.board.cols());

    // Title bar, score line, board
    let window_width = board_width.max(30).saturating_add(2);
    let window_height = board_height.saturating_add(4);
    let window = center_rect(area, window_width, window_height);

    let outer = Block::default()
        .title(Line::from(vec![
            Span::styled(" 🏆 ", Style::default().fg(Color::Yellow)),
            Span::styled("tetris ", Style::default().fg(Color::Gray)),
        ]))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(snap.theme.border))
        .style(Style::default().bg(snap.theme.background));
    let inner = outer.inner(window);
    frame.render_widget(Clear, window);
    frame.render_widget(outer, window);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(board_height),
        ])
        .split(inner);

    render_scores(frame, layout[0], snap);

    let board_area = center_rect(layout[2], board_width, board_height);
    render_board(frame, board_area, snap);

    match snap.state {
        SessionState::NotStarted => render_overlay(
            frame,
            board_area,
            Line::styled("TETRIS", Style::default().fg(Color::White).bold()),
            &[
                "Arrow keys to move/rotate",
                "Space to pause/resume",
                "Enter to start",
            ],
        ),
        SessionState::GameOver => {
            let score = format!("Score: {}", snap.score);
            let mut lines = vec![score.as_str()];
            if snap.retryable {
                lines.push("R to restart");
            }
            render_overlay(
                frame,
                board_area,
                Line::styled("GAME OVER", Style::default().fg(Color::Red).bold()),
                &lines,
            );
        }
        SessionState::Paused => render_overlay(
            frame,
            board_area,
            Line::styled("Paused", Style::default().fg(Color::LightYellow).bold()),
            &[],
        ),
        SessionState::Running => {}
    }
}

/// Terminal size of the bordered board, two columns per cell. Saturates
/// instead of wrapping for boards wider or taller than a terminal can be.
fn board_extent(rows: usize, cols: usize) -> (u16, u16) {
    let cells = |n: usize| u16::try_from(n).unwrap_or(u16::MAX);
    let width = cells(cols).saturating_mul(2).saturating_add(2);
    let height = cells(rows).saturating_add(2);
    (width, height)
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn render_scores(frame: &mut Frame, area: Rect, snap: &Snapshot) {
    let line = Line::from(vec![
        Span::styled("Score: ", Style::default().fg(Color::Green)),
        Span::styled(snap.score.to_string(), Style::default().fg(Color::Green).bold()),
        Span::raw("    "),
        Span::styled("High: ", Style::default().fg(Color::Yellow)),
        Span::styled(snap.best.to_string(), Style::default().fg(Color::Yellow).bold()),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

/// Render the game board with the active piece on top
fn render_board(frame: &mut Frame, area: Rect, snap: &Snapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(snap.theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let show_active = snap.state != SessionState::NotStarted;
    let active_color = snap.active.map(|piece| piece.kind().color());

    let lines: Vec<Line> = snap
        .board
        .iter_rows()
        .enumerate()
        .map(|(row, cells)| {
            let spans: Vec<Span> = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let covered = show_active && snap.active_covers(row as i32, col as i32);
                    match (covered, active_color, cell) {
                        (true, Some(color), _) => {
                            Span::styled(snap.theme.block, Style::default().fg(color))
                        }
                        (_, _, Cell::Filled(kind)) => {
                            Span::styled(snap.theme.block, Style::default().fg(kind.color()))
                        }
                        _ => Span::raw(snap.theme.empty),
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render an overlay (for start, pause and game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: Line, subtitles: &[&str]) {
    let popup_width = 30u16;
    let popup_height = subtitles.len() as u16 + 4;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut text = vec![title, Line::raw("")];
    text.extend(
        subtitles
            .iter()
            .map(|s| Line::styled(s.to_string(), Style::default().fg(Color::Gray))),
    );

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
