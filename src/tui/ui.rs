use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::app_state::{Speaker, TuiState};

pub fn draw(f: &mut Frame, state: &mut TuiState) {
    let size = f.area();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(size);

    let title_area = outer[0];
    let transcript_area = outer[1];
    let input_area = outer[2];
    let status_area = outer[3];

    let title = Paragraph::new("CardioBot")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(title, title_area);

    draw_transcript(f, transcript_area, state);

    let input = Paragraph::new(state.input.as_str())
        .block(Block::default().borders(Borders::ALL).title("Message"));
    f.render_widget(input, input_area);

    let status = if state.busy {
        "thinking..."
    } else {
        "Enter: send | Esc: quit | Up/Down: scroll"
    };
    let status_bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(status_bar, status_area);

    // Cursor at the end of the input line.
    let cursor_x = input_area.x + 1 + state.input.chars().count() as u16;
    f.set_cursor_position((cursor_x.min(input_area.right().saturating_sub(2)), input_area.y + 1));
}

fn draw_transcript(f: &mut Frame, area: Rect, state: &mut TuiState) {
    let mut lines: Vec<Line> = Vec::new();
    for turn in &state.turns {
        let (label, style) = match turn.speaker {
            Speaker::User => ("User: ", Style::default().fg(Color::Cyan)),
            Speaker::Bot => ("CardioBot: ", Style::default().fg(Color::Green)),
        };
        let mut parts = turn.text.lines();
        let first = parts.next().unwrap_or("");
        lines.push(Line::from(vec![
            Span::styled(label, style.add_modifier(Modifier::BOLD)),
            Span::raw(first.to_string()),
        ]));
        for rest in parts {
            lines.push(Line::from(Span::raw(rest.to_string())));
        }
        lines.push(Line::default());
    }

    let inner_height = area.height.saturating_sub(2);
    let inner_width = area.width.saturating_sub(2);
    // Scrolling happens after wrapping, so the bottom offset must count
    // visual rows, not logical lines.
    let total_rows = wrapped_rows(&lines, inner_width);
    let max_scroll = total_rows.saturating_sub(inner_height);
    if state.follow {
        state.scroll = max_scroll;
    } else {
        state.scroll = state.scroll.min(max_scroll);
        if state.scroll == max_scroll {
            state.follow = true;
        }
    }

    let transcript = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Transcript"))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll, 0));
    f.render_widget(transcript, area);
}

/// Number of terminal rows the lines occupy once wrapped to `width`.
fn wrapped_rows(lines: &[Line], width: u16) -> u16 {
    if width == 0 {
        return lines.len() as u16;
    }
    let width = width as usize;
    lines
        .iter()
        .map(|line| {
            let w = line.width();
            if w == 0 {
                1
            } else {
                ((w + width - 1) / width) as u16
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_rows_counts_visual_rows() {
        let lines = vec![
            Line::from("1234567890"), // wraps to 3 rows at width 4
            Line::default(),          // blank line still occupies a row
            Line::from("abc"),
        ];
        assert_eq!(wrapped_rows(&lines, 4), 5);
    }

    #[test]
    fn wrapped_rows_with_exact_fit() {
        let lines = vec![Line::from("12345678")];
        assert_eq!(wrapped_rows(&lines, 4), 2);
    }

    #[test]
    fn wrapped_rows_handles_zero_width() {
        let lines = vec![Line::from("abc"), Line::from("def")];
        assert_eq!(wrapped_rows(&lines, 0), 2);
    }
}
