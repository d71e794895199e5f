use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::canvas::TerminalCanvas;
use crate::game::{EndCause, Status};

/// Values shown on the status line below the play area.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct StatusInfo {
    pub score: u32,
    pub length: usize,
    pub loop_time_ms: u64,
    pub status: Status,
    pub end_cause: Option<EndCause>,
}

/// Renders one terminal frame and returns the cells the canvas covers.
///
/// In fullscreen the canvas takes the whole terminal; otherwise it sits in a
/// bordered box above a one-line status bar.
pub fn render(
    frame: &mut Frame<'_>,
    canvas: &TerminalCanvas,
    info: StatusInfo,
    fullscreen: bool,
) -> Rect {
    let area = frame.area();
    if fullscreen {
        let canvas_area = fit(area, canvas);
        frame.render_widget(canvas, canvas_area);
        return canvas_area;
    }

    let [play_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let (columns, rows) = canvas.cell_size();
    let boxed = Rect {
        width: columns.saturating_add(2),
        height: rows.saturating_add(2),
        ..play_area
    }
    .intersection(play_area);

    let block = Block::bordered()
        .title(" tile-snake ")
        .border_style(Style::new().fg(Color::DarkGray));
    let canvas_area = fit(block.inner(boxed), canvas);
    frame.render_widget(block, boxed);
    frame.render_widget(canvas, canvas_area);

    frame.render_widget(
        Paragraph::new(status_line(info))
            .alignment(Alignment::Left)
            .style(Style::default().fg(Color::DarkGray)),
        status_area,
    );
    canvas_area
}

fn fit(area: Rect, canvas: &TerminalCanvas) -> Rect {
    let (columns, rows) = canvas.cell_size();
    Rect {
        width: columns.min(area.width),
        height: rows.min(area.height),
        ..area
    }
}

fn status_line(info: StatusInfo) -> Line<'static> {
    let state = match (info.status, info.end_cause) {
        (Status::Idle, _) => "click or Enter to play",
        (Status::Running, _) => "running",
        (Status::Paused, _) => "paused",
        (Status::Ended, Some(EndCause::WallCollision)) => "hit the wall",
        (Status::Ended, Some(EndCause::SelfCollision)) => "hit yourself",
        (Status::Ended, Some(EndCause::NoRoomForFood)) => "board full",
        (Status::Ended, _) => "game over",
    };

    Line::from(vec![
        Span::styled(
            format!(" Score {} ", info.score),
            Style::new().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "| Length {} | Step {} ms | {state} ",
            info.length, info.loop_time_ms
        )),
        Span::raw("| q quit"),
    ])
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use crate::canvas::TerminalCanvas;
    use crate::game::{EndCause, Status};

    use super::{StatusInfo, render, status_line};

    fn info(status: Status, end_cause: Option<EndCause>) -> StatusInfo {
        StatusInfo {
            score: 3,
            length: 5,
            loop_time_ms: 67,
            status,
            end_cause,
        }
    }

    fn text(info: StatusInfo) -> String {
        status_line(info)
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn status_line_names_the_cause_of_death() {
        let line = text(info(Status::Ended, Some(EndCause::SelfCollision)));

        assert!(line.contains("Score 3"));
        assert!(line.contains("Step 67 ms"));
        assert!(line.contains("hit yourself"));
    }

    #[test]
    fn fullscreen_drops_the_border() {
        let canvas = TerminalCanvas::new(10, 6);
        let mut terminal = Terminal::new(TestBackend::new(20, 8)).expect("test terminal");

        terminal
            .draw(|frame| {
                render(frame, &canvas, info(Status::Running, None), true);
            })
            .expect("draw");
        assert_eq!(terminal.backend().buffer()[(0, 0)].symbol(), "▀");

        terminal
            .draw(|frame| {
                render(frame, &canvas, info(Status::Running, None), false);
            })
            .expect("draw");
        assert_eq!(terminal.backend().buffer()[(0, 0)].symbol(), "┌");
        assert_eq!(terminal.backend().buffer()[(1, 1)].symbol(), "▀");
    }

    #[test]
    fn render_reports_where_the_canvas_landed() {
        let canvas = TerminalCanvas::new(10, 6);
        let mut terminal = Terminal::new(TestBackend::new(20, 8)).expect("test terminal");
        let mut canvas_area = Rect::default();

        terminal
            .draw(|frame| {
                canvas_area = render(frame, &canvas, info(Status::Idle, None), false);
            })
            .expect("draw");
        assert_eq!(canvas_area, Rect::new(1, 1, 10, 3));

        terminal
            .draw(|frame| {
                canvas_area = render(frame, &canvas, info(Status::Idle, None), true);
            })
            .expect("draw");
        assert_eq!(canvas_area, Rect::new(0, 0, 10, 3));
    }
}
