//! UI rendering for the TUI.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::core::{format_mmss, Clock};
use crate::tui::app::App;

/// Render the application UI.
pub fn render<C: Clock + Clone>(frame: &mut Frame<'_>, app: &App<C>) {
    // Create layout: header, body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(0)])
        .split(chunks[1]);

    render_header(frame, app, chunks[0]);
    render_presets(frame, app, body[0]);
    render_session(frame, app, body[1]);
    render_status_bar(frame, app, chunks[2]);
}

fn render_header<C: Clock + Clone>(frame: &mut Frame<'_>, app: &App<C>, area: Rect) {
    let state = app.sequencer().state();
    let title = state
        .active_preset()
        .map_or_else(|| " breathe ".to_string(), |p| format!(" {} ({}) ", p.title, p.pattern()));

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}

fn render_presets<C: Clock + Clone>(frame: &mut Frame<'_>, app: &App<C>, area: Rect) {
    let items: Vec<ListItem<'_>> = app
        .presets()
        .iter()
        .map(|preset| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<18}", preset.title)),
                Span::styled(preset.pattern(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Presets "))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default();
    state.select(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_session<C: Clock + Clone>(frame: &mut Frame<'_>, app: &App<C>, area: Rect) {
    let sequencer = app.sequencer();
    let state = sequencer.state();

    let block = Block::default().borders(Borders::ALL).title(if app.is_running() {
        " Running "
    } else if state.started_at().is_some() {
        " Paused "
    } else {
        " Ready "
    });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Phase name
            Constraint::Length(2), // Countdown
            Constraint::Length(2), // Instruction
            Constraint::Length(1), // Gauge
            Constraint::Min(0),    // Session info
        ])
        .margin(1)
        .split(inner);

    let Some(view) = sequencer.current_view() else {
        frame.render_widget(Paragraph::new("Select a preset"), rows[0]);
        return;
    };

    let phase_color = match view.name.as_str() {
        "inhale" => Color::Green,
        "exhale" => Color::Blue,
        _ => Color::Yellow,
    };

    frame.render_widget(
        Paragraph::new(view.name.to_uppercase())
            .alignment(Alignment::Center)
            .style(Style::default().fg(phase_color).add_modifier(Modifier::BOLD)),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(view.remaining_seconds.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD)),
        rows[1],
    );
    frame.render_widget(
        Paragraph::new(view.instruction.clone()).alignment(Alignment::Center),
        rows[2],
    );
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(phase_color))
            .ratio(sequencer.phase_progress().clamp(0.0, 1.0))
            .label(""),
        rows[3],
    );

    let elapsed = sequencer.elapsed().as_secs();
    let mut info = vec![
        Line::from(format!("Elapsed  {}", format_mmss(elapsed))),
        Line::from(format!("Cycles   {}", state.cycles_completed())),
    ];
    if let Some(left) = sequencer.remaining_session_seconds() {
        info.push(Line::from(format!("Left     {}", format_mmss(left))));
    }
    if !app.outcomes().is_empty() {
        info.push(Line::from(Span::styled(
            format!("Sessions {}", app.outcomes().len()),
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(Paragraph::new(info), rows[4]);
}

fn render_status_bar<C: Clock + Clone>(frame: &mut Frame<'_>, app: &App<C>, area: Rect) {
    let status_text = app
        .status
        .as_deref()
        .unwrap_or("enter:start | space:pause | s:stop | r:reset | j/k:preset | q:quit");

    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::core::ManualClock;
    use crate::features::breathing::{NullRecorder, PresetCatalog};

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_renders_countdown() {
        let clock = ManualClock::default();
        let mut app = App::new(
            clock.clone(),
            &PresetCatalog::builtin(),
            "calm",
            Box::new(NullRecorder),
            None,
            Duration::from_secs(1),
        )
        .unwrap();
        app.start_selected().unwrap();
        clock.advance_secs(5);
        app.apply_due_ticks();

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("Calm Breathing (4-7-8)"));
        assert!(text.contains("HOLD"));
        assert!(text.contains("Hold your breath"));
        assert!(text.contains("Running"));
    }
}
