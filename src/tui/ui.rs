use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::models::Plant;
use crate::schedule::{days_until, Schedule};
use crate::session::CareSession;

use super::app::{App, InputField, InputMode, ViewMode};

pub fn ui(f: &mut Frame, app: &mut App) {
    match app.view_mode {
        ViewMode::Session => draw_session(f, app),
        ViewMode::Plants => draw_plants(f, app),
    }
}

fn due_text(next: Option<DateTime<Local>>, schedule: Schedule, now: DateTime<Local>) -> String {
    if !schedule.is_enabled() {
        return "-".to_string();
    }
    let Some(next) = next else {
        return "-".to_string();
    };
    let days = days_until(next, now);
    if days < 0 {
        format!("{}d overdue", days.abs())
    } else if days == 0 {
        "Today".to_string()
    } else {
        format!("{}d", days)
    }
}

/// Days until the plant's most pressing enabled track.
fn soonest_days(p: &Plant, now: DateTime<Local>) -> i64 {
    let mut soonest = days_until(p.next_watering, now);
    if p.rotation_schedule.is_enabled() {
        if let Some(next) = p.next_rotation {
            soonest = soonest.min(days_until(next, now));
        }
    }
    if p.fertilizing_schedule.is_enabled() {
        if let Some(next) = p.next_fertilizing {
            soonest = soonest.min(days_until(next, now));
        }
    }
    soonest
}

fn draw_plants(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let now = Local::now();

    let rows: Vec<Row> = app
        .plants
        .iter()
        .map(|p| {
            let days = soonest_days(p, now);
            let style = if days < 0 {
                Style::default().fg(Color::Red)
            } else if days == 0 {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Green)
            };

            Row::new(vec![
                Cell::from(p.id.to_string()),
                Cell::from(p.name.clone()),
                Cell::from(p.watering_schedule.to_string()),
                Cell::from(due_text(Some(p.next_watering), p.watering_schedule, now)),
                Cell::from(p.rotation_schedule.to_string()),
                Cell::from(due_text(p.next_rotation, p.rotation_schedule, now)),
                Cell::from(p.fertilizing_schedule.to_string()),
                Cell::from(due_text(p.next_fertilizing, p.fertilizing_schedule, now)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Length(11),
        Constraint::Length(14),
        Constraint::Length(11),
        Constraint::Length(14),
        Constraint::Length(11),
    ];

    let tasks_due = app.tasks_due();
    let title = format!(
        "Verdant - Plants ({} task{} due)",
        tasks_due,
        if tasks_due == 1 { "" } else { "s" }
    );

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec![
                "ID", "Name", "Water", "Due", "Rotate", "Due", "Fertilize", "Due",
            ])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[0], &mut app.state);

    let help_text = match app.input_mode {
        InputMode::Normal => {
            "q: Quit | a: Add | s: Session | w/r/f: Water/Rotate/Fertilize | n: Name | o: Notes | 1/2/3: Schedules | c: Due Only | d: Del"
        }
        InputMode::Editing => "Enter: Save | Esc: Cancel",
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[1]);

    // Render Input Box if needed
    match app.input_mode {
        InputMode::Editing | InputMode::Adding => {
            let area = centered_rect(60, 3, f.area());
            f.render_widget(Clear, area); // Clear the area first

            let title = match app.input_mode {
                InputMode::Adding => match app.add_state.step {
                    0 => "Add Plant: Enter Name",
                    1 => "Add Plant: Watering Schedule (default weekly)",
                    2 => "Add Plant: Rotation Schedule (default none)",
                    3 => "Add Plant: Fertilizing Schedule (default none)",
                    4 => "Add Plant: Notes (Optional)",
                    _ => "Add Plant",
                },
                InputMode::Editing => match app.input_field {
                    InputField::Name => "Edit Name",
                    InputField::Notes => "Edit Notes",
                    InputField::Water => "Edit Watering Schedule",
                    InputField::Rotate => "Edit Rotation Schedule",
                    InputField::Fertilize => "Edit Fertilizing Schedule",
                    InputField::None => "Edit",
                },
                _ => "",
            };

            let input = Paragraph::new(app.input_buffer.as_str())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title(title));

            f.render_widget(input, area);
        }
        _ => {}
    }
}

fn draw_session(f: &mut Frame, app: &mut App) {
    let Some(session) = &app.session else {
        return;
    };
    let now = Local::now();

    if session.is_complete(now) {
        draw_celebration(f, session);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Current plant
            Constraint::Min(0),    // Checklist
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let Some(plant) = session.current_plant() else {
        return;
    };

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            plant.name.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Plant {} of {}", session.current_index() + 1, session.plant_count()),
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Care Session"));
    f.render_widget(header, chunks[0]);

    let mut lines: Vec<Line> = Vec::new();
    for (task, done) in session.current_tasks(now) {
        let (mark, style) = if done {
            ("[x]", Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT))
        } else {
            ("[ ]", Style::default())
        };
        lines.push(Line::from(vec![
            Span::raw(format!(" {} ", mark)),
            Span::styled(task.kind.label().to_string(), style),
        ]));
    }
    if session.advance_pending() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " All done - next plant...",
            Style::default().fg(Color::Green),
        )));
    }

    let checklist = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Tasks"));
    f.render_widget(checklist, chunks[1]);

    let help = Paragraph::new("w: Water | r: Rotate | f: Fertilize | Esc: Leave Session")
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn draw_celebration(f: &mut Frame, session: &CareSession) {
    let area = centered_rect(60, 7, f.area());
    f.render_widget(Clear, area);

    let done = session.completed_count();
    let celebration = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "All plants are happy!",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "{} task{} completed.",
            done,
            if done == 1 { "" } else { "s" }
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to finish",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(celebration, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((r.height.saturating_sub(height)) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
