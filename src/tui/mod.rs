pub mod app;
pub mod ui;

use std::{error::Error, io, time::Duration};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::models::TaskKind;
use app::{App, InputField, InputMode, ViewMode};
use ui::ui;

/// How often the event loop wakes up to drive pending session advances.
const TICK_MS: u64 = 100;

pub fn run_tui() -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new();

    // Run loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui(f, app))?;

        // Poll with a timeout instead of blocking: the session's auto-advance
        // deadline has to fire even when the user is idle.
        if !event::poll(Duration::from_millis(TICK_MS))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            match app.view_mode {
                ViewMode::Session => {
                    if app.session_finished() {
                        // Celebration screen: any key ends the session.
                        app.dismiss_session();
                        continue;
                    }
                    match key.code {
                        KeyCode::Esc => app.dismiss_session(),
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Char('w') => app.complete_session_task(TaskKind::Watering),
                        KeyCode::Char('r') => app.complete_session_task(TaskKind::Rotation),
                        KeyCode::Char('f') => app.complete_session_task(TaskKind::Fertilizing),
                        _ => {}
                    }
                }
                ViewMode::Plants => match app.input_mode {
                    InputMode::Normal => match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Down | KeyCode::Char('j') => app.next(),
                        KeyCode::Up | KeyCode::Char('k') => app.previous(),
                        KeyCode::Char('s') => app.start_session(),
                        KeyCode::Char('w') => app.care_selected(TaskKind::Watering),
                        KeyCode::Char('r') => app.care_selected(TaskKind::Rotation),
                        KeyCode::Char('f') => app.care_selected(TaskKind::Fertilizing),
                        KeyCode::Char('a') => app.start_add(),
                        KeyCode::Char('n') => app.start_edit(InputField::Name),
                        KeyCode::Char('o') => app.start_edit(InputField::Notes),
                        KeyCode::Char('1') => app.start_edit(InputField::Water),
                        KeyCode::Char('2') => app.start_edit(InputField::Rotate),
                        KeyCode::Char('3') => app.start_edit(InputField::Fertilize),
                        KeyCode::Char('c') => app.toggle_due_only(),
                        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                        _ => {}
                    },
                    InputMode::Editing | InputMode::Adding => match key.code {
                        KeyCode::Enter => app.handle_input(),
                        KeyCode::Esc => {
                            app.input_mode = InputMode::Normal;
                            app.input_buffer.clear();
                        }
                        KeyCode::Char(c) => {
                            app.input_buffer.push(c);
                        }
                        KeyCode::Backspace => {
                            app.input_buffer.pop();
                        }
                        _ => {}
                    },
                },
            }
        }
    }
}
