use chrono::Local;
use ratatui::widgets::TableState;

use crate::commands::{cmd_add, cmd_care, cmd_edit, cmd_remove};
use crate::models::{sort_by_care_date, CareTask, Plant, TaskKind};
use crate::session::CareSession;
use crate::storage::{load_plant, load_plants, save_plant};

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
}

pub enum ViewMode {
    Plants,
    Session,
}

pub enum InputField {
    None,
    Name,
    Notes,
    Water,
    Rotate,
    Fertilize,
}

pub struct App {
    pub plants: Vec<Plant>,
    pub state: TableState,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<u64>,
    // For adding plants, we need to store partial data
    pub add_state: AddState,
    pub due_only: bool,
    /// Live guided session, if one is running.
    pub session: Option<CareSession>,
}

/// State for the multi-step "Add Plant" wizard.
#[derive(Default)]
pub struct AddState {
    pub name: String,
    pub water: Option<String>,
    pub rotate: Option<String>,
    pub fertilize: Option<String>,
    pub notes: Option<String>,
    pub step: usize, // 0: Name, 1: Water, 2: Rotate, 3: Fertilize, 4: Notes
}

impl App {
    /// Creates a new App instance and loads initial data.
    pub fn new() -> App {
        let mut app = App {
            plants: Vec::new(),
            state: TableState::default(),
            view_mode: ViewMode::Plants,
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            add_state: AddState::default(),
            due_only: false,
            session: None,
        };
        app.reload();
        app
    }

    /// Reloads plants from storage and refreshes the selection.
    pub fn reload(&mut self) {
        let now = Local::now();
        let mut plants = load_plants();
        if self.due_only {
            plants.retain(|p| p.needs_any_care(now));
        }
        sort_by_care_date(&mut plants);
        self.plants = plants;

        if self.plants.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.plants.len() {
                self.state.select(Some(self.plants.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Selects the next plant in the list.
    pub fn next(&mut self) {
        if self.plants.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.plants.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous plant in the list.
    pub fn previous(&mut self) {
        if self.plants.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.plants.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn selected_plant(&self) -> Option<&Plant> {
        self.state.selected().and_then(|i| self.plants.get(i))
    }

    /// Number of care tasks currently due across all loaded plants.
    pub fn tasks_due(&self) -> usize {
        let now = Local::now();
        self.plants
            .iter()
            .map(|p| TaskKind::ALL.iter().filter(|&&k| p.needs(k, now)).count())
            .sum()
    }

    /// Completes one care task on the selected plant, outside a session.
    pub fn care_selected(&mut self, kind: TaskKind) {
        if let Some(id) = self.selected_plant().map(|p| p.id) {
            cmd_care(id, kind, true);
            self.reload();
        }
    }

    /// Deletes the currently selected plant.
    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_plant().map(|p| p.id) {
            cmd_remove(id, true);
            self.reload();
        }
    }

    /// Toggles between all plants and only those with care due.
    pub fn toggle_due_only(&mut self) {
        self.due_only = !self.due_only;
        self.reload();
    }

    // ----- guided care session -----

    /// Starts a guided session over everything currently needing care.
    /// Does nothing when no plant needs attention.
    pub fn start_session(&mut self) {
        let now = Local::now();
        let mut plants = load_plants();
        sort_by_care_date(&mut plants);
        let session = CareSession::new(plants, now);
        if !session.is_empty() {
            self.session = Some(session);
            self.view_mode = ViewMode::Session;
        }
    }

    /// Completes the matching checklist task for the session's current plant
    /// and persists the resulting date changes immediately.
    pub fn complete_session_task(&mut self, kind: TaskKind) {
        let now = Local::now();
        let Some(session) = &mut self.session else {
            return;
        };
        // Only tasks on the visible checklist are completable.
        let outstanding = session
            .current_tasks(now)
            .iter()
            .any(|(t, done)| t.kind == kind && !done);
        if !outstanding {
            return;
        }
        let Some(name) = session.current_plant().map(|p| p.name.clone()) else {
            return;
        };
        if let Some(completion) = session.complete_task(CareTask::new(kind, &name), now) {
            if let Some(mut p) = load_plant(completion.plant_id) {
                completion.apply(&mut p);
                let _ = save_plant(&p);
            }
        }
    }

    /// Drives the session's pending auto-advance. Called from the event loop
    /// on every pass.
    pub fn tick(&mut self) {
        if let Some(session) = &mut self.session {
            session.tick(Local::now());
        }
    }

    /// True once the running session has nothing left to do.
    pub fn session_finished(&self) -> bool {
        match &self.session {
            Some(session) => session.is_complete(Local::now()),
            None => false,
        }
    }

    /// Tears the session down, disarming any pending advance first.
    pub fn dismiss_session(&mut self) {
        if let Some(session) = &mut self.session {
            session.cancel_advance();
        }
        self.session = None;
        self.view_mode = ViewMode::Plants;
        self.reload();
    }

    // ----- add / edit input -----

    /// Initiates the "Add Plant" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Initiates editing of a specific field for the selected plant.
    pub fn start_edit(&mut self, field: InputField) {
        let Some(p) = self.selected_plant() else {
            return;
        };
        let id = p.id;
        // Pre-fill buffer for editing
        let buffer = match field {
            InputField::Name => p.name.clone(),
            InputField::Notes => p.notes.clone().unwrap_or_default(),
            InputField::Water => p.watering_schedule.as_str().to_string(),
            InputField::Rotate => p.rotation_schedule.as_str().to_string(),
            InputField::Fertilize => p.fertilizing_schedule.as_str().to_string(),
            InputField::None => String::new(),
        };
        self.target_id = Some(id);
        self.input_buffer = buffer;
        self.input_mode = InputMode::Editing;
        self.input_field = field;
    }

    /// Handles text input based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Editing => self.handle_editing_input(),
            _ => {}
        }
    }

    fn schedule_input_ok(&self) -> bool {
        self.input_buffer.is_empty() || self.input_buffer.parse::<crate::schedule::Schedule>().is_ok()
    }

    /// Handles input for the "Add Plant" wizard.
    fn handle_adding_input(&mut self) {
        match self.add_state.step {
            0 => {
                // Name
                if !self.input_buffer.is_empty() {
                    self.add_state.name = self.input_buffer.clone();
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            1 => {
                // Watering schedule (empty -> weekly)
                if self.schedule_input_ok() && !self.input_buffer.eq_ignore_ascii_case("none") {
                    if !self.input_buffer.is_empty() {
                        self.add_state.water = Some(self.input_buffer.clone());
                    }
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            2 => {
                // Rotation schedule (empty -> none)
                if self.schedule_input_ok() {
                    if !self.input_buffer.is_empty() {
                        self.add_state.rotate = Some(self.input_buffer.clone());
                    }
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            3 => {
                // Fertilizing schedule (empty -> none)
                if self.schedule_input_ok() {
                    if !self.input_buffer.is_empty() {
                        self.add_state.fertilize = Some(self.input_buffer.clone());
                    }
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            4 => {
                // Notes (optional) -- finish
                if !self.input_buffer.is_empty() {
                    self.add_state.notes = Some(self.input_buffer.clone());
                }
                cmd_add(
                    self.add_state.name.clone(),
                    self.add_state.water.clone(),
                    self.add_state.rotate.clone(),
                    self.add_state.fertilize.clone(),
                    self.add_state.notes.clone(),
                    None,
                    true,
                );
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.reload();
            }
            _ => {}
        }
    }

    /// Handles input for the "Edit Plant" mode.
    fn handle_editing_input(&mut self) {
        if let Some(id) = self.target_id {
            let buf = self.input_buffer.clone();
            match self.input_field {
                InputField::Name => {
                    if !buf.is_empty() {
                        cmd_edit(id, Some(buf), None, None, None, None, None, true);
                    }
                }
                InputField::Notes => cmd_edit(id, None, None, None, None, Some(buf), None, true),
                InputField::Water => cmd_edit(id, None, Some(buf), None, None, None, None, true),
                InputField::Rotate => cmd_edit(id, None, None, Some(buf), None, None, None, true),
                InputField::Fertilize => {
                    cmd_edit(id, None, None, None, Some(buf), None, None, true)
                }
                InputField::None => {}
            }
            self.input_mode = InputMode::Normal;
            self.input_buffer.clear();
            self.reload();
        }
    }
}
