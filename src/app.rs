use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, widgets::ListState, Terminal};
use tracing::{debug, info};

use crate::datagov::WeatherSource;
use crate::error::{Error, Result};
use crate::ui::ui;
use crate::units::Units;
use crate::view::WeatherView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Editing,
    RegionPicker,
    /// Typed text matched no area; offer the picker.
    RegionPrompt(String),
    ConfirmLogout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Fetch,
    Quit,
    Logout,
}

pub struct App {
    source: Box<dyn WeatherSource>,
    pub view: WeatherView,
    pub mode: Mode,
    pub input: String,
    pub picker: ListState,
    pub units: Units,
}

impl App {
    pub fn new(source: Box<dyn WeatherSource>, location: &str, units: Units) -> Self {
        Self {
            source,
            view: WeatherView::new(location),
            mode: Mode::Normal,
            input: location.to_string(),
            picker: ListState::default(),
            units,
        }
    }

    pub fn fetch(&mut self) {
        info!("fetching weather");
        self.view.fetch(self.source.as_ref());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Outcome::Quit;
        }
        match self.mode.clone() {
            Mode::Normal => self.normal_key(key.code),
            Mode::Editing => {
                self.editing_key(key.code);
                Outcome::Continue
            }
            Mode::RegionPicker => {
                self.picker_key(key.code);
                Outcome::Continue
            }
            Mode::RegionPrompt(_) => {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Enter => self.open_picker(),
                    KeyCode::Char('n') | KeyCode::Esc => self.mode = Mode::Normal,
                    _ => {}
                }
                Outcome::Continue
            }
            Mode::ConfirmLogout => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Outcome::Logout,
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.mode = Mode::Normal;
                    Outcome::Continue
                }
                _ => Outcome::Continue,
            },
        }
    }

    fn normal_key(&mut self, code: KeyCode) -> Outcome {
        match code {
            KeyCode::Char('q') => return Outcome::Quit,
            KeyCode::Char('g') if !self.view.is_loading() => return Outcome::Fetch,
            KeyCode::Char('c') => self.view.clear(),
            KeyCode::Char('e') | KeyCode::Char('/') if !self.view.is_loading() => {
                self.mode = Mode::Editing
            }
            KeyCode::Char('a') => self.open_picker(),
            KeyCode::Char('n') | KeyCode::Right => self.view.advance_day(),
            KeyCode::Char('p') | KeyCode::Left => self.view.previous_day(),
            KeyCode::Char('l') => self.mode = Mode::ConfirmLogout,
            _ => {}
        }
        Outcome::Continue
    }

    fn editing_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => self.submit_location(),
            _ => {}
        }
    }

    fn submit_location(&mut self) {
        self.mode = Mode::Normal;
        match self.view.update_location(&self.input) {
            Ok(()) => self.input = self.view.location().to_string(),
            Err(Error::RegionNotFound(text)) => {
                debug!(%text, "location not found, prompting for picker");
                self.mode = Mode::RegionPrompt(text);
            }
            Err(err) => self.view.fail(&err),
        }
    }

    fn open_picker(&mut self) {
        let Some(areas) = self.view.areas() else {
            self.mode = Mode::Normal;
            return;
        };
        if !self.view.can_pick_region() {
            self.mode = Mode::Normal;
            return;
        }
        let position = self
            .view
            .selected_region()
            .and_then(|name| areas.areas.iter().position(|a| a.name == name))
            .unwrap_or(0);
        self.picker.select(Some(position));
        self.mode = Mode::RegionPicker;
    }

    fn picker_key(&mut self, code: KeyCode) {
        let len = self.view.areas().map_or(0, |index| index.areas.len());
        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.mode = Mode::Normal,
            KeyCode::Down | KeyCode::Char('j') if len > 0 => {
                let next = self.picker.selected().map_or(0, |i| (i + 1) % len);
                self.picker.select(Some(next));
            }
            KeyCode::Up | KeyCode::Char('k') if len > 0 => {
                let prev = self.picker.selected().map_or(0, |i| (i + len - 1) % len);
                self.picker.select(Some(prev));
            }
            KeyCode::Enter => {
                let name = self.picker.selected().and_then(|i| {
                    self.view
                        .areas()
                        .and_then(|index| index.areas.get(i))
                        .map(|area| area.name.clone())
                });
                self.mode = Mode::Normal;
                if let Some(name) = name {
                    match self.view.select_region(&name) {
                        Ok(()) => self.input = name,
                        Err(err) => self.view.fail(&err),
                    }
                }
            }
            _ => {}
        }
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<Outcome> {
    loop {
        terminal.draw(|f| ui(f, &mut *app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Outcome::Continue => {}
            Outcome::Fetch => {
                app.view.begin_fetch();
                terminal.draw(|f| ui(f, &mut *app))?;
                app.fetch();
            }
            outcome @ (Outcome::Quit | Outcome::Logout) => return Ok(outcome),
        }
    }
}
