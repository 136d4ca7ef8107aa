//! Key-to-action resolution.
//!
//! Form text editing and list selection mutate local UI state directly;
//! everything with a side effect (network, shortcut CRUD, navigation)
//! comes back as an `Action` for `App::dispatch`.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use taskmux_config::Direction;
use taskmux_config::shortcuts::Category;

use crate::action::Action;
use crate::app::route::Route;
use crate::app::{App, LoginField, NewTaskField, SetupField};

/// Applies a key to a text field; returns whether it was consumed.
fn edit_field(field: &mut String, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(c) => {
            field.push(c);
            true
        }
        KeyCode::Backspace => {
            field.pop();
            true
        }
        _ => false,
    }
}

impl App {
    /// Resolves a terminal key event for the current route.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        // Ctrl+q quits from anywhere, including forms.
        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Action::Quit);
        }

        match self.route {
            Route::TaskList => self.handle_task_list_key(key),
            Route::TaskDetail(id) => self.handle_detail_key(id, key),
            Route::Terminal(id) => match key.code {
                KeyCode::Esc => Some(Action::Navigate(Route::TaskDetail(id))),
                KeyCode::Char('r') => Some(Action::Refresh),
                _ => None,
            },
            Route::Login => self.handle_login_key(key),
            Route::Setup => self.handle_setup_key(key),
            Route::NewTask => self.handle_new_task_key(key),
            Route::Settings => self.handle_settings_key(key),
            Route::FileBrowser => self.handle_files_key(key),
        }
    }

    fn handle_task_list_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_task = self.selected_task.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_task =
                    (self.selected_task + 1).min(self.tasks.len().saturating_sub(1));
                None
            }
            KeyCode::Enter => Some(Action::OpenSelectedTask),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('n') => Some(Action::Navigate(Route::NewTask)),
            KeyCode::Char('s') => Some(Action::Navigate(Route::Settings)),
            KeyCode::Char('f') => Some(Action::Navigate(Route::FileBrowser)),
            KeyCode::Char('x') => Some(Action::StopSelectedTask),
            KeyCode::Char('o') => Some(Action::RestoreSelectedTask),
            KeyCode::Char('d') => Some(Action::DeleteSelectedTask),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }

    fn handle_detail_key(&mut self, id: u64, key: KeyEvent) -> Option<Action> {
        // The command-line overlay swallows everything while open.
        if let Some(buffer) = &mut self.command_input {
            return match key.code {
                KeyCode::Esc => {
                    self.command_input = None;
                    None
                }
                KeyCode::Enter => Some(Action::SendCommandInput),
                code => {
                    edit_field(buffer, code);
                    None
                }
            };
        }

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_bar = self.selected_bar.saturating_sub(1);
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected_bar = (self.selected_bar + 1).min(self.bar.len().saturating_sub(1));
                None
            }
            KeyCode::Enter => Some(Action::SendBarItem),
            KeyCode::Char('i') => {
                self.command_input = Some(String::new());
                None
            }
            KeyCode::Char('t') => Some(Action::Navigate(Route::Terminal(id))),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Esc => Some(Action::Navigate(Route::TaskList)),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                self.login.focus = match self.login.focus {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
                None
            }
            KeyCode::Enter => Some(Action::SubmitLogin),
            code => {
                let field = match self.login.focus {
                    LoginField::Username => &mut self.login.username,
                    LoginField::Password => &mut self.login.password,
                };
                edit_field(field, code);
                None
            }
        }
    }

    fn handle_setup_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                self.setup.focus = match self.setup.focus {
                    SetupField::Host => SetupField::Port,
                    SetupField::Port => SetupField::Host,
                };
                None
            }
            KeyCode::Enter => Some(Action::SubmitSetup),
            code => {
                let field = match self.setup.focus {
                    SetupField::Host => &mut self.setup.host,
                    SetupField::Port => &mut self.setup.port,
                };
                edit_field(field, code);
                None
            }
        }
    }

    fn handle_new_task_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(Action::Navigate(Route::TaskList)),
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                self.new_task.focus = match self.new_task.focus {
                    NewTaskField::Name => NewTaskField::WorkDir,
                    NewTaskField::WorkDir => NewTaskField::Name,
                };
                None
            }
            KeyCode::Enter => Some(Action::SubmitNewTask),
            code => {
                let field = match self.new_task.focus {
                    NewTaskField::Name => &mut self.new_task.name,
                    NewTaskField::WorkDir => &mut self.new_task.work_dir,
                };
                edit_field(field, code);
                None
            }
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Tab => {
                self.settings_tab = match self.settings_tab {
                    Category::Basic => Category::Commands,
                    Category::Commands => Category::Shortcuts,
                    Category::Shortcuts => Category::Basic,
                };
                self.selected_setting = 0;
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_setting = self.selected_setting.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_setting =
                    (self.selected_setting + 1).min(self.settings_len().saturating_sub(1));
                None
            }
            KeyCode::Char(' ') | KeyCode::Char('e') => Some(Action::ToggleSelectedShortcut),
            KeyCode::Char('K') => Some(Action::MoveSelectedShortcut(Direction::Up)),
            KeyCode::Char('J') => Some(Action::MoveSelectedShortcut(Direction::Down)),
            KeyCode::Char('d') => Some(Action::DeleteSelectedShortcut),
            KeyCode::Char('R') => Some(Action::ResetShortcuts),
            KeyCode::Esc => Some(Action::Navigate(Route::TaskList)),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }

    fn handle_files_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.file_preview.is_some() {
            if key.code == KeyCode::Esc {
                self.file_preview = None;
            }
            return None;
        }

        let len = self.listing.as_ref().map(|l| l.entries.len()).unwrap_or(0);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_file = self.selected_file.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_file = (self.selected_file + 1).min(len.saturating_sub(1));
                None
            }
            KeyCode::Enter => Some(Action::OpenSelectedFile),
            KeyCode::Esc => Some(Action::Navigate(Route::TaskList)),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmux_client::shared_settings;
    use taskmux_config::MemorySettings;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn app_on(route: Route) -> App {
        let mut app = App::new(shared_settings(MemorySettings::new()), false);
        app.route = route;
        app
    }

    #[test]
    fn test_quit_from_task_list() {
        let mut app = app_on(Route::TaskList);
        assert_eq!(app.handle_key(press(KeyCode::Char('q'))), Some(Action::Quit));
    }

    #[test]
    fn test_ctrl_q_quits_even_inside_forms() {
        let mut app = app_on(Route::Login);
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(app.handle_key(key), Some(Action::Quit));
        // Plain q types into the field instead.
        assert_eq!(app.handle_key(press(KeyCode::Char('q'))), None);
        assert_eq!(app.login.username, "q");
    }

    #[test]
    fn test_login_form_typing_and_focus() {
        let mut app = app_on(Route::Login);
        for c in "admin".chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
        app.handle_key(press(KeyCode::Tab));
        for c in "secret".chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
        app.handle_key(press(KeyCode::Backspace));

        assert_eq!(app.login.username, "admin");
        assert_eq!(app.login.password, "secre");
        assert_eq!(
            app.handle_key(press(KeyCode::Enter)),
            Some(Action::SubmitLogin)
        );
    }

    #[test]
    fn test_detail_enter_sends_selected_bar_item() {
        let mut app = app_on(Route::TaskDetail(3));
        assert_eq!(
            app.handle_key(press(KeyCode::Enter)),
            Some(Action::SendBarItem)
        );
    }

    #[test]
    fn test_detail_command_overlay_swallows_keys() {
        let mut app = app_on(Route::TaskDetail(3));
        app.handle_key(press(KeyCode::Char('i')));
        assert_eq!(app.command_input.as_deref(), Some(""));

        // 'q' now types rather than quitting.
        assert_eq!(app.handle_key(press(KeyCode::Char('q'))), None);
        assert_eq!(app.command_input.as_deref(), Some("q"));

        assert_eq!(
            app.handle_key(press(KeyCode::Enter)),
            Some(Action::SendCommandInput)
        );
    }

    #[test]
    fn test_settings_keys_map_to_crud_actions() {
        let mut app = app_on(Route::Settings);
        assert_eq!(
            app.handle_key(press(KeyCode::Char(' '))),
            Some(Action::ToggleSelectedShortcut)
        );
        assert_eq!(
            app.handle_key(press(KeyCode::Char('J'))),
            Some(Action::MoveSelectedShortcut(Direction::Down))
        );
        assert_eq!(
            app.handle_key(press(KeyCode::Char('K'))),
            Some(Action::MoveSelectedShortcut(Direction::Up))
        );
        assert_eq!(
            app.handle_key(press(KeyCode::Char('R'))),
            Some(Action::ResetShortcuts)
        );
    }

    #[test]
    fn test_settings_tab_cycles_categories() {
        let mut app = app_on(Route::Settings);
        assert_eq!(app.settings_tab, Category::Basic);
        app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.settings_tab, Category::Commands);
        app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.settings_tab, Category::Shortcuts);
        app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.settings_tab, Category::Basic);
    }

    #[test]
    fn test_task_list_selection_clamps() {
        let mut app = app_on(Route::TaskList);
        app.handle_key(press(KeyCode::Up));
        assert_eq!(app.selected_task, 0);
        // Empty list: Down stays put.
        app.handle_key(press(KeyCode::Down));
        assert_eq!(app.selected_task, 0);
    }
}
