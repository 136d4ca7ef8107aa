//! Application state and side-effect dispatch.
//!
//! Responsibilities:
//! - Hold the per-screen UI state and the current route.
//! - Mediate every screen change through the navigation guard.
//! - Execute actions (network calls, shortcut CRUD) and fold results back
//!   into state.
//!
//! Does NOT handle:
//! - Key-to-action resolution (see `input`).
//! - Rendering (see `ui`).

pub mod input;
pub mod route;

use taskmux_client::{ClientError, TaskCreate, TaskDetail, TaskmuxClient};
use taskmux_client::{SharedSettings, Task};
use taskmux_config::constants::KEY_AUTH_TOKEN;
use taskmux_config::keys::to_compact;
use taskmux_config::server::{self, ServerAddress};
use taskmux_config::shortcuts::{
    BasicKeyPatch, Category, CommandPatch, ShortcutBook, ShortcutPatch, ShortcutSet,
};
use taskmux_config::storage::SettingsStore;
use taskmux_config::Direction;

use crate::action::Action;
use crate::app::route::{GuardContext, Route, resolve};

/// Number of ticks a status message stays visible.
const STATUS_TICKS: u8 = 20;

/// One button of the shortcut bar shown on the task detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarItem {
    /// Sends a key in compact notation.
    Key { label: String, compact: String },
    /// Sends a literal command line.
    Command { label: String, command: String },
}

impl BarItem {
    pub fn label(&self) -> &str {
        match self {
            Self::Key { label, .. } => label,
            Self::Command { label, .. } => label,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupField {
    #[default]
    Host,
    Port,
}

#[derive(Debug, Default)]
pub struct SetupForm {
    pub host: String,
    pub port: String,
    pub focus: SetupField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewTaskField {
    #[default]
    Name,
    WorkDir,
}

#[derive(Debug, Default)]
pub struct NewTaskForm {
    pub name: String,
    pub work_dir: String,
    pub focus: NewTaskField,
}

/// The application state.
pub struct App {
    pub route: Route,
    pub should_quit: bool,
    pub status: Option<String>,
    status_ticks: u8,
    /// Probed once at startup; never re-evaluated mid-session.
    embedded: bool,
    settings: SharedSettings,

    // Task list
    pub tasks: Vec<Task>,
    pub selected_task: usize,

    // Task detail
    pub detail: Option<TaskDetail>,
    pub bar: Vec<BarItem>,
    pub selected_bar: usize,
    /// `Some` while the user is typing a command line on the detail screen.
    pub command_input: Option<String>,

    // Forms
    pub login: LoginForm,
    pub setup: SetupForm,
    pub new_task: NewTaskForm,

    // Settings screen
    pub settings_tab: Category,
    pub selected_setting: usize,
    pub shortcut_set: ShortcutSet,

    // File browser
    pub listing: Option<taskmux_client::DirectoryListing>,
    pub selected_file: usize,
    pub file_preview: Option<taskmux_client::FileContent>,
}

impl App {
    /// Creates the app, resolving the initial route through the guard so a
    /// fresh start lands on Setup/Login as appropriate.
    pub fn new(settings: SharedSettings, embedded: bool) -> Self {
        let mut app = Self {
            route: Route::TaskList,
            should_quit: false,
            status: None,
            status_ticks: 0,
            embedded,
            settings,
            tasks: Vec::new(),
            selected_task: 0,
            detail: None,
            bar: Vec::new(),
            selected_bar: 0,
            command_input: None,
            login: LoginForm::default(),
            setup: SetupForm::default(),
            new_task: NewTaskForm::default(),
            settings_tab: Category::Basic,
            selected_setting: 0,
            shortcut_set: ShortcutSet::defaults(),
            listing: None,
            selected_file: 0,
            file_preview: None,
        };
        app.route = resolve(Route::TaskList, &app.guard_context());
        app
    }

    fn with_settings<R>(&self, f: impl FnOnce(&mut (dyn SettingsStore + Send)) -> R) -> R {
        let mut guard = self.settings.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut *guard)
    }

    /// The facts the navigation guard consults, read fresh from storage.
    pub fn guard_context(&self) -> GuardContext {
        let (has_token, has_server_config) = self.with_settings(|s| {
            (
                s.get(KEY_AUTH_TOKEN).is_some(),
                server::has_server_config(s),
            )
        });
        GuardContext {
            has_token,
            is_embedded: self.embedded,
            has_server_config,
        }
    }

    /// Changes route through the guard; returns the resolved destination.
    pub fn navigate(&mut self, target: Route) -> Route {
        let resolved = resolve(target, &self.guard_context());
        if resolved != target {
            tracing::debug!(?target, ?resolved, "Navigation redirected by guard");
        }
        self.route = resolved;
        resolved
    }

    /// The task the detail/terminal screens are showing.
    pub fn current_task_id(&self) -> Option<u64> {
        match self.route {
            Route::TaskDetail(id) | Route::Terminal(id) => Some(id),
            _ => None,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
        self.status_ticks = STATUS_TICKS;
    }

    pub fn on_tick(&mut self) {
        if self.status_ticks > 0 {
            self.status_ticks -= 1;
            if self.status_ticks == 0 {
                self.status = None;
            }
        }
    }

    /// Number of rows in the currently selected settings category.
    pub fn settings_len(&self) -> usize {
        match self.settings_tab {
            Category::Basic => self.shortcut_set.basic.len(),
            Category::Commands => self.shortcut_set.commands.len(),
            Category::Shortcuts => self.shortcut_set.shortcuts.len(),
        }
    }

    fn selected_shortcut(&self) -> Option<(Category, String, bool)> {
        match self.settings_tab {
            Category::Basic => self
                .shortcut_set
                .basic
                .get(self.selected_setting)
                .map(|i| (Category::Basic, i.id.clone(), i.enabled)),
            Category::Commands => self
                .shortcut_set
                .commands
                .get(self.selected_setting)
                .map(|i| (Category::Commands, i.id.clone(), i.enabled)),
            Category::Shortcuts => self
                .shortcut_set
                .shortcuts
                .get(self.selected_setting)
                .map(|i| (Category::Shortcuts, i.id.clone(), i.enabled)),
        }
    }

    /// Reloads the shortcut document and rebuilds the detail-screen bar
    /// from the enabled items, in stored order.
    pub fn reload_shortcuts(&mut self) {
        let set = self.with_settings(|s| ShortcutBook::new(s).get());

        let mut bar = Vec::new();
        for item in set.basic.iter().filter(|i| i.enabled) {
            bar.push(BarItem::Key {
                label: item.label.clone(),
                compact: item.key.clone(),
            });
        }
        for item in set.commands.iter().filter(|i| i.enabled) {
            bar.push(BarItem::Command {
                label: item.label.clone(),
                command: item.command.clone(),
            });
        }
        for item in set.shortcuts.iter().filter(|i| i.enabled) {
            bar.push(BarItem::Key {
                label: item.label.clone(),
                compact: to_compact(&item.combo()),
            });
        }

        self.shortcut_set = set;
        self.bar = bar;
        self.selected_bar = self.selected_bar.min(self.bar.len().saturating_sub(1));
        self.selected_setting = self
            .selected_setting
            .min(self.settings_len().saturating_sub(1));
    }

    fn report_error(&mut self, err: ClientError) {
        if err.is_auth_error() {
            tracing::info!("Authorization failed, redirecting to login");
            self.set_status("Session expired, please log in again");
            self.navigate(Route::Login);
        } else {
            tracing::error!(error = %err, "Request failed");
            self.set_status(err.to_string());
        }
    }

    /// Executes an action against the client and folds the result into
    /// state. All side effects run here, one at a time.
    pub async fn dispatch(&mut self, action: Action, client: &mut TaskmuxClient) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Navigate(target) => {
                let resolved = self.navigate(target);
                self.load_route(resolved, client).await;
            }
            Action::Refresh => self.load_route(self.route, client).await,
            Action::SubmitLogin => self.submit_login(client).await,
            Action::SubmitSetup => self.submit_setup(client).await,
            Action::SubmitNewTask => self.submit_new_task(client).await,
            Action::SendBarItem => self.send_bar_item(client).await,
            Action::SendCommandInput => self.send_command_input(client).await,
            Action::OpenSelectedTask => {
                if let Some(task) = self.tasks.get(self.selected_task) {
                    let id = task.id;
                    let resolved = self.navigate(Route::TaskDetail(id));
                    self.load_route(resolved, client).await;
                }
            }
            Action::StopSelectedTask => {
                if let Some(id) = self.selected_task_id() {
                    match client.stop_task(id).await {
                        Ok(ack) => self.set_status(ack.message),
                        Err(e) => self.report_error(e),
                    }
                    self.load_tasks(client).await;
                }
            }
            Action::RestoreSelectedTask => {
                if let Some(id) = self.selected_task_id() {
                    match client.restore_task(id).await {
                        Ok(ack) => self.set_status(ack.message),
                        Err(e) => self.report_error(e),
                    }
                    self.load_tasks(client).await;
                }
            }
            Action::DeleteSelectedTask => {
                if let Some(id) = self.selected_task_id() {
                    match client.delete_task(id).await {
                        Ok(ack) => self.set_status(ack.message),
                        Err(e) => self.report_error(e),
                    }
                    self.load_tasks(client).await;
                }
            }
            Action::OpenSelectedFile => self.open_selected_file(client).await,
            Action::ToggleSelectedShortcut => self.toggle_selected_shortcut(),
            Action::MoveSelectedShortcut(direction) => self.move_selected_shortcut(direction),
            Action::DeleteSelectedShortcut => {
                if let Some((category, id, _)) = self.selected_shortcut() {
                    let result =
                        self.with_settings(|s| ShortcutBook::new(s).remove(category, &id));
                    if let Err(e) = result {
                        self.set_status(e.to_string());
                    }
                    self.reload_shortcuts();
                }
            }
            Action::ResetShortcuts => {
                let result = self.with_settings(|s| ShortcutBook::new(s).reset());
                match result {
                    Ok(_) => self.set_status("Shortcuts reset to defaults"),
                    Err(e) => self.set_status(e.to_string()),
                }
                self.reload_shortcuts();
            }
        }
    }

    fn selected_task_id(&self) -> Option<u64> {
        self.tasks.get(self.selected_task).map(|t| t.id)
    }

    /// Loads the data behind a route after navigation.
    async fn load_route(&mut self, route: Route, client: &mut TaskmuxClient) {
        match route {
            Route::TaskList => self.load_tasks(client).await,
            Route::TaskDetail(id) | Route::Terminal(id) => {
                self.reload_shortcuts();
                self.load_detail(id, client).await;
            }
            Route::Settings => self.reload_shortcuts(),
            Route::FileBrowser => {
                self.file_preview = None;
                self.load_directory(None, client).await;
            }
            Route::Setup => self.prefill_setup(),
            Route::NewTask => self.new_task = NewTaskForm::default(),
            Route::Login => {}
        }
    }

    async fn load_tasks(&mut self, client: &mut TaskmuxClient) {
        match client.list_tasks().await {
            Ok(tasks) => {
                self.tasks = tasks;
                self.selected_task = self.selected_task.min(self.tasks.len().saturating_sub(1));
            }
            Err(e) => self.report_error(e),
        }
    }

    async fn load_detail(&mut self, id: u64, client: &mut TaskmuxClient) {
        match client.get_task(id).await {
            Ok(detail) => self.detail = Some(detail),
            Err(e) => self.report_error(e),
        }
    }

    async fn load_directory(&mut self, path: Option<&str>, client: &mut TaskmuxClient) {
        match client.list_directory(path).await {
            Ok(listing) => {
                self.listing = Some(listing);
                self.selected_file = 0;
            }
            Err(e) => self.report_error(e),
        }
    }

    fn prefill_setup(&mut self) {
        let address = self.with_settings(|s| server::load(s));
        self.setup = SetupForm {
            host: address.host.unwrap_or_default(),
            port: address.port.map(|p| p.to_string()).unwrap_or_default(),
            focus: SetupField::Host,
        };
    }

    async fn submit_login(&mut self, client: &mut TaskmuxClient) {
        let username = self.login.username.trim().to_string();
        if username.is_empty() {
            self.set_status("Username is required");
            return;
        }
        match client.login(&username, &self.login.password).await {
            Ok(_) => {
                self.login.password.clear();
                self.set_status(format!("Logged in as {}", username));
                let resolved = self.navigate(Route::TaskList);
                self.load_route(resolved, client).await;
            }
            Err(e) => self.report_error(e),
        }
    }

    async fn submit_setup(&mut self, client: &mut TaskmuxClient) {
        let host = self.setup.host.trim().to_string();
        let port = match self.setup.port.trim() {
            "" => None,
            raw => match raw.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    self.set_status("Port must be a number");
                    return;
                }
            },
        };

        let address = ServerAddress {
            host: (!host.is_empty()).then_some(host),
            port,
        };
        if address.validate().is_err() {
            self.set_status("Invalid server address");
            return;
        }

        let result = self.with_settings(|s| server::save(s, &address));
        if let Err(e) = result {
            self.set_status(e.to_string());
            return;
        }

        // The live client follows the new address immediately.
        client.set_server_address(&address);
        self.set_status("Server address saved");
        let resolved = self.navigate(Route::Login);
        self.load_route(resolved, client).await;
    }

    async fn submit_new_task(&mut self, client: &mut TaskmuxClient) {
        let name = self.new_task.name.trim().to_string();
        let work_dir = self.new_task.work_dir.trim().to_string();
        if name.is_empty() || work_dir.is_empty() {
            self.set_status("Name and working directory are required");
            return;
        }

        match client.create_task(&TaskCreate { name, work_dir }).await {
            Ok(task) => {
                let resolved = self.navigate(Route::TaskDetail(task.id));
                self.load_route(resolved, client).await;
            }
            Err(e) => self.report_error(e),
        }
    }

    async fn send_bar_item(&mut self, client: &mut TaskmuxClient) {
        let Some(id) = self.current_task_id() else {
            return;
        };
        let Some(item) = self.bar.get(self.selected_bar).cloned() else {
            return;
        };

        let result = match &item {
            BarItem::Key { compact, .. } => client.send_shortcut(id, compact).await,
            BarItem::Command { command, .. } => client.send_input(id, command).await,
        };
        match result {
            Ok(ack) => {
                self.set_status(ack.message);
                self.load_detail(id, client).await;
            }
            Err(e) => self.report_error(e),
        }
    }

    async fn send_command_input(&mut self, client: &mut TaskmuxClient) {
        let Some(id) = self.current_task_id() else {
            return;
        };
        let Some(command) = self.command_input.take() else {
            return;
        };
        if command.trim().is_empty() {
            return;
        }

        match client.send_input(id, command.trim()).await {
            Ok(ack) => {
                self.set_status(ack.message);
                self.load_detail(id, client).await;
            }
            Err(e) => self.report_error(e),
        }
    }

    async fn open_selected_file(&mut self, client: &mut TaskmuxClient) {
        let Some(entry) = self
            .listing
            .as_ref()
            .and_then(|l| l.entries.get(self.selected_file))
            .cloned()
        else {
            return;
        };

        if entry.is_dir {
            self.load_directory(Some(&entry.path), client).await;
        } else {
            match client.read_file(&entry.path).await {
                Ok(content) => self.file_preview = Some(content),
                Err(e) => self.report_error(e),
            }
        }
    }

    fn toggle_selected_shortcut(&mut self) {
        let Some((category, id, enabled)) = self.selected_shortcut() else {
            return;
        };

        let result = self.with_settings(|s| {
            let mut book = ShortcutBook::new(s);
            match category {
                Category::Basic => book
                    .update_basic(
                        &id,
                        BasicKeyPatch {
                            enabled: Some(!enabled),
                            ..Default::default()
                        },
                    )
                    .map(|_| ()),
                Category::Commands => book
                    .update_command(
                        &id,
                        CommandPatch {
                            enabled: Some(!enabled),
                            ..Default::default()
                        },
                    )
                    .map(|_| ()),
                Category::Shortcuts => book
                    .update_shortcut(
                        &id,
                        ShortcutPatch {
                            enabled: Some(!enabled),
                            ..Default::default()
                        },
                    )
                    .map(|_| ()),
            }
        });
        if let Err(e) = result {
            self.set_status(e.to_string());
        }
        self.reload_shortcuts();
    }

    fn move_selected_shortcut(&mut self, direction: Direction) {
        let Some((category, id, _)) = self.selected_shortcut() else {
            return;
        };

        let result = self.with_settings(|s| ShortcutBook::new(s).move_item(category, &id, direction));
        match result {
            Ok(set) => {
                // Follow the item to its new position.
                let position = match category {
                    Category::Basic => set.basic.iter().position(|i| i.id == id),
                    Category::Commands => set.commands.iter().position(|i| i.id == id),
                    Category::Shortcuts => set.shortcuts.iter().position(|i| i.id == id),
                };
                if let Some(position) = position {
                    self.selected_setting = position;
                }
            }
            Err(e) => self.set_status(e.to_string()),
        }
        self.reload_shortcuts();
    }
}
