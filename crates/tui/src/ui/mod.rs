//! Screen rendering.
//!
//! Pure view layer: reads `App` state, draws widgets, mutates nothing.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap};

use taskmux_config::keys::display_name;
use taskmux_config::shortcuts::Category;

use crate::app::route::Route;
use crate::app::{App, BarItem, LoginField, NewTaskField, SetupField};

const ACCENT: Color = Color::Cyan;

/// Renders one frame.
pub fn render(frame: &mut Frame, app: &App) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(frame.area());

    render_header(frame, app, header);
    match app.route {
        Route::TaskList => render_task_list(frame, app, body),
        Route::TaskDetail(_) => render_task_detail(frame, app, body),
        Route::Terminal(_) => render_terminal(frame, app, body),
        Route::Login => render_login(frame, app, body),
        Route::Setup => render_setup(frame, app, body),
        Route::NewTask => render_new_task(frame, app, body),
        Route::Settings => render_settings(frame, app, body),
        Route::FileBrowser => render_files(frame, app, body),
    }
    render_footer(frame, app, footer);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            "taskmux",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" — "),
        Span::raw(app.route.title()),
    ]);
    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(title).block(block), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let text = match &app.status {
        Some(status) => Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(hints_for(app)),
    };
    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn hints_for(app: &App) -> &'static str {
    match app.route {
        Route::TaskList => "↑/↓ select · Enter open · n new · s settings · f files · x stop · o restore · d delete · r refresh · q quit",
        Route::TaskDetail(_) => "←/→ pick key · Enter send · i command · t terminal · r refresh · Esc back",
        Route::Terminal(_) => "r refresh · Esc back",
        Route::Login => "Tab switch field · Enter log in · Ctrl+q quit",
        Route::Setup => "Tab switch field · Enter save · Ctrl+q quit",
        Route::NewTask => "Tab switch field · Enter create · Esc cancel",
        Route::Settings => "Tab category · Space toggle · K/J reorder · d delete · R reset · Esc back",
        Route::FileBrowser => "↑/↓ select · Enter open · Esc back",
    }
}

fn render_task_list(frame: &mut Frame, app: &App, area: Rect) {
    let rows: Vec<Row> = app
        .tasks
        .iter()
        .map(|task| {
            let status_style = if task.is_running() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Row::new(vec![
                Span::raw(task.id.to_string()),
                Span::raw(task.name.clone()),
                Span::styled(task.status.clone(), status_style),
                Span::raw(task.work_dir.clone()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(24),
            Constraint::Length(10),
            Constraint::Min(10),
        ],
    )
    .header(Row::new(vec!["ID", "Name", "Status", "Directory"]).style(Style::default().add_modifier(Modifier::BOLD)))
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .block(Block::default().borders(Borders::ALL).title("Tasks"));

    let mut state = TableState::default();
    if !app.tasks.is_empty() {
        state.select(Some(app.selected_task));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_task_detail(frame: &mut Frame, app: &App, area: Rect) {
    let [output_area, bar_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);

    let output = app
        .detail
        .as_ref()
        .map(|d| d.output.clone())
        .unwrap_or_default();
    let title = app
        .detail
        .as_ref()
        .map(|d| format!("{} ({})", d.name, d.status))
        .unwrap_or_else(|| "Output".to_string());
    frame.render_widget(
        Paragraph::new(output)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(title)),
        output_area,
    );

    // Either the command-line overlay or the shortcut bar.
    if let Some(buffer) = &app.command_input {
        frame.render_widget(
            Paragraph::new(format!("> {}", buffer))
                .block(Block::default().borders(Borders::ALL).title("Command")),
            bar_area,
        );
        return;
    }

    let mut spans = Vec::new();
    for (index, item) in app.bar.iter().enumerate() {
        let style = if index == app.selected_bar {
            Style::default().fg(ACCENT).add_modifier(Modifier::REVERSED)
        } else {
            match item {
                BarItem::Key { .. } => Style::default(),
                BarItem::Command { .. } => Style::default().fg(Color::Magenta),
            }
        };
        spans.push(Span::styled(format!(" {} ", item.label()), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Shortcuts")),
        bar_area,
    );
}

fn render_terminal(frame: &mut Frame, app: &App, area: Rect) {
    let output = app
        .detail
        .as_ref()
        .map(|d| d.output.clone())
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(output)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(style)
}

fn form_rows(area: Rect) -> [Rect; 2] {
    let [_, first, second, _] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);
    [first, second]
}

fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let [username_area, password_area] = form_rows(area);

    frame.render_widget(
        Paragraph::new(app.login.username.clone()).block(field_block(
            "Username",
            app.login.focus == LoginField::Username,
        )),
        username_area,
    );
    let masked = "*".repeat(app.login.password.chars().count());
    frame.render_widget(
        Paragraph::new(masked).block(field_block(
            "Password",
            app.login.focus == LoginField::Password,
        )),
        password_area,
    );
}

fn render_setup(frame: &mut Frame, app: &App, area: Rect) {
    let [host_area, port_area] = form_rows(area);

    frame.render_widget(
        Paragraph::new(app.setup.host.clone())
            .block(field_block("Server host", app.setup.focus == SetupField::Host)),
        host_area,
    );
    frame.render_widget(
        Paragraph::new(app.setup.port.clone())
            .block(field_block("Server port", app.setup.focus == SetupField::Port)),
        port_area,
    );
}

fn render_new_task(frame: &mut Frame, app: &App, area: Rect) {
    let [name_area, dir_area] = form_rows(area);

    frame.render_widget(
        Paragraph::new(app.new_task.name.clone()).block(field_block(
            "Task name",
            app.new_task.focus == NewTaskField::Name,
        )),
        name_area,
    );
    frame.render_widget(
        Paragraph::new(app.new_task.work_dir.clone()).block(field_block(
            "Working directory",
            app.new_task.focus == NewTaskField::WorkDir,
        )),
        dir_area,
    );
}

fn render_settings(frame: &mut Frame, app: &App, area: Rect) {
    let [tabs_area, list_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    let mut tabs = Vec::new();
    for category in [Category::Basic, Category::Commands, Category::Shortcuts] {
        let style = if category == app.settings_tab {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tabs.push(Span::styled(format!(" {} ", category), style));
    }
    frame.render_widget(Paragraph::new(Line::from(tabs)), tabs_area);

    let items: Vec<ListItem> = match app.settings_tab {
        Category::Basic => app
            .shortcut_set
            .basic
            .iter()
            .map(|i| settings_row(&i.label, &i.key, i.enabled))
            .collect(),
        Category::Commands => app
            .shortcut_set
            .commands
            .iter()
            .map(|i| settings_row(&i.label, &i.command, i.enabled))
            .collect(),
        Category::Shortcuts => app
            .shortcut_set
            .shortcuts
            .iter()
            .map(|i| settings_row(&i.label, &display_name(&i.combo()), i.enabled))
            .collect(),
    };

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(Block::default().borders(Borders::ALL).title("Shortcut Settings"));

    let mut state = ListState::default();
    if app.settings_len() > 0 {
        state.select(Some(app.selected_setting));
    }
    frame.render_stateful_widget(list, list_area, &mut state);
}

fn settings_row(label: &str, value: &str, enabled: bool) -> ListItem<'static> {
    let marker = if enabled { "[x]" } else { "[ ]" };
    let style = if enabled {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    ListItem::new(Line::from(Span::styled(
        format!("{} {:<16} {}", marker, label, value),
        style,
    )))
}

fn render_files(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(preview) = &app.file_preview {
        frame.render_widget(
            Paragraph::new(preview.content.clone())
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title(preview.path.clone())),
            area,
        );
        return;
    }

    let (title, items): (String, Vec<ListItem>) = match &app.listing {
        Some(listing) => (
            listing.path.clone(),
            listing
                .entries
                .iter()
                .map(|e| {
                    let name = if e.is_dir {
                        format!("{}/", e.name)
                    } else {
                        e.name.clone()
                    };
                    ListItem::new(name)
                })
                .collect(),
        ),
        None => ("Files".to_string(), Vec::new()),
    };

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(Block::default().borders(Borders::ALL).title(title));

    let mut state = ListState::default();
    if app.listing.as_ref().is_some_and(|l| !l.entries.is_empty()) {
        state.select(Some(app.selected_file));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
