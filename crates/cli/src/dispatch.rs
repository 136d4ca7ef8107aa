//! Command execution.
//!
//! Responsibilities:
//! - Wire parsed arguments to client calls and settings-store operations.
//! - Print results (tables by default, JSON with `--json`).

use anyhow::{Context, Result, bail};

use taskmux_client::{SharedSettings, TaskCreate, TaskmuxClient, shared_settings};
use taskmux_config::keys::{self, KeyCombo, display_name, to_compact};
use taskmux_config::server::{self, ServerAddress};
use taskmux_config::shortcuts::{
    BasicKeyPatch, Category, CommandButton, CommandPatch, CustomShortcut, ShortcutBook,
    ShortcutPatch,
};
use taskmux_config::storage::SettingsStore;
use taskmux_config::FileSettings;

use crate::args::{Cli, Commands, ServerCommands, ShortcutCommands, TaskCommands};
use crate::formatters;

fn with_store<R>(
    settings: &SharedSettings,
    f: impl FnOnce(&mut (dyn SettingsStore + Send)) -> R,
) -> R {
    let mut guard = settings.lock().unwrap_or_else(|e| e.into_inner());
    f(&mut *guard)
}

/// Executes the parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let settings = shared_settings(FileSettings::open()?);
    let mut client = TaskmuxClient::from_settings(settings.clone())?;

    // Session-only overrides; nothing is persisted here.
    if cli.host.is_some() || cli.port.is_some() {
        let stored = with_store(&settings, |s| server::load(s));
        client.set_server_address(&ServerAddress {
            host: cli.host.clone().or(stored.host),
            port: cli.port.or(stored.port),
        });
    }

    tracing::debug!(base_url = %client.base_url(), "Dispatching command");

    match cli.command {
        Commands::Login { username, password } => {
            let token = client.login(&username, &password).await?;
            println!("Logged in as {} ({})", username, token.token_type);
        }
        Commands::Logout => {
            client.logout();
            println!("Logged out");
        }
        Commands::Health => {
            let health = client.health().await?;
            println!("Server status: {}", health.status);
        }
        Commands::Tasks { command } => run_tasks(command, &client, cli.json).await?,
        Commands::Shortcuts { command } => run_shortcuts(command, &settings, cli.json)?,
        Commands::Server { command } => run_server(command, &settings, &mut client, cli.json)?,
    }

    Ok(())
}

async fn run_tasks(command: TaskCommands, client: &TaskmuxClient, json: bool) -> Result<()> {
    match command {
        TaskCommands::List => {
            let tasks = client.list_tasks().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                print!("{}", formatters::task_table(&tasks));
            }
        }
        TaskCommands::Show { id } => {
            let detail = client.get_task(id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                println!("{}", formatters::task_detail(&detail));
            }
        }
        TaskCommands::New { name, work_dir } => {
            let task = client.create_task(&TaskCreate { name, work_dir }).await?;
            println!("Created task {} ({})", task.id, task.session);
        }
        TaskCommands::Send { id, command } => {
            let ack = client.send_input(id, &command).await?;
            println!("{}", ack.message);
        }
        TaskCommands::Key { id, key } => {
            keys::validate_compact(&key).with_context(|| format!("Invalid key '{}'", key))?;
            let ack = client.send_shortcut(id, &key).await?;
            println!("{}", ack.message);
        }
        TaskCommands::Stop { id } => {
            let ack = client.stop_task(id).await?;
            println!("{}", ack.message);
        }
        TaskCommands::Restore { id } => {
            let ack = client.restore_task(id).await?;
            println!("{}", ack.message);
        }
        TaskCommands::Rm { id } => {
            let ack = client.delete_task(id).await?;
            println!("{}", ack.message);
        }
    }
    Ok(())
}

fn run_shortcuts(command: ShortcutCommands, settings: &SharedSettings, json: bool) -> Result<()> {
    match command {
        ShortcutCommands::List => {
            let set = with_store(settings, |s| ShortcutBook::new(s).get());
            if json {
                println!("{}", serde_json::to_string_pretty(&set)?);
            } else {
                print!("{}", formatters::shortcut_table(&set));
            }
        }
        ShortcutCommands::AddCommand { label, command } => {
            let set = with_store(settings, |s| {
                ShortcutBook::new(s).add_command(CommandButton {
                    id: String::new(),
                    label,
                    command,
                    enabled: true,
                })
            })?;
            let added = set.commands.last().context("Added command is missing")?;
            println!("Added {} ({})", added.label, added.id);
        }
        ShortcutCommands::AddKey {
            label,
            modifiers,
            key,
            description,
        } => {
            let combo = KeyCombo {
                modifiers: modifiers.clone(),
                key: key.clone(),
            };
            let compact = to_compact(&combo);
            keys::validate_compact(&compact)
                .with_context(|| format!("Invalid key combination '{}'", compact))?;

            let set = with_store(settings, |s| {
                ShortcutBook::new(s).add_shortcut(CustomShortcut {
                    id: String::new(),
                    label,
                    modifiers,
                    key,
                    description,
                    enabled: true,
                })
            })?;
            let added = set.shortcuts.last().context("Added shortcut is missing")?;
            println!(
                "Added {} ({}) sending {}",
                added.label,
                added.id,
                display_name(&added.combo())
            );
        }
        ShortcutCommands::Rm { category, id } => {
            with_store(settings, |s| ShortcutBook::new(s).remove(category.into(), &id))?;
            println!("Removed {}", id);
        }
        ShortcutCommands::Move {
            category,
            id,
            direction,
        } => {
            with_store(settings, |s| {
                ShortcutBook::new(s).move_item(category.into(), &id, direction.into())
            })?;
            println!("Moved {}", id);
        }
        ShortcutCommands::Toggle { category, id } => {
            let category: Category = category.into();
            with_store(settings, |s| {
                let mut book = ShortcutBook::new(s);
                let set = book.get();
                match category {
                    Category::Basic => {
                        let enabled = set.basic.iter().find(|i| i.id == id).map(|i| i.enabled);
                        match enabled {
                            Some(enabled) => book.update_basic(
                                &id,
                                BasicKeyPatch {
                                    enabled: Some(!enabled),
                                    ..Default::default()
                                },
                            ),
                            None => Ok(set),
                        }
                    }
                    Category::Commands => {
                        let enabled = set.commands.iter().find(|i| i.id == id).map(|i| i.enabled);
                        match enabled {
                            Some(enabled) => book.update_command(
                                &id,
                                CommandPatch {
                                    enabled: Some(!enabled),
                                    ..Default::default()
                                },
                            ),
                            None => Ok(set),
                        }
                    }
                    Category::Shortcuts => {
                        let enabled = set.shortcuts.iter().find(|i| i.id == id).map(|i| i.enabled);
                        match enabled {
                            Some(enabled) => book.update_shortcut(
                                &id,
                                ShortcutPatch {
                                    enabled: Some(!enabled),
                                    ..Default::default()
                                },
                            ),
                            None => Ok(set),
                        }
                    }
                }
            })?;
            println!("Toggled {}", id);
        }
        ShortcutCommands::Reset => {
            with_store(settings, |s| ShortcutBook::new(s).reset())?;
            println!("Shortcuts reset to defaults");
        }
    }
    Ok(())
}

fn run_server(
    command: ServerCommands,
    settings: &SharedSettings,
    client: &mut TaskmuxClient,
    json: bool,
) -> Result<()> {
    match command {
        ServerCommands::Set { host, port } => {
            let address = ServerAddress {
                host: Some(host),
                port,
            };
            if address.validate().is_err() {
                bail!("Invalid server address: {}", address.base_url());
            }
            with_store(settings, |s| server::save(s, &address))?;
            // The live client follows immediately.
            client.set_server_address(&address);
            println!("Server set to {}", address.base_url());
        }
        ServerCommands::Show => {
            let address = with_store(settings, |s| server::load(s));
            if json {
                println!("{}", serde_json::to_string_pretty(&address)?);
            } else {
                println!("{}", formatters::server_address(&address));
            }
        }
        ServerCommands::Clear => {
            with_store(settings, |s| server::save(s, &ServerAddress::default()))?;
            println!("Server address cleared");
        }
    }
    Ok(())
}
