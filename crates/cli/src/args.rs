//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).

use clap::{Parser, Subcommand, ValueEnum};

use taskmux_config::{Category, Direction};

#[derive(Parser)]
#[command(name = "taskmux-cli")]
#[command(about = "Manage a taskmux server from the command line", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  taskmux-cli login admin\n  taskmux-cli tasks list\n  taskmux-cli tasks send 3 '/help'\n  taskmux-cli tasks key 3 C-c\n  taskmux-cli shortcuts add-key --label Suspend -m C z\n  taskmux-cli server set 10.0.0.5 8000\n"
)]
pub struct Cli {
    /// Server host override for this invocation
    #[arg(long, global = true, env = "TASKMUX_HOST")]
    pub host: Option<String>,

    /// Server port override for this invocation
    #[arg(long, global = true, env = "TASKMUX_PORT")]
    pub port: Option<u16>,

    /// Emit JSON instead of human-readable tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the auth token
    Login {
        username: String,
        /// Password (falls back to the environment for scripting)
        #[arg(long, env = "TASKMUX_PASSWORD")]
        password: String,
    },
    /// Discard the stored auth token
    Logout,
    /// Probe server health
    Health,
    /// Task operations
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Shortcut configuration
    Shortcuts {
        #[command(subcommand)]
        command: ShortcutCommands,
    },
    /// Stored server address
    Server {
        #[command(subcommand)]
        command: ServerCommands,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// List tasks
    List,
    /// Show a task with its captured output
    Show { id: u64 },
    /// Create a task
    New {
        name: String,
        /// Working directory on the server
        work_dir: String,
    },
    /// Send a command line to a task
    Send { id: u64, command: String },
    /// Send a key in compact notation (e.g. C-c)
    Key { id: u64, key: String },
    /// Stop a running task
    Stop { id: u64 },
    /// Restore a stopped task
    Restore { id: u64 },
    /// Delete a task
    Rm { id: u64 },
}

#[derive(Subcommand)]
pub enum ShortcutCommands {
    /// List the configured shortcuts of all three categories
    List,
    /// Add a command button
    AddCommand {
        #[arg(long)]
        label: String,
        command: String,
    },
    /// Add a custom key shortcut
    AddKey {
        #[arg(long)]
        label: String,
        /// Modifier code (repeatable): C, S or M
        #[arg(short = 'm', long = "modifier")]
        modifiers: Vec<String>,
        key: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Remove an item by id
    Rm {
        category: CategoryArg,
        id: String,
    },
    /// Move an item up or down within its category
    Move {
        category: CategoryArg,
        id: String,
        direction: DirectionArg,
    },
    /// Toggle an item's enabled flag
    Toggle {
        category: CategoryArg,
        id: String,
    },
    /// Revert to the built-in defaults
    Reset,
}

#[derive(Subcommand)]
pub enum ServerCommands {
    /// Store a server address
    Set {
        host: String,
        port: Option<u16>,
    },
    /// Show the stored address and derived base URL
    Show,
    /// Clear the stored address (fall back to defaults)
    Clear,
}

/// Clap-friendly mirror of `taskmux_config::Category`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Basic,
    Commands,
    Shortcuts,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Basic => Category::Basic,
            CategoryArg::Commands => Category::Commands,
            CategoryArg::Shortcuts => Category::Shortcuts,
        }
    }
}

/// Clap-friendly mirror of `taskmux_config::Direction`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    Up,
    Down,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => Direction::Up,
            DirectionArg::Down => Direction::Down,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tasks_send() {
        let cli = Cli::try_parse_from(["taskmux-cli", "tasks", "send", "3", "/help"]).unwrap();
        match cli.command {
            Commands::Tasks {
                command: TaskCommands::Send { id, command },
            } => {
                assert_eq!(id, 3);
                assert_eq!(command, "/help");
            }
            _ => panic!("Expected tasks send"),
        }
    }

    #[test]
    fn test_parse_shortcuts_add_key_with_modifiers() {
        let cli = Cli::try_parse_from([
            "taskmux-cli",
            "shortcuts",
            "add-key",
            "--label",
            "Suspend",
            "-m",
            "C",
            "-m",
            "S",
            "z",
        ])
        .unwrap();
        match cli.command {
            Commands::Shortcuts {
                command:
                    ShortcutCommands::AddKey {
                        label,
                        modifiers,
                        key,
                        ..
                    },
            } => {
                assert_eq!(label, "Suspend");
                assert_eq!(modifiers, vec!["C", "S"]);
                assert_eq!(key, "z");
            }
            _ => panic!("Expected shortcuts add-key"),
        }
    }

    #[test]
    fn test_global_host_flag() {
        let cli =
            Cli::try_parse_from(["taskmux-cli", "--host", "tasks.lan", "tasks", "list"]).unwrap();
        assert_eq!(cli.host.as_deref(), Some("tasks.lan"));
    }
}
