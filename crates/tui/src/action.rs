//! Actions produced by input resolution and executed by `App::dispatch`.
//!
//! Input handling returns actions instead of mutating state or touching
//! storage/network directly, so every side effect funnels through one
//! place.

use taskmux_config::Direction;

use crate::app::route::Route;

/// A side-effectful operation requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Navigate to a route; the guard may substitute another destination.
    Navigate(Route),
    /// Reload the data behind the current route.
    Refresh,
    /// Submit the login form.
    SubmitLogin,
    /// Save the setup form's server address.
    SubmitSetup,
    /// Create a task from the new-task form.
    SubmitNewTask,
    /// Send the selected shortcut-bar item to the current task.
    SendBarItem,
    /// Send the typed command line to the current task.
    SendCommandInput,
    /// Open the selected task's detail view.
    OpenSelectedTask,
    StopSelectedTask,
    RestoreSelectedTask,
    DeleteSelectedTask,
    /// Enter the selected directory or preview the selected file.
    OpenSelectedFile,
    /// Toggle the selected shortcut item's enabled flag.
    ToggleSelectedShortcut,
    /// Reorder the selected shortcut item.
    MoveSelectedShortcut(Direction),
    DeleteSelectedShortcut,
    ResetShortcuts,
}
