//! Screen routes and the navigation guard.
//!
//! Responsibilities:
//! - Define the route enum and its auth metadata.
//! - Resolve requested navigation against auth/setup state (`resolve`).
//!
//! Does NOT handle:
//! - Loading data for the destination (see `App::dispatch`).
//! - Rendering (see `ui`).
//!
//! Invariants:
//! - Guard rules are evaluated in fixed priority order; only the first
//!   matching rule fires.
//! - The guard is pure: it never touches storage or the network itself.

/// One screen of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// First-run server configuration (embedded wrapper only).
    Setup,
    Login,
    /// The home screen.
    TaskList,
    TaskDetail(u64),
    NewTask,
    Settings,
    FileBrowser,
    /// Full-screen view of a task's terminal output.
    Terminal(u64),
}

impl Route {
    /// Whether the route may only be shown with a stored auth token.
    pub fn requires_auth(self) -> bool {
        !matches!(self, Route::Setup | Route::Login)
    }

    /// Title shown in the header bar.
    pub fn title(self) -> &'static str {
        match self {
            Route::Setup => "Server Setup",
            Route::Login => "Login",
            Route::TaskList => "Tasks",
            Route::TaskDetail(_) => "Task",
            Route::NewTask => "New Task",
            Route::Settings => "Settings",
            Route::FileBrowser => "Files",
            Route::Terminal(_) => "Terminal",
        }
    }
}

/// The facts the navigation guard consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardContext {
    /// An auth token is stored.
    pub has_token: bool,
    /// Running inside the embedded wrapper shell.
    pub is_embedded: bool,
    /// A server host has been configured.
    pub has_server_config: bool,
}

/// Resolves a requested transition against the guard rules.
///
/// Rules, in priority order (first match wins):
/// 1. Embedded context without server config forces Setup.
/// 2. An auth-requiring target without a token forces Login.
/// 3. Login with a token in hand forces the home screen.
/// 4. Setup with a server already configured forces Login.
/// 5. Otherwise the requested target stands.
pub fn resolve(target: Route, ctx: &GuardContext) -> Route {
    if ctx.is_embedded && !ctx.has_server_config && target != Route::Setup {
        return Route::Setup;
    }
    if target.requires_auth() && !ctx.has_token {
        return Route::Login;
    }
    if target == Route::Login && ctx.has_token {
        return Route::TaskList;
    }
    if target == Route::Setup && ctx.has_server_config {
        return Route::Login;
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROWSER_NO_TOKEN: GuardContext = GuardContext {
        has_token: false,
        is_embedded: false,
        has_server_config: false,
    };

    const BROWSER_WITH_TOKEN: GuardContext = GuardContext {
        has_token: true,
        is_embedded: false,
        has_server_config: false,
    };

    #[test]
    fn test_auth_routes_metadata() {
        assert!(!Route::Setup.requires_auth());
        assert!(!Route::Login.requires_auth());
        assert!(Route::TaskList.requires_auth());
        assert!(Route::TaskDetail(1).requires_auth());
        assert!(Route::NewTask.requires_auth());
        assert!(Route::Settings.requires_auth());
        assert!(Route::FileBrowser.requires_auth());
        assert!(Route::Terminal(1).requires_auth());
    }

    #[test]
    fn test_no_token_forces_login_for_any_auth_target() {
        for target in [
            Route::TaskList,
            Route::TaskDetail(3),
            Route::NewTask,
            Route::Settings,
            Route::FileBrowser,
            Route::Terminal(3),
        ] {
            assert_eq!(resolve(target, &BROWSER_NO_TOKEN), Route::Login);
        }
    }

    #[test]
    fn test_login_with_token_goes_home() {
        assert_eq!(resolve(Route::Login, &BROWSER_WITH_TOKEN), Route::TaskList);
    }

    #[test]
    fn test_login_without_token_allowed() {
        assert_eq!(resolve(Route::Login, &BROWSER_NO_TOKEN), Route::Login);
    }

    #[test]
    fn test_embedded_first_run_forces_setup() {
        let ctx = GuardContext {
            has_token: false,
            is_embedded: true,
            has_server_config: false,
        };
        assert_eq!(resolve(Route::TaskList, &ctx), Route::Setup);
        assert_eq!(resolve(Route::Login, &ctx), Route::Setup);
        // Already heading to Setup: rule 1 does not loop.
        assert_eq!(resolve(Route::Setup, &ctx), Route::Setup);
    }

    #[test]
    fn test_embedded_setup_wins_over_missing_token() {
        // Rule 1 outranks rule 2 even though both match.
        let ctx = GuardContext {
            has_token: false,
            is_embedded: true,
            has_server_config: false,
        };
        assert_eq!(resolve(Route::Settings, &ctx), Route::Setup);
    }

    #[test]
    fn test_configured_setup_redirects_to_login() {
        let ctx = GuardContext {
            has_token: false,
            is_embedded: true,
            has_server_config: true,
        };
        assert_eq!(resolve(Route::Setup, &ctx), Route::Login);

        // Same outside the wrapper.
        let ctx = GuardContext {
            has_server_config: true,
            ..BROWSER_NO_TOKEN
        };
        assert_eq!(resolve(Route::Setup, &ctx), Route::Login);
    }

    #[test]
    fn test_setup_with_token_and_config_still_redirects_to_login() {
        // Rule 4 fires after rules 2/3 pass; the Login redirect then shows
        // as-is because resolve runs once per transition.
        let ctx = GuardContext {
            has_token: true,
            is_embedded: true,
            has_server_config: true,
        };
        assert_eq!(resolve(Route::Setup, &ctx), Route::Login);
    }

    #[test]
    fn test_allowed_transition_passes_through() {
        let ctx = GuardContext {
            has_token: true,
            is_embedded: false,
            has_server_config: true,
        };
        assert_eq!(resolve(Route::Settings, &ctx), Route::Settings);
        assert_eq!(resolve(Route::TaskDetail(9), &ctx), Route::TaskDetail(9));
    }
}
