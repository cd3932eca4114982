//! In-memory authentication state

/// The two states of the session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Unauthenticated,
    Authenticated,
}

/// What consumers observe about the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub status: AuthStatus,
    pub user_email: Option<String>,
    /// True until the start-up check has finished
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: AuthStatus::Unauthenticated,
            user_email: None,
            loading: true, // Resolved by check_auth_on_load
        }
    }
}

impl SessionState {
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.status, AuthStatus::Authenticated)
    }

    pub(crate) fn authenticate(&mut self, user_email: Option<String>) {
        self.status = AuthStatus::Authenticated;
        self.user_email = user_email;
    }

    pub(crate) fn clear(&mut self) {
        self.status = AuthStatus::Unauthenticated;
        self.user_email = None;
    }
}
