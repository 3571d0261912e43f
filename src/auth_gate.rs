//! Login visibility derived from authentication state.
//!
//! The gate holds no authentication truth. It is fed snapshots from the auth
//! collaborator and answers with a visibility action only when the derived
//! state actually changes.

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthState {
    #[default]
    Uninitialized,
    Unauthenticated,
    Authenticated,
}

/// What the auth collaborator currently reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    pub initialized: bool,
    pub loading: bool,
    pub authenticated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateAction {
    None,
    ShowLogin,
    HideLogin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateView {
    Loading,
    Ready,
}

#[derive(Debug, Default)]
pub struct AuthGate {
    state: AuthState,
    loading: bool,
}

impl AuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn view(&self) -> GateView {
        if self.loading || self.state == AuthState::Uninitialized {
            GateView::Loading
        } else {
            GateView::Ready
        }
    }

    /// Feed the latest snapshot; returns the action to take, if any.
    ///
    /// Once initialized the gate never returns to `Uninitialized`. While the
    /// collaborator is loading no transition is taken.
    pub fn observe(&mut self, snapshot: AuthSnapshot) -> GateAction {
        self.loading = snapshot.loading;
        if snapshot.loading || !snapshot.initialized {
            return GateAction::None;
        }

        let next = if snapshot.authenticated {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };
        if next == self.state {
            return GateAction::None;
        }

        debug!(from = ?self.state, to = ?next, "Auth gate transition");
        self.state = next;
        match next {
            AuthState::Authenticated => GateAction::HideLogin,
            AuthState::Unauthenticated => GateAction::ShowLogin,
            AuthState::Uninitialized => GateAction::None,
        }
    }
}
