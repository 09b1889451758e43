//! Camera permission lifecycle.
//!
//! The gate asks the host platform for camera access the first time the
//! scan surface is requested and remembers the answer for as long as the
//! owning modal state lives. A revoke puts it back to the undetermined
//! state so the next request prompts again. Nothing here retries on its own.

/// Authorization state as tracked by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    /// The host has never been asked (or access was revoked).
    NotDetermined,
    /// The host has been asked and has not answered yet.
    Pending,
    Granted,
    Denied,
}

/// Answer to [`PermissionGate::request_access`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    Denied,
    /// No definitive answer yet. `prompt_host` is set exactly when the
    /// caller must now ask the host platform.
    Pending { prompt_host: bool },
}

/// Tracks camera authorization for one modal state.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    state: PermissionState,
}

impl Default for PermissionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionGate {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: PermissionState::NotDetermined,
        }
    }

    #[must_use]
    pub const fn state(&self) -> PermissionState {
        self.state
    }

    /// Requests access to the scan surface.
    pub fn request_access(&mut self) -> AccessDecision {
        match self.state {
            PermissionState::Granted => AccessDecision::Granted,
            PermissionState::Denied => AccessDecision::Denied,
            PermissionState::Pending => AccessDecision::Pending { prompt_host: false },
            PermissionState::NotDetermined => {
                tracing::debug!("requesting camera permission from host");
                self.state = PermissionState::Pending;
                AccessDecision::Pending { prompt_host: true }
            }
        }
    }

    /// Records the host's answer.
    pub fn resolve(&mut self, granted: bool) -> PermissionState {
        self.state = if granted {
            PermissionState::Granted
        } else {
            tracing::warn!("camera permission denied");
            PermissionState::Denied
        };
        self.state
    }

    /// Forgets a previous answer after the user revoked access.
    pub fn revoke(&mut self) {
        tracing::debug!(previous = ?self.state, "camera permission revoked");
        self.state = PermissionState::NotDetermined;
    }

    /// Returns `true` if decode events may be acted on.
    #[must_use]
    pub fn accepts_decodes(&self) -> bool {
        self.state == PermissionState::Granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_is_prompted_only_once() {
        let mut gate = PermissionGate::new();
        assert_eq!(gate.request_access(), AccessDecision::Pending { prompt_host: true });
        assert_eq!(gate.request_access(), AccessDecision::Pending { prompt_host: false });
        assert!(!gate.accepts_decodes());

        gate.resolve(true);
        assert_eq!(gate.request_access(), AccessDecision::Granted);
        assert!(gate.accepts_decodes());
    }

    #[test]
    fn denial_sticks_until_revoked() {
        let mut gate = PermissionGate::new();
        gate.request_access();
        gate.resolve(false);

        assert_eq!(gate.request_access(), AccessDecision::Denied);
        assert_eq!(gate.request_access(), AccessDecision::Denied);

        gate.revoke();
        assert_eq!(gate.state(), PermissionState::NotDetermined);
        assert_eq!(gate.request_access(), AccessDecision::Pending { prompt_host: true });
    }
}
