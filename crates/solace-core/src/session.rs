//! # Authentication Session State Machine
//!
//! The pure state machine governing which unlock surface is shown and how
//! biometric gating composes with PIN entry. It performs no I/O: the
//! orchestration layer (solace-sync) feeds it events and reads states.
//!
//! ## States and Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  NoLocalAuth ──remote sign-in ok──► PinSetup ──vault configured──┐     │
//! │       ▲                                                          │     │
//! │       │ vault cleared (from ANY state)                           ▼     │
//! │       │                                                   Authenticated│
//! │       │                                                          │     │
//! │  QuickUnlock ◄──────────────────── signed out ───────────────────┘     │
//! │       │                                                                 │
//! │       ├─ unlock requested, biometric gate ──► BiometricPrompt          │
//! │       │                                            │                    │
//! │       │                     passed OR failed/cancelled (fallback)      │
//! │       │                                            ▼                    │
//! │       └─ unlock requested, no gate ─────────► PinEntry                 │
//! │                                                    │                    │
//! │                        unlock failed (stays) ──────┤                    │
//! │                        unlock succeeded ───────────► Authenticated     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two deliberate asymmetries:
//!
//! - Biometric success routes to `PinEntry`, never to `Authenticated`.
//!   A fingerprint proves device possession, not knowledge of the PIN that
//!   guards the encrypted secret; it is an additional gate, not a
//!   credential substitute.
//! - A remote sign-in rejection after a correct PIN is an `UnlockFailed`
//!   event: the machine stays in `PinEntry` and the vault is left intact.
//!   Clearing local auth is only ever an explicit user action.

use serde::{Deserialize, Serialize};

// =============================================================================
// States
// =============================================================================

/// Which authentication surface is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    /// No vault on this device; remote sign-in is the only way forward.
    NoLocalAuth,

    /// A vault exists but no session is active.
    QuickUnlock,

    /// Waiting on the platform biometric prompt.
    BiometricPrompt,

    /// Waiting for the user to enter their PIN.
    PinEntry,

    /// Remote sign-in succeeded on a fresh device; waiting for the user to
    /// choose a PIN.
    PinSetup,

    /// A session is active.
    Authenticated,
}

// =============================================================================
// Events
// =============================================================================

/// Facts reported to the machine by the orchestration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// First-run remote sign-in succeeded while no vault exists.
    RemoteSignInSucceeded,

    /// `CredentialVault::setup` completed.
    VaultConfigured,

    /// The user asked to unlock. `biometric_gate` is true when biometric
    /// gating is enabled on the vault AND the capability is available.
    UnlockRequested { biometric_gate: bool },

    /// The biometric prompt succeeded.
    BiometricPassed,

    /// The biometric prompt failed, was cancelled, or became unavailable.
    /// Falls back to PIN entry.
    BiometricFailed,

    /// PIN unlock plus remote sign-in both succeeded.
    UnlockSucceeded,

    /// The attempt failed: wrong PIN, corrupt vault, or the remote
    /// rejected the decrypted secret. The machine stays on PIN entry.
    UnlockFailed,

    /// The user signed out. The vault stays intact.
    SignedOut,

    /// `CredentialVault::clear` ran. Valid from any state.
    VaultCleared,
}

// =============================================================================
// Transitions
// =============================================================================

/// Outcome of applying an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The machine moved (possibly back onto the same state, as with a
    /// failed PIN attempt).
    Moved { from: AuthState, to: AuthState },

    /// The event is not meaningful in the current state; nothing changed.
    Rejected { state: AuthState },
}

impl Transition {
    /// True when the event was accepted.
    pub fn accepted(&self) -> bool {
        matches!(self, Transition::Moved { .. })
    }
}

// =============================================================================
// Machine
// =============================================================================

/// The session state machine. Owns nothing but the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSessionMachine {
    state: AuthState,
}

impl AuthSessionMachine {
    /// Creates a machine in the given initial state. At startup the
    /// orchestration layer chooses `QuickUnlock` (vault present) or
    /// `NoLocalAuth` (no vault, or unreadable vault - fail closed).
    pub fn new(initial: AuthState) -> Self {
        AuthSessionMachine { state: initial }
    }

    /// Current state.
    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Applies an event, returning what happened. Rejected events leave
    /// the state untouched; the caller decides whether that is a bug or
    /// merely a stale UI signal.
    pub fn apply(&mut self, event: AuthEvent) -> Transition {
        use AuthEvent::*;
        use AuthState::*;

        // Clearing local auth is legal from every state.
        if event == VaultCleared {
            return self.move_to(NoLocalAuth);
        }

        match (self.state, event) {
            (NoLocalAuth, RemoteSignInSucceeded) => self.move_to(PinSetup),
            (PinSetup, VaultConfigured) => self.move_to(Authenticated),

            (QuickUnlock, UnlockRequested { biometric_gate: true }) => {
                self.move_to(BiometricPrompt)
            }
            (QuickUnlock, UnlockRequested { biometric_gate: false }) => self.move_to(PinEntry),

            // Biometric success is a gate, not a credential: route to PIN.
            (BiometricPrompt, BiometricPassed) => self.move_to(PinEntry),
            (BiometricPrompt, BiometricFailed) => self.move_to(PinEntry),

            (PinEntry, UnlockSucceeded) => self.move_to(Authenticated),
            (PinEntry, UnlockFailed) => self.move_to(PinEntry),

            (Authenticated, SignedOut) => self.move_to(QuickUnlock),

            _ => Transition::Rejected { state: self.state },
        }
    }

    fn move_to(&mut self, to: AuthState) -> Transition {
        let from = self.state;
        self.state = to;
        Transition::Moved { from, to }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::AuthEvent::*;
    use super::AuthState::*;
    use super::*;

    fn machine(state: AuthState) -> AuthSessionMachine {
        AuthSessionMachine::new(state)
    }

    #[test]
    fn test_first_run_setup_path() {
        let mut m = machine(NoLocalAuth);
        assert!(m.apply(RemoteSignInSucceeded).accepted());
        assert_eq!(m.state(), PinSetup);
        assert!(m.apply(VaultConfigured).accepted());
        assert_eq!(m.state(), Authenticated);
    }

    #[test]
    fn test_unlock_without_biometric_gate() {
        let mut m = machine(QuickUnlock);
        m.apply(UnlockRequested {
            biometric_gate: false,
        });
        assert_eq!(m.state(), PinEntry);
        m.apply(UnlockSucceeded);
        assert_eq!(m.state(), Authenticated);
    }

    #[test]
    fn test_biometric_success_routes_to_pin_entry_not_authenticated() {
        let mut m = machine(QuickUnlock);
        m.apply(UnlockRequested {
            biometric_gate: true,
        });
        assert_eq!(m.state(), BiometricPrompt);
        m.apply(BiometricPassed);
        // Possession of the device is not knowledge of the PIN.
        assert_eq!(m.state(), PinEntry);
    }

    #[test]
    fn test_biometric_failure_falls_back_to_pin_entry() {
        let mut m = machine(BiometricPrompt);
        m.apply(BiometricFailed);
        assert_eq!(m.state(), PinEntry);
    }

    #[test]
    fn test_failed_unlock_stays_on_pin_entry() {
        let mut m = machine(PinEntry);
        let t = m.apply(UnlockFailed);
        assert!(t.accepted());
        assert_eq!(m.state(), PinEntry);
    }

    #[test]
    fn test_sign_out_returns_to_quick_unlock_not_no_local_auth() {
        let mut m = machine(Authenticated);
        m.apply(SignedOut);
        assert_eq!(m.state(), QuickUnlock);
    }

    #[test]
    fn test_vault_cleared_from_any_state() {
        for state in [
            NoLocalAuth,
            QuickUnlock,
            BiometricPrompt,
            PinEntry,
            PinSetup,
            Authenticated,
        ] {
            let mut m = machine(state);
            assert!(m.apply(VaultCleared).accepted());
            assert_eq!(m.state(), NoLocalAuth);
        }
    }

    #[test]
    fn test_illegal_events_are_rejected_without_moving() {
        let mut m = machine(NoLocalAuth);
        let t = m.apply(UnlockSucceeded);
        assert!(!t.accepted());
        assert_eq!(m.state(), NoLocalAuth);

        let mut m = machine(Authenticated);
        assert!(!m.apply(RemoteSignInSucceeded).accepted());
        assert_eq!(m.state(), Authenticated);

        // A biometric event arriving while on PIN entry is stale, not fatal.
        let mut m = machine(PinEntry);
        assert!(!m.apply(BiometricPassed).accepted());
        assert_eq!(m.state(), PinEntry);
    }
}
