//! Press-duration gesture state machine.
//!
//! Pure state transitions with no OS hooks, timers, or channels: events go
//! in, actions come out. The caller (the hotkey handler) owns the clock and
//! the timer tasks, so every path through here is testable with a fake
//! `Instant`.
//!
//! Two modes share one machine:
//!
//! * Hold mode: key down starts capture, key up ends it. Releases shorter
//!   than the threshold are treated as an ordinary tap of the key and the
//!   session is cancelled.
//! * Click mode: the first click starts capture and arms a countdown. If the
//!   key is still held when the countdown fires, the user wanted the key's
//!   normal function, so the session is cancelled and the key replayed. A
//!   second click ends the session the same way (quick click submits, long
//!   hold cancels).

use std::time::{Duration, Instant};

use tracing::debug;
use uuid::Uuid;

/// Input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// The dictation key went down.
    Pressed,
    /// The dictation key came up.
    Released,
    /// A previously armed countdown fired. Stale tokens are ignored.
    ThresholdElapsed {
        /// Token handed out by the `ArmTimer` action that started this countdown.
        token: u64,
    },
}

/// Output of the state machine, executed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    /// Begin capturing audio for a new session.
    StartSession {
        /// Session id for log correlation.
        session_id: Uuid,
    },
    /// End capture and submit the audio for recognition.
    SubmitSession {
        /// Session id for log correlation.
        session_id: Uuid,
        /// Re-tap the dictation key after submission.
        replay_key: bool,
    },
    /// End capture and throw the audio away.
    CancelSession {
        /// Session id for log correlation.
        session_id: Uuid,
        /// Re-tap the dictation key so its normal function still happens.
        replay_key: bool,
    },
    /// Start a countdown that must deliver `ThresholdElapsed { token }`
    /// after `delay`, unless a newer token has been armed since.
    ArmTimer {
        /// Token identifying this countdown.
        token: u64,
        /// How long to wait before firing.
        delay: Duration,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    /// Click mode only: first press seen, capture running, countdown armed.
    Armed { session_id: Uuid, token: u64 },
    Recording { session_id: Uuid, started_at: Instant },
    /// Click mode only: second press seen, countdown armed to decide
    /// between submit (quick release) and cancel (long hold).
    Disarming { session_id: Uuid, token: u64 },
}

/// Gesture policy knobs, a projection of the hotkey configuration.
#[derive(Debug, Clone, Copy)]
pub struct GesturePolicy {
    /// Hold-to-talk when true, click-to-toggle when false.
    pub hold_mode: bool,
    /// Short-press cutoff.
    pub threshold: Duration,
    /// Withhold the key's original function on short presses.
    pub suppress: bool,
    /// Re-tap the key after a completed hold-mode dictation.
    pub restore_key: bool,
}

/// Press-duration state machine for the dictation key.
#[derive(Debug)]
pub struct GestureMachine {
    policy: GesturePolicy,
    state: GestureState,
    next_token: u64,
}

impl GestureMachine {
    /// Create an idle machine with the given policy.
    pub fn new(policy: GesturePolicy) -> Self {
        Self {
            policy,
            state: GestureState::Idle,
            next_token: 0,
        }
    }

    /// Whether a capture session is currently running.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    /// Advance the machine by one event.
    ///
    /// `now` is passed in rather than read from the system clock so press
    /// durations are deterministic under test.
    pub fn on_event(&mut self, event: GestureEvent, now: Instant) -> Vec<GestureAction> {
        match event {
            GestureEvent::Pressed => self.on_pressed(now),
            GestureEvent::Released => self.on_released(now),
            GestureEvent::ThresholdElapsed { token } => self.on_threshold(token),
        }
    }

    fn on_pressed(&mut self, now: Instant) -> Vec<GestureAction> {
        match self.state {
            GestureState::Idle => {
                let session_id = Uuid::new_v4();

                if self.policy.hold_mode {
                    self.state = GestureState::Recording {
                        session_id,
                        started_at: now,
                    };
                    vec![GestureAction::StartSession { session_id }]
                } else {
                    let token = self.arm_token();
                    self.state = GestureState::Armed { session_id, token };
                    vec![
                        GestureAction::StartSession { session_id },
                        GestureAction::ArmTimer {
                            token,
                            delay: self.policy.threshold,
                        },
                    ]
                }
            }
            GestureState::Recording { session_id, .. } if !self.policy.hold_mode => {
                // Second click: decide submit-vs-cancel on release or countdown.
                let token = self.arm_token();
                self.state = GestureState::Disarming { session_id, token };
                vec![GestureAction::ArmTimer {
                    token,
                    delay: self.policy.threshold,
                }]
            }
            // Key repeat while held, or a press in a state that should be
            // impossible for a physical key. Ignore.
            _ => {
                debug!(state = ?self.state, "Ignoring redundant press");
                Vec::new()
            }
        }
    }

    fn on_released(&mut self, now: Instant) -> Vec<GestureAction> {
        match self.state {
            GestureState::Recording {
                session_id,
                started_at,
            } if self.policy.hold_mode => {
                self.state = GestureState::Idle;

                if now.duration_since(started_at) < self.policy.threshold {
                    // An ordinary tap of the key, not a dictation.
                    vec![GestureAction::CancelSession {
                        session_id,
                        replay_key: !self.policy.suppress,
                    }]
                } else {
                    vec![GestureAction::SubmitSession {
                        session_id,
                        replay_key: self.policy.restore_key,
                    }]
                }
            }
            GestureState::Armed { session_id, .. } => {
                // Released before the countdown: the first click is confirmed
                // as a dictation toggle, capture keeps running. Bumping the
                // token invalidates the pending countdown.
                self.next_token += 1;
                self.state = GestureState::Recording {
                    session_id,
                    started_at: now,
                };
                Vec::new()
            }
            GestureState::Disarming { session_id, .. } => {
                // Quick second click: submit.
                self.next_token += 1;
                self.state = GestureState::Idle;
                vec![GestureAction::SubmitSession {
                    session_id,
                    replay_key: false,
                }]
            }
            // Release in Idle happens after a countdown already resolved the
            // gesture while the key was still held. Ignore.
            _ => Vec::new(),
        }
    }

    fn on_threshold(&mut self, token: u64) -> Vec<GestureAction> {
        match self.state {
            GestureState::Armed {
                session_id,
                token: armed,
            } if armed == token => {
                // Countdown fired while the key was still held: the user
                // wanted the key's normal function, not a dictation.
                self.state = GestureState::Idle;
                vec![GestureAction::CancelSession {
                    session_id,
                    replay_key: true,
                }]
            }
            GestureState::Disarming {
                session_id,
                token: armed,
            } if armed == token => {
                // Long second press: cancel instead of submit.
                self.state = GestureState::Idle;
                vec![GestureAction::CancelSession {
                    session_id,
                    replay_key: true,
                }]
            }
            _ => {
                debug!(token, state = ?self.state, "Ignoring stale countdown");
                Vec::new()
            }
        }
    }

    fn arm_token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }
}
