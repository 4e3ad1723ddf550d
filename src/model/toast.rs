//! Toast notifications
//!
//! At most one toast is on screen. Showing a new one drops the current one
//! on the spot; timers still queued for the old toast find a different token
//! and do nothing.

use crate::model::timer::TimerEvent;
use crate::services::scheduler::Scheduler;
use std::time::Duration;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);
const FADE_IN_DELAY: Duration = Duration::from_millis(10);
const FADE_OUT: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Inserted, not yet shown
    Entering,
    Visible,
    /// Fading out, removed shortly
    Leaving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    #[default]
    Bottom,
    TopRight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub duration: Duration,
    pub placement: Placement,
    pub phase: ToastPhase,
    token: u64,
}

#[derive(Debug, Default)]
pub struct Toaster {
    current: Option<Toast>,
    next_token: u64,
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    pub fn show(
        &mut self,
        scheduler: &mut Scheduler<TimerEvent>,
        message: &str,
        duration: Duration,
        placement: Placement,
    ) {
        self.next_token += 1;
        let token = self.next_token;
        self.current = Some(Toast {
            message: message.to_string(),
            duration,
            placement,
            phase: ToastPhase::Entering,
            token,
        });
        scheduler.schedule(FADE_IN_DELAY, TimerEvent::ToastShow(token));
        scheduler.schedule(duration, TimerEvent::ToastFade(token));
        tracing::debug!(message, "toast");
    }

    /// Apply a toast timer; returns false for events that are not toast events
    pub fn handle(&mut self, scheduler: &mut Scheduler<TimerEvent>, event: &TimerEvent) -> bool {
        let (token, next) = match event {
            TimerEvent::ToastShow(t) => (*t, Some(ToastPhase::Visible)),
            TimerEvent::ToastFade(t) => (*t, Some(ToastPhase::Leaving)),
            TimerEvent::ToastRemove(t) => (*t, None),
            _ => return false,
        };

        let Some(toast) = self.current.as_mut().filter(|toast| toast.token == token) else {
            return true;
        };
        match next {
            Some(ToastPhase::Leaving) => {
                toast.phase = ToastPhase::Leaving;
                scheduler.schedule(FADE_OUT, TimerEvent::ToastRemove(token));
            }
            Some(phase) => {
                // A fade that already started is not undone
                if toast.phase == ToastPhase::Entering {
                    toast.phase = phase;
                }
            }
            None => self.current = None,
        }
        true
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
