//! Notification channel: a single replaceable listener slot.

use std::fmt;

use crate::outputs::ScrollEvent;

/// Observer receiving scroll notifications synchronously.
pub trait Listener {
    fn on_event(&mut self, event: &ScrollEvent);
}

impl<F> Listener for F
where
    F: FnMut(&ScrollEvent),
{
    fn on_event(&mut self, event: &ScrollEvent) {
        self(event)
    }
}

/// Holds at most one listener. Delivery is a direct call; nothing is queued.
#[derive(Default)]
pub struct NotificationChannel {
    slot: Option<Box<dyn Listener>>,
}

impl NotificationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the listener. `None` leaves the current slot untouched.
    pub fn set_listener(&mut self, listener: Option<Box<dyn Listener>>) {
        if let Some(listener) = listener {
            self.slot = Some(listener);
        }
    }

    /// Detach the current listener, if any.
    pub fn clear(&mut self) {
        self.slot = None;
    }

    #[inline]
    pub fn has_listener(&self) -> bool {
        self.slot.is_some()
    }

    /// Deliver `event`; returns whether a listener was present.
    pub fn notify(&mut self, event: &ScrollEvent) -> bool {
        match self.slot.as_mut() {
            Some(listener) => {
                listener.on_event(event);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationChannel")
            .field("has_listener", &self.has_listener())
            .finish()
    }
}
