//! Toggle controller behind the popup checkbox.

use log::{debug, warn};

use crate::error::Result;
use crate::message::ContentMessage;
use crate::state::resolve_enabled;

/// Durable home of the enabled flag.
pub trait FlagStore {
    fn store(&mut self, enabled: bool) -> Result<()>;
}

/// The page context currently in front of the user.
pub trait ActivePage {
    fn notify(&mut self, message: &ContentMessage) -> Result<()>;
}

/// What happened to the notification sent on a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Delivered,
    /// No page could receive it; it picks up the stored flag on next load.
    Dropped,
}

pub struct ToggleController<S, P> {
    store: S,
    page: P,
    checked: bool,
}

impl<S: FlagStore, P: ActivePage> ToggleController<S, P> {
    /// Initialize from the stored flag (absent means checked).
    pub fn activate(stored: Option<bool>, store: S, page: P) -> Self {
        Self {
            store,
            page,
            checked: resolve_enabled(stored),
        }
    }

    pub fn checked(&self) -> bool {
        self.checked
    }

    /// Persist the new value, then tell the active page.
    pub fn change(&mut self, enabled: bool) -> ToggleOutcome {
        self.checked = enabled;
        if let Err(e) = self.store.store(enabled) {
            warn!("{e}");
        }

        match self.page.notify(&ContentMessage::toggle(enabled)) {
            Ok(()) => ToggleOutcome::Delivered,
            Err(e) => {
                debug!("Toggle notification dropped: {e}");
                ToggleOutcome::Dropped
            }
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn page(&self) -> &P {
        &self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[derive(Default)]
    struct RecordingStore {
        value: Option<bool>,
        fail: bool,
    }

    impl FlagStore for RecordingStore {
        fn store(&mut self, enabled: bool) -> Result<()> {
            if self.fail {
                return Err(Error::Store("quota exceeded".to_string()));
            }
            self.value = Some(enabled);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingPage {
        reachable: bool,
        inbox: Vec<ContentMessage>,
    }

    impl ActivePage for RecordingPage {
        fn notify(&mut self, message: &ContentMessage) -> Result<()> {
            if !self.reachable {
                return Err(Error::Delivery("no active tab".to_string()));
            }
            self.inbox.push(*message);
            Ok(())
        }
    }

    fn reachable() -> RecordingPage {
        RecordingPage {
            reachable: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_activate_defaults_checked() {
        let c = ToggleController::activate(None, RecordingStore::default(), reachable());
        assert!(c.checked());
        let c = ToggleController::activate(Some(false), RecordingStore::default(), reachable());
        assert!(!c.checked());
    }

    #[test]
    fn test_change_persists_then_notifies() {
        let mut c = ToggleController::activate(None, RecordingStore::default(), reachable());
        assert_eq!(c.change(false), ToggleOutcome::Delivered);
        assert!(!c.checked());
        assert_eq!(c.store().value, Some(false));
        assert_eq!(c.page().inbox, vec![ContentMessage::ToggleCensoring { enabled: false }]);
    }

    #[test]
    fn test_unreachable_page_drops_without_retry() {
        let mut c = ToggleController::activate(None, RecordingStore::default(), RecordingPage::default());
        assert_eq!(c.change(false), ToggleOutcome::Dropped);
        assert_eq!(c.store().value, Some(false));
        assert!(c.page().inbox.is_empty());
    }

    #[test]
    fn test_store_failure_still_notifies() {
        let store = RecordingStore {
            fail: true,
            ..Default::default()
        };
        let mut c = ToggleController::activate(None, store, reachable());
        assert_eq!(c.change(true), ToggleOutcome::Delivered);
        assert_eq!(c.page().inbox.len(), 1);
    }
}
