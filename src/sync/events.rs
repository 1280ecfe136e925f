use crate::graph::BackendId;

/// Notifications emitted by [`super::RuleSync`] after a successful backend write.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    RuleSaved {
        rule_id: String,
        backend_id: BackendId,
        /// `true` when a new record was created, `false` for an update.
        created: bool,
    },
    RuleDeleted {
        backend_id: BackendId,
    },
}

/// Listener for sync notifications, e.g. a rule library view that refreshes
/// itself when a rule is saved or deleted.
pub trait SyncObserver {
    fn notify(&self, event: &SyncEvent);
}

impl<F> SyncObserver for F
where
    F: Fn(&SyncEvent),
{
    fn notify(&self, event: &SyncEvent) {
        self(event)
    }
}
