//! Persists canvas rules to a remote [`RuleStore`].
//!
//! The sync layer decides between create and update: a cached backend id is
//! trusted first, then the store is searched for a record whose layout already
//! contains the rule node, and only then is a new record created.

mod events;
mod store;

pub use events::*;
pub use store::*;

use crate::error::{StoreError, SyncError};
use crate::graph::{BackendId, Node, RuleGraph};
use crate::serializer::export_rule;

pub struct RuleSync<S> {
    store: S,
    observers: Vec<Box<dyn SyncObserver>>,
}

impl<S: RuleStore> RuleSync<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            observers: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registers a listener for save and delete notifications.
    pub fn subscribe(&mut self, observer: impl SyncObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn publish(&self, event: SyncEvent) {
        for observer in &self.observers {
            observer.notify(&event);
        }
    }

    /// Saves the rule `rule_id` and tags the rule node with the resulting backend id.
    ///
    /// On success the node's `backend_id` is set and `saved` becomes `true`.
    /// Create and update failures are returned untouched and leave the node as is.
    pub async fn save_rule(
        &self,
        graph: &mut RuleGraph,
        rule_id: &str,
        cached_backend_id: Option<&BackendId>,
    ) -> Result<BackendId, SyncError> {
        let spec = export_rule(&graph.nodes, &graph.edges, rule_id)?;

        let known_id = match cached_backend_id.filter(|id| id.is_valid()) {
            Some(id) => Some(id.clone()),
            None => self.find_existing(rule_id).await,
        };

        let (backend_id, created) = match known_id {
            Some(id) => {
                log::info!("Updating rule '{}' as backend record '{}'", rule_id, id);
                self.store.update(&id.as_key(), &spec).await?;
                (id, false)
            }
            None => {
                let id = self.store.create(&spec).await?;
                log::info!("Created backend record '{}' for rule '{}'", id, rule_id);
                (id, true)
            }
        };

        if let Some(rule) = graph.node_mut(rule_id).and_then(Node::as_rule_mut) {
            rule.backend_id = Some(backend_id.clone());
            rule.saved = true;
        }

        self.publish(SyncEvent::RuleSaved {
            rule_id: rule_id.to_string(),
            backend_id: backend_id.clone(),
            created,
        });
        Ok(backend_id)
    }

    /// Looks for a persisted record whose layout contains `rule_id`.
    /// A failing lookup counts as "not found".
    async fn find_existing(&self, rule_id: &str) -> Option<BackendId> {
        match self.store.list().await {
            Ok(records) => records
                .into_iter()
                .find(|r| r.spec.ui.as_ref().is_some_and(|ui| ui.contains_node(rule_id)))
                .map(|r| r.id),
            Err(e) => {
                log::warn!(
                    "Could not look up existing record for rule '{}', creating a new one: {}",
                    rule_id,
                    e
                );
                None
            }
        }
    }

    /// Deletes a persisted rule. Absent or blank ids are a no-op and return `Ok(false)`.
    pub async fn delete_rule(&self, backend_id: Option<&BackendId>) -> Result<bool, StoreError> {
        let Some(id) = backend_id.filter(|id| id.is_valid()) else {
            return Ok(false);
        };
        self.store.delete(&id.as_key()).await?;
        log::info!("Deleted backend record '{}'", id);
        self.publish(SyncEvent::RuleDeleted {
            backend_id: id.clone(),
        });
        Ok(true)
    }
}
