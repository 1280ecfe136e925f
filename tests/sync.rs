//! Backend sync tests
//!
//! Create vs update decisions, backend id handling and delete semantics.
//!
mod common;
use common::*;
use rulegraph::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

#[cfg(test)]
mod sync_tests {
    use super::*;
    use tokio_test::block_on;

    fn backend_id_of(graph: &RuleGraph, rule_id: &str) -> Option<BackendId> {
        graph.node(rule_id).and_then(Node::as_rule).and_then(|r| r.backend_id.clone())
    }

    #[test]
    fn test_cached_id_updates_without_lookup() {
        let mut graph = create_high_temp_graph();
        let sync = RuleSync::new(RecordingStore::new());

        let err = block_on(sync.save_rule(&mut graph, "rule-1", Some(&BackendId::Number(42))));
        // The memory store has no record 42, but the update was still attempted.
        assert!(matches!(err, Err(SyncError::Store(StoreError::NotFound(_)))));
        assert_eq!(sync.store().updates(), vec!["42".to_string()]);
        assert_eq!(sync.store().lists(), 0);
        assert_eq!(sync.store().creates(), 0);
    }

    #[test]
    fn test_cached_id_update_succeeds() {
        let mut graph = create_high_temp_graph();
        let existing = export_rule(&graph.nodes, &graph.edges, "rule-1").unwrap();
        let store = RecordingStore::with_records(vec![persisted(42_i64, existing)]);
        let sync = RuleSync::new(store);

        let id = block_on(sync.save_rule(&mut graph, "rule-1", Some(&BackendId::Number(42)))).unwrap();

        assert_eq!(id, BackendId::Number(42));
        assert_eq!(sync.store().updates(), vec!["42".to_string()]);
        assert_eq!(sync.store().lists(), 0);
        assert_eq!(sync.store().creates(), 0);
        assert_eq!(backend_id_of(&graph, "rule-1"), Some(BackendId::Number(42)));
        assert!(graph.node("rule-1").and_then(Node::as_rule).unwrap().saved);
    }

    #[test]
    fn test_lookup_then_create() {
        let mut graph = create_high_temp_graph();
        // A record for some other canvas rule, so the lookup has to scan and miss.
        let mut other = export_rule(&graph.nodes, &graph.edges, "rule-1").unwrap();
        other.name = "Other Rule".to_string();
        if let Some(ui) = other.ui.as_mut() {
            let node = ui.nodes.remove("rule-1").unwrap();
            ui.nodes.insert("rule-99".to_string(), node);
        }
        let sync = RuleSync::new(RecordingStore::with_records(vec![persisted(5_i64, other)]));

        let id = block_on(sync.save_rule(&mut graph, "rule-1", None)).unwrap();

        assert_eq!(id, BackendId::Number(6));
        assert_eq!(sync.store().lists(), 1);
        assert_eq!(sync.store().creates(), 1);
        assert!(sync.store().updates().is_empty());
        assert_eq!(backend_id_of(&graph, "rule-1"), Some(BackendId::Number(6)));

        let records = sync.store().inner.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Other Rule");
        assert_eq!(records[1].name, "High Temp Alert");
    }

    #[test]
    fn test_lookup_finds_existing_record_by_layout() {
        let mut graph = create_high_temp_graph();
        let existing = export_rule(&graph.nodes, &graph.edges, "rule-1").unwrap();
        let store = RecordingStore::with_records(vec![persisted("rule-abc", existing)]);
        let sync = RuleSync::new(store);

        let id = block_on(sync.save_rule(&mut graph, "rule-1", None)).unwrap();

        assert_eq!(id, BackendId::from("rule-abc"));
        assert_eq!(sync.store().lists(), 1);
        assert_eq!(sync.store().updates(), vec!["rule-abc".to_string()]);
        assert_eq!(sync.store().creates(), 0);
    }

    #[test]
    fn test_blank_cached_id_falls_back_to_lookup() {
        let mut graph = create_high_temp_graph();
        let sync = RuleSync::new(RecordingStore::new());

        block_on(sync.save_rule(&mut graph, "rule-1", Some(&BackendId::from("   ")))).unwrap();

        assert_eq!(sync.store().lists(), 1);
        assert_eq!(sync.store().creates(), 1);
    }

    #[test]
    fn test_failed_lookup_creates() {
        let mut graph = create_high_temp_graph();
        let store = RecordingStore {
            fail_list: true,
            ..RecordingStore::new()
        };
        let sync = RuleSync::new(store);

        let id = block_on(sync.save_rule(&mut graph, "rule-1", None)).unwrap();

        assert_eq!(id, BackendId::Number(1));
        assert_eq!(sync.store().lists(), 1);
        assert_eq!(sync.store().creates(), 1);
    }

    #[test]
    fn test_write_failure_leaves_node_untouched() {
        let mut graph = create_high_temp_graph();
        let sync = RuleSync::new(FailingStore);

        let err = block_on(sync.save_rule(&mut graph, "rule-1", None)).unwrap_err();

        assert!(matches!(err, SyncError::Store(StoreError::Backend(_))));
        assert_eq!(backend_id_of(&graph, "rule-1"), None);
        assert!(!graph.node("rule-1").and_then(Node::as_rule).unwrap().saved);
    }

    #[test]
    fn test_save_unknown_rule_makes_no_call() {
        let mut graph = create_high_temp_graph();
        let sync = RuleSync::new(RecordingStore::new());

        let err = block_on(sync.save_rule(&mut graph, "ghost", None)).unwrap_err();
        assert!(matches!(err, SyncError::Graph(GraphError::RuleNotFound(_))));
        assert_eq!(sync.store().total_calls(), 0);
    }

    #[test]
    fn test_delete_zero_is_a_real_id() {
        let sync = RuleSync::new(RecordingStore::with_records(vec![persisted(0_i64, RuleSpec::default())]));

        let deleted = block_on(sync.delete_rule(Some(&BackendId::Number(0)))).unwrap();

        assert!(deleted);
        assert_eq!(sync.store().deletes(), vec!["0".to_string()]);
        assert!(sync.store().inner.records().unwrap().is_empty());
    }

    #[test]
    fn test_delete_without_id_makes_no_call() {
        let sync = RuleSync::new(RecordingStore::new());

        for id in [None, Some(BackendId::from("")), Some(BackendId::from("   "))] {
            let deleted = block_on(sync.delete_rule(id.as_ref())).unwrap();
            assert!(!deleted);
        }
        assert_eq!(sync.store().total_calls(), 0);
    }

    #[test]
    fn test_delete_failure_is_returned() {
        let sync = RuleSync::new(FailingStore);
        let err = block_on(sync.delete_rule(Some(&BackendId::Number(5)))).unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn test_observers_receive_events() {
        let events: Rc<RefCell<Vec<SyncEvent>>> = Rc::default();
        let mut graph = create_high_temp_graph();
        let mut sync = RuleSync::new(MemoryRuleStore::new());
        let sink = Rc::clone(&events);
        sync.subscribe(move |event: &SyncEvent| sink.borrow_mut().push(event.clone()));

        let id = block_on(sync.save_rule(&mut graph, "rule-1", None)).unwrap();
        block_on(sync.save_rule(&mut graph, "rule-1", Some(&id))).unwrap();
        block_on(sync.delete_rule(Some(&id))).unwrap();

        let events = events.borrow();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], SyncEvent::RuleSaved { created: true, .. }));
        assert!(matches!(events[1], SyncEvent::RuleSaved { created: false, .. }));
        assert_eq!(events[2], SyncEvent::RuleDeleted { backend_id: id.clone() });
    }

    #[test]
    fn test_memory_store_continues_numbering() {
        let store = MemoryRuleStore::with_records(vec![
            persisted(4_i64, RuleSpec::default()),
            persisted("9", RuleSpec::default()),
            persisted("named", RuleSpec::default()),
        ]);
        let id = block_on(store.create(&RuleSpec::default())).unwrap();
        assert_eq!(id, BackendId::Number(10));

        let err = block_on(store.update("404", &RuleSpec::default())).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(ref id) if id == "404"));
    }
}
