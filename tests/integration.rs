//! Integration tests for RuleGraph
//!
//! End-to-end tests that verify the complete functionality works together.
//!
mod common;
use common::*;
use rulegraph::prelude::*;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use tokio_test::block_on;

    #[test]
    fn test_author_save_reload_cycle() {
        let metadata = create_metadata();
        let mut graph = RuleGraph::new();

        // Drop palette items and wire the star.
        let rule = graph.add_node(NodeKind::Rule, Position::new(0.0, 0.0));
        let trigger = graph.add_node(NodeKind::Trigger, Position::new(-250.0, 0.0));
        let conditions = graph.add_node(NodeKind::Conditions, Position::new(250.0, -80.0));
        let actions = graph.add_node(NodeKind::Actions, Position::new(250.0, 80.0));
        assert_eq!(rule, "rule-1");
        assert_eq!(trigger, "trigger-1");

        graph.connect(&trigger, &rule).unwrap();
        graph.connect(&rule, &conditions).unwrap();
        graph.connect(&actions, &rule).unwrap();

        // Fill in every editor.
        RuleEditor::new(rule.as_str(), &metadata)
            .rename(&mut graph, "High Temp Alert")
            .unwrap();
        let trigger_editor = TriggerEditor::new(trigger.as_str(), &metadata);
        trigger_editor.set_trigger_type(&mut graph, "deviceData").unwrap();
        trigger_editor.set_parameter(&mut graph, "deviceId", "sensor-7").unwrap();

        let conditions_editor = ConditionsEditor::new(conditions.as_str(), &metadata);
        conditions_editor.add_condition(&mut graph).unwrap();
        conditions_editor.set_fact(&mut graph, 0, "temperature").unwrap();
        conditions_editor.set_operator(&mut graph, 0, "greaterThan").unwrap();
        conditions_editor.set_value(&mut graph, 0, "30").unwrap();

        let actions_editor = ActionsEditor::new(actions.as_str(), &metadata);
        actions_editor.add_action(&mut graph).unwrap();
        actions_editor.set_action_type(&mut graph, 0, "sendEmail").unwrap();
        actions_editor.set_parameter(&mut graph, 0, "to", "ops@example.com").unwrap();

        // Save through the gate.
        let sync = RuleSync::new(MemoryRuleStore::new());
        let rule_editor = RuleEditor::new(rule.as_str(), &metadata);
        let backend_id = block_on(rule_editor.save(&mut graph, &sync)).unwrap();
        assert_eq!(rule_editor.state(&graph).unwrap(), SaveState::Saved);

        // Reload into a fresh canvas.
        let reloaded = block_on(materialize_from_store(sync.store())).unwrap();
        assert_eq!(reloaded.nodes.len(), 4);
        assert_eq!(reloaded.edges.len(), 3);

        let reloaded_rule = reloaded.node("rule-1").and_then(Node::as_rule).unwrap();
        assert_eq!(reloaded_rule.backend_id.as_ref(), Some(&backend_id));
        assert!(reloaded_rule.saved);

        let before = export_rule(&graph.nodes, &graph.edges, &rule).unwrap();
        let after = export_rule(&reloaded.nodes, &reloaded.edges, &rule).unwrap();
        assert_eq!(before, after);
        assert_eq!(after.trigger.parameters.get("deviceId").map(String::as_str), Some("sensor-7"));
        assert_eq!(after.actions[0].parameters.get("subject").map(String::as_str), Some(""));
    }

    #[test]
    fn test_canvas_json_round_trip() {
        let graph = create_high_temp_graph();
        let json = graph.to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["nodes"][0]["type"], "rule");
        assert_eq!(value["nodes"][0]["data"]["name"], "High Temp Alert");
        assert_eq!(value["nodes"][3]["data"]["actions"][0]["type"], "sendEmail");

        let parsed = RuleGraph::from_json(&json).unwrap();
        assert_eq!(parsed, graph);
    }

    #[test]
    fn test_spec_json_round_trip() {
        let graph = create_high_temp_graph();
        let spec = export_rule(&graph.nodes, &graph.edges, "rule-1").unwrap();

        let parsed = RuleSpec::from_json(&spec.to_json().unwrap()).unwrap();
        assert_eq!(parsed, spec);
    }

    #[test]
    fn test_two_rules_share_one_store() {
        let metadata = create_metadata();
        let mut graph = create_high_temp_graph();
        graph.insert_node(rule_node("rule-2", "Night Shift"));
        graph.insert_node(trigger_node("trigger-2", "deviceData", &[("deviceId", "sensor-2")]));
        graph.insert_node(conditions_node("cond-2", Vec::new()));
        // Actions are shared between both rules.
        graph.connect("trigger-2", "rule-2").unwrap();
        graph.connect("rule-2", "cond-2").unwrap();
        graph.connect("rule-2", "act-1").unwrap();

        let sync = RuleSync::new(MemoryRuleStore::new());
        for rule_id in ["rule-1", "rule-2"] {
            block_on(RuleEditor::new(rule_id, &metadata).save(&mut graph, &sync)).unwrap();
        }

        // An action edit invalidates both rules.
        ActionsEditor::new("act-1", &metadata)
            .set_parameter(&mut graph, 0, "subject", "Heads up")
            .unwrap();
        for rule_id in ["rule-1", "rule-2"] {
            assert_eq!(
                RuleEditor::new(rule_id, &metadata).state(&graph).unwrap(),
                SaveState::Unsaved
            );
        }

        let reloaded = materialize(&sync.store().records().unwrap());
        assert_eq!(reloaded.rules().count(), 2);
        // act-1 appears in both layouts but is materialized once.
        assert_eq!(reloaded.nodes.iter().filter(|n| n.id == "act-1").count(), 1);
        assert_eq!(reloaded.edges.len(), 6);
    }

    #[test]
    fn test_remove_node_drops_incident_edges() {
        let mut graph = create_high_temp_graph();
        let removed = graph.remove_node("cond-1").unwrap();

        assert_eq!(removed.kind(), NodeKind::Conditions);
        assert_eq!(graph.edges.len(), 2);
        assert!(graph.edges.iter().all(|e| !e.touches("cond-1")));
        assert!(graph.remove_node("cond-1").is_none());

        assert!(graph.remove_edge("edge-rule-1-act-1").is_some());
        assert_eq!(graph.edges.len(), 1);
    }

    #[test]
    fn test_metadata_from_file() {
        let path = std::env::temp_dir().join("rulegraph_metadata_fixture.json");
        std::fs::write(&path, METADATA_JSON).unwrap();

        let metadata = RuleMetadata::from_file(path.to_str().unwrap()).unwrap();
        assert!(metadata.trigger_parameters("scheduled_time").is_some());
        assert_eq!(metadata.operators().len(), 6);

        let missing = RuleMetadata::from_file("/definitely/not/here.json");
        assert!(missing.is_err());
        std::fs::remove_file(&path).ok();
    }
}
