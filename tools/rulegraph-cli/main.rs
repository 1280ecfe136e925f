use clap::{Parser, Subcommand};
use rulegraph::prelude::*;
use std::fs;
use std::time::Instant;

/// Export, reload and check rule canvases from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serialize a single rule of a canvas into its RuleSpec
    Export {
        /// Path to the canvas JSON file (`{ "nodes": [...], "edges": [...] }`)
        canvas_path: String,
        /// Id of the rule node to export
        #[arg(short, long)]
        rule: String,
    },
    /// Serialize every rule of a canvas, with export timestamps
    ExportAll {
        /// Path to the canvas JSON file
        canvas_path: String,
    },
    /// Rebuild a canvas from a list of persisted rule records
    Materialize {
        /// Path to a JSON array of `{ "id", "name", "spec" }` records
        records_path: String,
    },
    /// Run the save gate for every rule (or one rule) of a canvas
    Check {
        /// Path to the canvas JSON file
        canvas_path: String,
        /// Path to the metadata catalogue JSON file
        metadata_path: String,
        /// Only check this rule node
        #[arg(short, long)]
        rule: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Export { canvas_path, rule } => run_export(&canvas_path, &rule),
        Command::ExportAll { canvas_path } => run_export_all(&canvas_path),
        Command::Materialize { records_path } => run_materialize(&records_path),
        Command::Check {
            canvas_path,
            metadata_path,
            rule,
        } => run_check(&canvas_path, &metadata_path, rule.as_deref()),
    }
}

fn load_canvas(path: &str) -> RuleGraph {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read canvas file '{}': {}", path, e))
    });
    RuleGraph::from_json(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse canvas JSON: {}", e)))
}

fn print_json<T: serde::Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize output: {}", e)));
    println!("{}", json);
}

fn run_export(canvas_path: &str, rule_id: &str) {
    let graph = load_canvas(canvas_path);
    let spec = export_rule(&graph.nodes, &graph.edges, rule_id)
        .unwrap_or_else(|e| exit_with_error(&format!("Export failed: {}", e)));
    print_json(&spec);
}

fn run_export_all(canvas_path: &str) {
    let graph = load_canvas(canvas_path);
    let rules = export_all_rules(&graph.nodes, &graph.edges)
        .unwrap_or_else(|e| exit_with_error(&format!("Export failed: {}", e)));
    eprintln!("Exported {} rules", rules.len());
    print_json(&rules);
}

fn run_materialize(records_path: &str) {
    let json = fs::read_to_string(records_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read records file '{}': {}",
            records_path, e
        ))
    });
    let records: Vec<PersistedRuleRecord> = serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse records JSON: {}", e)));

    let start = Instant::now();
    let graph = materialize(&records);
    eprintln!(
        "Materialized {} nodes and {} edges from {} records in {:?}",
        graph.nodes.len(),
        graph.edges.len(),
        records.len(),
        start.elapsed()
    );
    print_json(&graph);
}

fn run_check(canvas_path: &str, metadata_path: &str, only_rule: Option<&str>) {
    let graph = load_canvas(canvas_path);
    let metadata = RuleMetadata::from_file(metadata_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load metadata: {}", e)));

    let rule_ids: Vec<String> = match only_rule {
        Some(id) => vec![id.to_string()],
        None => graph.rules().map(|n| n.id.clone()).collect(),
    };
    if rule_ids.is_empty() {
        println!("No rules found in '{}'.", canvas_path);
        return;
    }

    println!("\n--- Save Gate Results ---");
    let mut blocked = 0;
    for rule_id in &rule_ids {
        let editor = RuleEditor::new(rule_id.as_str(), &metadata);
        if let Err(e) = editor.data(&graph) {
            exit_with_error(&e.to_string());
        }
        match editor.check(&graph) {
            Ok(()) => println!("  [ok]      {}", rule_id),
            Err(reason) => {
                blocked += 1;
                println!("  [blocked] {}: {}", rule_id, reason);
            }
        }
    }
    println!("-------------------------\n");

    if blocked > 0 {
        exit_with_error(&format!(
            "{} of {} rules cannot be saved",
            blocked,
            rule_ids.len()
        ));
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
