use clap::{Parser, Subcommand};
use mindflow::document::load_file;
use mindflow::linearize::end_nodes;
use mindflow::prelude::*;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Inspect, reorder and export mindflow project documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the project JSON file
    project: String,

    /// Optional editor config JSON file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Print the activation status of every node
    Status,
    /// Print the ordered export sequence
    Order {
        /// Restrict the order to the flow ending at this node
        #[arg(short, long)]
        terminal: Option<NodeId>,
    },
    /// Render the ordered export as HTML
    Export {
        #[arg(short, long)]
        terminal: Option<NodeId>,
        /// Output path for the HTML file
        #[arg(short, long, default_value = "export.html")]
        output: String,
    },
    /// Reassign order indices by topology and save the project
    Reorganize {
        /// Write to this path instead of overwriting the input
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Load (migrating if needed) and re-save at the current schema version
    Migrate {
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EditorConfig::from_file(path)?,
        None => EditorConfig::default(),
    };

    let start = Instant::now();
    let doc = load_file(&cli.project)?;
    if doc.migrated {
        println!("-> Document migrated to the current schema.");
    }
    if doc.pruned > 0 {
        println!("-> Removed {} duplicate or dangling record(s).", doc.pruned);
    }
    let mut editor = Editor::from_document(doc, config);
    println!(
        "Loaded '{}' ({} nodes, {} connections) in {:?}",
        editor.state().settings.canvas_title,
        editor.state().nodes.len(),
        editor.state().connections.len(),
        start.elapsed()
    );

    match cli.command {
        Action::Status => print_status(&editor),
        Action::Order { terminal } => {
            let export = editor.export(terminal)?;
            print_order(&export);
        }
        Action::Export { terminal, output } => {
            let export = editor.export(terminal)?;
            fs::write(&output, export.to_html())?;
            println!("Exported {} node(s) to '{}'", export.entries.len(), output);
        }
        Action::Reorganize { output } => {
            editor.execute(Command::ReorganizeOrder)?;
            let path = output.unwrap_or_else(|| cli.project.clone());
            fs::write(&path, editor.export_json()?)?;
            println!("Order indices reassigned and saved to '{}'", path);
        }
        Action::Migrate { output } => {
            let path = output.unwrap_or_else(|| cli.project.clone());
            fs::write(&path, editor.export_json()?)?;
            println!("Saved schema version {} to '{}'", mindflow::document::SCHEMA_VERSION, path);
        }
    }

    Ok(())
}

fn print_status(editor: &Editor) {
    let state = editor.state();
    println!("\n{:<6} {:<30} {:<5} {:<9} {:<8} ACTIVE INPUTS", "ID", "TITLE", "LOGIC", "COMPLETE", "UNLOCKED");
    for node in &state.nodes {
        let (unlocked, active) = match editor.status(node.id) {
            Some(status) => (
                status.is_condition_met,
                status.active_inputs.iter().cloned().collect::<Vec<_>>().join(", "),
            ),
            None => (false, String::new()),
        };
        let logic = match node.input_logic {
            InputLogic::And => "AND",
            InputLogic::Or => "OR",
        };
        println!(
            "{:<6} {:<30} {:<5} {:<9} {:<8} {}",
            node.id, node.title, logic, node.is_complete, unlocked, active
        );
    }
    let ends = end_nodes(&state.nodes, &state.connections);
    println!("\nEnd nodes: {:?}", ends);
}

fn print_order(export: &Export) {
    println!("\n{}", export.title);
    if let Some(cycle) = &export.degraded {
        println!("!! {} (falling back to order index)", cycle);
    }
    for entry in &export.entries {
        println!("{:>4}. [{}] {}", entry.sequence, entry.node.id, entry.node.title);
    }
}
