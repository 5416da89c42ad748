use clap::Parser;
use mindflow::document::SaveData;
use mindflow::model::{Connection, CoreState, InputLogic, Node, Point, Port, PortRef};
use rand::Rng;
use rand::rngs::ThreadRng;
use std::fs;

/// Generates random layered project documents for exercising the engine
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated project JSON to
    #[arg(short, long, default_value = "generated_project.json")]
    output: String,

    /// Number of layers in the graph
    #[arg(long, default_value_t = 6)]
    layers: usize,

    /// Nodes per layer
    #[arg(long, default_value_t = 8)]
    width: usize,

    /// Maximum number of input ports per node
    #[arg(long, default_value_t = 3)]
    max_inputs: usize,

    /// Fraction of nodes marked complete
    #[arg(long, default_value_t = 0.3)]
    complete_ratio: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.layers == 0 || cli.width == 0 || cli.max_inputs == 0 {
        eprintln!("Error: --layers, --width and --max-inputs must all be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating a {}x{} layered graph (up to {} inputs per node)...",
        cli.layers, cli.width, cli.max_inputs
    );

    let state = generate(&mut rng, &cli);
    println!(
        "-> {} nodes, {} connections",
        state.nodes.len(),
        state.connections.len()
    );

    let json_output = SaveData::new(state).to_json()?;
    fs::write(&cli.output, json_output)?;

    println!("Successfully generated and saved project to '{}'", cli.output);
    Ok(())
}

/// Builds the layered graph. Edges only run from one layer to the next, so the
/// result is always acyclic.
fn generate(rng: &mut ThreadRng, cli: &Cli) -> CoreState {
    let mut state = CoreState::default();
    state.settings.canvas_title = "Generated".to_string();

    let mut next_id = 1;
    let mut previous: Vec<u32> = Vec::new();
    for layer in 0..cli.layers {
        let mut current = Vec::with_capacity(cli.width);
        for column in 0..cli.width {
            let mut node = Node::new(next_id, format!("L{} N{}", layer + 1, column + 1));
            node.pos = Point::new(column as f64 * 220.0, layer as f64 * 160.0);
            node.is_complete = rng.random_bool(cli.complete_ratio.clamp(0.0, 1.0));
            node.input_logic = if rng.random_bool(0.5) {
                InputLogic::And
            } else {
                InputLogic::Or
            };
            node.difficulty = rng.random_range(1..=5);
            node.time = rng.random_range(5..=120);

            if layer == 0 {
                node.inputs.clear();
            } else {
                let inputs = rng.random_range(1..=cli.max_inputs);
                node.inputs = (1..=inputs)
                    .map(|i| Port::new(format!("in_{}", i), format!("Input {}", i)))
                    .collect();
                for port in &node.inputs {
                    let source = previous[rng.random_range(0..previous.len())];
                    state.connections.push(Connection::new(
                        PortRef::new(source, "out_1"),
                        PortRef::new(next_id, port.id.clone()),
                    ));
                }
            }

            current.push(next_id);
            state.nodes.push(node);
            next_id += 1;
        }
        previous = current;
    }
    state
}
