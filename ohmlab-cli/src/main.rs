//! OhmLab CLI - series/parallel resistor circuits from the command line.

use clap::{Args, Parser, Subcommand, ValueEnum};
use ohmlab::prelude::*;
use ohmlab::TipRouter;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "ohmlab")]
#[command(about = "Series/parallel resistor circuit study lab", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a circuit and print totals, branch currents, and study notes
    Compute {
        #[command(flatten)]
        circuit: CircuitArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Render the circuit as an animated SVG schematic
    Svg {
        #[command(flatten)]
        circuit: CircuitArgs,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Fetch a one-sentence study tip for the circuit
    Tip {
        #[command(flatten)]
        circuit: CircuitArgs,

        /// Skip all providers and print the deterministic fallback tip
        #[arg(long)]
        offline: bool,

        /// Preferred provider
        #[arg(long, value_enum, default_value = "gemini")]
        provider: ProviderChoice,

        /// Ollama base URL (default http://localhost:11434)
        #[arg(long, value_name = "URL")]
        ollama_url: Option<String>,

        /// Ollama model name
        #[arg(long, value_name = "MODEL")]
        ollama_model: Option<String>,
    },

    /// Print the formula reference sheet
    Formulas {
        /// Show the worked reference examples as well
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args)]
struct CircuitArgs {
    /// Supply voltage in volts
    #[arg(short, long, default_value_t = ohmlab::DEFAULT_SUPPLY_VOLTS)]
    voltage: f64,

    /// Circuit topology
    #[arg(short, long, value_enum, default_value = "series")]
    topology: TopologyChoice,

    /// Resistor value in ohms; repeat for more elements (max 6).
    /// Defaults to 10 and 20.
    #[arg(short, long = "resistor", value_name = "OHMS")]
    resistor: Vec<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum TopologyChoice {
    Series,
    Parallel,
}

impl From<TopologyChoice> for Topology {
    fn from(choice: TopologyChoice) -> Self {
        match choice {
            TopologyChoice::Series => Topology::Series,
            TopologyChoice::Parallel => Topology::Parallel,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripting
    Json,
}

#[derive(Clone, ValueEnum)]
enum ProviderChoice {
    Gemini,
    Ollama,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout is reserved for command output (JSON, SVG).
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Compute { circuit, format } => handle_compute(&circuit, format),
        Commands::Svg { circuit, output } => handle_svg(&circuit, output.as_deref()),
        Commands::Tip {
            circuit,
            offline,
            provider,
            ollama_url,
            ollama_model,
        } => handle_tip(&circuit, offline, provider, ollama_url, ollama_model).await,
        Commands::Formulas { verbose } => {
            handle_formulas(verbose);
            0
        }
    };

    process::exit(exit_code);
}

/// Build a circuit from the shared flags. Resistors default to 10 and 20 ohms.
fn build_circuit(args: &CircuitArgs) -> Result<Circuit, CircuitError> {
    let ohms: &[f64] = if args.resistor.is_empty() {
        &[10.0, 20.0]
    } else {
        &args.resistor
    };

    let mut circuit = Circuit::new(args.voltage, args.topology.into());
    for &r in ohms {
        let (next, id) = circuit.add_element()?;
        circuit = next.set_resistance(id, r);
    }
    Ok(circuit)
}

fn handle_compute(args: &CircuitArgs, format: OutputFormat) -> i32 {
    let circuit = match build_circuit(args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let result = compute(&circuit);
    let notes = ohmlab::study_notes(&circuit);

    match format {
        OutputFormat::Human => output_human(&circuit, &result, &notes),
        OutputFormat::Json => output_json(&circuit, &result, &notes),
    }
    0
}

fn output_human(circuit: &Circuit, result: &CalculationResult, notes: &[Note]) {
    println!(
        "\nCircuit: {} topology, {} V supply, {} element(s)",
        circuit.topology(),
        circuit.supply_voltage(),
        circuit.len()
    );
    println!("{}", "─".repeat(60));
    println!("  Total resistance: {:>10.2} ohms", result.total_resistance);
    println!("  Total current:    {:>10.2} A", result.total_current);

    if !circuit.is_empty() {
        println!("\n  {:<6} {:>12} {:>12} {:>12}", "", "ohms", "amps", "volts");
        for (i, element) in circuit.elements().iter().enumerate() {
            println!(
                "  {:<6} {:>12.2} {:>12.2} {:>12.2}",
                format!("R{}", i + 1),
                element.resistance,
                result.branch_currents[i],
                result.voltage_drops[i],
            );
        }
    }

    let warnings: Vec<_> = notes
        .iter()
        .filter(|n| matches!(n.severity, NoteSeverity::Warning))
        .collect();
    let infos: Vec<_> = notes
        .iter()
        .filter(|n| matches!(n.severity, NoteSeverity::Info))
        .collect();

    if !warnings.is_empty() {
        println!("\n  WARNINGS:");
        for note in warnings {
            println!("    - {}", note.message);
        }
    }
    if !infos.is_empty() {
        println!("\n  Study notes:");
        for note in infos {
            println!("    - {}", note.message);
        }
    }
}

fn output_json(circuit: &Circuit, result: &CalculationResult, notes: &[Note]) {
    let output = serde_json::json!({
        "circuit": circuit,
        "result": result,
        "notes": notes,
    });
    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

fn handle_svg(args: &CircuitArgs, output: Option<&std::path::Path>) -> i32 {
    let circuit = match build_circuit(args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let svg = ohmlab::schematic_svg(&circuit);
    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &svg) {
                eprintln!("Error: failed to write {}: {}", path.display(), e);
                return 1;
            }
            println!("Wrote schematic to {}", path.display());
        }
        None => print!("{}", svg),
    }
    0
}

async fn handle_tip(
    args: &CircuitArgs,
    offline: bool,
    provider: ProviderChoice,
    ollama_url: Option<String>,
    ollama_model: Option<String>,
) -> i32 {
    let circuit = match build_circuit(args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut bench = Workbench::with_circuit(circuit);
    let request = bench.begin_tip_request();

    let reply = if offline {
        // Route through an empty router so the fallback path is identical
        // to a total provider failure.
        TipRouter::new().resolve_tip(&request.context).await
    } else {
        let mut router = TipRouter::from_env();
        if ollama_url.is_some() || ollama_model.is_some() {
            router.set_ollama_config(ollama_url, ollama_model);
        }
        match provider {
            ProviderChoice::Gemini => router.set_preferred_provider("gemini").await,
            ProviderChoice::Ollama => router.set_preferred_provider("ollama").await,
        }
        router.resolve_tip(&request.context).await
    };

    bench.apply_tip(ohmlab::workbench::TipUpdate {
        request_id: request.id,
        text: reply.text,
        source: reply.source,
    });

    println!("{}", bench.tip().text);
    0
}

fn handle_formulas(verbose: bool) {
    println!("Equivalent resistance reference:\n");

    let entries = [
        (
            "series",
            "R_t = R1 + R2 + ... + Rn",
            "Two resistors of 10 and 20 ohms at 12 V: R_t = 30, I_t = 0.4 A, drops 4 V and 8 V.",
        ),
        (
            "parallel",
            "1/R_t = 1/R1 + 1/R2 + ... + 1/Rn",
            "Two resistors of 10 and 20 ohms at 12 V: R_t = 6.67, I_t = 1.8 A, branches 1.2 A and 0.6 A.",
        ),
        (
            "division",
            "Series divides voltage by resistance; parallel divides current inversely.",
            "The uniform quantity is current in series and voltage in parallel.",
        ),
        (
            "square_law",
            "n equal resistors: series total n*R, parallel total R/n, ratio n^2.",
            "Four equal 15-ohm resistors: 60 ohms in series, 3.75 in parallel, ratio 16.",
        ),
    ];

    for (name, formula, example) in &entries {
        println!("  {}", name);
        println!("    {}", formula);
        if verbose {
            println!("    {}", example);
        }
        println!();
    }
}
