//! PackViz CLI
//!
//! Command-line host for the PackViz core: validates packing payloads,
//! reports containment/collision flags and utilization, runs the drop
//! simulation, and encodes/decodes shareable-link parameters.

use clap::{Parser, Subcommand};
use packviz_core::{
    decode_payload_param, encode_payload_param, sample_payload, Efficiency, Session,
    SAMPLE_CONFIGS,
};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "packviz")]
#[command(about = "Packing-plan validation and layout analysis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a payload and report flags and utilization
    Report {
        /// Path to the JSON payload ('-' reads stdin)
        file: PathBuf,

        /// Emit machine-readable JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// Run the drop simulation to rest and print final item heights
    Settle {
        /// Path to the JSON payload ('-' reads stdin)
        file: PathBuf,

        /// Fixed integration step in seconds
        #[arg(long, default_value = "0.0166")]
        dt: f64,

        /// Simulated-time budget in seconds
        #[arg(long, default_value = "30.0")]
        max_time: f64,

        /// Emit machine-readable JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// Print a generated sample payload
    Sample {
        /// Carton number (1-12)
        #[arg(short, long, default_value = "1")]
        index: u32,

        /// List available cartons instead of printing a payload
        #[arg(long)]
        list: bool,
    },

    /// Encode a payload file into a shareable 'payload' query parameter
    Encode {
        /// Path to the JSON payload ('-' reads stdin)
        file: PathBuf,
    },

    /// Decode a 'payload' query parameter back into JSON text
    Decode {
        /// The query-parameter value
        param: String,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Report { file, json } => report(&file, json),
        Commands::Settle {
            file,
            dt,
            max_time,
            json,
        } => settle(&file, dt, max_time, json),
        Commands::Sample { index, list } => sample(index, list),
        Commands::Encode { file } => encode(&file),
        Commands::Decode { param } => {
            println!("{}", decode_payload_param(&param));
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn read_input(file: &PathBuf) -> Result<String, String> {
    if file.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .map_err(|err| format!("failed to read stdin: {err}"))?;
        Ok(raw)
    } else {
        std::fs::read_to_string(file)
            .map_err(|err| format!("failed to read {}: {err}", file.display()))
    }
}

fn load_session(file: &PathBuf) -> Result<Session, String> {
    let raw = read_input(file)?;
    let mut session = Session::new();
    session.load(&raw).map_err(|err| err.to_string())?;
    Ok(session)
}

fn report(file: &PathBuf, json: bool) -> Result<(), String> {
    let session = load_session(file)?;
    let container = session.container().expect("scene loaded");
    let stats = session.utilization().expect("scene loaded");
    let load = session.weight_load().expect("scene loaded");

    if json {
        let doc = serde_json::json!({
            "box": container,
            "items": session.items(),
            "utilization": stats,
            "weight": load,
        });
        println!("{}", serde_json::to_string_pretty(&doc).expect("serializable report"));
        return Ok(());
    }

    match &container.name {
        Some(name) => println!(
            "Box \"{name}\": {}×{}×{} cm, capacity {} kg",
            container.width, container.height, container.depth, container.max_weight
        ),
        None => println!(
            "Box: {}×{}×{} cm, capacity {} kg",
            container.width, container.height, container.depth, container.max_weight
        ),
    }
    println!();

    for decorated in session.items() {
        let item = &decorated.item;
        let mut flags = Vec::new();
        if decorated.outside {
            flags.push("OUTSIDE".to_string());
        }
        if decorated.has_collision {
            flags.push(format!("collides with {}", decorated.collisions.join(", ")));
        }
        let flags = if flags.is_empty() {
            "ok".to_string()
        } else {
            flags.join("; ")
        };
        println!(
            "  {:<12} {}×{}×{} cm, {} kg at ({}, {}, {}) — {}",
            item.id,
            item.width,
            item.height,
            item.depth,
            item.weight,
            item.position.x,
            item.position.y,
            item.position.z,
            flags
        );
    }

    println!();
    let tier = match stats.efficiency {
        Efficiency::High => "high",
        Efficiency::Medium => "medium",
        Efficiency::Low => "low",
    };
    println!(
        "Volume: {:.1}% of {} cm³ used ({} efficiency), {} cm³ free",
        stats.utilization_percent, stats.box_volume, tier, stats.unused_volume
    );
    print!(
        "Weight: {:.1} / {:.1} kg ({:.1}%)",
        load.total, load.capacity, load.percent_of_capacity
    );
    if load.overweight {
        println!(" — OVERWEIGHT");
    } else {
        println!();
    }
    Ok(())
}

fn settle(file: &PathBuf, dt: f64, max_time: f64, json: bool) -> Result<(), String> {
    let mut session = load_session(file)?;
    let report = session.settle(dt, max_time).map_err(|err| err.to_string())?;

    if json {
        let doc = serde_json::json!({
            "report": report,
            "items": session.items(),
        });
        println!("{}", serde_json::to_string_pretty(&doc).expect("serializable report"));
        return Ok(());
    }

    println!(
        "Settled {}/{} item(s) in {} step(s) ({:.2}s simulated){}",
        report.grounded,
        session.items().len(),
        report.steps,
        report.simulated_time,
        if report.settled { "" } else { " — time budget exhausted" }
    );
    for decorated in session.items() {
        println!(
            "  {:<12} rests at y = {:.2}",
            decorated.item.id, decorated.item.position.y
        );
    }
    Ok(())
}

fn sample(index: u32, list: bool) -> Result<(), String> {
    if list {
        for config in &SAMPLE_CONFIGS {
            println!("{:>2}  {}", config.id, config.label());
        }
        return Ok(());
    }

    let config = SAMPLE_CONFIGS
        .iter()
        .find(|config| config.id == index)
        .ok_or_else(|| format!("no sample carton {index}; use --list to see the lineup"))?;
    let payload = sample_payload(config);
    println!("{}", serde_json::to_string_pretty(&payload).expect("serializable payload"));
    Ok(())
}

fn encode(file: &PathBuf) -> Result<(), String> {
    let raw = read_input(file)?;
    // Reject invalid JSON before sharing it.
    serde_json::from_str::<serde_json::Value>(&raw)
        .map_err(|err| format!("refusing to encode malformed JSON: {err}"))?;
    println!("payload={}", encode_payload_param(&raw));
    Ok(())
}
