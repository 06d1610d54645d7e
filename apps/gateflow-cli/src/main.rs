use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use gateflow_kernel::{Phase, Seed, SimConfig, World};
use gateflow_tools::WorldInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gateflow-cli", about = "Host loop for the gateflow token simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct WorldArgs {
    /// Seed for world generation; omit for a random world
    #[arg(short, long)]
    seed: Option<String>,
    /// Treat the seed as an integer instead of folding it as text
    #[arg(long)]
    numeric: bool,
    /// YAML or JSON configuration file (missing fields use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the default configuration
    Info,
    /// Generate a world and print it without stepping
    Generate {
        #[command(flatten)]
        world: WorldArgs,
        /// Print the full world as JSON
        #[arg(long)]
        json: bool,
    },
    /// Step a world until it finishes or the step budget runs out
    Run {
        #[command(flatten)]
        world: WorldArgs,
        /// Maximum number of steps
        #[arg(short, long, default_value = "100000")]
        max_steps: u64,
        /// Print one JSON frame per step
        #[arg(long)]
        frames: bool,
        /// Palette size used for token colour slots in frames
        #[arg(long, default_value = "6")]
        palette: usize,
    },
    /// Run the same seed twice and compare state hashes step by step
    Verify {
        /// Seed text for both runs
        #[arg(short, long, default_value = "42")]
        seed: String,
        /// Treat the seed as an integer
        #[arg(long)]
        numeric: bool,
        /// YAML or JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of steps to compare
        #[arg(long, default_value = "500")]
        steps: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            println!("gateflow-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("tools: {}", gateflow_tools::crate_info());
            println!("default configuration:");
            print!("{}", serde_yaml::to_string(&SimConfig::default())?);
        }
        Commands::Generate { world, json } => {
            let world = build_world(&world)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&world)?);
            } else {
                println!("seed: {}", describe_seed(&world));
                println!("{}", WorldInspector::summary(&world));
            }
        }
        Commands::Run {
            world,
            max_steps,
            frames,
            palette,
        } => {
            let mut world = build_world(&world)?;
            tracing::info!(seed = %describe_seed(&world), max_steps, "running");

            let mut steps = 0;
            while steps < max_steps && !world.is_finished() {
                let phase = world.step();
                steps += 1;
                if frames {
                    let frame = WorldInspector::frame(&world, palette);
                    println!("{}", serde_json::to_string(&frame)?);
                }
                if phase == Phase::Finished {
                    tracing::debug!(steps, "finished");
                }
            }

            if !world.is_finished() {
                tracing::warn!(steps, phase = ?world.phase(), "step budget exhausted");
            }
            if !frames {
                println!("steps: {steps}");
                println!("{}", WorldInspector::summary(&world));
            }
        }
        Commands::Verify {
            seed,
            numeric,
            config,
            steps,
        } => {
            let config = load_config(config.as_deref())?;
            let seed = parse_seed(&seed, numeric)?;
            println!("Deterministic replay: seed={seed}, steps={steps}");

            let mut w1 = World::generate(config.clone(), seed.clone())?;
            let mut w2 = World::generate(config, seed)?;
            let mut diverged = None;
            for step in 0..steps {
                w1.step();
                w2.step();
                if w1.state_hash() != w2.state_hash() {
                    diverged = Some(step);
                    break;
                }
            }

            println!("Run 1: {}", WorldInspector::summary(&w1));
            println!("Run 2: {}", WorldInspector::summary(&w2));
            match diverged {
                None => println!("Match: OK (hash {:#x})", w1.state_hash()),
                Some(step) => anyhow::bail!("runs diverged at step {step}"),
            }
        }
    }

    Ok(())
}

fn build_world(args: &WorldArgs) -> anyhow::Result<World> {
    let config = load_config(args.config.as_deref())?;
    let world = match &args.seed {
        Some(seed) => World::generate(config, parse_seed(seed, args.numeric)?)?,
        None => World::generate_unseeded(config)?,
    };
    Ok(world)
}

fn parse_seed(raw: &str, numeric: bool) -> anyhow::Result<Seed> {
    if numeric {
        let value: i64 = raw
            .parse()
            .with_context(|| format!("seed {raw:?} is not an integer"))?;
        Ok(Seed::Int(value))
    } else {
        Ok(Seed::from(raw))
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&text)
            .with_context(|| format!("parsing JSON config {}", path.display()))?,
        _ => serde_yaml::from_str(&text)
            .with_context(|| format!("parsing YAML config {}", path.display()))?,
    };
    Ok(config)
}

fn describe_seed(world: &World) -> String {
    world
        .seed()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "<entropy>".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_seed_is_default() {
        assert_eq!(parse_seed("42", false).unwrap(), Seed::Text("42".into()));
        assert_eq!(parse_seed("42", true).unwrap(), Seed::Int(42));
        assert!(parse_seed("abc", true).is_err());
    }

    #[test]
    fn missing_config_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), SimConfig::default());
    }

    #[test]
    fn cli_parses_run() {
        let cli = Cli::try_parse_from(["gateflow-cli", "run", "--seed", "x", "--frames"]).unwrap();
        match cli.command {
            Commands::Run { world, frames, max_steps, .. } => {
                assert_eq!(world.seed.as_deref(), Some("x"));
                assert!(frames);
                assert_eq!(max_steps, 100_000);
            }
            _ => panic!("expected run"),
        }
    }
}
