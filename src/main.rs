//! Callform CLI - build contract calls from a JSON ABI
//!
//! Commands:
//!   callform functions <abi.json>           - List callable functions
//!   callform build <abi.json> <function>    - Fill in arguments and encode

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use callform::{selector, AlloyEncoder, CallBuilder, ContractAbi, NodePath, Raw, Snapshot};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "callform")]
#[command(about = "Build and encode contract calls from a JSON ABI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the functions of an ABI
    Functions {
        /// Path to the ABI JSON (bare array or build artifact)
        abi: PathBuf,

        /// Include view and pure functions
        #[arg(long)]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build a call, apply edits and print the encoded calldata
    Build {
        /// Path to the ABI JSON (bare array or build artifact)
        abi: PathBuf,

        /// Function name or signature
        function: String,

        /// JSON file with initial arguments, keyed by input name or positional
        #[arg(long)]
        args: Option<PathBuf>,

        /// Set a leaf, e.g. `--set order.items[0].amount=5`
        #[arg(long = "set", value_name = "PATH=VALUE")]
        sets: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Functions { abi, all, json } => functions_command(&abi, all, json),
        Commands::Build {
            abi,
            function,
            args,
            sets,
            json,
        } => build_command(&abi, &function, args.as_deref(), &sets, json),
    }
}

fn load_abi(path: &Path) -> anyhow::Result<ContractAbi> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    ContractAbi::from_json(&src).with_context(|| format!("Failed to load ABI {}", path.display()))
}

fn functions_command(path: &Path, all: bool, json: bool) -> anyhow::Result<()> {
    let abi = load_abi(path)?;
    let functions: Vec<_> = abi
        .functions()
        .iter()
        .filter(|f| all || f.is_write())
        .collect();

    if json {
        let output: Vec<_> = functions
            .iter()
            .map(|f| {
                serde_json::json!({
                    "name": f.name,
                    "signature": f.display_signature(),
                    "canonical": f.canonical_signature(),
                    "selector": format!("0x{}", hex::encode(selector(f))),
                    "stateMutability": f.state_mutability,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for f in functions {
        println!("0x{}  {}", hex::encode(selector(f)), f.display_signature());
    }
    Ok(())
}

fn build_command(
    path: &Path,
    function: &str,
    args: Option<&Path>,
    sets: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let mut builder = CallBuilder::new(load_abi(path)?);

    match args {
        Some(args) => {
            let src = std::fs::read_to_string(args)
                .with_context(|| format!("Failed to read {}", args.display()))?;
            let seed: serde_json::Value = serde_json::from_str(&src)
                .with_context(|| format!("Invalid JSON in {}", args.display()))?;
            builder.select_with_seed(function, &seed)?;
        }
        None => {
            builder.select(function)?;
        }
    }

    for set in sets {
        apply_set(&mut builder, set)?;
    }

    let snapshot = builder.snapshot(&AlloyEncoder);
    let signature = builder
        .function()
        .map(|f| f.display_signature())
        .unwrap_or_default();

    if json {
        print_json(&signature, &snapshot)?;
    } else {
        print_snapshot(&signature, &snapshot);
    }

    match &snapshot.calldata {
        Some(Ok(_)) => Ok(()),
        Some(Err(err)) => bail!("Encoding failed: {err}"),
        None => bail!("Arguments not ready: {}", snapshot.pending.join(", ")),
    }
}

/// Apply one `path=value` edit. Boolean leaves take `true` or `false`.
fn apply_set(builder: &mut CallBuilder, set: &str) -> anyhow::Result<()> {
    let (path, value) = set
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected PATH=VALUE, got `{set}`"))?;
    let path: NodePath = path.parse()?;

    let is_bool = builder
        .get(&path)
        .and_then(|node| node.as_scalar())
        .is_some_and(|leaf| leaf.kind.is_bool());
    let raw = if is_bool {
        match value.trim() {
            "true" => Raw::Bool(true),
            "false" => Raw::Bool(false),
            other => bail!("Expected true or false for {path}, got `{other}`"),
        }
    } else {
        Raw::from(value)
    };

    builder.set_leaf(&path, raw)?;
    Ok(())
}

fn print_snapshot(signature: &str, snapshot: &Snapshot) {
    println!("{signature}");
    for issue in &snapshot.issues {
        println!("  ! {issue}");
    }
    println!("{}", snapshot.json);
    if let Some(Ok(calldata)) = &snapshot.calldata {
        println!("{calldata}");
    }
}

fn print_json(signature: &str, snapshot: &Snapshot) -> anyhow::Result<()> {
    let args: serde_json::Value = serde_json::from_str(&snapshot.json)?;
    let (calldata, error) = match &snapshot.calldata {
        Some(Ok(calldata)) => (Some(calldata.as_str()), None),
        Some(Err(err)) => (None, Some(err.as_str())),
        None => (None, None),
    };
    let output = serde_json::json!({
        "function": signature,
        "ready": snapshot.ready,
        "pending": snapshot.pending,
        "issues": snapshot.issues.iter().map(|issue| serde_json::json!({
            "path": issue.path.to_string(),
            "message": issue.message,
        })).collect::<Vec<_>>(),
        "args": args,
        "calldata": calldata,
        "error": error,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
