use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use polydd::prelude::RepKind;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::fmt::SubscriberBuilder;

mod convert;
mod input;
mod provenance;

#[derive(Parser)]
#[command(name = "polydd-cli")]
#[command(about = "Convert convex polyhedra between H- and V-representation")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    /// Inequalities, rows `[b | -A]`
    H,
    /// Generators, rows `[t | V]`
    V,
}

impl From<KindArg> for RepKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::H => RepKind::H,
            KindArg::V => RepKind::V,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Convert a combined-form matrix and write the dual as JSON
    Convert {
        /// `.json` (`{"rows": [[...]]}`) or headerless `.csv`
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum)]
        kind: KindArg,
        /// Exact rational arithmetic instead of tolerant floats
        #[arg(long)]
        exact: bool,
        /// JSON conversion config (row order, redundancy, verify, max_rays)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
        /// Give up after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Convert {
            input,
            kind,
            exact,
            config,
            out,
            timeout_ms,
        } => {
            let args = convert::ConvertArgs {
                input,
                kind: kind.into(),
                exact,
                config,
                out,
                timeout: timeout_ms.map(Duration::from_millis),
            };
            let sidecar = convert::run(&args)?;
            tracing::info!(out = %args.out.display(), sidecar = %sidecar.display(), "wrote");
            Ok(())
        }
        Action::Report => report(),
    }
}

fn report() -> Result<()> {
    let mut obj = provenance::header("report");
    obj["polydd_version"] = serde_json::json!(polydd::VERSION);
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
