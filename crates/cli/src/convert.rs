//! `convert` subcommand: input file in, dual JSON plus provenance sidecar out.

use anyhow::{Context, Result};
use polydd::prelude::*;
use polydd::worker::convert_with_timeout;
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::input::read_rows;
use crate::provenance::{write_sidecar, Payload};

/// Parsed arguments of one conversion.
#[derive(Clone, Debug)]
pub struct ConvertArgs {
    pub input: PathBuf,
    pub kind: RepKind,
    pub exact: bool,
    pub config: Option<PathBuf>,
    pub out: PathBuf,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Serialize)]
struct ConvertOutput {
    kernel: &'static str,
    kind: RepKind,
    rows: Vec<Vec<f64>>,
    incidence: Vec<Vec<usize>>,
    empty: bool,
    homogeneous: bool,
    rank: usize,
    lineality: usize,
}

pub fn load_cfg(path: Option<&Path>) -> Result<DdCfg> {
    let Some(path) = path else {
        return Ok(DdCfg::default());
    };
    let bytes = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing config {}", path.display()))
}

/// Run the conversion and write `out` and its sidecar; returns the sidecar path.
pub fn run(args: &ConvertArgs) -> Result<PathBuf> {
    let cfg = load_cfg(args.config.as_deref())?;
    let rows = read_rows(&args.input)?;
    let input = RepMatrix::from_rows(args.kind, rows)
        .with_context(|| format!("building {:?}-form from {}", args.kind, args.input.display()))?;
    tracing::info!(
        input = %args.input.display(),
        kind = ?args.kind,
        rows = input.nrows(),
        cols = input.cols(),
        exact = args.exact,
        "convert"
    );

    let out = if args.exact {
        convert_with(&NumericContext::new(Exact), input, cfg, args.timeout)?
    } else {
        convert_with(&NumericContext::new(Float::default()), input, cfg, args.timeout)?
    };
    tracing::info!(out_rows = out.rows.len(), empty = out.empty, "converted");

    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    fs::write(&args.out, serde_json::to_vec_pretty(&out)?)
        .with_context(|| format!("writing {}", args.out.display()))?;

    let payload = Payload::new(json!({
        "input": args.input.to_string_lossy(),
        "kind": args.kind,
        "kernel": out.kernel,
        "cfg": cfg,
        "timeout_ms": args.timeout.map(|t| t.as_millis() as u64),
        "polydd_version": polydd::VERSION,
    }));
    write_sidecar(&args.out, payload)
}

fn convert_with<K: Kernel>(
    ctx: &NumericContext<K>,
    input: RepMatrix<f64>,
    cfg: DdCfg,
    timeout: Option<Duration>,
) -> Result<ConvertOutput> {
    let dual = match timeout {
        Some(t) => convert_with_timeout(ctx, input, cfg, t)?,
        None => ctx.acquire().convert(&input, &cfg)?,
    };
    let output = dual.output().lower(ctx.kernel());
    Ok(ConvertOutput {
        kernel: ctx.kernel().name(),
        kind: output.kind(),
        rows: output.into_rows(),
        incidence: dual.incidence().to_vec(),
        empty: dual.is_empty_polyhedron(),
        homogeneous: dual.is_homogeneous(),
        rank: dual.rank(),
        lineality: dual.lineality(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    fn args(dir: &Path, input: PathBuf, kind: RepKind, exact: bool) -> ConvertArgs {
        ConvertArgs {
            input,
            kind,
            exact,
            config: None,
            out: dir.join("out").join("dual.json"),
            timeout: None,
        }
    }

    #[test]
    fn square_vertices_from_json() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("square.json");
        fs::write(&input, r#"{"rows": [[1,1,1],[1,-1,1],[1,-1,-1],[1,1,-1]]}"#).unwrap();
        let a = args(dir.path(), input, RepKind::V, false);
        let sidecar = run(&a).unwrap();
        assert!(sidecar.ends_with("dual.provenance.json"));

        let out: Value = serde_json::from_slice(&fs::read(&a.out).unwrap()).unwrap();
        assert_eq!(out["kind"], "h");
        assert_eq!(out["rows"].as_array().unwrap().len(), 4);
        assert_eq!(out["empty"], false);
        let prov: Value = serde_json::from_slice(&fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(prov["params"]["kernel"], "float");
    }

    #[test]
    fn infeasible_csv_with_exact_kernel_reports_empty() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("h.csv");
        fs::write(&input, "0,-1\n-1,1\n").unwrap();
        let a = args(dir.path(), input, RepKind::H, true);
        run(&a).unwrap();
        let out: Value = serde_json::from_slice(&fs::read(&a.out).unwrap()).unwrap();
        assert_eq!(out["empty"], true);
        assert_eq!(out["rows"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn config_file_is_applied() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("cube.json");
        fs::write(
            &input,
            r#"{"rows": [[0,1,0,0],[1,-1,0,0],[0,0,1,0],[1,0,-1,0],[0,0,0,1],[1,0,0,-1]]}"#,
        )
        .unwrap();
        let cfg = dir.path().join("cfg.json");
        fs::write(&cfg, r#"{"max_rays": 3}"#).unwrap();
        let mut a = args(dir.path(), input, RepKind::H, false);
        a.config = Some(cfg);
        let err = run(&a).unwrap_err();
        assert!(err.to_string().contains("exceeded the configured limit 3"));
    }

    #[test]
    fn missing_config_uses_defaults() {
        assert_eq!(load_cfg(None).unwrap(), DdCfg::default());
    }
}
