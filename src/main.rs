//! Template selector CLI.
//!
//! `selector [FILE...]` reads JSON selection requests, one per file (or one from
//! stdin when no files are given), and prints one JSON line per outcome:
//! `{"source": ..., "result": ..., "trace": ...}`. Logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use mimalloc::MiMalloc;
use serde::Serialize;
use tokio::task::JoinSet;

use selector::config::SelectorConfig;
use selector::request::{SelectionRequest, load_request, read_request};
use selector::selector::{SelectionResult, TemplateSelector};
use selector::trace::canonicalize;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutputLine<'a> {
    source: &'a str,
    result: &'a SelectionResult,
    trace: serde_json::Value,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = SelectorConfig::from_env()?;
    config.validate()?;

    tracing::info!(config = %config.summary(), "Template selector starting");

    let selector = Arc::new(TemplateSelector::new(config));
    let files: Vec<PathBuf> = args
        .iter()
        .filter(|arg| !arg.starts_with("--"))
        .map(PathBuf::from)
        .collect();

    if files.is_empty() {
        let request = tokio::task::spawn_blocking(|| read_request(std::io::stdin().lock()))
            .await
            .context("stdin reader panicked")??;
        println!("{}", run_request(&selector, "-", &request)?);
        return Ok(());
    }

    let mut tasks = JoinSet::new();
    for (index, path) in files.into_iter().enumerate() {
        let selector = Arc::clone(&selector);
        tasks.spawn_blocking(move || {
            let source = path.display().to_string();
            let line = load_request(&path)
                .map_err(anyhow::Error::from)
                .and_then(|request| run_request(&selector, &source, &request));
            (index, source, line)
        });
    }

    let mut lines = Vec::new();
    let mut failures = 0usize;
    while let Some(joined) = tasks.join_next().await {
        let (index, source, line) = joined.context("selection task panicked")?;
        match line {
            Ok(line) => lines.push((index, line)),
            Err(e) => {
                failures += 1;
                tracing::error!(source = %source, error = %e, "Selection request failed");
            }
        }
    }

    // Input order, regardless of completion order.
    lines.sort_by_key(|(index, _)| *index);
    for (_, line) in lines {
        println!("{line}");
    }

    if failures > 0 {
        anyhow::bail!("{failures} request(s) failed");
    }
    Ok(())
}

fn run_request(
    selector: &TemplateSelector,
    source: &str,
    request: &SelectionRequest,
) -> anyhow::Result<String> {
    let registry = request.registry();
    let outcome = selector.select(&request.document, &registry);

    let line = OutputLine {
        source,
        result: &outcome.result,
        trace: canonicalize(serde_json::to_value(&outcome.trace)?),
    };
    Ok(serde_json::to_string(&line)?)
}

/// Exit code 0 when the environment yields a valid configuration.
fn run_health_check() -> i32 {
    match SelectorConfig::from_env().and_then(|config| config.validate().map(|()| config)) {
        Ok(config) => {
            println!("ok {}", config.summary());
            0
        }
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            1
        }
    }
}
