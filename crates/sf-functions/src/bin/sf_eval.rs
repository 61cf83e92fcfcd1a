use anyhow::Context;
use sf_functions::ProblemConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SMOOTHFN_PROBLEM").ok())
        .context("usage: sf-eval <problem.json> (or set SMOOTHFN_PROBLEM)")?;

    let problem = ProblemConfig::from_path(&path)
        .with_context(|| format!("failed to load problem from {path}"))?;
    info!("Loaded problem from {}", path);

    let report = problem.run().context("evaluation failed")?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
