use anyhow::Context;
use clap::Parser;
use scenario::ScenarioConfig;
use server::FeedServer;
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use traffic::TrafficModel;

mod scenario;
mod server;
mod traffic;

#[derive(Parser)]
#[command(author, version, about = "Synthetic tar1090-compatible feed server")]
struct Args {
    /// Load a traffic scenario from YAML
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Port to serve /data/aircraft.json on
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, default_value_t = 24)]
    aircraft: usize,
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Print one generated document to stdout and exit
    #[arg(long, default_value_t = false)]
    once: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scenario = if let Some(path) = args.scenario {
        ScenarioConfig::load(path)?
    } else {
        ScenarioConfig::from_args(args.aircraft, args.seed)
    };

    if args.once {
        let mut model = TrafficModel::new(&scenario);
        model.advance(Duration::from_secs(scenario.update_interval_secs.max(1)));
        let document = model.document();
        println!(
            "{}",
            serde_json::to_string_pretty(&document).context("encoding feed document")?
        );
        return Ok(());
    }

    let server = FeedServer::start(args.port, scenario);
    println!(
        "Feed simulator running on http://127.0.0.1:{}/data/aircraft.json (Ctrl+C to stop)...",
        args.port
    );

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for signal handling")?;
    runtime.block_on(async {
        signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
        Ok::<(), anyhow::Error>(())
    })?;

    println!(
        "Stopping with {} aircraft in the last document",
        server.snapshot().aircraft.len()
    );
    Ok(())
}
