use clap::Parser;
use std::process::ExitCode;
use yield_listings::dom::SnapshotDom;
use yield_listings::sink::{CsvSink, RecordSink};
use yield_listings::{HarvestError, HarvestReport, Harvester};

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("Harvest failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<(), HarvestError> {
    let config = args.to_config()?;
    let output_path = config.output_path.clone();
    let harvester = Harvester::new(&config.start_url).with_config(config);

    let start_time = std::time::Instant::now();
    let report = match &args.html_file {
        Some(path) => {
            ::log::info!("Harvesting saved page {}", path.display());
            let dom = SnapshotDom::from_file(path)?;
            harvester.run_with(&dom).await
        }
        None => {
            println!("Note: harvesting requires a WebDriver server (e.g., ChromeDriver).");
            println!(
                "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
            );
            harvester.run().await?
        }
    };

    log_report(&report, start_time.elapsed().as_secs_f64());

    let mut sink = CsvSink::create(&output_path)?;
    sink.write_records(&report.records)?;

    println!("Saved {} jobs to {}", report.records.len(), output_path);
    Ok(())
}

fn log_report(report: &HarvestReport, seconds: f64) {
    if report.settle.converged {
        ::log::info!("Page settled in {} scroll cycles", report.settle.cycles_used);
    } else {
        ::log::warn!(
            "Page did not settle within {} scroll cycles",
            report.settle.cycles_used
        );
    }
    ::log::info!(
        "Harvest complete - {} listings from {} candidates in {:.2} seconds",
        report.records.len(),
        report.candidates,
        seconds
    );
}
