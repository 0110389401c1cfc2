use anyhow::{bail, Context};
use siglab::config::AppConfig;
use siglab::data::synthetic::{random_walk, RandomWalkConfig};
use siglab::data::CsvConnector;
use siglab::labeling::{self, LabelStrategy};
use siglab::metrics::PerformanceReport;
use siglab::simulation::PositionSimulator;

/// Label a price history, replay the labels as a predicted signal, and print
/// the performance report.
///
/// Usage: siglab [DATA.csv] [--config CONFIG.toml] [--json REPORT.json]
///
/// Without a CSV a seeded synthetic random walk is used, so the pipeline can
/// be exercised with no external data.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut csv_path: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut json_path: Option<String> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config_path = Some(args.next().context("--config needs a path")?);
            }
            "--json" => {
                json_path = Some(args.next().context("--json needs a path")?);
            }
            "--help" | "-h" => {
                eprintln!("Usage: siglab [DATA.csv] [--config CONFIG.toml] [--json REPORT.json]");
                return Ok(());
            }
            other if other.starts_with("--") => bail!("Unknown flag: {}", other),
            other => csv_path = Some(other.to_string()),
        }
    }

    let config = match &config_path {
        Some(path) => {
            AppConfig::load_from_file(path).with_context(|| format!("loading {}", path))?
        }
        None => AppConfig::default(),
    };

    let series = match &csv_path {
        Some(path) => {
            CsvConnector::load_series(path, Some(100)).with_context(|| format!("loading {}", path))?
        }
        None => {
            log::info!("No CSV given; generating a synthetic random walk");
            random_walk(&RandomWalkConfig::default())?
        }
    };
    log::info!(
        "Loaded {} bars from {} to {}",
        series.len(),
        series.dates()[0],
        series.dates()[series.len() - 1]
    );

    let strategy = LabelStrategy::from_settings(&config.labeling);
    let labels = labeling::generate_labels(&series, &strategy)?;

    // Replay the labels as a perfect-foresight prediction. A real pipeline
    // trains a model on (features, labels) and feeds its out-of-sample
    // predictions in here instead.
    let prediction = labeling::labels_to_signal(&labels);

    let result = PositionSimulator::run(&series, &prediction, &config.simulation)?;
    let report = PerformanceReport::compute(&series, &result, &config.report)?;

    print!("{}", report);

    if let Some(path) = json_path {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json).with_context(|| format!("writing {}", path))?;
        log::info!("Report written to {}", path);
    }

    Ok(())
}
