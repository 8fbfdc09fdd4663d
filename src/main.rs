use caresvm::config::Config;
use caresvm::model::Kernel;
use caresvm::service::DiagnosisService;
use caresvm::task::Task;
use caresvm::{logging, trainer, Error, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[clap(author, version, about)]
struct Args {
    /// Path to a TOML configuration file
    #[clap(long)]
    config: Option<PathBuf>,
    /// Tasks to train, separated by ',' (diabetes, blood_test)
    #[clap(long)]
    train: Option<String>,
    /// Dataset to train on instead of the configured one (single task only)
    #[clap(long)]
    dataset: Option<PathBuf>,
    /// Kernel to train with: linear or rbf
    #[clap(long)]
    kernel: Option<Kernel>,
    /// Directory holding the model artifacts
    #[clap(long)]
    models: Option<PathBuf>,
    /// Task to predict for, using the saved artifacts
    #[clap(long)]
    predict: Option<Task>,
    /// Raw feature values for --predict, separated by ','
    #[clap(long)]
    values: Option<String>,
    /// Log debug output
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(why) => {
            error!("{}", why);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(dir) = args.models {
        config.models_dir = dir;
    }
    if args.train.is_none() && args.predict.is_none() {
        return Err(Error::Usage(
            "Nothing to do, pass --train or --predict (see --help)".to_string(),
        ));
    }

    if let Some(tasks) = args.train {
        let tasks = tasks
            .split(',')
            .map(str::parse)
            .collect::<std::result::Result<Vec<Task>, String>>()
            .map_err(Error::Usage)?;
        if let Some(dataset) = args.dataset {
            if tasks.len() != 1 {
                return Err(Error::Usage(
                    "--dataset can only be used when training a single task".to_string(),
                ));
            }
            config.task_mut(tasks[0]).dataset = dataset;
        }
        if let Some(kernel) = args.kernel {
            for task in &tasks {
                config.task_mut(*task).classifier.kernel = kernel;
            }
        }

        let mut reports = Vec::new();
        for task in tasks {
            reports.push(trainer::run(task, &config)?);
        }
        println!("Training complete");
        for report in reports {
            println!(
                "{} model accuracy: {:.2}% ({} kernel, {} support vectors)",
                report.task,
                report.accuracy * 100.0,
                report.kernel,
                report.support_vectors
            );
        }
    }

    if let Some(task) = args.predict {
        let values = args
            .values
            .ok_or_else(|| Error::Usage("--predict requires --values".to_string()))?;
        let raw = values
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<f64>, _>>()
            .map_err(|why| Error::Usage(format!("Invalid --values: {}", why)))?;

        let service = DiagnosisService::load(&config.models_dir);
        let diagnosis = service.diagnose(task, &raw)?;
        println!("{}: {}", task, diagnosis.outcome);
        println!("{}", diagnosis.explanation);
    }
    Ok(())
}
