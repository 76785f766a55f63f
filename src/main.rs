use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use case_import::app::{CommitStatus, ImportRun, ImportUseCase};
use case_import::config::Config;
use case_import::constants::{PACKAGE_FILE_NAME, PACKAGE_STATS_FILE_NAME, REPORT_FILE_NAME};
use case_import::error::ImportError;
use case_import::infra::{
    template_file_name, write_template, JsonReportOutputAdapter, NdjsonCasePackageAdapter, SpreadsheetSource,
};
use case_import::observability::{self, init_logging};
use case_import::pipeline::processing::normalize::AliasRegistry;
use case_import::pipeline::ImportPipeline;

#[derive(Parser)]
#[command(name = "case_import")]
#[command(about = "Validate debt-record spreadsheets and build case packages")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to case_import.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import one spreadsheet (CSV, XLSX, XLS, ODS)
    Import {
        file: PathBuf,
        /// Where the report and case package are written
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Print Prometheus metrics after the run
        #[arg(long)]
        print_metrics: bool,
    },
    /// Write the header template
    Template {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.logging);

    let result = match cli.command {
        Commands::Import {
            file,
            output_dir,
            print_metrics,
        } => run_import(&config, &file, output_dir, print_metrics).await,
        Commands::Template { out } => run_template(&config, out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_import(config: &Config, file: &Path, output_dir: Option<PathBuf>, print_metrics: bool) -> Result<()> {
    if print_metrics {
        observability::init()?;
    }

    let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.output.directory));
    let source = SpreadsheetSource::new(file)
        .with_sheet_index(config.import.sheet_index)
        .with_csv_delimiter(config.import.csv_delimiter as u8);
    let report = JsonReportOutputAdapter::new(output_dir.join(REPORT_FILE_NAME));
    let package = NdjsonCasePackageAdapter::new(
        output_dir.join(PACKAGE_FILE_NAME),
        output_dir.join(PACKAGE_STATS_FILE_NAME),
    );

    let use_case = ImportUseCase::new(
        Box::new(source),
        ImportPipeline::with_config(config.validation.clone()),
        Box::new(report),
        Box::new(package),
    )
    .reject_empty_batch(config.import.reject_empty_batch);

    let run = match use_case.execute().await {
        Ok(run) => run,
        Err(e) => {
            if let Some(import_err) = e.downcast_ref::<ImportError>() {
                if import_err.is_ingestion_failure() {
                    info!(kind = import_err.kind(), "Ingestion failed; no records produced");
                }
            }
            return Err(e);
        }
    };

    print_summary(&run, &output_dir);

    if print_metrics {
        if let Some(rendered) = observability::render() {
            println!("\n{}", rendered);
        }
    }
    Ok(())
}

fn print_summary(run: &ImportRun, output_dir: &Path) {
    let stats = &run.outcome.statistics;
    let short_id = run.outcome.batch_id.get(..12).unwrap_or(&run.outcome.batch_id);
    println!("\n📊 Import results (batch {}):", short_id);
    println!("   Total rows: {}", stats.total_rows);
    println!("   Valid: {}", stats.valid_rows);
    println!("   Invalid: {}", stats.invalid_rows);
    println!("   Duplicates: {}", stats.duplicate_rows);
    println!("   Remaining balance (valid): {:.2}", stats.total_amount);
    println!("   Average balance (valid): {:.2}", stats.avg_amount);
    println!("   Overdue days: {} - {}", stats.min_overdue_days, stats.max_overdue_days);
    println!("   Acceptance rate: {:.1}%", stats.acceptance_rate());

    let rejected: Vec<_> = run.outcome.rejected().collect();
    if !rejected.is_empty() {
        println!("\n⚠️  Rejected rows:");
        for record in rejected {
            println!("   Row {}: {}", record.row_index(), record.error_messages().join("; "));
        }
    }

    println!("\n   Report: {}", output_dir.join(REPORT_FILE_NAME).display());
    match run.commit {
        CommitStatus::Committed { records } => {
            println!(
                "✅ {} records packaged: {}",
                records,
                output_dir.join(PACKAGE_FILE_NAME).display()
            );
        }
        CommitStatus::Blocked => {
            println!("⛔ No valid records; case package not created");
        }
    }
}

fn run_template(config: &Config, out: Option<PathBuf>) -> Result<()> {
    let path = out.unwrap_or_else(|| PathBuf::from(&config.output.directory).join(template_file_name()));
    let version = write_template(&path, &AliasRegistry::new())
        .with_context(|| format!("Failed to write template to {}", path.display()))?;
    println!("📄 Template {} written to {}", version, path.display());
    Ok(())
}
