//! Command-line surface for the reasoning evaluator.
//!
//! Reads a question and a raw model response (file or stdin), runs one
//! evaluation, and renders the report as text or JSON. Optionally
//! appends one CSV history row per evaluation.

use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use reasoneval_core::{evaluate_reasoning, EvalConfig, EvaluationReport};

#[derive(Parser)]
#[command(
    name = "reasoneval",
    about = "Score the reasoning quality of a model response",
    version
)]
struct Cli {
    /// YAML config overriding weights, baseline, and verdict thresholds.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate one model response against a question.
    Evaluate {
        /// The question the model was asked.
        #[arg(long)]
        question: String,

        /// File containing the raw model response; stdin when omitted.
        #[arg(long)]
        response: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Append one CSV history row to this file.
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EvalConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => {
            tracing::debug!("No config file given, using built-in defaults");
            EvalConfig::default()
        }
    };

    match cli.command {
        Command::Evaluate {
            question,
            response,
            format,
            log,
        } => {
            let raw = read_response(response.as_deref())?;
            let report = evaluate_reasoning(&question, &raw, &config)?;
            tracing::info!(
                verdict = report.verdict.label(),
                overall = report.overall_score,
                issues = report.issues.len(),
                "Evaluation complete"
            );

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => print_report(&report),
            }

            if let Some(path) = log {
                append_history(&path, &question, &report)
                    .with_context(|| format!("failed to append history to {}", path.display()))?;
            }
        }
    }

    Ok(())
}

fn read_response(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read response from {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read response from stdin")?;
            Ok(buffer)
        }
    }
}

fn print_report(report: &EvaluationReport) {
    println!(
        "Verdict: {} (overall {:.1})",
        report.verdict.label(),
        report.overall_score
    );
    for dimension in &report.dimensions {
        println!("  {:<22} {:>5.1}", dimension.dimension.name(), dimension.score);
    }
    if report.issues.is_empty() {
        println!("Issues: none");
    } else {
        println!("Issues:");
        for issue in &report.issues {
            println!("  - {issue}");
        }
    }
}

/// Append one evaluation as a CSV row, writing the header when the
/// file is created.
fn append_history(path: &Path, question: &str, report: &EvaluationReport) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    let write_header = !path.exists();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    if write_header {
        writeln!(
            file,
            "Timestamp,Question,Logical Consistency,Completeness,Instruction Following,\
             Hallucination Risk,Overall,Verdict,Issues"
        )?;
    }

    let scores: Vec<String> = report
        .dimensions
        .iter()
        .map(|d| format!("{:.2}", d.score))
        .collect();

    writeln!(
        file,
        "{},{},{},{:.2},{},{}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        csv_escape(question),
        scores.join(","),
        report.overall_score,
        report.verdict.label(),
        csv_escape(&report.issues.join("; ")),
    )?;

    Ok(())
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
