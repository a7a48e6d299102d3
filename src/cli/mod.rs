//! hotelsort CLI module
//!
//! Command-line interface for the two pipeline stages: cleaning a raw
//! search log and fitting a ranking or classification model.

use clap::{Parser, Subcommand};
use colored::*;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::data;
use crate::model::{ModelKind, SavedModel};
use crate::preprocessing::Cleaner;
use crate::training::{
    cross_val_score, GradientBoostingClassifier, GradientBoostingConfig, LambdaMart,
    LambdaMartConfig, TrainingFrame,
};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}
fn accent(s: &str) -> ColoredString {
    s.truecolor(120, 170, 255)
}
fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}
fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "hotelsort")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline learning-to-rank pipeline for hotel search results")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a raw search log: drop unusable columns, fill missing values
    Preprocess {
        /// Input CSV file
        input: PathBuf,

        /// Output CSV file
        output: PathBuf,
    },

    /// Fit a model on a cleaned training file
    Train {
        /// Cleaned training CSV file
        input: PathBuf,

        /// Output model file
        output: PathBuf,

        /// Model type (0 = LambdaMART, 1 = gradient boosting classifier)
        model_type: i64,
    },
}

// ─── Diagnostics ───────────────────────────────────────────────────────────────

/// Print the head rows and a per-column dtype/missing-count table.
fn print_data_report(df: &DataFrame) {
    println!();
    println!("{}", df.head(Some(20)));
    println!();

    println!(
        "  {:<32} {:<12} {:>8}",
        muted("Column"),
        muted("Type"),
        muted("Nulls")
    );
    println!("  {}", dim(&"─".repeat(54)));

    for col in df.get_columns() {
        println!(
            "  {:<32} {:<12} {:>8}",
            col.name(),
            format!("{:?}", col.dtype()).truecolor(140, 140, 140),
            col.null_count()
        );
    }

    println!();
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_preprocess(input: &Path, output: &Path) -> anyhow::Result<()> {
    let start = Instant::now();
    section("Preprocess");

    step_run(&format!("Loading {}", input.display()));
    let load_start = Instant::now();
    let df = data::load_csv(input)?;
    step_done(&format!(
        "{} rows × {} cols in {:?}",
        df.height(),
        df.width(),
        load_start.elapsed()
    ));

    section("Original data");
    print_data_report(&df);

    step_run("Cleaning");
    let clean_start = Instant::now();
    let cleaned = Cleaner::new().apply(&df)?;
    step_done(&format!("{:?}", clean_start.elapsed()));

    section("Cleaned data");
    print_data_report(&cleaned);

    step_run(&format!("Saving → {}", output.display()));
    data::write_csv(&cleaned, output)?;
    step_done(&format!("{} rows × {} cols", cleaned.height(), cleaned.width()));

    println!();
    println!(
        "  {} {}",
        muted("Finished in"),
        format!("{:.3}s", start.elapsed().as_secs_f64()).white()
    );
    println!();

    Ok(())
}

pub fn cmd_train(input: &Path, output: &Path, model_type: i64) -> anyhow::Result<()> {
    let start = Instant::now();
    section("Train");

    let kind = match ModelKind::from_flag(model_type) {
        Some(kind) => kind,
        None => {
            // Usage error: report and return cleanly, leaving no model file
            println!(
                "  Unknown model type: {} {}",
                model_type,
                dim("(0 = LambdaMART, 1 = gradient boosting classifier)")
            );
            println!();
            return Ok(());
        }
    };

    step_run(&format!("Loading {}", input.display()));
    let load_start = Instant::now();
    let df = data::load_csv(input)?;
    step_done(&format!(
        "{} rows × {} cols in {:?}",
        df.height(),
        df.width(),
        load_start.elapsed()
    ));

    step_run("Extracting features");
    let frame = TrainingFrame::from_dataframe(&df)?;
    step_done(&format!(
        "{} samples, {} features",
        frame.n_samples(),
        frame.n_features()
    ));

    let model = match kind {
        ModelKind::LambdaMart => {
            let config = LambdaMartConfig {
                verbose: true,
                ..Default::default()
            };
            println!(
                "  {} {} {}",
                accent("›"),
                "Fitting LambdaMART".cyan(),
                dim(&format!("({} estimators)", config.n_estimators))
            );
            let fit_start = Instant::now();
            let mut model = LambdaMart::new(config);
            model.fit(&frame.x, &frame.y, &frame.query_ids)?;
            step_ok_line(&format!("fitted in {:?}", fit_start.elapsed()));
            SavedModel::LambdaMart(model)
        }
        ModelKind::GradientBoosting => {
            let config = GradientBoostingConfig {
                verbose: true,
                ..Default::default()
            };
            println!(
                "  {} {} {}",
                accent("›"),
                "Fitting GradientBoostingClassifier".cyan(),
                dim(&format!("({} estimators)", config.n_estimators))
            );
            let fit_start = Instant::now();
            let mut model = GradientBoostingClassifier::new(config.clone());
            model.fit(&frame.x, &frame.y)?;
            step_ok_line(&format!("fitted in {:?}", fit_start.elapsed()));

            step_run("Cross-validating");
            let cv = cross_val_score(&config, &frame.x, &frame.y, 5)?;
            step_done(&format!("{} folds", cv.n_folds));

            let scores: Vec<String> = cv.scores.iter().map(|s| format!("{:.4}", s)).collect();
            println!(
                "  {:<16} [{}]",
                muted("CV accuracy"),
                scores.join(", ")
            );
            println!(
                "  {:<16} {}",
                muted("CV mean"),
                format!("{:.4} ± {:.4}", cv.mean_score, cv.std_score).white()
            );

            SavedModel::GradientBoosting(model)
        }
    };

    print_feature_importances(&frame.feature_names, model.feature_importances());

    step_run(&format!("Saving model → {}", output.display()));
    model.save(output)?;
    step_done(kind.name());

    println!();
    println!(
        "  {} {}",
        muted("Finished in"),
        format!("{:.3}s", start.elapsed().as_secs_f64()).white()
    );
    println!();

    Ok(())
}

fn step_ok_line(msg: &str) {
    println!("  {} {}", ok("✓"), dim(msg));
}

/// Print every feature with its importance, sorted descending.
fn print_feature_importances(names: &[String], importances: &[f64]) {
    section("Feature importances");

    let mut ranked: Vec<(&String, f64)> = names
        .iter()
        .zip(importances.iter().copied())
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (name, importance) in &ranked {
        println!("  {:<36} {:>8.4}", name, importance);
    }

    println!();
}
