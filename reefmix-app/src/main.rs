use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reefmix_schemas::water::WaterChemistrySample;
use std::fs;

mod config;
mod plan;
mod plotting;
mod workflow;

#[derive(Parser)]
#[command(name = "reefmix", version, about = "Water-change planning for marine aquaria")]
struct Cli {
    /// Directory holding the YAML catalog (salt_mixes/, tanks/)
    #[arg(long, default_value = "./data/catalog")]
    catalog: String,

    /// CSV file holding the parameter-reading history
    #[arg(long, default_value = "./data/history.csv")]
    history: String,

    /// CSV journal of performed water changes
    #[arg(long, default_value = "./data/changes.csv")]
    journal: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute a water-change plan from a request file
    Plan {
        /// Path to the plan request YAML
        #[arg(long, default_value = "reefmix-app/request.yaml")]
        request: String,

        /// Base directory for timestamped run output
        #[arg(long, default_value = "./data/runs")]
        output: String,

        /// Record the planned change in the journal as performed
        #[arg(long)]
        commit: bool,
    },
    /// Append a parameter reading to the history log
    Log {
        #[arg(long)]
        tank: String,
        #[arg(long)]
        ph: f64,
        #[arg(long)]
        salinity: f64,
        #[arg(long)]
        calcium: f64,
        #[arg(long)]
        alkalinity: f64,
        #[arg(long)]
        magnesium: f64,
        #[arg(long, default_value_t = 0.0)]
        nitrate: f64,
        #[arg(long, default_value_t = 0.0)]
        nitrite: f64,
        #[arg(long, default_value_t = 0.0)]
        ammonia: f64,
        #[arg(long, default_value_t = 78.0)]
        temperature: f64,
    },
    /// Show range status, trends, and recorded changes for a tank
    History {
        #[arg(long)]
        tank: String,
        /// How many recent readings the trend window covers
        #[arg(long, default_value_t = 10)]
        window: usize,
    },
    /// Render history charts for a tank
    Plot {
        #[arg(long)]
        tank: String,
        #[arg(long, default_value = "./data/plots")]
        output: String,
    },
}

fn main() -> Result<()> {
    println!("--- Reefmix Water-Change Planner ---");
    let cli = Cli::parse();

    match cli.command {
        Command::Plan {
            request,
            output,
            commit,
        } => {
            let request_str =
                fs::read_to_string(&request).context("Failed to read the plan request file")?;
            let plan_request: plan::PlanRequest =
                serde_yaml::from_str(&request_str).context("Failed to parse the plan request")?;

            let catalog = config::Catalog::load(&cli.catalog)?;
            workflow::run_plan(
                &plan_request,
                &request,
                &catalog,
                &cli.history,
                &cli.journal,
                &output,
                commit,
            )?;
        }
        Command::Log {
            tank,
            ph,
            salinity,
            calcium,
            alkalinity,
            magnesium,
            nitrate,
            nitrite,
            ammonia,
            temperature,
        } => {
            let sample = WaterChemistrySample {
                ph,
                salinity,
                calcium_ppm: calcium,
                alkalinity_dkh: alkalinity,
                magnesium_ppm: magnesium,
                nitrate_ppm: nitrate,
                nitrite_ppm: nitrite,
                ammonia_ppm: ammonia,
                temperature_f: temperature,
            };
            workflow::run_log(&cli.history, &tank, sample)?;
        }
        Command::History { tank, window } => {
            workflow::run_history(&cli.history, &cli.journal, &tank, window)?;
        }
        Command::Plot { tank, output } => {
            workflow::run_plot(&cli.history, &tank, &output)?;
        }
    }

    Ok(())
}
