use crate::config::Catalog;
use crate::plan::{self, PlanRequest};
use crate::plotting;
use anyhow::{Context, Result};
use reefmix_core::{
    analysis::{self, RangeStatus, TrendDirection},
    error::ReefmixError,
    logger::{ChangeJournal, ParameterLogger},
    mixing::{self, ChangeResult},
};
use reefmix_schemas::{
    salt_mix::SaltMixProfile,
    tank::TankProfile,
    water::{Parameter, ParameterReading, WaterChemistrySample},
};
use serde::Serialize;
use std::{fs, path::Path};

#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    tank_id: &'a str,
    tank_name: &'a str,
    salt_mix_id: &'a str,
    change_percentage: f64,
    water_to_mix_gallons: f64,
    result: &'a ChangeResult,
}

/// Runs the full planning workflow: resolve the tank and its latest reading,
/// pick the salt mix, predict the change, write the plan and plots to a
/// timestamped run directory, and print the summary report.
pub fn run_plan(
    request: &PlanRequest,
    request_path: &str,
    catalog: &Catalog,
    history_path: &str,
    journal_path: &str,
    output_base: &str,
    commit: bool,
) -> Result<()> {
    println!(
        "\n--- [Workflow] Planning a water change for tank '{}' ---",
        request.tank_id
    );

    let tank = catalog
        .tanks
        .get(&request.tank_id)
        .ok_or_else(|| ReefmixError::TankNotFound(request.tank_id.clone()))?;

    let history = analysis::load_history(history_path)?;
    let latest = analysis::latest_reading_for_tank(&history, &request.tank_id)
        .ok_or_else(|| ReefmixError::NoReadingLogged(request.tank_id.clone()))?;
    let current = latest.sample.clone();
    let measured_at = latest.measured_at;

    let salt_mix = plan::select_salt_mix(request, catalog, &current, tank.volume_gallons)?;
    let change_percentage = plan::resolve_change_percentage(request, &current, salt_mix);
    let result = mixing::predict(&current, salt_mix, tank.volume_gallons, change_percentage);
    let water_to_mix_gallons = tank.volume_gallons * change_percentage / 100.0;

    let output_dir = format!(
        "{}/plan_{}_{}",
        output_base,
        tank.tank_id,
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir))?;

    // Keep the request next to the plan for traceability
    fs::copy(request_path, Path::new(&output_dir).join("request.yaml"))?;

    let report = PlanReport {
        tank_id: &tank.tank_id,
        tank_name: &tank.tank_name,
        salt_mix_id: &salt_mix.mix_id,
        change_percentage,
        water_to_mix_gallons,
        result: &result,
    };
    fs::write(
        Path::new(&output_dir).join("plan.yaml"),
        serde_yaml::to_string(&report)?,
    )?;

    let tank_history: Vec<ParameterReading> = history
        .iter()
        .filter(|r| r.tank_id == tank.tank_id)
        .cloned()
        .collect();
    plotting::generate_history_plots(&output_dir, &tank_history)?;
    plotting::plot_predicted_shift(&output_dir, &current, &result)?;

    if commit {
        let mut journal = ChangeJournal::open_append(journal_path)
            .map_err(|e| ReefmixError::FileIO(journal_path.to_string(), e))?;
        journal.log_change(
            &tank.tank_id,
            chrono::Utc::now().timestamp(),
            &salt_mix.mix_id,
            &result,
        )?;
        println!("[Workflow] Recorded the change in '{}'", journal_path);
    }

    print_plan_report(
        tank,
        salt_mix,
        measured_at,
        &current,
        change_percentage,
        water_to_mix_gallons,
        &result,
    );
    println!("\nPlan artifacts are in '{}'", output_dir);
    Ok(())
}

/// Appends one parameter reading to the history log.
pub fn run_log(history_path: &str, tank_id: &str, sample: WaterChemistrySample) -> Result<()> {
    let reading = ParameterReading {
        tank_id: tank_id.to_string(),
        measured_at: chrono::Utc::now().timestamp(),
        sample,
    };

    let mut logger = ParameterLogger::open_append(history_path)
        .map_err(|e| ReefmixError::FileIO(history_path.to_string(), e))?;
    logger.log_reading(&reading)?;

    println!(
        "Logged a reading for '{}' to '{}'.",
        tank_id, history_path
    );
    for status in analysis::evaluate_ranges(&reading.sample) {
        if status.status != RangeStatus::Ok {
            println!(
                "  Note: {} is {} the {}-{} reference band.",
                status.parameter.label(),
                if status.status == RangeStatus::Low { "below" } else { "above" },
                status.band.low,
                status.band.high,
            );
        }
    }
    Ok(())
}

/// Prints range status for the latest reading, recent trends, and the
/// water-change spend recorded in the journal.
pub fn run_history(
    history_path: &str,
    journal_path: &str,
    tank_id: &str,
    window: usize,
) -> Result<()> {
    let history = analysis::load_history(history_path)?;
    let tank_history: Vec<ParameterReading> = history
        .into_iter()
        .filter(|r| r.tank_id == tank_id)
        .collect();
    let latest = tank_history
        .last()
        .ok_or_else(|| ReefmixError::NoReadingLogged(tank_id.to_string()))?;

    println!(
        "\n--- [History] {} readings for tank '{}' ---",
        tank_history.len(),
        tank_id
    );

    println!("\nLatest reading ({}):", format_timestamp(latest.measured_at));
    for status in analysis::evaluate_ranges(&latest.sample) {
        let flag = match status.status {
            RangeStatus::Ok => "ok",
            RangeStatus::Low => "LOW",
            RangeStatus::High => "HIGH",
        };
        println!(
            "  - {:<12} {:>10.prec$} {:<4} [{} - {}]  {}",
            status.parameter.label(),
            status.value,
            status.parameter.unit(),
            status.band.low,
            status.band.high,
            flag,
            prec = display_precision(status.parameter),
        );
    }

    if tank_history.len() >= 2 {
        println!("\nTrends over the last {} readings:", window.min(tank_history.len()));
        for trend in analysis::analyze_trends(&tank_history, window) {
            let direction = match trend.direction {
                TrendDirection::Rising => "rising",
                TrendDirection::Falling => "falling",
                TrendDirection::Stable => "stable",
            };
            println!(
                "  - {:<12} {:<8} ({:+.prec$} {} per day)",
                trend.parameter.label(),
                direction,
                trend.change_per_day,
                trend.parameter.unit(),
                prec = display_precision(trend.parameter),
            );
        }
    }

    if let Ok(changes) = analysis::load_change_journal(journal_path) {
        let tank_changes: Vec<_> = changes.iter().filter(|c| c.tank_id == tank_id).collect();
        if !tank_changes.is_empty() {
            let salt_lb: f64 = tank_changes.iter().map(|c| c.result.salt_needed_lb).sum();
            let cost: f64 = tank_changes
                .iter()
                .map(|c| c.result.estimated_cost_usd)
                .sum();
            println!(
                "\n{} water changes recorded: {:.2} lb of salt, ${:.2} USD total.",
                tank_changes.len(),
                salt_lb,
                cost
            );
        }
    }
    Ok(())
}

/// Renders the history charts for one tank.
pub fn run_plot(history_path: &str, tank_id: &str, output_dir: &str) -> Result<()> {
    let history = analysis::load_history(history_path)?;
    let tank_history: Vec<ParameterReading> = history
        .into_iter()
        .filter(|r| r.tank_id == tank_id)
        .collect();
    if tank_history.is_empty() {
        return Err(ReefmixError::NoReadingLogged(tank_id.to_string()).into());
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir))?;
    plotting::generate_history_plots(output_dir, &tank_history)?;
    println!("Charts for '{}' are in '{}'.", tank_id, output_dir);
    Ok(())
}

fn display_precision(parameter: Parameter) -> usize {
    match parameter {
        Parameter::Salinity => 4,
        Parameter::Ph | Parameter::Nitrite | Parameter::Ammonia => 2,
        Parameter::Alkalinity | Parameter::Nitrate | Parameter::Temperature => 1,
        Parameter::Calcium | Parameter::Magnesium => 0,
    }
}

fn format_timestamp(unix_seconds: i64) -> String {
    chrono::DateTime::from_timestamp(unix_seconds, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| unix_seconds.to_string())
}

fn print_plan_report(
    tank: &TankProfile,
    salt_mix: &SaltMixProfile,
    measured_at: i64,
    current: &WaterChemistrySample,
    change_percentage: f64,
    water_to_mix_gallons: f64,
    result: &ChangeResult,
) {
    println!("\n\n--- [Water Change Plan] ---");
    println!("========================================");
    println!("Tank: {} ({:.0} gal)", tank.tank_name, tank.volume_gallons);
    println!("Salt mix: {} ({})", salt_mix.mix_name, salt_mix.vendor);
    println!("Based on the reading from {}", format_timestamp(measured_at));
    println!(
        "Change: {:.1}% ({:.1} gal of new saltwater)",
        change_percentage, water_to_mix_gallons
    );
    println!(
        "Salt needed: {:.2} lb | Estimated cost: ${:.2} USD",
        result.salt_needed_lb, result.estimated_cost_usd
    );
    println!("Safety score: {}/100", result.safety_score);
    println!("----------------------------------------");

    println!("\nPredicted chemistry after the change:");
    let predicted = &result.predicted;
    println!("  - pH:         {:>9.2} -> {:>9.2}", current.ph, predicted.ph);
    println!(
        "  - Salinity:   {:>9.4} -> {:>9.4} sg",
        current.salinity, predicted.salinity
    );
    println!(
        "  - Calcium:    {:>9.0} -> {:>9.0} ppm",
        current.calcium_ppm, predicted.calcium_ppm
    );
    println!(
        "  - Alkalinity: {:>9.1} -> {:>9.1} dKH",
        current.alkalinity_dkh, predicted.alkalinity_dkh
    );
    println!(
        "  - Magnesium:  {:>9.0} -> {:>9.0} ppm",
        current.magnesium_ppm, predicted.magnesium_ppm
    );
    println!(
        "  - Nitrate:    {:>9.1} -> {:>9.1} ppm",
        current.nitrate_ppm, predicted.nitrate_ppm
    );
    println!(
        "  - Nitrite:    {:>9.2} -> {:>9.2} ppm",
        current.nitrite_ppm, predicted.nitrite_ppm
    );
    println!(
        "  - Ammonia:    {:>9.2} -> {:>9.2} ppm",
        current.ammonia_ppm, predicted.ammonia_ppm
    );

    if result.warnings.is_empty() {
        println!("\nNo parameter swings outside safe limits.");
    } else {
        println!("\nWarnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }
    println!("========================================");
}
