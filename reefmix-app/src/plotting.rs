//! This module renders charts from logged parameter history and planned changes.

use anyhow::Result;
use plotters::prelude::*;
use reefmix_core::mixing::ChangeResult;
use reefmix_schemas::water::{Parameter, ParameterReading, WaterChemistrySample};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Generates and saves all history charts for one tank's readings.
pub fn generate_history_plots(output_dir: &str, readings: &[ParameterReading]) -> Result<()> {
    println!("[Plotting] Generating charts from logged history...");

    if readings.len() < 2 {
        println!("[Plotting] Warning: Not enough readings to chart.");
        return Ok(());
    }

    plot_parameter_series(
        &format!("{}/1_ph_alkalinity.png", output_dir),
        "pH and Alkalinity Over Time",
        "Value",
        readings,
        &[Parameter::Ph, Parameter::Alkalinity],
    )?;
    plot_parameter_series(
        &format!("{}/2_calcium_magnesium.png", output_dir),
        "Calcium and Magnesium Over Time",
        "Concentration (ppm)",
        readings,
        &[Parameter::Calcium, Parameter::Magnesium],
    )?;
    plot_parameter_series(
        &format!("{}/3_nitrogen_waste.png", output_dir),
        "Nitrogen Compounds Over Time",
        "Concentration (ppm)",
        readings,
        &[Parameter::Nitrate, Parameter::Nitrite, Parameter::Ammonia],
    )?;

    println!(
        "[Plotting] History charts have been saved to '{}'.",
        output_dir
    );
    Ok(())
}

fn day_offsets(readings: &[ParameterReading]) -> Vec<f64> {
    let t0 = readings[0].measured_at;
    readings
        .iter()
        .map(|r| (r.measured_at - t0) as f64 / SECONDS_PER_DAY)
        .collect()
}

/// Draws a line chart of the given parameters against days since the first
/// reading.
fn plot_parameter_series(
    path: &str,
    caption: &str,
    y_desc: &str,
    readings: &[ParameterReading],
    series: &[Parameter],
) -> Result<()> {
    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let days = day_offsets(readings);
    let max_day = days.last().copied().unwrap_or(1.0).max(1.0);

    let mut min_value = f64::INFINITY;
    let mut max_value = f64::NEG_INFINITY;
    for reading in readings {
        for &parameter in series {
            let value = reading.sample.value(parameter);
            if value.is_finite() {
                min_value = min_value.min(value);
                max_value = max_value.max(value);
            }
        }
    }
    if min_value > max_value {
        min_value = 0.0;
        max_value = 1.0;
    }
    let pad = ((max_value - min_value) * 0.1).max(1e-3);

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 50).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..max_day * 1.05, (min_value - pad)..(max_value + pad))?;

    chart
        .configure_mesh()
        .x_desc("Time (days)")
        .y_desc(y_desc)
        .draw()?;

    let colors = [BLUE, RED, GREEN, MAGENTA];

    for (i, &parameter) in series.iter().enumerate() {
        let color = colors[i % colors.len()];

        chart
            .draw_series(LineSeries::new(
                days.iter()
                    .zip(readings)
                    .map(|(&day, r)| (day, r.sample.value(parameter))),
                color.stroke_width(2),
            ))?
            .label(parameter.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Draws the relative shift each parameter would see under a planned change.
pub fn plot_predicted_shift(
    output_dir: &str,
    current: &WaterChemistrySample,
    result: &ChangeResult,
) -> Result<()> {
    let path = format!("{}/4_predicted_shift.png", output_dir);
    let root = BitMapBackend::new(&path, (1024, 512)).into_drawing_area();
    root.fill(&WHITE)?;

    let predicted = &result.predicted;
    let shifts: Vec<(&str, f64)> = vec![
        ("pH", relative_shift(current.ph, predicted.ph)),
        ("Salinity", relative_shift(current.salinity, predicted.salinity)),
        ("Ca", relative_shift(current.calcium_ppm, predicted.calcium_ppm)),
        (
            "dKH",
            relative_shift(current.alkalinity_dkh, predicted.alkalinity_dkh),
        ),
        ("Mg", relative_shift(current.magnesium_ppm, predicted.magnesium_ppm)),
        ("NO3", relative_shift(current.nitrate_ppm, predicted.nitrate_ppm)),
    ];

    let mut min_pct = 0.0f64;
    let mut max_pct = 0.0f64;
    for (_, pct) in &shifts {
        if pct.is_finite() {
            min_pct = min_pct.min(*pct);
            max_pct = max_pct.max(*pct);
        }
    }
    let span = (max_pct - min_pct).max(1.0);

    let caption = format!(
        "Predicted Shift at {:.1}% Change",
        result.recommended_percentage
    );
    let labels: Vec<&str> = shifts.iter().map(|(label, _)| *label).collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 30).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(
            0i32..shifts.len() as i32,
            (min_pct - span * 0.1)..(max_pct + span * 0.1),
        )?;

    chart
        .configure_mesh()
        .x_desc("Parameter")
        .y_desc("Relative change (%)")
        .x_label_formatter(&|x| {
            labels
                .get(*x as usize)
                .map(|l| l.to_string())
                .unwrap_or_default()
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.filled())
            .margin(20)
            .data(
                shifts
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, pct))| pct.is_finite())
                    .map(|(i, (_, pct))| (i as i32, *pct)),
            ),
    )?;

    root.present()?;
    Ok(())
}

fn relative_shift(current: f64, predicted: f64) -> f64 {
    if current == 0.0 {
        0.0
    } else {
        (predicted - current) / current * 100.0
    }
}
