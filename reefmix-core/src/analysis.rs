use crate::{error::ReefmixError, mixing::ChangeResult};
use reefmix_schemas::water::{Parameter, ParameterReading, WaterChemistrySample};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct HistoryEntry {
    pub tank_id: String,
    pub measured_at: i64,
    pub ph: f64,
    pub salinity: f64,
    pub calcium_ppm: f64,
    pub alkalinity_dkh: f64,
    pub magnesium_ppm: f64,
    pub nitrate_ppm: f64,
    pub nitrite_ppm: f64,
    pub ammonia_ppm: f64,
    pub temperature_f: f64,
}

#[derive(Debug, Deserialize)]
pub struct JournalEntry {
    pub tank_id: String,
    pub performed_at: i64,
    pub salt_mix_id: String,
    pub change_percentage: f64,
    pub salt_needed_lb: f64,
    pub estimated_cost_usd: f64,
    pub safety_score: u32,
    pub predicted_json: String,
    pub warnings_json: String,
}

/// A water change read back from the journal.
#[derive(Debug, Clone)]
pub struct PerformedChange {
    pub tank_id: String,
    pub performed_at: i64,
    pub salt_mix_id: String,
    pub result: ChangeResult,
}

/// Reads the parameter history CSV, sorted by measurement time.
pub fn load_history(path: &str) -> Result<Vec<ParameterReading>, ReefmixError> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| ReefmixError::CsvError(path.to_string(), e))?;
    let mut readings = Vec::new();

    for result in reader.deserialize() {
        let entry: HistoryEntry =
            result.map_err(|e| ReefmixError::CsvError(path.to_string(), e))?;
        readings.push(ParameterReading {
            tank_id: entry.tank_id,
            measured_at: entry.measured_at,
            sample: WaterChemistrySample {
                ph: entry.ph,
                salinity: entry.salinity,
                calcium_ppm: entry.calcium_ppm,
                alkalinity_dkh: entry.alkalinity_dkh,
                magnesium_ppm: entry.magnesium_ppm,
                nitrate_ppm: entry.nitrate_ppm,
                nitrite_ppm: entry.nitrite_ppm,
                ammonia_ppm: entry.ammonia_ppm,
                temperature_f: entry.temperature_f,
            },
        });
    }

    readings.sort_by_key(|r| r.measured_at);
    Ok(readings)
}

/// Reads the water-change journal CSV, reconstructing the embedded results.
pub fn load_change_journal(path: &str) -> Result<Vec<PerformedChange>, ReefmixError> {
    let mut reader =
        csv::Reader::from_path(path).map_err(|e| ReefmixError::CsvError(path.to_string(), e))?;
    let mut changes = Vec::new();

    for result in reader.deserialize() {
        let entry: JournalEntry =
            result.map_err(|e| ReefmixError::CsvError(path.to_string(), e))?;
        let predicted = serde_json::from_str(&entry.predicted_json)?;
        let warnings = serde_json::from_str(&entry.warnings_json)?;
        changes.push(PerformedChange {
            tank_id: entry.tank_id,
            performed_at: entry.performed_at,
            salt_mix_id: entry.salt_mix_id,
            result: ChangeResult {
                predicted,
                warnings,
                salt_needed_lb: entry.salt_needed_lb,
                estimated_cost_usd: entry.estimated_cost_usd,
                safety_score: entry.safety_score,
                recommended_percentage: entry.change_percentage,
            },
        });
    }

    changes.sort_by_key(|c| c.performed_at);
    Ok(changes)
}

pub fn latest_reading_for_tank<'a>(
    readings: &'a [ParameterReading],
    tank_id: &str,
) -> Option<&'a ParameterReading> {
    readings
        .iter()
        .filter(|r| r.tank_id == tank_id)
        .max_by_key(|r| r.measured_at)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeStatus {
    Low,
    Ok,
    High,
}

/// Hobbyist reference band for one parameter in a reef system.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceBand {
    pub low: f64,
    pub high: f64,
}

pub fn reference_band(parameter: Parameter) -> ReferenceBand {
    let (low, high) = match parameter {
        Parameter::Ph => (7.8, 8.4),
        Parameter::Salinity => (1.023, 1.026),
        Parameter::Calcium => (380.0, 450.0),
        Parameter::Alkalinity => (7.0, 12.0),
        Parameter::Magnesium => (1250.0, 1400.0),
        Parameter::Nitrate => (0.0, 20.0),
        Parameter::Nitrite => (0.0, 0.1),
        Parameter::Ammonia => (0.0, 0.1),
        Parameter::Temperature => (75.0, 80.0),
    };
    ReferenceBand { low, high }
}

#[derive(Debug, Clone, Copy)]
pub struct ParameterStatus {
    pub parameter: Parameter,
    pub value: f64,
    pub band: ReferenceBand,
    pub status: RangeStatus,
}

/// Grades every parameter of a sample against its reference band.
pub fn evaluate_ranges(sample: &WaterChemistrySample) -> Vec<ParameterStatus> {
    Parameter::ALL
        .iter()
        .map(|&parameter| {
            let value = sample.value(parameter);
            let band = reference_band(parameter);
            let status = if value < band.low {
                RangeStatus::Low
            } else if value > band.high {
                RangeStatus::High
            } else {
                RangeStatus::Ok
            };
            ParameterStatus {
                parameter,
                value,
                band,
                status,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

#[derive(Debug, Clone, Copy)]
pub struct ParameterTrend {
    pub parameter: Parameter,
    pub direction: TrendDirection,
    pub change: f64,
    pub change_per_day: f64,
}

/// Movement smaller than typical test-kit resolution reads as stable.
fn noise_floor(parameter: Parameter) -> f64 {
    match parameter {
        Parameter::Ph => 0.05,
        Parameter::Salinity => 0.0005,
        Parameter::Calcium => 10.0,
        Parameter::Alkalinity => 0.3,
        Parameter::Magnesium => 20.0,
        Parameter::Nitrate => 1.0,
        Parameter::Nitrite => 0.05,
        Parameter::Ammonia => 0.05,
        Parameter::Temperature => 0.5,
    }
}

/// Classifies each parameter's direction over the most recent `window`
/// readings. Readings must be in chronological order, as `load_history`
/// returns them.
pub fn analyze_trends(readings: &[ParameterReading], window: usize) -> Vec<ParameterTrend> {
    let start = readings.len().saturating_sub(window.max(2));
    let slice = &readings[start..];
    let (first, last) = match (slice.first(), slice.last()) {
        (Some(first), Some(last)) if slice.len() >= 2 => (first, last),
        _ => return Vec::new(),
    };

    let span_days = (last.measured_at - first.measured_at) as f64 / 86_400.0;

    Parameter::ALL
        .iter()
        .map(|&parameter| {
            let change = last.sample.value(parameter) - first.sample.value(parameter);
            let direction = if change.abs() <= noise_floor(parameter) {
                TrendDirection::Stable
            } else if change > 0.0 {
                TrendDirection::Rising
            } else {
                TrendDirection::Falling
            };
            let change_per_day = if span_days > 0.0 {
                change / span_days
            } else {
                0.0
            };
            ParameterTrend {
                parameter,
                direction,
                change,
                change_per_day,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{ChangeJournal, ParameterLogger};
    use crate::{catalog, mixing};
    use std::path::PathBuf;

    fn sample(nitrate_ppm: f64) -> WaterChemistrySample {
        WaterChemistrySample {
            ph: 8.1,
            salinity: 1.024,
            calcium_ppm: 410.0,
            alkalinity_dkh: 8.5,
            magnesium_ppm: 1300.0,
            nitrate_ppm,
            nitrite_ppm: 0.0,
            ammonia_ppm: 0.0,
            temperature_f: 78.0,
        }
    }

    fn reading(tank_id: &str, measured_at: i64, nitrate_ppm: f64) -> ParameterReading {
        ParameterReading {
            tank_id: tank_id.to_string(),
            measured_at,
            sample: sample(nitrate_ppm),
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("reefmix_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_history_round_trip_through_logger() {
        let path = temp_path("history.csv");
        let path_str = path.to_str().unwrap();
        let _ = std::fs::remove_file(&path);

        let mut logger = ParameterLogger::open_append(path_str).unwrap();
        logger.log_reading(&reading("display-75", 1_700_000_000, 12.0)).unwrap();
        logger.log_reading(&reading("display-75", 1_700_086_400, 15.0)).unwrap();
        drop(logger);

        let readings = load_history(path_str).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].tank_id, "display-75");
        assert_eq!(readings[1].sample.nitrate_ppm, 15.0);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_journal_round_trip_preserves_embedded_result() {
        let path = temp_path("journal.csv");
        let path_str = path.to_str().unwrap();
        let _ = std::fs::remove_file(&path);

        let mixes = catalog::builtin_salt_mixes();
        let mix = catalog::find_salt_mix(&mixes, "instant-ocean-reef-crystals").unwrap();
        let result = mixing::predict(&sample(20.0), mix, 50.0, 20.0);

        let mut journal = ChangeJournal::open_append(path_str).unwrap();
        journal
            .log_change("display-75", 1_700_000_000, &mix.mix_id, &result)
            .unwrap();
        drop(journal);

        let changes = load_change_journal(path_str).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].salt_mix_id, "instant-ocean-reef-crystals");
        assert_eq!(changes[0].result, result);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_latest_reading_picks_newest_for_tank() {
        let readings = vec![
            reading("display-75", 100, 10.0),
            reading("frag-20", 300, 5.0),
            reading("display-75", 200, 12.0),
        ];
        let latest = latest_reading_for_tank(&readings, "display-75").unwrap();
        assert_eq!(latest.measured_at, 200);
        assert!(latest_reading_for_tank(&readings, "sump").is_none());
    }

    #[test]
    fn test_evaluate_ranges_flags_out_of_band_values() {
        let mut s = sample(35.0);
        s.salinity = 1.020;
        let statuses = evaluate_ranges(&s);

        let nitrate = statuses
            .iter()
            .find(|p| p.parameter == Parameter::Nitrate)
            .unwrap();
        assert_eq!(nitrate.status, RangeStatus::High);

        let salinity = statuses
            .iter()
            .find(|p| p.parameter == Parameter::Salinity)
            .unwrap();
        assert_eq!(salinity.status, RangeStatus::Low);

        let ph = statuses.iter().find(|p| p.parameter == Parameter::Ph).unwrap();
        assert_eq!(ph.status, RangeStatus::Ok);
    }

    #[test]
    fn test_trends_classify_direction_and_rate() {
        let readings = vec![
            reading("display-75", 0, 10.0),
            reading("display-75", 86_400, 12.0),
            reading("display-75", 172_800, 16.0),
        ];
        let trends = analyze_trends(&readings, 10);

        let nitrate = trends
            .iter()
            .find(|t| t.parameter == Parameter::Nitrate)
            .unwrap();
        assert_eq!(nitrate.direction, TrendDirection::Rising);
        assert!((nitrate.change - 6.0).abs() < 1e-9);
        assert!((nitrate.change_per_day - 3.0).abs() < 1e-9);

        let calcium = trends
            .iter()
            .find(|t| t.parameter == Parameter::Calcium)
            .unwrap();
        assert_eq!(calcium.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_trends_need_at_least_two_readings() {
        let readings = vec![reading("display-75", 0, 10.0)];
        assert!(analyze_trends(&readings, 10).is_empty());
        assert!(analyze_trends(&[], 10).is_empty());
    }
}
