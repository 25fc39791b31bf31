use crate::mixing::ChangeResult;
use csv::{Writer, WriterBuilder};
use reefmix_schemas::water::ParameterReading;
use serde::Serialize;
use std::fs;
use std::io;

#[derive(Debug, Serialize)]
struct HistoryRow {
    tank_id: String,
    measured_at: i64,
    ph: f64,
    salinity: f64,
    calcium_ppm: f64,
    alkalinity_dkh: f64,
    magnesium_ppm: f64,
    nitrate_ppm: f64,
    nitrite_ppm: f64,
    ammonia_ppm: f64,
    temperature_f: f64,
}

#[derive(Debug, Serialize)]
struct JournalRow {
    tank_id: String,
    performed_at: i64,
    salt_mix_id: String,
    change_percentage: f64,
    salt_needed_lb: f64,
    estimated_cost_usd: f64,
    safety_score: u32,
    predicted_json: String,
    warnings_json: String,
}

fn append_writer(path: &str) -> Result<Writer<fs::File>, io::Error> {
    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    Ok(WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file))
}

/// Appends parameter readings to a flat CSV history file, one row per
/// measurement. Rows are flushed as they are written so a crash never loses
/// a logged reading.
pub struct ParameterLogger {
    writer: Writer<fs::File>,
}

impl ParameterLogger {
    pub fn open_append(path: &str) -> Result<Self, io::Error> {
        Ok(Self {
            writer: append_writer(path)?,
        })
    }

    pub fn log_reading(&mut self, reading: &ParameterReading) -> Result<(), anyhow::Error> {
        let sample = &reading.sample;
        let row = HistoryRow {
            tank_id: reading.tank_id.clone(),
            measured_at: reading.measured_at,
            ph: sample.ph,
            salinity: sample.salinity,
            calcium_ppm: sample.calcium_ppm,
            alkalinity_dkh: sample.alkalinity_dkh,
            magnesium_ppm: sample.magnesium_ppm,
            nitrate_ppm: sample.nitrate_ppm,
            nitrite_ppm: sample.nitrite_ppm,
            ammonia_ppm: sample.ammonia_ppm,
            temperature_f: sample.temperature_f,
        };
        self.writer.serialize(row)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Appends performed water changes to a CSV journal. The predicted chemistry
/// and warnings ride along as JSON columns so the full result can be
/// reconstructed when the journal is read back.
pub struct ChangeJournal {
    writer: Writer<fs::File>,
}

impl ChangeJournal {
    pub fn open_append(path: &str) -> Result<Self, io::Error> {
        Ok(Self {
            writer: append_writer(path)?,
        })
    }

    pub fn log_change(
        &mut self,
        tank_id: &str,
        performed_at: i64,
        salt_mix_id: &str,
        result: &ChangeResult,
    ) -> Result<(), anyhow::Error> {
        let row = JournalRow {
            tank_id: tank_id.to_string(),
            performed_at,
            salt_mix_id: salt_mix_id.to_string(),
            change_percentage: result.recommended_percentage,
            salt_needed_lb: result.salt_needed_lb,
            estimated_cost_usd: result.estimated_cost_usd,
            safety_score: result.safety_score,
            predicted_json: serde_json::to_string(&result.predicted)?,
            warnings_json: serde_json::to_string(&result.warnings)?,
        };
        self.writer.serialize(row)?;
        self.writer.flush()?;
        Ok(())
    }
}
