//! Per-station crossing frequencies as CSV.

use crate::startup::{self, SourceArgs};
use log::info;
use std::io::Write;
use wtv_data::frequency::partition;
use wtv_data::{aggregate, FrequencyBucket, FrequencyRecord};

/// Load the tables, aggregate, and write the frequency table to stdout.
pub async fn run_summary(args: &SourceArgs) -> anyhow::Result<()> {
    let startup = startup::load(args).await?;
    let thresholds = &startup.config.thresholds;

    let rows = startup.database.query_observation_count()?;
    match startup.database.query_valid_time_range()? {
        Some(range) => info!("{} observation rows from {} to {}", rows, range.first, range.last),
        None => info!("No observation rows loaded"),
    }
    for count in startup.database.query_rows_per_station()? {
        log::debug!("station {}: {} rows", count.station_id, count.rows);
    }

    let records = aggregate(
        startup.tables.observations(),
        startup.tables.stations(),
        thresholds.crossing,
    );
    info!(
        "{} stations with frequencies at threshold {}",
        records.len(),
        thresholds.crossing
    );

    let stdout = std::io::stdout();
    write_summary(&records, thresholds.bucket, stdout.lock())
}

/// Write records as CSV, LOW stations first, each group in record order.
pub fn write_summary<W: Write>(
    records: &[FrequencyRecord],
    bucket_threshold: f64,
    out: W,
) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "station_id",
        "lat",
        "lon",
        "obs_freq",
        "model_a_freq",
        "model_b_freq",
        "bucket",
    ])?;

    let (low, high) = partition(records, bucket_threshold);
    for record in low.into_iter().chain(high) {
        let bucket = match record.bucket(bucket_threshold) {
            FrequencyBucket::Low => "LOW",
            FrequencyBucket::High => "HIGH",
        };
        writer.write_record([
            record.station_id.clone(),
            record.position.lat.to_string(),
            record.position.lon.to_string(),
            record.obs_freq.to_string(),
            record.model_a_freq.to_string(),
            record.model_b_freq.to_string(),
            bucket.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
