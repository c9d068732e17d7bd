//! Startup: configuration, case windows and the two source tables.
//!
//! Data loading happens once, before the interactive loop. There is no
//! degraded mode: if either table cannot be fetched or parsed the command
//! fails.

use anyhow::Context;
use clap::Args;
use log::info;
use std::path::{Path, PathBuf};
use wtv_core::error::FetchError;
use wtv_core::object_store::{HttpObjectStore, LocalObjectStore, ObjectStore};
use wtv_core::{CaseWindowRegistry, ExplorerConfig, TableStore};
use wtv_db::Database;

/// Flags shared by every command that needs the source tables.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Local object store root, laid out as <dir>/<bucket>/<key> [default: data]
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// HTTP object store endpoint; objects are fetched from <url>/<bucket>/<key>
    #[arg(long, conflicts_with = "data_dir")]
    pub base_url: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Case window CSV (label,start,end); defaults to the embedded registry
    #[arg(long)]
    pub cases: Option<PathBuf>,

    /// Override the source bucket name
    #[arg(long)]
    pub bucket: Option<String>,

    /// Override the crossing threshold (m/s)
    #[arg(long)]
    pub crossing_threshold: Option<f64>,

    /// Override the HIGH/LOW bucket threshold
    #[arg(long)]
    pub bucket_threshold: Option<f64>,

    /// Override the lowest forecast hour kept in charts
    #[arg(long, allow_hyphen_values = true)]
    pub min_forecast_hour: Option<i32>,

    /// Override the highest forecast hour kept in charts
    #[arg(long, allow_hyphen_values = true)]
    pub max_forecast_hour: Option<i32>,
}

/// Everything a command needs once startup has succeeded.
pub struct Startup {
    pub config: ExplorerConfig,
    pub registry: CaseWindowRegistry,
    pub database: Database,
    pub tables: TableStore,
}

enum Store {
    Local(LocalObjectStore),
    Http(HttpObjectStore),
}

impl ObjectStore for Store {
    async fn fetch_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, FetchError> {
        match self {
            Store::Local(s) => s.fetch_object(bucket, key).await,
            Store::Http(s) => s.fetch_object(bucket, key).await,
        }
    }
}

impl SourceArgs {
    /// Load the config file and apply command-line overrides.
    pub fn resolve_config(&self) -> anyhow::Result<ExplorerConfig> {
        let mut config = ExplorerConfig::load(self.config.as_deref())?;
        if let Some(bucket) = &self.bucket {
            config.source.bucket = bucket.clone();
        }
        if let Some(v) = self.crossing_threshold {
            config.thresholds.crossing = v;
        }
        if let Some(v) = self.bucket_threshold {
            config.thresholds.bucket = v;
        }
        if let Some(v) = self.min_forecast_hour {
            config.thresholds.forecast_hour_min = v;
        }
        if let Some(v) = self.max_forecast_hour {
            config.thresholds.forecast_hour_max = v;
        }
        config.validate()?;
        Ok(config)
    }

    fn store(&self) -> Store {
        match &self.base_url {
            Some(url) => Store::Http(HttpObjectStore::new(url.as_str())),
            None => Store::Local(LocalObjectStore::new(
                self.data_dir.clone().unwrap_or_else(|| PathBuf::from("data")),
            )),
        }
    }
}

/// Read the case window registry from `path`, or use the embedded one.
pub fn load_registry(path: Option<&Path>) -> anyhow::Result<CaseWindowRegistry> {
    let registry = match path {
        Some(p) => {
            let csv = std::fs::read_to_string(p)
                .with_context(|| format!("failed to read case windows from {}", p.display()))?;
            CaseWindowRegistry::parse_csv(&csv)?
        }
        None => CaseWindowRegistry::embedded()?,
    };
    Ok(registry)
}

/// Run the full startup sequence.
pub async fn load(args: &SourceArgs) -> anyhow::Result<Startup> {
    let config = args.resolve_config()?;
    let registry = load_registry(args.cases.as_deref())?;
    let store = args.store();
    let source = &config.source;

    info!(
        "Fetching {} and {} from bucket {}",
        source.locations_key, source.observations_key, source.bucket
    );
    let locations_csv = store
        .fetch_table(&source.bucket, &source.locations_key)
        .await
        .context("data unavailable: station locations")?;
    let observations_csv = store
        .fetch_table(&source.bucket, &source.observations_key)
        .await
        .context("data unavailable: observations")?;

    let database = Database::new()?;
    database
        .load_stations(&locations_csv, &config.columns)
        .context("failed to load station locations")?;
    database
        .load_observations(&observations_csv, &config.columns)
        .context("failed to load observations")?;
    let tables = database.table_store()?;

    Ok(Startup {
        config,
        registry,
        database,
        tables,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const LOCATIONS: &str = "\
HEAD:ID,NAME,LATD,LOND
47401,Wakkanai,45.41,141.68
47407,Asahikawa,43.76,142.37
";

    pub(crate) const OBSERVATIONS: &str = "\
ID,VALIDTIME,ft,ObsGustSpd1h,wt_operation,arc_gust_pred
47401,2025-01-30 01:00,1,26.1,24.0,27.3
47401,2025-01-30 00:00,2,22.0,23.5,25.0
47407,2025-01-30 00:00,1,10.0,11.0,9.5
";

    /// A local store holding both default objects under the default bucket.
    pub(crate) fn local_source() -> (tempfile::TempDir, SourceArgs) {
        let dir = tempfile::tempdir().unwrap();
        let defaults = ExplorerConfig::default().source;
        let bucket = dir.path().join(&defaults.bucket);
        std::fs::create_dir_all(&bucket).unwrap();
        std::fs::write(bucket.join(&defaults.locations_key), LOCATIONS).unwrap();
        std::fs::write(bucket.join(&defaults.observations_key), OBSERVATIONS).unwrap();
        let args = SourceArgs {
            data_dir: Some(dir.path().to_path_buf()),
            ..SourceArgs::default()
        };
        (dir, args)
    }

    #[tokio::test]
    async fn load_reads_both_tables() {
        let (_dir, args) = local_source();
        let startup = load(&args).await.unwrap();
        assert_eq!(startup.tables.stations().len(), 2);
        assert_eq!(startup.tables.observations().len(), 3);
        assert_eq!(startup.registry.len(), 5);
        assert_eq!(startup.database.query_observation_count().unwrap(), 3);
    }

    #[tokio::test]
    async fn missing_table_is_fatal() {
        let (_dir, mut args) = local_source();
        args.bucket = Some("other-bucket".to_string());
        let err = load(&args).await.err().unwrap();
        assert!(err.to_string().contains("data unavailable"));
        let fetch = err.downcast_ref::<FetchError>().unwrap();
        assert!(matches!(fetch, FetchError::NotFound { .. }));
    }

    #[test]
    fn overrides_apply_and_validate() {
        let args = SourceArgs {
            crossing_threshold: Some(20.0),
            max_forecast_hour: Some(11),
            ..SourceArgs::default()
        };
        let config = args.resolve_config().unwrap();
        assert_eq!(config.thresholds.crossing, 20.0);
        assert_eq!(config.thresholds.forecast_hour_max, 11);

        let bad = SourceArgs {
            bucket_threshold: Some(2.0),
            ..SourceArgs::default()
        };
        assert!(bad.resolve_config().is_err());
    }

    #[test]
    fn registry_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.csv");
        std::fs::write(&path, "label,start,end\nStorm,2025-02-13,2025-02-15\n").unwrap();
        let registry = load_registry(Some(&path)).unwrap();
        assert_eq!(registry.labels(), vec!["Storm"]);
    }
}
