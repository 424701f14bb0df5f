// src/config.rs

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;
use url::Url;

/// Default location of the pre-aggregated permit time series. The file is
/// produced out-of-band by the records-request pipeline and refreshed there;
/// this process only ever reads it.
static DEFAULT_PERMIT_TIME_URL: Lazy<Url> = Lazy::new(|| {
    Url::parse(
        "https://kirklanddatastorage.blob.core.windows.net/kirklanddata/permit_timeseries.parquet",
    )
    .expect("default permit time URL should be valid")
});

const PERMIT_TIME_URL_VAR: &str = "PERMIT_TIME_URL";
const SITE_OUT_DIR_VAR: &str = "SITE_OUT_DIR";

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote Parquet file with the PermitRecord schema.
    pub permit_time_url: Url,
    /// Directory the site builder writes page manifests and figures into.
    pub out_dir: PathBuf,
}

impl Config {
    /// Resolve configuration from the environment, falling back to the
    /// compiled-in defaults. Fails if an override is not a valid URL.
    pub fn from_env() -> Result<Self> {
        let permit_time_url = match env::var(PERMIT_TIME_URL_VAR) {
            Ok(raw) => Url::parse(&raw)
                .with_context(|| format!("{PERMIT_TIME_URL_VAR} is not a valid URL: {raw}"))?,
            Err(_) => DEFAULT_PERMIT_TIME_URL.clone(),
        };

        let out_dir = env::var(SITE_OUT_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("site"));

        Ok(Self {
            permit_time_url,
            out_dir,
        })
    }
}
