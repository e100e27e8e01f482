//! Minimal embedding example for dynprop-core
//!
//! The application owns the registry: it creates it once at start-up, hands it to its
//! components and feeds it batches from its own configuration source (simulated here by
//! a background thread).
//!
//! ## Environment
//!
//! - `DYNPROP_LOG_LEVEL`: trace, debug, info, warn or error (default: info)
//! - `DYNPROP_CONFIG`: JSON file with property declarations (optional)

use anyhow::{Context, Result};
use dynprop_core::{Property, PropertyRegistry, Registry, RegistryConfig};
use dynprop_geo::CountryCodeMapper;
use std::env;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_CONFIG: &str = r#"{
    "properties": [
        { "name": "http.timeout_ms", "type": "integer", "default": 3000 },
        { "name": "http.retry_ratio", "type": "double", "default": 0.1 },
        { "name": "geo.default_country", "type": "text", "default": "UA" }
    ]
}"#;

const ALPHA_TABLE: &str = "UA, UKR\nPL, POL\nDE, DEU";
const MCC_TABLE: &str = "255, UA\n260, PL\n262, DE";

/// A component that reads its settings through live handles
struct HttpClient {
    timeout_ms: Property<i64>,
    retry_ratio: Property<f64>,
    compression: Property<bool>,
}

impl HttpClient {
    fn new(registry: &dyn PropertyRegistry) -> dynprop_core::Result<Self> {
        Ok(Self {
            timeout_ms: registry.get_int_property("http.timeout_ms", 5000)?,
            retry_ratio: registry.get_double_property("http.retry_ratio", 0.0)?,
            compression: registry.get_bool_property("http.compression", false)?,
        })
    }

    fn describe(&self) -> String {
        format!(
            "timeout={}ms retry_ratio={} compression={}",
            self.timeout_ms.value(),
            self.retry_ratio.value(),
            self.compression.value()
        )
    }
}

fn main() -> Result<()> {
    let level = match env::var("DYNPROP_LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let config = match env::var("DYNPROP_CONFIG") {
        Ok(path) => RegistryConfig::from_file(&path)
            .with_context(|| format!("failed to load {}", path))?,
        Err(_) => RegistryConfig::from_json_str(DEFAULT_CONFIG)?,
    };

    let registry = Arc::new(Registry::from_config(&config)?);
    let mapper = CountryCodeMapper::new(ALPHA_TABLE, MCC_TABLE)?;

    let client = HttpClient::new(registry.as_ref())?;
    let country = registry.get_text_property("geo.default_country", String::new())?;
    info!("client settings: {}", client.describe());

    // Stand-in for a remote configuration poller
    let source = Arc::clone(&registry);
    let poller = thread::spawn(move || -> dynprop_core::Result<()> {
        let pushes = [
            r#"{"http.timeout_ms": 1500, "http.compression": true}"#,
            r#"{"http.retry_ratio": "high", "geo.default_country": "PL"}"#,
        ];
        for payload in pushes {
            thread::sleep(Duration::from_millis(50));
            let report = source.apply_json(payload)?;
            if !report.is_clean() {
                warn!(rejected = ?report.rejected_names(), "configuration push partially applied");
            }
        }
        Ok(())
    });

    poller
        .join()
        .map_err(|_| anyhow::anyhow!("configuration poller panicked"))??;

    info!("client settings: {}", client.describe());
    let code = country.value();
    info!(
        "default country: {} ({})",
        code,
        mapper.to_alpha3(&code).unwrap_or("unknown")
    );
    info!(
        "mcc 262 maps to {}",
        mapper.mcc_to_alpha2("262").unwrap_or("unknown")
    );

    Ok(())
}
