//! zbib: Research-gap and applicant-fitness engine
//! Entry point for the batch driver binary.

mod config;
mod pipeline;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use zbib_classify::{DimensionRegistry, PatternClassifier};

use config::{LogFormat, LoggingConfig};

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let subscriber = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json   => subscriber.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => subscriber.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn main() -> anyhow::Result<()> {
    let loaded = config::Config::load();
    init_tracing(loaded.as_ref().map(|c| &c.logging).unwrap_or(&LoggingConfig::default()));

    info!("zbib starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(c) => c,
        Err(e) => {
            warn!("Could not load zbib.toml: {e:#}");
            warn!("Set ZBIB_CONFIG or copy zbib.example.toml to zbib.toml and edit it.");
            return Ok(());
        }
    };

    let topic = config::TopicConfig::from_file(&config.topic)?;
    info!("Topic '{}' loaded from {}", topic.name, config.topic.display());

    let registry = Arc::new(DimensionRegistry::from_definitions(&topic.dimensions)?);
    info!("Dimension registry ready: {} dimensions", registry.len());
    let classifier = PatternClassifier::new(registry);

    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create output directory {}", config.output_dir.display()))?;
    let out = config.output_dir.as_path();

    // Population level
    if config.records.is_empty() {
        info!("No population records configured; skipping gap analysis");
    } else {
        let mut records = Vec::new();
        for path in &config.records {
            records.extend(pipeline::load_records(path)?);
        }
        let analysis = pipeline::analyze_population(&topic, &classifier, &records)?;
        pipeline::write_json(out, "classification.json", &analysis.classification)?;
        if let Some(gaps) = &analysis.gaps {
            pipeline::write_json(out, "gaps.json", gaps)?;
        }
        if let Some(ct) = &analysis.cross_tab {
            pipeline::write_json(out, "cross_tab.json", ct)?;
        }
        pipeline::write_json(out, "trends.json", &analysis.trends)?;
    }

    // Individual level
    match (&config.applicant_records, &topic.applicant) {
        (Some(path), Some(identity)) => {
            let benchmark = Arc::new(pipeline::load_benchmark(&topic)?);
            let records = pipeline::load_records(path)?;
            let profile =
                pipeline::analyze_applicant(&topic, identity.clone(), &classifier, benchmark, &records)?;
            pipeline::write_json(out, "profile.json", &profile)?;
        }
        (Some(_), None) => warn!("applicant_records is set but the topic has no applicant identity"),
        (None, _) => info!("No applicant records configured; skipping applicant profile"),
    }

    info!("zbib finished. Results in {}", out.display());
    Ok(())
}
