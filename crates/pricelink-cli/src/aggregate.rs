//! The `aggregate` command: load every enabled source's batch, run one
//! aggregation, and write the catalog.
//!
//! A source whose batch file is missing or unreadable contributes an empty
//! batch with a warning so the remaining sources still produce a catalog.

use std::path::Path;

use anyhow::Context;
use pricelink_core::{AppConfig, ProductItem, RawListing, SourceConfig};
use pricelink_linkage::{
    aggregate_with_stats, normalize_record, AggregateOptions, ExtractOptions, Glossary,
    Passthrough, SourceBatch, SourceRecord, SyntheticIdAllocator, Translator,
};

pub(crate) async fn run_aggregate(config: &AppConfig, to_stdout: bool) -> anyhow::Result<()> {
    let roster = pricelink_core::load_sources(&config.sources_path).with_context(|| {
        format!(
            "failed to load source roster from {}",
            config.sources_path.display()
        )
    })?;
    let enabled: Vec<&SourceConfig> = roster.enabled().collect();

    let extract = ExtractOptions {
        verify_short_codes: config.verify_short_codes,
    };
    let batches = load_batches(&enabled, extract).await;
    let translator = build_translator(config)?;

    let options = AggregateOptions {
        match_mode: config.match_mode,
        similarity_threshold: config.similarity_threshold,
    };
    let allocator = SyntheticIdAllocator::new();
    let (items, stats) = aggregate_with_stats(&batches, options, &allocator, translator.as_ref());

    tracing::info!(
        env = %config.env,
        sources = batches.len(),
        mode = %config.match_mode,
        seen = stats.listings_seen,
        skipped = stats.listings_skipped,
        groups = stats.groups_created,
        "aggregate run finished"
    );

    if to_stdout {
        println!("{}", render_catalog(&items)?);
    } else {
        write_catalog(&items, &config.output_path).await?;
        println!(
            "wrote {} products to {}",
            items.len(),
            config.output_path.display()
        );
    }
    Ok(())
}

/// Loads every source's batch concurrently, preserving roster order.
pub(crate) async fn load_batches(
    sources: &[&SourceConfig],
    options: ExtractOptions,
) -> Vec<SourceBatch> {
    let loads = sources.iter().map(|source| load_batch(source, options));
    futures::future::join_all(loads).await
}

/// Reads one source's batch file. Never fails: an unusable file yields an
/// empty batch.
pub(crate) async fn load_batch(source: &SourceConfig, options: ExtractOptions) -> SourceBatch {
    let listings = match tokio::fs::read_to_string(&source.input).await {
        Ok(content) => parse_listings(&source.name, &content, options),
        Err(e) => {
            tracing::warn!(
                source = %source.name,
                path = %source.input.display(),
                error = %e,
                "cannot read listing batch; continuing with an empty batch"
            );
            Vec::new()
        }
    };

    tracing::info!(source = %source.name, listings = listings.len(), "loaded listing batch");
    SourceBatch {
        source: source.name.clone(),
        listings,
        translate_names: source.translate_names,
    }
}

/// Parses a JSON array of marketplace records into normalized listings.
///
/// Elements that do not deserialize, or that normalize to nothing, are
/// skipped with a warning.
pub(crate) fn parse_listings(source: &str, content: &str, options: ExtractOptions) -> Vec<RawListing> {
    let elements: Vec<serde_json::Value> = match serde_json::from_str(content) {
        Ok(elements) => elements,
        Err(e) => {
            tracing::warn!(
                source,
                error = %e,
                "listing batch is not a JSON array; continuing with an empty batch"
            );
            return Vec::new();
        }
    };

    elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| {
            match serde_json::from_value::<SourceRecord>(element) {
                Ok(record) => normalize_record(record, None, options),
                Err(e) => {
                    tracing::warn!(source, index, error = %e, "skipping malformed listing");
                    None
                }
            }
        })
        .collect()
}

pub(crate) fn build_translator(config: &AppConfig) -> anyhow::Result<Box<dyn Translator>> {
    match &config.glossary_path {
        Some(path) => {
            let glossary = Glossary::load(path)
                .with_context(|| format!("failed to load glossary from {}", path.display()))?;
            tracing::info!(entries = glossary.len(), path = %path.display(), "loaded glossary");
            Ok(Box::new(glossary))
        }
        None => Ok(Box::new(Passthrough)),
    }
}

pub(crate) fn render_catalog(items: &[ProductItem]) -> anyhow::Result<String> {
    serde_json::to_string_pretty(items).context("failed to serialize catalog")
}

pub(crate) async fn write_catalog(items: &[ProductItem], path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = render_catalog(items)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("failed to write catalog to {}", path.display()))
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
