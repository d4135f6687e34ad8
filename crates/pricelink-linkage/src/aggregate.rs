//! The aggregation engine: folds per-source listing batches into one
//! deduplicated, price-compared catalog.
//!
//! Sources are folded one at a time in caller-supplied priority order, so
//! later sources match against groups seeded by earlier ones. A run owns all
//! of its group state; nothing survives past [`aggregate`] except the
//! allocator's counter.

use std::collections::HashMap;

use pricelink_core::{code_for_key, synthetic_key, MatchMode, PriceSummary, ProductItem, RawListing};

use crate::allocator::SyntheticIdAllocator;
use crate::similarity::is_similar;
use crate::translate::{translate_name, Translator};

/// One source's complete listing batch.
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
    /// Source identifier; becomes the key in every catalog map.
    pub source: String,
    pub listings: Vec<RawListing>,
    /// Listing names are in a foreign language and are translated before
    /// name comparison.
    pub translate_names: bool,
}

impl SourceBatch {
    #[must_use]
    pub fn new(source: impl Into<String>, listings: Vec<RawListing>) -> Self {
        Self {
            source: source.into(),
            listings,
            translate_names: false,
        }
    }

    /// Marks this batch's names for translation in NAME mode.
    #[must_use]
    pub fn translated(mut self) -> Self {
        self.translate_names = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateOptions {
    pub match_mode: MatchMode,
    /// Minimum similarity ratio for a NAME-mode match.
    pub similarity_threshold: f64,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::Code,
            similarity_threshold: 0.45,
        }
    }
}

/// Counters describing one aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub listings_seen: usize,
    pub listings_merged: usize,
    pub listings_skipped: usize,
    pub groups_created: usize,
    pub synthetic_groups: usize,
}

/// Per-source aggregation state inside one group.
///
/// `name`, `representative_price`, `url`, and `image_url` always come from
/// the same listing: the cheapest one seen so far, first arrival on ties.
#[derive(Debug, Default)]
struct SourceSlot {
    name: Option<String>,
    /// Every coerced price observed, `None` for listings without a usable price.
    all_prices: Vec<Option<f64>>,
    representative_price: Option<f64>,
    url: Option<String>,
    image_url: Option<String>,
}

impl SourceSlot {
    /// Records `listing`'s price and promotes it to representative when it is
    /// strictly cheaper than the current one. Returns `true` on promotion.
    fn absorb(&mut self, listing: &RawListing) -> bool {
        let price = listing.price_value();
        self.all_prices.push(price);

        let Some(price) = price else {
            return false;
        };
        if self.representative_price.is_some_and(|current| price >= current) {
            return false;
        }

        self.name.clone_from(&listing.name);
        self.representative_price = Some(price);
        self.url.clone_from(&listing.url);
        self.image_url.clone_from(&listing.image_url);
        true
    }

    fn summary(&self) -> PriceSummary {
        let valid = self.all_prices.iter().flatten().copied();
        PriceSummary {
            min: valid.clone().reduce(f64::min),
            max: valid.reduce(f64::max),
            target: self.representative_price,
        }
    }
}

#[derive(Debug)]
struct WorkGroup {
    key: String,
    slots: HashMap<String, SourceSlot>,
    /// First non-blank name merged into the group. Only consulted for name
    /// matching, and only while no source has a representative name.
    seed_name: Option<String>,
}

impl WorkGroup {
    fn new(key: String) -> Self {
        Self {
            key,
            slots: HashMap::new(),
            seed_name: None,
        }
    }

    fn merge(&mut self, source: &str, listing: &RawListing) -> bool {
        if self.seed_name.is_none() {
            self.seed_name = listing.name().map(str::to_owned);
        }
        self.slots
            .entry(source.to_owned())
            .or_default()
            .absorb(listing)
    }

    /// First non-blank representative name, in source priority order, else
    /// the seed listing's name.
    fn representative_name(&self, source_order: &[String]) -> Option<&str> {
        source_order
            .iter()
            .filter_map(|source| self.slots.get(source))
            .filter_map(|slot| slot.name.as_deref())
            .find(|name| !name.trim().is_empty())
            .or(self.seed_name.as_deref())
    }

    fn into_item(mut self, source_order: &[String]) -> ProductItem {
        let mut item = ProductItem {
            code: code_for_key(&self.key),
            ..ProductItem::default()
        };

        for source in source_order {
            let slot = self.slots.remove(source).unwrap_or_default();
            item.price.insert(source.clone(), slot.summary());
            item.name.insert(source.clone(), slot.name);
            item.url.insert(source.clone(), slot.url);
            item.image_url.insert(source.clone(), slot.image_url);
        }

        item
    }
}

/// Insertion-ordered group table keyed by product code or synthetic id.
#[derive(Debug, Default)]
struct GroupTable {
    groups: Vec<WorkGroup>,
    index: HashMap<String, usize>,
}

impl GroupTable {
    fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    fn insert(&mut self, key: String) -> usize {
        let position = self.groups.len();
        self.index.insert(key.clone(), position);
        self.groups.push(WorkGroup::new(key));
        position
    }
}

struct Run<'a> {
    options: AggregateOptions,
    allocator: &'a SyntheticIdAllocator,
    translator: &'a dyn Translator,
    source_order: Vec<String>,
    table: GroupTable,
    stats: AggregateStats,
}

impl<'a> Run<'a> {
    fn new(
        options: AggregateOptions,
        allocator: &'a SyntheticIdAllocator,
        translator: &'a dyn Translator,
    ) -> Self {
        Self {
            options,
            allocator,
            translator,
            source_order: Vec::new(),
            table: GroupTable::default(),
            stats: AggregateStats::default(),
        }
    }

    fn fold(&mut self, batch: &SourceBatch) {
        if !self.source_order.contains(&batch.source) {
            self.source_order.push(batch.source.clone());
        }

        tracing::info!(
            source = %batch.source,
            listings = batch.listings.len(),
            mode = %self.options.match_mode,
            "folding source batch"
        );
        self.stats.listings_seen += batch.listings.len();

        match self.options.match_mode {
            MatchMode::Code => {
                for listing in &batch.listings {
                    if listing.code().is_some() {
                        self.merge_by_code(&batch.source, listing);
                    } else {
                        tracing::debug!(
                            source = %batch.source,
                            name = listing.name.as_deref().unwrap_or_default(),
                            "dropping listing without a product code"
                        );
                        self.stats.listings_skipped += 1;
                    }
                }
            }
            MatchMode::Name => {
                // Exact codes are the strongest key, so code-bearing listings
                // seed or join their groups before any fuzzy matching.
                let (coded, uncoded): (Vec<&RawListing>, Vec<&RawListing>) =
                    batch.listings.iter().partition(|l| l.code().is_some());
                for listing in coded {
                    self.merge_by_code(&batch.source, listing);
                }
                for listing in uncoded {
                    self.merge_by_name(batch, listing);
                }
            }
        }
    }

    fn merge_by_code(&mut self, source: &str, listing: &RawListing) {
        let Some(code) = listing.code() else {
            return;
        };
        let position = match self.table.position(code) {
            Some(position) => position,
            None => {
                self.stats.groups_created += 1;
                self.table.insert(code.to_owned())
            }
        };
        self.merge_into(position, source, listing);
    }

    fn merge_by_name(&mut self, batch: &SourceBatch, listing: &RawListing) {
        let Some(name) = listing.name() else {
            tracing::warn!(
                source = %batch.source,
                url = listing.url.as_deref().unwrap_or_default(),
                "skipping listing without a name"
            );
            self.stats.listings_skipped += 1;
            return;
        };

        let translated = if batch.translate_names {
            translate_name(self.translator, &batch.source, name)
        } else {
            None
        };
        let alternate = translated.as_deref().unwrap_or(name);

        let threshold = self.options.similarity_threshold;
        let matched = self.table.groups.iter().position(|group| {
            group
                .representative_name(&self.source_order)
                .is_some_and(|reference| is_similar(reference, name, alternate, threshold))
        });

        let position = match matched {
            Some(position) => position,
            None => {
                let key = synthetic_key(&self.allocator.next());
                tracing::debug!(source = %batch.source, key = %key, name, "no similar group; creating one");
                self.stats.groups_created += 1;
                self.stats.synthetic_groups += 1;
                self.table.insert(key)
            }
        };
        self.merge_into(position, &batch.source, listing);
    }

    fn merge_into(&mut self, position: usize, source: &str, listing: &RawListing) {
        let group = &mut self.table.groups[position];
        let promoted = group.merge(source, listing);
        tracing::debug!(
            source,
            key = %group.key,
            price = ?listing.price_value(),
            promoted,
            "merged listing"
        );
        self.stats.listings_merged += 1;
    }

    fn finish(self) -> (Vec<ProductItem>, AggregateStats) {
        let Run {
            table,
            source_order,
            stats,
            ..
        } = self;
        let items: Vec<ProductItem> = table
            .groups
            .into_iter()
            .map(|group| group.into_item(&source_order))
            .collect();

        tracing::info!(
            groups = items.len(),
            merged = stats.listings_merged,
            skipped = stats.listings_skipped,
            synthetic = stats.synthetic_groups,
            "aggregation complete"
        );
        (items, stats)
    }
}

/// Aggregates `batches` (in priority order) into one catalog entry per
/// identified product.
///
/// Output order follows group creation order. Malformed listings are skipped
/// with a warning and an empty batch simply contributes nothing; this
/// function never fails.
#[must_use]
pub fn aggregate(
    batches: &[SourceBatch],
    options: AggregateOptions,
    allocator: &SyntheticIdAllocator,
    translator: &dyn Translator,
) -> Vec<ProductItem> {
    aggregate_with_stats(batches, options, allocator, translator).0
}

/// Like [`aggregate`], also returning run counters.
#[must_use]
pub fn aggregate_with_stats(
    batches: &[SourceBatch],
    options: AggregateOptions,
    allocator: &SyntheticIdAllocator,
    translator: &dyn Translator,
) -> (Vec<ProductItem>, AggregateStats) {
    let mut run = Run::new(options, allocator, translator);
    for batch in batches {
        run.fold(batch);
    }
    run.finish()
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
