//! Conversion from marketplace-shaped search hits to [`RawListing`].
//!
//! Marketplace clients hand over whatever text the search API returned; this
//! module settles the product code (search key, explicit field, or scraped
//! from text) so the engine only ever sees the normalized listing shape.

use pricelink_core::{RawListing, RawPrice};
use serde::Deserialize;

use crate::extract::{find_code, ExtractOptions};

/// A search hit as returned by a marketplace client, before code recovery.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceRecord {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Free-text caption or description.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Normalizes a [`SourceRecord`] into a [`RawListing`].
///
/// The code is resolved in order: `search_code` (the hit came from a
/// by-code search), the record's own non-blank `code`, then
/// [`find_code`] over name, description, page URL, and image URL.
///
/// Returns `None` for records with neither a name nor a URL; there is
/// nothing to show for them in the catalog.
#[must_use]
pub fn normalize_record(
    record: SourceRecord,
    search_code: Option<&str>,
    options: ExtractOptions,
) -> Option<RawListing> {
    let name = non_blank(record.name);
    let url = non_blank(record.url);
    let image_url = non_blank(record.image_url);

    if name.is_none() && url.is_none() {
        tracing::warn!("skipping record with neither name nor url");
        return None;
    }

    let code = search_code
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
        .or_else(|| non_blank(record.code))
        .or_else(|| {
            let fields = [
                name.as_deref().unwrap_or_default(),
                record.description.as_deref().unwrap_or_default(),
                url.as_deref().unwrap_or_default(),
                image_url.as_deref().unwrap_or_default(),
            ];
            find_code(&fields, options)
        });

    Some(RawListing {
        code,
        name,
        price: record.price,
        url,
        image_url,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
