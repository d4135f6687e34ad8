//! Record linkage for marketplace listings.
//!
//! Takes per-source listing batches, decides which listings describe the same
//! physical product (exact JAN/EAN code first, fuzzy product name as the
//! fallback), and folds them into one price-compared catalog entry per
//! product.

pub mod aggregate;
pub mod allocator;
pub mod error;
pub mod extract;
pub mod jan;
pub mod normalize;
pub mod similarity;
pub mod translate;

pub use aggregate::{aggregate, aggregate_with_stats, AggregateOptions, AggregateStats, SourceBatch};
pub use allocator::SyntheticIdAllocator;
pub use error::{LinkageError, TranslateError};
pub use extract::{find_code, ExtractOptions};
pub use jan::{check_digit, is_valid_jan};
pub use normalize::{normalize_record, SourceRecord};
pub use similarity::{is_similar, normalize_name, ratio};
pub use translate::{Glossary, Passthrough, Translator};
