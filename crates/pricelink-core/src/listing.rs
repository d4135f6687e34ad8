use serde::{Deserialize, Serialize};

/// A price as handed over by a marketplace client.
///
/// Upstream APIs disagree on whether prices are JSON numbers or numeric
/// strings, so both shapes are accepted and coerced on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

impl RawPrice {
    /// Coerces the price to a finite `f64`.
    ///
    /// Returns `None` for non-numeric strings and for `NaN`/infinite values,
    /// which would otherwise poison min/max statistics.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            RawPrice::Number(n) => *n,
            RawPrice::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawPrice {
    fn from(value: f64) -> Self {
        RawPrice::Number(value)
    }
}

impl From<&str> for RawPrice {
    fn from(value: &str) -> Self {
        RawPrice::Text(value.to_owned())
    }
}

/// One listing from one marketplace, already reduced to the shape the
/// linkage engine consumes.
///
/// Every field is optional on the wire: a listing missing the fields its
/// match mode needs is skipped by the engine rather than rejected here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    /// Product code (JAN/EAN). Empty strings mean "no code".
    #[serde(default, alias = "jan_code")]
    pub code: Option<String>,
    #[serde(default, alias = "product_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl RawListing {
    /// Returns the product code, treating blank strings as absent.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    /// Returns the listing name, treating blank strings as absent.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }

    /// Returns the coerced price, or `None` when absent or not numeric.
    #[must_use]
    pub fn price_value(&self) -> Option<f64> {
        self.price.as_ref().and_then(RawPrice::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_price_coerces() {
        assert_eq!(RawPrice::Number(12.12).as_f64(), Some(12.12));
    }

    #[test]
    fn numeric_string_price_coerces() {
        assert_eq!(RawPrice::from(" 980 ").as_f64(), Some(980.0));
    }

    #[test]
    fn non_numeric_string_price_is_absent() {
        assert_eq!(RawPrice::from("call for price").as_f64(), None);
        assert_eq!(RawPrice::from("").as_f64(), None);
    }

    #[test]
    fn non_finite_price_is_absent() {
        assert_eq!(RawPrice::Number(f64::NAN).as_f64(), None);
        assert_eq!(RawPrice::from("inf").as_f64(), None);
    }

    #[test]
    fn blank_code_is_treated_as_absent() {
        let listing = RawListing {
            code: Some("   ".to_string()),
            ..RawListing::default()
        };
        assert!(listing.code().is_none());
    }

    #[test]
    fn deserializes_number_and_string_prices() {
        let listings: Vec<RawListing> = serde_json::from_str(
            r#"[
                {"code": "4902370550733", "name": "A", "price": 1000},
                {"code": "", "name": "B", "price": "12.50"},
                {"name": "C", "price": null}
            ]"#,
        )
        .expect("listings should parse");

        assert_eq!(listings[0].price_value(), Some(1000.0));
        assert_eq!(listings[0].code(), Some("4902370550733"));
        assert_eq!(listings[1].price_value(), Some(12.5));
        assert!(listings[1].code().is_none());
        assert!(listings[2].price.is_none());
        assert!(listings[2].url.is_none());
    }

    #[test]
    fn accepts_marketplace_field_aliases() {
        let listing: RawListing = serde_json::from_str(
            r#"{"jan_code": "49012347", "product_name": "Snack", "price": 120}"#,
        )
        .expect("aliased listing should parse");
        assert_eq!(listing.code(), Some("49012347"));
        assert_eq!(listing.name(), Some("Snack"));
    }
}
