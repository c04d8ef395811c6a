//! Offer query planning: filter construction, sorting, and pagination.

use bson::{doc, Document};

// ============================================================================
// Filter
// ============================================================================

/// Filter parameters for offer listing queries.
///
/// Absent fields impose no constraint on their axis. Price bounds arrive
/// already coerced to numbers; malformed input is rejected at the API
/// boundary before a filter is ever built.
#[derive(Debug, Clone, Default)]
pub struct OfferFilter {
    /// Case-insensitive, unanchored substring match on the product name.
    pub title: Option<String>,
    /// Inclusive lower price bound.
    pub price_min: Option<f64>,
    /// Inclusive upper price bound.
    pub price_max: Option<f64>,
}

impl OfferFilter {
    /// Build the MongoDB filter document.
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();

        if let Some(title) = &self.title {
            // User input is escaped so it matches literally.
            filter.insert(
                "product_name",
                doc! { "$regex": regex::escape(title), "$options": "i" },
            );
        }

        let mut price = Document::new();
        if let Some(min) = self.price_min {
            price.insert("$gte", min);
        }
        if let Some(max) = self.price_max {
            price.insert("$lte", max);
        }
        if !price.is_empty() {
            filter.insert("product_price", price);
        }

        filter
    }
}

// ============================================================================
// Sort
// ============================================================================

/// Requested ordering for offer listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Insertion order, the store's default.
    #[default]
    Natural,
    PriceAscending,
    PriceDescending,
}

impl SortOrder {
    /// Parse from the `sort` query parameter; unrecognized values fall back
    /// to natural order.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("price-asc") => Self::PriceAscending,
            Some("price-desc") => Self::PriceDescending,
            _ => Self::Natural,
        }
    }

    /// Build the sort document, or `None` for natural order.
    pub fn to_document(&self) -> Option<Document> {
        match self {
            Self::Natural => None,
            Self::PriceAscending => Some(doc! { "product_price": 1 }),
            Self::PriceDescending => Some(doc! { "product_price": -1 }),
        }
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Default page size when the caller does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 3;
/// Cap on caller-requested page sizes.
pub const MAX_PAGE_SIZE: i64 = 100;

/// An offset/limit pair computed from 1-based page parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    pub skip: u64,
    pub limit: i64,
}

impl PagePlan {
    /// Plan a page from the raw `page` and `limit` parameters.
    ///
    /// Page numbering is 1-based; values below 1 are clamped up, and `limit`
    /// is clamped to [`MAX_PAGE_SIZE`].
    pub fn new(page: Option<u64>, limit: Option<i64>) -> Self {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let page = page.unwrap_or(1).max(1);
        Self {
            // Pages are uncapped above, so the offset must saturate rather
            // than overflow.
            skip: page.saturating_sub(1).saturating_mul(limit as u64),
            limit,
        }
    }
}

impl Default for PagePlan {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_builds_empty_document() {
        assert_eq!(OfferFilter::default().to_document(), Document::new());
    }

    #[test]
    fn title_filter_is_case_insensitive_substring() {
        let filter = OfferFilter {
            title: Some("chaise".to_string()),
            ..Default::default()
        };
        let doc = filter.to_document();
        let name = doc.get_document("product_name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), "chaise");
        assert_eq!(name.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn title_filter_escapes_regex_metacharacters() {
        let filter = OfferFilter {
            title: Some("t-shirt (M)".to_string()),
            ..Default::default()
        };
        let doc = filter.to_document();
        let pattern = doc
            .get_document("product_name")
            .unwrap()
            .get_str("$regex")
            .unwrap();
        assert_eq!(pattern, r"t\-shirt \(M\)");
    }

    #[test]
    fn price_bounds_merge_into_one_range() {
        let filter = OfferFilter {
            price_min: Some(10.0),
            price_max: Some(50.0),
            ..Default::default()
        };
        let doc = filter.to_document();
        let price = doc.get_document("product_price").unwrap();
        assert_eq!(price.get_f64("$gte").unwrap(), 10.0);
        assert_eq!(price.get_f64("$lte").unwrap(), 50.0);
    }

    #[test]
    fn single_price_bound_builds_half_open_range() {
        let filter = OfferFilter {
            price_max: Some(50.0),
            ..Default::default()
        };
        let doc = filter.to_document();
        let price = doc.get_document("product_price").unwrap();
        assert!(price.get("$gte").is_none());
        assert_eq!(price.get_f64("$lte").unwrap(), 50.0);
    }

    #[test]
    fn sort_param_parsing() {
        assert_eq!(
            SortOrder::from_param(Some("price-desc")),
            SortOrder::PriceDescending
        );
        assert_eq!(
            SortOrder::from_param(Some("price-asc")),
            SortOrder::PriceAscending
        );
        assert_eq!(SortOrder::from_param(Some("banana")), SortOrder::Natural);
        assert_eq!(SortOrder::from_param(None), SortOrder::Natural);
    }

    #[test]
    fn sort_documents() {
        assert_eq!(SortOrder::Natural.to_document(), None);
        assert_eq!(
            SortOrder::PriceDescending.to_document(),
            Some(doc! { "product_price": -1 })
        );
        assert_eq!(
            SortOrder::PriceAscending.to_document(),
            Some(doc! { "product_price": 1 })
        );
    }

    #[test]
    fn page_plan_defaults() {
        let plan = PagePlan::default();
        assert_eq!(plan.skip, 0);
        assert_eq!(plan.limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn page_plan_skip_arithmetic() {
        assert_eq!(PagePlan::new(Some(1), Some(3)).skip, 0);
        assert_eq!(PagePlan::new(Some(2), Some(3)).skip, 3);
        assert_eq!(PagePlan::new(Some(4), Some(3)).skip, 9);
        assert_eq!(PagePlan::new(Some(5), Some(10)).skip, 40);
    }

    #[test]
    fn page_plan_clamps_out_of_range_values() {
        let plan = PagePlan::new(Some(0), Some(0));
        assert_eq!(plan.skip, 0);
        assert_eq!(plan.limit, 1);

        let plan = PagePlan::new(Some(2), Some(10_000));
        assert_eq!(plan.limit, MAX_PAGE_SIZE);
        assert_eq!(plan.skip, MAX_PAGE_SIZE as u64);
    }

    #[test]
    fn page_plan_saturates_on_huge_page_numbers() {
        let plan = PagePlan::new(Some(u64::MAX), Some(100));
        assert_eq!(plan.skip, u64::MAX);
        assert_eq!(plan.limit, 100);

        let plan = PagePlan::new(Some(u64::MAX), Some(1));
        assert_eq!(plan.skip, u64::MAX - 1);
    }
}
