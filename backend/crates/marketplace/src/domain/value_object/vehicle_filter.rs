//! Vehicle search criteria.

/// All set criteria must match. `brand` and `model` are case-insensitive
/// substring matches, `year` and `sold` exact.
///
/// Case folding is only guaranteed to agree across stores for ASCII text:
/// `matches` uses Unicode `to_lowercase`, while PostgreSQL's `ILIKE` folds
/// according to the database collation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleFilter {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub sold: Option<bool>,
}

impl VehicleFilter {
    /// Blank text criteria are treated as absent.
    pub fn new(
        brand: Option<String>,
        model: Option<String>,
        year: Option<i32>,
        sold: Option<bool>,
    ) -> Self {
        Self {
            brand: non_blank(brand),
            model: non_blank(model),
            year,
            sold,
        }
    }

    pub fn matches(&self, brand: &str, model: &str, year: i32, sold: bool) -> bool {
        contains_ignore_case(brand, self.brand.as_deref())
            && contains_ignore_case(model, self.model.as_deref())
            && self.year.is_none_or(|y| y == year)
            && self.sold.is_none_or(|s| s == sold)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}
