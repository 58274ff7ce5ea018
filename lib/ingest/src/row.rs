use serde::Deserialize;
use wardrobe_core::Item;

/// Columns that must be present in the CSV header
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "id",
    "productDisplayName",
    "masterCategory",
    "articleType",
    "baseColour",
    "gender",
    "season",
    "year",
    "usage",
];

/// One CSV record before validation
///
/// Empty cells read as `None`; blank cells and [`NA_TOKENS`] are treated the
/// same way when the row is validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    pub id: Option<String>,
    #[serde(rename = "productDisplayName")]
    pub display_name: Option<String>,
    #[serde(rename = "masterCategory")]
    pub master_category: Option<String>,
    #[serde(rename = "articleType")]
    pub article_type: Option<String>,
    #[serde(rename = "baseColour")]
    pub base_colour: Option<String>,
    pub gender: Option<String>,
    pub season: Option<String>,
    pub year: Option<String>,
    pub usage: Option<String>,
}

impl RawRow {
    /// Validate into an [`Item`]; `None` if any required field is missing or bad
    pub fn into_item(self) -> Option<Item> {
        let id = present(self.id)?.trim().parse::<u64>().ok()?;
        let year = parse_year(&present(self.year)?)?;

        Some(Item::new(
            id,
            present(self.display_name)?,
            present(self.master_category)?,
            present(self.article_type)?,
            present(self.base_colour)?,
            present(self.gender)?,
            present(self.season)?,
            year,
            present(self.usage)?,
        ))
    }
}

/// Cell values read as missing, alongside empty and whitespace-only cells
pub const NA_TOKENS: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "none",
];

#[inline]
fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| {
        let value = value.trim();
        !value.is_empty() && !NA_TOKENS.contains(&value)
    })
}

/// Accepts `2011` as well as `2011.0`
fn parse_year(raw: &str) -> Option<i32> {
    let value = raw.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return None;
    }
    Some(value.trunc() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> RawRow {
        RawRow {
            id: Some("15970".to_string()),
            display_name: Some("Turtle Check Men Navy Blue Shirt".to_string()),
            master_category: Some("Apparel".to_string()),
            article_type: Some("Shirts".to_string()),
            base_colour: Some("Navy Blue".to_string()),
            gender: Some("Men".to_string()),
            season: Some("Fall".to_string()),
            year: Some("2011".to_string()),
            usage: Some("Casual".to_string()),
        }
    }

    #[test]
    fn test_complete_row() {
        let item = complete().into_item().unwrap();
        assert_eq!(item.id, 15970);
        assert_eq!(item.base_colour, "Navy Blue");
        assert_eq!(item.year, 2011);
        assert_eq!(item.group, None);
    }

    #[test]
    fn test_fractional_year() {
        let row = RawRow {
            year: Some("2012.0".to_string()),
            ..complete()
        };
        assert_eq!(row.into_item().unwrap().year, 2012);
    }

    #[test]
    fn test_missing_fields_drop_row() {
        assert!(RawRow { season: None, ..complete() }.into_item().is_none());
        assert!(RawRow { usage: Some(String::new()), ..complete() }.into_item().is_none());
        assert!(RawRow { display_name: None, ..complete() }.into_item().is_none());
    }

    #[test]
    fn test_na_tokens_and_blanks_drop_row() {
        for token in ["NA", "N/A", "null", "NaN", "  ", "\t"] {
            let row = RawRow {
                base_colour: Some(token.to_string()),
                ..complete()
            };
            assert!(row.into_item().is_none(), "{:?}", token);
        }
        assert!(RawRow { id: Some("NULL".to_string()), ..complete() }.into_item().is_none());
    }

    #[test]
    fn test_values_resembling_tokens_are_kept() {
        let row = RawRow {
            display_name: Some("NA Sports Nano Tee".to_string()),
            ..complete()
        };
        assert_eq!(row.into_item().unwrap().display_name, "NA Sports Nano Tee");
    }

    #[test]
    fn test_unparseable_numbers_drop_row() {
        assert!(RawRow { id: Some("abc".to_string()), ..complete() }.into_item().is_none());
        assert!(RawRow { id: Some("-4".to_string()), ..complete() }.into_item().is_none());
        assert!(RawRow { year: Some("NaN".to_string()), ..complete() }.into_item().is_none());
    }
}
