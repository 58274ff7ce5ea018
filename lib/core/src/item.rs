use serde::{Deserialize, Serialize};

/// One catalog entry
///
/// Field names serialize in the catalog's camelCase column naming; the group
/// label serializes as `cluster`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: u64,
    #[serde(rename = "productDisplayName")]
    pub display_name: String,
    #[serde(rename = "masterCategory")]
    pub master_category: String,
    #[serde(rename = "articleType")]
    pub article_type: String,
    #[serde(rename = "baseColour")]
    pub base_colour: String,
    pub gender: String,
    pub season: String,
    pub year: i32,
    pub usage: String,
    /// Similarity group, set once by [`crate::CatalogStore::with_group_labels`]
    #[serde(rename = "cluster")]
    pub group: Option<usize>,
}

impl Item {
    /// Unlabeled item with every attribute populated
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        display_name: impl Into<String>,
        master_category: impl Into<String>,
        article_type: impl Into<String>,
        base_colour: impl Into<String>,
        gender: impl Into<String>,
        season: impl Into<String>,
        year: i32,
        usage: impl Into<String>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            master_category: master_category.into(),
            article_type: article_type.into(),
            base_colour: base_colour.into(),
            gender: gender.into(),
            season: season.into(),
            year,
            usage: usage.into(),
            group: None,
        }
    }

    #[inline]
    pub fn categorical(&self, feature: CategoricalFeature) -> &str {
        match feature {
            CategoricalFeature::MasterCategory => &self.master_category,
            CategoricalFeature::ArticleType => &self.article_type,
            CategoricalFeature::BaseColour => &self.base_colour,
            CategoricalFeature::Gender => &self.gender,
            CategoricalFeature::Season => &self.season,
        }
    }
}

/// Categorical attributes that feed the similarity signal, in encoding order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalFeature {
    MasterCategory,
    ArticleType,
    BaseColour,
    Gender,
    Season,
}

impl CategoricalFeature {
    pub const ALL: [CategoricalFeature; 5] = [
        CategoricalFeature::MasterCategory,
        CategoricalFeature::ArticleType,
        CategoricalFeature::BaseColour,
        CategoricalFeature::Gender,
        CategoricalFeature::Season,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            CategoricalFeature::MasterCategory => "masterCategory",
            CategoricalFeature::ArticleType => "articleType",
            CategoricalFeature::BaseColour => "baseColour",
            CategoricalFeature::Gender => "gender",
            CategoricalFeature::Season => "season",
        }
    }
}

/// Item plus its derived image reference, as handed to the HTTP layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemRecord {
    #[serde(flatten)]
    pub item: Item,
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_catalog_columns() {
        let mut item = Item::new(15970, "Navy Blue Shirt", "Apparel", "Shirts", "Navy Blue", "Men", "Fall", 2011, "Casual");
        item.group = Some(3);
        let record = ItemRecord {
            item,
            image: "http://127.0.0.1:5000/image/15970".to_string(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 15970);
        assert_eq!(json["productDisplayName"], "Navy Blue Shirt");
        assert_eq!(json["baseColour"], "Navy Blue");
        assert_eq!(json["cluster"], 3);
        assert_eq!(json["image"], "http://127.0.0.1:5000/image/15970");
    }

    #[test]
    fn test_categorical_accessor() {
        let item = Item::new(1, "x", "Footwear", "Sandals", "Black", "Women", "Summer", 2012, "Casual");
        assert_eq!(item.categorical(CategoricalFeature::ArticleType), "Sandals");
        assert_eq!(item.categorical(CategoricalFeature::Season), "Summer");
    }
}
