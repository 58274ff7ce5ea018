//! Feature Encoder
//!
//! Turns an item's categorical and numeric attributes into a fixed-width
//! numeric row: one indicator dimension per observed category value for each
//! [`CategoricalFeature`], followed by the standardized `year`.
//!
//! The encoder is fit once on the full catalog. Later calls to
//! [`FeatureEncoder::encode`] reuse the learned vocabularies and statistics;
//! a category value the encoder never saw contributes an all-zero block.

use crate::{CategoricalFeature, Error, Item, Result, Vector};
use ahash::AHashMap;
use tracing::debug;

/// Sorted category values of one attribute and their indicator offsets
#[derive(Debug, Clone)]
struct Vocabulary {
    feature: CategoricalFeature,
    categories: Vec<String>,
    positions: AHashMap<String, usize>,
}

impl Vocabulary {
    fn fit(feature: CategoricalFeature, items: &[Item]) -> Self {
        let mut categories: Vec<String> = items
            .iter()
            .map(|item| item.categorical(feature).to_string())
            .collect();
        categories.sort();
        categories.dedup();

        let positions = categories
            .iter()
            .enumerate()
            .map(|(pos, category)| (category.clone(), pos))
            .collect();

        Self {
            feature,
            categories,
            positions,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.categories.len()
    }

    #[inline]
    fn position(&self, category: &str) -> Option<usize> {
        self.positions.get(category).copied()
    }
}

/// Mean and population standard deviation of `year`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearScaler {
    pub mean: f64,
    pub std: f64,
}

impl YearScaler {
    fn fit(items: &[Item]) -> Self {
        let n = items.len() as f64;
        let mean = items.iter().map(|item| f64::from(item.year)).sum::<f64>() / n;
        let variance = items
            .iter()
            .map(|item| {
                let d = f64::from(item.year) - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        let std = variance.sqrt();

        // A constant column scales by 1 and encodes as 0
        let std = if std > 1e-12 { std } else { 1.0 };
        Self { mean, std }
    }

    #[inline]
    fn transform(&self, year: i32) -> f32 {
        ((f64::from(year) - self.mean) / self.std) as f32
    }
}

/// Fitted one-hot + standard-scaling encoder
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    vocabularies: Vec<Vocabulary>,
    year: YearScaler,
    dim: usize,
}

impl FeatureEncoder {
    /// Learn vocabularies and year statistics from the catalog
    pub fn fit(items: &[Item]) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::EmptyCatalog);
        }

        let vocabularies: Vec<Vocabulary> = CategoricalFeature::ALL
            .iter()
            .map(|&feature| Vocabulary::fit(feature, items))
            .collect();
        let year = YearScaler::fit(items);
        let dim = vocabularies.iter().map(Vocabulary::len).sum::<usize>() + 1;

        for vocab in &vocabularies {
            debug!("{}: {} categories", vocab.feature.column(), vocab.len());
        }
        debug!("year: mean {:.3}, std {:.3}", year.mean, year.std);

        Ok(Self {
            vocabularies,
            year,
            dim,
        })
    }

    /// Width of every encoded row
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn year_scaler(&self) -> YearScaler {
        self.year
    }

    /// Categories learned for an attribute, sorted
    pub fn categories(&self, feature: CategoricalFeature) -> &[String] {
        self.vocabularies
            .iter()
            .find(|vocab| vocab.feature == feature)
            .map(|vocab| vocab.categories.as_slice())
            .unwrap_or(&[])
    }

    /// Encode a single item
    pub fn encode_one(&self, item: &Item) -> Vector {
        let mut row = Vector::zeros(self.dim);
        let data = row.as_mut_slice();
        let mut offset = 0;

        for vocab in &self.vocabularies {
            if let Some(pos) = vocab.position(item.categorical(vocab.feature)) {
                data[offset + pos] = 1.0;
            }
            offset += vocab.len();
        }
        data[offset] = self.year.transform(item.year);

        row
    }

    /// Encode items into rows, preserving input order
    pub fn encode(&self, items: &[Item]) -> Vec<Vector> {
        items.iter().map(|item| self.encode_one(item)).collect()
    }
}
