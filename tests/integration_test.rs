// Integration tests for Wardrobe
use std::collections::HashSet;
use std::io::Write;
use tempfile::NamedTempFile;
use wardrobe_core::{CatalogConfig, CatalogService, Error, ImageLocator, Item, SmallCatalogPolicy};
use wardrobe_ingest::{load_catalog, CatalogReader};

const HEADER: &str = "id,gender,masterCategory,subCategory,articleType,baseColour,season,year,usage,productDisplayName";

/// 20 rows in two clearly separated halves, plus incomplete and malformed lines
fn styles_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for id in 1..=10 {
        writeln!(
            file,
            "{},Men,Apparel,Topwear,Tshirts,Blue,Summer,2012,Casual,Roadster Men Blue Tshirt {}",
            id, id
        )
        .unwrap();
    }
    for id in 11..=20 {
        writeln!(
            file,
            "{},Women,Footwear,Shoes,Heels,Black,Winter,2016,Party,Catwalk Women Black Heels {}",
            id, id
        )
        .unwrap();
    }
    writeln!(file, "21,Men,Apparel,Topwear,Shirts,,Fall,2011,Casual,No Colour Shirt").unwrap();
    writeln!(file, "22,Men,Apparel,Topwear,Shirts,White,Fall,2011,Casual,Extra, Field, Shirt").unwrap();
    file
}

fn config(groups: usize) -> CatalogConfig {
    CatalogConfig {
        n_groups: groups,
        ..CatalogConfig::default()
    }
}

fn build(groups: usize) -> CatalogService {
    let items = load_catalog(styles_csv().path()).unwrap();
    CatalogService::build(items, &config(groups), ImageLocator::new("http://127.0.0.1:5000/image")).unwrap()
}

#[test]
fn test_ingest_drops_bad_rows() {
    let file = styles_csv();
    let report = CatalogReader::from_path(file.path()).unwrap().read().unwrap();
    assert_eq!(report.items.len(), 20);
    assert_eq!(report.rows_dropped, 1);
    assert_eq!(report.rows_malformed, 1);
}

#[test]
fn test_every_item_grouped() {
    let service = build(2);
    assert_eq!(service.store().len(), 20);
    for item in service.store().all() {
        let group = item.group.expect("item left ungrouped");
        assert!(group < 2);
    }
}

#[test]
fn test_grouping_is_deterministic() {
    let first: Vec<Option<usize>> = build(4).store().all().iter().map(|i| i.group).collect();
    for _ in 0..3 {
        let again: Vec<Option<usize>> = build(4).store().all().iter().map(|i| i.group).collect();
        assert_eq!(first, again);
    }
}

#[test]
fn test_recommend_eight_from_group_of_ten() {
    let service = build(2);
    let group = service.store().by_id(4).unwrap().group;

    for _ in 0..20 {
        let results = service.recommend(4, 8);
        assert_eq!(results.len(), 8);
        let ids: HashSet<u64> = results.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), 8, "sample contains duplicates");
        assert!(!ids.contains(&4));
        assert!(results.iter().all(|i| i.group == group));
    }
}

#[test]
fn test_recommend_size_bound() {
    let service = build(2);
    for item in service.store().all() {
        let others = service
            .store()
            .group_members(item.group.unwrap())
            .filter(|m| m.id != item.id)
            .count();
        for n in [0, 1, 5, 9, 30] {
            assert_eq!(service.recommend(item.id, n).len(), n.min(others));
        }
    }
}

#[test]
fn test_recommend_unknown_id() {
    let service = build(2);
    assert!(service.recommend(9999, 8).is_empty());
    assert!(service.recommend_records(21, 8).is_empty());
}

#[test]
fn test_search_matches_substring_property() {
    let service = build(2);
    for query in ["", "blue", "BLACK HEELS 1", "tshirt 10", "sandal", "women"] {
        let hits: HashSet<u64> = service.search(Some(query)).iter().map(|i| i.id).collect();
        for item in service.store().all() {
            let expected = item.display_name.to_lowercase().contains(&query.to_lowercase());
            assert_eq!(hits.contains(&item.id), expected, "query {:?} item {}", query, item.id);
        }
    }
    assert_eq!(service.search(Some("")).len(), 20);
}

#[test]
fn test_search_preserves_store_order() {
    let service = build(2);
    let ids: Vec<u64> = service.search(Some("heels")).iter().map(|i| i.id).collect();
    assert_eq!(ids, (11..=20).collect::<Vec<_>>());
}

#[test]
fn test_records_serialize_for_http() {
    let service = build(2);
    let records = service.search_records(Some("Tshirt 7"));
    assert_eq!(records.len(), 1);

    let json = serde_json::to_value(&records[0]).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["image"], "http://127.0.0.1:5000/image/7");
    assert_eq!(json["usage"], "Casual");
    assert!(json["cluster"].as_u64().unwrap() < 2);
}

#[test]
fn test_encoding_stable_across_calls() {
    let service = build(2);
    let items = service.store().all();
    assert_eq!(service.encoder().encode(items), service.encoder().encode(items));
}

#[test]
fn test_unseen_category_still_predicts() {
    let service = build(2);
    let mut novel = Item::new(500, "Silk Scarf", "Accessories", "Scarves", "Maroon", "Women", "Winter", 2016, "Party");
    let group = service.predict_group(&novel);
    assert!(group < 2);
    novel.master_category = "Footwear".to_string();
    assert_eq!(Some(service.predict_group(&novel)), service.store().by_id(11).unwrap().group);
}

#[test]
fn test_default_twelve_groups_rejects_tiny_catalog() {
    let items = load_catalog(styles_csv().path()).unwrap()[..5].to_vec();
    let result = CatalogService::build(items.clone(), &CatalogConfig::default(), ImageLocator::default());
    assert!(matches!(result, Err(Error::TooFewItems { items: 5, groups: 12 })));

    let clamp = CatalogConfig {
        small_catalog: SmallCatalogPolicy::Clamp,
        ..CatalogConfig::default()
    };
    let service = CatalogService::build(items, &clamp, ImageLocator::default()).unwrap();
    assert_eq!(service.n_groups(), 5);
}
