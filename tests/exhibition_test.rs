use std::sync::Arc;

use curator::artwork::Source;
use curator::config::Config;
use curator::engine::{Aggregator, EngineConfig};
use curator::exhibition::Exhibition;
use curator::exhibition::sqlite::SqliteExhibition;
use curator::museum::MuseumRegistry;
use curator::museum::mock::{MockMuseum, artwork};

#[tokio::test]
async fn survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("curator.db");
    let path = path.to_str().unwrap();

    {
        let exhibition = SqliteExhibition::open(path).unwrap();
        exhibition
            .add(artwork(Source::Chicago, 27992, "A Sunday on La Grande Jatte", "1884"))
            .await
            .unwrap();
        exhibition
            .add(artwork(Source::Cleveland, 135382, "Water Lilies", "1915"))
            .await
            .unwrap();
    }

    let exhibition = SqliteExhibition::open(path).unwrap();
    let ids: Vec<String> = exhibition
        .artworks()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec!["chicago-27992", "cleveland-135382"]);
}

#[tokio::test]
async fn shares_database_with_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("curator.db");
    let path = path.to_str().unwrap();

    let config = Config::open(path).unwrap();
    let exhibition = SqliteExhibition::open(path).unwrap();

    config.set("timeout_secs", "5").unwrap();
    exhibition
        .add(artwork(Source::Harvard, 299843, "Self-Portrait", "1888"))
        .await
        .unwrap();

    assert_eq!(config.get("timeout_secs").unwrap().as_deref(), Some("5"));
    assert_eq!(exhibition.size().await.unwrap(), 1);
}

#[tokio::test]
async fn readd_after_remove_goes_to_the_end() {
    let exhibition = SqliteExhibition::in_memory().unwrap();
    for id in [1, 2, 3] {
        exhibition
            .add(artwork(Source::Chicago, id, "untitled", ""))
            .await
            .unwrap();
    }

    assert!(exhibition.remove("chicago-1").await.unwrap());
    assert!(exhibition.add(artwork(Source::Chicago, 1, "untitled", "")).await.unwrap());

    let ids: Vec<String> = exhibition
        .artworks()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec!["chicago-2", "chicago-3", "chicago-1"]);
}

#[tokio::test]
async fn curate_from_lookup() {
    let mut registry = MuseumRegistry::new();
    registry.register(Arc::new(
        MockMuseum::new(Source::Cleveland)
            .with_artworks(vec![artwork(Source::Cleveland, 135382, "Water Lilies", "1915")]),
    ));
    let engine = Aggregator::new(registry, EngineConfig::default());
    let exhibition = SqliteExhibition::in_memory().unwrap();

    let found = engine.get_artwork("cleveland-135382").await.unwrap();
    assert!(exhibition.add(found).await.unwrap());
    assert!(engine.get_artwork("cleveland-1").await.is_none());

    let stored = exhibition.artworks().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Water Lilies");
}
