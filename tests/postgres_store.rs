//! PostgreSQL store tests. Skipped unless `MARKERS_TEST_DATABASE_URL` is set.
//! Each test works in its own throwaway schema.

use markers_api::model::{FindOptions, ListParams, MarkerPatch, NewMarker};
use markers_api::{MarkerStore, PgMarkerStore};

async fn store() -> Option<PgMarkerStore> {
    let url = std::env::var("MARKERS_TEST_DATABASE_URL").ok()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .unwrap();
    let schema = format!("markers_test_{}", uuid::Uuid::new_v4().simple());
    let store = PgMarkerStore::new(pool, &schema);
    store.ensure_schema().await.unwrap();
    // Idempotent.
    store.ensure_schema().await.unwrap();
    Some(store)
}

async fn drop_schema(store: &PgMarkerStore) {
    sqlx::query(&format!("DROP SCHEMA \"{}\" CASCADE", store.schema()))
        .execute(store.pool())
        .await
        .unwrap();
}

fn new_marker(title: &str) -> NewMarker {
    NewMarker {
        title: title.into(),
        description: None,
        latitude: 37.78825,
        longitude: -122.4324,
    }
}

#[tokio::test]
async fn crud_round_trip() {
    let Some(store) = store().await else {
        eprintln!("MARKERS_TEST_DATABASE_URL not set; skipping");
        return;
    };

    let created = store.insert(new_marker("Ferry Building")).await.unwrap();
    assert_eq!(created.created_at, created.updated_at);
    let found = store.find_by_id(&created.id).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.title, "Ferry Building");
    assert_eq!(found.description, None);

    let patch = MarkerPatch {
        description: Some("Embarcadero".into()),
        ..MarkerPatch::default()
    };
    let updated = store.update_by_id(&created.id, &patch).await.unwrap().unwrap();
    assert_eq!(updated.title, "Ferry Building");
    assert_eq!(updated.description.as_deref(), Some("Embarcadero"));
    assert!(updated.updated_at >= created.updated_at);

    let unchanged = store
        .update_by_id(&created.id, &MarkerPatch::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.description, updated.description);

    assert!(store.delete_by_id(&created.id).await.unwrap());
    assert!(!store.delete_by_id(&created.id).await.unwrap());
    assert!(store.find_by_id(&created.id).await.unwrap().is_none());
    store.ping().await.unwrap();

    drop_schema(&store).await;
}

#[tokio::test]
async fn find_orders_titles_bytewise_descending() {
    let Some(store) = store().await else {
        eprintln!("MARKERS_TEST_DATABASE_URL not set; skipping");
        return;
    };

    for title in ["b", "B", "a", "Zulu"] {
        store.insert(new_marker(title)).await.unwrap();
    }
    let options = FindOptions::by_title_desc(&ListParams::default());
    let titles: Vec<String> = store
        .find(&options)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(titles, vec!["b", "a", "Zulu", "B"]);

    let second = FindOptions::by_title_desc(&ListParams {
        page: 2,
        per_page: 3,
    });
    let rest = store.find(&second).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].title, "B");

    drop_schema(&store).await;
}
