use std::sync::Arc;
use std::time::Duration;

use atelier_core::asset::{AssetId, AssetKind, NewAsset};
use atelier_engine::{EngineConfig, RefineSource, ResultOrigin, RevisionEngine, RevisionInput};
use atelier_events::EventBus;

async fn engine() -> RevisionEngine {
    let engine = RevisionEngine::new(
        EngineConfig {
            simulated_delay: Duration::from_millis(500),
            ..EngineConfig::default()
        },
        Arc::new(EventBus::default()),
    );
    engine
        .ingest(NewAsset::new("hero", "Hero.png", "/img/Hero.png", AssetKind::Image))
        .await
        .unwrap();
    engine
}

fn hero() -> AssetId {
    AssetId::from("hero")
}

async fn revise_and_promote(engine: &RevisionEngine, input: RevisionInput) {
    engine.submit(&hero(), input).await.unwrap().wait().await.unwrap();
    engine.promote(&hero()).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn accepted_versions_resolve_from_live_results() {
    let engine = engine().await;
    revise_and_promote(&engine, RevisionInput::from_text("one")).await;
    revise_and_promote(&engine, RevisionInput::from_text("two")).await;

    let versions = engine.versions_available(&hero()).await.unwrap();
    let locators: Vec<&str> = versions.iter().map(|r| r.locator.as_str()).collect();
    assert_eq!(locators, vec!["/img/Hero.png", "/img/Hero_1.png", "/img/Hero_2.png"]);
    assert!(versions.iter().all(|r| r.origin == ResultOrigin::Live));
}

#[tokio::test(start_paused = true)]
async fn discarded_drafts_never_become_resolvable() {
    let engine = engine().await;
    engine
        .submit(&hero(), RevisionInput::from_text("rejected"))
        .await
        .unwrap()
        .wait()
        .await
        .unwrap();
    engine.discard(&hero()).await.unwrap();

    assert!(engine.resolve_version(&hero(), 1).await.unwrap().is_none());
    assert_eq!(engine.versions_available(&hero()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn pool_fills_in_versions_without_live_results() {
    let engine = engine().await;
    let added = engine
        .register_results(["/results/hero_3.mp4", "/results/HERO_3.png", "/results/other_1.png"])
        .await;
    assert_eq!(added, 2);

    let hit = engine.resolve_version(&hero(), 3).await.unwrap().unwrap();
    assert_eq!(hit.locator, "/results/hero_3.mp4");
    assert_eq!(hit.origin, ResultOrigin::Pool);
    assert!(engine.resolve_version(&hero(), 2).await.unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn refinement_can_branch_from_the_original() {
    let engine = engine().await;
    revise_and_promote(&engine, RevisionInput::from_text("one")).await;

    let handle = engine
        .submit(&hero(), RevisionInput::from_text("again").with_source(RefineSource::Original))
        .await
        .unwrap();
    let request = engine.request(&handle.request_id).await.unwrap();
    let draft = handle.wait().await.unwrap();

    assert_eq!(request.source_version, 0);
    assert_eq!(draft.source_version, 0);
    assert_eq!(draft.result_asset.name, "Hero_2.png");

    engine.promote(&hero()).await.unwrap();
    let current = engine.get(&hero()).await.unwrap();
    assert_eq!(current.version, 2);
    assert_eq!(current.history().len(), 2);
    assert_eq!(current.original().name, "Hero.png");
}
