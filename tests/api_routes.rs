use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use broadcast_guide::{
    api::{handlers::SaveRuleResponse, router, service::ScheduleView, GuideService},
    markets::MarketDirectory,
    models::MappingRule,
    rules::RuleTable,
    sample,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    router(Arc::new(GuideService::with_sample_data()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn schedule_for_beverly_hills() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/schedule?zip=90210", None).await;
    assert_eq!(status, StatusCode::OK);
    let view: ScheduleView = parse(&body);
    assert_eq!(view.zip.as_deref(), Some("90210"));
    assert_eq!(view.games[0].matchup, "Lakers @ Celtics (NBA)");
    assert_eq!(view.games[0].local_channel, "Spectrum SportsNet");
}

#[tokio::test]
async fn schedule_unknown_zip_and_no_zip_fall_back() {
    let app = app();
    let (_, body) = send(&app, Method::GET, "/api/schedule?zip=99999", None).await;
    let view: ScheduleView = parse(&body);
    assert_eq!(view.games[0].local_channel, "NBA League Pass");

    let (_, body) = send(&app, Method::GET, "/api/schedule", None).await;
    let view: ScheduleView = parse(&body);
    assert_eq!(view.location, "[Default: US National Feed]");
    assert_eq!(view.games[2].local_channel, "NBA League Pass");
}

#[tokio::test]
async fn schedule_rejects_bad_zip() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/schedule?zip=9021A", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: Value = parse(&body);
    assert!(err["error"].as_str().unwrap().contains("5-digit"));
}

#[tokio::test]
async fn rule_lifecycle() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/admin/map",
        Some(json!({"dma_code": "phx-dma", "team": "PHX", "sport": "nba", "channel": "Suns Live"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let saved: SaveRuleResponse = parse(&body);
    assert!(saved.inserted);
    assert_eq!(saved.rule.region, "PHX-DMA");

    let uri = format!("/api/admin/dma-map/{}", saved.id);
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"channel": "Arizona's Family Sports"}))).await;
    assert_eq!(status, StatusCode::OK);
    let rule: MappingRule = parse(&body);
    assert_eq!(rule.channel, "Arizona's Family Sports");
    assert_eq!(rule.team, "PHX");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, Method::GET, "/api/admin/dma-map", None).await;
    let rules: Vec<MappingRule> = parse(&body);
    assert_eq!(rules.len(), 3);
}

#[tokio::test]
async fn save_rule_requires_all_fields() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/admin/map",
        Some(json!({"dma_code": "LA-DMA", "team": "", "sport": "NBA", "channel": "X"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn edit_rule_keeps_rows_valid_and_unique() {
    let app = app();
    let (_, body) = send(&app, Method::GET, "/api/admin/dma-map", None).await;
    let rules: Vec<MappingRule> = parse(&body);
    let chi = rules.iter().find(|r| r.team == "CHI").unwrap().clone();
    let uri = format!("/api/admin/dma-map/{}", chi.id);

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"channel": "   "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err: Value = parse(&body);
    assert!(err["error"].as_str().unwrap().contains("channel"));

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"dma_code": "BOS-DMA", "team": "BOS"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let unchanged: MappingRule = parse(&body);
    assert_eq!(unchanged, chi);

    let (_, body) = send(&app, Method::GET, "/api/admin/dma-map", None).await;
    let rules: Vec<MappingRule> = parse(&body);
    assert_eq!(rules.iter().filter(|r| r.team == "BOS").count(), 1);
}

#[tokio::test]
async fn unknown_rule_id_is_not_found() {
    let app = app();
    let (status, _) = send(&app, Method::DELETE, "/api/admin/dma-map/rule-0", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn approve_moves_game_into_schedule() {
    let app = app();
    let (_, body) = send(&app, Method::GET, "/api/admin/unvalidated", None).await;
    let queue: Value = parse(&body);
    assert_eq!(queue["count"], 2);
    assert_eq!(queue["games"][0]["placeholder"], "RSN / Blackout Check");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/admin/unvalidated/LAL_BOS_Dec10/approve",
        Some(json!({"channel": "Spectrum SportsNet"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/admin/unvalidated/LAL_BOS_Dec10/approve",
        Some(json!({"channel": "Spectrum SportsNet"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, Method::GET, "/api/schedule?zip=90012", None).await;
    let view: ScheduleView = parse(&body);
    assert_eq!(view.games.len(), 4);
    assert_eq!(view.games[3].local_channel, "Spectrum SportsNet");
    assert!(view.games[3].is_regional);
}

#[tokio::test]
async fn approve_without_default_is_rejected() {
    let mut pending = sample::unvalidated_games();
    pending[0].regional_overrides.clear();
    let app = router(Arc::new(GuideService::new(
        sample::schedule(),
        pending,
        RuleTable::from_new_rules(sample::dma_rules()),
        MarketDirectory::builtin(),
    )));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/admin/unvalidated/LAL_BOS_Dec10/approve",
        Some(json!({"channel": "Spectrum SportsNet"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&app, Method::GET, "/api/schedule?zip=90210", None).await;
    assert_eq!(status, StatusCode::OK);
    let view: ScheduleView = parse(&body);
    assert_eq!(view.games.len(), 3);
}
