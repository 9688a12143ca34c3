use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::Router;
use httpmock::prelude::*;
use hyper::Request;
use serde_json::{json, Value as J};
use tower::ServiceExt;
use vtt_character_gateway::clients::foundry::{ActorQuery, FoundryRemote};
use vtt_character_gateway::infra::http_app::build_app_with_rest;
use vtt_character_gateway::tools::characters::tool_router::factory_with_query;
use vtt_character_gateway::tools::registry::ToolRegistry;

const BODY_LIMIT: usize = 1024 * 1024;

fn app_for(base: String) -> Router {
    let query: Arc<dyn ActorQuery> = Arc::new(FoundryRemote::new(base));
    let factory = {
        let query = query.clone();
        move || factory_with_query(query.clone())
    };
    build_app_with_rest(factory, ToolRegistry::for_query(query))
}

async fn rpc(app: &Router, body: J) -> J {
    let req = Request::builder()
        .method("POST")
        .uri("/v1/rpc")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert!(resp.status().is_success());
    let bytes = to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn rest_shim_lists_and_summarizes_through_host_bridge() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(POST)
            .path("/api/query")
            .json_body(json!({"method": "getCharacterInfo", "data": {"characterName": "Elspeth"}}));
        then.status(200).json_body(json!({
            "id": "wf1", "name": "Elspeth", "type": "character", "img": "tokens/elspeth.webp",
            "system": {
                "characteristics": {"ws": {"value": 41}, "t": {"value": 38}},
                "status": {"wounds": {"value": 11, "max": 13}, "armour": {"head": 2}}
            },
            "items": [{"id": "i1", "name": "Hand Weapon", "type": "weapon", "system": {"quantity": {"value": 1}}}],
            "effects": [{"id": "e1", "label": "Fatigued", "disabled": false}]
        }));
    });
    let app = app_for(server.base_url());

    let list = rpc(&app, json!({"jsonrpc": "2.0", "id": 1, "method": "tools.list"})).await;
    let names: Vec<&str> = list["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["get-character", "list-characters"]);

    let call = rpc(
        &app,
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools.call",
               "params": {"name": "get-character", "arguments": {"identifier": "Elspeth"}}}),
    )
    .await;
    m.assert();
    let summary = &call["result"];
    assert_eq!(summary["hasImage"], true);
    assert_eq!(
        summary["basicInfo"],
        json!({"wounds": {"current": 11, "max": 13}, "toughness": {"bonus": 3, "armorPoints": 2, "total": 5}})
    );
    assert_eq!(summary["items"][0]["quantity"], 1);
    assert_eq!(summary["effects"][0]["name"], "Fatigued");
}

#[tokio::test]
async fn rest_shim_lists_filtered_actors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/query")
            .json_body(json!({"method": "listActors", "data": {"type": "npc"}}));
        then.status(200).json_body(json!([
            {"id": "n1", "name": "Goblin", "type": "npc"},
            {"id": "n2", "name": "Orc", "type": "npc", "img": "orc.png"}
        ]));
    });
    let app = app_for(server.base_url());

    let v = rpc(
        &app,
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call",
               "params": {"name": "list-characters", "arguments": {"type": "npc"}}}),
    )
    .await;
    assert_eq!(v["result"]["total"], 2);
    assert_eq!(v["result"]["filtered"], "Filtered by type: npc");
    assert_eq!(v["result"]["characters"][1], json!({"id": "n2", "name": "Orc", "type": "npc", "hasImage": true}));
}

#[tokio::test]
async fn rest_shim_reports_host_failures_and_bad_input() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(POST).path("/api/query");
        then.status(404).body("Actor not found");
    });
    let app = app_for(server.base_url());

    let bad = rpc(
        &app,
        json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
               "params": {"name": "get-character", "arguments": {"identifier": "   "}}}),
    )
    .await;
    assert_eq!(bad["error"]["code"], -32602);
    m.assert_hits(0);

    let missing = rpc(
        &app,
        json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call",
               "params": {"name": "get-character", "arguments": {"identifier": "Nobody"}}}),
    )
    .await;
    assert_eq!(missing["error"]["code"], -32000);
    let msg = missing["error"]["message"].as_str().unwrap();
    assert!(msg.contains("Nobody") && msg.contains("Actor not found"), "got: {msg}");
}

#[tokio::test]
async fn healthz_is_served_alongside_rest_shim() {
    let app = app_for(String::new());
    let req = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.status().is_success());
}
