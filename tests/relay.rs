//! End-to-end relay tests against mock upstreams.

use std::time::{Duration, Instant};

use auth_gateway::config::ResponseMode;
use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;

use common::{BFF_HEADER, BFF_KEY, QUERY_HEADER, QUERY_KEY};

#[tokio::test]
async fn test_query_route_injects_credential() {
    let (query_addr, query_seen) = common::start_capture_backend(200, "{\"items\":[]}").await;
    let (bff_addr, bff_seen) = common::start_capture_backend(200, "bff").await;
    let (gateway, shutdown) =
        common::start_gateway(common::gateway_config(query_addr, bff_addr)).await;

    let res = common::client()
        .get(format!("http://{}/v1/items?limit=5", gateway))
        .header("Authorization", "Bearer old")
        .header("X-Trace", "abc")
        .header("Connection", "keep-alive")
        .send()
        .await
        .expect("Gateway unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "{\"items\":[]}");

    let seen = query_seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert!(bff_seen.lock().unwrap().is_empty());

    let request = &seen[0];
    assert_eq!(request.method, "GET");
    assert_eq!(request.uri.path(), "/v1/items");
    assert_eq!(request.uri.query(), Some("limit=5"));
    assert_eq!(request.headers[QUERY_HEADER], format!("Bearer {}", QUERY_KEY).as_str());
    assert_eq!(request.headers.get_all(QUERY_HEADER).iter().count(), 1);
    assert_eq!(request.headers["x-trace"], "abc");
    assert_eq!(request.headers["host"], query_addr.to_string().as_str());
    assert!(request.headers.get(BFF_HEADER).is_none());

    shutdown.trigger();
}

#[tokio::test]
async fn test_precedence_and_bff_routing() {
    let (query_addr, query_seen) = common::start_capture_backend(200, "query").await;
    let (bff_addr, bff_seen) = common::start_capture_backend(200, "bff").await;
    let (gateway, shutdown) =
        common::start_gateway(common::gateway_config(query_addr, bff_addr)).await;
    let client = common::client();

    let body = client
        .get(format!("http://{}/v1/categories", gateway))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "query");

    for path in ["categories", "shop/data/export"] {
        let body = client
            .get(format!("http://{}/{}", gateway, path))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "bff", "{}", path);
    }

    let bff_requests = bff_seen.lock().unwrap().clone();
    assert_eq!(bff_requests.len(), 2);
    for request in &bff_requests {
        assert_eq!(request.headers[BFF_HEADER], format!("Bearer {}", BFF_KEY).as_str());
        assert!(request.headers.get("authorization").is_none());
    }
    assert_eq!(query_seen.lock().unwrap().len(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unknown_path_makes_no_upstream_call() {
    let (query_addr, query_seen) = common::start_capture_backend(200, "query").await;
    let (bff_addr, bff_seen) = common::start_capture_backend(200, "bff").await;
    let (gateway, shutdown) =
        common::start_gateway(common::gateway_config(query_addr, bff_addr)).await;

    let res = common::client()
        .get(format!("http://{}/unknown/thing", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({ "detail": "Endpoint not found" })
    );
    assert!(query_seen.lock().unwrap().is_empty());
    assert!(bff_seen.lock().unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_bodies_forwarded_or_omitted() {
    let (query_addr, _) = common::start_capture_backend(200, "query").await;
    let (bff_addr, bff_seen) = common::start_capture_backend(200, "stored").await;
    let (gateway, shutdown) =
        common::start_gateway(common::gateway_config(query_addr, bff_addr)).await;
    let client = common::client();

    let res = client
        .post(format!("http://{}/data/upload", gateway))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let payload: &[u8] = b"\x00\x01binary\xfe\xff";
    let res = client
        .put(format!("http://{}/data/upload", gateway))
        .header("Content-Type", "application/octet-stream")
        .body(payload.to_vec())
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "stored");

    let seen = bff_seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].method, "POST");
    assert!(seen[0].body.is_empty());
    assert_eq!(seen[1].method, "PUT");
    assert_eq!(&seen[1].body[..], payload);
    assert_eq!(seen[1].headers["content-type"], "application/octet-stream");

    shutdown.trigger();
}

#[tokio::test]
async fn test_compat_mode_hides_upstream_status() {
    let (query_addr, _) = common::start_capture_backend(500, "{\"error\":\"exploded\"}").await;
    let (bff_addr, _) = common::start_capture_backend(200, "bff").await;
    let (gateway, shutdown) =
        common::start_gateway(common::gateway_config(query_addr, bff_addr)).await;

    let res = common::client()
        .get(format!("http://{}/v1/items", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("x-backend").is_none());
    assert_eq!(res.text().await.unwrap(), "{\"error\":\"exploded\"}");

    shutdown.trigger();
}

#[tokio::test]
async fn test_faithful_mode_relays_status() {
    let (query_addr, _) = common::start_capture_backend(201, "{\"id\":1}").await;
    let (bff_addr, _) = common::start_capture_backend(409, "already exists").await;
    let mut config = common::gateway_config(query_addr, bff_addr);
    config.relay.response_mode = ResponseMode::Faithful;
    let (gateway, shutdown) = common::start_gateway(config).await;
    let client = common::client();

    let res = client
        .post(format!("http://{}/v1/items", gateway))
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.headers()["x-backend"], "mock");
    assert_eq!(res.text().await.unwrap(), "{\"id\":1}");

    let res = client
        .post(format!("http://{}/categories", gateway))
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({ "detail": "Backend error: already exists" })
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_compressed_upstream_body_is_decoded() {
    let (query_addr, accept_seen) = common::start_gzip_backend("{\"items\":[1,2,3]}").await;
    let (bff_addr, _) = common::start_capture_backend(200, "bff").await;
    let (gateway, shutdown) =
        common::start_gateway(common::gateway_config(query_addr, bff_addr)).await;

    let res = common::client()
        .get(format!("http://{}/v1/items", gateway))
        .header("Accept-Encoding", "gzip, deflate, br")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("content-encoding").is_none());
    assert_eq!(res.bytes().await.unwrap(), "{\"items\":[1,2,3]}".as_bytes());
    assert_eq!(
        accept_seen.lock().unwrap().as_slice(),
        ["gzip, deflate, br".to_string()]
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_faithful_mode_drops_decoded_encoding() {
    let (query_addr, _) = common::start_gzip_backend("{\"id\":9}").await;
    let (bff_addr, _) = common::start_capture_backend(200, "bff").await;
    let mut config = common::gateway_config(query_addr, bff_addr);
    config.relay.response_mode = ResponseMode::Faithful;
    let (gateway, shutdown) = common::start_gateway(config).await;

    let res = common::client()
        .get(format!("http://{}/v1/items/9", gateway))
        .header("Accept-Encoding", "gzip")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("content-encoding").is_none());
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_eq!(res.bytes().await.unwrap(), "{\"id\":9}".as_bytes());

    shutdown.trigger();
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let query_addr = common::start_redirecting_backend().await;
    let bff_addr = common::closed_addr();
    let (gateway, shutdown) =
        common::start_gateway(common::gateway_config(query_addr, bff_addr)).await;

    let res = common::client()
        .get(format!("http://{}/v1/old", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "moved here");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_502() {
    let (query_addr, _) = common::start_capture_backend(200, "query").await;
    let bff_addr = common::closed_addr();
    let (gateway, shutdown) =
        common::start_gateway(common::gateway_config(query_addr, bff_addr)).await;

    let res = common::client()
        .get(format!("http://{}/categories", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({ "detail": "Bad gateway: Unable to connect to backend service" })
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_slow_upstream_is_504() {
    let query_addr = common::start_slow_backend(Duration::from_secs(5)).await;
    let (bff_addr, _) = common::start_capture_backend(200, "bff").await;
    let mut config = common::gateway_config(query_addr, bff_addr);
    config.timeouts.upstream_secs = 1;
    let (gateway, shutdown) = common::start_gateway(config).await;

    let start = Instant::now();
    let res = common::client()
        .get(format!("http://{}/v1/slow", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);
    assert!(start.elapsed() < Duration::from_secs(4));
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({ "detail": "Gateway timeout: Backend service did not respond in time" })
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_health_reports_upstreams() {
    let (query_addr, _) = common::start_capture_backend(200, "query").await;
    let (bff_addr, bff_seen) = common::start_capture_backend(200, "bff").await;
    let (gateway, shutdown) =
        common::start_gateway(common::gateway_config(query_addr, bff_addr)).await;

    let res = common::client()
        .get(format!("http://{}/health", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({
            "status": "healthy",
            "query_url": format!("http://{}/", query_addr),
            "backend_fro_frontend_url": format!("http://{}", bff_addr),
        })
    );
    assert!(bff_seen.lock().unwrap().is_empty());

    shutdown.trigger();
}
