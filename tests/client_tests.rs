// Signed OVH client tests against a mock HTTP server
// ovh-exporter - Prometheus exporter for OVHcloud public cloud projects

use mockito::Matcher;
use ovh_exporter::config::OvhAccountConfig;
use ovh_exporter::error::ExporterError;
use ovh_exporter::ovh::{fetch_snapshot, AccountClient, OvhClient};
use reqwest::Method;
use serde_json::json;

fn account(url: &str, consumer_key: Option<&str>) -> OvhAccountConfig {
    OvhAccountConfig {
        endpoint: url.to_string(),
        application_key: "app-key".to_string(),
        application_secret: "app-secret".to_string(),
        consumer_key: consumer_key.map(str::to_string),
        timeout_seconds: 5,
    }
}

#[tokio::test]
async fn test_signed_get() {
    let mut server = mockito::Server::new_async().await;
    let time = server
        .mock("GET", "/auth/time")
        .match_header("X-Ovh-Application", "app-key")
        .with_body("1700000000")
        .expect(1)
        .create_async()
        .await;
    let me = server
        .mock("GET", "/me")
        .match_header("X-Ovh-Application", "app-key")
        .match_header("X-Ovh-Consumer", "consumer")
        .match_header("X-Ovh-Timestamp", Matcher::Regex(r"^17000000\d\d$".to_string()))
        .match_header("X-Ovh-Signature", Matcher::Regex(r"^\$1\$[0-9a-f]{40}$".to_string()))
        .with_header("content-type", "application/json")
        .with_body(r#"{"nichandle":"ab12345-ovh"}"#)
        .expect(2)
        .create_async()
        .await;

    let client = OvhClient::new(&account(&server.url(), Some("consumer"))).unwrap();
    let first = client.get("/me").await.unwrap();
    let second = client.get("/me").await.unwrap();

    assert_eq!(first["nichandle"], "ab12345-ovh");
    assert_eq!(first, second);
    // Server time is fetched once per client
    time.assert_async().await;
    me.assert_async().await;
}

#[tokio::test]
async fn test_api_error_mapping() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/auth/time")
        .with_body("1700000000")
        .create_async()
        .await;
    server
        .mock("GET", "/me")
        .with_status(403)
        .with_body(r#"{"class":"Client::Forbidden","message":"This call has not been granted"}"#)
        .create_async()
        .await;

    let client = OvhClient::new(&account(&server.url(), Some("consumer"))).unwrap();
    let error = client.get("/me").await.unwrap_err();

    match error {
        ExporterError::Api { path, status, message } => {
            assert_eq!(path, "/me");
            assert_eq!(status, 403);
            assert_eq!(message, "This call has not been granted");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/auth/time")
        .with_body("1700000000")
        .create_async()
        .await;
    server
        .mock("GET", "/me")
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let client = OvhClient::new(&account(&server.url(), Some("consumer"))).unwrap();
    let error = client.get("/me").await.unwrap_err();

    assert!(matches!(error, ExporterError::Decode { .. }));
}

#[tokio::test]
async fn test_missing_consumer_key() {
    let server = mockito::Server::new_async().await;
    let client = OvhClient::new(&account(&server.url(), None)).unwrap();

    let error = client.get("/me").await.unwrap_err();

    assert!(matches!(error, ExporterError::Config(_)));
}

#[tokio::test]
async fn test_unauthenticated_call() {
    let mut server = mockito::Server::new_async().await;
    let credential = server
        .mock("POST", "/auth/credential")
        .match_header("X-Ovh-Application", "app-key")
        .match_header("X-Ovh-Consumer", Matcher::Missing)
        .match_header("X-Ovh-Signature", Matcher::Missing)
        .match_body(Matcher::PartialJson(json!({"redirection": "http://localhost:1/"})))
        .with_body(r#"{"validationUrl":"https://example.test/validate","consumerKey":"new-ck","state":"pendingValidation"}"#)
        .create_async()
        .await;

    let client = OvhClient::new(&account(&server.url(), None)).unwrap();
    let body = json!({"accessRules": [], "redirection": "http://localhost:1/"});
    let response = client
        .call_unauthenticated(Method::POST, "/auth/credential", Some(&body))
        .await
        .unwrap();

    assert_eq!(response["consumerKey"], "new-ck");
    credential.assert_async().await;
}

#[tokio::test]
async fn test_fetch_snapshot_over_http() {
    let id = "0123456789abcdef0123456789abcdef";
    let base = format!("/cloud/project/{}", id);
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/auth/time")
        .with_body("1700000000")
        .create_async()
        .await;
    server
        .mock("GET", base.as_str())
        .with_body(json!({"projectId": id, "description": "prod"}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", format!("{}/instance", base).as_str())
        .with_body(
            json!([{"id": "i-1", "name": "web", "region": "GRA7", "planCode": "b2-7.monthly.postpaid"}])
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", format!("{}/volume", base).as_str())
        .with_body("[]")
        .create_async()
        .await;
    server
        .mock("GET", format!("{}/storage", base).as_str())
        .match_query(Matcher::UrlEncoded("includeType".to_string(), "true".to_string()))
        .with_body("[]")
        .create_async()
        .await;
    server
        .mock("GET", format!("{}/quota", base).as_str())
        .with_body(json!([{"region": "GRA7"}]).to_string())
        .create_async()
        .await;
    server
        .mock("GET", format!("{}/usage/current", base).as_str())
        .with_body("{}")
        .create_async()
        .await;

    let client = OvhClient::new(&account(&server.url(), Some("consumer"))).unwrap();
    let snapshot = fetch_snapshot(&client, id).await.unwrap();

    assert_eq!(snapshot.project.description.as_deref(), Some("prod"));
    assert_eq!(snapshot.instances.len(), 1);
    assert_eq!(snapshot.quotas[0].region, "GRA7");
    assert!(snapshot.usage.hourly_usage.is_none());
}
