use crate::{PveClient, PveError, RateLimitConfig};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, method, path},
};

fn client_for(server: &MockServer) -> PveClient {
    let url = url::Url::parse(&server.uri()).unwrap();
    PveClient::builder()
        .host(url.host_str().unwrap())
        .port(url.port().unwrap())
        .credentials("testuser", "testpass", "pam")
        .secure(false)
        .build()
        .unwrap()
}

async fn mount_ticket_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api2/json/access/ticket"))
        .and(body_string_contains("username=testuser"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "ticket": "PVE:testuser@pam:4EEC61E2::sig",
                "CSRFPreventionToken": "4EEC61E2:abc123"
            }
        })))
        .mount(server)
        .await;
}

#[test]
fn test_builder_requires_host() {
    let result = PveClient::builder().credentials("u", "p", "pam").build();
    assert!(matches!(result, Err(PveError::Validation(_))));
}

#[test]
fn test_builder_rejects_both_credential_kinds() {
    let result = PveClient::builder()
        .host("pve.example.com")
        .credentials("u", "p", "pam")
        .api_token("root@pam!ci", "secret")
        .build();
    assert!(matches!(result, Err(PveError::Validation(_))));
}

#[tokio::test]
async fn test_login_success_stores_ticket() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);
    mount_ticket_endpoint(&mock_server).await;

    assert!(!client.is_authenticated().await);
    client.login().await.unwrap();
    assert!(client.is_authenticated().await);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);

    Mock::given(method("POST"))
        .and(path("/api2/json/access/ticket"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let result = client.login().await;
    assert!(matches!(result, Err(PveError::Authentication(_))));
}

#[tokio::test]
async fn test_login_without_credentials_configured() {
    let mock_server = MockServer::start().await;
    let url = url::Url::parse(&mock_server.uri()).unwrap();
    let client = PveClient::builder()
        .host(url.host_str().unwrap())
        .port(url.port().unwrap())
        .secure(false)
        .build()
        .unwrap();

    assert!(matches!(
        client.login().await,
        Err(PveError::Authentication(_))
    ));
}

#[tokio::test]
async fn test_first_call_logs_in_automatically() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);
    mount_ticket_endpoint(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"version": "8.2.4", "release": "8.2", "repoid": "faa83925"}
        })))
        .mount(&mock_server)
        .await;

    let version = client.version().await.unwrap();
    assert_eq!(version.version, "8.2.4");
    assert_eq!(version.repoid.as_deref(), Some("faa83925"));
    assert!(client.is_authenticated().await);
}

#[tokio::test]
async fn test_unauthorized_triggers_single_refresh_and_retry() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);
    mount_ticket_endpoint(&mock_server).await;

    // First version call is rejected with a stale-ticket 401.
    Mock::given(method("GET"))
        .and(path("/api2/json/version"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api2/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"version": "8.2.4", "release": "8.2"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let version = client.version().await.unwrap();
    assert_eq!(version.version, "8.2.4");
}

#[tokio::test]
async fn test_api_failure_is_not_retried() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);
    mount_ticket_endpoint(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "data": null,
            "errors": {"node": "cluster not quorate"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    match client.nodes().await {
        Err(PveError::Api { status, errors }) => {
            assert_eq!(status, 500);
            assert_eq!(errors.get("node").unwrap(), "cluster not quorate");
        }
        other => panic!("expected Api error, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_vms_list() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);
    mount_ticket_endpoint(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/qemu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                {
                    "vmid": 100,
                    "name": "ubuntu-vm",
                    "status": "running",
                    "cpu": 0.23,
                    "mem": 4294967296_i64,
                    "maxmem": 8589934592_i64,
                    "uptime": 123456,
                    "tags": "ubuntu,production"
                },
                {"vmid": 101, "status": "stopped"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let vms = client.vms("pve1").await.unwrap();
    assert_eq!(vms.len(), 2);
    assert_eq!(vms[0].vmid, 100);
    assert_eq!(vms[0].name.as_deref(), Some("ubuntu-vm"));
    assert_eq!(vms[0].mem, Some(4294967296));
    assert_eq!(vms[1].vmid, 101);
    assert_eq!(vms[1].name, None);
    assert_eq!(vms[1].uptime, None);
}

#[tokio::test]
async fn test_vm_status() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);
    mount_ticket_endpoint(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/qemu/100/status/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "status": "running",
                "name": "ubuntu-vm",
                "qmpstatus": "running",
                "uptime": 123456,
                "digest": "abc123"
            }
        })))
        .mount(&mock_server)
        .await;

    let status = client.vm_status("pve1", 100).await.unwrap();
    assert_eq!(status.status, "running");
    assert_eq!(status.qmpstatus.as_deref(), Some("running"));
    assert_eq!(status.digest.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_start_and_stop_vm_return_task_ids() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);
    mount_ticket_endpoint(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu/100/status/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": "UPID:pve1:00000001:00000001:00000001:start"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu/100/status/stop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": "UPID:pve1:00000001:00000001:00000001:stop"
        })))
        .mount(&mock_server)
        .await;

    let start = client.start_vm("pve1", 100).await.unwrap();
    assert_eq!(start, "UPID:pve1:00000001:00000001:00000001:start");
    let stop = client.stop_vm("pve1", 100).await.unwrap();
    assert_eq!(stop, "UPID:pve1:00000001:00000001:00000001:stop");
}

#[tokio::test]
async fn test_delete_vm_serializes_purge_flag() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);
    mount_ticket_endpoint(&mock_server).await;

    Mock::given(method("DELETE"))
        .and(path("/api2/json/nodes/pve1/qemu/100"))
        .and(wiremock::matchers::body_string("purge=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": "UPID:pve1:00000001:00000001:00000001:destroy"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api2/json/nodes/pve1/qemu/101"))
        .and(wiremock::matchers::body_string("purge=0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": "UPID:pve1:00000002:00000002:00000002:destroy"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    client.delete_vm("pve1", 100, true).await.unwrap();
    client.delete_vm("pve1", 101, false).await.unwrap();
}

#[tokio::test]
async fn test_timeout_surfaces_as_timeout_error() {
    let mock_server = MockServer::start().await;
    let url = url::Url::parse(&mock_server.uri()).unwrap();
    let client = PveClient::builder()
        .host(url.host_str().unwrap())
        .port(url.port().unwrap())
        .api_token("root@pam!ci", "secret")
        .secure(false)
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/api2/json/version"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"data": {"version": "8.2.4", "release": "8.2"}}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let result = client.version().await;
    assert!(matches!(result, Err(PveError::Timeout(_))));
}

#[tokio::test]
async fn test_rate_limit_delays_burst_overflow() {
    use tokio::time::Instant;

    let mock_server = MockServer::start().await;
    let url = url::Url::parse(&mock_server.uri()).unwrap();
    let client = PveClient::builder()
        .host(url.host_str().unwrap())
        .port(url.port().unwrap())
        .api_token("root@pam!ci", "secret")
        .secure(false)
        .rate_limit(RateLimitConfig::new(2, 2).unwrap())
        .build()
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/api2/json/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"version": "8.2.4", "release": "8.2"}
        })))
        .expect(4)
        .mount(&mock_server)
        .await;

    // The first two requests fit the burst; the next two must wait for
    // capacity at 2 requests per second.
    let start = Instant::now();
    for _ in 0..4 {
        client.version().await.unwrap();
    }
    assert!(start.elapsed() >= Duration::from_millis(900));
}
