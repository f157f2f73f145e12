use std::process::{Child, Command, Stdio};

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const API_TOKEN: &str = "http-api-test-token";

/// Kills the spawned server even when an assertion panics mid-test.
struct ServerGuard(Child);

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn spawn_server(port: u16) -> ServerGuard {
    let child = Command::new(env!("CARGO_BIN_EXE_podro"))
        .args(["--port", &port.to_string(), "--api-token", API_TOKEN])
        .env_remove("PODRO_DATA_FILE")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("server binary must spawn");
    ServerGuard(child)
}

/// Grab a port the OS considers free right now. There is a small window
/// between dropping the probe listener and the server binding it.
fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("probe listener must bind")
        .local_addr()
        .expect("probe listener has an address")
        .port()
}

async fn wait_for_server(client: &Client, base_url: &str) {
    let health_url = format!("{base_url}/api/v1/health");
    for _ in 0..60 {
        if let Ok(resp) = client.get(&health_url).send().await {
            if resp.status() == StatusCode::OK {
                return;
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    }
    panic!("server did not become healthy in time");
}

#[tokio::test(flavor = "multi_thread")]
async fn http_api_round_trip_covers_store_surface() {
    let port = free_port();
    let _server = spawn_server(port);
    let base_url = format!("http://127.0.0.1:{port}");

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("reqwest client must build");

    wait_for_server(&client, &base_url).await;

    // =========================================================================
    // Auth
    // =========================================================================

    let store_url = format!("{base_url}/api/v1/store");

    let no_auth = client
        .get(&store_url)
        .send()
        .await
        .expect("unauthenticated request should return response");
    assert_eq!(no_auth.status(), StatusCode::UNAUTHORIZED);

    // =========================================================================
    // Populate and read back
    // =========================================================================

    for (module, key, value) in [
        ("machine", "xTravel", json!(200)),
        ("machine", "yTravel", json!(150)),
        ("projects", "current", json!("flange")),
    ] {
        let resp = client
            .post(format!("{base_url}/api/v1/store/{module}/{key}"))
            .header("X-API-Token", API_TOKEN)
            .json(&json!({ "value": value }))
            .send()
            .await
            .expect("set item request must succeed");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let item: Value = client
        .get(format!("{base_url}/api/v1/store/machine/xTravel"))
        .header("X-API-Token", API_TOKEN)
        .send()
        .await
        .expect("get item request must succeed")
        .json()
        .await
        .expect("item response must be JSON");
    assert_eq!(item, json!(200));

    let all: Value = client
        .get(&store_url)
        .header("X-API-Token", API_TOKEN)
        .send()
        .await
        .expect("get all request must succeed")
        .json()
        .await
        .expect("store response must be JSON");
    assert_eq!(
        all,
        json!({
            "machine": {"xTravel": 200, "yTravel": 150},
            "projects": {"current": "flange"}
        })
    );

    // =========================================================================
    // Export
    // =========================================================================

    let export_resp = client
        .get(format!("{base_url}/api/v1/store/export"))
        .header("X-API-Token", API_TOKEN)
        .send()
        .await
        .expect("export request must succeed");
    assert_eq!(export_resp.status(), StatusCode::OK);
    assert_eq!(
        export_resp
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok()),
        Some("attachment; filename=\"datastore.json\"")
    );
    let export_text = export_resp.text().await.expect("export body must read");

    let exported: Value = serde_json::from_str(&export_text).expect("export must be valid JSON");
    assert_eq!(
        exported["_schema"]["labels"],
        json!({"module": "Module", "key": "Key", "value": "Item"})
    );
    assert_eq!(exported["machine"], json!({"xTravel": 200, "yTravel": 150}));

    // =========================================================================
    // Clear, then restore from the exported file
    // =========================================================================

    let clear_resp = client
        .delete(&store_url)
        .header("X-API-Token", API_TOKEN)
        .send()
        .await
        .expect("clear request must succeed");
    assert_eq!(clear_resp.status(), StatusCode::OK);

    let emptied: Value = client
        .get(&store_url)
        .header("X-API-Token", API_TOKEN)
        .send()
        .await
        .expect("get all request must succeed")
        .json()
        .await
        .expect("store response must be JSON");
    assert_eq!(emptied, json!({}));

    let import_resp = client
        .post(format!("{base_url}/api/v1/store/import"))
        .header("X-API-Token", API_TOKEN)
        .body(export_text)
        .send()
        .await
        .expect("import request must succeed");
    assert_eq!(import_resp.status(), StatusCode::OK);

    let restored: Value = client
        .get(&store_url)
        .header("X-API-Token", API_TOKEN)
        .send()
        .await
        .expect("get all request must succeed")
        .json()
        .await
        .expect("store response must be JSON");
    assert_eq!(restored["machine"], json!({"xTravel": 200, "yTravel": 150}));
    assert_eq!(restored["projects"], json!({"current": "flange"}));

    // =========================================================================
    // Bad import is rejected and changes nothing
    // =========================================================================

    let bad_import = client
        .post(format!("{base_url}/api/v1/store/import"))
        .header("X-API-Token", API_TOKEN)
        .body("[1,2,3]")
        .send()
        .await
        .expect("bad import request must succeed");
    assert_eq!(bad_import.status(), StatusCode::BAD_REQUEST);

    let after_bad: Value = client
        .get(&store_url)
        .header("X-API-Token", API_TOKEN)
        .send()
        .await
        .expect("get all request must succeed")
        .json()
        .await
        .expect("store response must be JSON");
    assert_eq!(after_bad, restored);

    // =========================================================================
    // Delete prunes emptied modules
    // =========================================================================

    let delete_resp = client
        .delete(format!("{base_url}/api/v1/store/projects/current"))
        .header("X-API-Token", API_TOKEN)
        .send()
        .await
        .expect("delete request must succeed");
    assert_eq!(delete_resp.status(), StatusCode::OK);

    let pruned: Value = client
        .get(&store_url)
        .header("X-API-Token", API_TOKEN)
        .send()
        .await
        .expect("get all request must succeed")
        .json()
        .await
        .expect("store response must be JSON");
    assert!(pruned.get("projects").is_none());
    assert_eq!(pruned["machine"], json!({"xTravel": 200, "yTravel": 150}));
}
