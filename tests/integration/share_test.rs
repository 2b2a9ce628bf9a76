//! Integration tests for share management and public share access.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{REPORT_BYTES, TestApp};

async fn downloads_of(app: &TestApp, id: &str) -> i64 {
    let response = app
        .request("GET", &format!("/api/shares/{id}"), None, Some(&app.alice))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.body["data"]["downloads"].as_i64().unwrap()
}

#[tokio::test]
async fn test_public_file_share_downloads_and_counts() {
    let app = TestApp::new().await;
    let share = app.create_share(json!({ "path": "/docs/report.pdf" })).await;

    let token = share["token"].as_str().unwrap();
    let id = share["id"].as_str().unwrap();
    assert_eq!(share["path"], "docs/report.pdf");
    assert_eq!(share["shareType"], "public");
    assert_eq!(share["permission"], "download");
    assert_eq!(share["downloads"], 0);
    assert_eq!(share["isValid"], true);
    assert_eq!(
        share["url"].as_str().unwrap(),
        format!("http://localhost:8080/s/{token}")
    );
    assert!(share.get("passwordHash").is_none());

    let response = app.request("GET", &format!("/api/s/{token}"), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.bytes, REPORT_BYTES);
    assert_eq!(response.header("content-type"), "application/pdf");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"report.pdf\""
    );
    assert_eq!(downloads_of(&app, id).await, 1);

    let response = app.request("GET", &format!("/api/s/{token}"), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(downloads_of(&app, id).await, 2);
}

#[tokio::test]
async fn test_password_directory_share_flow() {
    let app = TestApp::new().await;
    let share = app
        .create_share(json!({
            "path": "docs",
            "shareType": "password",
            "password": "s3cret",
            "permission": "view",
        }))
        .await;
    let token = share["token"].as_str().unwrap();
    let id = share["id"].as_str().unwrap();
    let url = format!("/api/s/{token}");

    let response = app.request("GET", &url, None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["data"],
        json!({ "requiresPassword": true, "path": "docs" })
    );

    let response = app
        .request("POST", &url, Some(json!({ "password": "wrong" })), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "UNAUTHORIZED");

    let response = app
        .request("POST", &url, Some(json!({ "password": "s3cret" })), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["path"], "docs");
    assert_eq!(data["permission"], "view");
    let names: Vec<&str> = data["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["sub", "notes.txt", "report.pdf"]);
    assert_eq!(data["files"][0]["isDir"], true);

    assert_eq!(downloads_of(&app, id).await, 0);
}

#[tokio::test]
async fn test_view_only_file_returns_metadata() {
    let app = TestApp::new().await;
    let share = app
        .create_share(json!({ "path": "docs/report.pdf", "permission": "view" }))
        .await;
    let token = share["token"].as_str().unwrap();

    let response = app.request("GET", &format!("/api/s/{token}"), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let file = &response.body["data"]["file"];
    assert_eq!(file["name"], "report.pdf");
    assert_eq!(file["path"], "docs/report.pdf");
    assert_eq!(file["size"].as_u64().unwrap(), REPORT_BYTES.len() as u64);
    assert_eq!(file["isDir"], false);
    assert_eq!(downloads_of(&app, share["id"].as_str().unwrap()).await, 0);
}

#[tokio::test]
async fn test_expired_share_is_gone() {
    let app = TestApp::new().await;
    let past = chrono::Utc::now() - chrono::Duration::hours(1);
    let share = app
        .create_share(json!({ "path": "docs/report.pdf", "expiresAt": past }))
        .await;
    assert_eq!(share["isValid"], false);

    let token = share["token"].as_str().unwrap();
    let response = app.request("GET", &format!("/api/s/{token}"), None, None).await;
    assert_eq!(response.status, StatusCode::GONE);
    assert_eq!(response.error_code(), "SHARE_EXPIRED");
    assert_eq!(response.body["message"], "Share has expired");
}

#[tokio::test]
async fn test_download_limit_and_revocation() {
    let app = TestApp::new().await;
    let share = app
        .create_share(json!({ "path": "docs/notes.txt", "maxDownloads": 1 }))
        .await;
    let token = share["token"].as_str().unwrap();
    let id = share["id"].as_str().unwrap();
    let url = format!("/api/s/{token}");

    assert_eq!(app.request("GET", &url, None, None).await.status, StatusCode::OK);
    let response = app.request("GET", &url, None, None).await;
    assert_eq!(response.status, StatusCode::GONE);
    assert_eq!(response.error_code(), "SHARE_DOWNLOAD_LIMIT_REACHED");

    // Raising the cap makes the share usable again.
    let response = app
        .request(
            "PUT",
            &format!("/api/shares/{id}"),
            Some(json!({ "maxDownloads": 5 })),
            Some(&app.alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["maxDownloads"], 5);
    assert_eq!(app.request("GET", &url, None, None).await.status, StatusCode::OK);

    let response = app
        .request(
            "PUT",
            &format!("/api/shares/{id}"),
            Some(json!({ "isActive": false })),
            Some(&app.alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["isActive"], false);

    let response = app.request("GET", &url, None, None).await;
    assert_eq!(response.status, StatusCode::GONE);
    assert_eq!(response.error_code(), "SHARE_INACTIVE");
}

#[tokio::test]
async fn test_update_clears_expiry_and_rejects_low_cap() {
    let app = TestApp::new().await;
    let past = chrono::Utc::now() - chrono::Duration::hours(1);
    let share = app
        .create_share(json!({ "path": "docs/notes.txt", "expiresAt": past }))
        .await;
    let id = share["id"].as_str().unwrap();
    let token = share["token"].as_str().unwrap();

    let response = app
        .request(
            "PUT",
            &format!("/api/shares/{id}"),
            Some(json!({ "expiresAt": null })),
            Some(&app.alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["data"]["expiresAt"].is_null());
    assert_eq!(response.body["data"]["isValid"], true);

    let url = format!("/api/s/{token}");
    assert_eq!(app.request("GET", &url, None, None).await.status, StatusCode::OK);
    assert_eq!(app.request("GET", &url, None, None).await.status, StatusCode::OK);

    let response = app
        .request(
            "PUT",
            &format!("/api/shares/{id}"),
            Some(json!({ "maxDownloads": 1 })),
            Some(&app.alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_non_owner_is_forbidden() {
    let app = TestApp::new().await;
    let share = app.create_share(json!({ "path": "docs" })).await;
    let path = format!("/api/shares/{}", share["id"].as_str().unwrap());

    for (method, body) in [
        ("GET", None),
        ("PUT", Some(json!({ "isActive": false }))),
        ("DELETE", None),
    ] {
        let response = app.request(method, &path, body, Some(&app.bob)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{method}");
        assert_eq!(response.error_code(), "FORBIDDEN");
    }

    let response = app
        .request("GET", &format!("{path}/info"), None, Some(&app.bob))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.request("GET", "/api/shares", None, Some(&app.bob)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"], json!([]));
}

#[tokio::test]
async fn test_management_requires_active_user() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/shares", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "UNAUTHORIZED");

    let response = app
        .request("GET", "/api/shares", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/api/shares", None, Some(&app.inactive))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_validation() {
    let app = TestApp::new().await;

    for body in [
        json!({ "path": "" }),
        json!({ "path": "   " }),
        json!({ "path": "../etc/passwd" }),
        json!({ "path": "/" }),
        json!({ "path": "docs", "shareType": "password" }),
        json!({ "path": "docs", "maxDownloads": -1 }),
    ] {
        let response = app
            .request("POST", "/api/shares", Some(body.clone()), Some(&app.alice))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response.error_code(), "VALIDATION_ERROR");
    }

    for path in ["docs/missing.txt", ".avatars/me.png", ".avatars"] {
        let response = app
            .request(
                "POST",
                "/api/shares",
                Some(json!({ "path": path })),
                Some(&app.alice),
            )
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{path}");
    }

    let response = app
        .request("GET", "/api/shares/not-a-uuid", None, Some(&app.alice))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_filter_and_delete() {
    let app = TestApp::new().await;
    let first = app.create_share(json!({ "path": "docs" })).await;
    let second = app.create_share(json!({ "path": "docs/report.pdf" })).await;
    let third = app.create_share(json!({ "path": "docs" })).await;

    let response = app.request("GET", "/api/shares", None, Some(&app.alice)).await;
    let ids: Vec<&str> = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            third["id"].as_str().unwrap(),
            second["id"].as_str().unwrap(),
            first["id"].as_str().unwrap(),
        ]
    );

    let response = app
        .request("GET", "/api/shares?path=docs", None, Some(&app.alice))
        .await;
    assert_eq!(response.body["data"].as_array().unwrap().len(), 2);

    let id = second["id"].as_str().unwrap();
    let response = app
        .request("DELETE", &format!("/api/shares/{id}"), None, Some(&app.alice))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", &format!("/api/shares/{id}"), None, Some(&app.alice))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let token = second["token"].as_str().unwrap();
    let response = app.request("GET", &format!("/api/s/{token}"), None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_vanished_target_is_not_found() {
    let app = TestApp::new().await;
    let share = app.create_share(json!({ "path": "docs/notes.txt" })).await;
    std::fs::remove_file(app.dir.path().join("docs/notes.txt")).unwrap();

    let token = share["token"].as_str().unwrap();
    let response = app.request("GET", &format!("/api/s/{token}"), None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Shared content not found");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["database"], "connected");
    assert_eq!(response.body["data"]["storage"], "available");
    assert_eq!(response.body["data"]["storage_provider"], "local");
}
