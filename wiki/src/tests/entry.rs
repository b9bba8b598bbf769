use std::{collections::HashSet, sync::Arc};

use axum::http::StatusCode;
use lambda_http::Error;

use crate::{
    create_service,
    models::{
        entry::{Entry, EntryList},
        ErrorResponse,
    },
    state::AppState,
    tests::{build_request, create, location, parse_resp, seed, send},
};

#[tokio::test]
async fn test_health_and_openapi() -> Result<(), Error> {
    let (state, _dir) = AppState::test().await?;
    let app = create_service(Arc::new(state)).await?;

    let resp = send(&app, build_request::<()>("GET", "/v1/health", None)?).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, build_request::<()>("GET", "/v1/openapi.json", None)?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let doc: serde_json::Value = parse_resp(resp).await?;
    assert!(doc["paths"]["/v1/wiki/{title}"].is_object());
    assert!(doc["paths"]["/v1/search"].is_object());
    Ok(())
}

#[tokio::test]
async fn test_index_lists_sorted_titles() -> Result<(), Error> {
    let (state, _dir) = AppState::test().await?;
    let app = create_service(Arc::new(state)).await?;

    let resp = send(&app, build_request::<()>("GET", "/v1/", None)?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let index: EntryList = parse_resp(resp).await?;
    assert!(index.entries.is_empty());

    seed(&app, &["Python", "CSS", "Git"]).await?;

    let resp = send(&app, build_request::<()>("GET", "/v1/", None)?).await?;
    let index: EntryList = parse_resp(resp).await?;
    assert_eq!(index.entries, vec!["CSS", "Git", "Python"]);
    Ok(())
}

#[tokio::test]
async fn test_create_then_get() -> Result<(), Error> {
    let (state, _dir) = AppState::test().await?;
    let app = create_service(Arc::new(state)).await?;

    let resp = create(&app, "Rust Lang", "# Rust\nFast.").await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let loc = location(&resp).unwrap();
    assert_eq!(loc, "/v1/wiki/Rust%20Lang");
    let created: Entry = parse_resp(resp).await?;
    assert_eq!(created.title, "Rust Lang");

    let resp = send(&app, build_request::<()>("GET", &loc, None)?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let entry: Entry = parse_resp(resp).await?;
    assert_eq!(
        entry,
        Entry {
            title: "Rust Lang".to_string(),
            content: "# Rust\nFast.".to_string(),
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_page() -> Result<(), Error> {
    let (state, _dir) = AppState::test().await?;
    let app = create_service(Arc::new(state)).await?;
    seed(&app, &["Git"]).await?;

    for uri in ["/v1/wiki/Nope", "/v1/wiki/git", "/v1/wiki/.hidden"] {
        let resp = send(&app, build_request::<()>("GET", uri, None)?).await?;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let err: ErrorResponse = parse_resp(resp).await?;
        assert_eq!(err.message, "Page not found");
    }
    Ok(())
}

#[tokio::test]
async fn test_create_never_overwrites() -> Result<(), Error> {
    let (state, _dir) = AppState::test().await?;
    let app = create_service(Arc::new(state)).await?;

    assert_eq!(create(&app, "Git", "original").await?.status(), StatusCode::CREATED);

    let resp = create(&app, "Git", "replacement").await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let err: ErrorResponse = parse_resp(resp).await?;
    assert_eq!(err.message, "Page already exists");

    let resp = send(&app, build_request::<()>("GET", "/v1/wiki/Git", None)?).await?;
    let entry: Entry = parse_resp(resp).await?;
    assert_eq!(entry.content, "original");

    // Titles are case-sensitive keys.
    assert_eq!(create(&app, "GIT", "loud").await?.status(), StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn test_invalid_titles_rejected() -> Result<(), Error> {
    let (state, _dir) = AppState::test().await?;
    let state = Arc::new(state);
    let app = create_service(state.clone()).await?;

    for title in ["", "  ", "../escape", "a/b", ".hidden", "line\nbreak"] {
        let resp = create(&app, title, "x").await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "title {:?}", title);
    }

    assert!(state.entries.list_entries().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_random_page() -> Result<(), Error> {
    let (state, _dir) = AppState::test().await?;
    let app = create_service(Arc::new(state)).await?;

    let resp = send(&app, build_request::<()>("GET", "/v1/random", None)?).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    seed(&app, &["CSS", "Git", "HTML"]).await?;
    let expected: HashSet<&str> = ["/v1/wiki/CSS", "/v1/wiki/Git", "/v1/wiki/HTML"].into();

    for _ in 0..10 {
        let resp = send(&app, build_request::<()>("GET", "/v1/random", None)?).await?;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let loc = location(&resp).unwrap();
        assert!(expected.contains(loc.as_str()));
    }
    Ok(())
}

#[tokio::test]
async fn test_multibyte_title_length() -> Result<(), Error> {
    let (state, _dir) = AppState::test().await?;
    let app = create_service(Arc::new(state)).await?;

    // 128 characters, 256 bytes: too long for `<title>.md`.
    let long = "é".repeat(128);
    let resp = create(&app, &long, "x").await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorResponse = parse_resp(resp).await?;
    assert_eq!(err.message, "Title is too long.");

    let uri = format!("/v1/wiki/{}", urlencoding::encode(&long));
    let resp = send(&app, build_request::<()>("GET", &uri, None)?).await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorResponse = parse_resp(resp).await?;
    assert_eq!(err.message, "Page not found");

    let fits = "é".repeat(126);
    let resp = create(&app, &fits, "x").await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let loc = location(&resp).unwrap();
    let resp = send(&app, build_request::<()>("GET", &loc, None)?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let entry: Entry = parse_resp(resp).await?;
    assert_eq!(entry.title, fits);
    Ok(())
}

#[tokio::test]
async fn test_entry_dir_removed_with_guard() -> Result<(), Error> {
    let (state, dir) = AppState::test().await?;
    let root = dir.path().to_path_buf();
    state.entries.create_entry("Git", "x").await?;
    assert!(root.join("Git.md").exists());

    drop(state);
    drop(dir);
    assert!(!root.exists());
    Ok(())
}
