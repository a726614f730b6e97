use std::error::Error;

use reqwest::StatusCode;
use tempfile::tempdir;
use tokio::fs;

use podium::ServerParam;

use crate::bind_localhost;

#[tokio::test]
async fn serves_rendered_deck() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("talk.md");
    fs::write(&path, "# Slide 1\n---\n# Slide 2").await?;

    let server = bind_localhost(ServerParam::new(&path))?;

    let res = reqwest::get(&format!("http://{}", server.addr())).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers()["Content-Type"]
        .to_str()?
        .contains("text/html"));

    let body = res.text().await?;
    let first = body.find("<h1>Slide 1</h1>").expect("first slide missing");
    let second = body.find("<h1>Slide 2</h1>").expect("second slide missing");
    assert!(first < second);
    assert!(body.contains("/_static/css/theme/black.css"));
    assert!(body.contains("transition: 'default'"));

    Ok(())
}

#[tokio::test]
async fn edits_visible_without_watching() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("talk.md");
    fs::write(&path, "# Before").await?;

    let server = bind_localhost(ServerParam::new(&path))?;
    let url = format!("http://{}", server.addr());

    let body = reqwest::get(&url).await?.text().await?;
    assert!(body.contains("<h1>Before</h1>"));

    fs::write(&path, "# After").await?;

    // Re-render on request: a plain refresh picks up the edit even though no
    // reload notification was sent.
    let body = reqwest::get(&url).await?.text().await?;
    assert!(body.contains("<h1>After</h1>"));
    assert!(!body.contains("<h1>Before</h1>"));

    Ok(())
}

#[tokio::test]
async fn read_failure_is_per_request() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("talk.md");
    fs::write(&path, "# Here").await?;

    let server = bind_localhost(ServerParam::new(&path))?;
    let url = format!("http://{}", server.addr());

    fs::remove_file(&path).await?;

    let res = reqwest::get(&url).await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.text().await?.contains("failed to read"));

    // The listener survived; the next request succeeds once the file is back.
    fs::write(&path, "# Back").await?;

    let res = reqwest::get(&url).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await?.contains("<h1>Back</h1>"));

    Ok(())
}

#[tokio::test]
async fn reload_endpoint_inactive_without_watching() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("talk.md");
    fs::write(&path, "# Hi").await?;

    let server = bind_localhost(ServerParam::new(&path))?;

    let res = reqwest::get(&format!("http://{}/reload", server.addr())).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // And the page doesn't ask browsers to open one.
    let body = reqwest::get(&format!("http://{}", server.addr()))
        .await?
        .text()
        .await?;
    assert!(!body.contains("WebSocket"));

    Ok(())
}
