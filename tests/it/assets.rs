use std::error::Error;

use reqwest::StatusCode;
use tempfile::tempdir;
use tokio::fs;

use podium::{ServerParam, Theme};

use crate::bind_localhost;

#[tokio::test]
async fn bundled_assets_have_content_types() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("talk.md");
    fs::write(&path, "# Hi").await?;

    let server = bind_localhost(ServerParam::new(&path))?;
    let addr = server.addr();

    let res = reqwest::get(&format!("http://{}/_static/css/deck.css", addr)).await?;
    assert!(res.status().is_success());
    assert_eq!(res.headers()["Content-Type"], "text/css");

    let res = reqwest::get(&format!("http://{}/_static/js/deck.js", addr)).await?;
    assert!(res.status().is_success());
    // mime-db has flip-flopped between application/javascript and
    // text/javascript across releases.
    assert!(res.headers()["Content-Type"]
        .to_str()?
        .contains("javascript"));

    let res = reqwest::get(&format!("http://{}/_static/css/theme/moon.css", addr)).await?;
    assert!(res.status().is_success());
    assert_eq!(res.headers()["Content-Type"], "text/css");

    Ok(())
}

#[tokio::test]
async fn missing_asset_is_not_fatal() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("talk.md");
    fs::write(&path, "# Hi").await?;

    let server = bind_localhost(ServerParam::new(&path))?;
    let addr = server.addr();

    let res = reqwest::get(&format!("http://{}/_static/js/does-not-exist.js", addr)).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The deck route keeps serving afterwards.
    let res = reqwest::get(&format!("http://{}", addr)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn custom_theme_served_from_disk() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("talk.md");
    fs::write(&path, "# Hi").await?;

    let theme_path = dir.path().join("mine.css");
    fs::write(&theme_path, "body { background: hotpink; }").await?;

    let mut param = ServerParam::new(&path);
    param.theme = Theme::custom(&theme_path)?;
    let server = bind_localhost(param)?;

    let body = reqwest::get(&format!("http://{}", server.addr()))
        .await?
        .text()
        .await?;
    assert!(body.contains(r#"href="/theme.css""#));

    let res = reqwest::get(&format!("http://{}/theme.css", server.addr())).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["Content-Type"], "text/css");
    assert_eq!(res.text().await?, "body { background: hotpink; }");

    Ok(())
}

#[tokio::test]
async fn theme_route_inactive_for_bundled_themes() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("talk.md");
    fs::write(&path, "# Hi").await?;

    let server = bind_localhost(ServerParam::new(&path))?;

    let res = reqwest::get(&format!("http://{}/theme.css", server.addr())).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn files_next_to_the_deck_are_served() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("talk.md");
    fs::write(&path, "![diagram](diagram.png)").await?;
    fs::write(dir.path().join("diagram.png"), b"not a real png".as_slice()).await?;

    let server = bind_localhost(ServerParam::new(&path))?;

    let res = reqwest::get(&format!("http://{}/diagram.png", server.addr())).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["Content-Type"], "image/png");
    assert_eq!(res.bytes().await?.as_ref(), b"not a real png");

    Ok(())
}

#[tokio::test]
async fn missing_sibling_file_is_404() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("talk.md");
    fs::write(&path, "# Hi").await?;

    let server = bind_localhost(ServerParam::new(&path))?;

    let res = reqwest::get(&format!("http://{}/non-existent", server.addr())).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn unknown_custom_theme_path_is_a_startup_error() {
    use matches::assert_matches;
    use podium::Error;

    assert_matches!(
        Theme::custom("/no/such/theme.css"),
        Err(Error::Theme { .. })
    );
}
