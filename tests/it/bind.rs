use std::error::Error;

use matches::assert_matches;
use tempfile::tempdir;
use tokio::fs;

use podium::{Server, ServerParam};

use crate::bind_localhost;

#[tokio::test]
async fn port_zero_assigns_a_port() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("talk.md");
    fs::write(&path, "# Hi").await?;

    let server = bind_localhost(ServerParam::new(&path))?;
    assert_ne!(server.addr().port(), 0);

    Ok(())
}

#[tokio::test]
async fn busy_port_fails_immediately() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("talk.md");
    fs::write(&path, "# Hi").await?;

    let first = bind_localhost(ServerParam::new(&path))?;

    // No port hunting: binding the same port again is an error, not a retry.
    let result = Server::bind(&first.addr(), ServerParam::new(&path));
    assert_matches!(result, Err(podium::Error::Bind { addr, .. }) if addr == first.addr());

    // The original server is unaffected.
    let res = reqwest::get(&format!("http://{}", first.addr())).await?;
    assert!(res.status().is_success());

    Ok(())
}
