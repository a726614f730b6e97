use std::net::SocketAddr;

use podium::{Server, ServerParam};

mod assets;
mod bind;
mod deck;

fn bind_localhost(param: ServerParam) -> anyhow::Result<Server> {
    let addr = "127.0.0.1:0".parse::<SocketAddr>()?;
    Ok(Server::bind(&addr, param)?)
}
