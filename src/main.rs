use std::net::{SocketAddr, UdpSocket};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use podium::{RevealOptions, Server, ServerParam, Theme};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The markdown file to present.
    file: Option<PathBuf>,

    /// TCP port for the server.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Slide theme, or the path of a CSS file. Bundled themes: beige, black,
    /// blood, league, moon, night, serif, simple, sky, solarized, and white.
    #[arg(long, default_value = "black")]
    theme: String,

    /// Transition effect for slides: default, cube, page, concave, zoom,
    /// linear, fade, none.
    #[arg(long, default_value = "default")]
    transition: String,

    /// Watch the markdown file and reload open browsers on change.
    #[arg(long)]
    watch: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let file = match cli.file {
        Some(file) => file,
        None => {
            // No input file is not an error: show usage and exit cleanly.
            let _ = Cli::command().print_help();
            return ExitCode::SUCCESS;
        }
    };

    match run(file, cli.port, &cli.theme, &cli.transition, cli.watch).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(
    file: PathBuf,
    port: u16,
    theme: &str,
    transition: &str,
    watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // A theme value naming an existing file is a user stylesheet; anything
    // else is treated as a bundled theme name.
    let theme = if Path::new(theme).is_file() {
        Theme::custom(theme)?
    } else {
        Theme::bundled(theme)
    };

    let mut reveal_options = RevealOptions::new();
    reveal_options.set("transition", format!("'{}'", transition))?;

    let mut param = ServerParam::new(file);
    param.theme = theme;
    param.host = local_ip().unwrap_or_else(|| String::from("localhost"));
    param.watch = watch;
    param.reveal_options = reveal_options;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let server = Server::bind(&addr, param)?;

    println!(
        "accepting connections at http://{}:{}",
        server.param().host,
        server.addr().port()
    );

    tokio::signal::ctrl_c().await?;

    // Dropping the server closes reload channels and drains in-flight
    // requests before the process exits.
    drop(server);

    Ok(())
}

/// Best-effort discovery of a non-loopback address to print at startup, so
/// the URL works from other devices on the network. No packets are sent;
/// connecting a UDP socket just selects a route.
fn local_ip() -> Option<String> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    let addr = socket.local_addr().ok()?;

    if addr.ip().is_loopback() {
        None
    } else {
        Some(addr.ip().to_string())
    }
}
