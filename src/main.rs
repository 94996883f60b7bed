use std::net::SocketAddr;
use tokio::net::TcpListener;

use bookmarks::config::{self, Config};
use bookmarks::{build_app, cli, db, AppState};

const USAGE: &str = "usage: bookmarks [serve | import <file.json>]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["serve"] => serve().await,
        ["import", file] => {
            let pool = db::init_pool(&config::database_url()).await?;
            let imported = cli::import_bookmarks(&pool, file).await?;
            println!("Imported {imported} bookmarks");
            Ok(())
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}

async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let pool = db::init_pool(&config.database_url).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    if !config.production {
        tracing::info!("request timing enabled");
    }

    let state = AppState::new(pool, config).await?;
    let app = build_app(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
