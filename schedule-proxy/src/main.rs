use std::{env, io};

use log::info;
use tokio::{net::TcpListener, signal};

mod cli;
mod routes;

fn setup_logging() {
    if env::var("LOG").is_err() {
        env::set_var("LOG", "schedule_proxy=info,schedule_parser=info");
    }

    pretty_env_logger::init_custom_env("LOG");
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = cli::parse(env::args().skip(1).collect());

    setup_logging();

    let state = routes::AppState::new(args.enable_cache.then_some(args.cache_capacity));

    let listener = TcpListener::bind(args.address).await?;
    info!("Listening at http://{}", args.address);

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
}
