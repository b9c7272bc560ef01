use actix_web::{middleware, web, App, HttpServer};

use api_server::config::{build_cors, AppState, ServerConfig};
use api_server::response::json_fallback;
use api_server::routes;
use api_server::store::ScoreStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ServerConfig::from_env();
    let store = ScoreStore::open(&config.data_dir).map_err(std::io::Error::other)?;
    let state = AppState::new(store, config.default_limit);

    tracing::info!(
        "starting arcade leaderboard api: bind_addr={} data_dir={} json_limit={} default_limit={} origins={:?}",
        config.bind_addr,
        config.data_dir.display(),
        config.json_limit,
        config.default_limit,
        config.allowed_origins
    );

    let origins = config.allowed_origins.clone();
    let json_limit = config.json_limit;
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::PayloadConfig::new(json_limit))
            .wrap(build_cors(&origins))
            .wrap(json_fallback())
            .wrap(middleware::Logger::default())
            .configure(routes)
    });
    if let Some(workers) = config.http_workers {
        server = server.workers(workers);
    }

    server.bind(&config.bind_addr)?.run().await
}
