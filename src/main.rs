use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use env_logger::Env;
use log::info;
use tokio::net::TcpListener;

use shotlink::config::Settings;
use shotlink::db::database::Database;
use shotlink::engine::FlightModel;
use shotlink::hub::ShotHub;
use shotlink::routes;
use shotlink::server::{self, OpenApiOptions};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let settings = Settings::from_env()?;
    let db = Database::new(&settings.db_path)
        .with_context(|| format!("opening shot history at {}", settings.db_path))?;

    let hub = web::Data::new(ShotHub::new(
        Arc::new(FlightModel::default()),
        db,
        settings.feed_capacity,
    ));
    hub.set_left_handed(settings.left_handed);

    let native_listener = TcpListener::bind(settings.shot_server_addr)
        .await
        .with_context(|| format!("binding native shot server on {}", settings.shot_server_addr))?;
    let openapi_listener = TcpListener::bind(settings.openapi_addr)
        .await
        .with_context(|| format!("binding OpenAPI server on {}", settings.openapi_addr))?;

    let native = server::run_native(native_listener, hub.clone().into_inner());
    let openapi = server::run_openapi(
        openapi_listener,
        hub.clone().into_inner(),
        OpenApiOptions {
            handshake: settings.openapi_handshake,
            game_id: settings.openapi_game_id.clone(),
        },
    );

    info!("Status server listening on http://{}", settings.http_addr);
    hub.register_listener(format!("http {}", settings.http_addr));
    let http = HttpServer::new(move || {
        App::new()
            .app_data(hub.clone())
            .configure(routes::setup_routes)
    })
    .bind(settings.http_addr)?
    .run();

    futures::try_join!(native, openapi, http)?;
    Ok(())
}
