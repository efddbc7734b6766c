mod handlers;
mod inference;
mod models;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let inference_url = std::env::var("INFERENCE_URL")
        .unwrap_or_else(|_| inference::DEFAULT_INFERENCE_URL.to_string());
    let bind_address = format!("{}:{}", host, port);

    info!("Server running at http://{}", bind_address);
    info!("Forwarding predictions to {}", inference_url);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(inference::InferenceForwarder::new(
                inference_url.clone(),
            )))
            .route("/", web::get().to(handlers::root))
            .service(web::resource("/predict").route(web::post().to(handlers::predict)))
            .service(web::resource("/files/").route(web::post().to(handlers::batch_predict)))
    })
    .bind(&bind_address)?
    .run()
    .await
}
