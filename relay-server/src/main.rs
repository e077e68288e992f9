use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use relay_server::agent::OpenAiAgent;
use relay_server::routes::{create_router, SharedAgent};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let agent: SharedAgent = Arc::new(OpenAiAgent::from_env());

    // Local UI hosts only. Methods and headers are mirrored rather than
    // wildcarded because credentials are allowed.
    let cors = CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost"),
            HeaderValue::from_static("http://localhost:8501"),
        ])
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    let app = create_router().with_state(agent).layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8000));
    info!("Relay service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
