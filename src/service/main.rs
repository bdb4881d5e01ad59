use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fedhub::api;
use fedhub::services::AppServices;
use fedhub::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;

    let telemetry = match &settings.jaeger_service_name {
        Some(service_name) => {
            let tracer = opentelemetry_jaeger::new_agent_pipeline()
                .with_service_name(service_name.clone())
                .install_simple()?;

            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(telemetry)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    let services = match &settings.database_url {
        Some(database_url) => {
            let db = Arc::new(
                PgPoolOptions::new()
                    .max_connections(settings.max_connections)
                    .connect(database_url)
                    .await?,
            );

            sqlx::migrate!().run(&*db).await?;

            AppServices::relational(db, &settings)
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, storing everything in memory");

            AppServices::memory(&settings)
        }
    };

    let addr: SocketAddr = settings.endpoint.parse()?;

    tracing::info!(
        attach_policy = ?settings.attach_policy,
        environment_match = ?settings.environment_match,
        "api listening on {addr}"
    );

    axum::Server::bind(&addr)
        .serve(api::router(services).into_make_service())
        .await?;

    opentelemetry::global::shutdown_tracer_provider();

    Ok(())
}
