use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use opentelemetry::{KeyValue, global, trace::TraceError};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    runtime,
    trace::{RandomIdGenerator, Sampler, Tracer},
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use std::time::Instant;
use tracing::{Instrument, debug, error, info, info_span, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, filter::LevelFilter, fmt, layer::SubscriberExt,
    util::SubscriberInitExt,
};
use uuid::Uuid;

const LOG_DIR: &str = "storage/logs";

/// Logs every request inside a span carrying a request id, which is also
/// returned in the `x-request-id` header.
///
/// Redirects are logged at debug: the gate's login and default-page
/// redirects are expected outcomes, not failures.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let request_id = Uuid::new_v4();

    let span = info_span!("request", %request_id, %method, %path);

    async move {
        debug!("Incoming request");

        let mut response = next.run(req).await;
        let status = response.status().as_u16();
        let latency_ms = start.elapsed().as_millis() as u64;

        match status {
            500..=599 => error!(status, latency_ms, "Server error"),
            400..=499 => warn!(status, latency_ms, "Client error"),
            300..=399 => debug!(status, latency_ms, "Redirected"),
            _ => info!(status, latency_ms, "Request completed"),
        }

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert("x-request-id", value);
        }
        response
    }
    .instrument(span)
    .await
}

fn environment() -> String {
    std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

/// OTLP span exporter over gRPC. Fails when the pipeline cannot be built;
/// an unreachable collector only surfaces later as export errors.
fn init_tracer() -> Result<Tracer, TraceError> {
    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4317".to_string());

    global::set_text_map_propagator(TraceContextPropagator::new());

    let trace_config = opentelemetry_sdk::trace::Config::default()
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(Resource::new([
            KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
            KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
            KeyValue::new("deployment.environment", environment()),
        ]));

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(trace_config)
        .install_batch(runtime::Tokio)
}

fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=info,shoky_auth=info,shoky_access=info,tower_http=warn,sqlx=warn",
            env!("CARGO_CRATE_NAME")
        ))
    })
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Console, `shoky.log` (errors only) and `shoky.json` (info and up), all
/// rotated daily under `storage/logs`.
fn local_layers() -> Vec<BoxedLayer> {
    if let Err(e) = std::fs::create_dir_all(LOG_DIR) {
        eprintln!("Failed to create {LOG_DIR}: {e}");
    }

    let console = fmt::layer()
        .with_target(false)
        .compact()
        .with_filter(console_filter())
        .boxed();

    let errors = fmt::layer()
        .with_writer(RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "shoky.log"))
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(LevelFilter::ERROR)
        .boxed();

    let json = fmt::layer()
        .json()
        .with_writer(RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "shoky.json"))
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(LevelFilter::INFO)
        .boxed();

    vec![console, errors, json]
}

/// Installs the global subscriber. The OpenTelemetry layer is added when the
/// exporter starts; otherwise logging continues locally.
pub fn init_tracing() {
    let mut layers = local_layers();

    let otel_error = match init_tracer() {
        Ok(tracer) => {
            layers.push(tracing_opentelemetry::layer().with_tracer(tracer).boxed());
            None
        }
        Err(e) => Some(e),
    };

    tracing_subscriber::registry().with(layers).init();

    match otel_error {
        None => info!(environment = %environment(), "Tracing initialized with OpenTelemetry"),
        Some(e) => warn!(error = %e, "OpenTelemetry unavailable, logging to console and files only"),
    }
}

/// Flushes pending spans before exit.
pub async fn shutdown_tracer() {
    info!("Shutting down OpenTelemetry tracer");
    global::shutdown_tracer_provider();
}
