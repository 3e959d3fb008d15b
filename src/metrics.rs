use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tracing::error;

use shoky_access::GuardDecision;
use shoky_auth::AuthState;
use shoky_models::Role;

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// `OBSERVABILITY_ENABLED=false` (or `0`) turns every recorder into a no-op.
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| !(v.eq_ignore_ascii_case("false") || v == "0"))
            .unwrap_or(true)
    })
}

/// Installs the Prometheus recorder and its upkeep task.
///
/// Returns `None` when observability is disabled or the recorder could not
/// be installed; the server then runs without `/metrics`.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if !is_observability_enabled() {
        return None;
    }

    let installed = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("shoky_http_request_duration_seconds".to_string()),
            LATENCY_BUCKETS,
        )
        .and_then(|builder| builder.install_recorder());

    let handle = match installed {
        Ok(handle) => handle,
        Err(e) => {
            error!(error = %e, "Failed to install Prometheus recorder, metrics disabled");
            return None;
        }
    };

    let upkeep = handle.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(5));
        loop {
            interval.tick().await;
            upkeep.run_upkeep();
        }
    });

    Some(handle)
}

fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Request count, latency and in-flight gauge, labelled by matched route.
/// Gate redirects show up as `3xx`.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let in_flight = gauge!("shoky_http_requests_in_flight");
    in_flight.increment(1.0);
    let response = next.run(req).await;
    in_flight.decrement(1.0);

    let status = response.status().as_u16();
    counter!(
        "shoky_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status_class(status)
    )
    .increment(1);
    histogram!("shoky_http_request_duration_seconds", "method" => method, "route" => route)
        .record(start.elapsed().as_secs_f64());

    response
}

pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

macro_rules! record {
    ($($body:tt)*) => {
        if is_observability_enabled() {
            $($body)*
        }
    };
}

pub fn track_login_success() {
    record!(counter!("shoky_logins_total", "outcome" => "success").increment(1));
}

pub fn track_login_failure(reason: &'static str) {
    record!(counter!("shoky_logins_total", "outcome" => "failure", "reason" => reason).increment(1));
}

pub fn track_session_issued() {
    record!(counter!("shoky_sessions_issued_total").increment(1));
}

pub fn track_session_revoked() {
    record!(counter!("shoky_sessions_revoked_total").increment(1));
}

pub fn track_guard_decision(path: &'static str, decision: GuardDecision) {
    record!(
        counter!("shoky_guard_decisions_total", "path" => path, "decision" => decision.as_str())
            .increment(1)
    );
}

/// Resolution outcome per request; `reason` is only set for a missing profile.
pub fn track_profile_resolution(state: &AuthState) {
    let reason = match state {
        AuthState::ProfileMissing { reason, .. } => reason.as_str(),
        _ => "",
    };
    record!(
        counter!(
            "shoky_profile_resolutions_total",
            "status" => state.status().as_str(),
            "reason" => reason
        )
        .increment(1)
    );
}

pub fn track_member_created(role: Role) {
    record!(counter!("shoky_members_created_total", "role" => role.as_str()).increment(1));
}

pub fn track_role_upgrade() {
    record!(counter!("shoky_role_upgrades_total").increment(1));
}
