use std::{net::SocketAddr, time::Duration};

use axum::{
    body::Body,
    http::{header, HeaderName, Method, Request, Response},
    middleware, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    trace::{MakeSpan, OnRequest, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::App;

use super::{midware, routes::routes, WebResult, REQUEST_ID_HEADER};

/// The core async function returning a future that will serve this application.
///
/// Accepts an `App` and sets up the middleware stack: request ids, tracing,
/// error mapping, CORS and the static SPA fallback.
pub async fn serve(app: App) -> WebResult<()> {
    let App {
        app_state,
        listener,
    } = app;
    let x_request_id: HeaderName = HeaderName::from_static(REQUEST_ID_HEADER);

    let trace_layer = build_trace_layer();
    let cors = build_cors(&app_state.cors_allow_origins);

    // Non-API paths serve the single-page application bundle; unknown paths
    // fall back to its index so client-side routing keeps working.
    let spa = ServeDir::new(&app_state.static_dir)
        .not_found_service(ServeFile::new(app_state.static_dir.join("index.html")));

    let app = Router::new()
        .merge(routes(app_state))
        .fallback_service(spa)
        .layer(
            ServiceBuilder::new()
                // Set UUID per request
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                .layer(trace_layer)
                // This has to be in front of the Propagation layer because while the request goes through
                // middleware as listed in the ServiceBuilder, the response goes through the middleware stack from the bottom up.
                // If we want the response mapper to find the Propagated header that middleware has to run first!
                .layer(middleware::map_response(midware::response_mapper))
                // Propagate UUID to response, keep it last so it processes the response first!
                .layer(PropagateRequestIdLayer::new(x_request_id))
                .layer(cors),
        );

    // ConnectInfo provides the peer address handlers fall back to when no
    // forwarding headers are present.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// A helper function that sets up the `tower_http::TraceLayer` - tracing configuration.
fn build_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    impl MakeSpan<Body> + Clone,
    impl OnRequest<Body> + Clone,
    impl OnResponse<Body> + Clone,
> {
    TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            let uuid = req
                .headers()
                .get(REQUEST_ID_HEADER)
                .map(|uuid| uuid.to_str().unwrap_or("").to_string());

            tracing::error_span!(
                "serve",
                id = uuid,
                method = req.method().to_string(),
                path = req.uri().path()
            )
        })
        .on_request(|req: &Request<Body>, _s: &Span| tracing::info!("START @ {}", req.uri()))
        .on_response(|res: &Response<Body>, latency: Duration, _s: &Span| {
            let st_code = res.status().as_u16();

            if (400..=599).contains(&st_code) {
                tracing::error!("END in: {:?} — STATUS: {st_code}", latency)
            } else {
                tracing::info!("END in: {:?} — STATUS: {st_code}", latency)
            }
        })
}

/// CORS from config: an explicit allow-list of origins, or any origin when
/// the list is empty.
fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-utm-source"),
            HeaderName::from_static("x-utm-medium"),
            HeaderName::from_static("x-utm-campaign"),
        ]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(parsed)
    }
}
