//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, UpstreamConfig};

use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};

use surflog::Trace;
#[cfg(debug_assertions)]
use surflog::doc::ApiDoc;
use surflog::domain::ports::UpstreamHttp;
use surflog::inbound::http;
use surflog::inbound::http::health::{HealthState, live, ready};
use surflog::inbound::http::state::HttpState;
use surflog::outbound::surf_api::ReqwestUpstreamHttp;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(http::configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// Readiness flips once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when the HTTP client cannot be built or the
/// socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let upstream: Arc<dyn UpstreamHttp> = Arc::new(
        ReqwestUpstreamHttp::new()
            .map_err(|err| std::io::Error::other(format!("HTTP client build failed: {err}")))?,
    );
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let http_state = web::Data::new(build_http_state(&config, upstream, clock));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(config.bind_addr())?
    .run();

    health_state.mark_ready();
    Ok(server)
}
