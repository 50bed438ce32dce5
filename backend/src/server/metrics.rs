//! Optional Prometheus request metrics.

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use futures_util::future::LocalBoxFuture;
use std::sync::Arc;
use tracing::warn;

const NAMESPACE: &str = "citygrid";
const ENDPOINT: &str = "/metrics";

/// Build the Prometheus middleware; a registration failure disables metrics
/// rather than aborting startup.
pub(crate) fn make_metrics() -> Option<PrometheusMetrics> {
    match PrometheusMetricsBuilder::new(NAMESPACE)
        .endpoint(ENDPOINT)
        .build()
    {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "metrics disabled");
            None
        }
    }
}

/// Either the Prometheus middleware or a pass-through, so the app type is
/// the same with and without metrics.
#[derive(Clone)]
pub(crate) enum MetricsLayer {
    Enabled(Arc<PrometheusMetrics>),
    Disabled,
}

impl MetricsLayer {
    #[must_use]
    pub(crate) fn from_option(metrics: Option<PrometheusMetrics>) -> Self {
        metrics.map_or(Self::Disabled, |metrics| Self::Enabled(Arc::new(metrics)))
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        match self {
            Self::Enabled(metrics) => {
                let fut = Compat::new((**metrics).clone()).new_transform(service);
                Box::pin(async move { Ok(boxed::service(fut.await?)) })
            }
            Self::Disabled => {
                let svc = service.map(|res: ServiceResponse<B>| res.map_into_boxed_body());
                Box::pin(async move { Ok(boxed::service(svc)) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    #[rstest]
    #[case(true, StatusCode::OK)]
    #[case(false, StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn endpoint_exists_only_when_enabled(#[case] enabled: bool, #[case] expected: StatusCode) {
        let layer = MetricsLayer::from_option(enabled.then(make_metrics).flatten());
        let app = test::init_service(
            App::new()
                .wrap(layer)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri(ENDPOINT).to_request()).await;
        assert_eq!(res.status(), expected);
    }
}
