use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, Reply};
use warp::Filter;

use super::response::{Envelope, SuccessResponse};

/// Reports the running build.
pub fn make_healthz_route(
) -> impl Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone {
    warp::path("healthz")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| {
            json(&Envelope::new(SuccessResponse::Healthz {
                revision: info::REVISION,
                timestamp: info::BUILD_TIMESTAMP,
                version: info::VERSION,
            }))
        })
}

pub type TerminationFuture = BoxFuture<'static, ()>;

pub type TerminationFunctionWrapper = Arc<dyn Fn() -> TerminationFuture + Send + Sync>;

/// Calls `terminate` and answers once it has finished.
pub fn make_termination_route(
    terminate: TerminationFunctionWrapper,
) -> impl Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone {
    let handler = move || -> BoxFuture<'static, Result<StatusCode, std::convert::Infallible>> {
        let terminate = terminate.clone();

        async move {
            terminate().await;
            Ok(StatusCode::NO_CONTENT)
        }
        .boxed()
    };

    warp::path("terminate")
        .and(warp::path::end())
        .and(warp::post())
        .and_then(handler)
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use futures::future::FutureExt;
    use warp::http::StatusCode;

    use super::{make_healthz_route, make_termination_route};

    #[tokio::test]
    async fn healthz_reports_the_version() {
        let response = warp::test::request()
            .method("GET")
            .path("/healthz")
            .reply(&make_healthz_route())
            .await;

        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["version"], info::VERSION);
    }

    #[tokio::test]
    async fn terminate_runs_the_callback() {
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();

        let route = make_termination_route(Arc::new(move || {
            let flag = flag.clone();
            async move { flag.store(true, Ordering::SeqCst) }.boxed()
        }));

        let response = warp::test::request()
            .method("POST")
            .path("/terminate")
            .reply(&route)
            .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(called.load(Ordering::SeqCst));
    }
}
