use std::sync::Arc;

use log::{error, Logger};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_status, Json, Reply, WithStatus};
use warp::Filter;

use crate::environment::Environment;
use crate::errors::ErrorKind;

pub mod admin;
mod handlers;
mod query;
mod rejection;
mod response;

pub use internal::*;

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<WithStatus<Json>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let status = status_code_for(r.error.kind());
        error!(logger, "Backend error";
            "context" => ?r.context,
            "error" => ?r.error,
            "status" => %status,
            "message" => %r.error);
        let flattened = r.flatten();

        return Ok(with_status(json(&flattened), status));
    }

    Err(rej)
}

fn status_code_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict | ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The whole public API, with errors rendered as JSON envelopes and
/// cross-origin requests allowed from anywhere.
pub fn api(
    environment: Environment,
) -> impl Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone {
    let logger = environment.logger.clone();

    // `/sounds/popular` and `/sounds/initialize` must come before the
    // routes taking an ID
    make_status_route(environment.clone())
        .or(make_list_route(environment.clone()))
        .or(make_popular_route(environment.clone()))
        .or(make_category_route(environment.clone()))
        .or(make_retrieve_route(environment.clone()))
        .or(make_create_route(environment.clone()))
        .or(make_initialize_route(environment.clone()))
        .or(make_update_route(environment.clone()))
        .or(make_delete_route(environment.clone()))
        .or(make_play_route(environment.clone()))
        .or(make_register_route(environment.clone()))
        .or(make_lookup_route(environment))
        .recover(move |r| format_rejection(logger.clone(), r))
        .with(cors())
}

fn cors() -> warp::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allow_headers(vec!["content-type"])
}

mod internal {
    use warp::filters::BoxedFilter;
    use warp::path::end;
    use warp::Filter;
    use warp::Reply;
    use warp::{body::bytes, delete, get as g, path as p, path::param as par, post, put, query};

    use super::{handlers, query as q};
    use crate::environment::Environment;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    macro_rules! route_filter {
    ($route_variable:ident; $first:expr) => (let $route_variable = $route_variable.and($first););
    ($route_variable:ident; $first:expr, $($rest:expr),+) => (
        let $route_variable = $route_variable.and($first);
        route_filter!($route_variable; $($rest),+);
    )
}

    macro_rules! route {
    ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
        pub fn $name(environment: Environment) -> Route {
            let $route_variable = warp::any()
                .map(move || environment.clone());

            route_filter!($route_variable; $($filters),+);

            $route_variable.and_then(handlers::$handler)
                .boxed()
        }
    );
}

    route!(make_status_route => status, rt; end(), g());
    route!(make_list_route => list, rt; p("sounds"), end(), g(), query::<q::ListQuery>());
    route!(make_popular_route => popular, rt; p!("sounds" / "popular"), end(), g());
    route!(make_category_route => category, rt; p!("sounds" / "category" / String), end(), g());
    route!(make_retrieve_route => retrieve, rt; p("sounds"), par::<String>(), end(), g());
    route!(make_create_route => create, rt; p("sounds"), end(), post(), bytes());
    route!(make_initialize_route => initialize, rt; p!("sounds" / "initialize"), end(), post());
    route!(make_update_route => update, rt; p("sounds"), par::<String>(), end(), put(), bytes());
    route!(make_delete_route => delete, rt; p("sounds"), par::<String>(), end(), delete());
    route!(make_play_route => play, rt; p!("sounds" / String / "play"), end(), post());
    route!(make_register_route => register, rt; p("users"), end(), post(), bytes());
    route!(make_lookup_route => lookup, rt; p("users"), par::<String>(), end(), g());
}
