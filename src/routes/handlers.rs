use std::time::{Duration, Instant};

use bytes::Bytes;
use log::debug;
use serde::de::DeserializeOwned;
use warp::{
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Json, Reply, WithStatus},
};

use crate::catalog::{Seeding, SoundFilter};
use crate::environment::Environment;
use crate::errors::BackendError;
use crate::normalization::decode_path_segment;
use crate::routes::{
    query::ListQuery,
    rejection::{Context, Rejection},
    response::*,
};
use crate::sound::{SoundMetadata, SoundPatch};
use crate::user::Registration;

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($body:tt)+) => {{
        let start = Instant::now();

        // TODO when `try` blocks are stabilized, we can wrap the body
        // and return the headers even on errors
        let result = { $($body)+ };

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    }};
}

pub async fn status(_environment: Environment) -> RouteResult {
    timed! {
        reply(SuccessResponse::Message { message: STATUS_MESSAGE }, StatusCode::OK)
    }
}

pub async fn list(environment: Environment, query: ListQuery) -> RouteResult {
    timed! {
        let filter = SoundFilter::from(query);
        debug!(environment.logger, "Listing sounds..."; "filter" => ?filter);

        let data = environment
            .sounds
            .list(filter)
            .await
            .map_err(|e| Rejection::new(Context::list(), e))?;

        reply(SuccessResponse::Sounds { count: data.len(), data }, StatusCode::OK)
    }
}

pub async fn popular(environment: Environment) -> RouteResult {
    timed! {
        let data = environment
            .sounds
            .popular()
            .await
            .map_err(|e| Rejection::new(Context::popular(), e))?;

        reply(SuccessResponse::Sounds { count: data.len(), data }, StatusCode::OK)
    }
}

pub async fn category(environment: Environment, category: String) -> RouteResult {
    timed! {
        let error_handler =
            |e: BackendError| Rejection::new(Context::category(category.clone()), e);

        let category = decode_path_segment(&category).map_err(error_handler)?;
        debug!(environment.logger, "Listing category..."; "category" => &category);

        let data = environment
            .sounds
            .list_by_category(&category)
            .await
            .map_err(error_handler)?;

        reply(
            SuccessResponse::Category { category, count: data.len(), data },
            StatusCode::OK,
        )
    }
}

pub async fn retrieve(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::retrieve(id.clone()), e);

        let id = decode_path_segment(&id).map_err(error_handler)?;
        debug!(environment.logger, "Retrieving sound..."; "id" => &id);

        let data = environment.sounds.get(&id).await.map_err(error_handler)?;

        reply(SuccessResponse::Sound { message: None, data }, StatusCode::OK)
    }
}

pub async fn create(environment: Environment, body: Bytes) -> RouteResult {
    timed! {
        let metadata: SoundMetadata =
            parse_body(&body).map_err(|e| Rejection::new(Context::create(None), e))?;

        let id = metadata.id.clone();
        let error_handler = |e: BackendError| Rejection::new(Context::create(Some(id.clone())), e);
        debug!(environment.logger, "Creating sound..."; "id" => &id);

        let location = environment.urls.sound(&id).map_err(error_handler)?;
        let data = environment.sounds.create(metadata).await.map_err(error_handler)?;

        with_header(
            reply(
                SuccessResponse::Sound { message: Some(CREATED_MESSAGE), data },
                StatusCode::CREATED,
            ),
            "location",
            location.as_str(),
        )
    }
}

pub async fn initialize(environment: Environment) -> RouteResult {
    timed! {
        let seeding = environment
            .sounds
            .seed()
            .await
            .map_err(|e| Rejection::new(Context::initialize(), e))?;

        match seeding {
            Seeding::AlreadySeeded(count) => {
                debug!(environment.logger, "Store already seeded"; "count" => count);

                reply(
                    SuccessResponse::Seeded {
                        message: ALREADY_SEEDED_MESSAGE,
                        count: count as usize,
                        data: None,
                    },
                    StatusCode::OK,
                )
            }
            Seeding::Inserted(data) => {
                debug!(environment.logger, "Seeded store"; "count" => data.len());

                reply(
                    SuccessResponse::Seeded {
                        message: SEEDED_MESSAGE,
                        count: data.len(),
                        data: Some(data),
                    },
                    StatusCode::CREATED,
                )
            }
        }
    }
}

pub async fn update(environment: Environment, id: String, body: Bytes) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::update(id.clone()), e);

        let id = decode_path_segment(&id).map_err(error_handler)?;
        let patch: SoundPatch = parse_body(&body).map_err(error_handler)?;
        debug!(environment.logger, "Updating sound..."; "id" => &id);

        let data = environment
            .sounds
            .update(&id, patch)
            .await
            .map_err(error_handler)?;

        reply(
            SuccessResponse::Sound { message: Some(UPDATED_MESSAGE), data },
            StatusCode::OK,
        )
    }
}

pub async fn delete(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::delete(id.clone()), e);

        let id = decode_path_segment(&id).map_err(error_handler)?;
        debug!(environment.logger, "Deleting sound..."; "id" => &id);

        environment
            .sounds
            .soft_delete(&id)
            .await
            .map_err(error_handler)?;

        reply(SuccessResponse::Message { message: DELETED_MESSAGE }, StatusCode::OK)
    }
}

pub async fn play(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::play(id.clone()), e);

        let id = decode_path_segment(&id).map_err(error_handler)?;
        debug!(environment.logger, "Playing sound..."; "id" => &id);

        let data = environment.sounds.play(&id).await.map_err(error_handler)?;

        reply(
            SuccessResponse::Sound { message: Some(PLAYED_MESSAGE), data },
            StatusCode::OK,
        )
    }
}

pub async fn register(environment: Environment, body: Bytes) -> RouteResult {
    timed! {
        let registration: Registration =
            parse_body(&body).map_err(|e| Rejection::new(Context::register(None), e))?;

        let uid = registration.uid.clone();
        let error_handler =
            |e: BackendError| Rejection::new(Context::register(Some(uid.clone())), e);
        debug!(environment.logger, "Registering user..."; "uid" => &uid);

        let location = environment.urls.user(&uid).map_err(error_handler)?;
        let data = environment
            .users
            .register(registration)
            .await
            .map_err(error_handler)?;

        with_header(
            reply(
                SuccessResponse::User { message: Some(REGISTERED_MESSAGE), data },
                StatusCode::CREATED,
            ),
            "location",
            location.as_str(),
        )
    }
}

pub async fn lookup(environment: Environment, uid: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::lookup(uid.clone()), e);

        let uid = decode_path_segment(&uid).map_err(error_handler)?;
        debug!(environment.logger, "Looking up user..."; "uid" => &uid);

        let data = environment.users.lookup(&uid).await.map_err(error_handler)?;

        reply(SuccessResponse::User { message: None, data }, StatusCode::OK)
    }
}

fn reply(body: SuccessResponse, status: StatusCode) -> WithStatus<Json> {
    with_status(json(&Envelope::new(body)), status)
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, BackendError> {
    serde_json::from_slice(body).map_err(BackendError::MalformedBody)
}

fn format_server_timing(d: Duration) -> String {
    format!("handler;dur={}", d.as_millis())
}
