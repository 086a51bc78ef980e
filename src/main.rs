use std::error::Error;
use std::sync::Arc;

use futures::future::FutureExt;
use log::{info, initialize_logger};
use tokio::sync::mpsc;

use sleep_sounds::config::{get_optional_variable, get_variable, StoreKind};
use sleep_sounds::db::{memory::MemoryDb, Db, PgDb};
use sleep_sounds::environment::Environment;
use sleep_sounds::routes;
use sleep_sounds::urls::Urls;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    // with `env_logging`, `RUST_LOG` filters our records as well as warp's
    #[cfg(feature = "env_logging")]
    let (_guard, logger) = match log::initialize_env_logger() {
        Some(guard) => (Some(guard), log::scoped_logger()),
        None => (None, initialize_logger()),
    };

    #[cfg(not(feature = "env_logging"))]
    let logger = initialize_logger();

    let main_port: u16 = get_variable("BACKEND_PORT")
        .parse()
        .expect("parse BACKEND_PORT as u16");
    let admin_port: u16 = get_variable("BACKEND_ADMIN_PORT")
        .parse()
        .expect("parse BACKEND_ADMIN_PORT as u16");
    let store_kind: StoreKind = get_optional_variable("BACKEND_STORE", "postgres")
        .parse()
        .expect("parse BACKEND_STORE as postgres or memory");

    info!(logger, "Starting...";
        "main_port" => main_port,
        "admin_port" => admin_port,
        "store" => ?store_kind);
    let logger = Arc::new(logger);

    let db: Arc<dyn Db + Send + Sync> = match store_kind {
        StoreKind::Postgres => {
            info!(logger, "Creating database pool...");
            let connection_string = get_variable("BACKEND_DB_CONNECTION_STRING");
            let pool = sqlx::Pool::connect(&connection_string)
                .await
                .expect("create database pool from BACKEND_DB_CONNECTION_STRING");

            Arc::new(PgDb::new(pool))
        }
        StoreKind::Memory => Arc::new(MemoryDb::new()),
    };

    let urls =
        Arc::new(Urls::new(get_variable("BACKEND_BASE_URL")).expect("parse BACKEND_BASE_URL"));
    let environment = Environment::new(logger.clone(), db, urls);

    let (termination_sender, mut termination_receiver) = mpsc::channel::<()>(1);

    let terminate: routes::admin::TerminationFunctionWrapper = Arc::new(move || {
        let termination_sender = termination_sender.clone();

        async move {
            // a closed channel means shutdown is already under way
            termination_sender.send(()).await.ok();
        }
        .boxed()
    });

    let should_terminate = async move {
        termination_receiver.recv().await;
    }
    .shared();

    let ctrlc = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let signal = tokio::signal::ctrl_c();

        async move {
            tokio::select! {
                _ = should_terminate => {},
                _ = signal => {
                    terminate().await;
                }
            }
        }
    };

    let main_server = {
        let should_terminate = should_terminate.clone();

        let (_, main_server) = warp::serve(routes::api(environment))
            .bind_with_graceful_shutdown(([0, 0, 0, 0], main_port), async move {
                should_terminate.await;
            });

        main_server
    };

    let admin_server = {
        use warp::Filter;

        let should_terminate = should_terminate.clone();

        let routes = routes::admin::make_healthz_route()
            .or(routes::admin::make_termination_route(terminate));

        let (_, admin_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], admin_port), async move {
                should_terminate.await;
            });

        admin_server
    };

    tokio::join!(ctrlc, main_server, admin_server);

    info!(logger, "Exiting gracefully...");

    Ok(())
}
