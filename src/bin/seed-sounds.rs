use std::error::Error;
use std::sync::Arc;

use dotenv::dotenv;
use log::{info, initialize_logger, o};
use structopt::StructOpt;

use sleep_sounds::catalog::{Seeding, SoundCatalog};
use sleep_sounds::config::get_variable;
use sleep_sounds::db::PgDb;
use sleep_sounds::sound::SoundRecord;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "seed-sounds",
    about = "Insert the built-in sleep sounds into an empty database"
)]
struct Opt {
    /// Remove every existing sound first
    #[structopt(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let opt = Opt::from_args();

    let logger = initialize_logger().new(o!("tool" => "seed-sounds"));

    let connection_string = get_variable("BACKEND_DB_CONNECTION_STRING");
    let pool = sqlx::Pool::connect(&connection_string)
        .await
        .expect("create database pool from BACKEND_DB_CONNECTION_STRING");
    let catalog = SoundCatalog::new(Arc::new(PgDb::new(pool)));

    if opt.reset {
        info!(logger, "Removing existing sounds...");
        let (removed, inserted) = catalog.reset().await?;
        info!(logger, "Removed {} sounds", removed);
        print_inserted(&inserted);

        return Ok(());
    }

    match catalog.seed().await? {
        Seeding::AlreadySeeded(count) => {
            info!(logger, "Database already contains {} sounds, nothing to do", count);
            println!("Database already contains {} sounds. Use --reset to replace them.", count);
        }
        Seeding::Inserted(inserted) => print_inserted(&inserted),
    }

    Ok(())
}

fn print_inserted(sounds: &[SoundRecord]) {
    println!("Inserted {} sounds:", sounds.len());

    for sound in sounds {
        println!("  {} ({})", sound.metadata.title, sound.metadata.category);
    }
}
