use std::sync::Arc;

use log::Logger;

use crate::catalog::SoundCatalog;
use crate::db::Db;
use crate::registry::UserRegistry;
use crate::urls::Urls;

/// Everything a request handler needs, cloned into each route.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub sounds: Arc<SoundCatalog>,
    pub users: Arc<UserRegistry>,
    pub urls: Arc<Urls>,
}

impl Environment {
    /// Both services share `db`.
    pub fn new(logger: Arc<Logger>, db: Arc<dyn Db + Send + Sync>, urls: Arc<Urls>) -> Self {
        Self {
            logger,
            sounds: Arc::new(SoundCatalog::new(db.clone())),
            users: Arc::new(UserRegistry::new(db)),
            urls,
        }
    }
}
