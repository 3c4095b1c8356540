use crate::db::{DbPool, OrmConn};
use crate::storage::ImageStore;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub images: ImageStore,
}
