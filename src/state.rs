use std::sync::Arc;

use sqlx::PgPool;

use crate::users::repo::{PgUserRepository, UserRepository};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn from_pool(db: PgPool) -> Self {
        Self::from_repo(Arc::new(PgUserRepository::new(db)))
    }

    pub fn from_repo(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::from_repo(Arc::new(crate::users::memory::MemoryUserRepository::new()))
    }
}
