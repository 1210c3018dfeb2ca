use std::sync::Arc;

use sqlx::PgPool;

use super::{
    config::Config,
    database::{init_pool, initialize_database},
    error::AppError,
};

pub struct State {
    pub config: Config,
    pub pool: PgPool,
}

impl State {
    pub async fn new() -> Result<Arc<Self>, AppError> {
        let config = Config::load();

        let pool = init_pool(&config).await?;
        initialize_database(&pool).await?;

        Ok(Arc::new(Self { config, pool }))
    }
}
