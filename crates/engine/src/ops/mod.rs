use sea_orm::DatabaseConnection;

use crate::{AlertThresholds, ResultEngine};

mod contributions;
mod guests;
mod stats;

pub use contributions::ContributionBoard;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    thresholds: AlertThresholds,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    thresholds: AlertThresholds,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the alert thresholds used by [`Engine::statistics`].
    pub fn thresholds(mut self, thresholds: AlertThresholds) -> EngineBuilder {
        self.thresholds = thresholds;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            thresholds: self.thresholds,
        })
    }
}
