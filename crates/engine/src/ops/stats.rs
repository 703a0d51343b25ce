use sea_orm::{PaginatorTrait, TransactionTrait, prelude::*};

use crate::{Contribution, ResultEngine, Statistics, contributions, guests};

use super::{Engine, with_tx};

impl Engine {
    /// Dashboard figures and alerts, computed from the current guests and
    /// contributions.
    pub async fn statistics(&self) -> ResultEngine<Statistics> {
        with_tx!(self, |db_tx| {
            let guests_count = guests::Entity::find().count(&db_tx).await?;
            let contributions: Vec<Contribution> = contributions::Entity::find()
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Contribution::from)
                .collect();

            let stats = Statistics::compute(guests_count, &contributions, &self.thresholds);
            tracing::debug!(
                "stats: {} guests, {} contributions, {} alerts",
                stats.guests_count,
                stats.contributions_count,
                stats.alerts.len()
            );
            Ok(stats)
        })
    }
}
