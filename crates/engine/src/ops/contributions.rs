use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    ByCategory, Category, Contribution, ContributionEntry, ContributionInput, ContributionPatch,
    ContributionTotals, EngineError, GuestSummary, ResultEngine, contributions, guests,
    stats::group_by_category, validation,
};

use super::{Engine, guests::require_guest, with_tx};

/// Contributions sorted into their categories, with totals.
#[derive(Clone, Debug, PartialEq)]
pub struct ContributionBoard {
    pub grouped: ByCategory<Vec<ContributionEntry>>,
    pub totals: ContributionTotals,
}

impl Engine {
    /// Contributions ordered by id, each with its guest. `category` narrows
    /// the listing to a single category.
    pub async fn list_contributions(
        &self,
        category: Option<Category>,
    ) -> ResultEngine<Vec<ContributionEntry>> {
        let mut query = contributions::Entity::find();
        if let Some(category) = category {
            query = query.filter(contributions::Column::Category.eq(category));
        }

        let rows = query
            .order_by_asc(contributions::Column::Id)
            .find_also_related(guests::Entity)
            .all(&self.database)
            .await?;

        tracing::debug!("listing {} contributions", rows.len());
        Ok(rows
            .into_iter()
            .map(|(contribution, guest)| ContributionEntry {
                guest: guest.as_ref().map(GuestSummary::from),
                contribution: contribution.into(),
            })
            .collect())
    }

    /// Grouped listing plus totals over the same contributions.
    pub async fn contribution_board(
        &self,
        category: Option<Category>,
    ) -> ResultEngine<ContributionBoard> {
        let entries = self.list_contributions(category).await?;
        let totals = ContributionTotals::from_contributions(&entries);
        Ok(ContributionBoard {
            grouped: group_by_category(entries),
            totals,
        })
    }

    pub async fn contribution(&self, contribution_id: i32) -> ResultEngine<Contribution> {
        with_tx!(self, |db_tx| {
            let model = require_contribution(&db_tx, contribution_id).await?;
            Ok(Contribution::from(model))
        })
    }

    /// Record a pledge. The guest must exist.
    pub async fn create_contribution(&self, input: ContributionInput) -> ResultEngine<Contribution> {
        let valid = validation::validate_contribution(input)?;
        with_tx!(self, |db_tx| {
            require_guest(&db_tx, valid.guest_id).await?;

            let now = Utc::now();
            let model = contributions::ActiveModel {
                id: ActiveValue::NotSet,
                guest_id: ActiveValue::Set(valid.guest_id),
                category: ActiveValue::Set(valid.category),
                description: ActiveValue::Set(valid.description),
                servings: ActiveValue::Set(valid.servings),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;

            tracing::info!(
                "contribution {} pledged by guest {}: {} x{}",
                model.id,
                model.guest_id,
                model.category,
                model.servings
            );
            Ok(Contribution::from(model))
        })
    }

    /// Apply the fields present in `patch`, refreshing `updated_at`.
    pub async fn update_contribution(
        &self,
        contribution_id: i32,
        patch: ContributionPatch,
    ) -> ResultEngine<Contribution> {
        let patch = validation::validate_contribution_update(patch)?;
        with_tx!(self, |db_tx| {
            let model = require_contribution(&db_tx, contribution_id).await?;

            let mut active: contributions::ActiveModel = model.into();
            if let Some(category) = patch.category {
                active.category = ActiveValue::Set(category);
            }
            if let Some(description) = patch.description {
                active.description = ActiveValue::Set(description);
            }
            if let Some(servings) = patch.servings {
                active.servings = ActiveValue::Set(servings);
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            let model = active.update(&db_tx).await?;
            tracing::info!("contribution {contribution_id} updated");
            Ok(Contribution::from(model))
        })
    }

    pub async fn delete_contribution(&self, contribution_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_contribution(&db_tx, contribution_id).await?;
            contributions::Entity::delete_by_id(contribution_id)
                .exec(&db_tx)
                .await?;
            tracing::info!("contribution {contribution_id} removed");
            Ok(())
        })
    }
}

async fn require_contribution(
    db_tx: &DatabaseTransaction,
    contribution_id: i32,
) -> ResultEngine<contributions::Model> {
    contributions::Entity::find_by_id(contribution_id)
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("contribution {contribution_id}")))
}
