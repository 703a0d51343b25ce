use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    Contribution, EngineError, Guest, GuestInput, GuestPatch, GuestWithContributions,
    ResultEngine, contributions, guests, validation,
};

use super::{Engine, with_tx};

impl Engine {
    /// Every guest, ordered by last name then first name, with what they
    /// pledged.
    pub async fn list_guests(&self) -> ResultEngine<Vec<GuestWithContributions>> {
        with_tx!(self, |db_tx| {
            let guest_models = guests::Entity::find()
                .order_by_asc(guests::Column::LastName)
                .order_by_asc(guests::Column::FirstName)
                .all(&db_tx)
                .await?;

            let mut by_guest: HashMap<i32, Vec<Contribution>> = HashMap::new();
            for model in contributions::Entity::find()
                .order_by_asc(contributions::Column::Id)
                .all(&db_tx)
                .await?
            {
                by_guest
                    .entry(model.guest_id)
                    .or_default()
                    .push(model.into());
            }

            tracing::debug!("listing {} guests", guest_models.len());
            let list = guest_models
                .into_iter()
                .map(|model| {
                    let contributions = by_guest.remove(&model.id).unwrap_or_default();
                    GuestWithContributions {
                        guest: model.into(),
                        contributions,
                    }
                })
                .collect();
            Ok(list)
        })
    }

    pub async fn guest(&self, guest_id: i32) -> ResultEngine<Guest> {
        with_tx!(self, |db_tx| {
            let model = require_guest(&db_tx, guest_id).await?;
            Ok(Guest::from(model))
        })
    }

    /// Register a guest.
    ///
    /// Fails with [`EngineError::ExistingKey`] if someone with the same first
    /// and last name already answered.
    pub async fn create_guest(&self, input: GuestInput) -> ResultEngine<Guest> {
        let valid = validation::validate_guest(input)?;
        with_tx!(self, |db_tx| {
            ensure_name_available(&db_tx, &valid.first_name, &valid.last_name, None).await?;

            let now = Utc::now();
            let model = guests::ActiveModel {
                id: ActiveValue::NotSet,
                first_name: ActiveValue::Set(valid.first_name),
                last_name: ActiveValue::Set(valid.last_name),
                comment: ActiveValue::Set(valid.comment),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(&db_tx)
            .await?;

            tracing::info!(
                "guest {} registered: {} {}",
                model.id,
                model.first_name,
                model.last_name
            );
            Ok(Guest::from(model))
        })
    }

    /// Apply the fields present in `patch`, refreshing `updated_at`.
    pub async fn update_guest(&self, guest_id: i32, patch: GuestPatch) -> ResultEngine<Guest> {
        let patch = validation::validate_guest_update(patch)?;
        with_tx!(self, |db_tx| {
            let model = require_guest(&db_tx, guest_id).await?;

            let first_name = patch
                .first_name
                .clone()
                .unwrap_or_else(|| model.first_name.clone());
            let last_name = patch
                .last_name
                .clone()
                .unwrap_or_else(|| model.last_name.clone());
            if first_name != model.first_name || last_name != model.last_name {
                ensure_name_available(&db_tx, &first_name, &last_name, Some(guest_id)).await?;
            }

            let mut active: guests::ActiveModel = model.into();
            if let Some(first_name) = patch.first_name {
                active.first_name = ActiveValue::Set(first_name);
            }
            if let Some(last_name) = patch.last_name {
                active.last_name = ActiveValue::Set(last_name);
            }
            if let Some(comment) = patch.comment {
                active.comment = ActiveValue::Set(comment);
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            let model = active.update(&db_tx).await?;
            tracing::info!("guest {guest_id} updated");
            Ok(Guest::from(model))
        })
    }

    /// Remove a guest and everything they pledged.
    ///
    /// Returns how many contributions went with them.
    pub async fn delete_guest(&self, guest_id: i32) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            require_guest(&db_tx, guest_id).await?;

            let removed = contributions::Entity::delete_many()
                .filter(contributions::Column::GuestId.eq(guest_id))
                .exec(&db_tx)
                .await?
                .rows_affected;
            guests::Entity::delete_by_id(guest_id).exec(&db_tx).await?;

            tracing::info!("guest {guest_id} removed with {removed} contributions");
            Ok(removed)
        })
    }
}

pub(super) async fn require_guest(
    db_tx: &DatabaseTransaction,
    guest_id: i32,
) -> ResultEngine<guests::Model> {
    guests::Entity::find_by_id(guest_id)
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("guest {guest_id}")))
}

/// Names are compared exactly as stored, case included.
async fn ensure_name_available(
    db_tx: &DatabaseTransaction,
    first_name: &str,
    last_name: &str,
    except: Option<i32>,
) -> ResultEngine<()> {
    let mut query = guests::Entity::find()
        .filter(guests::Column::FirstName.eq(first_name))
        .filter(guests::Column::LastName.eq(last_name));
    if let Some(guest_id) = except {
        query = query.filter(guests::Column::Id.ne(guest_id));
    }

    if query.one(db_tx).await?.is_some() {
        return Err(EngineError::ExistingKey(format!("{first_name} {last_name}")));
    }
    Ok(())
}
