//! The module contains `Contribution` struct and its storage entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::{Category, GuestSummary, stats::Pledge};

/// Food or drink a guest promised to bring.
#[derive(Clone, Debug, PartialEq)]
pub struct Contribution {
    pub id: i32,
    pub guest_id: i32,
    pub category: Category,
    pub description: String,
    /// Number of portions, between 1 and 50.
    pub servings: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A contribution with the guest who brings it.
///
/// `guest` is `None` only if the owner vanished between the two reads of a
/// listing.
#[derive(Clone, Debug, PartialEq)]
pub struct ContributionEntry {
    pub contribution: Contribution,
    pub guest: Option<GuestSummary>,
}

impl Pledge for Contribution {
    fn category(&self) -> Category {
        self.category
    }

    fn servings(&self) -> i32 {
        self.servings
    }
}

impl Pledge for ContributionEntry {
    fn category(&self) -> Category {
        self.contribution.category
    }

    fn servings(&self) -> i32 {
        self.contribution.servings
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "contributions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guest_id: i32,
    pub category: Category,
    pub description: String,
    pub servings: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::guests::Entity",
        from = "Column::GuestId",
        to = "super::guests::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Guest,
}

impl Related<super::guests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Contribution {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            guest_id: model.guest_id,
            category: model.category,
            description: model.description,
            servings: model.servings,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
