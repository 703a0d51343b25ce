//! The module contains `Guest` struct and its storage entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::Contribution;

/// A person who answered the RSVP.
#[derive(Clone, Debug, PartialEq)]
pub struct Guest {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Free text, usually allergies or diet.
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Just enough to tell who brings a contribution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuestSummary {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

/// A guest along with everything they pledged.
#[derive(Clone, Debug, PartialEq)]
pub struct GuestWithContributions {
    pub guest: Guest,
    pub contributions: Vec<Contribution>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "guests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::contributions::Entity")]
    Contributions,
}

impl Related<super::contributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Guest {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            comment: model.comment,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&Model> for GuestSummary {
    fn from(model: &Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name.clone(),
            last_name: model.last_name.clone(),
        }
    }
}
