//! Contributions API endpoints

use api_types::{
    Category as ApiCategory, DataResponse, MessageResponse, PerCategory,
    contribution::{
        CategoryStats, ContributionListResponse, ContributionNew, ContributionQuery,
        ContributionStats, ContributionUpdate, ContributionView, ContributionWithGuest,
        GuestSummaryView,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{
    ByCategory, Category, CategoryTotals, Contribution, ContributionEntry, ContributionInput,
    ContributionPatch, ContributionTotals, validation::parse_id,
};

use crate::{ServerError, server::ServerState};

pub(crate) fn map_category(category: Category) -> ApiCategory {
    match category {
        Category::Salty => ApiCategory::Salty,
        Category::Sweet => ApiCategory::Sweet,
        Category::Drink => ApiCategory::Drink,
        Category::Side => ApiCategory::Side,
    }
}

pub(crate) fn per_category<T, U>(values: ByCategory<T>, f: impl FnMut(T) -> U) -> PerCategory<U> {
    values.map(f).into_array().into()
}

pub(crate) fn map_totals(totals: CategoryTotals) -> CategoryStats {
    CategoryStats {
        count: totals.count,
        servings: totals.servings,
    }
}

pub(crate) fn contribution_view(contribution: Contribution) -> ContributionView {
    ContributionView {
        id: contribution.id,
        guest_id: contribution.guest_id,
        category: map_category(contribution.category),
        description: contribution.description,
        servings: contribution.servings,
        created_at: contribution.created_at,
        updated_at: contribution.updated_at,
    }
}

fn entry_view(entry: ContributionEntry) -> ContributionWithGuest {
    ContributionWithGuest {
        contribution: contribution_view(entry.contribution),
        guest: entry.guest.map(|guest| GuestSummaryView {
            id: guest.id,
            first_name: guest.first_name,
            last_name: guest.last_name,
        }),
    }
}

fn stats_view(totals: ContributionTotals) -> ContributionStats {
    ContributionStats {
        total_contributions: totals.total_contributions,
        total_servings: totals.total_servings,
        by_category: per_category(totals.by_category, map_totals),
    }
}

/// Contributions grouped by category, with totals.
///
/// An unknown `category` value lists everything.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ContributionQuery>,
) -> Result<Json<ContributionListResponse>, ServerError> {
    let filter = query.category.as_deref().and_then(Category::from_code);
    let board = state.engine.contribution_board(filter).await?;

    Ok(Json(ContributionListResponse {
        success: true,
        data: per_category(board.grouped, |entries| {
            entries.into_iter().map(entry_view).collect()
        }),
        stats: stats_view(board.totals),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<ContributionNew>, ServerError>,
) -> Result<(StatusCode, Json<DataResponse<ContributionView>>), ServerError> {
    let contribution = state
        .engine
        .create_contribution(ContributionInput {
            guest_id: payload.guest_id,
            category: payload.category,
            description: payload.description,
            servings: payload.servings,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(contribution_view(contribution))),
    ))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<ContributionUpdate>, ServerError>,
) -> Result<Json<DataResponse<ContributionView>>, ServerError> {
    let id = parse_id(&id)?;
    let contribution = state
        .engine
        .update_contribution(
            id,
            ContributionPatch {
                category: payload.category,
                description: payload.description,
                servings: payload.servings,
            },
        )
        .await?;

    Ok(Json(DataResponse::new(contribution_view(contribution))))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    let id = parse_id(&id)?;
    state.engine.delete_contribution(id).await?;

    Ok(Json(MessageResponse::new("Contribution supprimée avec succès")))
}
