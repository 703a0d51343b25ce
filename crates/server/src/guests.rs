//! Guests API endpoints

use api_types::{
    DataResponse, MessageResponse,
    guest::{GuestList, GuestNew, GuestUpdate, GuestView, GuestWithContributions},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{Guest, GuestInput, GuestPatch, validation::parse_id};

use crate::{ServerError, contributions::contribution_view, server::ServerState};

fn guest_view(guest: Guest) -> GuestView {
    GuestView {
        id: guest.id,
        first_name: guest.first_name,
        last_name: guest.last_name,
        comment: guest.comment,
        created_at: guest.created_at,
        updated_at: guest.updated_at,
    }
}

/// Handle requests for listing every guest with what they bring
pub async fn list(State(state): State<ServerState>) -> Result<Json<GuestList>, ServerError> {
    let guests = state.engine.list_guests().await?;

    let data: Vec<GuestWithContributions> = guests
        .into_iter()
        .map(|entry| GuestWithContributions {
            guest: guest_view(entry.guest),
            contributions: entry.contributions.into_iter().map(contribution_view).collect(),
        })
        .collect();

    Ok(Json(GuestList {
        success: true,
        total: data.len(),
        data,
    }))
}

/// Handle RSVP requests
pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<GuestNew>, ServerError>,
) -> Result<(StatusCode, Json<DataResponse<GuestView>>), ServerError> {
    let guest = state
        .engine
        .create_guest(GuestInput {
            first_name: payload.first_name,
            last_name: payload.last_name,
            comment: payload.comment,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(guest_view(guest)))))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<GuestUpdate>, ServerError>,
) -> Result<Json<DataResponse<GuestView>>, ServerError> {
    let id = parse_id(&id)?;
    let guest = state
        .engine
        .update_guest(
            id,
            GuestPatch {
                first_name: payload.first_name,
                last_name: payload.last_name,
                comment: payload.comment,
            },
        )
        .await?;

    Ok(Json(DataResponse::new(guest_view(guest))))
}

/// Removing a guest also removes their contributions.
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ServerError> {
    let id = parse_id(&id)?;
    state.engine.delete_guest(id).await?;

    Ok(Json(MessageResponse::new("Participant supprimé avec succès")))
}
