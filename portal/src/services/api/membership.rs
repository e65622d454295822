//! # Membership Endpoints
//!
//! HTTP calls for joining and leaving clubs. Non-success responses may
//! carry a `{ "detail": ... }` body whose message is surfaced verbatim;
//! otherwise the caller gets a status-based message.

use shared::{ApiErrorBody, Club, MembershipActionResponse};

use super::client::ApiClient;

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response
        .json::<ApiErrorBody>()
        .await
        .unwrap_or(ApiErrorBody { detail: None });
    body.detail
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}

/// Join a club on behalf of the bearer.
#[tracing::instrument(skip(client, token), fields(club_id = %club_id))]
pub async fn join_club(
    client: &ApiClient,
    token: &str,
    club_id: &str,
) -> Result<MembershipActionResponse, String> {
    tracing::info!("Joining club");
    let url = format!("{}/clubs/{}/join", client.base_url(), club_id);

    let response = client
        .client
        .post(&url)
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Join network error");
            format!("Network error: {}", e)
        })?;

    if response.status().is_success() {
        response
            .json::<MembershipActionResponse>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        let status = response.status();
        let message = error_message(response).await;
        tracing::warn!(status = status.as_u16(), error = %message, "Join failed");
        Err(message)
    }
}

/// Leave a club on behalf of the bearer.
#[tracing::instrument(skip(client, token), fields(club_id = %club_id))]
pub async fn leave_club(
    client: &ApiClient,
    token: &str,
    club_id: &str,
) -> Result<MembershipActionResponse, String> {
    tracing::info!("Leaving club");
    let url = format!("{}/clubs/{}/leave", client.base_url(), club_id);

    let response = client
        .client
        .post(&url)
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Leave network error");
            format!("Network error: {}", e)
        })?;

    if response.status().is_success() {
        response
            .json::<MembershipActionResponse>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        let status = response.status();
        let message = error_message(response).await;
        tracing::warn!(status = status.as_u16(), error = %message, "Leave failed");
        Err(message)
    }
}

/// Full details of the clubs the bearer has joined.
pub async fn joined_clubs(client: &ApiClient, token: &str) -> Result<Vec<Club>, String> {
    let url = format!("{}/users/me/joined-clubs", client.base_url());

    let response = client
        .client
        .get(&url)
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.status().is_success() {
        response
            .json::<Vec<Club>>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        Err(error_message(response).await)
    }
}
