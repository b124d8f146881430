//! User-triggered mutations.
//!
//! Each action calls the API and, on success, re-fetches the collections it
//! affected before returning. Nothing is updated optimistically: callers only
//! ever see server-confirmed state. Failures come back as [`ActionError`]
//! with a message ready to show.

use std::fmt;

use crate::api::{ApiClient, ApiError};
use crate::models::{Identity, Workshop};
use crate::rating::RatingDraft;
use crate::reconcile::{self, AdminData, PersonalData};
use crate::session::SessionStore;

pub const LOGIN_FAILED: &str = "Invalid ticket ID. Please check your ticket and try again.";
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";
pub const WITHDRAW_FAILED: &str = "Withdrawal failed. Please try again.";
pub const ADMIN_WITHDRAW_FAILED: &str = "Failed to withdraw registration. Please try again.";
pub const RATING_FAILED: &str = "Failed to submit rating. Please try again.";
pub const RATING_THANKS: &str = "Thank you for your feedback!";
pub const NO_WORKSHOP_ACCESS: &str = "You do not have access to manage this workshop.";

/// Question asked before an admin removes someone from a workshop.
pub fn admin_withdraw_prompt(participant: &str, ticket_id: &str) -> String {
    format!("Are you sure you want to withdraw {participant} ({ticket_id}) from this workshop?")
}

/// Notice shown after an admin removed someone from a workshop.
pub fn admin_withdraw_success(participant: &str) -> String {
    format!("Successfully withdrew {participant} from the workshop.")
}

/// A failed action with its display message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionError {
    pub message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn from_api(err: &ApiError, fallback: &str) -> Self {
        Self::new(err.message_or(fallback))
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ActionError {}

/// Catalog and personal data after a self-service mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refreshed {
    /// `None` when the catalog re-fetch failed; keep the previous one.
    pub catalog: Option<Vec<Workshop>>,
    pub personal: PersonalData,
}

/// Catalog and admin data after an admin mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRefreshed {
    pub catalog: Option<Vec<Workshop>>,
    pub admin: AdminData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub identity: Identity,
    pub personal: PersonalData,
}

/// Trims and upper-cases typed ticket input. Empty input yields `None`.
pub fn normalize_ticket(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_uppercase())
}

/// Logs in with `ticket_id`, persists the session, then loads personal data.
pub async fn login(
    client: &ApiClient,
    store: &SessionStore,
    ticket_id: &str,
) -> Result<LoginOutcome, ActionError> {
    let response = client
        .login(ticket_id)
        .await
        .map_err(|err| ActionError::from_api(&err, LOGIN_FAILED))?;

    let user = match response.user {
        Some(user) if response.success => user,
        _ => {
            tracing::info!(ticket = ticket_id, "login rejected");
            return Err(ActionError::new(LOGIN_FAILED));
        }
    };

    let identity = Identity::from(user);
    store
        .establish(&identity)
        .map_err(|err| ActionError::new(format!("Failed to save session: {err:#}")))?;

    let personal = reconcile::refresh_personal(client, &identity.ticket_id).await;
    Ok(LoginOutcome { identity, personal })
}

pub async fn register(
    client: &ApiClient,
    ticket_id: &str,
    workshop_id: &str,
) -> Result<Refreshed, ActionError> {
    client
        .register(ticket_id, workshop_id)
        .await
        .map_err(|err| ActionError::from_api(&err, REGISTER_FAILED))?;
    tracing::info!(ticket = ticket_id, workshop = workshop_id, "registered");
    Ok(refresh_after_self_mutation(client, ticket_id).await)
}

pub async fn withdraw(
    client: &ApiClient,
    ticket_id: &str,
    workshop_id: &str,
) -> Result<Refreshed, ActionError> {
    client
        .withdraw(ticket_id, workshop_id)
        .await
        .map_err(|err| ActionError::from_api(&err, WITHDRAW_FAILED))?;
    tracing::info!(ticket = ticket_id, workshop = workshop_id, "withdrew");
    Ok(refresh_after_self_mutation(client, ticket_id).await)
}

async fn refresh_after_self_mutation(client: &ApiClient, ticket_id: &str) -> Refreshed {
    let catalog = reconcile::refresh_catalog(client).await;
    let personal = reconcile::refresh_personal(client, ticket_id).await;
    Refreshed { catalog, personal }
}

/// Validates `draft` locally, submits it, then reloads personal data.
/// An incomplete draft never reaches the network.
pub async fn submit_rating(
    client: &ApiClient,
    ticket_id: &str,
    workshop_id: &str,
    draft: &RatingDraft,
) -> Result<PersonalData, ActionError> {
    let rating = draft
        .validate()
        .map_err(|err| ActionError::new(err.to_string()))?;

    client
        .submit_rating(ticket_id, workshop_id, &rating)
        .await
        .map_err(|err| ActionError::from_api(&err, RATING_FAILED))?;
    tracing::info!(ticket = ticket_id, workshop = workshop_id, "rating submitted");

    Ok(reconcile::refresh_personal(client, ticket_id).await)
}

/// Removes `ticket_id` from `workshop_id` on behalf of `admin`.
///
/// `catalog` is used for the admin reload when the catalog re-fetch fails.
pub async fn admin_withdraw(
    client: &ApiClient,
    admin: &Identity,
    ticket_id: &str,
    workshop_id: &str,
    catalog: &[Workshop],
) -> Result<AdminRefreshed, ActionError> {
    if !admin.can_administer(workshop_id) {
        return Err(ActionError::new(NO_WORKSHOP_ACCESS));
    }

    client
        .admin_withdraw(&admin.ticket_id, ticket_id, workshop_id)
        .await
        .map_err(|err| ActionError::from_api(&err, ADMIN_WITHDRAW_FAILED))?;
    tracing::info!(
        admin = %admin.ticket_id,
        ticket = ticket_id,
        workshop = workshop_id,
        "admin withdrew registration"
    );

    let fresh_catalog = reconcile::refresh_catalog(client).await;
    let admin_data = reconcile::refresh_admin(
        client,
        admin,
        fresh_catalog.as_deref().unwrap_or(catalog),
    )
    .await;

    Ok(AdminRefreshed {
        catalog: fresh_catalog,
        admin: admin_data,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::models::{AdminScope, LearnedSomething};

    fn workshops_body(current: i64) -> serde_json::Value {
        json!({
            "workshops": [{
                "id": "w1",
                "title": "Intro to X",
                "maxCapacity": 10,
                "currentRegistrations": current
            }]
        })
    }

    async fn mount_personal(server: &MockServer, registrations: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/registrations/ABC123"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "registrations": registrations })),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ratings/ABC123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ratings": [] })))
            .mount(server)
            .await;
    }

    #[test]
    fn test_normalize_ticket() {
        assert_eq!(normalize_ticket("  abc123 "), Some("ABC123".to_string()));
        assert_eq!(normalize_ticket("   "), None);
    }

    #[tokio::test]
    async fn test_login_establishes_session_and_loads_personal_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({ "ticketId": "ABC123" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "user": {
                    "ticketId": "ABC123",
                    "firstName": "Grace",
                    "lastName": "Hopper",
                    "isAdmin": false,
                    "adminWorkshops": []
                }
            })))
            .mount(&server)
            .await;
        mount_personal(&server, json!([{ "ticketId": "ABC123", "workshopId": "w1" }])).await;

        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let client = ApiClient::new(&server.uri()).unwrap();

        let outcome = login(&client, &store, "ABC123").await.unwrap();
        assert_eq!(outcome.identity.full_name(), "Grace Hopper");
        assert!(outcome.personal.is_registered("w1"));
        assert_eq!(store.restore(), Some(outcome.identity));
    }

    #[tokio::test]
    async fn test_login_rejection_uses_fallback_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let client = ApiClient::new(&server.uri()).unwrap();

        let err = login(&client, &store, "NOPE").await.unwrap_err();
        assert_eq!(err.message, LOGIN_FAILED);
        assert!(store.restore().is_none());
    }

    #[tokio::test]
    async fn test_login_server_message_wins() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "error": "Ticket not found" })),
            )
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let client = ApiClient::new(&server.uri()).unwrap();

        let err = login(&client, &store, "NOPE").await.unwrap_err();
        assert_eq!(err.message, "Ticket not found");
    }

    #[tokio::test]
    async fn test_register_refetches_before_returning() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/registrations"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/workshops"))
            .respond_with(ResponseTemplate::new(200).set_body_json(workshops_body(4)))
            .mount(&server)
            .await;
        mount_personal(&server, json!([{ "ticketId": "ABC123", "workshopId": "w1" }])).await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let refreshed = register(&client, "ABC123", "w1").await.unwrap();
        let catalog = refreshed.catalog.unwrap();
        assert_eq!(catalog[0].current_registrations, 4);
        assert!(refreshed.personal.is_registered("w1"));
    }

    #[tokio::test]
    async fn test_register_failure_makes_no_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/registrations"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/workshops"))
            .respond_with(ResponseTemplate::new(200).set_body_json(workshops_body(0)))
            .expect(0)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let err = register(&client, "ABC123", "w1").await.unwrap_err();
        assert_eq!(err.message, "Request failed");
    }

    #[tokio::test]
    async fn test_withdraw_empty_server_message_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/registrations/ABC123/w1"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "" })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let err = withdraw(&client, "ABC123", "w1").await.unwrap_err();
        assert_eq!(err.message, WITHDRAW_FAILED);
    }

    #[tokio::test]
    async fn test_incomplete_rating_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ratings"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let draft = RatingDraft {
            content_satisfaction: 3,
            ..RatingDraft::default()
        };
        let err = submit_rating(&client, "ABC123", "w1", &draft)
            .await
            .unwrap_err();
        assert_eq!(err.message, "Please complete all required fields");
    }

    #[tokio::test]
    async fn test_rating_submission_reloads_personal_ratings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ratings"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/registrations/ABC123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "registrations": [{ "ticketId": "ABC123", "workshopId": "w1" }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ratings/ABC123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ratings": [{ "workshopId": "w1", "contentSatisfaction": 5 }]
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let draft = RatingDraft {
            content_satisfaction: 5,
            speaker_effectiveness: 4,
            learned_something: Some(LearnedSomething::Yes),
            additional_feedback: String::new(),
        };
        let personal = submit_rating(&client, "ABC123", "w1", &draft)
            .await
            .unwrap();
        assert!(personal.has_rated("w1"));
    }

    #[tokio::test]
    async fn test_admin_withdraw_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/admin/registrations/ABC123/w1"))
            .and(header("authorization", "Bearer ADM1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/workshops"))
            .respond_with(ResponseTemplate::new(200).set_body_json(workshops_body(9)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/admin/registrations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "registrations": [{ "ticketId": "XYZ789", "workshopId": "w1" }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/admin/ratings/w1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ratings": [] })))
            .mount(&server)
            .await;

        let admin = Identity {
            ticket_id: "ADM1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            is_admin: true,
            admin_scope: AdminScope::AllWorkshops,
        };
        let client = ApiClient::new(&server.uri()).unwrap();
        let refreshed = admin_withdraw(&client, &admin, "ABC123", "w1", &[])
            .await
            .unwrap();

        let catalog = refreshed.catalog.unwrap();
        assert_eq!(catalog[0].available_spots(), 1);
        let participants = refreshed.admin.participants("w1");
        assert!(participants.iter().all(|r| r.ticket_id != "ABC123"));
    }

    #[tokio::test]
    async fn test_admin_withdraw_outside_scope_is_refused_locally() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let admin = Identity {
            ticket_id: "ADM1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            is_admin: true,
            admin_scope: AdminScope::Workshops(vec!["w2".into()]),
        };
        let client = ApiClient::new(&server.uri()).unwrap();
        let err = admin_withdraw(&client, &admin, "ABC123", "w1", &[])
            .await
            .unwrap_err();
        assert_eq!(err.message, NO_WORKSHOP_ACCESS);
    }
}
