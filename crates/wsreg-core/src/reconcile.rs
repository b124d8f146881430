//! Refreshes of server-owned collections and the pure projections derived
//! from them.
//!
//! Every refresh replaces its collection wholesale. Nothing here caches a
//! derived fact: views are recomputed from the source collections each time
//! they are asked for.

use std::collections::{HashMap, HashSet};

use futures_util::future::join_all;

use crate::api::{ApiClient, ApiResult};
use crate::models::{AdminScope, Identity, Rating, Registration, Workshop};

/// The logged-in attendee's own registrations and ratings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalData {
    pub registrations: Vec<Registration>,
    pub ratings: Vec<Rating>,
}

impl PersonalData {
    pub fn is_registered(&self, workshop_id: &str) -> bool {
        self.registrations
            .iter()
            .any(|r| r.workshop_id == workshop_id)
    }

    pub fn has_rated(&self, workshop_id: &str) -> bool {
        self.ratings.iter().any(|r| r.workshop_id == workshop_id)
    }
}

/// Everything the admin dashboard shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminData {
    pub registrations_by_workshop: HashMap<String, Vec<Registration>>,
    pub ratings_by_workshop: HashMap<String, Vec<Rating>>,
}

impl AdminData {
    pub fn participants(&self, workshop_id: &str) -> &[Registration] {
        self.registrations_by_workshop
            .get(workshop_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn ratings_for(&self, workshop_id: &str) -> &[Rating] {
        self.ratings_by_workshop
            .get(workshop_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations_by_workshop.is_empty() && self.ratings_by_workshop.is_empty()
    }
}

/// Groups registrations by workshop id, keeping server order within a group.
pub fn group_by_workshop(registrations: Vec<Registration>) -> HashMap<String, Vec<Registration>> {
    let mut grouped: HashMap<String, Vec<Registration>> = HashMap::new();
    for registration in registrations {
        grouped
            .entry(registration.workshop_id.clone())
            .or_default()
            .push(registration);
    }
    grouped
}

/// Fetches the catalog. `None` means the fetch failed and the caller should
/// keep whatever it had.
pub async fn refresh_catalog(client: &ApiClient) -> Option<Vec<Workshop>> {
    match client.workshops().await {
        Ok(workshops) => {
            tracing::debug!(count = workshops.len(), "catalog refreshed");
            Some(workshops)
        }
        Err(err) => {
            tracing::error!(error = %err, "catalog refresh failed, keeping previous catalog");
            None
        }
    }
}

/// Fetches registrations then ratings for `ticket_id`, failing on the first
/// error.
pub async fn fetch_personal(client: &ApiClient, ticket_id: &str) -> ApiResult<PersonalData> {
    let registrations = client.registrations(ticket_id).await?;
    let ratings = client.ratings(ticket_id).await?;
    Ok(PersonalData {
        registrations,
        ratings,
    })
}

/// Like [`fetch_personal`], but any failure yields empty sets.
pub async fn refresh_personal(client: &ApiClient, ticket_id: &str) -> PersonalData {
    match fetch_personal(client, ticket_id).await {
        Ok(personal) => personal,
        Err(err) => {
            tracing::error!(ticket = ticket_id, error = %err, "personal refresh failed");
            PersonalData::default()
        }
    }
}

/// Loads all registrations plus per-workshop ratings for the workshops the
/// admin can see. Non-admins get empty data without a request.
pub async fn refresh_admin(client: &ApiClient, admin: &Identity, catalog: &[Workshop]) -> AdminData {
    if !admin.is_admin {
        return AdminData::default();
    }

    let registrations = match client.admin_registrations(&admin.ticket_id).await {
        Ok(registrations) => registrations,
        Err(err) => {
            tracing::error!(error = %err, "admin registrations refresh failed");
            return AdminData::default();
        }
    };

    let accessible = accessible_workshops(&admin.admin_scope, catalog);
    let fetches = accessible.iter().map(|workshop| async move {
        let ratings = match client
            .admin_workshop_ratings(&admin.ticket_id, &workshop.id)
            .await
        {
            Ok(ratings) => ratings,
            Err(err) => {
                tracing::warn!(workshop = %workshop.id, error = %err, "workshop ratings fetch failed");
                Vec::new()
            }
        };
        (workshop.id.clone(), ratings)
    });
    let ratings_by_workshop = join_all(fetches).await.into_iter().collect();

    AdminData {
        registrations_by_workshop: group_by_workshop(registrations),
        ratings_by_workshop,
    }
}

/// Workshops visible to an admin with `scope`, in catalog order.
pub fn accessible_workshops<'a>(scope: &AdminScope, catalog: &'a [Workshop]) -> Vec<&'a Workshop> {
    match scope {
        AdminScope::AllWorkshops => catalog.iter().collect(),
        AdminScope::Workshops(ids) => {
            let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
            catalog
                .iter()
                .filter(|w| ids.contains(w.id.as_str()))
                .collect()
        }
    }
}

/// Whether a workshop is over and may be rated.
///
/// There is no end-time rule yet: every workshop counts as ended.
pub fn has_ended(_workshop: &Workshop) -> bool {
    true
}

/// Per-workshop facts for the catalog list.
#[derive(Debug, Clone, Copy)]
pub struct WorkshopView<'a> {
    pub workshop: &'a Workshop,
    pub available_spots: i64,
    pub registered: bool,
    pub rated: bool,
    pub manageable: bool,
    /// This workshop's own register/withdraw is in flight.
    pub busy: bool,
}

impl WorkshopView<'_> {
    /// The register control is enabled unless the workshop is exactly full
    /// or its own action is running.
    pub fn can_register(&self) -> bool {
        !self.registered && self.available_spots != 0 && !self.busy
    }

    pub fn can_withdraw(&self) -> bool {
        self.registered && !self.busy
    }

    pub fn can_rate(&self) -> bool {
        self.registered && !self.rated && has_ended(self.workshop)
    }
}

pub fn workshop_views<'a>(
    catalog: &'a [Workshop],
    identity: Option<&Identity>,
    personal: &PersonalData,
    busy: &HashSet<String>,
) -> Vec<WorkshopView<'a>> {
    catalog
        .iter()
        .map(|workshop| WorkshopView {
            workshop,
            available_spots: workshop.available_spots(),
            registered: personal.is_registered(&workshop.id),
            rated: personal.has_rated(&workshop.id),
            manageable: identity.is_some_and(|i| i.can_administer(&workshop.id)),
            busy: busy.contains(&workshop.id),
        })
        .collect()
}

/// One of the attendee's registrations joined with its workshop.
#[derive(Debug, Clone, Copy)]
pub struct MyRegistration<'a> {
    pub registration: &'a Registration,
    pub workshop: &'a Workshop,
    pub rated: bool,
}

impl MyRegistration<'_> {
    pub fn can_rate(&self) -> bool {
        !self.rated && has_ended(self.workshop)
    }
}

/// Personal registrations in server order. Registrations whose workshop is
/// missing from the catalog are skipped.
pub fn my_registrations<'a>(
    catalog: &'a [Workshop],
    personal: &'a PersonalData,
) -> Vec<MyRegistration<'a>> {
    personal
        .registrations
        .iter()
        .filter_map(|registration| {
            let workshop = catalog.iter().find(|w| w.id == registration.workshop_id)?;
            Some(MyRegistration {
                registration,
                workshop,
                rated: personal.has_rated(&workshop.id),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::ApiErrorKind;

    fn workshop(id: &str, max: i64, current: i64) -> Workshop {
        Workshop {
            id: id.to_string(),
            title: format!("Workshop {id}"),
            time: String::new(),
            location: String::new(),
            speakers: Vec::new(),
            abstract_html: String::new(),
            max_capacity: max,
            current_registrations: current,
        }
    }

    fn registration(ticket: &str, workshop: &str) -> Registration {
        Registration {
            ticket_id: ticket.to_string(),
            workshop_id: workshop.to_string(),
            registration_time: String::new(),
            first_name: None,
            last_name: None,
        }
    }

    fn admin(scope: AdminScope) -> Identity {
        Identity {
            ticket_id: "ADM1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            is_admin: true,
            admin_scope: scope,
        }
    }

    #[test]
    fn test_accessible_all_workshops_is_full_catalog() {
        let catalog = vec![workshop("w1", 10, 0), workshop("w2", 10, 0)];
        let visible = accessible_workshops(&AdminScope::AllWorkshops, &catalog);
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn test_accessible_specific_set_keeps_catalog_order() {
        let catalog = vec![
            workshop("w1", 10, 0),
            workshop("w2", 10, 0),
            workshop("w3", 10, 0),
        ];
        let scope = AdminScope::Workshops(vec!["w3".into(), "w1".into(), "gone".into()]);
        let ids: Vec<&str> = accessible_workshops(&scope, &catalog)
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(ids, ["w1", "w3"]);
    }

    #[test]
    fn test_full_workshop_disables_register_only_when_not_registered() {
        let catalog = vec![workshop("w1", 10, 10)];
        let mut personal = PersonalData::default();
        let views = workshop_views(&catalog, None, &personal, &HashSet::new());
        assert_eq!(views[0].available_spots, 0);
        assert!(!views[0].can_register());

        personal.registrations.push(registration("ABC123", "w1"));
        let views = workshop_views(&catalog, None, &personal, &HashSet::new());
        assert!(views[0].can_withdraw());
    }

    #[test]
    fn test_overbooked_workshop_keeps_register_enabled() {
        let catalog = vec![workshop("w1", 10, 11)];
        let views = workshop_views(&catalog, None, &PersonalData::default(), &HashSet::new());
        assert_eq!(views[0].available_spots, -1);
        assert!(views[0].can_register());
    }

    #[test]
    fn test_busy_disables_only_that_workshop() {
        let catalog = vec![workshop("w1", 10, 0), workshop("w2", 10, 0)];
        let busy: HashSet<String> = ["w1".to_string()].into();
        let views = workshop_views(&catalog, None, &PersonalData::default(), &busy);
        assert!(!views[0].can_register());
        assert!(views[1].can_register());
    }

    #[test]
    fn test_manageable_follows_scope() {
        let catalog = vec![workshop("w1", 10, 0), workshop("w2", 10, 0)];
        let identity = admin(AdminScope::Workshops(vec!["w2".into()]));
        let views = workshop_views(
            &catalog,
            Some(&identity),
            &PersonalData::default(),
            &HashSet::new(),
        );
        assert!(!views[0].manageable);
        assert!(views[1].manageable);
    }

    #[test]
    fn test_my_registrations_skips_unknown_workshops() {
        let catalog = vec![workshop("w1", 10, 1)];
        let personal = PersonalData {
            registrations: vec![registration("ABC123", "w1"), registration("ABC123", "gone")],
            ratings: Vec::new(),
        };
        let mine = my_registrations(&catalog, &personal);
        assert_eq!(mine.len(), 1);
        assert!(mine[0].can_rate());
    }

    #[test]
    fn test_group_by_workshop() {
        let grouped = group_by_workshop(vec![
            registration("A", "w1"),
            registration("B", "w2"),
            registration("C", "w1"),
        ]);
        let w1: Vec<&str> = grouped["w1"].iter().map(|r| r.ticket_id.as_str()).collect();
        assert_eq!(w1, ["A", "C"]);
        assert_eq!(grouped["w2"].len(), 1);
    }

    #[tokio::test]
    async fn test_personal_refresh_failure_empties_both_sets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/registrations/ABC123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "registrations": [{ "ticketId": "ABC123", "workshopId": "w1" }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ratings/ABC123"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let personal = refresh_personal(&client, "ABC123").await;
        assert_eq!(personal, PersonalData::default());
    }

    #[tokio::test]
    async fn test_fetch_personal_surfaces_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/registrations/ABC123"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "db down" })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let err = fetch_personal(&client, "ABC123").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Server);
        assert_eq!(err.status, Some(500));
        assert_eq!(err.message, "db down");
    }

    #[tokio::test]
    async fn test_catalog_refresh_failure_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workshops"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        assert!(refresh_catalog(&client).await.is_none());
    }

    #[tokio::test]
    async fn test_admin_refresh_degrades_per_workshop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/registrations"))
            .and(header("authorization", "Bearer ADM1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "registrations": [
                    { "ticketId": "ABC123", "workshopId": "w1", "firstName": "Grace" },
                    { "ticketId": "XYZ789", "workshopId": "w2" }
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/admin/ratings/w1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ratings": [{ "workshopId": "w1", "contentSatisfaction": 5 }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/admin/ratings/w2"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let catalog = vec![workshop("w1", 10, 1), workshop("w2", 10, 1)];
        let data = refresh_admin(&client, &admin(AdminScope::AllWorkshops), &catalog).await;

        assert_eq!(data.participants("w1").len(), 1);
        assert_eq!(data.ratings_for("w1").len(), 1);
        assert!(data.ratings_for("w2").is_empty());
        assert!(data.ratings_by_workshop.contains_key("w2"));
    }

    #[tokio::test]
    async fn test_admin_refresh_registrations_failure_empties_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/registrations"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "error": "nope" })))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let catalog = vec![workshop("w1", 10, 1)];
        let data = refresh_admin(&client, &admin(AdminScope::AllWorkshops), &catalog).await;
        assert!(data.is_empty());
    }
}
