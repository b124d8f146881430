//! Shared helpers for CLI integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Writes a session file as the login flow would.
pub fn write_session(home: &Path, ticket_id: &str, is_admin: bool, admin_workshops: &[&str]) {
    let session = json!({
        "currentUser": ticket_id,
        "userData": {
            "ticketId": ticket_id,
            "firstName": "Grace",
            "lastName": "Hopper",
            "fullName": "Grace Hopper",
            "isAdmin": is_admin,
            "adminWorkshops": admin_workshops,
        }
    });
    fs::write(home.join("session.json"), session.to_string()).unwrap();
}

pub fn workshop(id: &str, title: &str, max: i64, current: i64) -> Value {
    json!({
        "id": id,
        "title": title,
        "time": "10:00",
        "location": "Room 1",
        "speakers": ["Ada"],
        "abstract": "<p>Hands on</p>",
        "maxCapacity": max,
        "currentRegistrations": current
    })
}

pub async fn mount_catalog(server: &MockServer, workshops: Value) {
    Mock::given(method("GET"))
        .and(path("/workshops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "workshops": workshops })))
        .mount(server)
        .await;
}

pub async fn mount_personal(server: &MockServer, ticket_id: &str, registrations: Value, ratings: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/registrations/{ticket_id}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "registrations": registrations })),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/ratings/{ticket_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ratings": ratings })))
        .mount(server)
        .await;
}
