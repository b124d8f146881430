//! Domain types mirrored from the registration API.
//!
//! Field names follow the API's camelCase JSON. Optional fields default,
//! whether the key is missing or `null`, so that partially populated records
//! from the server still decode.

use serde::{Deserialize, Deserializer, Serialize};

/// Scope value that grants an admin every workshop.
pub const ALL_WORKSHOPS_SENTINEL: &str = "*";

/// Decodes an explicit `null` as the type's default. Pair with
/// `#[serde(default)]` so a missing key behaves the same.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A workshop in the public catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workshop {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub speakers: Vec<String>,
    /// HTML fragment as authored on the server.
    #[serde(default, deserialize_with = "null_as_default", rename = "abstract")]
    pub abstract_html: String,
    pub max_capacity: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_registrations: i64,
}

impl Workshop {
    /// Capacity minus current registrations. Not clamped: an overbooked
    /// workshop reports a negative value.
    pub fn available_spots(&self) -> i64 {
        self.max_capacity - self.current_registrations
    }

    pub fn is_full(&self) -> bool {
        self.available_spots() == 0
    }
}

/// A (ticket, workshop) registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub ticket_id: String,
    pub workshop_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub registration_time: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Registration {
    /// Participant display name as shown in admin listings.
    pub fn participant_name(&self) -> String {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
            .unwrap_or_else(|| self.ticket_id.clone())
    }
}

/// Binary "did you learn something new" answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearnedSomething {
    Yes,
    No,
}

impl LearnedSomething {
    pub fn as_str(self) -> &'static str {
        match self {
            LearnedSomething::Yes => "Yes",
            LearnedSomething::No => "No",
        }
    }
}

/// A submitted rating as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ticket_id: String,
    pub workshop_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_satisfaction: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub speaker_effectiveness: u8,
    #[serde(default)]
    pub learned_something: Option<LearnedSomething>,
    #[serde(default)]
    pub additional_feedback: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub submitted_at: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Rating {
    /// Rater name, or "Anonymous" when the server did not attach one.
    pub fn rater_name(&self) -> String {
        join_name(self.first_name.as_deref(), self.last_name.as_deref())
            .unwrap_or_else(|| "Anonymous".to_string())
    }

    /// Feedback text if the rater left any.
    pub fn feedback(&self) -> Option<&str> {
        self.additional_feedback
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Which workshops an admin identity may manage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub enum AdminScope {
    AllWorkshops,
    Workshops(Vec<String>),
}

impl AdminScope {
    pub fn contains(&self, workshop_id: &str) -> bool {
        match self {
            AdminScope::AllWorkshops => true,
            AdminScope::Workshops(ids) => ids.iter().any(|id| id == workshop_id),
        }
    }

    /// Short label for headers: "All Workshops" or "3 Workshops".
    pub fn label(&self) -> String {
        match self {
            AdminScope::AllWorkshops => "All Workshops".to_string(),
            AdminScope::Workshops(ids) if ids.len() == 1 => "1 Workshop".to_string(),
            AdminScope::Workshops(ids) => format!("{} Workshops", ids.len()),
        }
    }
}

impl Default for AdminScope {
    fn default() -> Self {
        AdminScope::Workshops(Vec::new())
    }
}

impl From<Vec<String>> for AdminScope {
    fn from(ids: Vec<String>) -> Self {
        if ids.iter().any(|id| id == ALL_WORKSHOPS_SENTINEL) {
            AdminScope::AllWorkshops
        } else {
            AdminScope::Workshops(ids)
        }
    }
}

impl From<AdminScope> for Vec<String> {
    fn from(scope: AdminScope) -> Self {
        match scope {
            AdminScope::AllWorkshops => vec![ALL_WORKSHOPS_SENTINEL.to_string()],
            AdminScope::Workshops(ids) => ids,
        }
    }
}

/// The logged-in attendee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub ticket_id: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub admin_scope: AdminScope,
}

impl Identity {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// True when this identity is an admin whose scope covers `workshop_id`.
    pub fn can_administer(&self, workshop_id: &str) -> bool {
        self.is_admin && self.admin_scope.contains(workshop_id)
    }
}

fn join_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let joined = format!("{} {}", first.unwrap_or(""), last.unwrap_or(""));
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
