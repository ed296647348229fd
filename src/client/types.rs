//! Wire types exchanged with the user directory API

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::paging::Record;

/// A user record as served by `/v1/users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub gender: String,
    #[serde(default)]
    pub title: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub street_number: Option<i64>,
    #[serde(default)]
    pub street_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timezone_offset: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cell: Option<String>,
    pub email: String,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub registered_at: Option<String>,
    #[serde(default)]
    pub nat: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Single-line address: "12 Main St, City, State, Country, 12345"
    pub fn location(&self) -> String {
        let street = format!(
            "{} {}",
            self.street_number.map(|n| n.to_string()).unwrap_or_default(),
            self.street_name.as_deref().unwrap_or_default()
        );

        let mut parts = vec![street.trim().to_string()];
        for part in [&self.city, &self.state, &self.country, &self.postcode] {
            if let Some(value) = part {
                parts.push(value.clone());
            }
        }

        parts.retain(|p| !p.is_empty());
        parts.join(", ")
    }

    /// Labelled fields in display order; absent values are skipped
    pub fn display_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("ID", self.id.to_string()),
            ("Name", self.full_name()),
            ("Gender", self.gender.clone()),
            ("Email", self.email.clone()),
        ];

        let optional = [
            ("Title", self.title.clone()),
            ("Username", self.username.clone()),
            ("Phone", self.phone.clone()),
            ("Cell", self.cell.clone()),
            ("Address", Some(self.location()).filter(|s| !s.is_empty())),
            (
                "Coordinates",
                self.latitude
                    .zip(self.longitude)
                    .map(|(lat, lon)| format!("{:.4}, {:.4}", lat, lon)),
            ),
            ("Timezone", self.timezone_offset.clone()),
            ("Born", self.dob.as_deref().map(format_date)),
            ("Registered", self.registered_at.as_deref().map(format_date)),
            ("Nationality", self.nat.clone()),
            ("Picture", self.picture.clone()),
            ("Added", self.created_at.as_deref().map(format_date)),
        ];
        fields.extend(
            optional
                .into_iter()
                .filter_map(|(label, value)| value.map(|v| (label, v))),
        );

        fields
    }
}

impl Record for User {
    fn id(&self) -> String {
        self.id.to_string()
    }
}

/// One response of the paged listing endpoint
#[derive(Debug, Clone)]
pub struct SourcePage<R> {
    pub records: Vec<R>,

    /// Value of the `x-total-count` header, when present and parseable
    pub total_count: Option<usize>,
}

impl<R> SourcePage<R> {
    pub fn new(records: Vec<R>, total_count: Option<usize>) -> Self {
        Self {
            records,
            total_count,
        }
    }
}

/// Render an API timestamp as a calendar date, falling back to the raw text
pub fn format_date(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d").to_string();
    }

    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%Y-%m-%d").to_string();
    }

    raw.to_string()
}
