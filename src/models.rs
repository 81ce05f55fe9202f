use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Color the backend assigns to a category stored without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#cccccc";

/// A named, colored grouping that tasks may optionally belong to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Category {
    /// Opaque identifier assigned by the backend.
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    /// Display name, never empty.
    pub name: String,
    /// Hex color token, e.g. `#ff7f2a`.
    #[serde(default = "default_color", deserialize_with = "de_color")]
    pub color: String,
}

/// A schedulable work item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Opaque identifier assigned by the backend. The client never makes one up.
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    /// Short summary, required on create and edit.
    pub title: String,
    /// Free text. A null from the backend becomes empty.
    #[serde(default, deserialize_with = "de_text")]
    pub description: String,
    /// Free-text project name, matched by the project filter.
    #[serde(default, deserialize_with = "de_text")]
    pub project: String,
    /// Defaults to Low when missing or unrecognised.
    #[serde(default, deserialize_with = "de_priority")]
    pub priority: Priority,
    /// Free-text owner, matched by the owner filter.
    #[serde(default, deserialize_with = "de_text")]
    pub owner: String,
    /// Nullable reference to [`Category::id`].
    #[serde(default, deserialize_with = "de_opt_id")]
    pub category_id: Option<String>,
    /// Calendar day the task is scheduled for. Undated tasks never reach the calendar.
    #[serde(default, deserialize_with = "de_date")]
    pub date: Option<NaiveDate>,
}

/// Task priority. Anything the backend sends that is not High or Medium is Low.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Maps free text onto a priority without ever failing.
    pub fn from_label(label: &str) -> Priority {
        match label.trim().to_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            _ => Priority::Low,
        }
    }

    /// Cycles High -> Medium -> Low -> High.
    pub fn next(self) -> Priority {
        match self {
            Priority::High => Priority::Medium,
            Priority::Medium => Priority::Low,
            Priority::Low => Priority::High,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    /// Strict parse used for user input, where a typo should be reported.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{}' (expected High, Medium or Low)", other)),
        }
    }
}

/// Category fields as submitted to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub color: String,
}

impl CategoryDraft {
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![("name", self.name.clone()), ("color", self.color.clone())]
    }
}

/// Task fields as submitted to the backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub project: String,
    pub priority: Priority,
    pub owner: String,
    pub category_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: String,
}

impl TaskDraft {
    /// Form body for create/update. Unset optional fields are omitted, not sent empty.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("title", self.title.clone()),
            ("project", self.project.clone()),
            ("priority", self.priority.as_str().to_string()),
            ("owner", self.owner.clone()),
        ];
        if let Some(cat) = &self.category_id {
            fields.push(("category_id", cat.clone()));
        }
        if let Some(date) = self.date {
            fields.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        fields.push(("description", self.description.clone()));
        fields
    }
}

impl From<&Task> for TaskDraft {
    fn from(t: &Task) -> Self {
        TaskDraft {
            title: t.title.clone(),
            project: t.project.clone(),
            priority: t.priority,
            owner: t.owner.clone(),
            category_id: t.category_id.clone(),
            date: t.date,
            description: t.description.clone(),
        }
    }
}

/// Parses a `YYYY-MM-DD` date as used on the wire and in form fields.
pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
}

fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
        }
    }
}

fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    RawId::deserialize(d).map(String::from)
}

fn de_opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(d)?
        .map(String::from)
        .filter(|s| !s.is_empty()))
}

fn de_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn de_color<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default_color))
}

fn de_priority<'de, D: Deserializer<'de>>(d: D) -> Result<Priority, D::Error> {
    Ok(Option::<String>::deserialize(d)?
        .map(|s| Priority::from_label(&s))
        .unwrap_or_default())
}

fn de_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    match Option::<String>::deserialize(d)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_date(&s).map(Some).map_err(serde::de::Error::custom),
    }
}
