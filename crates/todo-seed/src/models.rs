//! Document shapes stored in the todo database.

use bson::serde_helpers::time_0_3_offsetdatetime_as_bson_datetime as bson_datetime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

/// Maximum length of a list or item title, in characters.
pub const TITLE_MAX_LEN: usize = 100;

/// Maximum length of a list or item description, in characters.
pub const DESCRIPTION_MAX_LEN: usize = 500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("{entity} title cannot be empty")]
    EmptyTitle { entity: &'static str },
    #[error("{entity} {field} exceeds {max} characters")]
    TooLong {
        entity: &'static str,
        field: &'static str,
        max: usize,
    },
}

/// Progress state of a todo item, matching the strings the API stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TodoStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 3] = [Self::NotStarted, Self::InProgress, Self::Completed];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::NotStarted => "Not Started",
            TodoStatus::InProgress => "In Progress",
            TodoStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TodoPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TodoPriority {
    pub const ALL: [TodoPriority; 3] = [Self::Low, Self::Medium, Self::High];

    /// Returns the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoPriority::Low => "Low",
            TodoPriority::Medium => "Medium",
            TodoPriority::High => "High",
        }
    }
}

/// A todo list document (`todo_lists`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoList {
    pub list_id: String,
    /// Owning user. Not checked against any users table.
    pub owner_id: String,
    pub title: String,
    pub description: String,
    #[serde(with = "bson_datetime")]
    pub created_at: OffsetDateTime,
    #[serde(with = "bson_datetime")]
    pub updated_at: OffsetDateTime,
}

impl TodoList {
    pub const COLLECTION: &'static str = "todo_lists";
    pub const KEY_FIELD: &'static str = "list_id";

    /// Trims the title and checks field lengths.
    pub fn normalize(&mut self) -> Result<(), ModelError> {
        self.title = normalize_title("List", &self.title)?;
        check_description("List", &self.description)
    }
}

/// A todo item document (`todo_items`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    pub item_id: String,
    /// Parent list. Indexed, but not enforced as a foreign key.
    pub list_id: String,
    pub title: String,
    pub description: String,
    #[serde(with = "bson_datetime")]
    pub due_date: OffsetDateTime,
    pub status: TodoStatus,
    pub priority: TodoPriority,
    pub tags: Vec<String>,
    #[serde(with = "bson_datetime")]
    pub created_at: OffsetDateTime,
    #[serde(with = "bson_datetime")]
    pub updated_at: OffsetDateTime,
}

impl TodoItem {
    pub const COLLECTION: &'static str = "todo_items";
    pub const KEY_FIELD: &'static str = "item_id";

    /// Trims the title, checks field lengths and drops repeated tags.
    ///
    /// Tags keep the position of their first occurrence.
    pub fn normalize(&mut self) -> Result<(), ModelError> {
        self.title = normalize_title("Item", &self.title)?;
        check_description("Item", &self.description)?;

        let mut seen = std::collections::HashSet::new();
        self.tags.retain(|tag| seen.insert(tag.clone()));
        Ok(())
    }
}

fn normalize_title(entity: &'static str, title: &str) -> Result<String, ModelError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ModelError::EmptyTitle { entity });
    }
    if trimmed.chars().count() > TITLE_MAX_LEN {
        return Err(ModelError::TooLong {
            entity,
            field: "title",
            max: TITLE_MAX_LEN,
        });
    }
    Ok(trimmed.to_string())
}

fn check_description(entity: &'static str, description: &str) -> Result<(), ModelError> {
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(ModelError::TooLong {
            entity,
            field: "description",
            max: DESCRIPTION_MAX_LEN,
        });
    }
    Ok(())
}
