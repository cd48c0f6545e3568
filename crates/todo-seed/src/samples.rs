//! Literal sample documents written on every seeding run.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::models::{TodoItem, TodoList, TodoPriority, TodoStatus};

pub const SAMPLE_LIST_ID: &str = "list_test_001";
pub const SAMPLE_ITEM_ID: &str = "item_test_001";
pub const SAMPLE_OWNER_ID: &str = "1";

/// Due date of the sample item. Unlike the audit timestamps this never moves.
pub const SAMPLE_DUE_DATE: OffsetDateTime = datetime!(2024-12-31 0:00 UTC);

/// Which set of sample text to write.
///
/// Both variants share identifiers, status, priority and due date; they
/// differ only in titles, descriptions and tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleVariant {
    /// Realistic API-development task, with Chinese text.
    #[default]
    Api,
    /// Placeholder text from early manual testing.
    Scratch,
}

#[derive(Debug, Error)]
#[error("unknown sample variant '{0}' (expected 'api' or 'scratch')")]
pub struct UnknownVariant(String);

impl SampleVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleVariant::Api => "api",
            SampleVariant::Scratch => "scratch",
        }
    }

    /// Sample list, timestamped `now`.
    pub fn list(&self, now: OffsetDateTime) -> TodoList {
        let (title, description) = match self {
            SampleVariant::Api => ("开发任务", "API开发相关任务"),
            SampleVariant::Scratch => ("deve", "sddfsdf"),
        };

        TodoList {
            list_id: SAMPLE_LIST_ID.to_string(),
            owner_id: SAMPLE_OWNER_ID.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sample item belonging to the sample list, timestamped `now`.
    pub fn item(&self, now: OffsetDateTime) -> TodoItem {
        let (title, description, tags): (&str, &str, &[&str]) = match self {
            SampleVariant::Api => ("完成控制器代码", "实现TODO项的CRUD接口", &["开发", "紧急"]),
            SampleVariant::Scratch => ("sdf12312312", "3434234234", &["111", "2222"]),
        };

        TodoItem {
            item_id: SAMPLE_ITEM_ID.to_string(),
            list_id: SAMPLE_LIST_ID.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            due_date: SAMPLE_DUE_DATE,
            status: TodoStatus::InProgress,
            priority: TodoPriority::High,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl fmt::Display for SampleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" | "zh" => Ok(SampleVariant::Api),
            "scratch" => Ok(SampleVariant::Scratch),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_share_identity() {
        let now = OffsetDateTime::now_utc();
        for variant in [SampleVariant::Api, SampleVariant::Scratch] {
            let list = variant.list(now);
            let item = variant.item(now);

            assert_eq!(list.list_id, "list_test_001");
            assert_eq!(list.owner_id, "1");
            assert_eq!(item.item_id, "item_test_001");
            assert_eq!(item.list_id, list.list_id);
            assert_eq!(item.status.as_str(), "In Progress");
            assert_eq!(item.priority.as_str(), "High");
            assert_eq!(item.due_date, datetime!(2024-12-31 0:00 UTC));
            assert_eq!(item.created_at, now);
        }
    }

    #[test]
    fn test_variant_text() {
        let now = OffsetDateTime::now_utc();

        let api = SampleVariant::Api.item(now);
        assert_eq!(api.title, "完成控制器代码");
        assert_eq!(api.tags, vec!["开发", "紧急"]);
        assert_eq!(SampleVariant::Api.list(now).title, "开发任务");

        let scratch = SampleVariant::Scratch.item(now);
        assert_eq!(scratch.description, "3434234234");
        assert_eq!(scratch.tags, vec!["111", "2222"]);
        assert_eq!(SampleVariant::Scratch.list(now).description, "sddfsdf");
    }

    #[test]
    fn test_samples_pass_validation_unchanged() {
        let now = OffsetDateTime::now_utc();
        for variant in [SampleVariant::Api, SampleVariant::Scratch] {
            let mut item = variant.item(now);
            let before = item.clone();
            item.normalize().unwrap();
            assert_eq!(item, before);

            let mut list = variant.list(now);
            list.normalize().unwrap();
            assert_eq!(list, variant.list(now));
        }
    }

    #[test]
    fn test_parse_variant() {
        assert_eq!("api".parse::<SampleVariant>().unwrap(), SampleVariant::Api);
        assert_eq!("ZH".parse::<SampleVariant>().unwrap(), SampleVariant::Api);
        assert_eq!(
            " scratch ".parse::<SampleVariant>().unwrap(),
            SampleVariant::Scratch
        );
        assert!("english".parse::<SampleVariant>().is_err());
    }
}
