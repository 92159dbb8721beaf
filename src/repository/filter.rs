//! Translation of validated task-listing query parameters into a normalized
//! filter/sort/pagination specification.
//!
//! This is a pure transformation; store adapters decide how to execute the
//! spec (the Mongo adapter compiles it to a BSON query, the in-memory
//! adapter evaluates it directly).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::models::{Task, TaskPriority, TaskQueryParams, TaskStatus};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
pub const DEFAULT_SORT_BY: &str = "created_at";

const SORTABLE_FIELDS: [&str; 5] = ["created_at", "updated_at", "due_date", "priority", "title"];

/// Normalized `{predicates, sort field/direction, skip, limit}` handed from
/// the query builder to a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub status: Option<TaskStatus>,
    /// Ordinal priority rank (low=1, medium=2, high=3).
    pub priority: Option<i32>,
    /// Case-insensitive substring matched against title OR description.
    pub search: Option<String>,
    /// Inclusive lower bound on the due date.
    pub due_date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the due date.
    pub due_date_to: Option<DateTime<Utc>>,
    pub sort_by: String,
    pub descending: bool,
    pub skip: u64,
    pub limit: i64,
}

impl FilterSpec {
    /// Builds the spec from validated query parameters, applying defaults:
    /// page=1, limit=10 clamped to [1, 100], sort by `created_at`
    /// descending. An unknown sort field falls back to `created_at` and a
    /// malformed date bound is silently dropped rather than rejected.
    pub fn from_params(params: &TaskQueryParams) -> Self {
        let page = params.page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = params
            .limit
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);

        let sort_by = match params.sort_by.as_deref() {
            Some(field) if SORTABLE_FIELDS.contains(&field) => field.to_string(),
            _ => DEFAULT_SORT_BY.to_string(),
        };

        Self {
            status: params.status.as_deref().and_then(TaskStatus::parse),
            priority: params
                .priority
                .as_deref()
                .and_then(TaskPriority::parse)
                .map(|p| p.rank()),
            search: params
                .search
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string()),
            due_date_from: params.due_date_from.as_deref().and_then(parse_date_bound),
            due_date_to: params.due_date_to.as_deref().and_then(parse_date_bound),
            sort_by,
            descending: params.sort_order.as_deref() != Some("asc"),
            skip: (page - 1).saturating_mul(limit) as u64,
            limit,
        }
    }

    /// Evaluates the predicate portion against a task. Used by the
    /// in-memory adapter; the Mongo adapter compiles the same semantics to
    /// a query document.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(rank) = self.priority {
            if task.priority.rank() != rank {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !task.title.to_lowercase().contains(&needle)
                && !task.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if self.due_date_from.is_some() || self.due_date_to.is_some() {
            // A task without a due date never matches a due-date bound.
            let Some(due) = task.due_date else {
                return false;
            };
            if let Some(from) = self.due_date_from {
                if due < from {
                    return false;
                }
            }
            if let Some(to) = self.due_date_to {
                if due > to {
                    return false;
                }
            }
        }
        true
    }
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::from_params(&TaskQueryParams::default())
    }
}

fn parse_date_bound(raw: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(DateTime::from_naive_utc_and_offset(
        date.and_time(NaiveTime::MIN),
        Utc,
    ))
}
