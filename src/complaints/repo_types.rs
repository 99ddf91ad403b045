use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum IssueStatus {
    Submitted,
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Summary returned right after a complaint is stored.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CreatedIssue {
    pub id: i64,
    pub title: String,
    pub status: IssueStatus,
    pub priority: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Issue joined with its category name and, for public listings, the reporter's name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IssueListItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: IssueStatus,
    pub is_escalated: bool,
    pub priority: String,
    pub priority_score: i64,
    pub address: String,
    pub photo_url: Option<String>,
    pub upvotes: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromRow)]
pub struct IssueStats {
    pub total: i64,
    pub submitted: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub closed: i64,
    pub escalated: i64,
}
