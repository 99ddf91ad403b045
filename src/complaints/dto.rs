use serde::{Deserialize, Serialize};

use super::repo_types::{Category, CreatedIssue, IssueListItem, IssueStatus};

#[derive(Debug, Default, Deserialize)]
pub struct CreateComplaintRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Category name, resolved to an id on submit.
    pub category: Option<String>,
    pub category_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub photo_url: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: IssueStatus,
    pub is_escalated: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ComplaintData<T> {
    pub complaint: T,
}

pub type CreatedComplaint = ComplaintData<CreatedIssue>;
pub type UpdatedComplaint = ComplaintData<IssueListItem>;

#[derive(Debug, Serialize)]
pub struct ComplaintList {
    pub complaints: Vec<IssueListItem>,
}

#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct Upvoted {
    pub id: i64,
    pub upvotes: i64,
}
