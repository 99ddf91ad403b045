use serde::Serialize;

use super::{badge::Badge, repo::LeaderboardRow};
use crate::auth::repo_types::PublicUser;

#[derive(Debug, Serialize)]
pub struct Profile {
    #[serde(flatten)]
    pub user: PublicUser,
    pub total_reports: i64,
    pub badge: Badge,
}

#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub user: Profile,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub points: i64,
    pub reports: i64,
    pub badge: Badge,
}

impl From<LeaderboardRow> for LeaderboardEntry {
    fn from(r: LeaderboardRow) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name,
            points: r.points,
            reports: r.reports,
            badge: Badge::for_points(r.points),
        }
    }
}
