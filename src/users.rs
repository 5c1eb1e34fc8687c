//! User administration and profiles. The plain listing endpoint has been
//! seen answering with both a bare array and a paginated envelope, so it
//! goes through [`MaybePaged`] and is normalized to a page.

use crate::client::{ApiClient, Auth};
use crate::error::ApiError;
use crate::models::{
    MaybePaged, NewModerator, Page, ProfileDetail, ProfileUpdate, User, UserAction, UserRole,
    UserStats, UserStatus,
};
use crate::query::Params;
use serde_json::json;

/// Filters for the admin user listing.
#[derive(Clone, Debug, Default)]
pub struct UserFilters {
    pub search: Option<String>,
    pub status: Option<UserStatus>,
    pub role: Option<UserRole>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl UserFilters {
    fn to_path(&self) -> String {
        let mut p = Params::new();
        p.push_opt("search", self.search.as_deref());
        p.push_opt("status", self.status.map(UserStatus::as_str));
        p.push_opt("role", self.role.map(UserRole::as_str));
        p.push_opt("page", self.page);
        p.push_opt("size", self.size);
        p.append_to("/users")
    }
}

pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi { client: self }
    }
}

impl UsersApi<'_> {
    pub async fn list(&self, filters: &UserFilters) -> Result<Page<User>, ApiError> {
        let listing: MaybePaged<User> = self.client.get(&filters.to_path(), Auth::Required).await?;
        Ok(listing.into_page())
    }

    pub async fn get(&self, id: i64) -> Result<User, ApiError> {
        self.client.get(&format!("/admin/users/{id}"), Auth::Required).await
    }

    /// Apply a moderation action (suspend, ban, promote, ...).
    pub async fn act(&self, user_id: i64, action: &UserAction) -> Result<User, ApiError> {
        self.client
            .post(&format!("/admin/users/{user_id}/action"), action, Auth::Required)
            .await
    }

    pub async fn set_status(&self, user_id: i64, status: UserStatus) -> Result<User, ApiError> {
        self.client
            .put(
                &format!("/admin/users/{user_id}/status"),
                &json!({ "status": status }),
                Auth::Required,
            )
            .await
    }

    pub async fn set_role(&self, user_id: i64, role: UserRole) -> Result<User, ApiError> {
        self.client
            .put(
                &format!("/admin/users/{user_id}/role"),
                &json!({ "role": role }),
                Auth::Required,
            )
            .await
    }

    pub async fn stats(&self) -> Result<UserStats, ApiError> {
        self.client.get("/admin/users/stats", Auth::Required).await
    }

    pub async fn delete(&self, user_id: i64) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .delete(&format!("/admin/users/{user_id}"), Auth::Required)
            .await?;
        Ok(())
    }

    /// Grant moderator rights by email. Admin only.
    pub async fn create_moderator(&self, request: &NewModerator) -> Result<User, ApiError> {
        self.client
            .post("/admin/users/moderators", request, Auth::Required)
            .await
    }

    /// Public profile of a user, as shown on their page.
    pub async fn profile_detail(&self, user_id: i64) -> Result<ProfileDetail, ApiError> {
        self.client
            .get(&format!("/users/{user_id}/profile-detail"), Auth::Required)
            .await
    }

    /// Update the signed-in user's own profile.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.client.put("/users/profile", update, Auth::Required).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_serialize_enums_with_backend_casing() {
        let filters = UserFilters {
            status: Some(UserStatus::Suspended),
            role: Some(UserRole::Moderator),
            page: Some(1),
            ..Default::default()
        };
        assert_eq!(
            filters.to_path(),
            "/users?status=SUSPENDED&role=MODERATOR&page=1"
        );
    }
}
