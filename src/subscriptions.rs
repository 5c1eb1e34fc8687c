//! Follow relationships between users.

use crate::client::{ApiClient, Auth};
use crate::error::ApiError;
use crate::models::UserRef;
use serde_json::json;

pub struct SubscriptionsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn subscriptions(&self) -> SubscriptionsApi<'_> {
        SubscriptionsApi { client: self }
    }
}

impl SubscriptionsApi<'_> {
    /// Follow a user. The backend answers with a confirmation message.
    pub async fn follow(&self, following_id: i64) -> Result<String, ApiError> {
        self.client
            .post(
                "/subscriptions/follow",
                &json!({ "followingId": following_id }),
                Auth::Required,
            )
            .await
    }

    pub async fn unfollow(&self, following_id: i64) -> Result<String, ApiError> {
        self.client
            .delete(
                &format!("/subscriptions/unfollow/{following_id}"),
                Auth::Required,
            )
            .await
    }

    pub async fn followers(&self, user_id: i64) -> Result<Vec<UserRef>, ApiError> {
        self.client
            .get(&format!("/subscriptions/followers/{user_id}"), Auth::Required)
            .await
    }

    pub async fn following(&self, user_id: i64) -> Result<Vec<UserRef>, ApiError> {
        self.client
            .get(&format!("/subscriptions/following/{user_id}"), Auth::Required)
            .await
    }

    pub async fn is_following(&self, user_id: i64) -> Result<bool, ApiError> {
        self.client
            .get(
                &format!("/subscriptions/is-following/{user_id}"),
                Auth::Required,
            )
            .await
    }
}
