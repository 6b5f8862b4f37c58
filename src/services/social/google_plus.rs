//! Google+ public activity

use super::client::{absorb, endpoint, take_array, SocialClient};
use super::error::SocialError;
use serde_json::Value;

const ACTIVITY_FIELDS: &str = "etag,id,items,kind,nextLink,nextPageToken,selfLink,title,updated";

impl SocialClient {
    /// Public activities of a Google+ user, at most `count`
    pub async fn google_plus_activity(&self, user_id: &str, count: u32) -> Vec<Value> {
        self.fetch_google_plus_activity(user_id, count)
            .await
            .unwrap_or_else(|err| absorb("google_plus", err))
    }

    async fn fetch_google_plus_activity(
        &self,
        user_id: &str,
        count: u32,
    ) -> Result<Vec<Value>, SocialError> {
        let url = endpoint(
            &self.config.google_api,
            &format!("plus/v1/people/{}/activities/public", urlencoding::encode(user_id)),
        );
        let request = self.http.get(url).query(&[
            ("maxResults", count.to_string()),
            ("fields", ACTIVITY_FIELDS.to_string()),
            ("key", self.config.google_api_key.clone()),
        ]);

        let body = self.send_json(request).await?;
        if let Some(error) = body.get("error") {
            return Err(SocialError::UnexpectedResponse(error.to_string()));
        }
        take_array(body, "items")
    }
}
