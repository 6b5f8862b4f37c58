//! YouTube channel uploads

use super::client::{absorb, endpoint, take_array, SocialClient};
use super::error::SocialError;
use serde_json::Value;

impl SocialClient {
    /// Most recent videos of a channel, at most `count`
    pub async fn youtube_videos(&self, channel_id: &str, count: u32) -> Vec<Value> {
        self.fetch_youtube_videos(channel_id, count)
            .await
            .unwrap_or_else(|err| absorb("youtube", err))
    }

    async fn fetch_youtube_videos(
        &self,
        channel_id: &str,
        count: u32,
    ) -> Result<Vec<Value>, SocialError> {
        let url = endpoint(&self.config.google_api, "youtube/v3/search");
        let request = self.http.get(url).query(&[
            ("order", "date".to_string()),
            ("part", "snippet".to_string()),
            ("channelId", channel_id.to_string()),
            ("maxResults", count.to_string()),
            ("key", self.config.google_api_key.clone()),
        ]);

        take_array(self.send_json(request).await?, "items")
    }
}
