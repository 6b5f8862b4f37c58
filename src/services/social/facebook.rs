//! Facebook page feed

use super::client::{absorb, endpoint, take_array, SocialClient};
use super::error::SocialError;
use serde_json::Value;

impl SocialClient {
    /// Posts published by or on a Facebook page, at most `count`
    pub async fn facebook_page_feed(&self, page_id: &str, count: u32) -> Vec<Value> {
        self.fetch_facebook_page_feed(page_id, count)
            .await
            .unwrap_or_else(|err| absorb("facebook", err))
    }

    async fn fetch_facebook_page_feed(
        &self,
        page_id: &str,
        count: u32,
    ) -> Result<Vec<Value>, SocialError> {
        let url = endpoint(
            &self.config.facebook_api,
            &format!("{}/feed", urlencoding::encode(page_id)),
        );
        // App access token: "{app_id}|{app_secret}"
        let access_token = format!(
            "{}|{}",
            self.config.facebook_app_id, self.config.facebook_app_secret
        );
        let request = self.http.get(url).query(&[
            ("limit", count.to_string()),
            ("access_token", access_token),
        ]);

        take_array(self.send_json(request).await?, "data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SocialConfig;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(base: String) -> SocialClient {
        SocialClient::new(SocialConfig {
            facebook_api: base,
            facebook_app_id: "app".to_string(),
            facebook_app_secret: "secret".to_string(),
            ..SocialConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_returns_data() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/dipy/feed")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "2".into()),
                Matcher::UrlEncoded("access_token".into(), "app|secret".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"data": [{"message": "New release"}], "paging": {}}).to_string())
            .create_async()
            .await;

        let posts = client_for(server.url()).facebook_page_feed("dipy", 2).await;

        assert_eq!(posts, vec![json!({"message": "New release"})]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_data_yields_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/dipy/feed")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"paging": {}}"#)
            .create_async()
            .await;

        assert!(client_for(server.url()).facebook_page_feed("dipy", 2).await.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_yields_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/dipy/feed")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("upstream failure")
            .create_async()
            .await;

        assert!(client_for(server.url()).facebook_page_feed("dipy", 2).await.is_empty());
    }
}
