//! Reddit adapter over the OAuth JSON API.
//!
//! With a bot username and password the client authenticates with the
//! password grant and may post. Without them it falls back to the
//! client-credentials grant and stays read-only.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{ContentProvider, SubmittedReply, TimeWindow};
use crate::config::RedditSettings;
use crate::domain::{is_removed_body, Candidate, Reply, DELETED_AUTHOR, LINK_POST_PLACEHOLDER};
use crate::error::{ConfigError, ProviderError};

/// Refresh the token this long before Reddit says it expires
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Site root used for reply URLs
const SITE_URL: &str = "https://reddit.com";

/// Bot account used for posting
struct Login {
    username: String,
    password: String,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

/// Reddit API client
pub struct RedditClient {
    client_id: String,
    client_secret: String,
    login: Option<Login>,
    user_agent: String,
    auth_url: String,
    api_url: String,
    token: Mutex<Option<AccessToken>>,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    kind: String,
    data: Value,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    id: String,
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: u64,
    subreddit: String,
}

impl From<RawPost> for Candidate {
    fn from(post: RawPost) -> Self {
        let body = if post.selftext.is_empty() {
            LINK_POST_PLACEHOLDER.to_string()
        } else {
            post.selftext
        };

        Candidate {
            id: post.id,
            title: post.title,
            body,
            channel: post.subreddit,
            score: post.score,
            reply_count: post.num_comments,
            url: post.url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawComment {
    id: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    score: i64,
    author: Option<String>,
    #[serde(default)]
    created_utc: f64,
}

#[derive(Debug, Deserialize)]
struct CommentResponse {
    json: CommentResponseBody,
}

#[derive(Debug, Deserialize)]
struct CommentResponseBody {
    #[serde(default)]
    errors: Vec<Value>,
    data: Option<CommentResponseData>,
}

#[derive(Debug, Deserialize)]
struct CommentResponseData {
    #[serde(default)]
    things: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct CreatedComment {
    id: String,
    permalink: Option<String>,
}

impl RedditClient {
    /// Create a client from resolved settings
    pub fn new(settings: &RedditSettings) -> Result<Self, ConfigError> {
        let client_id = settings
            .client_id
            .clone()
            .ok_or(ConfigError::MissingCredential("REDDIT_CLIENT_ID"))?;
        let client_secret = settings
            .client_secret
            .clone()
            .ok_or(ConfigError::MissingCredential("REDDIT_CLIENT_SECRET"))?;

        let login = match (&settings.username, &settings.password) {
            (Some(username), Some(password)) => Some(Login {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        };

        match &login {
            Some(login) => info!(
                username = %login.username,
                "Initialized Reddit client with posting capabilities"
            ),
            None => info!("Initialized Reddit client in read-only mode"),
        }

        Ok(Self {
            client_id,
            client_secret,
            login,
            user_agent: settings.user_agent.clone(),
            auth_url: settings.auth_url.trim_end_matches('/').to_string(),
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
            client: reqwest::Client::new(),
        })
    }

    /// Fetch a bearer token, reusing the cached one while it is valid
    async fn access_token(&self) -> Result<String, ProviderError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let form: Vec<(&str, &str)> = match &self.login {
            Some(login) => vec![
                ("grant_type", "password"),
                ("username", login.username.as_str()),
                ("password", login.password.as_str()),
            ],
            None => vec![("grant_type", "client_credentials")],
        };

        let response = self
            .client
            .post(format!("{}/api/v1/access_token", self.auth_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .form(&form)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(format!("token response: {}", e)))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        debug!(expires_in = token.expires_in, "Obtained Reddit access token");

        let value = token.access_token;
        *cached = Some(AccessToken {
            value: value.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(value)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let token = self.access_token().await?;

        let response = self
            .client
            .get(format!("{}{}", self.api_url, path))
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(query)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(format!("{}: {}", path, e)))
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().path().to_string();
        let text = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(url));
        }

        Err(ProviderError::Api {
            service: "Reddit",
            status: status.as_u16(),
            message: text.trim().to_string(),
        })
    }

    fn posts_from(listing: Listing) -> Result<Vec<Candidate>, ProviderError> {
        listing
            .data
            .children
            .into_iter()
            .filter(|thing| thing.kind == "t3")
            .map(|thing| {
                serde_json::from_value::<RawPost>(thing.data)
                    .map(Candidate::from)
                    .map_err(|e| ProviderError::Decode(format!("post: {}", e)))
            })
            .collect()
    }
}

#[async_trait]
impl ContentProvider for RedditClient {
    fn name(&self) -> &str {
        "reddit"
    }

    fn can_write(&self) -> bool {
        self.login.is_some()
    }

    async fn list_top(
        &self,
        channel: &str,
        limit: usize,
        window: TimeWindow,
    ) -> Result<Vec<Candidate>, ProviderError> {
        let listing: Listing = self
            .get_json(
                &format!("/r/{}/top", channel),
                &[
                    ("t", window.to_string()),
                    ("limit", limit.to_string()),
                    ("raw_json", "1".to_string()),
                ],
            )
            .await?;

        let posts = Self::posts_from(listing)?;
        info!(channel, count = posts.len(), "Fetched top posts");
        Ok(posts)
    }

    async fn fetch_body(&self, id: &str) -> Result<Candidate, ProviderError> {
        let listing: Listing = self
            .get_json(&format!("/by_id/t3_{}", id), &[("raw_json", "1".to_string())])
            .await?;

        Self::posts_from(listing)?
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound(format!("post {}", id)))
    }

    async fn list_top_replies(
        &self,
        candidate: &Candidate,
        limit: usize,
    ) -> Result<Vec<Reply>, ProviderError> {
        // The endpoint returns [post listing, comment listing]
        let (_post, comments): (Listing, Listing) = self
            .get_json(
                &format!("/comments/{}", candidate.id),
                &[
                    ("sort", "top".to_string()),
                    ("limit", limit.to_string()),
                    ("depth", "1".to_string()),
                    ("raw_json", "1".to_string()),
                ],
            )
            .await?;

        let mut replies = Vec::new();
        for thing in comments
            .data
            .children
            .into_iter()
            .filter(|thing| thing.kind == "t1")
            .take(limit)
        {
            let comment: RawComment = match serde_json::from_value(thing.data) {
                Ok(comment) => comment,
                Err(e) => {
                    warn!(post_id = %candidate.id, error = %e, "Skipping malformed comment");
                    continue;
                }
            };

            if is_removed_body(&comment.body) {
                continue;
            }

            replies.push(Reply {
                id: comment.id,
                body: comment.body,
                score: comment.score,
                author: comment
                    .author
                    .unwrap_or_else(|| DELETED_AUTHOR.to_string()),
                created_utc: comment.created_utc,
            });
        }

        info!(post_id = %candidate.id, count = replies.len(), "Fetched replies");
        Ok(replies)
    }

    async fn submit_reply(&self, id: &str, text: &str) -> Result<SubmittedReply, ProviderError> {
        if !self.can_write() {
            return Err(ProviderError::NoAuth);
        }

        let token = self.access_token().await?;
        let thing_id = format!("t3_{}", id);

        let response = self
            .client
            .post(format!("{}/api/comment", self.api_url))
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .form(&[("api_type", "json"), ("thing_id", thing_id.as_str()), ("text", text)])
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let body: CommentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(format!("comment response: {}", e)))?;

        if !body.json.errors.is_empty() {
            return Err(ProviderError::Api {
                service: "Reddit",
                status: 200,
                message: serde_json::to_string(&body.json.errors).unwrap_or_default(),
            });
        }

        let created = body
            .json
            .data
            .and_then(|data| data.things.into_iter().find(|thing| thing.kind == "t1"))
            .ok_or_else(|| ProviderError::Decode("comment response had no comment".to_string()))?;

        let created: CreatedComment = serde_json::from_value(created.data)
            .map_err(|e| ProviderError::Decode(format!("created comment: {}", e)))?;

        info!(post_id = id, reply_id = %created.id, "Posted reply");
        Ok(SubmittedReply {
            id: created.id,
            permalink: created.permalink,
        })
    }

    fn reply_url(&self, post_id: &str, reply: &SubmittedReply) -> Option<String> {
        Some(match &reply.permalink {
            Some(permalink) => format!("{}{}", SITE_URL, permalink),
            None => format!("{}/comments/{}/_/{}", SITE_URL, post_id, reply.id),
        })
    }
}
