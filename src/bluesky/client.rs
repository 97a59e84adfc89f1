use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{header, Client, Response};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::bluesky::facets::{link_facets, Facet};
use crate::bluesky::transport::PostingTransport;
use crate::config::DEFAULT_BLUESKY_SERVICE;
use crate::error::{Error, Result};
use crate::models::{ExternalLink, PostReference, PostUnit, ReplyRef};

const POST_COLLECTION: &str = "app.bsky.feed.post";

/// AT Protocol XRPC client for a single Bluesky account.
pub struct BlueskyClient {
    client: Client,
    service: String,
    session: Mutex<Option<Session>>,
}

struct Session {
    access_jwt: String,
    did: String,
}

#[derive(Serialize)]
struct CreateSessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionResponse {
    access_jwt: String,
    did: String,
    handle: String,
}

#[derive(Serialize)]
struct CreateRecordRequest<'a> {
    repo: &'a str,
    collection: &'static str,
    record: PostRecord<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostRecord<'a> {
    #[serde(rename = "$type")]
    record_type: &'static str,
    text: &'a str,
    created_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    facets: Vec<Facet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<&'a ReplyRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    embed: Option<ExternalEmbed<'a>>,
}

#[derive(Serialize)]
struct ExternalEmbed<'a> {
    #[serde(rename = "$type")]
    embed_type: &'static str,
    external: &'a ExternalLink,
}

#[derive(Deserialize)]
struct XrpcError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl BlueskyClient {
    pub fn new(service: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            service: service
                .unwrap_or(DEFAULT_BLUESKY_SERVICE)
                .trim_end_matches('/')
                .to_string(),
            session: Mutex::new(None),
        })
    }

    fn xrpc_url(&self, method: &str) -> String {
        format!("{}/xrpc/{}", self.service, method)
    }
}

#[async_trait]
impl PostingTransport for BlueskyClient {
    async fn login(&self, handle: &str, app_password: &str) -> Result<()> {
        tracing::info!("Logging in to {} as {}", self.service, handle);

        let response = self
            .client
            .post(self.xrpc_url("com.atproto.server.createSession"))
            .json(&CreateSessionRequest {
                identifier: handle,
                password: app_password,
            })
            .send()
            .await?;

        let response = check_status(response, "createSession").await?;
        let created: CreateSessionResponse = response.json().await?;
        tracing::debug!("Session created for {} ({})", created.handle, created.did);

        *self.session.lock().await = Some(Session {
            access_jwt: created.access_jwt,
            did: created.did,
        });

        Ok(())
    }

    async fn create_post(
        &self,
        post: &PostUnit,
        reply_to: Option<&ReplyRef>,
    ) -> Result<PostReference> {
        let session = self.session.lock().await;
        let Some(session) = session.as_ref() else {
            return Err(Error::Bluesky("create_post called before login".to_string()));
        };

        let body = CreateRecordRequest {
            repo: &session.did,
            collection: POST_COLLECTION,
            record: post_record(post, reply_to, Utc::now()),
        };

        let response = self
            .client
            .post(self.xrpc_url("com.atproto.repo.createRecord"))
            .header(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", session.access_jwt))?,
            )
            .json(&body)
            .send()
            .await?;

        let response = check_status(response, "createRecord").await?;
        let created: PostReference = response.json().await?;
        tracing::debug!("Created post {}", created.uri);

        Ok(created)
    }
}

fn post_record<'a>(
    post: &'a PostUnit,
    reply_to: Option<&'a ReplyRef>,
    created_at: DateTime<Utc>,
) -> PostRecord<'a> {
    PostRecord {
        record_type: POST_COLLECTION,
        text: &post.text,
        created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        facets: link_facets(&post.text),
        reply: reply_to,
        embed: post.embed.as_ref().map(|external| ExternalEmbed {
            embed_type: "app.bsky.embed.external",
            external,
        }),
    }
}

async fn check_status(response: Response, method: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<XrpcError>(&body)
        .ok()
        .map(|e| {
            format!(
                "{}: {}",
                e.error.unwrap_or_else(|| "Error".to_string()),
                e.message.unwrap_or_default()
            )
        })
        .unwrap_or(body);

    Err(Error::Bluesky(format!("{} failed ({}): {}", method, status, detail)))
}
