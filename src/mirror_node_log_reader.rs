use base64::Engine;
use reqwest::StatusCode;

use crate::{parse_consensus_timestamp, Error, LedgerMessage, LogReader, Result, TopicId};

lazy_static::lazy_static! {
    /// Building a reqwest::Client is slow, so we use a global instance and then clone it per
    /// use, as the documentation indicates.
    static ref REQWEST_CLIENT: reqwest::Client = reqwest::Client::new();
}

/// Reads topic messages from a mirror node's REST API
/// (`GET /api/v1/topics/{topicId}/messages`), which serves them in consensus order.
#[derive(Clone, Debug)]
pub struct MirrorNodeLogReader {
    base_url: url::Url,
}

impl MirrorNodeLogReader {
    pub fn new(base_url: url::Url) -> Self {
        Self { base_url }
    }
    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }
    /// Builds the URL for one page of topic messages.
    pub fn topic_messages_url(
        &self,
        topic_id: &TopicId,
        after_sequence_number_o: Option<u64>,
        limit: usize,
    ) -> Result<url::Url> {
        let mut url = self
            .base_url
            .join(&format!("api/v1/topics/{}/messages", topic_id))
            .map_err(|e| Error::Malformed(format!("invalid mirror node URL: {}", e).into()))?;
        {
            let mut query_pairs = url.query_pairs_mut();
            if let Some(after_sequence_number) = after_sequence_number_o {
                query_pairs.append_pair(
                    "sequencenumber",
                    &format!("gt:{}", after_sequence_number),
                );
            }
            query_pairs.append_pair("limit", &limit.to_string());
            query_pairs.append_pair("order", "asc");
        }
        Ok(url)
    }
}

#[derive(serde::Deserialize)]
struct TopicMessagesPage {
    #[serde(default)]
    messages: Vec<TopicMessage>,
}

#[derive(serde::Deserialize)]
struct TopicMessage {
    consensus_timestamp: String,
    message: String,
    sequence_number: u64,
}

/// Parses a mirror node `topics/{id}/messages` response body.
pub(crate) fn parse_topic_messages_page(body: &str) -> Result<Vec<LedgerMessage>> {
    let page: TopicMessagesPage = serde_json::from_str(body).map_err(|e| {
        Error::Unavailable(format!("mirror node returned an unparseable response: {}", e).into())
    })?;
    page.messages
        .into_iter()
        .map(|topic_message| {
            let payload = base64::engine::general_purpose::STANDARD
                .decode(topic_message.message.as_bytes())
                .map_err(|_| {
                    Error::Unavailable("mirror node returned a non-base64 message".into())
                })?;
            let consensus_timestamp = parse_consensus_timestamp(&topic_message.consensus_timestamp)
                .map_err(|e| Error::Unavailable(e.to_string().into()))?;
            Ok(LedgerMessage {
                sequence_number: topic_message.sequence_number,
                consensus_timestamp,
                payload,
            })
        })
        .collect()
}

#[async_trait::async_trait]
impl LogReader for MirrorNodeLogReader {
    async fn read_messages(
        &self,
        topic_id: &TopicId,
        after_sequence_number_o: Option<u64>,
        limit: usize,
    ) -> Result<Vec<LedgerMessage>> {
        let url = self.topic_messages_url(topic_id, after_sequence_number_o, limit)?;
        tracing::debug!(%url, "fetching topic messages from mirror node");
        let response = REQWEST_CLIENT
            .clone()
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Unavailable(format!("mirror node request failed: {}", e).into()))?;
        match response.status() {
            status if status.is_success() => {
                let body = response.text().await.map_err(|e| {
                    Error::Unavailable(format!("mirror node response body read error: {}", e).into())
                })?;
                let ledger_message_v = parse_topic_messages_page(&body)?;
                tracing::trace!(
                    %topic_id,
                    message_count = ledger_message_v.len(),
                    "mirror node returned topic messages"
                );
                Ok(ledger_message_v)
            }
            StatusCode::NOT_FOUND => Err(Error::NotFound(
                format!("topic {} does not exist", topic_id).into(),
            )),
            status => Err(Error::Unavailable(
                format!("mirror node responded with HTTP status {}", status).into(),
            )),
        }
    }
}
