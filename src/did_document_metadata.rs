use crate::TopicId;

/// See <https://www.w3.org/TR/did-1.0/#did-document-metadata> for definitions.  All times are
/// ledger consensus times, never client clocks.
#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct DIDDocumentMetadata {
    /// Consensus time of the applied Create operation.
    #[serde(
        rename = "created",
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub created_o: Option<time::OffsetDateTime>,
    /// Consensus time of the last operation applied after Create.
    #[serde(
        rename = "updated",
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub updated_o: Option<time::OffsetDateTime>,
    /// Sequence number of the last applied operation.
    #[serde(rename = "versionId", default, skip_serializing_if = "Option::is_none")]
    pub version_id_o: Option<u64>,
    /// If a DID has been deactivated, DID document metadata MUST include this property with the
    /// boolean value true. If a DID has not been deactivated, this property is OPTIONAL, but if
    /// included, MUST have the boolean value false.
    #[serde(
        rename = "deactivated",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub deactivated_o: Option<bool>,
    #[serde(rename = "topicId")]
    pub topic_id: TopicId,
}

impl DIDDocumentMetadata {
    /// Metadata for a topic on which no Create has been applied.
    pub fn empty(topic_id: TopicId) -> Self {
        Self {
            created_o: None,
            updated_o: None,
            version_id_o: None,
            deactivated_o: None,
            topic_id,
        }
    }
    pub fn is_deactivated(&self) -> bool {
        self.deactivated_o == Some(true)
    }
}
