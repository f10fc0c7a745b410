/// Lifecycle state of a DID, as derived from the projection of its topic.
#[derive(Clone, Copy, Debug, serde::Deserialize, Eq, Hash, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DIDStatus {
    /// No Create has been applied (including when the topic doesn't exist).
    Unresolved,
    Active,
    /// Terminal.
    Deactivated,
}

impl DIDStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DIDStatus::Unresolved => "unresolved",
            DIDStatus::Active => "active",
            DIDStatus::Deactivated => "deactivated",
        }
    }
}

impl std::fmt::Display for DIDStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
