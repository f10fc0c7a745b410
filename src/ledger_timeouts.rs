use std::time::Duration;

/// Upper bounds for each kind of ledger call made by the `DIDDriver`.  A call that exceeds its
/// bound is abandoned (its future is dropped).
#[serde_with::serde_as]
#[derive(Clone, Copy, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct LedgerTimeouts {
    /// Bound on each page read from the log (not on the whole resolution).
    #[serde(rename = "readMs", default = "LedgerTimeouts::default_read")]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub read: Duration,
    /// Bound on topic creation and message submission.
    #[serde(rename = "submitMs", default = "LedgerTimeouts::default_submit")]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub submit: Duration,
    /// Bound on waiting for a submitted message to reach consensus.
    #[serde(rename = "confirmationMs", default = "LedgerTimeouts::default_confirmation")]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub confirmation: Duration,
}

impl LedgerTimeouts {
    fn default_read() -> Duration {
        Duration::from_secs(10)
    }
    fn default_submit() -> Duration {
        Duration::from_secs(30)
    }
    fn default_confirmation() -> Duration {
        Duration::from_secs(60)
    }
}

impl Default for LedgerTimeouts {
    fn default() -> Self {
        Self {
            read: Self::default_read(),
            submit: Self::default_submit(),
            confirmation: Self::default_confirmation(),
        }
    }
}
