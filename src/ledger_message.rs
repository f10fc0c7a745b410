/// A raw message as stored in a topic, after consensus.
#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct LedgerMessage {
    /// Position of the message in its topic.  Strictly increasing in consensus order; a mirror
    /// node serving pruned history may leave gaps.
    #[serde(rename = "sequenceNumber")]
    pub sequence_number: u64,
    #[serde(rename = "consensusTimestamp", with = "time::serde::rfc3339")]
    pub consensus_timestamp: time::OffsetDateTime,
    #[serde(with = "payload_base64")]
    pub payload: Vec<u8>,
}

mod payload_base64 {
    use base64::Engine;
    use serde::Deserialize;

    pub fn serialize<S: serde::Serializer>(payload: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(payload))
    }
    pub fn deserialize<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(s.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// Parses a ledger consensus timestamp of the form `<seconds>.<nanoseconds>` (e.g.
/// `1690000000.123456789`), as reported by mirror nodes.
pub fn parse_consensus_timestamp(s: &str) -> Result<time::OffsetDateTime, crate::Error> {
    let (seconds_str, nanos_str) = s.split_once('.').unwrap_or((s, "0"));
    let seconds = seconds_str.parse::<i64>().map_err(|_| {
        crate::Error::Malformed(format!("invalid consensus timestamp {:?}", s).into())
    })?;
    if nanos_str.is_empty() || nanos_str.len() > 9 || !nanos_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(crate::Error::Malformed(
            format!("invalid consensus timestamp {:?}", s).into(),
        ));
    }
    // Right-pad so that e.g. ".5" means 500000000 nanoseconds.
    let nanos = format!("{:0<9}", nanos_str).parse::<i64>().map_err(|_| {
        crate::Error::Malformed(format!("invalid consensus timestamp {:?}", s).into())
    })?;
    let unix_nanos = i128::from(seconds) * 1_000_000_000 + i128::from(nanos);
    time::OffsetDateTime::from_unix_timestamp_nanos(unix_nanos).map_err(|_| {
        crate::Error::Malformed(format!("consensus timestamp {:?} out of range", s).into())
    })
}
