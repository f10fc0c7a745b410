/// What the ledger says happened to an operation whose write outcome was ambiguous.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Reconciliation {
    /// The operation reached consensus and was applied.
    Applied { sequence_number: u64 },
    /// The operation reached consensus but the projection skipped it.
    Skipped { sequence_number: u64, reason: String },
    /// No message with the nonce has been applied or skipped (so far).  If the DID has since been
    /// deactivated, later messages are ignored without a record, so this is also the answer for
    /// those.
    Absent,
}

impl Reconciliation {
    pub fn is_applied(&self) -> bool {
        matches!(self, Reconciliation::Applied { .. })
    }
}
