mod mock_ledger;
mod mock_ledger_writer;

pub use crate::{
    mock_ledger::{MockLedger, MockLedgerCallCounts},
    mock_ledger_writer::MockLedgerWriter,
};
