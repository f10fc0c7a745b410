use crate::{DIDLog, DIDResolve, KeyGenerate, Result};

/// did:ledger CLI tool for resolving DIDs anchored in ledger topics, and related utility operations.
#[derive(clap::Parser)]
pub enum Root {
    #[command(subcommand)]
    DID(DID),
    #[command(subcommand)]
    Key(Key),
}

impl Root {
    pub async fn handle(self) -> Result<()> {
        match self {
            Self::DID(x) => x.handle().await,
            Self::Key(x) => x.handle(),
        }
    }
}

/// DID operations that only read from the ledger.
#[derive(clap::Subcommand)]
pub enum DID {
    Log(DIDLog),
    Resolve(DIDResolve),
}

impl DID {
    pub async fn handle(self) -> Result<()> {
        match self {
            Self::Log(x) => x.handle().await,
            Self::Resolve(x) => x.handle().await,
        }
    }
}

/// Key management utilities.
#[derive(clap::Subcommand)]
pub enum Key {
    Generate(KeyGenerate),
}

impl Key {
    pub fn handle(self) -> Result<()> {
        match self {
            Self::Generate(x) => x.handle(),
        }
    }
}
