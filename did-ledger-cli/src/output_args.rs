use std::io::Write;

use crate::Result;

/// How commands print their JSON output.
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Print the JSON on a single line instead of pretty-printing it.
    #[arg(env = "DID_LEDGER_COMPACT", short, long)]
    pub compact: bool,
    /// Omit the trailing newline, e.g. when capturing the output in a shell variable.
    #[arg(env = "DID_LEDGER_NO_NEWLINE", short, long)]
    pub no_newline: bool,
}

impl OutputArgs {
    pub fn write_json(&self, value: &impl serde::Serialize) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        self.write_json_to(&mut stdout, value)?;
        stdout.flush()?;
        Ok(())
    }
    fn write_json_to(&self, out: &mut impl Write, value: &impl serde::Serialize) -> Result<()> {
        if self.compact {
            serde_json::to_writer(&mut *out, value)?;
        } else {
            serde_json::to_writer_pretty(&mut *out, value)?;
        }
        if !self.no_newline {
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}
