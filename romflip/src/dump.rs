//! Table listing output
//!
//! The table can be written as the classic `c=..., flip=...` text listing or
//! as JSON.

use crate::{Error, Result};
use romflip_core::FlipTable;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Output format for a table dump
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DumpFormat {
    /// One `c=   1, flip=  80` line per entry
    #[default]
    Text,
    /// JSON array of `{"original": .., "flipped": ..}` objects
    #[cfg(feature = "serde")]
    Json,
}

impl DumpFormat {
    /// Name accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            DumpFormat::Text => "text",
            #[cfg(feature = "serde")]
            DumpFormat::Json => "json",
        }
    }
}

impl fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DumpFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(DumpFormat::Text),
            #[cfg(feature = "serde")]
            "json" => Ok(DumpFormat::Json),
            other => Err(format!("unknown dump format '{other}'")),
        }
    }
}

/// Write every entry of `table` to `writer` in the given format
pub fn write_table_dump<W: Write>(table: &FlipTable, format: DumpFormat, mut writer: W) -> Result<()> {
    match format {
        DumpFormat::Text => {
            for entry in table.entries() {
                writeln!(writer, "{entry}").map_err(Error::Write)?;
            }
        }
        #[cfg(feature = "serde")]
        DumpFormat::Json => {
            let entries: Vec<_> = table.entries().collect();
            serde_json::to_writer_pretty(&mut writer, &entries)?;
            writeln!(writer).map_err(Error::Write)?;
        }
    }

    writer.flush().map_err(Error::Write)
}
