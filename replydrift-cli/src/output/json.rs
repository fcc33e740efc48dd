//! JSON output formatter

use super::{BucketTable, ReportFormatter, TopicTable};
use anyhow::Result;
use replydrift_engine::{AccountLength, AccountSentiment};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

/// JSON formatter - collects report objects and writes them as one array
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    items: Vec<Value>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            items: Vec::new(),
        }
    }

    fn push<T: Serialize>(&mut self, item: &T) -> Result<()> {
        self.items.push(serde_json::to_value(item)?);
        Ok(())
    }
}

impl<W: Write + Send + Sync> ReportFormatter for JsonFormatter<W> {
    fn account_sentiment(&mut self, rows: &[AccountSentiment]) -> Result<()> {
        rows.iter().try_for_each(|row| self.push(row))
    }

    fn account_lengths(&mut self, rows: &[AccountLength]) -> Result<()> {
        rows.iter().try_for_each(|row| self.push(row))
    }

    fn buckets(&mut self, table: &BucketTable) -> Result<()> {
        self.push(table)
    }

    fn topics(&mut self, table: &TopicTable) -> Result<()> {
        self.push(table)
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.items)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.items)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
