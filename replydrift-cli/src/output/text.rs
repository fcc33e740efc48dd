//! Plain text output formatter

use super::{signed, BucketTable, ReportFormatter, TopicTable};
use anyhow::Result;
use replydrift_engine::{AccountLength, AccountSentiment};
use std::io::Write;

/// Plain text formatter - outputs one aligned line per row
pub struct TextFormatter<W: Write> {
    writer: W,
    precision: usize,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W, precision: usize) -> Self {
        Self { writer, precision }
    }
}

impl<W: Write + Send + Sync> ReportFormatter for TextFormatter<W> {
    fn account_sentiment(&mut self, rows: &[AccountSentiment]) -> Result<()> {
        for row in rows {
            writeln!(
                self.writer,
                "{:<20} {:>12}  trees {:>7}  leaves {:>8}  average {}",
                row.account.name,
                row.account.id,
                row.trees,
                row.leaves,
                signed(row.average, self.precision)
            )?;
        }
        Ok(())
    }

    fn account_lengths(&mut self, rows: &[AccountLength]) -> Result<()> {
        for row in rows {
            let mean = row
                .mean_length
                .map(|m| format!("{m:.prec$}", prec = self.precision))
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                self.writer,
                "{:<20} {:>12}  trees {:>7}  posts {:>8}  mean length {mean}",
                row.account.name, row.account.id, row.trees, row.posts
            )?;
        }
        Ok(())
    }

    fn buckets(&mut self, table: &BucketTable) -> Result<()> {
        writeln!(
            self.writer,
            "{} ({}) {} by {}",
            table.account.name, table.account.id, table.measure, table.grouping
        )?;
        for row in &table.rows {
            match row.posts {
                Some(posts) => writeln!(self.writer, "  {:<10} {posts:>8}", row.label)?,
                None => writeln!(
                    self.writer,
                    "  {:<10} trees {:>7}  average {}",
                    row.label,
                    row.trees.unwrap_or(0),
                    signed(row.average, self.precision)
                )?,
            }
        }
        Ok(())
    }

    fn topics(&mut self, table: &TopicTable) -> Result<()> {
        writeln!(
            self.writer,
            "{} ({}) topics",
            table.account.name, table.account.id
        )?;
        for topic in &table.topics {
            writeln!(
                self.writer,
                "  {:<10} trees {:>7}  leaves {:>8}  root {}  delta {}",
                topic.topic,
                topic.tree_count,
                topic.leaf_count,
                signed(topic.mean_root, self.precision),
                signed(topic.mean_delta, self.precision)
            )?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
