//! Markdown output formatter

use super::{signed, BucketTable, ReportFormatter, TopicTable};
use anyhow::Result;
use replydrift_engine::{AccountLength, AccountSentiment};
use std::io::Write;

/// Markdown formatter - outputs reports as markdown tables
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    precision: usize,
    row_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W, precision: usize) -> Self {
        Self {
            writer,
            precision,
            row_count: 0,
        }
    }

    fn header(&mut self, title: &str, columns: &[&str]) -> Result<()> {
        writeln!(self.writer, "## {title}")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| {} |", columns.join(" | "))?;
        writeln!(
            self.writer,
            "|{}|",
            columns.iter().map(|_| "---").collect::<Vec<_>>().join("|")
        )?;
        Ok(())
    }

    fn row(&mut self, cells: &[String]) -> Result<()> {
        self.row_count += 1;
        writeln!(self.writer, "| {} |", cells.join(" | "))?;
        Ok(())
    }
}

impl<W: Write + Send + Sync> ReportFormatter for MarkdownFormatter<W> {
    fn account_sentiment(&mut self, rows: &[AccountSentiment]) -> Result<()> {
        self.header(
            "Sentiment drift by account",
            &["Account", "Id", "Trees", "Leaves", "Average"],
        )?;
        for row in rows {
            self.row(&[
                row.account.name.clone(),
                row.account.id.to_string(),
                row.trees.to_string(),
                row.leaves.to_string(),
                signed(row.average, self.precision),
            ])?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn account_lengths(&mut self, rows: &[AccountLength]) -> Result<()> {
        self.header(
            "Conversation length by account",
            &["Account", "Id", "Trees", "Posts", "Mean length"],
        )?;
        for row in rows {
            let mean = row
                .mean_length
                .map(|m| format!("{m:.prec$}", prec = self.precision))
                .unwrap_or_else(|| "-".to_string());
            self.row(&[
                row.account.name.clone(),
                row.account.id.to_string(),
                row.trees.to_string(),
                row.posts.to_string(),
                mean,
            ])?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn buckets(&mut self, table: &BucketTable) -> Result<()> {
        let title = format!(
            "{} {} by {}",
            table.account.name, table.measure, table.grouping
        );
        if table.measure == "posts" {
            self.header(&title, &["Bucket", "Posts"])?;
            for row in &table.rows {
                self.row(&[row.label.clone(), row.posts.unwrap_or(0).to_string()])?;
            }
        } else {
            self.header(&title, &["Bucket", "Trees", "Average"])?;
            for row in &table.rows {
                self.row(&[
                    row.label.clone(),
                    row.trees.unwrap_or(0).to_string(),
                    signed(row.average, self.precision),
                ])?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn topics(&mut self, table: &TopicTable) -> Result<()> {
        let title = format!("{} topics", table.account.name);
        self.header(
            &title,
            &["Topic", "Trees", "Leaves", "Mean root", "Mean delta"],
        )?;
        for topic in &table.topics {
            self.row(&[
                topic.topic.clone(),
                topic.tree_count.to_string(),
                topic.leaf_count.to_string(),
                signed(topic.mean_root, self.precision),
                signed(topic.mean_delta, self.precision),
            ])?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total rows: {}*", self.row_count)?;
        self.writer.flush()?;
        Ok(())
    }
}
