//! JSON artifact writer
//!
//! Writes `{ url: { "content": ..., "main_content": ..., "link_no": ... } }`
//! pretty-printed with four-space indentation. Non-ASCII text is written as-is.

use crate::output::traits::{OutputFormat, OutputResult, OutputWriter, SeedOutput};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct JsonWriter;

impl OutputWriter for JsonWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn write_to(&self, output: &SeedOutput<'_>, path: &Path) -> OutputResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);

        output.pages.serialize(&mut serializer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{CrawlResult, PageRecord};
    use tempfile::TempDir;

    #[test]
    fn test_writes_json_document() {
        let dir = TempDir::new().unwrap();
        let mut pages = CrawlResult::single("https://a.com/", "Grüße".to_string());
        pages.insert(
            "https://a.com/b".to_string(),
            PageRecord::sub_link("B".to_string(), 1),
        );
        let output = SeedOutput {
            seed_url: "https://a.com/",
            pages: &pages,
            link_count: 1,
        };

        let path = JsonWriter.write(&output, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("JSONs").join("https___a.com_.json"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Grüße"));
        assert!(text.contains("\n    \"https://a.com/\""));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["https://a.com/"]["main_content"], true);
        assert_eq!(value["https://a.com/b"]["link_no"], 1);
    }
}
