//! CSV artifact writer
//!
//! One row per URL with the columns `Link,content,main_content,link_no`.

use crate::output::traits::{OutputFormat, OutputResult, OutputWriter, SeedOutput};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Link")]
    link: &'a str,
    content: &'a str,
    main_content: bool,
    link_no: usize,
}

pub struct CsvWriter;

impl OutputWriter for CsvWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn write_to(&self, output: &SeedOutput<'_>, path: &Path) -> OutputResult<()> {
        let mut writer = csv::Writer::from_path(path)?;

        for (url, record) in output.pages.iter() {
            writer.serialize(CsvRow {
                link: url,
                content: &record.content,
                main_content: record.is_main_content,
                link_no: record.link_index,
            })?;
        }

        writer.flush()?;
        Ok(())
    }
}
