pub mod types;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use types::{ContentRow, ContentTable, HeadingRow, HeadingTable};

pub const INDEX_FILE: &str = "index.csv";
pub const CONSTITUTION_FILE: &str = "Constitution Of India.csv";

pub const HEADING: &str = "Heading";
pub const DESCRIPTION: &str = "Description";
pub const CONTENT: &str = "Content";

/// Source column name → canonical name.
const INDEX_RENAMES: &[(&str, &str)] = &[
    ("Parts of the Indian Constitution", HEADING),
    ("Subject Mentioned in the Part", DESCRIPTION),
];
const CONSTITUTION_RENAMES: &[(&str, &str)] = &[("Articles", CONTENT)];

/// Cell values read as missing, same as the usual dataframe defaults.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn canonical(name: &str, renames: &[(&str, &str)]) -> String {
    renames
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| name.to_string())
}

fn is_missing(cell: &[u8]) -> bool {
    MISSING_MARKERS.iter().any(|m| m.as_bytes() == cell)
}

fn column_index(columns: &[String], name: &str) -> Option<usize> {
    columns.iter().position(|c| c == name)
}

/// Both tables, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub headings: HeadingTable,
    pub content: ContentTable,
}

impl Dataset {
    /// Load both files from `data_dir`. Never fails: a file that can't be read
    /// becomes an empty table and the cause is logged.
    pub fn load(data_dir: &Path) -> Self {
        let index_path = data_dir.join(INDEX_FILE);
        let constitution_path = data_dir.join(CONSTITUTION_FILE);

        let headings = load_or_empty(&index_path, load_headings);
        let content = load_or_empty(&constitution_path, load_content);

        info!(
            headings = headings.len(),
            content_rows = content.len(),
            "Dataset ready"
        );
        Self { headings, content }
    }

    pub fn data_loaded(&self) -> bool {
        !self.headings.is_empty()
    }

    pub fn constitution_loaded(&self) -> bool {
        !self.content.is_empty()
    }
}

fn load_or_empty<T: Default>(path: &Path, load: fn(&Path) -> Result<T>) -> T {
    info!(path = %path.display(), exists = path.exists(), "Loading dataset file");
    match load(path) {
        Ok(table) => table,
        Err(e) => {
            warn!(path = %path.display(), "Error loading CSV file, using empty table: {:#}", e);
            T::default()
        }
    }
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))
}

/// Read the heading/description index.
pub fn load_headings(path: &Path) -> Result<HeadingTable> {
    let mut reader = open(path)?;
    let columns: Vec<String> = reader
        .headers()
        .context("Failed to read index header")?
        .iter()
        .map(|h| canonical(h, INDEX_RENAMES))
        .collect();
    info!(?columns, "Index columns");

    let heading_col = column_index(&columns, HEADING)
        .with_context(|| format!("index file has no '{}' column", HEADING))?;
    let description_col = column_index(&columns, DESCRIPTION);

    let cell = |record: &csv::StringRecord, col: usize| {
        record
            .get(col)
            .filter(|v| !is_missing(v.as_bytes()))
            .map(str::to_string)
    };

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed index row {}", line + 1))?;
        rows.push(HeadingRow {
            heading: cell(&record, heading_col),
            description: description_col.and_then(|col| cell(&record, col)),
        });
    }
    let described = rows.iter().filter(|r| r.description.is_some()).count();
    info!(rows = rows.len(), described, "Index rows read");
    Ok(HeadingTable { rows })
}

/// Read the article text. Cells are kept as bytes; see [`ContentRow`].
pub fn load_content(path: &Path) -> Result<ContentTable> {
    let mut reader = open(path)?;
    let columns: Vec<String> = reader
        .byte_headers()
        .context("Failed to read constitution header")?
        .iter()
        .map(|h| canonical(&String::from_utf8_lossy(h), CONSTITUTION_RENAMES))
        .collect();
    info!(?columns, "Constitution columns");

    let content_col = column_index(&columns, CONTENT)
        .with_context(|| format!("constitution file has no '{}' column", CONTENT))?;

    let mut rows = Vec::new();
    for (line, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Malformed constitution row {}", line + 1))?;
        rows.push(ContentRow {
            content: record
                .get(content_col)
                .filter(|v| !is_missing(v))
                .map(<[u8]>::to_vec),
        });
    }
    Ok(ContentTable { rows })
}
