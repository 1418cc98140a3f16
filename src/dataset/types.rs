/// One row of the index file: a part of the constitution and what it covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingRow {
    pub heading: Option<String>,
    pub description: Option<String>,
}

/// One article or text block. Kept as raw bytes and decoded when excerpted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentRow {
    pub content: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default)]
pub struct HeadingTable {
    pub rows: Vec<HeadingRow>,
}

impl HeadingTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Non-missing headings, in file order.
    pub fn headings(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|r| r.heading.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentTable {
    pub rows: Vec<ContentRow>,
}

impl ContentTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// The first `n` rows that have content, skipping missing cells.
    pub fn head(&self, n: usize) -> impl Iterator<Item = (usize, &[u8])> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.content.as_deref().map(|c| (i, c)))
            .take(n)
    }
}
