use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use tl::{HTMLTag, Node, Parser};

/// The cells of an HTML table, header row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableData {
    rows: Vec<Vec<String>>,
}

impl TableData {
    /// Parse the table in an HTML fragment.
    ///
    /// A table with the `dataframe` class is preferred, otherwise the first one is used. Every
    /// row is made as wide as the header row.
    pub fn parse(html: &str) -> Result<Self, TableParseError> {
        let dom = tl::parse(html, Default::default())?;
        let parser = dom.parser();
        let tables: Vec<&HTMLTag> = dom
            .query_selector("table")
            .into_iter()
            .flatten()
            .filter_map(|handle| handle.get(parser))
            .filter_map(Node::as_tag)
            .collect();
        let table = tables
            .iter()
            .find(|table| table.attributes().is_class_member("dataframe"))
            .or_else(|| tables.first())
            .ok_or(TableParseError::NoTable)?;

        let mut rows: Vec<Vec<String>> = table
            .query_selector(parser, "tr")
            .into_iter()
            .flatten()
            .filter_map(|handle| handle.get(parser))
            .filter_map(Node::as_tag)
            .map(|row| Self::row_cells(row, parser))
            .collect();
        let columns = rows.first().map(Vec::len).ok_or(TableParseError::NoRows)?;
        if columns == 0 {
            return Err(TableParseError::NoColumns);
        }
        for (index, row) in rows.iter_mut().enumerate() {
            if row.len() > columns {
                log::warn!("truncating table row {index} from {} to {columns} cells", row.len());
                row.truncate(columns);
            } else {
                row.resize(columns, String::new());
            }
        }
        Ok(Self { rows })
    }

    fn row_cells(row: &HTMLTag, parser: &Parser) -> Vec<String> {
        row.children()
            .top()
            .iter()
            .filter_map(|handle| handle.get(parser))
            .filter_map(Node::as_tag)
            .filter(|cell| matches!(cell.name().as_bytes(), b"th" | b"td"))
            .map(|cell| unescape(cell.inner_text(parser).trim()))
            .collect()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or_default()
    }
}

/// Decode character references in a cell's text.
///
/// Text that contains an unknown or malformed reference is kept as is.
fn unescape(text: &str) -> String {
    let resolve = |entity: &str| match entity {
        "nbsp" => Some(" "),
        _ => resolve_predefined_entity(entity),
    };
    match unescape_with(text, resolve) {
        Ok(text) => text.into_owned(),
        Err(e) => {
            log::debug!("keeping table cell '{text}' escaped: {e}");
            text.to_string()
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum TableParseError {
    #[error("parsing html failed: {0}")]
    ParsingHtml(#[from] tl::ParseError),

    #[error("no table found in html")]
    NoTable,

    #[error("table has no rows")]
    NoRows,

    #[error("table header has no cells")]
    NoColumns,
}
