//! Turning notebooks and source files into content records.

use std::{fs, io, path::Path};

pub(crate) mod directive;
pub(crate) mod html;
pub(crate) mod lexer;
pub(crate) mod notebook;

pub use directive::{Directive, DirectiveError, HighlightGroup};
pub use html::{TableData, TableParseError};
pub use lexer::{LexError, Lexer, Token, TokenLine};
pub use notebook::{Cell, Notebook, NotebookError, Output};

/// The output attached to a piece of code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputPayload {
    /// Plain text lines.
    Text(Vec<String>),

    /// An HTML fragment containing a table.
    Table(String),

    /// A base64 encoded PNG image.
    Image(String),
}

/// A normalized unit of slide content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentRecord {
    /// The code, without its directive line.
    pub source: String,

    /// The tokenized code.
    pub lines: Vec<TokenLine>,

    /// The groups of lines to highlight. The first group is always the empty baseline one.
    pub highlights: Vec<HighlightGroup>,

    pub title: Option<String>,

    pub output: Option<OutputPayload>,
}

impl ContentRecord {
    /// Build a record out of a piece of source code with an optional trailing directive.
    pub fn from_source(source: &str, lexer: &Lexer) -> Result<Self, SourceError> {
        let (code, directive) = Directive::split(source)?;
        let lines = lexer.tokenize(&code)?;
        let mut highlights = vec![HighlightGroup::default()];
        highlights.extend(directive.highlights);
        Ok(Self { source: code, lines, highlights, title: directive.title, output: None })
    }

    /// Build a record out of a notebook code cell.
    pub fn from_code_cell(
        source: &str,
        outputs: &[Output],
        lexer: &Lexer,
        include_outputs: bool,
    ) -> Result<Self, SourceError> {
        let mut record = Self::from_source(source, lexer)?;
        if include_outputs {
            record.output = Self::select_output(outputs);
        }
        Ok(record)
    }

    fn select_output(outputs: &[Output]) -> Option<OutputPayload> {
        let bundles = || outputs.iter().filter_map(Output::data);
        if let Some(image) = bundles().find_map(|data| data.text("image/png")) {
            return Some(OutputPayload::Image(image));
        }
        if let Some(html) = bundles().filter_map(|data| data.text("text/html")).find(|html| html.contains("<table")) {
            return Some(OutputPayload::Table(html));
        }

        let mut lines = Vec::new();
        let stream = outputs.iter().find_map(|output| match output {
            Output::Stream { text } => Some(text.text()),
            _ => None,
        });
        let result = outputs.iter().find_map(|output| match output {
            Output::ExecuteResult { data } => data.text("text/plain"),
            _ => None,
        });
        for text in stream.into_iter().chain(result) {
            lines.extend(text.trim().split('\n').map(ToString::to_string));
        }
        if lines.is_empty() { None } else { Some(OutputPayload::Text(lines)) }
    }
}

/// A unit of input that becomes one or more slides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceUnit {
    Code(ContentRecord),
    Markdown(String),
}

/// Options that control how sources are loaded.
#[derive(Clone, Debug, Default)]
pub struct SourceOptions {
    /// Whether to attach code cell outputs.
    pub include_outputs: bool,
}

/// Load every unit in a file.
///
/// `.ipynb` files are read as notebooks; anything else is a single piece of source code.
pub fn load_units(path: &Path, options: &SourceOptions) -> Result<Vec<SourceUnit>, LoadSourceError> {
    let extension = path.extension().and_then(|extension| extension.to_str()).unwrap_or_default();
    if extension == "ipynb" {
        let notebook = Notebook::from_path(path)?;
        return notebook_units(&notebook, options);
    }
    let source = fs::read_to_string(path)?;
    let lexer = Lexer::for_extension(extension);
    log::debug!("lexing {} as {}", path.display(), lexer.syntax_name());
    let record = ContentRecord::from_source(&source, &lexer)?;
    Ok(vec![SourceUnit::Code(record)])
}

/// Turn a notebook's cells into units.
pub fn notebook_units(notebook: &Notebook, options: &SourceOptions) -> Result<Vec<SourceUnit>, LoadSourceError> {
    let lexer = Lexer::for_language(notebook.language());
    let mut units = Vec::new();
    for (index, cell) in notebook.cells.iter().enumerate() {
        match cell {
            Cell::Code { source, outputs } => {
                let record = ContentRecord::from_code_cell(&source.text(), outputs, &lexer, options.include_outputs)
                    .map_err(|source| LoadSourceError::Cell { index, source })?;
                units.push(SourceUnit::Code(record));
            }
            Cell::Markdown { source } => {
                let text = source.text();
                if text.trim().is_empty() {
                    log::debug!("skipping empty markdown cell {index}");
                    continue;
                }
                units.push(SourceUnit::Markdown(text));
            }
            Cell::Other => log::debug!("skipping cell {index}"),
        };
    }
    Ok(units)
}

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Directive(#[from] DirectiveError),

    #[error(transparent)]
    Lex(#[from] LexError),
}

#[derive(thiserror::Error, Debug)]
pub enum LoadSourceError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Notebook(#[from] NotebookError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("cell {index}: {source}")]
    Cell { index: usize, source: SourceError },
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    fn python() -> Lexer {
        Lexer::for_language("python")
    }

    fn line_text(line: &TokenLine) -> String {
        line.iter().map(|token| token.text.as_str()).collect()
    }

    #[test]
    fn hello_world() {
        let source = "print(\"Hello World\")\nprint(\"Hello World\")\n#% title=\"Hello World\" highlights=\"1-5,3-4\"";
        let record = ContentRecord::from_source(source, &python()).expect("build failed");
        assert_eq!(record.source, "print(\"Hello World\")\nprint(\"Hello World\")");
        assert_eq!(record.title.as_deref(), Some("Hello World"));
        assert_eq!(
            record.highlights,
            vec![
                HighlightGroup::default(),
                HighlightGroup::new(1..=5),
                HighlightGroup::new(3..=4)
            ]
        );
        assert_eq!(record.lines.len(), 2);
        assert_eq!(line_text(&record.lines[1]), "print(\"Hello World\")");
        assert_eq!(record.output, None);
    }

    #[test]
    fn no_directive() {
        let record = ContentRecord::from_source("x = 1\n", &python()).expect("build failed");
        assert_eq!(record.highlights, vec![HighlightGroup::default()]);
        assert_eq!(record.title, None);
    }

    #[test]
    fn empty_source() {
        let record = ContentRecord::from_source("", &python()).expect("build failed");
        assert!(record.lines.is_empty());
        assert_eq!(record.highlights.len(), 1);
    }

    #[test]
    fn invalid_directive() {
        let result = ContentRecord::from_source("x = 1\n#% highlights=3-1", &python());
        assert!(matches!(result, Err(SourceError::Directive(DirectiveError::ReversedRange(3, 1)))));
    }

    fn notebook(outputs: &str) -> Notebook {
        let contents = format!(
            r##"{{"cells": [
                {{"cell_type": "code", "metadata": {{}}, "source": ["x\n"], "outputs": {outputs}}},
                {{"cell_type": "markdown", "metadata": {{}}, "source": "  \n"}},
                {{"cell_type": "markdown", "metadata": {{}}, "source": "# Hi"}}
            ]}}"##
        );
        Notebook::parse(&contents).expect("invalid notebook")
    }

    fn output_of(outputs: &str, include_outputs: bool) -> Option<OutputPayload> {
        let units = notebook_units(&notebook(outputs), &SourceOptions { include_outputs }).expect("load failed");
        assert_eq!(units.len(), 2);
        assert_eq!(units[1], SourceUnit::Markdown("# Hi".into()));
        let SourceUnit::Code(record) = &units[0] else { panic!("not code") };
        record.output.clone()
    }

    #[test]
    fn text_outputs() {
        let outputs = r#"[
            {"output_type": "stream", "name": "stdout", "text": "a\nb\n"},
            {"output_type": "execute_result", "data": {"text/plain": ["  42  "]}, "metadata": {}}
        ]"#;
        let output = output_of(outputs, true);
        assert_eq!(output, Some(OutputPayload::Text(vec!["a".into(), "b".into(), "42".into()])));
    }

    #[test]
    fn outputs_disabled() {
        let outputs = r#"[{"output_type": "stream", "name": "stdout", "text": "a"}]"#;
        assert_eq!(output_of(outputs, false), None);
    }

    #[test]
    fn no_outputs() {
        assert_eq!(output_of("[]", true), None);
    }

    #[test]
    fn image_takes_priority() {
        let outputs = r#"[
            {"output_type": "stream", "name": "stdout", "text": "a"},
            {"output_type": "display_data", "data": {"image/png": "aGk=\n", "text/plain": "<Figure>"}, "metadata": {}}
        ]"#;
        assert_eq!(output_of(outputs, true), Some(OutputPayload::Image("aGk=\n".into())));
    }

    #[test]
    fn html_table() {
        let outputs = r#"[
            {"output_type": "execute_result", "data": {"text/html": ["<table>", "</table>"], "text/plain": "df"}, "metadata": {}}
        ]"#;
        assert_eq!(output_of(outputs, true), Some(OutputPayload::Table("<table></table>".into())));
    }

    #[test]
    fn html_without_table() {
        let outputs = r#"[
            {"output_type": "execute_result", "data": {"text/html": "<b>hi</b>", "text/plain": "hi"}, "metadata": {}}
        ]"#;
        assert_eq!(output_of(outputs, true), Some(OutputPayload::Text(vec!["hi".into()])));
    }

    #[test]
    fn load_source_file() {
        let mut file = tempfile::Builder::new().suffix(".py").tempfile().expect("creating file");
        writeln!(file, "x = 1\n#% title=hi").expect("writing file");
        let units = load_units(file.path(), &Default::default()).expect("load failed");
        let [SourceUnit::Code(record)] = units.as_slice() else { panic!("unexpected units") };
        assert_eq!(record.title.as_deref(), Some("hi"));
        assert_eq!(record.source, "x = 1");
    }
}
