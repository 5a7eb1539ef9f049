use std::{fmt, ops::RangeInclusive};

/// A range of 1-based line numbers that are emphasized together.
///
/// The default group highlights nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightGroup(Option<RangeInclusive<usize>>);

impl HighlightGroup {
    pub fn new(lines: RangeInclusive<usize>) -> Self {
        Self(Some(lines))
    }

    pub fn contains(&self, line_number: usize) -> bool {
        self.0.as_ref().is_some_and(|lines| lines.contains(&line_number))
    }
}

/// The settings in a trailing `#% key=value ...` comment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directive {
    pub title: Option<String>,
    pub highlights: Vec<HighlightGroup>,
}

impl Directive {
    /// Split a directive comment off the end of a piece of source code.
    ///
    /// Only the last line of the stripped source is considered. Returns the code without the
    /// directive line, or the source untouched if there's no directive.
    pub fn split(source: &str) -> Result<(String, Directive), DirectiveError> {
        let stripped = source.trim_end();
        let (head, last_line) = match stripped.rsplit_once('\n') {
            Some((head, last)) => (head, last.trim_start()),
            None => ("", stripped.trim_start()),
        };
        let body = last_line.strip_prefix("#%").or_else(|| last_line.strip_prefix("# %"));
        match body {
            Some(body) => {
                let directive = Self::parse(body)?;
                Ok((head.trim_end_matches('\r').to_string(), directive))
            }
            None => Ok((source.trim_end_matches(['\n', '\r']).to_string(), Directive::default())),
        }
    }

    /// Parse the body of a directive, e.g. `title="Hello" highlights=1-3,5`.
    pub fn parse(input: &str) -> Result<Self, DirectiveError> {
        let mut directive = Directive::default();
        for word in split_words(input)? {
            let Some((key, value)) = word.split_once('=') else {
                log::warn!("ignoring directive token without '=': '{word}'");
                continue;
            };
            match key {
                "title" => directive.title = Some(value.to_string()),
                "highlights" => directive.highlights = parse_highlights(value)?,
                _ => log::warn!("ignoring unknown directive key '{key}'"),
            };
        }
        Ok(directive)
    }
}

/// Parse a comma separated list of `N` or `N-M` items, each one becoming a group.
pub fn parse_highlights(input: &str) -> Result<Vec<HighlightGroup>, DirectiveError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }
    let mut groups = Vec::new();
    for piece in input.split(',') {
        let lines = match piece.split_once('-') {
            Some((left, right)) => {
                let start = parse_number(left)?;
                let end = parse_number(right)?;
                if start > end {
                    return Err(DirectiveError::ReversedRange(start, end));
                }
                start..=end
            }
            None => {
                let line = parse_number(piece)?;
                line..=line
            }
        };
        groups.push(HighlightGroup::new(lines));
    }
    Ok(groups)
}

fn parse_number(input: &str) -> Result<usize, DirectiveError> {
    let input = input.trim();
    input.parse().map_err(|_| DirectiveError::InvalidNumber(input.to_string()))
}

/// Split the input into words using shell quoting rules.
fn split_words(input: &str) -> Result<Vec<String>, DirectiveError> {
    let mut words = Vec::new();
    let mut current: Option<String> = None;
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                words.extend(current.take());
            }
            '\'' => {
                let word = current.get_or_insert_with(String::new);
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => word.push(c),
                        None => return Err(DirectiveError::UnterminatedQuote(Quote::Single)),
                    }
                }
            }
            '"' => {
                let word = current.get_or_insert_with(String::new);
                loop {
                    match chars.next() {
                        Some('"') => break,
                        // Inside double quotes a backslash only escapes a few characters.
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\' | '$' | '`')) => word.push(c),
                            Some(c) => {
                                word.push('\\');
                                word.push(c);
                            }
                            None => return Err(DirectiveError::UnterminatedQuote(Quote::Double)),
                        },
                        Some(c) => word.push(c),
                        None => return Err(DirectiveError::UnterminatedQuote(Quote::Double)),
                    }
                }
            }
            '\\' => match chars.next() {
                Some(c) => current.get_or_insert_with(String::new).push(c),
                None => return Err(DirectiveError::TrailingEscape),
            },
            c => current.get_or_insert_with(String::new).push(c),
        }
    }
    words.extend(current);
    Ok(words)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quote {
    Single,
    Double,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Double => write!(f, "double"),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("unterminated {0} quote in directive")]
    UnterminatedQuote(Quote),

    #[error("directive ends with an escape character")]
    TrailingEscape,

    #[error("invalid highlighted line: '{0}'")]
    InvalidNumber(String),

    #[error("invalid highlighted range: {0} is larger than {1}")]
    ReversedRange(usize, usize),
}
