use crate::theme::TokenKind;
use itertools::Itertools;
use once_cell::sync::Lazy;
use syntect::{
    easy::ScopeRegionIterator,
    parsing::{ParseState, ParsingError, Scope, ScopeError, ScopeStack, SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

/// A piece of text on a line along with its classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The innermost kind for this token.
    pub kind: TokenKind,

    /// The kinds of the scopes that enclose this token, outermost first.
    pub enclosing: Vec<TokenKind>,

    pub text: String,
}

impl Token {
    pub fn is_spaces(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(|c| c == ' ')
    }

    pub fn is_tabs(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(|c| c == '\t')
    }
}

/// A tokenized line.
pub type TokenLine = Vec<Token>;

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Space,
    Tab,
    Other,
}

impl From<char> for CharClass {
    fn from(c: char) -> Self {
        match c {
            ' ' => Self::Space,
            '\t' => Self::Tab,
            _ => Self::Other,
        }
    }
}

/// Splits source code into lines of classified tokens.
#[derive(Clone, Copy)]
pub struct Lexer {
    syntax: &'static SyntaxReference,
}

impl Lexer {
    /// Construct a lexer for a language name, e.g. `python`.
    ///
    /// Unknown languages are lexed as plain text.
    pub fn for_language(language: &str) -> Self {
        let syntax = SYNTAX_SET
            .find_syntax_by_token(language)
            .or_else(|| SYNTAX_SET.find_syntax_by_name(language))
            .unwrap_or_else(|| {
                log::warn!("no syntax found for language '{language}', using plain text");
                SYNTAX_SET.find_syntax_plain_text()
            });
        Self { syntax }
    }

    /// Construct a lexer for a file extension, e.g. `rs`.
    pub fn for_extension(extension: &str) -> Self {
        let syntax =
            SYNTAX_SET.find_syntax_by_extension(extension).unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());
        Self { syntax }
    }

    pub fn syntax_name(&self) -> &str {
        &self.syntax.name
    }

    /// Tokenize some source code.
    ///
    /// Joining the text of every token in a line gives back that line, without its line break.
    pub fn tokenize(&self, source: &str) -> Result<Vec<TokenLine>, LexError> {
        let mut state = ParseState::new(self.syntax);
        let mut stack = ScopeStack::new();
        let mut lines = Vec::new();
        for line in LinesWithEndings::from(source) {
            // Syntaxes are loaded expecting every line to end in a line break.
            let line = if line.ends_with('\n') { line.to_string() } else { format!("{line}\n") };
            let operations = state.parse_line(&line, &SYNTAX_SET)?;
            let mut tokens = Vec::new();
            for (text, operation) in ScopeRegionIterator::new(&operations, &line) {
                stack.apply(operation)?;
                let text = text.trim_end_matches(['\n', '\r']);
                if text.is_empty() {
                    continue;
                }
                let (kind, enclosing) = Self::classify(stack.as_slice());
                for (_, chunk) in &text.chars().chunk_by(|c| CharClass::from(*c)) {
                    tokens.push(Token { kind: kind.clone(), enclosing: enclosing.clone(), text: chunk.collect() });
                }
            }
            lines.push(tokens);
        }
        Ok(lines)
    }

    fn classify(scopes: &[Scope]) -> (TokenKind, Vec<TokenKind>) {
        let mut kinds: Vec<TokenKind> =
            scopes.iter().map(|scope| scope.build_string().parse().unwrap_or_default()).collect();
        let kind = kinds.pop().unwrap_or_default();
        (kind, kinds)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LexError {
    #[error("parsing source: {0}")]
    Parsing(#[from] ParsingError),

    #[error("invalid scope: {0:?}")]
    Scope(ScopeError),
}

impl From<ScopeError> for LexError {
    fn from(e: ScopeError) -> Self {
        Self::Scope(e)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn join(line: &TokenLine) -> String {
        line.iter().map(|token| token.text.as_str()).collect()
    }

    #[rstest]
    #[case::python("python", "def foo(a,  b):\n\tif a:\n        return   'x'  # hi\n\n    return b\n")]
    #[case::rust("rust", "fn main() {\n    let x = \"a  b\";\n}")]
    #[case::unknown("potato", "some\t\ttext   here\n  ")]
    fn round_trip(#[case] language: &str, #[case] source: &str) {
        let lines = Lexer::for_language(language).tokenize(source).expect("tokenize failed");
        let expected: Vec<_> = source.lines().collect();
        let actual: Vec<_> = lines.iter().map(join).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn whitespace_runs_are_separate() {
        let lines = Lexer::for_language("python").tokenize("x  =\t\t1 # a  b").expect("tokenize failed");
        for token in &lines[0] {
            let mixed = token.text.contains([' ', '\t']) && !token.is_spaces() && !token.is_tabs();
            assert!(!mixed, "token mixes whitespace and text: {token:?}");
        }
        assert!(lines[0].iter().any(Token::is_tabs));
        assert!(lines[0].iter().any(|token| token.text == "  "));
    }

    #[test]
    fn classification() {
        let lines = Lexer::for_language("python").tokenize("# hello").expect("tokenize failed");
        let comment = &lines[0][0];
        assert!(comment.kind.atoms().first().is_some_and(|atom| atom == "comment" || atom == "punctuation"));
        assert!(comment.enclosing.iter().any(|kind| kind.atoms().first().is_some_and(|atom| atom == "source")));
    }

    #[test]
    fn empty_source() {
        let lines = Lexer::for_language("python").tokenize("").expect("tokenize failed");
        assert!(lines.is_empty());
    }

    #[test]
    fn extension() {
        assert_eq!(Lexer::for_extension("rs").syntax_name(), "Rust");
        assert_eq!(Lexer::for_extension("potato").syntax_name(), "Plain Text");
    }
}
