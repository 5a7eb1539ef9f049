use crate::utils::{impl_deserialize_from_str, impl_serialize_from_display};
use std::{convert::Infallible, fmt, str::FromStr};

const ROOT_NAME: &str = "token";

/// A hierarchical classification for a lexical unit, e.g. `string.quoted.double`.
///
/// The kind with no atoms is the root kind every other kind descends from.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenKind {
    atoms: Vec<String>,
}

impl_deserialize_from_str!(TokenKind);
impl_serialize_from_display!(TokenKind);

impl TokenKind {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new<I, S>(atoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let atoms = atoms
            .into_iter()
            .map(|atom| atom.as_ref().trim().to_lowercase())
            .filter(|atom| !atom.is_empty())
            .collect();
        Self { atoms }
    }

    pub fn is_root(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atoms(&self) -> &[String] {
        &self.atoms
    }

    /// The kind one level up, if this isn't the root kind.
    pub fn parent(&self) -> Option<TokenKind> {
        let (_, parent) = self.atoms.split_last()?;
        Some(Self { atoms: parent.to_vec() })
    }

    /// Iterate this kind, then each of its parents, ending with the root kind.
    pub fn ancestors(&self) -> impl Iterator<Item = TokenKind> + '_ {
        (0..=self.atoms.len()).rev().map(|length| Self { atoms: self.atoms[..length].to_vec() })
    }

    /// A name for this kind that can be embedded into a style name.
    pub fn style_suffix(&self) -> String {
        if self.is_root() { ROOT_NAME.to_string() } else { self.atoms.join("_") }
    }
}

impl FromStr for TokenKind {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let kind = Self::new(input.split('.'));
        // "token" on its own names the root.
        if kind.atoms.len() == 1 && kind.atoms[0] == ROOT_NAME { Ok(Self::root()) } else { Ok(kind) }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() { write!(f, "{ROOT_NAME}") } else { write!(f, "{}", self.atoms.join(".")) }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn kind(input: &str) -> TokenKind {
        input.parse().unwrap()
    }

    #[rstest]
    #[case::root("token", &[])]
    #[case::empty("", &[])]
    #[case::single("keyword", &["keyword"])]
    #[case::nested("Keyword.Declaration", &["keyword", "declaration"])]
    #[case::stray_dots(".string..quoted.", &["string", "quoted"])]
    fn parse(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(kind(input).atoms(), expected);
    }

    #[test]
    fn ancestors() {
        let ancestors: Vec<_> = kind("string.quoted.double").ancestors().map(|k| k.to_string()).collect();
        assert_eq!(ancestors, &["string.quoted.double", "string.quoted", "string", "token"]);
    }

    #[test]
    fn root_ancestors() {
        let ancestors: Vec<_> = TokenKind::root().ancestors().collect();
        assert_eq!(ancestors, &[TokenKind::root()]);
        assert_eq!(TokenKind::root().parent(), None);
    }

    #[rstest]
    #[case::root("token", "token")]
    #[case::nested("keyword.operator.logical", "keyword_operator_logical")]
    fn style_suffix(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(kind(input).style_suffix(), expected);
    }
}
