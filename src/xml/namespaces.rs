use std::{collections::BTreeMap, fmt};

/// The namespaces used by OpenDocument presentations.
const ODF_NAMESPACES: &[(&str, &str)] = &[
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("dom", "http://www.w3.org/2001/xml-events"),
    ("draw", "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0"),
    ("fo", "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0"),
    ("loext", "urn:org:documentfoundation:names:experimental:office:xmlns:loext:1.0"),
    ("manifest", "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0"),
    ("meta", "urn:oasis:names:tc:opendocument:xmlns:meta:1.0"),
    ("office", "urn:oasis:names:tc:opendocument:xmlns:office:1.0"),
    ("presentation", "urn:oasis:names:tc:opendocument:xmlns:presentation:1.0"),
    ("script", "urn:oasis:names:tc:opendocument:xmlns:script:1.0"),
    ("smil", "urn:oasis:names:tc:opendocument:xmlns:smil-compatible:1.0"),
    ("style", "urn:oasis:names:tc:opendocument:xmlns:style:1.0"),
    ("svg", "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0"),
    ("table", "urn:oasis:names:tc:opendocument:xmlns:table:1.0"),
    ("text", "urn:oasis:names:tc:opendocument:xmlns:text:1.0"),
    ("xlink", "http://www.w3.org/1999/xlink"),
];

/// An immutable prefix to namespace URI table.
///
/// This is passed explicitly to every element construction call; there is no process wide
/// default table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Namespaces {
    prefixes: BTreeMap<String, String>,
}

impl Namespaces {
    /// Construct a table out of `(prefix, uri)` pairs.
    pub fn new<I, P, U>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, U)>,
        P: Into<String>,
        U: Into<String>,
    {
        let prefixes = entries.into_iter().map(|(prefix, uri)| (prefix.into(), uri.into())).collect();
        Self { prefixes }
    }

    /// The table used when writing OpenDocument presentations.
    pub fn odf() -> Self {
        Self::new(ODF_NAMESPACES.iter().copied())
    }

    /// Resolve a `prefix:local` name.
    ///
    /// Names without a prefix pass through unchanged.
    pub fn resolve(&self, name: &str) -> Result<QualifiedName, NamespaceError> {
        match name.rsplit_once(':') {
            Some((prefix, local)) => {
                let uri = self.prefixes.get(prefix).ok_or_else(|| NamespaceError::UnknownPrefix {
                    prefix: prefix.to_string(),
                    name: name.to_string(),
                })?;
                Ok(QualifiedName { prefix: Some(prefix.to_string()), local: local.to_string(), uri: Some(uri.clone()) })
            }
            None => Ok(QualifiedName { prefix: None, local: name.to_string(), uri: None }),
        }
    }

    /// Iterate all `(prefix, uri)` pairs, sorted by prefix.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(prefix, uri)| (prefix.as_str(), uri.as_str()))
    }
}

/// A name that was resolved against a [Namespaces] table.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    prefix: Option<String>,
    local: String,
    uri: Option<String>,
}

impl QualifiedName {
    /// The name as it's written in the document, e.g. `draw:page`.
    pub fn prefixed(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.local),
            None => self.local.clone(),
        }
    }

    /// The fully qualified name in Clark notation, e.g. `{urn:...:drawing:1.0}page`.
    pub fn expanded(&self) -> String {
        match &self.uri {
            Some(uri) => format!("{{{uri}}}{}", self.local),
            None => self.local.clone(),
        }
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefixed())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NamespaceError {
    #[error("namespace prefix '{prefix}' used in '{name}' is not registered")]
    UnknownPrefix { prefix: String, name: String },
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn namespaces() -> Namespaces {
        Namespaces::new([("ns", "http://example.com/ns")])
    }

    #[rstest]
    #[case::prefixed("ns:tag", "{http://example.com/ns}tag")]
    #[case::unprefixed("tag", "tag")]
    fn resolve(#[case] name: &str, #[case] expected: &str) {
        let resolved = namespaces().resolve(name).expect("resolve failed");
        assert_eq!(resolved.expanded(), expected);
        assert_eq!(resolved.prefixed(), name);
    }

    #[test]
    fn unknown_prefix() {
        let error = namespaces().resolve("other:tag").expect_err("resolved unknown prefix");
        assert_eq!(error, NamespaceError::UnknownPrefix { prefix: "other".into(), name: "other:tag".into() });
    }

    #[test]
    fn odf_table() {
        let namespaces = Namespaces::odf();
        let name = namespaces.resolve("draw:page").expect("resolve failed");
        assert_eq!(name.uri(), Some("urn:oasis:names:tc:opendocument:xmlns:drawing:1.0"));
        assert_eq!(name.local(), "page");
    }
}
