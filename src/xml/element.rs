use super::namespaces::{NamespaceError, Namespaces, QualifiedName};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use std::{io, string::FromUtf8Error};

/// A markup element.
///
/// An element owns its children. Text, when present, is written before any children.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    name: QualifiedName,
    attributes: Vec<(QualifiedName, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Construct an element with no attributes.
    pub fn new(namespaces: &Namespaces, name: &str) -> Result<Self, NamespaceError> {
        let name = namespaces.resolve(name)?;
        Ok(Self { name, attributes: Vec::new(), text: None, children: Vec::new() })
    }

    /// Construct an element with the given attributes, in order.
    pub fn with_attributes<'a, I, S>(namespaces: &Namespaces, name: &str, attributes: I) -> Result<Self, NamespaceError>
    where
        I: IntoIterator<Item = (&'a str, S)>,
        S: Into<String>,
    {
        let mut element = Self::new(namespaces, name)?;
        for (name, value) in attributes {
            element.set_attribute(namespaces, name, value)?;
        }
        Ok(element)
    }

    /// Set an attribute, replacing its value if it was already set.
    pub fn set_attribute<S: Into<String>>(
        &mut self,
        namespaces: &Namespaces,
        name: &str,
        value: S,
    ) -> Result<(), NamespaceError> {
        let name = namespaces.resolve(name)?;
        let value = value.into();
        match self.attributes.iter_mut().find(|(existing, _)| existing == &name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        };
        Ok(())
    }

    /// Set this element's text.
    pub fn set_text<S: Into<String>>(&mut self, text: S) {
        self.text = Some(text.into());
    }

    /// Builder style version of [Element::set_text].
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.set_text(text);
        self
    }

    /// Append a child at the end of this element's children.
    pub fn append(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn extend<I: IntoIterator<Item = Element>>(&mut self, children: I) {
        self.children.extend(children);
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Get an attribute's value by its prefixed name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(key, _)| key.prefixed() == name).map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&QualifiedName, &str)> {
        self.attributes.iter().map(|(name, value)| (name, value.as_str()))
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Iterate over this element's descendants in document order, excluding itself.
    pub fn descendants(&self) -> Box<dyn Iterator<Item = &Element> + '_> {
        Box::new(self.children.iter().flat_map(|child| std::iter::once(child).chain(child.descendants())))
    }

    /// Find all descendants with the given prefixed name.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants().filter(move |element| element.name.prefixed() == name)
    }

    /// Serialize this element as a fragment, without namespace declarations.
    pub fn serialize(&self, options: &SerializeOptions) -> Result<String, SerializeError> {
        let mut writer = Self::make_writer(options);
        self.write(&mut writer, None)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Serialize this element as the root of a standalone document.
    ///
    /// Every namespace in the table is declared on the root element.
    pub fn to_document(&self, namespaces: &Namespaces, options: &SerializeOptions) -> Result<String, SerializeError> {
        let mut writer = Self::make_writer(options);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write(&mut writer, Some(namespaces))?;
        let mut output = String::from_utf8(writer.into_inner())?;
        output.push('\n');
        Ok(output)
    }

    fn make_writer(options: &SerializeOptions) -> Writer<Vec<u8>> {
        if options.indent { Writer::new_with_indent(Vec::new(), b' ', 1) } else { Writer::new(Vec::new()) }
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>, declarations: Option<&Namespaces>) -> Result<(), SerializeError> {
        let name = self.name.prefixed();
        let mut start = BytesStart::new(name.as_str());
        if let Some(namespaces) = declarations {
            for (prefix, uri) in namespaces.iter() {
                let key = format!("xmlns:{prefix}");
                start.push_attribute((key.as_str(), uri));
            }
        }
        for (key, value) in &self.attributes {
            let key = key.prefixed();
            start.push_attribute((key.as_str(), value.as_str()));
        }
        if self.text.is_none() && self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        writer.write_event(Event::Start(start))?;
        if let Some(text) = &self.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write(writer, None)?;
        }
        writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        Ok(())
    }
}

/// Options that control how elements are serialized.
#[derive(Clone, Debug, Default)]
pub struct SerializeOptions {
    /// Whether to indent the output.
    pub indent: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("writing xml: {0}")]
    Io(#[from] io::Error),

    #[error("writing xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("generated xml is not utf8: {0}")]
    Utf8(#[from] FromUtf8Error),
}
