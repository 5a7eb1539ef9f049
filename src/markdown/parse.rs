use crate::markdown::elements::{Block, Document, Inline, InlineRun, ListItem, RunStyle};
use comrak::{
    nodes::{AstNode, ListType, NodeValue},
    parse_document, Arena, Options,
};
use std::mem;

type ParseResult<T> = Result<T, ParseError>;

fn parser_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.underline = true;
    options.extension.table = true;
    options
}

/// A markdown parser.
///
/// Only the constructs that can be turned into slide text are converted into blocks, anything else
/// is kept as [Block::Unsupported] so it can be reported.
pub struct MarkdownParser<'a> {
    arena: &'a Arena<'a>,
}

impl<'a> MarkdownParser<'a> {
    pub fn new(arena: &'a Arena<'a>) -> Self {
        Self { arena }
    }

    pub fn parse(&self, contents: &str) -> ParseResult<Document> {
        let options = parser_options();
        let root = parse_document(self.arena, contents, &options);
        let blocks: Vec<_> = root.children().map(Self::parse_node).collect();
        if blocks.is_empty() {
            return Err(ParseError::EmptyDocument);
        }
        Ok(Document { blocks })
    }

    fn parse_node(node: &'a AstNode<'a>) -> Block {
        let data = node.data.borrow();
        match &data.value {
            NodeValue::Paragraph => Block::Paragraph(InlinesParser::default().parse(node)),
            NodeValue::Heading(heading) => {
                Block::Heading { level: heading.level, text: InlinesParser::default().parse(node) }
            }
            NodeValue::List(list) => {
                let ordered = matches!(list.list_type, ListType::Ordered);
                Block::List { ordered, items: Self::parse_list(node) }
            }
            other => Block::Unsupported(other.identifier()),
        }
    }

    fn parse_list(root: &'a AstNode<'a>) -> Vec<ListItem> {
        let mut items = Vec::new();
        for node in root.children() {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::Item(_) | NodeValue::TaskItem(_) => items.push(Self::parse_list_item(node)),
                other => items.push(ListItem { paragraph: None, skipped: vec![other.identifier()] }),
            }
        }
        items
    }

    fn parse_list_item(root: &'a AstNode<'a>) -> ListItem {
        let mut item = ListItem::default();
        for (index, node) in root.children().enumerate() {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::Paragraph if index == 0 => item.paragraph = Some(InlinesParser::default().parse(node)),
                other => item.skipped.push(other.identifier()),
            }
        }
        item
    }
}

#[derive(Default)]
struct InlinesParser {
    inlines: Vec<Inline>,
    pending: Option<InlineRun>,
}

impl InlinesParser {
    fn parse<'a>(mut self, node: &'a AstNode<'a>) -> Vec<Inline> {
        self.collect_children(node, RunStyle::default());
        self.store_pending();
        self.inlines
    }

    fn collect_children<'a>(&mut self, node: &'a AstNode<'a>, style: RunStyle) {
        for node in node.children() {
            self.collect(node, style);
        }
    }

    fn collect<'a>(&mut self, node: &'a AstNode<'a>, style: RunStyle) {
        let data = node.data.borrow();
        match &data.value {
            NodeValue::Text(text) => self.push_text(&text.to_string(), style),
            NodeValue::Code(code) => self.push_text(&code.literal.to_string(), style.code()),
            NodeValue::Strong => self.collect_children(node, style.strong()),
            NodeValue::Emph => self.collect_children(node, style.emphasis()),
            NodeValue::Strikethrough => self.collect_children(node, style.strikethrough()),
            NodeValue::Underline => self.collect_children(node, style.underline()),
            NodeValue::Link(link) => {
                if node.first_child().is_some() {
                    self.collect_children(node, style.link());
                } else {
                    self.push_text(&link.url.to_string(), style.link());
                }
            }
            NodeValue::SoftBreak => self.push_text(" ", style),
            NodeValue::LineBreak => {
                self.store_pending();
                self.inlines.push(Inline::LineBreak);
            }
            NodeValue::HtmlInline(html) => self.push_text(&html.to_string(), style),
            _ => self.collect_children(node, style),
        }
    }

    fn push_text(&mut self, text: &str, style: RunStyle) {
        if text.is_empty() {
            return;
        }
        match &mut self.pending {
            Some(run) if run.style == style => run.text.push_str(text),
            _ => {
                self.store_pending();
                self.pending = Some(InlineRun::styled(text, style));
            }
        }
    }

    fn store_pending(&mut self) {
        if let Some(run) = mem::take(&mut self.pending) {
            self.inlines.push(Inline::Run(run));
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("markdown document is empty")]
    EmptyDocument,
}

trait Identifier {
    fn identifier(&self) -> &'static str;
}

impl Identifier for NodeValue {
    fn identifier(&self) -> &'static str {
        match self {
            NodeValue::Document => "document",
            NodeValue::FrontMatter(_) => "front matter",
            NodeValue::BlockQuote => "block quote",
            NodeValue::List(_) => "list",
            NodeValue::Item(_) => "item",
            NodeValue::DescriptionList => "description list",
            NodeValue::CodeBlock(_) => "code block",
            NodeValue::HtmlBlock(_) => "html block",
            NodeValue::Paragraph => "paragraph",
            NodeValue::Heading(_) => "heading",
            NodeValue::ThematicBreak => "thematic break",
            NodeValue::FootnoteDefinition(_) => "footnote definition",
            NodeValue::Table(_) => "table",
            NodeValue::TableRow(_) => "table row",
            NodeValue::TableCell => "table cell",
            NodeValue::Text(_) => "text",
            NodeValue::TaskItem(_) => "task item",
            NodeValue::Image(_) => "image",
            _ => "unknown",
        }
    }
}
