use crate::{
    layout::{LayoutKind, RegionName},
    markdown::{Block, Inline, ListItem, MarkdownParser, RunStyle},
    names,
    presentation::builder::{BuildResult, PresentationBuilder, UnitBuffer},
    xml::{Element, NamespaceError},
};
use comrak::Arena;

impl PresentationBuilder {
    /// Push a slide for a markdown document.
    ///
    /// A leading heading becomes the slide's title and everything else goes into its content.
    pub(crate) fn push_markdown(&self, text: &str, buffer: &mut UnitBuffer) -> BuildResult {
        let arena = Arena::new();
        let document = MarkdownParser::new(&arena).parse(text)?;
        let mut blocks = document.blocks.into_iter().peekable();

        let mut slide = self.new_slide(LayoutKind::TitleAndContent);
        if let Some(Block::Heading { text: heading, .. }) =
            blocks.next_if(|block| matches!(block, Block::Heading { .. }))
        {
            let mut title = self.element("text:p")?;
            title.extend(self.inlines(&heading, buffer)?);
            slide.fill(RegionName::Title, vec![title])?;
        }

        let blocks: Vec<_> = blocks
            .filter(|block| match block {
                Block::Unsupported(kind) => {
                    log::warn!("skipping unsupported markdown block: {kind}");
                    false
                }
                _ => true,
            })
            .collect();
        let mut content = Vec::new();
        for (index, block) in blocks.iter().enumerate() {
            if index > 0 {
                content.push(self.paragraph(names::CONTENT_PARAGRAPH_STYLE)?);
            }
            content.push(self.block(block, buffer)?);
        }
        slide.fill(RegionName::Content, content)?;
        self.finish_slide(slide, buffer)
    }

    fn block(&self, block: &Block, buffer: &mut UnitBuffer) -> Result<Element, NamespaceError> {
        match block {
            Block::Heading { text, .. } | Block::Paragraph(text) => {
                let mut paragraph = self.paragraph(names::CONTENT_PARAGRAPH_STYLE)?;
                paragraph.extend(self.inlines(text, buffer)?);
                Ok(paragraph)
            }
            Block::List { ordered, items } => self.list(*ordered, items, buffer),
            // Filtered out before getting here.
            Block::Unsupported(_) => self.paragraph(names::CONTENT_PARAGRAPH_STYLE),
        }
    }

    fn list(&self, ordered: bool, items: &[ListItem], buffer: &mut UnitBuffer) -> Result<Element, NamespaceError> {
        let style = match ordered {
            true => names::NUMBERED_LIST_STYLE,
            false => names::BULLET_LIST_STYLE,
        };
        let mut list = Element::with_attributes(&self.namespaces, "text:list", [("text:style-name", style)])?;
        for item in items {
            for skipped in &item.skipped {
                log::warn!("skipping {skipped} inside list item");
            }
            let Some(inlines) = &item.paragraph else {
                continue;
            };
            let mut paragraph = self.paragraph(names::CONTENT_LIST_PARAGRAPH_STYLE)?;
            paragraph.extend(self.inlines(inlines, buffer)?);
            let mut list_item = self.element("text:list-item")?;
            list_item.append(paragraph);
            list.append(list_item);
        }
        Ok(list)
    }

    fn inlines(&self, inlines: &[Inline], buffer: &mut UnitBuffer) -> Result<Vec<Element>, NamespaceError> {
        let mut elements = Vec::new();
        for inline in inlines {
            let element = match inline {
                Inline::Run(run) if run.style.is_plain() => self.element("text:span")?.with_text(run.text.as_str()),
                Inline::Run(run) => {
                    let style = self.run_style(run.style, buffer)?;
                    Element::with_attributes(&self.namespaces, "text:span", [("text:style-name", style)])?
                        .with_text(run.text.as_str())
                }
                Inline::LineBreak => self.element("text:line-break")?,
            };
            elements.push(element);
        }
        Ok(elements)
    }

    /// Get the name of the text style for a run, generating it the first time it's used.
    fn run_style(&self, style: RunStyle, buffer: &mut UnitBuffer) -> Result<String, NamespaceError> {
        let name = style.style_name();
        if self.has_style(&name, buffer) {
            return Ok(name);
        }
        let ns = &self.namespaces;
        let mut element = Element::with_attributes(ns, "style:style", [("style:name", name.as_str()), ("style:family", "text")])?;
        let mut properties = self.element("style:text-properties")?;
        if style.is_strong() {
            properties.set_attribute(ns, "fo:font-weight", "bold")?;
        }
        if style.is_emphasis() {
            properties.set_attribute(ns, "fo:font-style", "italic")?;
        }
        if style.is_strikethrough() {
            properties.set_attribute(ns, "style:text-line-through-style", "solid")?;
        }
        if style.is_underline() || style.is_link() {
            properties.set_attribute(ns, "style:text-underline-style", "solid")?;
        }
        if style.is_code() {
            properties.set_attribute(ns, "fo:font-family", self.theme.fonts().code_family.as_str())?;
        }
        if style.is_link() {
            properties.set_attribute(ns, "fo:color", self.theme.title_color().to_string())?;
        }
        element.append(properties);
        buffer.styles.push(element);
        buffer.style_names.insert(name.clone());
        Ok(name)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        presentation::builder::{
            test_utils::{builder, texts},
            UnitBuffer,
        },
        source::SourceUnit,
    };

    fn build(text: &str) -> (UnitBuffer, usize) {
        let builder = builder();
        let mut buffer = UnitBuffer::default();
        builder.push_markdown(text, &mut buffer).expect("build failed");
        let slides = buffer.slides.len();
        (buffer, slides)
    }

    #[test]
    fn heading_becomes_title() {
        let (buffer, slides) = build("# Intro\n\nSome text");
        assert_eq!(slides, 1);
        let slide = &buffer.slides[0];
        assert_eq!(slide.attribute("draw:master-page-name"), Some("layout-title-and-content"));
        let frames = slide.children();
        assert_eq!(frames[0].attribute("presentation:class"), Some("title"));
        assert_eq!(texts(&frames[0]), &["Intro"]);
        let title = frames[0].find_all("text:p").next().expect("no title paragraph");
        assert_eq!(title.attribute("text:style-name"), Some("title-paragraph"));
        assert_eq!(texts(&frames[1]), &["Some text"]);
    }

    #[test]
    fn no_heading() {
        let (buffer, _) = build("Some text");
        let frames = buffer.slides[0].children();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].attribute("presentation:class"), Some("object"));
    }

    #[test]
    fn spacers_between_blocks() {
        let (buffer, _) = build("first\n\nsecond\n\n* item");
        let text_box = &buffer.slides[0].children()[0].children()[0];
        let names: Vec<_> = text_box.children().iter().map(|e| e.name().prefixed()).collect();
        assert_eq!(names, &["text:p", "text:p", "text:p", "text:p", "text:list"]);
        assert!(text_box.children()[1].children().is_empty());
        assert!(text_box.children()[3].children().is_empty());
    }

    #[test]
    fn unsupported_blocks_are_skipped() {
        let (buffer, _) = build("first\n\n```\ncode\n```\n\nsecond");
        let text_box = &buffer.slides[0].children()[0].children()[0];
        assert_eq!(text_box.children().len(), 3);
        assert_eq!(texts(text_box), &["first", "second"]);
    }

    #[test]
    fn lists() {
        let (buffer, _) = build("1. one\n2. **two**\n\n- a\n  - nested");
        let text_box = &buffer.slides[0].children()[0].children()[0];
        let lists: Vec<_> = text_box.find_all("text:list").collect();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].attribute("text:style-name"), Some("list-numbered"));
        assert_eq!(lists[1].attribute("text:style-name"), Some("list"));
        assert_eq!(lists[0].children().len(), 2);
        assert_eq!(texts(lists[1]), &["a"]);
        let paragraph = lists[0].find_all("text:p").next().unwrap();
        assert_eq!(paragraph.attribute("text:style-name"), Some("content-list-paragraph"));
    }

    #[test]
    fn inline_styles_generated_once() {
        let (buffer, _) = build("**a** and **b** and _c_ and **_d_**");
        let names: Vec<_> = buffer.styles.iter().map(|style| style.attribute("style:name").unwrap()).collect();
        assert_eq!(names, &["span__strong", "span__emphasis", "span__strong_emphasis"]);
        let plain = buffer.slides[0].find_all("text:span").find(|span| span.text() == Some(" and ")).unwrap();
        assert_eq!(plain.attribute("text:style-name"), None);
    }

    #[test]
    fn styles_shared_across_units() {
        let mut builder = builder();
        builder.push_unit(&SourceUnit::Markdown("**a**".into())).expect("build failed");
        builder.push_unit(&SourceUnit::Markdown("**b**".into())).expect("build failed");
        let presentation = builder.build();
        assert_eq!(presentation.styles().len(), 1);
        assert_eq!(presentation.slides().len(), 2);
    }

    #[test]
    fn hard_break() {
        let (buffer, _) = build("one  \ntwo");
        assert_eq!(buffer.slides[0].find_all("text:line-break").count(), 1);
    }
}
