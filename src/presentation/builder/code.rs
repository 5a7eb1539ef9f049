use crate::{
    layout::{LayoutKind, RegionName},
    names,
    presentation::builder::{BuildResult, PresentationBuilder, UnitBuffer},
    source::{ContentRecord, OutputPayload, Token},
    xml::{Element, NamespaceError},
};
use itertools::Itertools;

impl PresentationBuilder {
    /// Push one slide per highlight group in a record.
    ///
    /// A table or image output replaces the code entirely: the record becomes a single slide
    /// holding that output.
    pub(crate) fn push_code(&self, record: &ContentRecord, buffer: &mut UnitBuffer) -> BuildResult {
        let output_lines = match &record.output {
            Some(OutputPayload::Table(html)) => return self.push_table(record.title.as_deref(), html, buffer),
            Some(OutputPayload::Image(data)) => return self.push_image(record.title.as_deref(), data, buffer),
            Some(OutputPayload::Text(lines)) => Some(lines),
            None => None,
        };
        let layout = match output_lines {
            Some(_) => LayoutKind::TitleCodeAndOutput,
            None => LayoutKind::TitleAndCode,
        };
        for group in &record.highlights {
            let mut slide = self.new_slide(layout);
            let code = record
                .lines
                .iter()
                .enumerate()
                .map(|(index, line)| self.code_paragraph(line, group.contains(index + 1)))
                .collect::<Result<Vec<_>, _>>()?;
            slide.fill(RegionName::Content, code)?;
            if let Some(lines) = output_lines {
                let output = lines.iter().map(|line| self.output_paragraph(line)).collect::<Result<Vec<_>, _>>()?;
                slide.fill(RegionName::Output, output)?;
            }
            if let Some(title) = &record.title {
                slide.fill(RegionName::Title, vec![self.title_paragraph(title)?])?;
            }
            self.finish_slide(slide, buffer)?;
        }
        Ok(())
    }

    fn code_paragraph(&self, line: &[Token], highlighted: bool) -> Result<Element, NamespaceError> {
        let style = match highlighted {
            true => names::CODE_HIGHLIGHT_PARAGRAPH_STYLE,
            false => names::CODE_PARAGRAPH_STYLE,
        };
        let mut paragraph = self.paragraph(style)?;
        for token in line {
            if token.is_spaces() || token.is_tabs() {
                paragraph.extend(self.whitespace(&token.text)?);
                continue;
            }
            let style = self.theme.resolve_token_style(&token.kind, &token.enclosing);
            let span = Element::with_attributes(&self.namespaces, "text:span", [("text:style-name", style)])?
                .with_text(token.text.as_str());
            paragraph.append(span);
        }
        Ok(paragraph)
    }

    fn output_paragraph(&self, line: &str) -> Result<Element, NamespaceError> {
        let mut paragraph = self.paragraph(names::OUTPUT_PARAGRAPH_STYLE)?;
        for (is_whitespace, chunk) in &line.chars().chunk_by(|c| *c == ' ' || *c == '\t') {
            let text: String = chunk.collect();
            if is_whitespace {
                paragraph.extend(self.whitespace(&text)?);
            } else {
                paragraph.append(self.element("text:span")?.with_text(text));
            }
        }
        Ok(paragraph)
    }

    /// Encode a run of spaces and tabs so that consumers don't collapse it.
    fn whitespace(&self, text: &str) -> Result<Vec<Element>, NamespaceError> {
        let mut elements = Vec::new();
        for (c, run) in &text.chars().chunk_by(|c| *c) {
            let count = run.count();
            match c {
                '\t' => {
                    for _ in 0..count {
                        elements.push(self.element("text:tab")?);
                    }
                }
                _ => {
                    let space = Element::with_attributes(&self.namespaces, "text:s", [("text:c", count.to_string())])?;
                    elements.push(space);
                }
            };
        }
        Ok(elements)
    }
}
