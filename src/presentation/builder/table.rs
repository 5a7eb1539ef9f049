use crate::{
    layout::{LayoutKind, RegionName},
    presentation::builder::{error::BuildError, BuildResult, PresentationBuilder, UnitBuffer},
    source::TableData,
    xml::{Element, NamespaceError},
};

/// The names of the styles generated for a single table.
struct TableStyles {
    table: String,
    template: String,
    odd_row: String,
    even_row: String,
    text: String,
    heading: String,
    column: String,
    row: String,
}

impl TableStyles {
    fn new(index: usize) -> Self {
        let table = format!("table{index}");
        Self {
            template: format!("{table}-template"),
            odd_row: format!("{table}-odd-row"),
            even_row: format!("{table}-even-row"),
            text: format!("{table}-text"),
            heading: format!("{table}-text-heading"),
            column: format!("{table}-column"),
            row: format!("{table}-row"),
            table,
        }
    }
}

impl PresentationBuilder {
    /// Push a slide holding the table in an HTML fragment.
    pub(crate) fn push_table(&self, title: Option<&str>, html: &str, buffer: &mut UnitBuffer) -> BuildResult {
        let table = TableData::parse(html)?;
        let layout = self.catalog.get(LayoutKind::TitleAndObject);
        let region = layout
            .region(RegionName::Object)
            .ok_or(BuildError::MissingRegion { layout: layout.kind(), region: RegionName::Object })?;

        buffer.tables += 1;
        let styles = TableStyles::new(self.tables + buffer.tables);
        let column_width = region.rect().width / table.column_count() as f64;
        let row_height = region.rect().height / table.row_count() as f64;
        buffer.styles.extend(self.table_styles(&styles, column_width, row_height)?);

        let mut slide = self.new_slide(LayoutKind::TitleAndObject);
        slide.fill(RegionName::Object, vec![self.table_element(&styles, &table)?])?;
        if let Some(title) = title {
            slide.fill(RegionName::Title, vec![self.title_paragraph(title)?])?;
        }
        self.finish_slide(slide, buffer)
    }

    fn table_element(&self, styles: &TableStyles, table: &TableData) -> Result<Element, NamespaceError> {
        let mut element = Element::with_attributes(
            &self.namespaces,
            "table:table",
            [
                ("table:name", styles.table.as_str()),
                ("table:template-name", styles.template.as_str()),
                ("table:use-first-row-styles", "true"),
                ("table:use-banding-rows-styles", "true"),
            ],
        )?;
        for _ in 0..table.column_count() {
            element.append(Element::with_attributes(
                &self.namespaces,
                "table:table-column",
                [("table:style-name", &styles.column)],
            )?);
        }
        for (index, cells) in table.rows().iter().enumerate() {
            let (cell_style, text_style) = match index {
                0 => (&styles.even_row, &styles.heading),
                _ if index % 2 == 0 => (&styles.even_row, &styles.text),
                _ => (&styles.odd_row, &styles.text),
            };
            let mut row =
                Element::with_attributes(&self.namespaces, "table:table-row", [("table:style-name", &styles.row)])?;
            for text in cells {
                let span = Element::with_attributes(&self.namespaces, "text:span", [("text:style-name", text_style)])?
                    .with_text(text.as_str());
                let mut paragraph = self.element("text:p")?;
                paragraph.append(span);
                let mut cell =
                    Element::with_attributes(&self.namespaces, "table:table-cell", [("table:style-name", cell_style)])?;
                cell.append(paragraph);
                row.append(cell);
            }
            element.append(row);
        }
        Ok(element)
    }

    fn table_styles(
        &self,
        styles: &TableStyles,
        column_width: f64,
        row_height: f64,
    ) -> Result<Vec<Element>, NamespaceError> {
        let ns = &self.namespaces;
        let mut template = Element::with_attributes(ns, "table:table-template", [("table:name", &styles.template)])?;
        for (name, cell_style) in [
            ("table:first-row", &styles.even_row),
            ("table:body", &styles.odd_row),
            ("table:even-rows", &styles.even_row),
            ("table:odd-rows", &styles.odd_row),
        ] {
            template.append(Element::with_attributes(ns, name, [("table:cell-style-name", cell_style)])?);
        }

        let mut elements = vec![
            template,
            self.cell_style(&styles.odd_row, &self.theme.table_row_odd_color().to_string())?,
            self.cell_style(&styles.even_row, &self.theme.table_row_even_color().to_string())?,
            self.cell_text_style(&styles.text, false)?,
            self.cell_text_style(&styles.heading, true)?,
        ];

        let mut column =
            Element::with_attributes(ns, "style:style", [("style:name", styles.column.as_str()), ("style:family", "table-column")])?;
        column.append(Element::with_attributes(
            ns,
            "style:table-column-properties",
            [("style:column-width", crate::layout::inches(column_width))],
        )?);
        elements.push(column);

        let mut row =
            Element::with_attributes(ns, "style:style", [("style:name", styles.row.as_str()), ("style:family", "table-row")])?;
        row.append(Element::with_attributes(
            ns,
            "style:table-row-properties",
            [("style:row-height", crate::layout::inches(row_height))],
        )?);
        elements.push(row);
        Ok(elements)
    }

    fn cell_style(&self, name: &str, background: &str) -> Result<Element, NamespaceError> {
        let ns = &self.namespaces;
        let border = format!("{} solid {}", self.theme.table_border_width(), self.theme.content_alt_color());
        let mut style = Element::with_attributes(ns, "style:style", [("style:name", name), ("style:family", "table-cell")])?;
        style.append(Element::with_attributes(
            ns,
            "style:table-cell-properties",
            [("fo:background-color", background), ("fo:border", border.as_str()), ("style:vertical-align", "middle")],
        )?);
        style.append(Element::with_attributes(
            ns,
            "loext:graphic-properties",
            [("draw:fill", "solid"), ("draw:fill-color", background)],
        )?);
        style.append(Element::with_attributes(ns, "style:paragraph-properties", [("fo:text-align", "center")])?);
        Ok(style)
    }

    fn cell_text_style(&self, name: &str, heading: bool) -> Result<Element, NamespaceError> {
        let ns = &self.namespaces;
        let mut style = Element::with_attributes(ns, "style:style", [("style:name", name), ("style:family", "text")])?;
        let mut properties = Element::with_attributes(
            ns,
            "style:text-properties",
            [("fo:color", self.theme.content_alt_color().to_string()), ("fo:font-size", self.theme.code_font_size())],
        )?;
        if heading {
            properties.set_attribute(ns, "fo:font-weight", "bold")?;
        }
        style.append(properties);
        Ok(style)
    }
}
