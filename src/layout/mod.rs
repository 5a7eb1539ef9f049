//! The catalog of slide layouts.
//!
//! Every layout is a fixed arrangement of named regions computed from the page size. Slides pick a
//! layout and attach content to its regions by name.

use crate::{
    names,
    theme::PageMetrics,
    xml::{Element, NamespaceError, Namespaces},
};
use strum::IntoEnumIterator;

pub(crate) mod geometry;

pub use geometry::Rect;
pub(crate) use geometry::inches;

const HORIZONTAL_MARGIN: f64 = 0.9;
const TOP_MARGIN: f64 = 0.4;
const BOTTOM_MARGIN: f64 = 0.4;
const TITLE_HEIGHT: f64 = 1.0;
const GUTTER: f64 = 0.2;

/// A kind of slide layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum LayoutKind {
    Blank,
    TitleOnly,
    TitleAndContent,
    TitleAndCode,
    TitleCodeAndOutput,
    TitleAndImage,
    ImageOnly,
    TitleAndObject,
}

impl LayoutKind {
    /// The name of the master page for this layout.
    pub fn master_page_name(&self) -> String {
        format!("layout-{self}")
    }
}

/// The name of a region within a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RegionName {
    Title,
    Content,
    Output,
    Object,
}

/// What a region holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionKind {
    /// Paragraphs inside a text box.
    TextBox,

    /// An object, like a table, placed directly inside the frame.
    Frame,

    /// An image centered within the region.
    ImageFrame,
}

/// A named rectangle within a layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    name: RegionName,
    kind: RegionKind,
    rect: Rect,
    style: &'static str,
    class: &'static str,
}

impl Region {
    fn new(name: RegionName, kind: RegionKind, rect: Rect, style: &'static str) -> Self {
        let class = match name {
            RegionName::Title => "title",
            _ if kind == RegionKind::ImageFrame => "graphic",
            _ => "object",
        };
        Self { name, kind, rect, style, class }
    }

    pub fn name(&self) -> RegionName {
        self.name
    }

    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    /// Build this region's frame holding the given content.
    pub fn populate(&self, namespaces: &Namespaces, content: Vec<Element>) -> Result<Element, NamespaceError> {
        let mut frame = self.frame(namespaces, &self.rect)?;
        match self.kind {
            RegionKind::TextBox => {
                let mut text_box = Element::new(namespaces, "draw:text-box")?;
                text_box.extend(content);
                frame.append(text_box);
            }
            RegionKind::Frame | RegionKind::ImageFrame => frame.extend(content),
        };
        Ok(frame)
    }

    /// Build a frame for an image of the given size, in inches, centered within this region.
    ///
    /// Images are never scaled so this keeps their aspect ratio.
    pub fn place_image(
        &self,
        namespaces: &Namespaces,
        image: Element,
        width: f64,
        height: f64,
    ) -> Result<Element, NamespaceError> {
        let rect = self.rect.center(width, height);
        let mut frame = self.frame(namespaces, &rect)?;
        frame.append(image);
        Ok(frame)
    }

    /// Build the empty placeholder for this region used in master pages.
    pub fn placeholder(&self, namespaces: &Namespaces) -> Result<Element, NamespaceError> {
        let mut frame = self.frame(namespaces, &self.rect)?;
        frame.set_attribute(namespaces, "presentation:placeholder", "true")?;
        if self.kind == RegionKind::TextBox {
            frame.append(Element::new(namespaces, "draw:text-box")?);
        }
        Ok(frame)
    }

    fn frame(&self, namespaces: &Namespaces, rect: &Rect) -> Result<Element, NamespaceError> {
        Element::with_attributes(
            namespaces,
            "draw:frame",
            [
                ("presentation:style-name", self.style.to_string()),
                ("svg:x", inches(rect.x)),
                ("svg:y", inches(rect.y)),
                ("svg:width", inches(rect.width)),
                ("svg:height", inches(rect.height)),
                ("presentation:class", self.class.to_string()),
            ],
        )
    }
}

/// A slide layout: a set of regions on a page.
#[derive(Clone, Debug, PartialEq)]
pub struct SlideLayout {
    kind: LayoutKind,
    regions: Vec<Region>,
}

impl SlideLayout {
    pub fn new(kind: LayoutKind, page: &PageMetrics) -> Self {
        use RegionKind::*;
        use RegionName::*;

        let body = Rect::page(page).margin(HORIZONTAL_MARGIN, TOP_MARGIN, BOTTOM_MARGIN);
        let (title_rect, content_rect) = body.split_top(TITLE_HEIGHT, GUTTER);
        let title = Region::new(Title, TextBox, title_rect, names::TITLE_FRAME_STYLE);
        let regions = match kind {
            LayoutKind::Blank => vec![],
            LayoutKind::TitleOnly => vec![title],
            LayoutKind::TitleAndContent => {
                vec![title, Region::new(Content, TextBox, content_rect, names::CONTENT_FRAME_STYLE)]
            }
            LayoutKind::TitleAndCode => vec![title, Region::new(Content, TextBox, content_rect, names::CODE_FRAME_STYLE)],
            LayoutKind::TitleCodeAndOutput => {
                let (code_rect, output_rect) = content_rect.split_even(GUTTER);
                vec![
                    title,
                    Region::new(Content, TextBox, code_rect, names::CODE_FRAME_STYLE),
                    Region::new(Output, TextBox, output_rect, names::OUTPUT_FRAME_STYLE),
                ]
            }
            LayoutKind::TitleAndImage => {
                vec![title, Region::new(Object, ImageFrame, content_rect, names::IMAGE_FRAME_STYLE)]
            }
            LayoutKind::ImageOnly => vec![Region::new(Object, ImageFrame, body, names::IMAGE_FRAME_STYLE)],
            LayoutKind::TitleAndObject => {
                vec![title, Region::new(Object, Frame, content_rect, names::OBJECT_FRAME_STYLE)]
            }
        };
        Self { kind, regions }
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, name: RegionName) -> Option<&Region> {
        self.regions.iter().find(|region| region.name == name)
    }

    /// Build the master page for this layout.
    pub fn to_master_page(&self, namespaces: &Namespaces) -> Result<Element, NamespaceError> {
        let mut master = Element::with_attributes(
            namespaces,
            "style:master-page",
            [
                ("style:name", self.kind.master_page_name()),
                ("style:page-layout-name", names::PAGE_LAYOUT.to_string()),
                ("draw:style-name", names::MASTER_PAGE_STYLE.to_string()),
            ],
        )?;
        for region in &self.regions {
            master.append(region.placeholder(namespaces)?);
        }
        Ok(master)
    }
}

/// Every layout, computed for a specific page size.
#[derive(Clone, Debug)]
pub struct LayoutCatalog {
    layouts: Vec<SlideLayout>,
}

impl LayoutCatalog {
    pub fn new(page: &PageMetrics) -> Self {
        let layouts = LayoutKind::iter().map(|kind| SlideLayout::new(kind, page)).collect();
        Self { layouts }
    }

    pub fn get(&self, kind: LayoutKind) -> &SlideLayout {
        // Layouts are stored in declaration order.
        &self.layouts[kind as usize]
    }

    pub fn layouts(&self) -> &[SlideLayout] {
        &self.layouts
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    fn rect_of(layout: &SlideLayout, name: RegionName) -> Rect {
        *layout.region(name).expect("region not found").rect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn catalog_order() {
        let catalog = LayoutCatalog::new(&PageMetrics::default());
        for kind in LayoutKind::iter() {
            assert_eq!(catalog.get(kind).kind(), kind);
        }
    }

    #[rstest]
    #[case::blank(LayoutKind::Blank, &[])]
    #[case::title_only(LayoutKind::TitleOnly, &[RegionName::Title])]
    #[case::content(LayoutKind::TitleAndContent, &[RegionName::Title, RegionName::Content])]
    #[case::code(LayoutKind::TitleAndCode, &[RegionName::Title, RegionName::Content])]
    #[case::code_output(LayoutKind::TitleCodeAndOutput, &[RegionName::Title, RegionName::Content, RegionName::Output])]
    #[case::image(LayoutKind::TitleAndImage, &[RegionName::Title, RegionName::Object])]
    #[case::image_only(LayoutKind::ImageOnly, &[RegionName::Object])]
    #[case::object(LayoutKind::TitleAndObject, &[RegionName::Title, RegionName::Object])]
    fn regions(#[case] kind: LayoutKind, #[case] expected: &[RegionName]) {
        let layout = SlideLayout::new(kind, &PageMetrics::default());
        let names: Vec<_> = layout.regions().iter().map(Region::name).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn title_and_content_geometry() {
        let page = PageMetrics { width: 10.0, height: 8.0 };
        let layout = SlideLayout::new(LayoutKind::TitleAndCode, &page);
        let title = rect_of(&layout, RegionName::Title);
        assert_close(title.x, 0.9);
        assert_close(title.y, 0.4);
        assert_close(title.width, 8.2);
        assert_close(title.height, 1.0);
        let content = rect_of(&layout, RegionName::Content);
        assert_close(content.y, 1.6);
        assert_close(content.height, 6.0);
        assert_close(content.width, 8.2);
    }

    #[test]
    fn code_and_output_split() {
        let page = PageMetrics { width: 10.0, height: 8.2 };
        let layout = SlideLayout::new(LayoutKind::TitleCodeAndOutput, &page);
        let code = rect_of(&layout, RegionName::Content);
        let output = rect_of(&layout, RegionName::Output);
        assert_close(code.height, 3.0);
        assert_close(output.height, 3.0);
        assert_close(output.y, code.y + code.height + 0.2);
    }

    #[test]
    fn image_only_geometry() {
        let layout = SlideLayout::new(LayoutKind::ImageOnly, &PageMetrics::default());
        let rect = rect_of(&layout, RegionName::Object);
        assert_close(rect.x, 0.9);
        assert_close(rect.y, 0.4);
        assert_close(rect.width, 13.33 - 1.8);
        assert_close(rect.height, 7.5 - 0.8);
    }

    #[test]
    fn proportional_to_page() {
        let small = SlideLayout::new(LayoutKind::TitleAndObject, &PageMetrics { width: 10.0, height: 5.0 });
        let large = SlideLayout::new(LayoutKind::TitleAndObject, &PageMetrics { width: 20.0, height: 10.0 });
        let small = rect_of(&small, RegionName::Object);
        let large = rect_of(&large, RegionName::Object);
        assert_close(large.width - small.width, 10.0);
        assert_close(large.height - small.height, 5.0);
    }

    #[test]
    fn populate_text_box() {
        let namespaces = Namespaces::odf();
        let layout = SlideLayout::new(LayoutKind::TitleOnly, &PageMetrics::default());
        let region = layout.region(RegionName::Title).unwrap();
        let paragraph = Element::new(&namespaces, "text:p").unwrap();
        let frame = region.populate(&namespaces, vec![paragraph]).expect("populate failed");
        assert_eq!(
            frame.serialize(&Default::default()).unwrap(),
            r#"<draw:frame presentation:style-name="title" svg:x="0.900in" svg:y="0.400in" svg:width="11.530in" svg:height="1.000in" presentation:class="title"><draw:text-box><text:p/></draw:text-box></draw:frame>"#
        );
    }

    #[test]
    fn place_image_centered() {
        let namespaces = Namespaces::odf();
        let page = PageMetrics { width: 10.0, height: 5.0 };
        let layout = SlideLayout::new(LayoutKind::ImageOnly, &page);
        let region = layout.region(RegionName::Object).unwrap();
        let image = Element::new(&namespaces, "draw:image").unwrap();
        let frame = region.place_image(&namespaces, image, 2.0, 1.0).expect("placing failed");
        assert_eq!(frame.attribute("svg:x"), Some("4.000in"));
        assert_eq!(frame.attribute("svg:y"), Some("2.000in"));
        assert_eq!(frame.attribute("svg:width"), Some("2.000in"));
        assert_eq!(frame.attribute("presentation:class"), Some("graphic"));
    }

    #[test]
    fn master_page() {
        let namespaces = Namespaces::odf();
        let layout = SlideLayout::new(LayoutKind::TitleAndObject, &PageMetrics::default());
        let master = layout.to_master_page(&namespaces).expect("master failed");
        assert_eq!(master.attribute("style:name"), Some("layout-title-and-object"));
        assert_eq!(master.children().len(), 2);
        assert!(master.children().iter().all(|frame| frame.attribute("presentation:placeholder") == Some("true")));
    }
}
