use crate::{
    layout::{Region, RegionName, SlideLayout},
    names,
    presentation::builder::BuildError,
    xml::{Element, Namespaces},
};

/// Assembles a single slide out of a layout's regions.
pub(crate) struct SlideBuilder<'a> {
    layout: &'a SlideLayout,
    namespaces: &'a Namespaces,
    frames: Vec<Element>,
}

impl<'a> SlideBuilder<'a> {
    pub(crate) fn new(layout: &'a SlideLayout, namespaces: &'a Namespaces) -> Self {
        Self { layout, namespaces, frames: Vec::new() }
    }

    /// Put the given elements inside a region.
    pub(crate) fn fill(&mut self, region: RegionName, content: Vec<Element>) -> Result<(), BuildError> {
        let frame = self.region(region)?.populate(self.namespaces, content)?;
        self.frames.push(frame);
        Ok(())
    }

    /// Center an image of the given size, in inches, inside a region.
    pub(crate) fn place_image(
        &mut self,
        region: RegionName,
        image: Element,
        width: f64,
        height: f64,
    ) -> Result<(), BuildError> {
        let frame = self.region(region)?.place_image(self.namespaces, image, width, height)?;
        self.frames.push(frame);
        Ok(())
    }

    /// Build the `draw:page` for this slide.
    pub(crate) fn build(self, name: &str) -> Result<Element, BuildError> {
        let mut page = Element::with_attributes(
            self.namespaces,
            "draw:page",
            [
                ("draw:name", name.to_string()),
                ("draw:style-name", names::DRAWING_PAGE_STYLE.to_string()),
                ("draw:master-page-name", self.layout.kind().master_page_name()),
            ],
        )?;
        page.extend(self.frames);
        Ok(page)
    }

    fn region(&self, region: RegionName) -> Result<&'a Region, BuildError> {
        self.layout
            .region(region)
            .ok_or(BuildError::MissingRegion { layout: self.layout.kind(), region })
    }
}
