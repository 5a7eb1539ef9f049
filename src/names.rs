//! Names of the styles defined in the generated documents.
//!
//! The styles part defines these and slides refer to them by name.

pub(crate) const PAGE_LAYOUT: &str = "page-layout";
pub(crate) const MASTER_PAGE_STYLE: &str = "master-page";
pub(crate) const DRAWING_PAGE_STYLE: &str = "dp1";

pub(crate) const TITLE_FRAME_STYLE: &str = "title";
pub(crate) const CONTENT_FRAME_STYLE: &str = "content";
pub(crate) const CODE_FRAME_STYLE: &str = "code-frame";
pub(crate) const OUTPUT_FRAME_STYLE: &str = "output-frame";
pub(crate) const IMAGE_FRAME_STYLE: &str = "image";
pub(crate) const OBJECT_FRAME_STYLE: &str = "object";

pub(crate) const TITLE_PARAGRAPH_STYLE: &str = "title-paragraph";
pub(crate) const CODE_PARAGRAPH_STYLE: &str = "code";
pub(crate) const CODE_HIGHLIGHT_PARAGRAPH_STYLE: &str = "code-highlight";
pub(crate) const OUTPUT_PARAGRAPH_STYLE: &str = "output";
pub(crate) const CONTENT_PARAGRAPH_STYLE: &str = "content-paragraph";
pub(crate) const CONTENT_LIST_PARAGRAPH_STYLE: &str = "content-list-paragraph";

pub(crate) const BULLET_LIST_STYLE: &str = "list";
pub(crate) const NUMBERED_LIST_STYLE: &str = "list-numbered";
