/// A parsed markdown document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// A markdown block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// A heading.
    Heading { level: u8, text: Vec<Inline> },

    /// A paragraph, composed of text and line breaks.
    Paragraph(Vec<Inline>),

    /// A list.
    List { ordered: bool, items: Vec<ListItem> },

    /// A block that can't be turned into slide content.
    Unsupported(&'static str),
}

/// A list item.
///
/// Only the item's leading paragraph is kept, any other children are only named so they can be
/// reported.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListItem {
    pub paragraph: Option<Vec<Inline>>,
    pub skipped: Vec<&'static str>,
}

/// An inline element in a paragraph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    Run(InlineRun),
    LineBreak,
}

/// A piece of text that has the same style all across.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineRun {
    pub text: String,
    pub style: RunStyle,
}

impl InlineRun {
    pub fn styled<S: Into<String>>(text: S, style: RunStyle) -> Self {
        Self { text: text.into(), style }
    }
}

/// The style of an inline run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunStyle {
    flags: u8,
}

impl RunStyle {
    /// Add strong emphasis to this style.
    pub fn strong(self) -> Self {
        self.add_flag(RunFlag::Strong)
    }

    /// Add emphasis to this style.
    pub fn emphasis(self) -> Self {
        self.add_flag(RunFlag::Emphasis)
    }

    /// Add strikethrough to this style.
    pub fn strikethrough(self) -> Self {
        self.add_flag(RunFlag::Strikethrough)
    }

    /// Add underline to this style.
    pub fn underline(self) -> Self {
        self.add_flag(RunFlag::Underline)
    }

    /// Indicate this text is a piece of inline code.
    pub fn code(self) -> Self {
        self.add_flag(RunFlag::Code)
    }

    /// Indicate this text is a link.
    pub fn link(self) -> Self {
        self.add_flag(RunFlag::Link)
    }

    pub fn is_plain(&self) -> bool {
        self.flags == 0
    }

    pub fn is_strong(&self) -> bool {
        self.has_flag(RunFlag::Strong)
    }

    pub fn is_emphasis(&self) -> bool {
        self.has_flag(RunFlag::Emphasis)
    }

    pub fn is_strikethrough(&self) -> bool {
        self.has_flag(RunFlag::Strikethrough)
    }

    pub fn is_underline(&self) -> bool {
        self.has_flag(RunFlag::Underline)
    }

    pub fn is_code(&self) -> bool {
        self.has_flag(RunFlag::Code)
    }

    pub fn is_link(&self) -> bool {
        self.has_flag(RunFlag::Link)
    }

    /// The name of the text style for this combination of flags, e.g. `span__strong_emphasis`.
    pub fn style_name(&self) -> String {
        let flags: Vec<_> = RunFlag::ALL.iter().filter(|flag| self.has_flag(**flag)).map(RunFlag::name).collect();
        format!("span__{}", flags.join("_"))
    }

    fn add_flag(mut self, flag: RunFlag) -> Self {
        self.flags |= flag as u8;
        self
    }

    fn has_flag(&self, flag: RunFlag) -> bool {
        self.flags & flag as u8 != 0
    }
}

#[derive(Clone, Copy, Debug)]
enum RunFlag {
    Strong = 1,
    Emphasis = 2,
    Strikethrough = 4,
    Underline = 8,
    Code = 16,
    Link = 32,
}

impl RunFlag {
    const ALL: [RunFlag; 6] = [Self::Strong, Self::Emphasis, Self::Strikethrough, Self::Underline, Self::Code, Self::Link];

    fn name(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Emphasis => "emphasis",
            Self::Strikethrough => "strikethrough",
            Self::Underline => "underline",
            Self::Code => "code",
            Self::Link => "link",
        }
    }
}
