use crate::theme::PageMetrics;

/// A rectangle on a page, in inches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// The rectangle covering an entire page.
    pub fn page(page: &PageMetrics) -> Self {
        Self::new(0.0, 0.0, page.width, page.height)
    }

    /// Shrink this rectangle by `horizontal` on each side, `top` at the top and `bottom` at the bottom.
    pub fn margin(&self, horizontal: f64, top: f64, bottom: f64) -> Self {
        Self::new(
            self.x + horizontal,
            self.y + top,
            self.width - 2.0 * horizontal,
            self.height - top - bottom,
        )
    }

    /// Cut a band of the given height off the top, leaving `gutter` between it and the rest.
    pub fn split_top(&self, height: f64, gutter: f64) -> (Self, Self) {
        let top = Self::new(self.x, self.y, self.width, height);
        let offset = height + gutter;
        let rest = Self::new(self.x, self.y + offset, self.width, self.height - offset);
        (top, rest)
    }

    /// Split this rectangle into two halves of the same height, leaving `gutter` between them.
    pub fn split_even(&self, gutter: f64) -> (Self, Self) {
        let height = (self.height - gutter) / 2.0;
        let top = Self::new(self.x, self.y, self.width, height);
        let bottom = Self::new(self.x, self.y + height + gutter, self.width, height);
        (top, bottom)
    }

    /// A rectangle of the given size centered within this one.
    ///
    /// The size is used as is, even if it doesn't fit.
    pub fn center(&self, width: f64, height: f64) -> Self {
        let mid_x = self.x + self.width / 2.0;
        let mid_y = self.y + self.height / 2.0;
        Self::new(mid_x - width / 2.0, mid_y - height / 2.0, width, height)
    }
}

/// Format a length as used in document attributes.
pub(crate) fn inches(value: f64) -> String {
    format!("{value:.3}in")
}
