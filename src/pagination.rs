use std::fmt;

/// A renderable page image, referenced by its source (file path or `sample://` URI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub source: String,
    /// Pixel dimensions, when the provider could read them from the image header
    pub dimensions: Option<(usize, usize)>,
}

impl PageImage {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            dimensions: None,
        }
    }

    pub fn with_dimensions(mut self, width: usize, height: usize) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    /// Short name for display: the last path segment of the source
    pub fn display_name(&self) -> &str {
        self.source
            .rsplit(['/', '\\'])
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Image(PageImage),
    /// Filler page that evens out an odd page count
    Blank,
}

impl Page {
    pub fn image(source: impl Into<String>) -> Self {
        Page::Image(PageImage::new(source))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Page::Blank)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Image(image) => write!(f, "{}", image.display_name()),
            Page::Blank => write!(f, "blank"),
        }
    }
}

/// One physical leaf of the book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub front: Page,
    pub back: Page,
}

/// Pair pages into sheets in order, padding an odd count with a trailing blank.
///
/// Sheet `i` carries pages `2i` (front) and `2i + 1` (back).
pub fn paginate(pages: &[Page]) -> Vec<Sheet> {
    let mut sheets = Vec::with_capacity(pages.len().div_ceil(2));
    for pair in pages.chunks(2) {
        let front = pair[0].clone();
        let back = pair.get(1).cloned().unwrap_or(Page::Blank);
        sheets.push(Sheet { front, back });
    }
    sheets
}
