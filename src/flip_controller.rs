use std::fmt;

use log::debug;

use crate::pagination::{Page, Sheet, paginate};

/// Side effect fired once per successful page turn
pub type FlipCallback = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// No pages loaded, nothing to display
    Empty,
    Cover,
    Spread,
    BackCover,
}

/// 1-based page numbers currently facing the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisiblePages {
    None,
    Single(usize),
    Range(usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub mode: ViewMode,
    pub visible: VisiblePages,
    pub page_count: usize,
}

impl View {
    pub fn label(&self) -> String {
        match self.visible {
            VisiblePages::None => "nothing to display".to_string(),
            VisiblePages::Single(page) => format!("page {page} of {}", self.page_count),
            VisiblePages::Range(left, right) => {
                format!("pages {left} - {right} of {}", self.page_count)
            }
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Placement of one sheet for the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetTransform<'a> {
    pub index: usize,
    pub flipped: bool,
    pub rotation_degrees: u16,
    /// Higher values are drawn on top
    pub stack_order: usize,
    pub front: &'a Page,
    pub back: &'a Page,
}

/// One visible side of a sheet with its 1-based page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face<'a> {
    pub number: usize,
    pub page: &'a Page,
}

pub fn is_flipped(index: usize, flipped_count: usize) -> bool {
    index < flipped_count
}

pub fn rotation_degrees(index: usize, flipped_count: usize) -> u16 {
    if is_flipped(index, flipped_count) { 180 } else { 0 }
}

/// Turned sheets stack by ascending index, unturned ones by descending index,
/// so the sheet next to the open gutter is on top of its pile.
pub fn stack_order(index: usize, flipped_count: usize, sheet_count: usize) -> usize {
    if is_flipped(index, flipped_count) {
        index
    } else {
        sheet_count.saturating_sub(index)
    }
}

/// Owns the turn cursor: the number of sheets rotated past the spine.
///
/// Everything the renderer needs is derived from the cursor on demand.
pub struct FlipController {
    sheets: Vec<Sheet>,
    page_count: usize,
    flipped_count: usize,
    on_flip: Option<FlipCallback>,
}

impl Default for FlipController {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl fmt::Debug for FlipController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlipController")
            .field("sheets", &self.sheets.len())
            .field("page_count", &self.page_count)
            .field("flipped_count", &self.flipped_count)
            .field("on_flip", &self.on_flip.is_some())
            .finish()
    }
}

impl FlipController {
    pub fn new(pages: &[Page]) -> Self {
        Self {
            sheets: paginate(pages),
            page_count: pages.len(),
            flipped_count: 0,
            on_flip: None,
        }
    }

    pub fn with_on_flip(mut self, callback: FlipCallback) -> Self {
        self.on_flip = Some(callback);
        self
    }

    /// Replace the whole page list; the book closes back to its cover
    pub fn set_pages(&mut self, pages: &[Page]) {
        self.sheets = paginate(pages);
        self.page_count = pages.len();
        self.flipped_count = 0;
        debug!(
            "Flipbook reset: {} pages in {} sheets",
            self.page_count,
            self.sheets.len()
        );
    }

    pub fn set_on_flip(&mut self, callback: Option<FlipCallback>) {
        self.on_flip = callback;
    }

    pub fn has_on_flip(&self) -> bool {
        self.on_flip.is_some()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn flipped_count(&self) -> usize {
        self.flipped_count
    }

    pub fn can_advance(&self) -> bool {
        self.flipped_count < self.sheets.len()
    }

    pub fn can_retreat(&self) -> bool {
        self.flipped_count > 0
    }

    /// Turn the next sheet. Returns false at the back cover.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.flipped_count += 1;
        self.notify_flip();
        true
    }

    /// Turn back the last turned sheet. Returns false at the cover.
    pub fn retreat(&mut self) -> bool {
        if !self.can_retreat() {
            return false;
        }
        self.flipped_count -= 1;
        self.notify_flip();
        true
    }

    fn notify_flip(&mut self) {
        debug!(
            "Flipped to {}/{} sheets",
            self.flipped_count,
            self.sheets.len()
        );
        if let Some(callback) = self.on_flip.as_mut() {
            callback();
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        if self.sheets.is_empty() {
            ViewMode::Empty
        } else if self.flipped_count == 0 {
            ViewMode::Cover
        } else if self.flipped_count == self.sheets.len() {
            ViewMode::BackCover
        } else {
            ViewMode::Spread
        }
    }

    pub fn current_view(&self) -> View {
        let mode = self.view_mode();
        let visible = match mode {
            ViewMode::Empty => VisiblePages::None,
            ViewMode::Cover => VisiblePages::Single(1),
            ViewMode::BackCover => VisiblePages::Single(self.page_count),
            ViewMode::Spread => {
                let left = self.flipped_count * 2;
                let right = left + 1;
                if right <= self.page_count {
                    VisiblePages::Range(left, right)
                } else {
                    VisiblePages::Single(left)
                }
            }
        };
        View {
            mode,
            visible,
            page_count: self.page_count,
        }
    }

    pub fn sheet_transforms(&self) -> Vec<SheetTransform<'_>> {
        let sheet_count = self.sheets.len();
        self.sheets
            .iter()
            .enumerate()
            .map(|(index, sheet)| SheetTransform {
                index,
                flipped: is_flipped(index, self.flipped_count),
                rotation_degrees: rotation_degrees(index, self.flipped_count),
                stack_order: stack_order(index, self.flipped_count, sheet_count),
                front: &sheet.front,
                back: &sheet.back,
            })
            .collect()
    }

    /// Face left of the spine: back of the topmost turned sheet
    pub fn left_face(&self) -> Option<Face<'_>> {
        self.sheet_transforms()
            .into_iter()
            .filter(|t| t.flipped)
            .max_by_key(|t| t.stack_order)
            .map(|t| Face {
                number: t.index * 2 + 2,
                page: t.back,
            })
    }

    /// Face right of the spine: front of the topmost unturned sheet
    pub fn right_face(&self) -> Option<Face<'_>> {
        self.sheet_transforms()
            .into_iter()
            .filter(|t| !t.flipped)
            .max_by_key(|t| t.stack_order)
            .map(|t| Face {
                number: t.index * 2 + 1,
                page: t.front,
            })
    }
}
