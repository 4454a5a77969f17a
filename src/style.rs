//! Fixed page geometry, type sizes, palette and spacing for the report.
//!
//! All values are PDF user units (1 pt = 1/72 inch) on an A4 page. They are
//! immutable for the process lifetime; every assembly call reads the same
//! tables.

pub type Rgb = [u8; 3];

// A4 dimensions in points
pub(crate) const PAGE_WIDTH: f32 = 595.28; // 210mm
pub(crate) const PAGE_HEIGHT: f32 = 841.89; // 297mm

pub(crate) const MARGIN_TOP: f32 = 20.0;
pub(crate) const MARGIN_RIGHT: f32 = 12.0;
pub(crate) const MARGIN_BOTTOM: f32 = 20.0;
pub(crate) const MARGIN_LEFT: f32 = 12.0;

pub(crate) const USABLE_WIDTH: f32 = PAGE_WIDTH - (MARGIN_LEFT + MARGIN_RIGHT);

pub(crate) const FONT_SIZE_TITLE: f32 = 14.0;
pub(crate) const FONT_SIZE_HEADING: f32 = 12.0;
pub(crate) const FONT_SIZE_SUBHEADING: f32 = 10.0;
pub(crate) const FONT_SIZE_BODY: f32 = 12.0;
pub(crate) const FONT_SIZE_SMALL: f32 = 10.0;

// Baseline sits at ~75% of the font size below the line top; lines advance
// by 120% of the font size. Shared with the width tables in fonts.rs.
pub(crate) const ASCENDER_RATIO: f32 = 0.75;
pub(crate) const LINE_HEIGHT_RATIO: f32 = 1.2;

pub(crate) const ACCENT: Rgb = [79, 70, 229]; // Indigo-600
pub(crate) const TEXT_PRIMARY: Rgb = [31, 41, 55]; // Gray-800
pub(crate) const TEXT_SECONDARY: Rgb = [75, 85, 99]; // Gray-600
pub(crate) const TEXT_FOOTER: Rgb = [156, 163, 175]; // Gray-400
pub(crate) const BORDER: Rgb = [229, 231, 235]; // Gray-200
pub(crate) const ROW_TINT: Rgb = [249, 250, 251]; // Gray-50
pub(crate) const WHITE: Rgb = [255, 255, 255];

pub(crate) const HEADER_SPACING: f32 = 15.0;
pub(crate) const LOGO_SIZE: f32 = 40.0;
pub(crate) const SECTION_SPACING: f32 = 10.0;
pub(crate) const CELL_PADDING: f32 = 5.0;
pub(crate) const MIN_ROW_HEIGHT: f32 = 12.0;
pub(crate) const GRID_LINE_WIDTH: f32 = 0.1;
pub(crate) const RULE_LINE_WIDTH: f32 = 0.5;

// A section never starts in less vertical room than this; the flow engine
// breaks the page first.
pub(crate) const SECTION_HEADROOM: f32 = 80.0;

/// Column grid for the four-column info/notes tables: two fixed label
/// columns, a fixed value column, and the remainder of the usable width.
pub(crate) fn section_col_widths() -> Vec<f32> {
    vec![35.0, 90.0, 35.0, USABLE_WIDTH - 160.0]
}

/// Column grid for the six-column summary roster.
pub(crate) fn summary_col_widths() -> Vec<f32> {
    let fixed = 110.0 + 70.0 + 100.0 + 110.0 + 70.0;
    vec![110.0, 70.0, 100.0, 110.0, 70.0, USABLE_WIDTH - fixed]
}

pub(crate) fn line_height(font_size: f32) -> f32 {
    font_size * LINE_HEIGHT_RATIO
}
