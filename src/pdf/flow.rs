use pdf_writer::Content;

use crate::error::LayoutError;
use crate::fonts::FontSet;
use crate::model::{Align, Cell, Cursor, Row, Table, VAlign};
use crate::style::{
    ACCENT, ASCENDER_RATIO, BORDER, CELL_PADDING, FONT_SIZE_HEADING, GRID_LINE_WIDTH, MARGIN_BOTTOM,
    MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP, MIN_ROW_HEIGHT, PAGE_HEIGHT, PAGE_WIDTH, ROW_TINT,
    Rgb, SECTION_HEADROOM, SECTION_SPACING, TEXT_PRIMARY, WHITE, line_height,
};

use super::layout::{draw_aligned, draw_rule, set_fill, wrap_text};

/// Page flow engine. Owns the per-document layout cursor and the content
/// stream of every page produced so far; rows are placed atomically; a row
/// that would cross the bottom margin starts a new page instead.
pub(super) struct Flow {
    contents: Vec<Content>,
    current: Content,
    cursor: Cursor,
}

struct CellLayout {
    x: f32,
    width: f32,
    lines: Vec<String>,
    font_size: f32,
    bold: bool,
    align: Align,
    valign: VAlign,
    fill: Option<Rgb>,
    color: Rgb,
}

struct RowLayout {
    height: f32,
    banner: bool,
    cells: Vec<CellLayout>,
}

fn compute_row_layout(
    row: &Row,
    row_index: usize,
    col_widths: &[f32],
    fonts: &FontSet,
) -> Result<RowLayout, LayoutError> {
    let mut grid_col = 0usize;
    let mut max_h: f32 = 0.0;
    let mut banner = false;
    let mut cells = Vec::with_capacity(row.cells.len());

    for cell in &row.cells {
        let span = cell.span().max(1);
        let start = grid_col.min(col_widths.len());
        let end = (grid_col + span).min(col_widths.len());
        let x = MARGIN_LEFT + col_widths[..start].iter().sum::<f32>();
        let width: f32 = col_widths[start..end].iter().sum();
        grid_col += span;

        let layout = match cell {
            Cell::Header(h) => {
                banner = true;
                CellLayout {
                    x,
                    width,
                    lines: wrap_text(
                        &h.text,
                        fonts.get(true),
                        FONT_SIZE_HEADING,
                        width - 2.0 * CELL_PADDING,
                    ),
                    font_size: FONT_SIZE_HEADING,
                    bold: true,
                    align: Align::Left,
                    valign: VAlign::Middle,
                    fill: Some(ACCENT),
                    color: WHITE,
                }
            }
            Cell::Text(t) => CellLayout {
                x,
                width,
                lines: wrap_text(
                    &t.text,
                    fonts.get(t.style.bold),
                    t.style.font_size,
                    width - 2.0 * CELL_PADDING,
                ),
                font_size: t.style.font_size,
                bold: t.style.bold,
                align: t.style.align,
                valign: t.style.valign,
                fill: t.style.fill,
                color: t.style.color.unwrap_or(TEXT_PRIMARY),
            },
        };

        let cell_h = 2.0 * CELL_PADDING + layout.lines.len() as f32 * line_height(layout.font_size);
        max_h = max_h.max(cell_h);
        cells.push(layout);
    }

    if grid_col != col_widths.len() {
        return Err(LayoutError::SpanMismatch {
            row: row_index,
            expected: col_widths.len(),
            got: grid_col,
        });
    }

    Ok(RowLayout {
        height: max_h.max(MIN_ROW_HEIGHT),
        banner,
        cells,
    })
}

impl Flow {
    pub(super) fn new() -> Self {
        Self {
            contents: Vec::new(),
            current: Content::new(),
            cursor: Cursor {
                y: PAGE_HEIGHT - MARGIN_TOP,
                page: 0,
            },
        }
    }

    pub(super) fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub(super) fn set_y(&mut self, y: f32) {
        self.cursor.y = y;
    }

    pub(super) fn content(&mut self) -> &mut Content {
        &mut self.current
    }

    pub(super) fn at_page_top(&self) -> bool {
        (self.cursor.y - (PAGE_HEIGHT - MARGIN_TOP)).abs() < 1.0
    }

    pub(super) fn remaining(&self) -> f32 {
        self.cursor.y - MARGIN_BOTTOM
    }

    pub(super) fn page_break(&mut self) {
        self.contents
            .push(std::mem::replace(&mut self.current, Content::new()));
        self.cursor.y = PAGE_HEIGHT - MARGIN_TOP;
        self.cursor.page += 1;
    }

    /// Start a new page when a section would open in less room than the
    /// section headroom threshold.
    pub(super) fn ensure_section_room(&mut self) {
        if !self.at_page_top() && self.remaining() < SECTION_HEADROOM {
            self.page_break();
        }
    }

    /// Draw a table at the cursor, breaking pages between rows as needed.
    /// Leaves the cursor just below the table plus the inter-section
    /// spacing. An empty table is a no-op.
    pub(super) fn render_table(
        &mut self,
        table: &Table,
        fonts: &FontSet,
    ) -> Result<(), LayoutError> {
        if table.rows.is_empty() {
            return Ok(());
        }
        if !self.cursor.y.is_finite() {
            return Err(LayoutError::InvalidCursor { y: self.cursor.y });
        }

        let layouts = table
            .rows
            .iter()
            .enumerate()
            .map(|(ri, row)| compute_row_layout(row, ri, &table.col_widths, fonts))
            .collect::<Result<Vec<_>, _>>()?;

        let mut body_idx = 0usize;
        for (ri, layout) in layouts.iter().enumerate() {
            log::debug!(
                "table row={} h={:.2} y={:.2} page={}",
                ri,
                layout.height,
                self.cursor.y,
                self.cursor.page
            );

            if !self.at_page_top() && self.cursor.y - layout.height < MARGIN_BOTTOM {
                self.page_break();
            }

            let row_top = self.cursor.y;
            let row_bottom = row_top - layout.height;

            let tint = if layout.banner {
                None
            } else {
                let t = (body_idx % 2 == 1).then_some(ROW_TINT);
                body_idx += 1;
                t
            };

            // Fills first so a filled cell can never cover a neighbor's text
            for cell in &layout.cells {
                if let Some(fill) = cell.fill.or(tint) {
                    self.current.save_state();
                    set_fill(&mut self.current, fill);
                    self.current.rect(cell.x, row_bottom, cell.width, layout.height);
                    self.current.fill_nonzero();
                    self.current.restore_state();
                }
            }

            for cell in &layout.cells {
                if cell.lines.is_empty() {
                    continue;
                }

                let font = fonts.get(cell.bold);
                let line_h = line_height(cell.font_size);
                let content_h = cell.lines.len() as f32 * line_h;
                let first_baseline = match cell.valign {
                    VAlign::Top => row_top - CELL_PADDING - cell.font_size * ASCENDER_RATIO,
                    VAlign::Middle => {
                        let avail = layout.height - 2.0 * CELL_PADDING;
                        let offset = ((avail - content_h) / 2.0).max(0.0);
                        row_top - CELL_PADDING - offset - cell.font_size * ASCENDER_RATIO
                    }
                };

                set_fill(&mut self.current, cell.color);
                for (i, line) in cell.lines.iter().enumerate() {
                    draw_aligned(
                        &mut self.current,
                        font,
                        cell.font_size,
                        cell.align,
                        cell.x + CELL_PADDING,
                        cell.width - 2.0 * CELL_PADDING,
                        first_baseline - i as f32 * line_h,
                        line,
                    );
                }
            }

            // Grid borders drawn last so fills never cover them
            for cell in &layout.cells {
                self.current.save_state();
                self.current.set_line_width(GRID_LINE_WIDTH);
                super::layout::set_stroke(&mut self.current, BORDER);
                self.current.rect(cell.x, row_bottom, cell.width, layout.height);
                self.current.stroke();
                self.current.restore_state();
            }

            self.cursor.y = row_bottom;
        }

        self.cursor.y -= SECTION_SPACING;
        Ok(())
    }

    /// Horizontal rule across the usable width, drawn only when `y` falls
    /// inside the printable vertical range.
    pub(super) fn separator_line(&mut self, y: f32) {
        if y < MARGIN_BOTTOM || y > PAGE_HEIGHT - MARGIN_TOP {
            return;
        }
        draw_rule(
            &mut self.current,
            BORDER,
            GRID_LINE_WIDTH,
            MARGIN_LEFT,
            PAGE_WIDTH - MARGIN_RIGHT,
            y,
        );
    }

    pub(super) fn finish(mut self) -> Vec<Content> {
        self.contents.push(self.current);
        self.contents
    }
}
