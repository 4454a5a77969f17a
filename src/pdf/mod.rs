mod flow;
mod layout;

use chrono::Datelike;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref};

use crate::error::{Error, FailureKind, RecordFailure};
use crate::fonts::{FontSet, register_fonts};
use crate::model::{Align, NotesSource, ReportOptions, ReportRecord, ReportScope};
use crate::style::{
    BORDER, FONT_SIZE_BODY, FONT_SIZE_SMALL, FONT_SIZE_SUBHEADING, FONT_SIZE_TITLE, HEADER_SPACING,
    LOGO_SIZE, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT, MARGIN_TOP, PAGE_HEIGHT, PAGE_WIDTH,
    RULE_LINE_WIDTH, SECTION_SPACING, TEXT_FOOTER, TEXT_PRIMARY, TEXT_SECONDARY, USABLE_WIDTH,
};
use crate::{tables, validate};

use flow::Flow;
use layout::{draw_aligned, draw_line, draw_rule, set_fill};

const COPYRIGHT_HOLDER: &str = "IMD-Care";
const DISCLAIMER: &str = "This is a computer-generated document.";

/// The finished artifact plus everything the caller needs to report
/// partial failures.
#[derive(Debug)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Records whose section made it into the document.
    pub rendered: usize,
    /// Non-fatal per-record problems, in input order.
    pub failures: Vec<RecordFailure>,
}

fn scope_subtitle(scope: &ReportScope) -> String {
    match scope {
        ReportScope::Specialty(name) => format!("Specialty: {name}"),
        ReportScope::DateRange { start, end } => format!(
            "Period: {} to {}",
            start.format("%d/%m/%Y"),
            end.format("%d/%m/%Y")
        ),
    }
}

/// Embed a PNG logo as an image XObject, with an SMask when the image has
/// transparency. Returns `None` (and logs) on decode failure; the header
/// then falls back to the centered title.
fn embed_logo(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
    data: &[u8],
) -> Option<(String, Ref)> {
    let cursor = std::io::Cursor::new(data);
    let reader =
        image::ImageReader::with_format(std::io::BufReader::new(cursor), image::ImageFormat::Png);
    let decoded = match reader.decode() {
        Ok(img) => img,
        Err(err) => {
            log::warn!("logo decode failed: {err}; header falls back to centered title");
            return None;
        }
    };

    let rgba: image::RgbaImage = decoded.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect();
    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let smask_ref = if has_alpha {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(w as i32);
        mask.height(h as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_ref)
    } else {
        None
    };

    let xobj_ref = alloc();
    {
        let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
        xobj.filter(Filter::FlateDecode);
        xobj.width(w as i32);
        xobj.height(h as i32);
        xobj.color_space().device_rgb();
        xobj.bits_per_component(8);
        if let Some(mask_ref) = smask_ref {
            xobj.s_mask(mask_ref);
        }
    }

    Some(("Im1".to_string(), xobj_ref))
}

/// Title header on the first page: logo + title (or centered title),
/// optional scope subtitle, generation timestamp, separator rule.
fn draw_title_header(
    flow: &mut Flow,
    fonts: &FontSet,
    options: &ReportOptions,
    logo: Option<&str>,
) {
    // Header layout is computed top-down, then converted to PDF coordinates.
    let mut y_down = MARGIN_TOP;

    match logo {
        Some(name) => {
            let logo_bottom = PAGE_HEIGHT - (y_down + LOGO_SIZE);
            let content = flow.content();
            content.save_state();
            content.transform([LOGO_SIZE, 0.0, 0.0, LOGO_SIZE, MARGIN_LEFT, logo_bottom]);
            content.x_object(Name(name.as_bytes()));
            content.restore_state();

            set_fill(content, TEXT_PRIMARY);
            draw_line(
                content,
                fonts.get(true),
                FONT_SIZE_TITLE,
                MARGIN_LEFT + LOGO_SIZE + HEADER_SPACING,
                PAGE_HEIGHT - (y_down + LOGO_SIZE / 2.0),
                &options.title,
            );
            y_down += LOGO_SIZE + HEADER_SPACING;
        }
        None => {
            let content = flow.content();
            set_fill(content, TEXT_PRIMARY);
            draw_aligned(
                content,
                fonts.get(true),
                FONT_SIZE_TITLE,
                Align::Center,
                MARGIN_LEFT,
                USABLE_WIDTH,
                PAGE_HEIGHT - y_down,
                &options.title,
            );
            y_down += HEADER_SPACING;
        }
    }

    if let Some(scope) = &options.scope {
        let subtitle = scope_subtitle(scope);
        let content = flow.content();
        set_fill(content, TEXT_SECONDARY);
        draw_aligned(
            content,
            fonts.get(false),
            FONT_SIZE_SUBHEADING,
            Align::Center,
            MARGIN_LEFT,
            USABLE_WIDTH,
            PAGE_HEIGHT - y_down,
            &subtitle,
        );
        y_down += HEADER_SPACING;
    }

    let generated = format!(
        "Generated on: {}",
        options.generated_at.format("%d/%m/%Y %H:%M")
    );
    let content = flow.content();
    set_fill(content, TEXT_SECONDARY);
    draw_aligned(
        content,
        fonts.get(false),
        FONT_SIZE_BODY,
        Align::Center,
        MARGIN_LEFT,
        USABLE_WIDTH,
        PAGE_HEIGHT - y_down,
        &generated,
    );
    y_down += HEADER_SPACING;

    draw_rule(
        content,
        BORDER,
        RULE_LINE_WIDTH,
        MARGIN_LEFT,
        PAGE_WIDTH - MARGIN_RIGHT,
        PAGE_HEIGHT - y_down,
    );
    y_down += SECTION_SPACING;

    flow.set_y(PAGE_HEIGHT - y_down);
}

/// Footer pass: every page gets a rule, "Page X of Y", copyright and
/// disclaimer. Runs after all content pages exist; pages are only
/// annotated, never re-flowed.
fn stamp_footers(contents: &mut [Content], fonts: &FontSet, options: &ReportOptions) {
    let total = contents.len();
    let year = options.generated_at.year();
    let copyright = format!("\u{a9} {year} {COPYRIGHT_HOLDER}. All rights reserved.");

    for (idx, content) in contents.iter_mut().enumerate() {
        draw_rule(
            content,
            BORDER,
            RULE_LINE_WIDTH,
            MARGIN_LEFT,
            PAGE_WIDTH - MARGIN_RIGHT,
            MARGIN_BOTTOM + 10.0,
        );

        set_fill(content, TEXT_FOOTER);
        draw_aligned(
            content,
            fonts.get(false),
            FONT_SIZE_SMALL,
            Align::Center,
            MARGIN_LEFT,
            USABLE_WIDTH,
            MARGIN_BOTTOM,
            &format!("Page {} of {}", idx + 1, total),
        );
        draw_line(
            content,
            fonts.get(false),
            FONT_SIZE_SMALL,
            MARGIN_LEFT,
            MARGIN_BOTTOM,
            &copyright,
        );
        draw_aligned(
            content,
            fonts.get(false),
            FONT_SIZE_SMALL,
            Align::Right,
            MARGIN_LEFT,
            USABLE_WIDTH,
            MARGIN_BOTTOM,
            DISCLAIMER,
        );
    }
}

pub(crate) fn render(
    records: &[ReportRecord],
    source: &dyn NotesSource,
    options: &ReportOptions,
) -> Result<RenderedReport, Error> {
    let t0 = std::time::Instant::now();

    if records.is_empty() {
        return Err(Error::NoRecords);
    }

    let mut failures: Vec<RecordFailure> = Vec::new();
    let mut valid: Vec<&ReportRecord> = Vec::new();
    for record in records {
        let validation = validate::validate(record);
        if validation.valid {
            valid.push(record);
        } else {
            failures.push(RecordFailure {
                record_id: record.id,
                mrn: record.mrn.clone(),
                kind: FailureKind::Validation(validation.missing),
            });
        }
    }
    if valid.is_empty() {
        return Err(Error::NoValidRecords(failures));
    }

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    let fonts = register_fonts(&mut pdf, &mut alloc);
    let logo = options
        .logo_png
        .as_deref()
        .and_then(|data| embed_logo(&mut pdf, &mut alloc, data));

    let t_setup = t0.elapsed();

    let mut flow = Flow::new();
    draw_title_header(&mut flow, &fonts, options, logo.as_ref().map(|(n, _)| n.as_str()));

    if options.summary {
        let roster = tables::summary_table(&valid, options.generated_at);
        if let Err(err) = flow.render_table(&roster, &fonts) {
            log::warn!("summary roster skipped: {err}");
        }
    }

    let mut rendered = 0usize;
    for record in &valid {
        flow.ensure_section_room();

        let notes = match source.fetch_notes(record.id) {
            Ok(notes) => notes,
            Err(err) => {
                log::warn!("notes lookup failed for patient {}: {err}", record.mrn);
                failures.push(RecordFailure {
                    record_id: record.id,
                    mrn: record.mrn.clone(),
                    kind: FailureKind::Lookup(err),
                });
                Vec::new()
            }
        };

        let info = tables::patient_info_table(record);
        let notes_table = tables::notes_table(&notes);
        let drew_anything = !info.rows.is_empty() || !notes_table.rows.is_empty();

        let result = flow
            .render_table(&info, &fonts)
            .and_then(|_| flow.render_table(&notes_table, &fonts));

        match result {
            Ok(()) => {
                if drew_anything {
                    let y = flow.cursor().y + 3.0;
                    flow.separator_line(y);
                }
                rendered += 1;
            }
            Err(err) => {
                log::warn!("section failed for patient {}: {err}", record.mrn);
                failures.push(RecordFailure {
                    record_id: record.id,
                    mrn: record.mrn.clone(),
                    kind: FailureKind::Layout(err),
                });
            }
        }
    }

    if rendered == 0 {
        return Err(Error::NothingRendered(failures));
    }
    if !failures.is_empty() {
        log::warn!("{} of {} records not fully processed", failures.len(), records.len());
    }

    let mut contents = flow.finish();
    let t_layout = t0.elapsed();

    stamp_footers(&mut contents, &fonts, options);

    // Page and content stream IDs can only be allocated now that the page
    // count is known.
    let n = contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, content) in contents.into_iter().enumerate() {
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed)
            .filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut font_res = resources.fonts();
            font_res.pair(Name(fonts.regular.pdf_name.as_bytes()), fonts.regular.font_ref);
            font_res.pair(Name(fonts.bold.pdf_name.as_bytes()), fonts.bold.font_ref);
        }
        if let Some((name, xobj_ref)) = &logo {
            resources.x_objects().pair(Name(name.as_bytes()), *xobj_ref);
        }
    }

    let bytes = pdf.finish();
    let t_total = t0.elapsed();

    log::info!(
        "Render phases: setup={:.1}ms, layout={:.1}ms, assembly={:.1}ms ({} pages, {} bytes)",
        t_setup.as_secs_f64() * 1000.0,
        (t_layout - t_setup).as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        n,
        bytes.len(),
    );

    Ok(RenderedReport {
        bytes,
        page_count: n,
        rendered,
        failures,
    })
}
