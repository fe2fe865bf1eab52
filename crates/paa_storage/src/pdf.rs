use paa_core::{Error, Result};
use paa_sources::extract_page_text;
use printpdf::{BuiltinFont, Mm, PdfDocument};

// A4 portrait with a 10 mm margin.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const FONT_SIZE: f32 = 11.0;
const LINE_HEIGHT_MM: f32 = 5.0;
/// Helvetica at 11pt fits about this many average characters in 190 mm.
const MAX_LINE_CHARS: usize = 90;
const LAYER: &str = "Article";

fn pdf_error(err: printpdf::Error) -> Error {
    Error::Storage(format!("Failed to render PDF: {}", err))
}

/// Greedy word wrap. Each input line starts a new paragraph; a word longer
/// than `width` gets a line of its own.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let len = line.chars().count();
            if len > 0 && len + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

/// Renders the readable text of an article into a paginated A4 document.
pub fn render_pdf(title: &str, html: &str) -> Result<Vec<u8>> {
    let text = extract_page_text(html)?;

    let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let mut current = doc.get_page(page).get_layer(layer);
    let top = PAGE_HEIGHT_MM - MARGIN_MM;
    let mut y = top;

    for line in wrap_text(&text, MAX_LINE_CHARS) {
        if y - LINE_HEIGHT_MM < MARGIN_MM {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER);
            current = doc.get_page(page).get_layer(layer);
            y = top;
        }
        y -= LINE_HEIGHT_MM;
        current.use_text(line, FONT_SIZE, Mm(MARGIN_MM), Mm(y), &font);
    }

    doc.save_to_bytes().map_err(pdf_error)
}
