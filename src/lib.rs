pub mod batch;
mod error;
mod markdown;
mod model;
mod sink;
mod snb;
pub mod zdib;

pub use error::{BitmapError, Error, Warning};
pub use model::{ConversionReport, ConvertOptions, LinkStyle, StyleRecord};
pub use sink::{DirImageSink, ImageSink};

use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use std::time::Instant;

use markdown::Emitter;
use snb::{BODY_PART, Container, RELS_PART, STYLES_PART};

const SOURCE_FORMAT: &str = "S-Note";

/// Convert one `.snb` container read from `reader`, writing Markdown to `out`
/// and extracted images to `images`. `doc_name` titles the document and
/// prefixes every image file name.
pub fn convert_reader<R, W, S>(
    reader: R,
    doc_name: &str,
    options: &ConvertOptions,
    out: &mut W,
    images: &mut S,
) -> Result<ConversionReport, Error>
where
    R: Read + Seek,
    W: Write,
    S: ImageSink,
{
    let mut container = Container::open(reader)?;

    // Both tables must be complete before the body is walked.
    let styles = snb::parse_styles(&container.read_part_text(STYLES_PART)?)?;
    let rels = snb::parse_relationships(&container.read_part_text(RELS_PART)?)?;
    log::debug!(
        "{doc_name}: {} character styles, {} relationships",
        styles.len(),
        rels.len()
    );

    let body = container.read_part_text(BODY_PART)?;
    snb::check_nesting(BODY_PART, &body)?;
    let xml = roxmltree::Document::parse(&body)?;

    write!(out, "\n## {doc_name} - exported from {SOURCE_FORMAT} \n\n")?;
    Emitter::new(doc_name, &styles, &rels, options, &mut container).emit_document(
        xml.root_element(),
        out,
        images,
    )
}

pub fn convert_snb_to_markdown(
    input: &Path,
    output: &Path,
    image_dir: &Path,
    options: &ConvertOptions,
) -> Result<ConversionReport, Error> {
    let file = std::fs::File::open(input).map_err(|e| io_error_at(e, input))?;
    let doc_name = document_name(input);
    convert_to_file(
        std::io::BufReader::new(file),
        &doc_name,
        output,
        image_dir,
        options,
    )
}

pub fn convert_snb_bytes_to_markdown(
    input: &[u8],
    doc_name: &str,
    output: &Path,
    image_dir: &Path,
    options: &ConvertOptions,
) -> Result<ConversionReport, Error> {
    convert_to_file(Cursor::new(input), doc_name, output, image_dir, options)
}

/// File stem of `input`, used for the title and for image names.
pub fn document_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "note".to_string())
}

fn convert_to_file<R: Read + Seek>(
    reader: R,
    doc_name: &str,
    output: &Path,
    image_dir: &Path,
    options: &ConvertOptions,
) -> Result<ConversionReport, Error> {
    let t0 = Instant::now();

    let mut images = DirImageSink::for_markdown(output, image_dir);
    let mut markdown = Vec::new();
    let report = convert_reader(reader, doc_name, options, &mut markdown, &mut images)?;
    let t_convert = t0.elapsed();

    std::fs::write(output, &markdown).map_err(|e| io_error_at(e, output))?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: convert={:.1}ms, write={:.1}ms, total={:.1}ms ({} bytes, {} images, {} warnings)",
        t_convert.as_secs_f64() * 1000.0,
        (t_total - t_convert).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        markdown.len(),
        report.images.len(),
        report.warnings.len(),
    );

    Ok(report)
}

fn io_error_at(e: std::io::Error, path: &Path) -> Error {
    Error::Io(std::io::Error::new(
        e.kind(),
        format!("{}: {}", e, path.display()),
    ))
}
