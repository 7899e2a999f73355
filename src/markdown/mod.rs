mod walk;

use std::io::{Read, Seek, Write};

use crate::error::{Error, Warning};
use crate::model::{
    BulletKind, ConversionReport, ConvertOptions, ElementKind, ImageFormat, LinkStyle,
    StyleWrapper,
};
use crate::sink::ImageSink;
use crate::snb::{
    Container, REL_NS, RelationshipMap, StyleCatalog, attr, descendants_named, has_descendant,
};
use crate::zdib::decode_zdib;

use walk::ElementWalk;

/// Style span bookkeeping for one traversal. At most one span is open, and
/// only between the start and end of a single run.
#[derive(Debug, Default)]
struct EmissionState {
    open: Option<StyleWrapper>,
    opened: usize,
    closed: usize,
}

/// Per-document conversion context: lookup tables, options and the
/// container the image resources are read from.
pub(crate) struct Emitter<'c, R> {
    doc_name: &'c str,
    styles: &'c StyleCatalog,
    rels: &'c RelationshipMap,
    options: &'c ConvertOptions,
    container: &'c mut Container<R>,
    state: EmissionState,
    report: ConversionReport,
}

impl<'c, R: Read + Seek> Emitter<'c, R> {
    pub(crate) fn new(
        doc_name: &'c str,
        styles: &'c StyleCatalog,
        rels: &'c RelationshipMap,
        options: &'c ConvertOptions,
        container: &'c mut Container<R>,
    ) -> Self {
        Emitter {
            doc_name,
            styles,
            rels,
            options,
            container,
            state: EmissionState::default(),
            report: ConversionReport::default(),
        }
    }

    pub(crate) fn emit_document<W: Write, S: ImageSink>(
        mut self,
        root: roxmltree::Node,
        out: &mut W,
        images: &mut S,
    ) -> Result<ConversionReport, Error> {
        self.walk(root, out, images)?;
        Ok(self.report)
    }

    fn walk<W: Write, S: ImageSink>(
        &mut self,
        root: roxmltree::Node,
        out: &mut W,
        images: &mut S,
    ) -> Result<(), Error> {
        for node in ElementWalk::new(root) {
            match ElementKind::classify(node) {
                ElementKind::ImageData => self.emit_image(node, out, images)?,
                ElementKind::Line => self.emit_line(node, out)?,
                ElementKind::Inert => {}
            }
        }
        debug_assert!(self.state.open.is_none());
        debug_assert_eq!(self.state.opened, self.state.closed);
        Ok(())
    }

    fn emit_image<W: Write, S: ImageSink>(
        &mut self,
        node: roxmltree::Node,
        out: &mut W,
        images: &mut S,
    ) -> Result<(), Error> {
        let rel_id = node
            .attribute((REL_NS, "id"))
            .or_else(|| attr(node, "id"))
            .unwrap_or_default();
        let target = self.rels.resolve(rel_id)?;

        let is_background = node
            .parent()
            .and_then(|n| n.parent())
            .and_then(|n| n.parent())
            .and_then(|n| attr(n, "insertimagetype"))
            == Some("1");
        if is_background && !self.options.include_backgrounds {
            log::debug!("Skipping background image {target}");
            return Ok(());
        }

        let resource = target.rsplit_once('/').map_or(target, |(_, file)| file);
        let mut name = sanitize_file_name(&format!("{}-{}", self.doc_name, resource));
        let mut data = self.container.read_part(target)?;

        if ImageFormat::from_name(&name) == ImageFormat::NativeCompressedBitmap {
            match decode_zdib(&data) {
                Ok(decoded) => {
                    data = decoded.png;
                    name = with_png_extension(&name);
                }
                Err(reason) => {
                    log::warn!("{}: skipping image {}: {}", self.doc_name, name, reason);
                    self.report
                        .warnings
                        .push(Warning::SkippedImage { name, reason });
                    return Ok(());
                }
            }
        }

        images.store(&name, &data)?;
        match self.options.link_style {
            LinkStyle::WikiLink => write!(out, "\n![[{name}]]\n\n")?,
            LinkStyle::Markdown => {
                write!(out, "\n![{}]({})\n\n", name, images.link_target(&name))?
            }
        }
        log::debug!("Extracted image {name} ({} bytes)", data.len());
        self.report.images.push(name);
        Ok(())
    }

    fn emit_line<W: Write>(&mut self, line: roxmltree::Node, out: &mut W) -> Result<(), Error> {
        for run in descendants_named(line, "r") {
            if has_descendant(run, "t")
                && let Some(wrapper) = self.run_wrapper(run)
            {
                self.open_span(wrapper, out)?;
            }

            for bullet in descendants_named(run, "bulletText") {
                if let Some(kind) = BulletKind::from_text(bullet.text().unwrap_or_default()) {
                    out.write_all(kind.prefix().as_bytes())?;
                }
            }

            for text_node in descendants_named(run, "t") {
                for text in text_node
                    .children()
                    .filter(|c| c.is_text())
                    .filter_map(|c| c.text())
                {
                    out.write_all(text.as_bytes())?;
                }
            }

            self.close_span(out)?;

            if has_descendant(run, "paraend") || has_descendant(run, "br") {
                out.write_all(b"\n")?;
            }
        }
        out.write_all(b"\n")?;
        Ok(())
    }

    fn run_wrapper(&mut self, run: roxmltree::Node) -> Option<StyleWrapper> {
        let style_id = attr(run, "rStyle")?;
        match self.styles.for_run(style_id) {
            Some(style) => StyleWrapper::for_style(style),
            None => {
                let warning = Warning::UnknownStyle {
                    style_id: style_id.to_string(),
                };
                if !self.report.warnings.contains(&warning) {
                    log::warn!("{}: {}", self.doc_name, warning);
                    self.report.warnings.push(warning);
                }
                None
            }
        }
    }

    fn open_span<W: Write>(&mut self, wrapper: StyleWrapper, out: &mut W) -> Result<(), Error> {
        debug_assert!(self.state.open.is_none());
        out.write_all(wrapper.marker().as_bytes())?;
        self.state.open = Some(wrapper);
        self.state.opened += 1;
        Ok(())
    }

    fn close_span<W: Write>(&mut self, out: &mut W) -> Result<(), Error> {
        if let Some(wrapper) = self.state.open.take() {
            out.write_all(wrapper.marker().as_bytes())?;
            self.state.closed += 1;
        }
        Ok(())
    }
}

/// Transliterate to ASCII and replace anything outside `[A-Za-z0-9_.-]`
/// with `-`, so the name is safe on every filesystem.
pub(crate) fn sanitize_file_name(name: &str) -> String {
    deunicode::deunicode(name)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn with_png_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) => format!("{stem}.png"),
        None => format!("{name}.png"),
    }
}
