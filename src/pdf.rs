use crate::canvas::{Canvas, RecordingCanvas, StrokePath};
use crate::content::render_commands;
use crate::error::LayoutError;
use crate::info::Info;
use crate::page::PageSupplier;
use crate::rect::Rect;
use crate::refs::{ObjectReferences, RefType};
use crate::units::*;
use pdf_writer::{Finish, Pdf, Ref};
use std::io::Write;

/// A canvas that collects everything drawn on it and then writes it out as a PDF
/// file with [PdfCanvas::write]
#[derive(Debug, Default)]
pub struct PdfCanvas {
    recording: RecordingCanvas,
    info: Option<Info>,
}

impl PdfCanvas {
    pub fn new() -> PdfCanvas {
        PdfCanvas::default()
    }

    /// Sets information about the document. If not provided, no information block
    /// will be written to the PDF
    pub fn set_info(&mut self, info: Info) {
        self.info = Some(info);
    }

    /// Everything drawn so far
    pub fn recording(&self) -> &RecordingCanvas {
        &self.recording
    }

    /// Write one PDF page per generated document page. Note: the whole file is
    /// assembled in memory before being written to `w`.
    pub fn write<W: Write>(self, pages: &PageSupplier, mut w: W) -> Result<(), LayoutError> {
        let PdfCanvas { recording, info } = self;

        let mut refs = ObjectReferences::new();
        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        if let Some(info) = info {
            info.write(&mut refs, &mut writer);
        }

        let page_refs: Vec<Ref> = pages
            .iter()
            .map(|page| refs.gen(RefType::Page(page.index())))
            .collect();
        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs.iter().copied());

        for (page, page_id) in pages.iter().zip(page_refs) {
            let content_id = refs.gen(RefType::ContentForPage(page.index()));
            let paper = page.paper();

            let mut pdf_page = writer.page(page_id);
            pdf_page.media_box(Rect::from_xywh(Pt::ZERO, Pt::ZERO, paper.width, paper.height).into());
            pdf_page.parent(page_tree_id);
            pdf_page.contents(content_id);
            pdf_page.finish();

            let rendered = render_commands(recording.commands(page.index()), page);
            writer.stream(content_id, rendered.as_slice());
        }

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        catalog.finish();

        tracing::debug!(pages = pages.len(), commands = recording.len(), "writing pdf");
        w.write_all(writer.finish().as_slice()).map_err(Into::into)
    }
}

impl Canvas for PdfCanvas {
    fn stroke_path(&mut self, page_index: usize, path: StrokePath) {
        self.recording.stroke_path(page_index, path);
    }
}
