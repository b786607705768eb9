use pageflow::{
    colours, Breakable, Canvas, Document, DocumentOptions, DocumentPosition, DrawCommand, Flowable, Info,
    LayoutError, Margins, Paper, Path, PdfCanvas, Pen, Point, RecordingCanvas, Rect, StrokePath, Pt, ORIGIN,
};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn short_page_document() -> Document {
    let paper = Paper::new((Pt(200.0), Pt(65.0)), Margins::all(Pt(10.0)));
    Document::new(DocumentOptions {
        paper,
        page_gap: Pt(50.0),
    })
}

fn strip(length: f32) -> Flowable {
    Flowable::new(Pt(length), Pt(100.0), Pt(20.0)).with_line_gap(Pt(5.0))
}

fn strokes(canvas: &RecordingCanvas, page: usize) -> Vec<StrokePath> {
    canvas
        .commands(page)
        .iter()
        .map(|DrawCommand::Stroke(stroke)| stroke.clone())
        .collect()
}

#[test]
fn straddling_path_is_clipped_at_the_break() {
    let mut doc = short_page_document();
    let flow = doc.add_flowable(ORIGIN, None, strip(250.0)).unwrap();
    let pen = Pen::new(colours::BLACK, Pt(2.0));
    let line = Path::straight_line((Pt(0.0), Pt(0.0)), (Pt(40.0), Pt(0.0)), pen).breakable();
    doc.add_drawable((Pt(80.0), Pt(0.0)), Some(flow), line).unwrap();

    let mut canvas = RecordingCanvas::new();
    doc.render(&mut canvas).unwrap();

    let drawn = strokes(&canvas, 0);
    assert_eq!(drawn.len(), 2);

    // the first piece stops exactly at the end of line 0
    assert_eq!(drawn[0].clip, Rect::from_xywh(Pt(89.0), Pt(9.0), Pt(21.0), Pt(2.0)));
    assert_eq!(drawn[0].clip.x2, Pt(110.0));

    // the second piece picks up 20pt into the path at the start of line 1
    assert_eq!(drawn[1].clip, Rect::from_xywh(Pt(10.0), Pt(34.0), Pt(21.0), Pt(2.0)));
    assert_eq!(
        drawn[1].elements[0],
        pageflow::PathElement::MoveTo(Point::new(Pt(-10.0), Pt(35.0)))
    );
}

#[test]
fn render_generates_every_page_the_flowable_reaches() {
    let mut doc = short_page_document();
    let flow = doc.add_flowable(ORIGIN, None, strip(1000.0)).unwrap();
    let line = Path::straight_line((Pt(0.0), Pt(0.0)), (Pt(10.0), Pt(0.0)), Pen::default());
    doc.add_drawable((Pt(950.0), Pt(0.0)), Some(flow), line).unwrap();
    assert_eq!(doc.page_count(), 1);

    let mut canvas = RecordingCanvas::new();
    doc.render(&mut canvas).unwrap();
    assert_eq!(doc.page_count(), 5);
    assert_eq!(canvas.pages().map(|(i, _)| i).collect::<Vec<_>>(), vec![4]);
}

#[test]
fn overlay_content_is_drawn_on_every_page() {
    let mut doc = short_page_document();
    doc.set_page_overlay(|page, scene| {
        let rule = Path::straight_line((Pt(0.0), Pt(-5.0)), (page.paper().live_width(), Pt(-5.0)), Pen::default());
        scene.add_drawable(ORIGIN, page.object(), rule).unwrap();
    });
    doc.add_flowable(ORIGIN, None, strip(500.0)).unwrap();

    let mut canvas = RecordingCanvas::new();
    doc.render(&mut canvas).unwrap();
    assert_eq!(doc.page_count(), 3);
    for page in 0..3 {
        assert_eq!(strokes(&canvas, page).len(), 1, "page {page}");
    }
}

#[test]
fn overlays_that_keep_pushing_content_forward_are_an_error() {
    let mut doc = short_page_document();
    let flow = doc.add_flowable(ORIGIN, None, strip(500.0)).unwrap();
    doc.set_page_overlay(move |page, scene| {
        scene.set_parent(flow, page.object()).unwrap();
    });

    let mut canvas = RecordingCanvas::new();
    let result = doc.render(&mut canvas);
    assert!(matches!(result, Err(LayoutError::Configuration(_))));
    assert!(doc.page_count() > 3);
    assert!(canvas.is_empty());
}

#[derive(Clone, Default)]
struct Log(Rc<RefCell<Vec<&'static str>>>);

struct Failing(Log);

impl Breakable for Failing {
    fn prepare(&mut self) {
        self.0 .0.borrow_mut().push("prepare");
    }

    fn finish(&mut self) {
        self.0 .0.borrow_mut().push("finish");
    }

    fn render_complete(&self, _: DocumentPosition, _: &mut dyn Canvas) -> Result<(), LayoutError> {
        self.0 .0.borrow_mut().push("render");
        Err(LayoutError::Configuration("cannot draw".to_string()))
    }
}

#[test]
fn drawables_are_finished_even_when_drawing_fails() {
    let mut doc = short_page_document();
    let log = Log::default();
    doc.add_drawable(ORIGIN, None, Failing(log.clone())).unwrap();

    let mut canvas = RecordingCanvas::new();
    let result = doc.render(&mut canvas);
    assert!(matches!(result, Err(LayoutError::Configuration(_))));
    assert_eq!(*log.0.borrow(), vec!["prepare", "render", "finish"]);
}

#[test]
fn writes_a_pdf_with_one_page_per_document_page() {
    let mut doc = short_page_document();
    let flow = doc.add_flowable(ORIGIN, None, strip(500.0)).unwrap();
    let line = Path::straight_line((Pt(0.0), Pt(0.0)), (Pt(300.0), Pt(0.0)), Pen::default()).breakable();
    doc.add_drawable((Pt(50.0), Pt(0.0)), Some(flow), line).unwrap();

    let mut canvas = PdfCanvas::new();
    let mut info = Info::new();
    info.title("Pagination");
    canvas.set_info(info);
    doc.render(&mut canvas).unwrap();
    assert_eq!(canvas.recording().len(), 4);

    let mut out = Vec::new();
    canvas.write(doc.pages(), &mut out).unwrap();
    assert!(out.starts_with(b"%PDF-"));
    let text = String::from_utf8_lossy(&out);
    assert!(text.contains("/Count 3"));
}
