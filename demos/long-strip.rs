use pageflow::colours;
use pageflow::paper::{sizes, PageOrientation};
use pageflow::{Document, DocumentOptions, Flowable, Info, Margins, Paper, Path, PdfCanvas, Pen};
use pageflow::{Mm, Pt, ORIGIN};

fn main() {
    let paper = Paper::new(sizes::A5.landscape(), Margins::all(Mm(15.0))).with_gutter(Mm(5.0).into());
    let mut doc = Document::new(DocumentOptions {
        paper,
        ..Default::default()
    });

    // a running rule above the live area of every page
    doc.set_page_overlay(|page, scene| {
        let width = page.paper().live_width();
        let rule = Path::straight_line((Pt(0.0), Pt(-8.0)), (width, Pt(-8.0)), Pen::new(colours::GREY, Pt(0.5)));
        scene
            .add_drawable(ORIGIN, page.object(), rule)
            .expect("pages accept children");
    });

    let line_length = paper.live_width();
    let flowable = Flowable::new(line_length * 12.0, line_length, Mm(12.0).into());
    let strip = doc
        .add_flowable(ORIGIN, None, flowable)
        .expect("valid flowable");

    // a zig-zag that runs the whole length of the strip
    let mut zig_zag = Path::new(Pen::new(colours::BLUE, Pt(1.5))).move_to((Pt(0.0), Pt(0.0)));
    let mut x = Pt(0.0);
    while x < line_length * 12.0 {
        x += Pt(20.0);
        let y = if (*x / 20.0) as i32 % 2 == 0 { Pt(0.0) } else { Mm(10.0).into() };
        zig_zag = zig_zag.line_to((x, y));
    }
    doc.add_drawable(ORIGIN, Some(strip), zig_zag.breakable())
        .expect("can add drawable");

    // markers that straddle line breaks
    for i in 1..12 {
        let marker = Path::straight_line(
            (Pt(0.0), Pt(0.0)),
            (Pt(60.0), Pt::from(Mm(10.0))),
            Pen::new(colours::RED, Pt(3.0)),
        )
        .breakable();
        doc.add_drawable((line_length * i as f32 - Pt(30.0), Pt(0.0)), Some(strip), marker)
            .expect("can add drawable");
    }

    let mut canvas = PdfCanvas::new();
    let mut info = Info::new();
    info.title("Long strip").author("pageflow");
    canvas.set_info(info);

    doc.render(&mut canvas).expect("can render document");
    let out = std::fs::File::create("long-strip.pdf").expect("can create long-strip.pdf");
    canvas
        .write(doc.pages(), out)
        .expect("can write long-strip.pdf");
}
