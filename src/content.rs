//! Turning recorded canvas commands into PDF content streams.

use crate::canvas::{DrawCommand, PathElement, StrokePath};
use crate::page::Page;
use crate::transform::Transform;
use pdf_writer::Content;

/// Render the commands drawn on `page` into a content stream for that page
pub(crate) fn render_commands(commands: &[DrawCommand], page: &Page) -> Vec<u8> {
    if commands.is_empty() {
        return Vec::default();
    }

    let to_page = Transform::canvas_to_page(page.origin(), page.paper().height);
    let mut content = Content::new();
    for command in commands {
        match command {
            DrawCommand::Stroke(stroke) => write_stroke(&mut content, stroke, to_page),
        }
    }
    content.finish()
}

fn write_stroke(content: &mut Content, stroke: &StrokePath, to_page: Transform) {
    content.save_state();
    to_page.write_to_content(content);

    let clip = stroke.clip;
    content.rect(*clip.x1, *clip.y1, *clip.width(), *clip.height());
    content.clip_nonzero();
    content.end_path();

    stroke.pen.colour.write_stroke(content);
    content.set_line_width(*stroke.pen.thickness);
    for element in stroke.elements.iter() {
        match *element {
            PathElement::MoveTo(p) => {
                content.move_to(*p.x, *p.y);
            }
            PathElement::LineTo(p) => {
                content.line_to(*p.x, *p.y);
            }
            PathElement::CurveTo { c1, c2, end } => {
                content.cubic_to(*c1.x, *c1.y, *c2.x, *c2.y, *end.x, *end.y);
            }
        }
    }
    content.stroke();
    content.restore_state();
}
