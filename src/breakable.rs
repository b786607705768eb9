//! Splitting objects that straddle flowable line breaks into render pieces.
//!
//! An object inside a flowable covers the flowable-space range `[x, x + length)`.
//! When no line boundary falls strictly inside that range the object is drawn in
//! one [PieceMode::Complete] piece. Otherwise it is drawn as a [PieceMode::Before]
//! piece on its own line, a [PieceMode::Spanning] piece for every line it covers
//! completely, and a final [PieceMode::After] piece.

use crate::canvas::Canvas;
use crate::clip::ClipWindow;
use crate::error::LayoutError;
use crate::flowable::{DocumentPosition, FlowLayout};
use crate::units::*;

/// The rendering capability of drawable scene objects.
///
/// Every render method defaults to drawing nothing, so objects only implement the
/// pieces they care about. An object with a zero [Breakable::breakable_length] is
/// always drawn with [Breakable::render_complete].
pub trait Breakable {
    /// The length over which the object may be split across lines
    fn breakable_length(&self) -> Pt {
        Pt::ZERO
    }

    /// Whether the object exposes a named capability, see
    /// [crate::scene::SceneObject::has_attribute]
    fn has_attribute(&self, _name: &str) -> bool {
        false
    }

    /// Called on every drawable before any piece of the render pass is drawn
    fn prepare(&mut self) {}

    /// Called on every drawable once the render pass is over, even if it failed
    fn finish(&mut self) {}

    /// Draw the whole object at `pos`
    fn render_complete(
        &self,
        _pos: DocumentPosition,
        _canvas: &mut dyn Canvas,
    ) -> Result<(), LayoutError> {
        Ok(())
    }

    /// Draw the first `width` of the object at `pos`, which is the object's own
    /// position
    fn render_before_break(
        &self,
        _pos: DocumentPosition,
        _width: Pt,
        _canvas: &mut dyn Canvas,
    ) -> Result<(), LayoutError> {
        Ok(())
    }

    /// Draw `width` of the object starting `consumed` into it, at the start of a line
    fn render_spanning_continuation(
        &self,
        _pos: DocumentPosition,
        _consumed: Pt,
        _width: Pt,
        _canvas: &mut dyn Canvas,
    ) -> Result<(), LayoutError> {
        Ok(())
    }

    /// Draw the rest of the object, starting `consumed` into it, at the start of
    /// a line
    fn render_after_break(
        &self,
        _pos: DocumentPosition,
        _consumed: Pt,
        _canvas: &mut dyn Canvas,
    ) -> Result<(), LayoutError> {
        Ok(())
    }
}

/// Which part of an object a [RenderPiece] draws
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceMode {
    Complete,
    Before,
    Spanning,
    After,
}

/// One drawing of (part of) an object
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderPiece {
    pub mode: PieceMode,
    /// The flowable line the piece is drawn on, if the object is in a flowable
    pub line_index: Option<usize>,
    pub position: DocumentPosition,
    /// How much of the object precedes this piece
    pub consumed: Pt,
    /// How much of the object this piece draws
    pub width: Pt,
    pub clip: ClipWindow,
}

impl RenderPiece {
    /// A single piece drawing the whole object
    pub fn complete(position: DocumentPosition, line_index: Option<usize>, length: Pt) -> RenderPiece {
        RenderPiece {
            mode: PieceMode::Complete,
            line_index,
            position,
            consumed: Pt::ZERO,
            width: length,
            clip: ClipWindow::FULL,
        }
    }
}

/// Plan the pieces of an object at flowable-space `offset` that can be broken over
/// `length`.
///
/// Pieces are returned left to right. Each one after the first is anchored at the
/// start of its line, carrying the object's vertical offset along. An object that
/// runs past the end of the flowable ends with an [PieceMode::After] piece on the
/// final line.
pub fn plan_pieces(layout: &FlowLayout, offset: Point, length: Pt) -> Vec<RenderPiece> {
    let position = layout.map_to_document(offset);
    let lines = layout.lines();
    let Some(first) = layout.line_at(offset.x) else {
        return vec![RenderPiece::complete(position, None, length)];
    };

    let first_width = first.end_x() - offset.x;
    let last_index = lines.len() - 1;
    if length <= first_width || first.index == last_index {
        return vec![RenderPiece::complete(position, Some(first.index), length)];
    }

    let mut pieces = vec![RenderPiece {
        mode: PieceMode::Before,
        line_index: Some(first.index),
        position,
        consumed: Pt::ZERO,
        width: first_width,
        clip: ClipWindow::before(first_width),
    }];
    let mut consumed = first_width;
    for line in &lines[first.index + 1..] {
        let remaining = length - consumed;
        let position = line.position().offset(Point {
            x: Pt::ZERO,
            y: offset.y,
        });
        if remaining > line.length && line.index != last_index {
            pieces.push(RenderPiece {
                mode: PieceMode::Spanning,
                line_index: Some(line.index),
                position,
                consumed,
                width: line.length,
                clip: ClipWindow::spanning(consumed, line.length),
            });
            consumed += line.length;
        } else {
            pieces.push(RenderPiece {
                mode: PieceMode::After,
                line_index: Some(line.index),
                position,
                consumed,
                width: remaining,
                clip: ClipWindow::after(consumed),
            });
            break;
        }
    }
    pieces
}

/// Draw one piece of `drawable` onto `canvas`
pub fn dispatch(
    piece: &RenderPiece,
    drawable: &dyn Breakable,
    canvas: &mut dyn Canvas,
) -> Result<(), LayoutError> {
    if piece.mode != PieceMode::Complete && piece.width <= Pt::ZERO {
        tracing::trace!(mode = ?piece.mode, line = ?piece.line_index, "skipping empty piece");
        return Ok(());
    }
    tracing::trace!(
        mode = ?piece.mode,
        page = piece.position.page_index,
        line = ?piece.line_index,
        consumed = *piece.consumed,
        width = *piece.width,
        "dispatching piece"
    );
    match piece.mode {
        PieceMode::Complete => drawable.render_complete(piece.position, canvas),
        PieceMode::Before => drawable.render_before_break(piece.position, piece.width, canvas),
        PieceMode::Spanning => drawable.render_spanning_continuation(
            piece.position,
            piece.consumed,
            piece.width,
            canvas,
        ),
        PieceMode::After => drawable.render_after_break(piece.position, piece.consumed, canvas),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::StrokePath;
    use crate::flowable::{FlowAnchor, Flowable};
    use crate::page::PageSupplier;
    use crate::paper::{Margins, Paper};
    use crate::units::Mm;
    use pretty_assertions::assert_eq;

    fn layout(length: f32) -> FlowLayout {
        let paper = Paper::new((Pt(200.0), Pt(65.0)), Margins::all(Pt(10.0)));
        let pages = PageSupplier::new(paper, Pt(50.0));
        let flowable = Flowable::new(Pt(length), Pt(100.0), Pt(20.0)).with_line_gap(Pt(5.0));
        let anchor = FlowAnchor {
            page_index: 0,
            offset: ORIGIN,
        };
        FlowLayout::compute(flowable, anchor, &pages).unwrap()
    }

    fn modes(pieces: &[RenderPiece]) -> Vec<PieceMode> {
        pieces.iter().map(|p| p.mode).collect()
    }

    #[test]
    fn object_starting_on_a_line_start_is_complete() {
        let paper = Paper::new((Pt(200.0), Pt(65.0)), Margins::all(Pt(10.0)));
        let pages = PageSupplier::new(paper, Pt(50.0));
        let anchor = FlowAnchor {
            page_index: 0,
            offset: ORIGIN,
        };
        for mm in [50.0, 35.0, 12.7, 0.1] {
            let line_length = Pt::from(Mm(mm));
            let flowable = Flowable::new(line_length * 40.0, line_length, Pt(20.0));
            let layout = FlowLayout::compute(flowable, anchor, &pages).unwrap();
            for line in layout.lines().iter().take(39) {
                let pieces = plan_pieces(&layout, Point::new(line.flowable_x, Pt::ZERO), Pt(*line_length / 2.0));
                assert_eq!(modes(&pieces), vec![PieceMode::Complete], "{mm}mm, line {}", line.index);
                assert_eq!(pieces[0].line_index, Some(line.index));
            }
        }
    }

    #[test]
    fn object_inside_one_line_is_complete() {
        let pieces = plan_pieces(&layout(250.0), Point::new(Pt(10.0), Pt(0.0)), Pt(90.0));
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].mode, PieceMode::Complete);
        assert_eq!(pieces[0].clip, ClipWindow::FULL);
        assert_eq!(pieces[0].line_index, Some(0));
    }

    #[test]
    fn one_break_gives_before_and_after() {
        let pieces = plan_pieces(&layout(250.0), Point::new(Pt(80.0), Pt(3.0)), Pt(40.0));
        assert_eq!(modes(&pieces), vec![PieceMode::Before, PieceMode::After]);

        let before = pieces[0];
        assert_eq!(before.line_index, Some(0));
        assert_eq!(before.width, Pt(20.0));
        assert_eq!(before.clip, ClipWindow::before(Pt(20.0)));
        assert_eq!(before.position.point, Point::new(Pt(90.0), Pt(13.0)));

        let after = pieces[1];
        assert_eq!(after.line_index, Some(1));
        assert_eq!(after.position.page_index, 0);
        assert_eq!(after.position.point, Point::new(Pt(10.0), Pt(38.0)));
        assert_eq!(after.clip, ClipWindow::after(Pt(20.0)));
        assert_eq!(before.width + after.width, Pt(40.0));
    }

    #[test]
    fn several_breaks_add_spanning_pieces() {
        let pieces = plan_pieces(&layout(1000.0), Point::new(Pt(50.0), Pt(0.0)), Pt(300.0));
        assert_eq!(
            modes(&pieces),
            vec![
                PieceMode::Before,
                PieceMode::Spanning,
                PieceMode::Spanning,
                PieceMode::After
            ]
        );
        assert_eq!(pieces[1].clip, ClipWindow::spanning(Pt(50.0), Pt(100.0)));
        assert_eq!(pieces[2].clip, ClipWindow::spanning(Pt(150.0), Pt(100.0)));
        assert_eq!(pieces[3].clip, ClipWindow::after(Pt(250.0)));
        assert_eq!(pieces[3].width, Pt(50.0));
        // lines 2 and 3 sit on the second page
        assert_eq!(
            pieces.iter().map(|p| p.position.page_index).collect::<Vec<_>>(),
            vec![0, 0, 1, 1]
        );
        let total: Pt = pieces.iter().map(|p| p.width).sum();
        assert_eq!(total, Pt(300.0));
    }

    #[test]
    fn object_running_past_the_end_ends_on_the_last_line() {
        let pieces = plan_pieces(&layout(250.0), Point::new(Pt(150.0), Pt(0.0)), Pt(500.0));
        assert_eq!(modes(&pieces), vec![PieceMode::Before, PieceMode::After]);
        assert_eq!(pieces[1].line_index, Some(2));
        assert_eq!(pieces[1].width, Pt(450.0));

        let past_end = plan_pieces(&layout(250.0), Point::new(Pt(240.0), Pt(0.0)), Pt(100.0));
        assert_eq!(modes(&past_end), vec![PieceMode::Complete]);
    }

    #[test]
    fn empty_flowable_draws_in_one_piece() {
        let pieces = plan_pieces(&layout(0.0), ORIGIN, Pt(100.0));
        assert_eq!(modes(&pieces), vec![PieceMode::Complete]);
        assert_eq!(pieces[0].line_index, None);
    }

    #[derive(Default)]
    struct Tally {
        calls: std::cell::RefCell<Vec<(PieceMode, Pt)>>,
    }

    impl Breakable for Tally {
        fn render_complete(&self, _: DocumentPosition, _: &mut dyn Canvas) -> Result<(), LayoutError> {
            self.calls.borrow_mut().push((PieceMode::Complete, Pt::ZERO));
            Ok(())
        }

        fn render_before_break(
            &self,
            _: DocumentPosition,
            width: Pt,
            _: &mut dyn Canvas,
        ) -> Result<(), LayoutError> {
            self.calls.borrow_mut().push((PieceMode::Before, width));
            Ok(())
        }

        fn render_after_break(
            &self,
            _: DocumentPosition,
            consumed: Pt,
            _: &mut dyn Canvas,
        ) -> Result<(), LayoutError> {
            self.calls.borrow_mut().push((PieceMode::After, consumed));
            Ok(())
        }
    }

    struct NullCanvas;

    impl Canvas for NullCanvas {
        fn stroke_path(&mut self, _: usize, _: StrokePath) {}
    }

    #[test]
    fn dispatch_calls_matching_hook_and_skips_empty_pieces() {
        let tally = Tally::default();
        let mut canvas = NullCanvas;
        for piece in plan_pieces(&layout(250.0), Point::new(Pt(80.0), Pt(0.0)), Pt(40.0)) {
            dispatch(&piece, &tally, &mut canvas).unwrap();
        }

        let empty = RenderPiece {
            mode: PieceMode::After,
            width: Pt::ZERO,
            ..RenderPiece::complete(layout(250.0).flowable_space_to_document(Pt(100.0)), Some(1), Pt::ZERO)
        };
        dispatch(&empty, &tally, &mut canvas).unwrap();

        assert_eq!(
            *tally.calls.borrow(),
            vec![(PieceMode::Before, Pt(20.0)), (PieceMode::After, Pt(20.0))]
        );
    }
}
