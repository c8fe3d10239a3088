//! A cursor visible before a pass stays visible after it

use super::sim::{attach, edited, lines, settle, SimulatedEditor};
use crate::config::LayoutConfig;
use crate::host::ViewportSurface;
use crate::Paginator;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    Enter,
    InsertAbove(usize),
    Append(usize),
    MoveCursor(usize),
    /// Scroll so the cursor sits this far below the viewport top
    Reveal(f64),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        Just(Edit::Enter),
        (1usize..20).prop_map(Edit::InsertAbove),
        (1usize..40).prop_map(Edit::Append),
        (0usize..200).prop_map(Edit::MoveCursor),
        (0.0f64..700.0).prop_map(|offset| Edit::Reveal(offset.floor())),
    ]
}

fn apply(paginator: &mut Paginator<SimulatedEditor>, edit: &Edit) {
    let editor = paginator.surface_mut();
    match edit {
        Edit::Enter => editor.press_enter(),
        Edit::InsertAbove(count) => editor.insert_lines_at(0, *count),
        Edit::Append(count) => {
            let end = editor.line_count();
            editor.insert_lines_at(end, *count);
        }
        Edit::MoveCursor(line) => editor.move_cursor_to(*line),
        Edit::Reveal(offset) => {
            if let Some(rect) = editor.cursor_rect() {
                editor.scroll_to(rect.y - offset);
            }
        }
    }
}

proptest! {
    #[test]
    fn visible_cursor_survives_repagination(
        initial in 1usize..80,
        edits in prop::collection::vec(edit(), 1..25),
    ) {
        let mut paginator = attach(LayoutConfig::default(), &lines(initial));
        paginator.start(0.0);
        let mut now = settle(&mut paginator, 0.0);

        for edit in &edits {
            apply(&mut paginator, edit);
            let visible_before = paginator.surface().cursor_visible();

            edited(&mut paginator, now);
            now = settle(&mut paginator, now);

            if visible_before {
                prop_assert!(
                    paginator.surface().cursor_visible(),
                    "cursor left the viewport after {:?}",
                    edit
                );
            }
        }
    }
}
