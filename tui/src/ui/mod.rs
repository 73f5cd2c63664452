pub mod canvas;
pub mod layout;
pub mod theme;
pub mod widgets;

use neuroflow::Viewport;
use ratatui::{layout::Rect, widgets::Block, Frame};

use crate::state::AppState;

use theme::Theme;

/// Pixels per terminal cell; terminal cells are about twice as tall as wide.
const CELL_PX: (f64, f64) = (8.0, 16.0);

/// Viewport the diagram gets inside `area`.
pub fn diagram_viewport(area: Rect) -> Viewport {
    let (_, diagram, _, _) = layout::vertical(area);
    let inner = layout::inner(diagram);
    Viewport::new(
        f64::from(inner.width) * CELL_PX.0,
        f64::from(inner.height) * CELL_PX.1,
    )
}

/// Draws the entire UI.
pub fn draw(f: &mut Frame, state: &AppState) {
    let area = f.size();
    f.render_widget(Block::default().style(Theme::base()), area);

    let (header_area, diagram_area, status_area, hints_area) = layout::vertical(area);
    let (desc_area, legend_area) = layout::status(status_area);

    f.render_widget(widgets::header(state), header_area);

    let block = widgets::diagram_block(state);
    match state.scene() {
        Some(scene) => {
            let cols = layout::inner(diagram_area).width;
            f.render_widget(canvas::scene_canvas(scene, block, cols), diagram_area);
        }
        None => {
            f.render_widget(widgets::placeholder().block(block), diagram_area);
        }
    }

    f.render_widget(widgets::status(state), desc_area);
    f.render_widget(widgets::legend(&state.config().palette), legend_area);
    f.render_widget(widgets::hints(state), hints_area);
}
