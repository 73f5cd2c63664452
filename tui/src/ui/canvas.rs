use neuroflow::{
    layout::Point,
    render::{Element, Scene, Shape, TextAnchor},
    Rgb,
};
use ratatui::{
    style::Style,
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Circle, Context, Line as Segment, Points, Rectangle},
        Block,
    },
};

use super::theme::Theme;

/// Elements fainter than this vanish against the background anyway.
const MIN_ALPHA: f64 = 0.06;
/// Filled circles up to this radius are drawn as a single dot.
const DOT_RADIUS: f64 = 5.0;

/// Draws `scene` in a braille canvas covering `cols` terminal columns.
///
/// Scene y grows downwards, canvas y upwards; opacity is approximated by
/// blending towards the background.
pub fn scene_canvas<'a>(
    scene: &'a Scene,
    block: Block<'a>,
    cols: u16,
) -> Canvas<'a, impl Fn(&mut Context) + 'a> {
    let (w, h) = (scene.width(), scene.height());
    let col_px = if cols == 0 { w } else { w / f64::from(cols) };

    Canvas::default()
        .block(block)
        .background_color(Theme::color(scene.background()))
        .marker(Marker::Braille)
        .x_bounds([0.0, w])
        .y_bounds([0.0, h])
        .paint(move |ctx| {
            for element in scene.elements() {
                paint_element(ctx, scene, element, col_px);
            }
        })
}

fn blend(scene: &Scene, color: Option<Rgb>, alpha: f64) -> Option<ratatui::style::Color> {
    let color = color?;
    (alpha >= MIN_ALPHA).then(|| Theme::color(scene.background().mix(color, alpha)))
}

fn paint_element(ctx: &mut Context<'_>, scene: &Scene, element: &Element, col_px: f64) {
    let h = scene.height();
    let flip = |p: Point| (p.x, h - p.y);
    let style = &element.style;

    let fill = blend(
        scene,
        style.fill.as_ref().and_then(|p| scene.resolve(p)),
        style.opacity * style.fill_opacity,
    );
    let stroke = blend(
        scene,
        style.stroke.as_ref().and_then(|p| scene.resolve(p)),
        style.opacity * style.stroke_opacity,
    );

    match &element.shape {
        Shape::Circle { center, radius } => {
            let (x, y) = flip(*center);
            if let Some(color) = stroke {
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: *radius,
                    color,
                });
            }
            if let Some(color) = fill {
                if *radius <= DOT_RADIUS {
                    ctx.draw(&Points {
                        coords: &[(x, y)],
                        color,
                    });
                } else {
                    ctx.draw(&Circle {
                        x,
                        y,
                        radius: *radius,
                        color,
                    });
                }
            }
        }
        Shape::Line { from, to } => {
            let Some(color) = stroke else {
                return;
            };
            let ((x1, y1), (x2, y2)) = (flip(*from), flip(*to));
            ctx.draw(&Segment { x1, y1, x2, y2, color });
        }
        Shape::Rect {
            origin,
            width,
            height,
            ..
        } => {
            let Some(color) = stroke.or(fill) else {
                return;
            };
            ctx.draw(&Rectangle {
                x: origin.x,
                y: h - origin.y - height,
                width: *width,
                height: *height,
                color,
            });
        }
        Shape::Path(path) => {
            let Some(color) = stroke else {
                return;
            };
            for pair in path.samples().windows(2) {
                let ((x1, y1), (x2, y2)) = (flip(pair[0]), flip(pair[1]));
                ctx.draw(&Segment { x1, y1, x2, y2, color });
            }
        }
        Shape::Text {
            anchor,
            content,
            align,
            ..
        } => {
            let Some(color) = fill else {
                return;
            };
            let span = content.chars().count() as f64 * col_px;
            let x = match align {
                TextAnchor::Start => anchor.x,
                TextAnchor::Middle => anchor.x - span / 2.0,
                TextAnchor::End => anchor.x - span,
            };
            ctx.print(
                x.max(0.0),
                h - anchor.y,
                Line::styled(content.clone(), Style::default().fg(color)),
            );
        }
    }
}
