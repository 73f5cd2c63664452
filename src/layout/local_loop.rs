use super::{Breakpoint, BreakpointPolicy, CurvePath, Margins, Point};

/// Box, comparator and path placement of the local error loop diagram.
///
/// All coordinates are in surface pixels (margins already applied).
#[derive(Debug, Clone, PartialEq)]
pub struct LoopGeometry {
    pub width: f64,
    pub height: f64,
    pub breakpoint: Breakpoint,
    pub margins: Margins,
    pub inner_width: f64,
    pub inner_height: f64,
    pub box_width: f64,
    pub box_height: f64,
    pub lower_center: Point,
    pub higher_center: Point,
    pub comparator_center: Point,
    pub comparator_radius: f64,
    /// Higher layer → comparator, arching above.
    pub prediction: CurvePath,
    /// Lower layer → comparator, arching below.
    pub state: CurvePath,
    /// Comparator → higher layer, on its own lower lane.
    pub error: CurvePath,
    pub prediction_label: Point,
    pub state_label: Point,
    pub error_badge: Point,
    pub grid_step: f64,
    pub particle_radius: f64,
    /// How far the comparator pulse ring grows.
    pub pulse_growth: f64,
    pub path_width: f64,
    pub glow_blur: f64,
    pub label_font_px: f64,
}

impl LoopGeometry {
    pub fn is_compact(&self) -> bool {
        self.breakpoint.is_compact()
    }

    pub fn prediction_caption(&self) -> &'static str {
        if self.is_compact() {
            "↓ PREDICTION"
        } else {
            "↓ TOP-DOWN PREDICTION"
        }
    }

    pub fn state_caption(&self) -> &'static str {
        if self.is_compact() {
            "↑ STATE"
        } else {
            "↑ ACTUAL STATE"
        }
    }

    /// Top-left corner of the box centred at `center`.
    pub fn box_origin(&self, center: Point) -> Point {
        Point::new(center.x - self.box_width / 2.0, center.y - self.box_height / 2.0)
    }

    /// Neuron dots drawn inside each box: two columns, three or four rows.
    pub fn box_cells(&self, center: Point) -> Vec<Point> {
        let origin = self.box_origin(center);
        let (cols, rows) = (2, if self.is_compact() { 3 } else { 4 });
        let sp_x = self.box_width / (cols as f64 + 1.0);
        let sp_y = (self.box_height - 12.0) / (rows as f64 + 1.0);

        (1..=rows)
            .flat_map(|r| {
                (1..=cols).map(move |c| {
                    Point::new(origin.x + c as f64 * sp_x, origin.y + 11.0 + r as f64 * sp_y)
                })
            })
            .collect()
    }

    pub fn cell_radius(&self) -> f64 {
        if self.is_compact() {
            3.0
        } else {
            5.0
        }
    }
}

/// Lays out the local loop diagram in a `width` × `height` viewport.
///
/// Returns `None` when the viewport leaves no inner area to draw in.
pub fn compute_loop_geometry(
    width: f64,
    height: f64,
    policy: &BreakpointPolicy,
) -> Option<LoopGeometry> {
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return None;
    }

    let bp = policy.classify(width);
    // (compact, medium, wide)
    let pick = |c: f64, m: f64, w: f64| match bp {
        Breakpoint::Compact => c,
        Breakpoint::Medium => m,
        Breakpoint::Wide => w,
    };
    let compact = bp.is_compact();

    let margins = Margins::new(
        pick(28.0, 36.0, 44.0),
        pick(12.0, 36.0, 52.0),
        pick(36.0, 44.0, 52.0),
        pick(12.0, 36.0, 52.0),
    );
    let iw = width - margins.left - margins.right;
    let ih = height - margins.top - margins.bottom;
    if iw <= 0.0 || ih <= 0.0 {
        return None;
    }

    let box_width = pick((iw * 0.22).min(56.0), 80.0, 96.0);
    let box_height = pick((ih * 0.6).min(86.0), 120.0, 148.0);
    let comp_r = pick((iw * 0.09).min(20.0), 32.0, 38.0);

    let cy = ih / 2.0;
    let lower_cx = box_width / 2.0;
    let higher_cx = iw - box_width / 2.0;
    let comp_cx = iw / 2.0;

    let origin = Point::new(margins.left, margins.top);
    let at = |x: f64, y: f64| origin + Point::new(x, y);

    let pred_arc_y = cy - pick((ih * 0.18).min(22.0), 30.0, 42.0);
    let state_arc_y = cy + pick((ih * 0.15).min(18.0), 22.0, 30.0);
    let err_arc_y = cy + pick((ih * 0.2).min(24.0), 32.0, 44.0);
    let right_mid = (comp_cx + higher_cx) / 2.0;
    let left_mid = (comp_cx + lower_cx) / 2.0;
    let bend = |c: f64, other: f64| if compact { c } else { other };

    let prediction = CurvePath::through(&[
        at(higher_cx - box_width / 2.0, pred_arc_y),
        at(right_mid, pred_arc_y - bend(10.0, 16.0)),
        at(comp_cx + comp_r + 2.0, cy - comp_r * 0.55),
    ]);
    let state = CurvePath::through(&[
        at(lower_cx + box_width / 2.0, state_arc_y),
        at(left_mid, state_arc_y + bend(10.0, 14.0)),
        at(comp_cx - comp_r - 2.0, cy + comp_r * 0.45),
    ]);
    let error = CurvePath::through(&[
        at(comp_cx + comp_r + 2.0, cy + comp_r * 0.6),
        at(right_mid, err_arc_y + bend(6.0, 10.0)),
        at(higher_cx - box_width / 2.0, cy + bend(12.0, 18.0)),
    ]);

    Some(LoopGeometry {
        width,
        height,
        breakpoint: bp,
        margins,
        inner_width: iw,
        inner_height: ih,
        box_width,
        box_height,
        lower_center: at(lower_cx, cy),
        higher_center: at(higher_cx, cy),
        comparator_center: at(comp_cx, cy),
        comparator_radius: comp_r,
        prediction,
        state,
        error,
        prediction_label: at(right_mid + bend(2.0, 6.0), pred_arc_y - bend(14.0, 24.0)),
        state_label: at(left_mid, state_arc_y + bend(20.0, 30.0)),
        error_badge: at(right_mid + 4.0, err_arc_y + bend(20.0, 28.0)),
        grid_step: bend(20.0, 28.0),
        particle_radius: bend(2.5, 4.0),
        pulse_growth: bend(18.0, 24.0),
        path_width: bend(1.4, 1.8),
        glow_blur: bend(3.0, 5.0),
        label_font_px: bend(7.0, 9.0),
    })
}
