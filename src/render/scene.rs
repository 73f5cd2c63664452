use std::collections::BTreeMap;

use crate::{config::Rgb, layout::{CurvePath, Point}};

/// Identity of an element, unique for the life of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u64);

/// Drawing order bucket; lower layers are painted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Backdrop,
    Links,
    Nodes,
    Labels,
    /// Ephemeral animation tokens. Survives a static-only redraw.
    Particles,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgb),
    /// A gradient defined in the scene's resources.
    Gradient(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle {
        center: Point,
        radius: f64,
    },
    Line {
        from: Point,
        to: Point,
    },
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        corner: f64,
    },
    Path(CurvePath),
    Text {
        anchor: Point,
        content: String,
        size: f64,
        align: TextAnchor,
        bold: bool,
    },
}

impl Shape {
    pub fn circle(center: Point, radius: f64) -> Self {
        Shape::Circle { center, radius }
    }

    pub fn line(from: Point, to: Point) -> Self {
        Shape::Line { from, to }
    }

    pub fn rect(origin: Point, width: f64, height: f64, corner: f64) -> Self {
        Shape::Rect {
            origin,
            width,
            height,
            corner,
        }
    }

    pub fn text(anchor: Point, content: impl Into<String>, size: f64) -> Self {
        Shape::Text {
            anchor,
            content: content.into(),
            size,
            align: TextAnchor::Middle,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        if let Shape::Text { bold, .. } = &mut self {
            *bold = true;
        }
        self
    }

    /// Reference point used when moving the shape: circle centre, text anchor.
    pub fn position(&self) -> Option<Point> {
        match self {
            Shape::Circle { center, .. } => Some(*center),
            Shape::Text { anchor, .. } => Some(*anchor),
            Shape::Rect { origin, .. } => Some(*origin),
            Shape::Line { from, .. } => Some(*from),
            Shape::Path(path) => path.start(),
        }
    }

    pub fn set_position(&mut self, to: Point) {
        match self {
            Shape::Circle { center, .. } => *center = to,
            Shape::Text { anchor, .. } => *anchor = to,
            Shape::Rect { origin, .. } => *origin = to,
            Shape::Line { .. } | Shape::Path(_) => {}
        }
    }

    pub fn radius(&self) -> Option<f64> {
        match self {
            Shape::Circle { radius, .. } => Some(*radius),
            _ => None,
        }
    }

    pub fn set_radius(&mut self, r: f64) {
        if let Shape::Circle { radius, .. } = self {
            *radius = r.max(0.0);
        }
    }
}

/// Paint attributes of an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: Option<Paint>,
    pub fill_opacity: f64,
    pub stroke: Option<Paint>,
    pub stroke_opacity: f64,
    pub stroke_width: f64,
    /// Whole-element opacity, multiplied into fill and stroke.
    pub opacity: f64,
    /// Dash and gap lengths.
    pub dash: Option<(f64, f64)>,
    /// Id of a filter resource.
    pub filter: Option<String>,
    /// Id of a marker resource drawn at the end of a line or path.
    pub marker_end: Option<String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            fill_opacity: 1.0,
            stroke: None,
            stroke_opacity: 1.0,
            stroke_width: 1.0,
            opacity: 1.0,
            dash: None,
            filter: None,
            marker_end: None,
        }
    }
}

impl Style {
    pub fn filled(color: Rgb) -> Self {
        Self::default().fill(Paint::Solid(color))
    }

    pub fn stroked(color: Rgb, width: f64) -> Self {
        Self::default().stroke(Paint::Solid(color), width)
    }

    pub fn fill(mut self, paint: Paint) -> Self {
        self.fill = Some(paint);
        self
    }

    pub fn fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = opacity;
        self
    }

    pub fn stroke(mut self, paint: Paint, width: f64) -> Self {
        self.stroke = Some(paint);
        self.stroke_width = width;
        self
    }

    pub fn stroke_opacity(mut self, opacity: f64) -> Self {
        self.stroke_opacity = opacity;
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn dashed(mut self, dash: f64, gap: f64) -> Self {
        self.dash = Some((dash, gap));
        self
    }

    pub fn filter(mut self, id: impl Into<String>) -> Self {
        self.filter = Some(id.into());
        self
    }

    pub fn marker_end(mut self, id: impl Into<String>) -> Self {
        self.marker_end = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub layer: Layer,
    pub shape: Shape,
    pub style: Style,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgb,
    pub opacity: f64,
}

impl GradientStop {
    pub const fn new(offset: f64, color: Rgb, opacity: f64) -> Self {
        Self {
            offset,
            color,
            opacity,
        }
    }
}

/// Shared styling definitions, referenced from elements by id.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// Blurred colored halo merged under the source graphic.
    Glow {
        color: Rgb,
        blur: f64,
        strength: f64,
    },
    /// Top-to-bottom linear gradient.
    LinearGradient(Vec<GradientStop>),
    /// Radial gradient centred slightly above the middle.
    RadialGradient(Vec<GradientStop>),
    /// Filled arrow head.
    Arrow { color: Rgb, size: f64 },
}

impl Resource {
    /// A representative flat color, for hosts that cannot draw the effect.
    pub fn base_color(&self) -> Option<Rgb> {
        match self {
            Resource::Glow { color, .. } | Resource::Arrow { color, .. } => Some(*color),
            Resource::LinearGradient(stops) | Resource::RadialGradient(stops) => {
                stops.first().map(|s| s.color)
            }
        }
    }
}

/// A retained, ordered element tree with its styling resources.
#[derive(Debug, Clone)]
pub struct Scene {
    width: f64,
    height: f64,
    background: Rgb,
    next_id: u64,
    elements: BTreeMap<ElementId, Element>,
    resources: BTreeMap<String, Resource>,
}

impl Scene {
    pub fn new(width: f64, height: f64, background: Rgb) -> Self {
        Self {
            width,
            height,
            background,
            next_id: 0,
            elements: BTreeMap::new(),
            resources: BTreeMap::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn add(&mut self, layer: Layer, shape: Shape, style: Style) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(
            id,
            Element {
                id,
                layer,
                shape,
                style,
            },
        );
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        self.elements.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn count_in(&self, layer: Layer) -> usize {
        self.elements.values().filter(|e| e.layer == layer).count()
    }

    /// Removes every element and resource.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.resources.clear();
    }

    /// Removes every element except those in `keep`, plus all resources.
    pub fn clear_except(&mut self, keep: Layer) {
        self.elements.retain(|_, e| e.layer == keep);
        self.resources.clear();
    }

    /// Registers (or replaces) a resource under `id`.
    pub fn define(&mut self, id: impl Into<String>, resource: Resource) {
        self.resources.insert(id.into(), resource);
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    pub fn resources(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.resources.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Elements in paint order: by layer, then by insertion.
    pub fn elements(&self) -> Vec<&Element> {
        let mut out: Vec<&Element> = self.elements.values().collect();
        out.sort_by_key(|e| (e.layer, e.id));
        out
    }

    /// Resolves a paint to a flat color.
    pub fn resolve(&self, paint: &Paint) -> Option<Rgb> {
        match paint {
            Paint::Solid(c) => Some(*c),
            Paint::Gradient(id) => self.resource(id).and_then(Resource::base_color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::new(100.0, 50.0, Rgb::new(0, 0, 0))
    }

    #[test]
    fn paint_order_is_layer_then_insertion() {
        let mut s = scene();
        let origin = Point::default();
        let top = s.add(Layer::Particles, Shape::circle(origin, 1.0), Style::default());
        let link = s.add(Layer::Links, Shape::line(origin, Point::new(1.0, 1.0)), Style::default());
        let node = s.add(Layer::Nodes, Shape::circle(origin, 2.0), Style::default());
        let far = Shape::line(origin, Point::new(2.0, 2.0));
        let link2 = s.add(Layer::Links, far, Style::default());

        let order: Vec<_> = s.elements().iter().map(|e| e.id).collect();
        assert_eq!(order, [link, link2, node, top]);
    }

    #[test]
    fn clear_except_keeps_one_layer() {
        let mut s = scene();
        s.add(Layer::Nodes, Shape::circle(Point::default(), 2.0), Style::default());
        let p = s.add(Layer::Particles, Shape::circle(Point::default(), 1.0), Style::default());
        s.define(
            "glow-act",
            Resource::Glow {
                color: Rgb::new(1, 2, 3),
                blur: 2.0,
                strength: 0.7,
            },
        );

        s.clear_except(Layer::Particles);
        assert_eq!(s.len(), 1);
        assert!(s.contains(p));
        assert!(s.resource("glow-act").is_none());
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let mut s = scene();
        let a = s.add(Layer::Nodes, Shape::circle(Point::default(), 2.0), Style::default());
        s.clear();
        let b = s.add(Layer::Nodes, Shape::circle(Point::default(), 2.0), Style::default());
        assert_ne!(a, b);
    }

    #[test]
    fn gradient_paint_resolves_to_first_stop() {
        let mut s = scene();
        let c = Rgb::new(9, 9, 9);
        s.define(
            "box",
            Resource::LinearGradient(vec![
                GradientStop::new(0.0, c, 0.1),
                GradientStop::new(1.0, Rgb::new(0, 0, 0), 1.0),
            ]),
        );
        assert_eq!(s.resolve(&Paint::Gradient("box".into())), Some(c));
        assert_eq!(s.resolve(&Paint::Gradient("missing".into())), None);
    }
}
