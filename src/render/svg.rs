use std::fmt::Write;

use super::{Element, GradientStop, Paint, Resource, Scene, Shape, Style, TextAnchor};

const FONT_MONO: &str = "ui-monospace, monospace";

/// Serialises `scene` into a standalone SVG document.
pub fn to_svg(scene: &Scene) -> String {
    let mut out = String::with_capacity(4096 + scene.len() * 96);
    let (w, h) = (num(scene.width()), num(scene.height()));

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = writeln!(out, r#"<rect width="100%" height="100%" fill="{}"/>"#, scene.background());

    out.push_str("<defs>\n");
    for (id, resource) in scene.resources() {
        write_resource(&mut out, id, resource);
    }
    out.push_str("</defs>\n");

    for element in scene.elements() {
        write_element(&mut out, element);
    }

    out.push_str("</svg>\n");
    out
}

fn write_resource(out: &mut String, id: &str, resource: &Resource) {
    match resource {
        Resource::Glow {
            color,
            blur,
            strength,
        } => {
            let _ = write!(
                out,
                r#"<filter id="{id}" x="-80%" y="-80%" width="260%" height="260%">"#
            );
            let _ = write!(
                out,
                r#"<feGaussianBlur in="SourceGraphic" stdDeviation="{}" result="blur"/>"#,
                num(*blur)
            );
            let _ = write!(
                out,
                r#"<feFlood flood-color="{color}" flood-opacity="{}" result="color"/>"#,
                num(*strength)
            );
            out.push_str(r#"<feComposite in="color" in2="blur" operator="in" result="glow"/>"#);
            out.push_str(r#"<feMerge><feMergeNode in="glow"/>"#);
            out.push_str(r#"<feMergeNode in="SourceGraphic"/></feMerge>"#);
            out.push_str("</filter>\n");
        }
        Resource::LinearGradient(stops) => {
            let _ = write!(out, r#"<linearGradient id="{id}" x1="0%" y1="0%" x2="0%" y2="100%">"#);
            write_stops(out, stops);
            out.push_str("</linearGradient>\n");
        }
        Resource::RadialGradient(stops) => {
            let _ = write!(out, r#"<radialGradient id="{id}" cx="50%" cy="35%" r="65%">"#);
            write_stops(out, stops);
            out.push_str("</radialGradient>\n");
        }
        Resource::Arrow { color, size } => {
            let _ = write!(
                out,
                r#"<marker id="{id}" viewBox="0 -5 10 10" refX="8" refY="0" markerWidth="{s}" markerHeight="{s}" orient="auto">"#,
                s = num(*size)
            );
            let _ = write!(out, r#"<path d="M0,-5L10,0L0,5Z" fill="{color}"/>"#);
            out.push_str("</marker>\n");
        }
    }
}

fn write_stops(out: &mut String, stops: &[GradientStop]) {
    for s in stops {
        let _ = write!(
            out,
            r#"<stop offset="{}%" stop-color="{}" stop-opacity="{}"/>"#,
            num(s.offset * 100.0),
            s.color,
            num(s.opacity)
        );
    }
}

fn write_element(out: &mut String, element: &Element) {
    let style = style_attrs(&element.style);
    match &element.shape {
        Shape::Circle { center, radius } => {
            let _ = writeln!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}"{style}/>"#,
                num(center.x),
                num(center.y),
                num(*radius)
            );
        }
        Shape::Line { from, to } => {
            let _ = writeln!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{style}/>"#,
                num(from.x),
                num(from.y),
                num(to.x),
                num(to.y)
            );
        }
        Shape::Rect {
            origin,
            width,
            height,
            corner,
        } => {
            let _ = writeln!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}"{style}/>"#,
                num(origin.x),
                num(origin.y),
                num(*width),
                num(*height),
                num(*corner)
            );
        }
        Shape::Path(path) => {
            let _ = writeln!(out, r#"<path d="{}"{style}/>"#, path.svg_data());
        }
        Shape::Text {
            anchor,
            content,
            size,
            align,
            bold,
        } => {
            let align = match align {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let weight = if *bold { r#" font-weight="700""# } else { "" };
            let _ = writeln!(
                out,
                r#"<text x="{}" y="{}" text-anchor="{align}" dominant-baseline="central" font-size="{}px" font-family="{FONT_MONO}"{weight}{style}>{}</text>"#,
                num(anchor.x),
                num(anchor.y),
                num(*size),
                escape(content)
            );
        }
    }
}

fn style_attrs(style: &Style) -> String {
    let mut out = String::new();
    match &style.fill {
        Some(paint) => {
            let _ = write!(out, r#" fill="{}""#, paint_ref(paint));
        }
        None => out.push_str(r#" fill="none""#),
    }
    if style.fill_opacity < 1.0 {
        let _ = write!(out, r#" fill-opacity="{}""#, num(style.fill_opacity));
    }
    if let Some(paint) = &style.stroke {
        let _ = write!(
            out,
            r#" stroke="{}" stroke-width="{}""#,
            paint_ref(paint),
            num(style.stroke_width)
        );
        if style.stroke_opacity < 1.0 {
            let _ = write!(out, r#" stroke-opacity="{}""#, num(style.stroke_opacity));
        }
    }
    if style.opacity < 1.0 {
        let _ = write!(out, r#" opacity="{}""#, num(style.opacity));
    }
    if let Some((dash, gap)) = style.dash {
        let _ = write!(out, r#" stroke-dasharray="{},{}""#, num(dash), num(gap));
    }
    if let Some(id) = &style.filter {
        let _ = write!(out, r#" filter="url(#{id})""#);
    }
    if let Some(id) = &style.marker_end {
        let _ = write!(out, r#" marker-end="url(#{id})""#);
    }
    out
}

fn paint_ref(paint: &Paint) -> String {
    match paint {
        Paint::Solid(c) => c.to_string(),
        Paint::Gradient(id) => format!("url(#{id})"),
    }
}

fn num(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".into()
    } else {
        rounded.to_string()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Rgb,
        layout::Point,
        render::{Layer, Style},
    };

    #[test]
    fn document_has_defs_and_elements_in_order() {
        let mut scene = Scene::new(200.0, 100.0, Rgb::new(0x0f, 0x17, 0x2a));
        scene.define(
            "glow-act",
            Resource::Glow {
                color: Rgb::new(5, 150, 105),
                blur: 3.0,
                strength: 0.7,
            },
        );
        scene.add(
            Layer::Particles,
            Shape::circle(Point::new(10.0, 20.0), 3.0),
            Style::filled(Rgb::new(5, 150, 105)).filter("glow-act").opacity(0.9),
        );
        scene.add(
            Layer::Links,
            Shape::line(Point::new(0.0, 0.0), Point::new(5.5, 5.0)),
            Style::stroked(Rgb::new(1, 2, 3), 1.0).dashed(4.0, 4.0),
        );

        let svg = to_svg(&scene);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r##"<filter id="glow-act""##));
        assert!(svg.contains(r#"stdDeviation="3""#));
        assert!(svg.contains(r#"stroke-dasharray="4,4""#));
        assert!(svg.contains(r#"filter="url(#glow-act)""#));
        assert!(svg.contains(r#"opacity="0.9""#));

        let line = svg.find("<line").unwrap();
        let circle = svg.find("<circle").unwrap();
        assert!(line < circle);
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn text_is_escaped() {
        let mut scene = Scene::new(10.0, 10.0, Rgb::new(0, 0, 0));
        scene.add(
            Layer::Labels,
            Shape::text(Point::new(1.0, 1.0), "a<b & \"c\"", 8.0),
            Style::filled(Rgb::new(255, 255, 255)),
        );
        let svg = to_svg(&scene);
        assert!(svg.contains("a&lt;b &amp; &quot;c&quot;"));
    }
}
