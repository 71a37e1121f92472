//! Static SVG preview of a layout: one line per drawable edge, one circle and label per node.

use crate::graph::{Bounds, Graph, LayoutResult};
use crate::style::{self, EDGE_COLOR, EMPTY_GRAPH_TEXT, LABEL_COLOR, LABEL_OFFSET};
use std::fmt::Write as _;

#[derive(Debug, Clone, Default)]
pub struct SvgOptions {
    /// Grow the viewBox to include nodes that drifted off the canvas.
    pub fit_content: bool,
    /// Optional `id` attribute of the root `<svg>` element.
    pub diagram_id: Option<String>,
}

pub fn render_svg(graph: &Graph, result: &LayoutResult, opts: &SvgOptions) -> String {
    let positions = result.positions();
    let view = view_box(result, opts.fit_content);

    let mut out = String::with_capacity(256 + result.nodes.len() * 256);
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg""#);
    if let Some(id) = opts.diagram_id.as_deref() {
        let _ = write!(&mut out, r#" id="{}""#, escape_xml(id));
    }
    let _ = write!(
        &mut out,
        r#" width="{}" height="{}" viewBox="{} {} {} {}">"#,
        fmt_num(result.width),
        fmt_num(result.height),
        fmt_num(view.min_x),
        fmt_num(view.min_y),
        fmt_num(view.width()),
        fmt_num(view.height()),
    );

    if result.nodes.is_empty() {
        let _ = write!(
            &mut out,
            r#"<text class="empty" x="{}" y="{}" text-anchor="middle" fill="{LABEL_COLOR}" font-size="14">{EMPTY_GRAPH_TEXT}</text></svg>"#,
            fmt_num(result.width / 2.0),
            fmt_num(result.height / 2.0),
        );
        return out;
    }

    out.push_str(r#"<g class="edges">"#);
    for e in &graph.edges {
        if e.is_self_loop() {
            continue;
        }
        let (Some(a), Some(b)) = (positions.get(&e.source), positions.get(&e.target)) else {
            continue;
        };
        let _ = write!(
            &mut out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{EDGE_COLOR}" stroke-width="1" stroke-opacity="0.3""#,
            fmt_num(a.x),
            fmt_num(a.y),
            fmt_num(b.x),
            fmt_num(b.y),
        );
        if let Some(kind) = e.kind.as_deref() {
            let _ = write!(&mut out, r#" data-type="{}""#, escape_xml(kind));
        }
        out.push_str("/>");
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="nodes">"#);
    for n in &result.nodes {
        let color = style::node_color(n.kind);
        let r = style::node_radius(n.size);
        let _ = write!(
            &mut out,
            r#"<g class="node" data-id="{id}" data-type="{kind}"><circle cx="{x}" cy="{y}" r="{r}" fill="{color}" fill-opacity="0.6" stroke="{color}" stroke-width="1"/><text x="{x}" y="{ty}" text-anchor="middle" fill="{LABEL_COLOR}" font-size="10">{label}</text></g>"#,
            id = escape_xml(&n.id),
            kind = n.kind,
            x = fmt_num(n.x),
            y = fmt_num(n.y),
            r = fmt_num(r),
            ty = fmt_num(n.y + r + LABEL_OFFSET),
            label = escape_xml(&n.label),
        );
    }
    out.push_str("</g></svg>");
    out
}

fn view_box(result: &LayoutResult, fit_content: bool) -> Bounds {
    let canvas = Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: result.width,
        max_y: result.height,
    };
    if !fit_content {
        return canvas;
    }
    let content = Bounds::from_points(result.nodes.iter().flat_map(|n| {
        let r = style::node_radius(n.size);
        // Labels hang below the circle.
        [(n.x - r, n.y - r), (n.x + r, n.y + r + LABEL_OFFSET)]
    }));
    match content {
        Some(b) if b.min_x.is_finite() && b.max_x.is_finite() => canvas.union(b),
        _ => canvas,
    }
}

fn fmt_num(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        // Avoid printing `-0`.
        return "0".to_string();
    }
    format!("{rounded}")
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
