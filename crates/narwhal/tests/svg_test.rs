use narwhal::svg::{SvgOptions, render_svg};
use narwhal::{Canvas, Edge, Graph, Node, NodeKind, layout};

fn sample() -> Graph {
    Graph::new(
        vec![
            Node::new("p", NodeKind::Person).with_label("Ada <lead>").with_size(40.0),
            Node::new("c", NodeKind::Company).with_label("R&D Co"),
            Node::new("s", NodeKind::Skill),
        ],
        vec![
            Edge::new("p", "c", 0.5).with_kind("match"),
            Edge::new("p", "s", 0.6),
            Edge::new("p", "missing", 1.0),
            Edge::new("s", "s", 1.0),
        ],
    )
}

#[test]
fn svg_draws_every_node_and_only_drawable_edges() {
    let graph = sample();
    let out = layout(&graph, Canvas::new(600.0, 400.0).expect("canvas")).expect("layout");
    let svg = render_svg(&graph, &out, &SvgOptions::default());

    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>"));
    assert_eq!(svg.matches("<circle").count(), 3);
    assert_eq!(svg.matches("<line").count(), 2);
    assert!(svg.contains(r#"data-type="match""#));
    assert!(svg.contains(r#"viewBox="0 0 600 400""#));
}

#[test]
fn svg_colors_nodes_by_kind_and_escapes_labels() {
    let graph = sample();
    let out = layout(&graph, Canvas::new(600.0, 400.0).expect("canvas")).expect("layout");
    let svg = render_svg(&graph, &out, &SvgOptions::default());

    assert!(svg.contains(r##"fill="#6366f1""##));
    assert!(svg.contains(r##"fill="#F97316""##));
    assert!(svg.contains(r##"fill="#10B981""##));
    assert!(svg.contains("Ada &lt;lead&gt;"));
    assert!(svg.contains("R&amp;D Co"));
    assert!(svg.contains(r#"r="20""#));
}

#[test]
fn fit_content_never_shrinks_the_canvas() {
    let graph = sample();
    let out = layout(&graph, Canvas::new(60.0, 40.0).expect("canvas")).expect("layout");
    let opts = SvgOptions {
        fit_content: true,
        diagram_id: Some("kg".to_string()),
    };
    let svg = render_svg(&graph, &out, &opts);
    assert!(svg.contains(r#"id="kg""#));
    assert!(!svg.contains(r#"viewBox="0 0 60 40""#));
}

#[test]
fn empty_graph_renders_a_placeholder() {
    let graph = Graph::default();
    let out = layout(&graph, Canvas::new(600.0, 400.0).expect("canvas")).expect("layout");
    let svg = render_svg(&graph, &out, &SvgOptions::default());

    assert!(svg.ends_with("</svg>"));
    assert!(svg.contains(r#"class="empty""#));
    assert!(svg.contains(r#"x="300" y="200""#));
    assert!(svg.contains(narwhal::style::EMPTY_GRAPH_TEXT));
    assert_eq!(svg.matches("<circle").count(), 0);
}
