use enigma_models::{GraphHit, LocationEdge};
use graph_rag::GraphStore;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

use crate::errors::IngestResult;

pub const DEFAULT_VISUALIZATION_LIMIT: usize = 500;

#[derive(Debug, Serialize)]
struct NodeView<'a> {
    id: &'a str,
    label: &'a str,
    title: &'a str,
}

#[derive(Debug, Serialize)]
struct EdgeView<'a> {
    from: &'a str,
    to: &'a str,
    title: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Location graph</title>
<style>
  body { margin: 0; font-family: sans-serif; background: #ffffff; color: #222222; }
  svg { width: 100%; height: 800px; }
  line { stroke: #97c2fc; stroke-width: 1.5; }
  circle { fill: #4f81bd; }
  text { font-size: 12px; fill: #222222; }
</style>
</head>
<body>
<svg id="graph"></svg>
<script>
const nodes = __NODES__;
const edges = __EDGES__;
const svg = document.getElementById("graph");
const ns = "http://www.w3.org/2000/svg";
const width = svg.clientWidth || 1200;
const height = svg.clientHeight || 800;
const radius = Math.max(80, Math.min(width, height) / 2 - 60);
const pos = {};
nodes.forEach((n, i) => {
  const angle = (2 * Math.PI * i) / Math.max(nodes.length, 1);
  pos[n.id] = { x: width / 2 + radius * Math.cos(angle), y: height / 2 + radius * Math.sin(angle) };
});
edges.forEach((e) => {
  const line = document.createElementNS(ns, "line");
  line.setAttribute("x1", pos[e.from].x);
  line.setAttribute("y1", pos[e.from].y);
  line.setAttribute("x2", pos[e.to].x);
  line.setAttribute("y2", pos[e.to].y);
  const tip = document.createElementNS(ns, "title");
  tip.textContent = e.title;
  line.appendChild(tip);
  svg.appendChild(line);
});
nodes.forEach((n) => {
  const g = document.createElementNS(ns, "g");
  const dot = document.createElementNS(ns, "circle");
  dot.setAttribute("cx", pos[n.id].x);
  dot.setAttribute("cy", pos[n.id].y);
  dot.setAttribute("r", 8);
  const tip = document.createElementNS(ns, "title");
  tip.textContent = n.title;
  dot.appendChild(tip);
  const label = document.createElementNS(ns, "text");
  label.setAttribute("x", pos[n.id].x + 10);
  label.setAttribute("y", pos[n.id].y + 4);
  label.textContent = n.label;
  g.appendChild(dot);
  g.appendChild(label);
  svg.appendChild(g);
});
</script>
</body>
</html>
"##;

/// JSON safe to inline in a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

/// Render nodes and the edges whose endpoints are both among them as one
/// standalone page. Nodes without a name are labelled by id.
pub fn render_html(nodes: &[GraphHit], edges: &[LocationEdge]) -> (String, GraphSummary) {
    let known: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    let node_views: Vec<NodeView<'_>> = nodes
        .iter()
        .map(|n| NodeView {
            id: &n.id,
            label: if n.name.is_empty() { &n.id } else { &n.name },
            title: &n.description,
        })
        .collect();

    let edge_views: Vec<EdgeView<'_>> = edges
        .iter()
        .filter(|e| known.contains(e.from.as_str()) && known.contains(e.to.as_str()))
        .map(|e| EdgeView {
            from: &e.from,
            to: &e.to,
            title: &e.rel_type,
        })
        .collect();

    let summary = GraphSummary {
        nodes: node_views.len(),
        edges: edge_views.len(),
    };
    let html = PAGE_TEMPLATE
        .replace("__NODES__", &script_json(&node_views))
        .replace("__EDGES__", &script_json(&edge_views));

    (html, summary)
}

/// Export up to `limit` locations and `limit` edges to `output`, creating
/// parent directories as needed.
pub async fn visualize_graph(store: &dyn GraphStore, output: &Path, limit: usize) -> IngestResult<GraphSummary> {
    let nodes = store.fetch_locations(limit).await?;
    let edges = store.fetch_location_edges(limit).await?;
    let (html, summary) = render_html(&nodes, &edges);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(output, html).await?;

    tracing::info!(
        path = %output.display(),
        nodes = summary.nodes,
        edges = summary.edges,
        "Graph visualization written"
    );
    Ok(summary)
}
