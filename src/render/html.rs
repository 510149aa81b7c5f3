use crate::view::Viewer;

/// Render a self-contained HTML report (viewer state embedded as JSON).
///
/// Important: we avoid `format!()` because the HTML contains many `{}` from JS
/// template literals (e.g., `${x}`), which would conflict with Rust formatting.
pub fn render_html_report(viewer: &Viewer) -> anyhow::Result<String> {
    // Entity ids are free text; keep them from closing the script element.
    let json = serde_json::to_string(viewer)?.replace("</", "<\\/");

    const TEMPLATE: &str = r##"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Network Simulation Metrics</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; color: #222; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  .summary { display: flex; gap: 16px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }
  .figure { padding: 12px 16px; border-bottom: 1px solid #eee; }
  .figure h2 { margin: 4px 0 8px; font-size: 18px; }
  .subplot { display: flex; gap: 12px; align-items: flex-start; }
  .legend { min-width: 140px; font-size: 13px; padding-top: 8px; }
  .legend-item { cursor: pointer; user-select: none; padding: 2px 4px; border-radius: 4px; display: flex; gap: 6px; align-items: center; }
  .legend-item:hover { background: #f3f3f3; }
  .swatch { display: inline-block; width: 18px; height: 3px; }
  svg text { font-size: 11px; fill: #555; }
  .axis { stroke: #999; stroke-width: 1; }
  .grid { stroke: #eee; stroke-width: 1; }
  table { border-collapse: collapse; margin-top: 8px; }
  th, td { border-bottom: 1px solid #eee; padding: 4px 8px; text-align: left; font-size: 13px; }
  th { background: white; border-bottom: 1px solid #ddd; }
  .num { text-align: right; font-variant-numeric: tabular-nums; }
  .muted { color: #777; font-size: 12px; }
</style>
</head>
<body>
<header>
  <div class="summary" id="summary"></div>
</header>
<div id="figures"></div>

<script>
// Embedded viewer state (JSON object literal)
const DATA = __DATA__;

const SVG_NS = "http://www.w3.org/2000/svg";
const WIDTH = 760, HEIGHT = 190;
const PAD = { left: 56, right: 12, top: 10, bottom: 30 };
const COLORS = ["#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
                "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf"];

// legend id -> { group, color, item } for the drawn elements
const drawn = new Map();

function fmt(x) {
  return (Math.round(x * 1000) / 1000).toString();
}

function escapeHtml(s) {
  return String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;")
    .replaceAll("'", "&#39;");
}

function el(name, attrs) {
  const node = document.createElementNS(SVG_NS, name);
  for (const [k, v] of Object.entries(attrs || {})) node.setAttribute(k, v);
  return node;
}

function renderSummary() {
  const [links, flows] = DATA.figures;
  const n = links ? links.times.length : 0;
  const countEntities = (fig) => fig && fig.subplots.length ? fig.subplots[0].series.length : 0;
  document.getElementById("summary").innerHTML = `
    <span class="pill">events: <b>${n}</b></span>
    <span class="pill">links: <b>${countEntities(links)}</b></span>
    <span class="pill">flows: <b>${countEntities(flows)}</b></span>
    <span class="pill">time: <b>${fmt(links.x_range.min)} – ${fmt(links.x_range.max)}</b> ms</span>
  `;
}

function drawSubplot(fig, subplot) {
  const svg = el("svg", { width: WIDTH, height: HEIGHT });
  const plotW = WIDTH - PAD.left - PAD.right;
  const plotH = HEIGHT - PAD.top - PAD.bottom;
  const xr = fig.x_range, yr = subplot.y_range;
  const sx = (t) => PAD.left + (t - xr.min) / (xr.max - xr.min) * plotW;
  const sy = (v) => PAD.top + plotH - (Math.max(v, yr.min) - yr.min) / (yr.max - yr.min) * plotH;

  for (let i = 0; i <= 4; i++) {
    const v = yr.min + (yr.max - yr.min) * i / 4;
    svg.appendChild(el("line", { x1: PAD.left, x2: WIDTH - PAD.right, y1: sy(v), y2: sy(v), class: "grid" }));
    const label = el("text", { x: PAD.left - 6, y: sy(v) + 4, "text-anchor": "end" });
    label.textContent = fmt(v);
    svg.appendChild(label);
  }
  for (let i = 0; i <= 5; i++) {
    const t = xr.min + (xr.max - xr.min) * i / 5;
    const label = el("text", { x: sx(t), y: HEIGHT - PAD.bottom + 14, "text-anchor": "middle" });
    label.textContent = fmt(t);
    svg.appendChild(label);
  }
  svg.appendChild(el("line", { x1: PAD.left, x2: PAD.left, y1: PAD.top, y2: PAD.top + plotH, class: "axis" }));
  svg.appendChild(el("line", { x1: PAD.left, x2: WIDTH - PAD.right, y1: PAD.top + plotH, y2: PAD.top + plotH, class: "axis" }));

  const xlabel = el("text", { x: PAD.left + plotW / 2, y: HEIGHT - 2, "text-anchor": "middle" });
  xlabel.textContent = fig.x_label;
  svg.appendChild(xlabel);
  const ylabel = el("text", { x: 12, y: PAD.top + plotH / 2, "text-anchor": "middle",
                              transform: `rotate(-90 12 ${PAD.top + plotH / 2})` });
  ylabel.textContent = subplot.y_label;
  svg.appendChild(ylabel);

  const marker = DATA.style.marker;
  subplot.series.forEach((series, idx) => {
    const color = COLORS[idx % COLORS.length];
    const group = el("g", {});
    if (marker !== "points") {
      const d = series.values
        .map((v, i) => `${i === 0 ? "M" : "L"}${sx(fig.times[i]).toFixed(2)},${sy(v).toFixed(2)}`)
        .join(" ");
      group.appendChild(el("path", { d, fill: "none", stroke: color, "stroke-width": 1.5 }));
    }
    if (marker !== "line") {
      series.values.forEach((v, i) => {
        group.appendChild(el("circle", { cx: sx(fig.times[i]), cy: sy(v), r: 2, fill: color }));
      });
    }
    svg.appendChild(group);
    drawn.set(series.legend_id, { group, color });
  });

  return svg;
}

function drawLegend(subplot) {
  const box = document.createElement("div");
  box.className = "legend";
  subplot.series.forEach((series) => {
    const entry = drawn.get(series.legend_id);
    const item = document.createElement("div");
    item.className = "legend-item";
    item.innerHTML = `<span class="swatch" style="background:${entry.color}"></span>${escapeHtml(series.label)}`;
    item.onclick = () => applyState(series.legend_id, toggle(DATA.legend, series.legend_id));
    entry.item = item;
    box.appendChild(item);
  });
  return box;
}

// Same rule as view::toggle; alphas come from the viewer state.
function toggle(table, id) {
  const entry = table[id];
  if (!entry) return null;
  entry.visible = !entry.visible;
  entry.alpha = entry.visible ? DATA.legend_alpha.visible : DATA.legend_alpha.hidden;
  return { visible: entry.visible, alpha: entry.alpha };
}

function applyState(id, state) {
  if (!state) return;
  const entry = drawn.get(id);
  entry.group.style.display = state.visible ? "" : "none";
  entry.item.style.opacity = state.alpha;
}

function renderSummaryTable(fig) {
  const table = document.createElement("table");
  table.innerHTML = `
    <thead><tr><th>id</th><th>metric</th><th class="num">mean</th><th class="num">min</th><th class="num">max</th></tr></thead>
  `;
  const body = document.createElement("tbody");
  for (const row of fig.summary) {
    const tr = document.createElement("tr");
    tr.innerHTML = `
      <td>${escapeHtml(row.entity)}</td>
      <td>${escapeHtml(row.metric)}</td>
      <td class="num">${fmt(row.mean)}</td>
      <td class="num">${fmt(row.min)}</td>
      <td class="num">${fmt(row.max)}</td>
    `;
    body.appendChild(tr);
  }
  table.appendChild(body);
  return table;
}

function renderFigures() {
  const root = document.getElementById("figures");
  for (const fig of DATA.figures) {
    const section = document.createElement("section");
    section.className = "figure";
    section.innerHTML = `<h2>${escapeHtml(fig.window_title)}</h2>`;
    if (!fig.subplots.length || !fig.subplots[0].series.length) {
      section.innerHTML += `<div class="muted">no entities recorded</div>`;
    }
    for (const subplot of fig.subplots) {
      const row = document.createElement("div");
      row.className = "subplot";
      row.appendChild(drawSubplot(fig, subplot));
      row.appendChild(drawLegend(subplot));
      section.appendChild(row);
    }
    section.appendChild(renderSummaryTable(fig));
    root.appendChild(section);
  }
  for (const [id, entry] of DATA.legend.entries()) {
    applyState(id, entry);
  }
}

renderSummary();
renderFigures();
</script>
</body>
</html>
"##;

    Ok(TEMPLATE.replace("__DATA__", &json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlotStyle;
    use crate::model::reshape;
    use crate::trace::parse::parse_trace_str;

    fn viewer(link_id: &str) -> Viewer {
        let text = format!(
            r#"{{"Simulation Event Metrics": [{{
                "Time": 0,
                "LinkData": [{{"LinkID": "{link_id}", "LinkRate": 10, "BuffOcc": 0, "PktLoss": 0}}],
                "FlowData": [{{"FlowID": "F1", "FlowRate": 5, "WinSize": 2, "PktDelay": 1}}]
            }}]}}"#
        );
        let trace = parse_trace_str(&text).unwrap();
        Viewer::new(&reshape(&trace).unwrap(), PlotStyle::default())
    }

    fn report(link_id: &str) -> String {
        render_html_report(&viewer(link_id)).unwrap()
    }

    #[test]
    fn embeds_viewer_state() {
        let html = report("L1");
        assert!(!html.contains("__DATA__"));
        assert!(html.contains(r#""window_title":"Link Metrics Graph""#));
        assert!(html.contains(r#""window_title":"Flow Metrics Graph""#));
        assert!(html.contains(r#""label":"L1""#));
        assert!(html.contains(r#""y_label":"Packet Delay (ms)""#));
    }

    #[test]
    fn whole_template_is_emitted() {
        let html = report("L1");
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains(r##"const COLORS = ["#1f77b4", "#ff7f0e", "#2ca02c""##));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn legend_clicks_go_through_the_embedded_table() {
        let html = report("L1");
        assert!(html.contains("toggle(DATA.legend, series.legend_id)"));
        assert!(html.contains("DATA.legend_alpha.hidden"));
        assert!(html.contains(r#""legend_alpha":{"visible":1.0,"hidden":0.2}"#));
        assert!(html.contains(
            r#"{"figure":0,"subplot":0,"series":0,"visible":true,"alpha":1.0}"#
        ));
    }

    #[test]
    fn hidden_entities_start_hidden_in_the_page() {
        let mut viewer = viewer("L1");
        assert_eq!(viewer.hide_entity("L1"), 3);
        let html = render_html_report(&viewer).unwrap();
        assert!(html.contains(
            r#"{"figure":0,"subplot":0,"series":0,"visible":false,"alpha":0.2}"#
        ));
        assert!(html.contains(
            r#"{"figure":1,"subplot":0,"series":0,"visible":true,"alpha":1.0}"#
        ));
    }

    #[test]
    fn entity_ids_cannot_close_the_script() {
        let html = report("</script><b>");
        assert_eq!(html.matches("</script>").count(), 1);
    }
}
