//! Figure layout and legend state for the report viewer.
//!
//! The viewer holds two figures (links, flows). Each figure has one subplot per
//! metric; all subplots of a figure share the time axis and start their y axis
//! at zero. Every plotted series gets a legend id, and the [`LegendTable`]
//! maps that id back to the series together with its current visibility. The
//! page script receives the same table and applies [`toggle`]'s rule on click.

use crate::config::PlotStyle;
use crate::model::{
    EntitySeries, FLOW_METRICS, LINK_METRICS, Metric, SummaryRow, TimeSeriesTables, summarize,
};
use serde::Serialize;

pub const TIME_LABEL: &str = "Time (ms)";

/// Legend alpha for a visible series.
pub const ALPHA_VISIBLE: f64 = 1.0;
/// Legend alpha for a hidden series.
pub const ALPHA_HIDDEN: f64 = 0.2;

/// Index into [`LegendTable::entries`].
pub type LegendId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub legend_id: LegendId,
    /// Entity id, verbatim.
    pub label: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subplot {
    pub metric: Metric,
    pub y_label: String,
    pub y_range: AxisRange,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: &'static str,
    pub window_title: &'static str,
    pub x_label: &'static str,
    pub x_range: AxisRange,
    pub times: Vec<f64>,
    pub subplots: Vec<Subplot>,
    pub summary: Vec<SummaryRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendState {
    pub visible: bool,
    pub alpha: f64,
}

impl LegendState {
    fn new(visible: bool) -> Self {
        Self {
            visible,
            alpha: if visible { ALPHA_VISIBLE } else { ALPHA_HIDDEN },
        }
    }
}

/// Where a legend entry points, and how its series is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendEntry {
    pub figure: usize,
    pub subplot: usize,
    pub series: usize,
    #[serde(flatten)]
    pub state: LegendState,
}

/// Alphas the page script applies after a click.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendAlpha {
    pub visible: f64,
    pub hidden: f64,
}

impl Default for LegendAlpha {
    fn default() -> Self {
        Self {
            visible: ALPHA_VISIBLE,
            hidden: ALPHA_HIDDEN,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LegendTable {
    pub entries: Vec<LegendEntry>,
}

impl LegendTable {
    fn register(&mut self, figure: usize, subplot: usize, series: usize) -> LegendId {
        self.entries.push(LegendEntry {
            figure,
            subplot,
            series,
            state: LegendState::new(true),
        });
        self.entries.len() - 1
    }

    pub fn get(&self, id: LegendId) -> Option<&LegendEntry> {
        self.entries.get(id)
    }
}

/// Flip the visibility of the series behind `id`. Unknown ids are ignored.
pub fn toggle(table: &mut LegendTable, id: LegendId) -> Option<LegendState> {
    let entry = table.entries.get_mut(id)?;
    entry.state = LegendState::new(!entry.state.visible);
    Some(entry.state)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewer {
    pub style: PlotStyle,
    pub figures: Vec<Figure>,
    pub legend: LegendTable,
    pub legend_alpha: LegendAlpha,
}

impl Viewer {
    pub fn new(tables: &TimeSeriesTables, style: PlotStyle) -> Self {
        let mut legend = LegendTable::default();
        let x_range = time_range(&tables.times);

        let figures = vec![
            build_figure(
                FigureSpec {
                    index: 0,
                    title: "Link Metrics",
                    window_title: "Link Metrics Graph",
                    metrics: LINK_METRICS,
                },
                tables,
                &tables.links,
                x_range,
                style,
                &mut legend,
            ),
            build_figure(
                FigureSpec {
                    index: 1,
                    title: "Flow Metrics",
                    window_title: "Flow Metrics Graph",
                    metrics: FLOW_METRICS,
                },
                tables,
                &tables.flows,
                x_range,
                style,
                &mut legend,
            ),
        ];

        Self {
            style,
            figures,
            legend,
            legend_alpha: LegendAlpha::default(),
        }
    }

    /// Start with every series of entity `id` hidden, in all subplots.
    /// Returns how many legend entries were switched off.
    pub fn hide_entity(&mut self, id: &str) -> usize {
        let targets: Vec<LegendId> = (0..self.legend.entries.len())
            .filter(|&legend_id| {
                self.series(legend_id).is_some_and(|s| s.label == id)
                    && self.legend.entries[legend_id].state.visible
            })
            .collect();
        for &legend_id in &targets {
            self.on_legend_click(legend_id);
        }
        targets.len()
    }

    /// Click handler for a legend entry.
    pub fn on_legend_click(&mut self, id: LegendId) -> Option<LegendState> {
        toggle(&mut self.legend, id)
    }

    /// The series a legend entry controls.
    pub fn series(&self, id: LegendId) -> Option<&Series> {
        let entry = self.legend.get(id)?;
        self.figures
            .get(entry.figure)?
            .subplots
            .get(entry.subplot)?
            .series
            .get(entry.series)
    }
}

struct FigureSpec {
    index: usize,
    title: &'static str,
    window_title: &'static str,
    metrics: [Metric; 3],
}

fn build_figure(
    spec: FigureSpec,
    tables: &TimeSeriesTables,
    entities: &EntitySeries,
    x_range: AxisRange,
    style: PlotStyle,
    legend: &mut LegendTable,
) -> Figure {
    let mut subplots = Vec::with_capacity(spec.metrics.len());

    for (subplot_index, metric) in spec.metrics.into_iter().enumerate() {
        let mut series = Vec::with_capacity(entities.len());
        for (entity, columns) in entities {
            let values = columns.get(metric.name()).cloned().unwrap_or_default();
            let legend_id = legend.register(spec.index, subplot_index, series.len());
            series.push(Series {
                legend_id,
                label: entity.clone(),
                values,
            });
        }

        subplots.push(Subplot {
            metric,
            y_label: metric.label(style.labels),
            y_range: value_range(&series),
            series,
        });
    }

    Figure {
        title: spec.title,
        window_title: spec.window_title,
        x_label: TIME_LABEL,
        x_range,
        times: tables.times.clone(),
        subplots,
        summary: summarize(entities),
    }
}

/// Shared x axis: the trace's time span, widened to 1 for single-instant traces.
fn time_range(times: &[f64]) -> AxisRange {
    let min = times.iter().copied().fold(f64::INFINITY, f64::min);
    let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return AxisRange { min: 0.0, max: 1.0 };
    }
    if max > min {
        AxisRange { min, max }
    } else {
        AxisRange { min, max: min + 1.0 }
    }
}

/// y axis is pinned at zero; the top follows the largest sample.
fn value_range(series: &[Series]) -> AxisRange {
    let max = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0, f64::max);
    AxisRange {
        min: 0.0,
        max: if max > 0.0 { max } else { 1.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelStyle;
    use crate::model::reshape;
    use crate::trace::parse::parse_trace_str;
    use pretty_assertions::assert_eq;

    fn viewer() -> Viewer {
        let trace = parse_trace_str(
            r#"{"Simulation Event Metrics": [
                {"Time": 0, "LinkData": [
                    {"LinkID": "L1", "LinkRate": 10, "BuffOcc": 0, "PktLoss": 0},
                    {"LinkID": "L2", "LinkRate": 4, "BuffOcc": 12, "PktLoss": 1}
                 ],
                 "FlowData": [{"FlowID": "F1", "FlowRate": 5, "WinSize": 2, "PktDelay": 0}]},
                {"Time": 100, "LinkData": [
                    {"LinkID": "L1", "LinkRate": 20, "BuffOcc": 3, "PktLoss": 0},
                    {"LinkID": "L2", "LinkRate": 8, "BuffOcc": 6, "PktLoss": 2}
                 ],
                 "FlowData": [{"FlowID": "F1", "FlowRate": 7, "WinSize": 4, "PktDelay": 0}]}
            ]}"#,
        )
        .unwrap();
        Viewer::new(&reshape(&trace).unwrap(), PlotStyle::default())
    }

    #[test]
    fn two_figures_with_three_subplots_each() {
        let v = viewer();
        let titles: Vec<&str> = v.figures.iter().map(|f| f.window_title).collect();
        assert_eq!(titles, vec!["Link Metrics Graph", "Flow Metrics Graph"]);

        let links = &v.figures[0];
        let labels: Vec<&str> = links.subplots.iter().map(|s| s.y_label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Link Rate (Mbps)", "Buffer Occupancy (KB)", "Packet Loss (pkts)"]
        );
        assert_eq!(links.x_label, TIME_LABEL);

        let series: Vec<&str> = links.subplots[0]
            .series
            .iter()
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(series, vec!["L1", "L2"]);
        assert_eq!(links.subplots[0].series[0].values, vec![10.0, 20.0]);
    }

    #[test]
    fn plain_labels_drop_units() {
        let trace = parse_trace_str(
            r#"{"Simulation Event Metrics": [{"Time": 0, "LinkData": [], "FlowData": []}]}"#,
        )
        .unwrap();
        let style = PlotStyle {
            labels: LabelStyle::Plain,
            ..PlotStyle::default()
        };
        let v = Viewer::new(&reshape(&trace).unwrap(), style);
        assert_eq!(v.figures[1].subplots[2].y_label, "Packet Delay");
        assert!(v.legend.entries.is_empty());
    }

    #[test]
    fn axes_start_at_zero_and_share_time() {
        let v = viewer();
        for fig in &v.figures {
            assert_eq!(fig.x_range, AxisRange { min: 0.0, max: 100.0 });
            for subplot in &fig.subplots {
                assert_eq!(subplot.y_range.min, 0.0);
            }
        }
        assert_eq!(v.figures[0].subplots[0].y_range.max, 20.0);
        assert_eq!(v.figures[0].subplots[1].y_range.max, 12.0);
        // All-zero column still gets a usable axis.
        assert_eq!(v.figures[1].subplots[2].y_range.max, 1.0);
    }

    #[test]
    fn every_series_has_its_own_legend_entry() {
        let v = viewer();
        // 2 links x 3 metrics + 1 flow x 3 metrics.
        assert_eq!(v.legend.entries.len(), 9);
        for id in 0..v.legend.entries.len() {
            let series = v.series(id).unwrap();
            assert_eq!(series.legend_id, id);
        }
        assert_eq!(v.series(6).unwrap().label, "F1");
    }

    #[test]
    fn toggle_flips_visibility_and_alpha() {
        let mut v = viewer();
        assert_eq!(
            v.on_legend_click(1),
            Some(LegendState {
                visible: false,
                alpha: ALPHA_HIDDEN,
            })
        );
        assert!(!v.legend.entries[1].state.visible);
        assert!(v.legend.entries[0].state.visible);

        assert_eq!(
            v.on_legend_click(1),
            Some(LegendState {
                visible: true,
                alpha: ALPHA_VISIBLE,
            })
        );
    }

    #[test]
    fn hiding_an_entity_switches_off_all_its_subplots() {
        let mut v = viewer();
        assert_eq!(v.hide_entity("L2"), 3);

        let hidden: Vec<LegendId> = (0..v.legend.entries.len())
            .filter(|&id| !v.legend.entries[id].state.visible)
            .collect();
        assert_eq!(hidden, vec![1, 3, 5]);
        assert_eq!(v.legend.entries[3].state.alpha, ALPHA_HIDDEN);

        // Already hidden: nothing left to switch.
        assert_eq!(v.hide_entity("L2"), 0);
        assert_eq!(v.hide_entity("nope"), 0);
    }

    #[test]
    fn toggle_ignores_unknown_ids() {
        let mut table = LegendTable::default();
        assert_eq!(toggle(&mut table, 3), None);
    }

    #[test]
    fn single_instant_trace_still_has_a_time_span() {
        assert_eq!(time_range(&[5.0]), AxisRange { min: 5.0, max: 6.0 });
    }
}
