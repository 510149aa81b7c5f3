//! Whole-run aggregates shown next to the time traces.

use crate::model::EntitySeries;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesStats {
    /// `None` for an empty column.
    pub fn of(values: &[f64]) -> Option<Self> {
        let (&first, rest) = values.split_first()?;
        let (mut min, mut max, mut sum) = (first, first, first);
        for &v in rest {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        Some(Self {
            mean: sum / values.len() as f64,
            min,
            max,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub entity: String,
    pub metric: &'static str,
    #[serde(flatten)]
    pub stats: SeriesStats,
}

/// One row per (entity, metric), entities in first-seen order.
pub fn summarize(series: &EntitySeries) -> Vec<SummaryRow> {
    let mut rows = Vec::new();
    for (entity, columns) in series {
        for (&metric, values) in columns {
            if let Some(stats) = SeriesStats::of(values) {
                rows.push(SummaryRow {
                    entity: entity.clone(),
                    metric,
                    stats,
                });
            }
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetricSeries;
    use pretty_assertions::assert_eq;

    #[test]
    fn stats_cover_mean_min_max() {
        assert_eq!(
            SeriesStats::of(&[2.0, 6.0, 1.0, 3.0]),
            Some(SeriesStats {
                mean: 3.0,
                min: 1.0,
                max: 6.0,
            })
        );
        assert_eq!(SeriesStats::of(&[]), None);
    }

    #[test]
    fn rows_follow_entity_then_metric_order() {
        let mut series = EntitySeries::new();
        for id in ["L2", "L1"] {
            let mut columns = MetricSeries::new();
            columns.insert("Link Rate", vec![1.0, 3.0]);
            columns.insert("Packet Loss", vec![0.0, 0.0]);
            series.insert(id.to_string(), columns);
        }

        let rows = summarize(&series);
        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.entity.as_str(), r.metric))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("L2", "Link Rate"),
                ("L2", "Packet Loss"),
                ("L1", "Link Rate"),
                ("L1", "Packet Loss"),
            ]
        );
        assert_eq!(rows[0].stats.mean, 2.0);
    }
}
