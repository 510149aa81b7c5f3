//! Reshaping model: turn the event-ordered trace into per-entity columns.
//!
//! Output layout:
//! - `times`: one entry per event, in file order
//! - `links` / `flows`: entity id -> metric name -> values aligned with `times`
//!
//! Entities are fixed by the first event. Every later event must report each
//! of them exactly once and nothing else; anything else is a malformed trace.

pub mod metric;
pub mod summary;

pub use metric::{FLOW_METRICS, LINK_METRICS, Metric};
pub use summary::{SummaryRow, summarize};

use crate::error::{EntityKind, MalformedTrace, TraceError};
use crate::trace::{FlowSample, LinkSample, Trace};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

/// Metric name -> values, in the fixed metric order of the entity kind.
pub type MetricSeries = IndexMap<&'static str, Vec<f64>>;

/// Entity id -> its metric columns, in first-seen order.
pub type EntitySeries = IndexMap<String, MetricSeries>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesTables {
    pub times: Vec<f64>,
    pub links: EntitySeries,
    pub flows: EntitySeries,
}

/// A per-entity record inside one event.
trait Sample {
    const KIND: EntityKind;
    const METRICS: [Metric; 3];

    fn id(&self) -> &str;
    fn values(&self) -> [f64; 3];
}

impl Sample for LinkSample {
    const KIND: EntityKind = EntityKind::Link;
    const METRICS: [Metric; 3] = LINK_METRICS;

    fn id(&self) -> &str {
        &self.link_id
    }

    fn values(&self) -> [f64; 3] {
        [self.rate, self.buffer_occupancy, self.packet_loss]
    }
}

impl Sample for FlowSample {
    const KIND: EntityKind = EntityKind::Flow;
    const METRICS: [Metric; 3] = FLOW_METRICS;

    fn id(&self) -> &str {
        &self.flow_id
    }

    fn values(&self) -> [f64; 3] {
        [self.rate, self.window_size, self.packet_delay]
    }
}

/// Reshape a trace into aligned time-series tables.
pub fn reshape(trace: &Trace) -> Result<TimeSeriesTables, TraceError> {
    let (first, rest) = trace.events.split_first().ok_or(TraceError::Empty)?;

    // 1) Seed entities from the first event.
    let mut times = Vec::with_capacity(trace.events.len());
    times.push(first.time);
    let mut links = seed(&first.links, trace.events.len())?;
    let mut flows = seed(&first.flows, trace.events.len())?;

    // 2) Append every later event.
    for (offset, event) in rest.iter().enumerate() {
        let index = offset + 1;
        times.push(event.time);
        append(&mut links, index, &event.links)?;
        append(&mut flows, index, &event.flows)?;
    }

    debug!(
        events = times.len(),
        links = links.len(),
        flows = flows.len(),
        "reshaped trace"
    );

    Ok(TimeSeriesTables {
        times,
        links,
        flows,
    })
}

fn seed<S: Sample>(samples: &[S], capacity: usize) -> Result<EntitySeries, MalformedTrace> {
    let mut series = EntitySeries::with_capacity(samples.len());
    for sample in samples {
        if series.contains_key(sample.id()) {
            return Err(MalformedTrace::DuplicateEntity {
                event: 0,
                kind: S::KIND,
                id: sample.id().to_string(),
            });
        }

        let mut columns = MetricSeries::with_capacity(3);
        for (metric, value) in S::METRICS.iter().zip(sample.values()) {
            let mut column = Vec::with_capacity(capacity);
            column.push(value);
            columns.insert(metric.name(), column);
        }
        series.insert(sample.id().to_string(), columns);
    }
    Ok(series)
}

fn append<S: Sample>(
    series: &mut EntitySeries,
    event: usize,
    samples: &[S],
) -> Result<(), MalformedTrace> {
    let mut seen = vec![false; series.len()];

    for sample in samples {
        let Some((slot, _, columns)) = series.get_full_mut(sample.id()) else {
            return Err(MalformedTrace::UnknownEntity {
                event,
                kind: S::KIND,
                id: sample.id().to_string(),
            });
        };
        if std::mem::replace(&mut seen[slot], true) {
            return Err(MalformedTrace::DuplicateEntity {
                event,
                kind: S::KIND,
                id: sample.id().to_string(),
            });
        }
        for (column, value) in columns.values_mut().zip(sample.values()) {
            column.push(value);
        }
    }

    if let Some((id, _)) = series.keys().zip(&seen).find(|(_, seen)| !**seen) {
        return Err(MalformedTrace::MissingEntity {
            event,
            kind: S::KIND,
            id: id.clone(),
        });
    }

    Ok(())
}
