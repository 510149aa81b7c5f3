use crate::config::LabelStyle;
use serde::Serialize;

/// Every quantity the simulator records, three per entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    LinkRate,
    BufferOccupancy,
    PacketLoss,
    FlowRate,
    WindowSize,
    PacketDelay,
}

pub const LINK_METRICS: [Metric; 3] = [
    Metric::LinkRate,
    Metric::BufferOccupancy,
    Metric::PacketLoss,
];
pub const FLOW_METRICS: [Metric; 3] = [Metric::FlowRate, Metric::WindowSize, Metric::PacketDelay];

impl Metric {
    /// Key used in the reshaped tables.
    pub fn name(self) -> &'static str {
        match self {
            Metric::LinkRate => "Link Rate",
            Metric::BufferOccupancy => "Buffer Occupancy",
            Metric::PacketLoss => "Packet Loss",
            Metric::FlowRate => "Flow Rate",
            Metric::WindowSize => "Window Size",
            Metric::PacketDelay => "Packet Delay",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::LinkRate | Metric::FlowRate => "Mbps",
            Metric::BufferOccupancy => "KB",
            Metric::PacketLoss | Metric::WindowSize => "pkts",
            Metric::PacketDelay => "ms",
        }
    }

    /// Axis label.
    pub fn label(self, style: LabelStyle) -> String {
        match style {
            LabelStyle::Units => format!("{} ({})", self.name(), self.unit()),
            LabelStyle::Plain => self.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn labels_follow_style() {
        assert_eq!(Metric::BufferOccupancy.label(LabelStyle::Units), "Buffer Occupancy (KB)");
        assert_eq!(Metric::PacketDelay.label(LabelStyle::Units), "Packet Delay (ms)");
        assert_eq!(Metric::FlowRate.label(LabelStyle::Plain), "Flow Rate");
    }
}
