//! Cosmetic plot settings, selected on the command line.

use clap::ValueEnum;
use serde::Serialize;

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelStyle {
    /// Axis labels carry units, e.g. "Link Rate (Mbps)".
    #[default]
    Units,
    /// Bare metric names.
    Plain,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerStyle {
    /// Connected lines only.
    #[default]
    Line,
    /// Scatter points only.
    Points,
    /// Lines with a point at every sample.
    LinePoints,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlotStyle {
    pub labels: LabelStyle,
    pub marker: MarkerStyle,
}
