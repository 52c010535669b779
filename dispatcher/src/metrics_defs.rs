//! Metrics definitions for the update dispatcher.

use shared::metrics_defs::{MetricDef, MetricType};

pub const UPDATES_SUCCEEDED: MetricDef = MetricDef {
    name: "updates.succeeded",
    metric_type: MetricType::Counter,
    description: "Number of items written back to the collection",
};

pub const UPDATES_FAILED: MetricDef = MetricDef {
    name: "updates.failed",
    metric_type: MetricType::Counter,
    description: "Number of items that could not be updated. Tagged with reason.",
};

pub const UPDATE_WRITE_DURATION: MetricDef = MetricDef {
    name: "updates.write.duration",
    metric_type: MetricType::Histogram,
    description: "Duration of a single remote write in seconds",
};

pub const ALL_METRICS: &[MetricDef] = &[UPDATES_SUCCEEDED, UPDATES_FAILED, UPDATE_WRITE_DURATION];
