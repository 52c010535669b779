use shared::metrics_defs::{MetricDef, MetricType};

pub const WEBHOOKS_RECEIVED: MetricDef = MetricDef {
    name: "webhooks.received",
    metric_type: MetricType::Counter,
    description: "Webhook deliveries received. Tagged with outcome (rejected, ignored, dispatched).",
};

pub const BATCHES_RECEIVED: MetricDef = MetricDef {
    name: "batches.received",
    metric_type: MetricType::Counter,
    description: "Directly submitted update batches",
};

pub const ALL_METRICS: &[MetricDef] = &[WEBHOOKS_RECEIVED, BATCHES_RECEIVED];
