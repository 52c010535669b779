pub mod client;
pub mod config;
pub mod derive;
pub mod dispatcher;
pub mod metrics_defs;
pub mod protocol;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use client::{CollectionWriter, WebflowClient, WriteError, WriteOutcome};
pub use dispatcher::Dispatcher;
pub use protocol::{ItemFields, UpdateRequest, UpdateResult, UpdateResultBatch};
