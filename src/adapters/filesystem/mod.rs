//! Local filesystem integration

pub mod sink;

pub use sink::{DryRunSink, FileSink, LocalFileSink};
