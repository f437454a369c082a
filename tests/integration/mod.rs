//! Integration tests for the metric fan-out registry

mod cli;
mod concurrency;
mod fanout;
mod test_utils;
