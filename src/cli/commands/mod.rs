//! CLI command implementations
//!
//! Every command returns a process exit code:
//! 0 success, 1 partial failure, 2 configuration error, 4 nothing fetched
//! because the API failed, 5 fatal, 130 interrupted.

pub mod export;
pub mod fetch;
pub mod init;
pub mod run;
pub mod validate;
