//! Runtime model shared by the interpreter: values, runtime errors, the
//! per-run execution context, operator calculators and cancellation.
pub(crate) mod calculator;
pub mod cancellation;
pub mod error;
pub mod execution;
pub(crate) mod value;

pub use cancellation::Canceller;
pub use error::RuntimeError;
pub use execution::StackTraceItem;
