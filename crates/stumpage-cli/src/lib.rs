//! Library side of the `stumpage` binary: logging setup and the staged
//! unification pipeline.

pub mod logging;
pub mod pipeline;
pub mod types;
