// src/lib.rs

//! orderflow: a small asynchronous step-pipeline engine.
//!
//! A pipeline is an ordered list of named steps run against one shared,
//! lockable context value. Each step has `before`, `on` and `after` handlers;
//! any handler may continue, stop the pipeline early (a handled outcome, not an
//! error) or fail with the pipeline's error type.
//!
//! Pipelines are registered in a [`Registry`] keyed by their context type, so a
//! web handler only needs to build the context and call `registry.run(ctx)`.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::Registry;

/*
    Typical use:
    1. Define a context struct `MyCtx` holding the request input and the
       intermediate results each step fills in.
    2. Build a `Pipeline<MyCtx, MyError>` from step definitions and register
       handlers with `.on_root()` (and `.before_root()` / `.after_root()`).
    3. Register the pipeline in a `Registry<MyError>` once at startup.
    4. Per request: `registry.run(ContextData::new(my_ctx)).await`, then read
       the final state back out of the context.
*/
