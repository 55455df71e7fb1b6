//! Emitter: renders collected IR declarations as Rust source with serde
//! attributes that preserve the original JSON wire format.

mod emitter;
mod writer;

pub use emitter::{emit, EmitResult};
pub use writer::RustWriter;
