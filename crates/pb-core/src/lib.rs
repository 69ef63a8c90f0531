pub mod config;
pub mod emitter;
pub mod error;
pub mod head;
pub mod id;
pub mod model;
pub mod parser;

pub use config::BuilderConfig;
pub use emitter::emit_canvas;
pub use error::{BuilderError, Result};
pub use head::{DocumentHead, StyleBlock};
pub use id::NodeIndex;
pub use model::*;
pub use parser::parse_canvas;
