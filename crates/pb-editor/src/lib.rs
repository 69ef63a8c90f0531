pub mod commands;
pub mod drag;
pub mod factory;
pub mod history;
pub mod inline;
pub mod input;
pub mod porter;
pub mod session;

pub use commands::{Command, SnapshotPolicy};
pub use factory::CanvasOffset;
pub use history::History;
pub use inline::Prompt;
pub use input::InputEvent;
pub use porter::ExportedLayout;
pub use session::{EditorSession, Outcome};
