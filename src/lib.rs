pub mod assets;
pub mod config;
pub mod engine;
pub mod render;

// Re-export commonly used types
pub use assets::shaders::{ShaderSource, SourceError};
pub use config::{AppConfig, RenderConfig, WindowConfig};
pub use engine::{EngineError, GlContext};
pub use render::mesh::Mesh;
pub use render::shaders::{ShaderError, ShaderProgram, ShaderStage};
