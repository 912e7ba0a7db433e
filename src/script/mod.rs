//! Template resolution and rendering: resource + verb to a file, file + params to SQL.

pub mod funcs;
pub mod params;
pub mod renderer;
pub mod resolver;

pub use funcs::FuncRegistry;
pub use params::ParamSet;
pub use renderer::{RenderedStatement, TemplateRenderer};
pub use resolver::TemplateResolver;
