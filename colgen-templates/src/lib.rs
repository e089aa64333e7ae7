//! Renders matugen-style templates with a generated scheme and writes them
//! to the config files of the applications that use them.

mod error;
mod outputs;
mod render;

pub use error::TemplateError;
pub use outputs::{
    expand_path, expand_path_with, render_all, render_template, write_outputs, Rendered,
    TemplateTarget, TEMPLATE_OUTPUTS,
};
pub use render::{render, TemplateContext};
