mod builder;
mod render;
mod syntax;

pub use builder::{SnippetString, escape_literal};
pub use render::{RenderedSnippet, render};
pub use syntax::{Field, FieldKind, Node, SnippetTemplate, TemplateParseError, parse_snippet_template};
