pub mod batch;
pub mod config;
pub mod dom;
pub mod error;
pub mod inline;
pub mod parser;
pub mod scan;
pub mod style;
pub mod writer;

pub use config::{BatchConfig, InlineOptions};
pub use error::{InlineError, Result};
pub use inline::Inliner;
pub use style::resolver::{ClassResolver, Resolution, StyleBlockResolver, TailwindResolver};
pub use writer::OutputMode;
