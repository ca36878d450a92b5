//! Output formatting for CLI.

mod json;
mod text;

pub use json::{ChatOutput, JsonFormatter, ProviderOutput};
pub use text::{TextFormatter, truncate};
#[cfg(test)]
mod tests;
