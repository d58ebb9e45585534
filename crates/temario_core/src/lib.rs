mod config;
mod error;
mod finding;
mod load;
mod node;
mod walk;

pub use config::{CurationConfig, WordRange};
pub use error::LoadError;
pub use finding::{Finding, Severity};
pub use load::{load_tree, load_tree_str};
pub use node::{Level, ThemeNode, ThemeTree};
pub use walk::{walk, NodeVisit, Walk};
