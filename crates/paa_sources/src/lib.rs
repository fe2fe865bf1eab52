pub mod extract;
pub mod loader;

pub use extract::extract_page_text;
pub use loader::{SourceLoader, SourceSpec};
pub use paa_core::MAX_SOURCES;

pub mod prelude {
    pub use super::loader::{SourceLoader, SourceSpec};
    pub use paa_core::{Error, Result};
}
