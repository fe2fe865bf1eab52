pub mod generator;
pub mod state;

pub use generator::ArticleGenerator;
pub use state::{GenerationState, Notification, NotificationKind};

pub mod prelude {
    pub use super::{ArticleGenerator, GenerationState, Notification, NotificationKind};
    pub use paa_core::{ArticleResult, ArticleVariant, Credential, Error, GenerationRequest, Result};
}
