pub mod adaptor;
pub mod envelope;
pub mod locale;
pub mod presentation;

pub mod prelude {
    pub use super::adaptor::{Skill, Trigger};
    pub use super::envelope::{RequestEnvelope, ResponseEnvelope};
    pub use super::locale::{Locales, Messages};
    pub use super::presentation::Presentation;
}
