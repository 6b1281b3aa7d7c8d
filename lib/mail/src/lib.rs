pub mod error;
pub mod http;
pub mod memory;
pub mod traits;

pub use error::MailError;
pub use http::HttpMailer;
pub use memory::MemoryMailer;
pub use traits::{Email, Mailer, NoopMailer};
