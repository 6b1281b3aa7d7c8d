use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("send error: {0}")]
    Send(String),

    #[error("provider returned {status}: {body}")]
    Provider { status: u16, body: String },
}
