pub mod client;
pub mod endpoints;
pub mod session;
pub mod submit;
pub mod transport;

pub use client::ChatClient;
pub use session::{ChatSession, RECONNECT_DELAY};
pub use submit::{DiscussionEndpoint, SubmitError, SubmitResponse};
