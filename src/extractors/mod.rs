//! Request extractors: a per-request storage session and a JSON object body.

mod body;
mod session;

pub use body::JsonObject;
pub use session::RequestSession;
