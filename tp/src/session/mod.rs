//! Per-user conversation sessions
//!
//! A session holds one user's ConversationContext: the ordered turn history
//! and a reference to their latest planned trip. Sessions are process-local;
//! they are created when a user first shows up and live until explicitly
//! closed.

mod context;
mod manager;

pub use context::ConversationContext;
pub use manager::SessionManager;
