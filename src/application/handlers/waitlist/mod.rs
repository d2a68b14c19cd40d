//! Waitlist handlers.

mod join_waitlist;

// Commands
pub use join_waitlist::{JoinWaitlistCommand, JoinWaitlistHandler};

// Queries
pub use join_waitlist::{ListWaitlistRequestsHandler, ListWaitlistRequestsQuery};
