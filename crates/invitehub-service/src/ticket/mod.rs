//! Invite ticket issuance and claiming.

pub mod registry;

pub use registry::{IssuedTicket, TicketRegistry};
