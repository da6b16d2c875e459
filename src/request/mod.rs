//! Help-request domain types and lifecycle rules.

mod transitions;
mod types;

pub use types::{
    HelpRequest, HelpType, Location, NewHelpRequest, RequestId, RequestStatus, UserId,
};
