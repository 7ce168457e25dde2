//! Turning collaborator replies into record payloads.
//!
//! [`parser`] reads the label-line reply, [`known`] applies caller ground truth on
//! top, and [`prompt`] renders the request that asks for the label-line format.

pub mod known;
pub mod parser;
pub mod prompt;

pub use known::apply_known_fields;
pub use parser::parse_reply;
