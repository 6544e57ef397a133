/// Raw email splitting
///
/// Emails are split at the outer header/body boundary only; MIME structure
/// is not interpreted.

pub mod parser;
pub mod types;

pub use parser::{decode_lossy, get_parts, EmailParser};
pub use types::EmailParts;
