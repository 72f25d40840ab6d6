//! OAuth token model and token response parsing.

mod parser;
mod tokens;

pub use parser::parse_token;
pub use tokens::Token;
