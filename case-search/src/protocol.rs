//! Protocol used between the display side and the authority.
//!
//! Every message is a flat JSON object with a `command` discriminator. The display side sends one [`request::Request`]
//! per connection and reads back zero or more [`response::Response`], one per line.

pub mod request;
pub mod response;
