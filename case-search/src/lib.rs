//! Search a codebase for every identifier-casing variant of a text at once.
//!
//! The free text typed by the user is turned into a single regular expression matching its kebab-case, camelCase,
//! PascalCase, snake_case, CONSTANT_CASE, Capital Case and path/case variants ([`regex_query`]). Options are modeled
//! as groups of dependent checkboxes ([`checkbox`]), some of which, the file filters, are edited at runtime.
//!
//! State lives in two places: the [`authority::Authority`], which validates and persists, and the
//! [`display::Display`], which renders and emits requests. Both communicate only through the messages of
//! [`protocol`], routed by the [`session::Controller`].

pub mod authority;
pub mod cases;
pub mod checkbox;
pub mod client;
pub mod display;
pub mod error;
pub mod history;
pub mod logging;
pub mod protocol;
pub mod regex_query;
pub mod search;
pub mod server;
pub mod session;
pub mod store;
