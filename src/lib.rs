//! Client core for the education platform backend.
//!
//! An [`ApiGateway`](gateway::ApiGateway) makes authenticated JSON requests
//! and decodes Server-Sent Event streams; a
//! [`SessionStore`](session::SessionStore) keeps the signed-in user; a
//! [`RouteGuard`](guard::RouteGuard) decides which views may be entered.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod prelude;
pub mod session;
pub mod sse;
pub mod traits;
