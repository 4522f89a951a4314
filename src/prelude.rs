//! Prelude module for convenient imports.
//!
//! ```ignore
//! use edu_client::prelude::*;
//! ```

pub use crate::config::GatewayConfig;
pub use crate::error::{GatewayError, SessionError, SinkError};
pub use crate::gateway::{ApiGateway, EventStream, RequestOptions};
pub use crate::guard::{RouteGuard, RoutePolicy, RouteRule, Verdict};
pub use crate::session::{Session, SessionStore, User};
pub use crate::sse::{Payload, SseDecoder, StreamEvent};
pub use crate::traits::{HttpClient, KeyValueStore};
