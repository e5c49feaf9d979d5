//! # samlidp-shortcuts
//!
//! Named shortcuts for IdP-initiated SAML logins.
//!
//! An administrator binds a name to a service provider and an optional relay
//! state. A user visiting `/login/{name}` is handed to the SAML engine, which
//! produces the actual response for that service provider.
//!
//! - [`ShortcutRegistry`]: CRUD over shortcuts in a [`KeyValueStore`](samlidp_store::KeyValueStore)
//! - [`FlowResolver`]: shortcut lookup, relay-state resolution and hand-off
//! - [`SharedIdp`]: the SAML engine behind a read-write lock, so
//!   reconfiguration never interleaves with a login in progress
//! - [`routes::create_router`]: the HTTP surface

pub mod engine;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod resolver;
pub mod routes;
pub mod server;
pub mod state;

pub use engine::{SamlEngine, SharedIdp, UpstreamRedirectEngine};
pub use error::ShortcutError;
pub use registry::ShortcutRegistry;
pub use resolver::FlowResolver;
pub use server::ShortcutServer;
pub use state::AppState;
