//! Fetch/save orchestration for restbridge.
//!
//! Keeps a local record store consistent with a REST backend, using the
//! mapping layer to translate between local properties and remote fields.
//!
//! # Components
//!
//! - **[`LocalStore`]**: the persistence seam — fetch records, apply remote
//!   objects with uniquing, save or roll back pending changes
//! - **[`Bridge`]**: the transport seam — opaque fetch/save against the
//!   backend
//! - **[`RequestManager`]**: the orchestrator — builds remote requests from
//!   resolved mappings, runs them through the bridge, and imports the
//!   response back into the store
//!
//! # Fetch flow
//!
//! 1. Read matching local records (read errors degrade to "no local
//!    results" — the remote fetch still runs)
//! 2. Depending on [`FetchKind`], hit the bridge
//! 3. Translate remote fields to local properties through the mapping and
//!    apply them to the store under the entity's uniquing policy

mod bridge;
mod error;
mod manager;
mod request;
mod store;

pub use bridge::{Bridge, RemoteChange, RemoteFetchRequest, RemoteResponse, RemoteSaveRequest};
pub use error::{EngineError, EngineResult};
pub use manager::{FetchOptions, FetchOutcome, ObjectFetch, RequestManager, SaveOutcome};
pub use request::{FetchKind, FetchRequest, SaveWorkflow};
pub use store::{LocalStore, MemoryStore};
