//! # ndbroker Core
//!
//! Shared runtime pieces for the broker back-office client.
//!
//! ## Contents
//!
//! 1. **Single-threaded async with monoio** - one runtime drives all broker calls
//! 2. **Millisecond timestamps** - the request-time source for signing
//! 3. **Exact decimal amounts** - no floating point between wire and display
//! 4. **Unified logging** - ftlog behind `tracing` macros
//! 5. **Id generation** - nanoid-based client order ids

pub mod runtime;
pub mod timing;
pub mod amount;
pub mod logging;
pub mod id_gen;

pub use runtime::{BrokerRuntime, RuntimeConfig};
pub use timing::{format_millis, millis, timestamp_ms_string, PerfTimer};
pub use amount::{Amount, AmountError};
pub use logging::{init_logging, mask_key};
pub use id_gen::{generate_id, ClientOid, RequestId};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::runtime::{BrokerRuntime, RuntimeConfig};
    pub use crate::timing::{format_millis, millis, timestamp_ms_string, PerfTimer};
    pub use crate::amount::{Amount, AmountError};
    pub use crate::id_gen::{generate_id, generate_id_with_prefix, ClientOid, RequestId};
    pub use crate::logging::{init_logging, mask_key};

    pub use monoio;
    pub use serde::{Deserialize, Serialize};
    pub use chrono::{DateTime, Utc};
}
