//! Community marketplace backend: points ledger, job board with review
//! queue, best-effort notifications, event enrollment, and admin
//! reporting.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;
