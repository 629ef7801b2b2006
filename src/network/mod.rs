//! Network layer: request descriptors, the transport seam and the
//! single-flight dispatcher.
//!
//! # Modules
//!
//! - `request`: [`RequestDescriptor`] and URL construction
//! - `transport`: the [`Transport`] trait and its `reqwest` implementation
//! - `dispatcher`: [`Dispatcher`], one outstanding request at a time

pub mod dispatcher;
pub mod request;
pub mod transport;

pub use dispatcher::{Dispatcher, DEFAULT_TIMEOUT};
pub use request::RequestDescriptor;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportFailure};
