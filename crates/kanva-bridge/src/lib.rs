//! Kanva bridge — managed-side dispatch shims over a native backend
//!
//! Two thin shims over one mechanism (forward a described call to a native
//! handle, translate the outcome back into call-or-error semantics):
//!
//! - [`ProxyDispatcher`] / [`Proxy`]: every method call intercepted on a
//!   proxy object implementing an arbitrary interface is forwarded as
//!   `(handle, method descriptor, args)` to the backend, and the backend's
//!   value or failure is surfaced to the original caller.
//! - [`DrawSurface`]: every paint request from the host UI framework is
//!   forwarded as `(handle, drawing context)`; the draw happens entirely
//!   inside the native call and any returned value is discarded.
//!
//! Both shims are stateless, synchronous, and blocking. They introduce no
//! threads, queues, caching, or recovery: a failure from the backend reaches
//! the original caller verbatim, and concurrent dispatches on the same
//! handle are serialized (or not) by the backend alone.

#![warn(missing_docs)]

mod dispatcher;
mod error;
mod proxy;
mod surface;

pub use dispatcher::ProxyDispatcher;
pub use error::{DrawError, InterfaceError, InvokeError};
pub use proxy::{InterfaceDescriptor, Proxy};
pub use surface::{DrawSurface, View};

// Backend-facing types come from the SDK; re-exported so hosts embedding the
// bridge need a single dependency.
pub use kanva_sdk::{
    DispatchOutcome, DrawContext, HandleRegistry, MethodDescriptor, NativeBackend, NativeHandle,
    NativeValue, NoopBackend, TypeTag,
};
