//! Error types for the managed side of the bridge
//!
//! The bridge performs zero local recovery: every failure signalled by the
//! backend is forwarded verbatim to whichever caller initiated the dispatch.

/// Failure of one proxied method invocation.
///
/// Surfaces to the caller exactly like a failure of the interface method
/// itself, preserving the illusion that the proxy is a regular object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeError {
    /// The backend signalled an error while servicing the call.
    /// The payload is the backend's diagnostic, unmodified.
    #[error("{0}")]
    Native(String),

    /// The called method is not part of the proxy's interface
    #[error("interface '{interface}' has no method '{name}'")]
    UnknownMethod {
        /// Interface the proxy implements
        interface: String,
        /// Method name the caller used
        name: String,
    },

    /// The backend returned a value whose runtime type does not match the
    /// method's declared return type
    #[error("{method}: backend returned {got}, declared return type is {expected}")]
    ReturnTypeMismatch {
        /// Full signature of the invoked method
        method: String,
        /// Declared return type name
        expected: &'static str,
        /// Runtime type name of the backend's value
        got: &'static str,
    },
}

/// Failure of one paint cycle.
///
/// Fatal to the frame: the surface re-raises it to the host framework
/// instead of catching or retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("draw failed: {0}")]
pub struct DrawError(pub String);

/// Failure constructing an [`InterfaceDescriptor`].
///
/// [`InterfaceDescriptor`]: crate::InterfaceDescriptor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterfaceError {
    /// Two methods in the declaration share a name
    #[error("interface '{interface}' declares method '{name}' more than once")]
    DuplicateMethod {
        /// Interface being declared
        interface: String,
        /// Colliding method name
        name: String,
    },
}
