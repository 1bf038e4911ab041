//! The invocation-forwarding protocol
//!
//! One managed call produces exactly one backend dispatch, synchronously, on
//! the calling thread. The dispatcher holds no per-call state and performs
//! no caching or retries; its only job is translating the backend's tagged
//! outcome into call-or-error semantics at the original call site.

use std::fmt;
use std::sync::Arc;

use kanva_sdk::{
    DispatchOutcome, MethodDescriptor, NativeBackend, NativeHandle, NativeValue, TypeTag,
};

use crate::error::InvokeError;

/// Stateless forwarder of intercepted method calls to a native backend.
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct ProxyDispatcher {
    backend: Arc<dyn NativeBackend>,
}

impl ProxyDispatcher {
    /// Create a dispatcher over the given backend.
    pub fn new(backend: Arc<dyn NativeBackend>) -> Self {
        ProxyDispatcher { backend }
    }

    /// Shared backend this dispatcher forwards to.
    pub fn backend(&self) -> &Arc<dyn NativeBackend> {
        &self.backend
    }

    /// Forward one intercepted call and translate its outcome.
    ///
    /// Blocks until the backend returns. On success the backend's value is
    /// handed back untransformed, except that void-returning methods discard
    /// it and the caller receives null. A backend failure becomes
    /// [`InvokeError::Native`] with the diagnostic payload unmodified.
    pub fn invoke(
        &self,
        handle: NativeHandle,
        method: &MethodDescriptor,
        args: &[NativeValue],
    ) -> Result<NativeValue, InvokeError> {
        match self.backend.invoke(handle, method, args) {
            DispatchOutcome::Value(value) => {
                if method.returns() == TypeTag::Void {
                    // whatever the backend returned, a void method has no value
                    return Ok(NativeValue::null());
                }
                if !value.conforms_to(method.returns()) {
                    return Err(InvokeError::ReturnTypeMismatch {
                        method: method.signature(),
                        expected: method.returns().name(),
                        got: value.type_name(),
                    });
                }
                Ok(value)
            }
            DispatchOutcome::Error(diagnostic) => Err(InvokeError::Native(diagnostic)),
        }
    }
}

impl fmt::Debug for ProxyDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the backend trait object carries no Debug bound
        f.debug_struct("ProxyDispatcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstBackend(DispatchOutcome);

    impl NativeBackend for ConstBackend {
        fn invoke(
            &self,
            _handle: NativeHandle,
            _method: &MethodDescriptor,
            _args: &[NativeValue],
        ) -> DispatchOutcome {
            self.0.clone()
        }

        fn draw(
            &self,
            _handle: NativeHandle,
            _ctx: &mut kanva_sdk::DrawContext<'_>,
        ) -> Result<(), String> {
            Ok(())
        }
    }

    fn compute() -> MethodDescriptor {
        MethodDescriptor::new("compute", vec![TypeTag::I32], TypeTag::I32)
    }

    #[test]
    fn test_value_passes_through_untouched() {
        let dispatcher = ProxyDispatcher::new(Arc::new(ConstBackend(DispatchOutcome::i32(25))));
        let result = dispatcher
            .invoke(NativeHandle::from_raw(42), &compute(), &[NativeValue::i32(5)])
            .unwrap();
        assert_eq!(result, NativeValue::i32(25));
    }

    #[test]
    fn test_error_payload_preserved() {
        let dispatcher = ProxyDispatcher::new(Arc::new(ConstBackend(DispatchOutcome::Error(
            "negative input".to_string(),
        ))));
        let err = dispatcher
            .invoke(NativeHandle::from_raw(42), &compute(), &[NativeValue::i32(-1)])
            .unwrap_err();
        assert_eq!(err, InvokeError::Native("negative input".to_string()));
        assert_eq!(err.to_string(), "negative input");
    }

    #[test]
    fn test_void_discards_backend_value() {
        let dispatcher = ProxyDispatcher::new(Arc::new(ConstBackend(DispatchOutcome::i32(99))));
        let method = MethodDescriptor::new("reset", vec![], TypeTag::Void);
        let result = dispatcher
            .invoke(NativeHandle::from_raw(1), &method, &[])
            .unwrap();
        assert!(result.is_null());
    }

    #[test]
    fn test_return_type_mismatch() {
        let dispatcher =
            ProxyDispatcher::new(Arc::new(ConstBackend(DispatchOutcome::bool(true))));
        let err = dispatcher
            .invoke(NativeHandle::from_raw(42), &compute(), &[NativeValue::i32(5)])
            .unwrap_err();
        match err {
            InvokeError::ReturnTypeMismatch { expected, got, .. } => {
                assert_eq!(expected, "i32");
                assert_eq!(got, "bool");
            }
            other => panic!("expected type mismatch, got {other:?}"),
        }
    }
}
