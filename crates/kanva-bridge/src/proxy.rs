//! Reflective proxy binding: one handler for a whole capability set
//!
//! Rather than generating per-method native bindings, an interface is a
//! dispatch table keyed by method name; a [`Proxy`] implements every method
//! of the set by routing `(method identity, argument list)` through a single
//! [`ProxyDispatcher`]. The host runtime's reflection facility is the
//! external collaborator that intercepts calls and hands them to
//! [`Proxy::call`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use kanva_sdk::{MethodDescriptor, NativeBackend, NativeHandle, NativeValue};

use crate::dispatcher::ProxyDispatcher;
use crate::error::{InterfaceError, InvokeError};

/// Declared shape of an interface: an ordered method set with name lookup.
///
/// Built once per interface and shared (`Arc`) by every proxy bound to it.
pub struct InterfaceDescriptor {
    name: String,
    methods: Vec<MethodDescriptor>,
    lookup: HashMap<String, usize>,
}

impl InterfaceDescriptor {
    /// Declare an interface from its methods.
    ///
    /// # Errors
    /// Rejects declarations where two methods share a name: the dispatch
    /// table is keyed by name alone, so an overload would be unreachable.
    pub fn new(
        name: impl Into<String>,
        methods: Vec<MethodDescriptor>,
    ) -> Result<Self, InterfaceError> {
        let name = name.into();
        let mut lookup = HashMap::with_capacity(methods.len());
        for (index, method) in methods.iter().enumerate() {
            if lookup.insert(method.name().to_string(), index).is_some() {
                return Err(InterfaceError::DuplicateMethod {
                    interface: name,
                    name: method.name().to_string(),
                });
            }
        }
        Ok(InterfaceDescriptor {
            name,
            methods,
            lookup,
        })
    }

    /// Interface name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared methods, in declaration order
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Look up a method by name
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.lookup.get(name).map(|&index| &self.methods[index])
    }

    /// Number of declared methods
    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}

impl fmt::Debug for InterfaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceDescriptor")
            .field("name", &self.name)
            .field("methods", &self.methods.len())
            .finish()
    }
}

/// A managed object implementing an arbitrary interface by forwarding every
/// intercepted method call to native code.
///
/// Binds `(interface, handle, backend)` at construction and holds nothing
/// else; all behavior lives on the native side of the handle.
pub struct Proxy {
    interface: Arc<InterfaceDescriptor>,
    handle: NativeHandle,
    dispatcher: ProxyDispatcher,
}

impl Proxy {
    /// Bind a proxy for `interface` to a native handle and backend.
    pub fn new(
        interface: Arc<InterfaceDescriptor>,
        handle: NativeHandle,
        backend: Arc<dyn NativeBackend>,
    ) -> Self {
        Proxy {
            interface,
            handle,
            dispatcher: ProxyDispatcher::new(backend),
        }
    }

    /// Handle this proxy is bound to
    pub fn handle(&self) -> NativeHandle {
        self.handle
    }

    /// Interface this proxy implements
    pub fn interface(&self) -> &Arc<InterfaceDescriptor> {
        &self.interface
    }

    /// Route one intercepted method call to the backend.
    ///
    /// This is the entry point the host reflection facility calls for every
    /// method of the interface. The result (or failure) is exactly what the
    /// backend computed for `(handle, method, args)`.
    pub fn call(&self, name: &str, args: &[NativeValue]) -> Result<NativeValue, InvokeError> {
        let method = self
            .interface
            .method(name)
            .ok_or_else(|| InvokeError::UnknownMethod {
                interface: self.interface.name().to_string(),
                name: name.to_string(),
            })?;
        self.dispatcher.invoke(self.handle, method, args)
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("interface", &self.interface.name())
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanva_sdk::{DispatchOutcome, DrawContext, TypeTag};

    fn calculator() -> Arc<InterfaceDescriptor> {
        Arc::new(
            InterfaceDescriptor::new(
                "Calculator",
                vec![
                    MethodDescriptor::new("compute", vec![TypeTag::I32], TypeTag::I32),
                    MethodDescriptor::new("reset", vec![], TypeTag::Void),
                ],
            )
            .unwrap(),
        )
    }

    struct EchoBackend;

    impl NativeBackend for EchoBackend {
        fn invoke(
            &self,
            _handle: NativeHandle,
            _method: &MethodDescriptor,
            args: &[NativeValue],
        ) -> DispatchOutcome {
            DispatchOutcome::Value(args.first().copied().unwrap_or_default())
        }

        fn draw(&self, _handle: NativeHandle, _ctx: &mut DrawContext<'_>) -> Result<(), String> {
            Ok(())
        }
    }

    #[test]
    fn test_interface_lookup() {
        let iface = calculator();
        assert_eq!(iface.name(), "Calculator");
        assert_eq!(iface.method_count(), 2);
        assert_eq!(iface.method("compute").unwrap().returns(), TypeTag::I32);
        assert!(iface.method("missing").is_none());
    }

    #[test]
    fn test_duplicate_method_rejected() {
        let err = InterfaceDescriptor::new(
            "Broken",
            vec![
                MethodDescriptor::new("f", vec![], TypeTag::Void),
                MethodDescriptor::new("f", vec![TypeTag::I32], TypeTag::Void),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            InterfaceError::DuplicateMethod {
                interface: "Broken".to_string(),
                name: "f".to_string(),
            }
        );
    }

    #[test]
    fn test_call_routes_through_dispatcher() {
        let proxy = Proxy::new(calculator(), NativeHandle::from_raw(42), Arc::new(EchoBackend));
        let result = proxy.call("compute", &[NativeValue::i32(5)]).unwrap();
        assert_eq!(result, NativeValue::i32(5));
    }

    #[test]
    fn test_unknown_method() {
        let proxy = Proxy::new(calculator(), NativeHandle::from_raw(42), Arc::new(EchoBackend));
        let err = proxy.call("divide", &[]).unwrap_err();
        assert_eq!(
            err,
            InvokeError::UnknownMethod {
                interface: "Calculator".to_string(),
                name: "divide".to_string(),
            }
        );
    }

    #[test]
    fn test_void_method_returns_null() {
        let proxy = Proxy::new(calculator(), NativeHandle::from_raw(42), Arc::new(EchoBackend));
        // EchoBackend returns the first arg, but reset() is void
        let result = proxy.call("reset", &[]).unwrap();
        assert!(result.is_null());
    }
}
