//! NativeBackend trait — the native boundary as seen by the bridge

use crate::context::DrawContext;
use crate::descriptor::MethodDescriptor;
use crate::handle::NativeHandle;
use crate::value::NativeValue;

/// Result of one native dispatch: a value or a failure diagnostic.
///
/// The boundary is crossed with a tagged result, never a stack unwind.
/// Value and failure are mutually exclusive; there is no side channel.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Dispatch serviced, value returned
    Value(NativeValue),
    /// Dispatch failed; the diagnostic is forwarded verbatim to the caller
    Error(String),
}

impl DispatchOutcome {
    /// Successful outcome carrying null
    #[inline]
    pub fn null() -> Self {
        Self::Value(NativeValue::null())
    }

    /// Successful outcome carrying a bool
    #[inline]
    pub fn bool(val: bool) -> Self {
        Self::Value(NativeValue::bool(val))
    }

    /// Successful outcome carrying an i32
    #[inline]
    pub fn i32(val: i32) -> Self {
        Self::Value(NativeValue::i32(val))
    }

    /// Successful outcome carrying an i64
    #[inline]
    pub fn i64(val: i64) -> Self {
        Self::Value(NativeValue::i64(val))
    }

    /// Successful outcome carrying an f64
    #[inline]
    pub fn f64(val: f64) -> Self {
        Self::Value(NativeValue::f64(val))
    }
}

/// Native side of the dispatch bridge.
///
/// One implementation services every proxy and surface bound to it. Each
/// managed call produces exactly one dispatch, synchronously, on the calling
/// thread; the bridge adds no caching, retries, or recovery of its own.
///
/// Implementations must be `Send + Sync`: a draw call and a proxy call may
/// race on the same handle, and serializing access to the object behind the
/// handle is the backend's responsibility.
pub trait NativeBackend: Send + Sync {
    /// Service an intercepted interface method call.
    ///
    /// - `handle`: token previously minted by this backend
    /// - `method`: identity of the called method (name, params, return type)
    /// - `args`: actual arguments, in declaration order
    fn invoke(
        &self,
        handle: NativeHandle,
        method: &MethodDescriptor,
        args: &[NativeValue],
    ) -> DispatchOutcome;

    /// Service one paint callback.
    ///
    /// Drawing happens entirely inside this call; the context must not be
    /// retained past it. A failure is fatal to the frame.
    fn draw(&self, handle: NativeHandle, ctx: &mut DrawContext<'_>) -> Result<(), String>;
}

/// A backend that rejects every dispatch.
///
/// Useful as a stand-in while wiring up a host, and as the defensive answer
/// for handles nothing is registered for.
pub struct NoopBackend;

impl NativeBackend for NoopBackend {
    fn invoke(
        &self,
        handle: NativeHandle,
        method: &MethodDescriptor,
        _args: &[NativeValue],
    ) -> DispatchOutcome {
        DispatchOutcome::Error(format!(
            "no backend behavior for {} on handle {}",
            method.signature(),
            handle.as_raw()
        ))
    }

    fn draw(&self, handle: NativeHandle, _ctx: &mut DrawContext<'_>) -> Result<(), String> {
        Err(format!("no draw behavior for handle {}", handle.as_raw()))
    }
}
