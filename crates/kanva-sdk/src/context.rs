//! Per-frame drawing context on loan from the UI framework

use std::ffi::c_void;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Drawing context supplied by the host UI framework for one paint cycle.
///
/// The framework owns the underlying object; this wrapper only carries the
/// pointer across the dispatch boundary. The `'frame` lifetime ties the
/// context to the paint call that produced it, so it cannot be stashed and
/// used after the frame ends.
pub struct DrawContext<'frame> {
    raw: NonNull<c_void>,
    _frame: PhantomData<&'frame mut c_void>,
}

impl<'frame> DrawContext<'frame> {
    /// Wrap a framework-supplied drawing context pointer.
    ///
    /// # Safety
    /// `raw` must point to the framework's drawing context for the current
    /// paint cycle and must stay valid for `'frame`.
    pub unsafe fn from_raw(raw: NonNull<c_void>) -> Self {
        DrawContext {
            raw,
            _frame: PhantomData,
        }
    }

    /// Raw pointer handed to the native draw routine.
    ///
    /// Only meaningful to the native side for the duration of the call.
    pub fn as_ptr(&mut self) -> *mut c_void {
        self.raw.as_ptr()
    }
}

impl fmt::Debug for DrawContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DrawContext").field(&self.raw).finish()
    }
}
