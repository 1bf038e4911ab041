//! Draw surface: paint callbacks forwarded to native code
//!
//! The host UI framework owns view construction, layout, and the paint
//! cycle; the bridge's only obligations are to opt in to paint callbacks at
//! construction and to return from each callback synchronously, re-raising
//! any native failure to the framework.

use std::fmt;
use std::sync::Arc;

use kanva_sdk::{DrawContext, NativeBackend, NativeHandle};

use crate::error::DrawError;

/// Host-framework seam for view-like elements.
///
/// The framework calls [`View::on_draw`] once per paint cycle, on its paint
/// thread, for every view whose [`View::wants_draw`] is true. Views that
/// keep the default `false` are skipped by the framework's "nothing to
/// draw" optimization and never receive paint callbacks.
pub trait View {
    /// Whether this view opted in to explicit paint callbacks
    fn wants_draw(&self) -> bool {
        false
    }

    /// Service one paint request.
    ///
    /// The context is valid only for the duration of the call. An error is
    /// fatal to the frame and surfaces through the framework's own error
    /// handling.
    fn on_draw(&mut self, ctx: &mut DrawContext<'_>) -> Result<(), DrawError>;
}

/// View whose painting is implemented entirely by native code.
///
/// On every paint request it forwards `(self.handle, ctx)` to the backend's
/// draw routine and blocks until it returns. Construction opts in to paint
/// callbacks; the surface holds no other state.
pub struct DrawSurface {
    handle: NativeHandle,
    backend: Arc<dyn NativeBackend>,
    wants_draw: bool,
}

impl DrawSurface {
    /// Bind a surface to a native handle and backend.
    pub fn new(handle: NativeHandle, backend: Arc<dyn NativeBackend>) -> Self {
        DrawSurface {
            handle,
            backend,
            // opt in, or the framework never delivers paint requests
            wants_draw: true,
        }
    }

    /// Handle this surface is bound to
    pub fn handle(&self) -> NativeHandle {
        self.handle
    }
}

impl View for DrawSurface {
    fn wants_draw(&self) -> bool {
        self.wants_draw
    }

    fn on_draw(&mut self, ctx: &mut DrawContext<'_>) -> Result<(), DrawError> {
        self.backend.draw(self.handle, ctx).map_err(DrawError)
    }
}

impl fmt::Debug for DrawSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawSurface")
            .field("handle", &self.handle)
            .field("wants_draw", &self.wants_draw)
            .finish_non_exhaustive()
    }
}
