//! Kanva SDK - Boundary types for writing native backends
//!
//! This crate provides the minimal types and traits needed to implement the
//! native side of the Kanva dispatch bridge without depending on the bridge
//! crate itself. A backend supplies behavior for two managed-runtime roles:
//!
//! - servicing intercepted interface method calls (`NativeBackend::invoke`)
//! - servicing paint callbacks from a draw surface (`NativeBackend::draw`)
//!
//! Both are keyed by a [`NativeHandle`], an opaque token the backend mints
//! (typically via [`HandleRegistry`]) and recovers on every dispatch.
//!
//! # Example
//!
//! ```ignore
//! use kanva_sdk::*;
//!
//! struct Counter { value: i32 }
//!
//! struct CounterBackend { objects: HandleRegistry<Counter> }
//!
//! impl NativeBackend for CounterBackend {
//!     fn invoke(
//!         &self,
//!         handle: NativeHandle,
//!         method: &MethodDescriptor,
//!         args: &[NativeValue],
//!     ) -> DispatchOutcome {
//!         let Some(mut counter) = self.objects.get_mut(handle) else {
//!             return DispatchOutcome::Error(format!("stale handle {handle:?}"));
//!         };
//!         match method.name() {
//!             "add" => {
//!                 counter.value += args[0].as_i32().unwrap_or(0);
//!                 DispatchOutcome::i32(counter.value)
//!             }
//!             other => DispatchOutcome::Error(format!("unknown method '{other}'")),
//!         }
//!     }
//!
//!     fn draw(&self, _handle: NativeHandle, _ctx: &mut DrawContext<'_>) -> Result<(), String> {
//!         Ok(())
//!     }
//! }
//! ```

#![warn(missing_docs)]

mod backend;
mod context;
mod descriptor;
mod handle;
mod value;

pub use backend::{DispatchOutcome, NativeBackend, NoopBackend};
pub use context::DrawContext;
pub use descriptor::MethodDescriptor;
pub use handle::{HandleRegistry, NativeHandle};
pub use value::{NativeValue, TypeTag};
