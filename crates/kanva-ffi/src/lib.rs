//! C FFI bindings for the Kanva dispatch bridge
//!
//! This module lets native code written in C (or anything speaking the C
//! ABI) supply backend behavior and drive proxies and surfaces. The API
//! follows these principles:
//! - ABI-stable (uses only C-compatible types)
//! - Backend behavior supplied as a function-pointer vtable
//! - Error handling via out-parameters
//! - Opaque pointers for bridge objects
//! - Manual memory management
//!
//! Failure diagnostics written by backend callbacks are copied before the
//! dispatch returns; the callback may reuse its buffer afterwards.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr::{self, NonNull};
use std::sync::Arc;

use kanva_bridge::{DrawContext, DrawSurface, InterfaceDescriptor, Proxy, View};
use kanva_sdk::{
    DispatchOutcome, MethodDescriptor, NativeBackend, NativeHandle, NativeValue, TypeTag,
};

// ============================================================================
// Opaque Types
// ============================================================================

/// Opaque handle to an interface declaration under construction
#[repr(C)]
pub struct KanvaInterface {
    _private: [u8; 0],
}

/// Opaque handle to a proxy bound to a native handle
#[repr(C)]
pub struct KanvaProxy {
    _private: [u8; 0],
}

/// Opaque handle to a draw surface bound to a native handle
#[repr(C)]
pub struct KanvaSurface {
    _private: [u8; 0],
}

/// Error information
#[repr(C)]
pub struct KanvaError {
    message: *mut c_char,
}

// Internal representation of an interface declaration (not exposed to C)
struct InterfaceHandle {
    name: String,
    methods: Vec<MethodDescriptor>,
}

// Internal representation of a proxy (not exposed to C)
struct ProxyHandle {
    proxy: Proxy,
}

// Internal representation of a surface (not exposed to C)
struct SurfaceHandle {
    surface: DrawSurface,
}

// ============================================================================
// Backend VTable
// ============================================================================

/// Method identity as seen by a C backend during `invoke`.
///
/// Borrowed for the duration of one callback; the backend must not retain
/// any of the pointers.
#[repr(C)]
pub struct KanvaMethodDesc {
    /// Null-terminated method name
    pub name: *const c_char,
    /// Declared parameter type tags (see `TypeTag` discriminants)
    pub params: *const u8,
    /// Number of declared parameters
    pub param_count: usize,
    /// Declared return type tag
    pub returns: u8,
}

/// Backend entry point servicing one intercepted method call.
///
/// On success, write the result to `result_out` and return 0. On failure,
/// return nonzero and optionally point `error_out` at a null-terminated
/// diagnostic; the message is copied before the call returns.
pub type KanvaInvokeFn = unsafe extern "C" fn(
    user_data: *mut c_void,
    handle: u64,
    method: *const KanvaMethodDesc,
    args: *const NativeValue,
    arg_count: usize,
    result_out: *mut NativeValue,
    error_out: *mut *const c_char,
) -> c_int;

/// Backend entry point servicing one paint callback.
///
/// `ctx` is the framework's drawing context, valid only for this call.
/// Return 0 on success; nonzero with an optional `error_out` diagnostic on
/// failure (fatal to the frame).
pub type KanvaDrawFn = unsafe extern "C" fn(
    user_data: *mut c_void,
    handle: u64,
    ctx: *mut c_void,
    error_out: *mut *const c_char,
) -> c_int;

/// Native backend supplied by C code as a pair of function pointers.
///
/// `user_data` is passed to every callback unchanged. The table is copied
/// at proxy/surface construction, so the struct itself need not outlive the
/// constructor call — but `user_data` and the functions must stay valid for
/// the lifetime of every object built from it, and must tolerate calls from
/// any thread.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct KanvaBackendVTable {
    /// Opaque pointer handed back to every callback
    pub user_data: *mut c_void,
    /// Method-call entry point (required for proxies)
    pub invoke: Option<KanvaInvokeFn>,
    /// Draw entry point (required for surfaces)
    pub draw: Option<KanvaDrawFn>,
}

/// Adapter implementing [`NativeBackend`] over a C vtable.
struct VTableBackend {
    vtable: KanvaBackendVTable,
}

// SAFETY: The vtable contract requires user_data and both callbacks to be
// callable from any thread; the adapter itself holds only the copied table.
unsafe impl Send for VTableBackend {}
unsafe impl Sync for VTableBackend {}

impl VTableBackend {
    /// Read a callback-written diagnostic, copying it immediately.
    unsafe fn take_error(error_ptr: *const c_char, fallback: &str) -> String {
        if error_ptr.is_null() {
            fallback.to_string()
        } else {
            CStr::from_ptr(error_ptr).to_string_lossy().into_owned()
        }
    }
}

impl NativeBackend for VTableBackend {
    fn invoke(
        &self,
        handle: NativeHandle,
        method: &MethodDescriptor,
        args: &[NativeValue],
    ) -> DispatchOutcome {
        let Some(invoke) = self.vtable.invoke else {
            return DispatchOutcome::Error("backend vtable has no invoke entry".to_string());
        };
        let name = match CString::new(method.name()) {
            Ok(name) => name,
            Err(_) => {
                return DispatchOutcome::Error(format!(
                    "method name '{}' contains a NUL byte",
                    method.name()
                ))
            }
        };
        let params: Vec<u8> = method.params().iter().map(|&tag| tag as u8).collect();
        let desc = KanvaMethodDesc {
            name: name.as_ptr(),
            params: params.as_ptr(),
            param_count: params.len(),
            returns: method.returns() as u8,
        };

        let mut result = NativeValue::null();
        let mut error_ptr: *const c_char = ptr::null();
        // SAFETY: desc, args and the out-parameters are valid for the
        // duration of the call; the vtable contract covers the rest.
        let status = unsafe {
            invoke(
                self.vtable.user_data,
                handle.as_raw(),
                &desc,
                args.as_ptr(),
                args.len(),
                &mut result,
                &mut error_ptr,
            )
        };
        if status == 0 {
            DispatchOutcome::Value(result)
        } else {
            // SAFETY: a non-null error_ptr points to a NUL-terminated
            // message the callback keeps valid until we return.
            DispatchOutcome::Error(unsafe {
                Self::take_error(error_ptr, "native invoke failed (no diagnostic)")
            })
        }
    }

    fn draw(&self, handle: NativeHandle, ctx: &mut DrawContext<'_>) -> Result<(), String> {
        let Some(draw) = self.vtable.draw else {
            return Err("backend vtable has no draw entry".to_string());
        };
        let mut error_ptr: *const c_char = ptr::null();
        // SAFETY: the context pointer is framework-owned and valid for this
        // call; the vtable contract covers the callback.
        let status = unsafe {
            draw(
                self.vtable.user_data,
                handle.as_raw(),
                ctx.as_ptr(),
                &mut error_ptr,
            )
        };
        if status == 0 {
            Ok(())
        } else {
            // SAFETY: same contract as invoke's error_out.
            Err(unsafe { Self::take_error(error_ptr, "native draw failed (no diagnostic)") })
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert Rust string to C string (caller must free)
unsafe fn rust_to_c_string(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Create error from a message
unsafe fn create_error(message: &str) -> *mut KanvaError {
    let message = rust_to_c_string(message);
    let err = Box::new(KanvaError { message });
    Box::into_raw(err)
}

/// Set error out-parameter
unsafe fn set_error(error_out: *mut *mut KanvaError, message: &str) {
    if !error_out.is_null() {
        *error_out = create_error(message);
    }
}

/// View a (pointer, len) pair as an argument slice, treating NULL with a
/// zero count as empty.
unsafe fn args_slice<'a>(args: *const NativeValue, arg_count: usize) -> Option<&'a [NativeValue]> {
    if args.is_null() {
        if arg_count == 0 {
            Some(&[])
        } else {
            None
        }
    } else {
        Some(std::slice::from_raw_parts(args, arg_count))
    }
}

// ============================================================================
// Error Functions
// ============================================================================

/// Get the error message from a KanvaError
///
/// # Safety
/// - Error pointer must be valid
/// - The returned string is owned by the error and freed with it
#[no_mangle]
pub unsafe extern "C" fn kanva_error_message(error: *const KanvaError) -> *const c_char {
    if error.is_null() {
        return ptr::null();
    }
    (*error).message
}

/// Free a KanvaError
///
/// # Safety
/// - Error pointer must be valid (written by a kanva_* call) or NULL
/// - Error must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn kanva_error_free(error: *mut KanvaError) {
    if error.is_null() {
        return;
    }
    let err = Box::from_raw(error);
    if !err.message.is_null() {
        drop(CString::from_raw(err.message));
    }
}

// ============================================================================
// Value Functions
// ============================================================================

/// Create a null value
#[no_mangle]
pub extern "C" fn kanva_value_null() -> NativeValue {
    NativeValue::null()
}

/// Create a boolean value (nonzero = true)
#[no_mangle]
pub extern "C" fn kanva_value_bool(value: c_int) -> NativeValue {
    NativeValue::bool(value != 0)
}

/// Create a 32-bit integer value
#[no_mangle]
pub extern "C" fn kanva_value_i32(value: i32) -> NativeValue {
    NativeValue::i32(value)
}

/// Create a 64-bit integer value
#[no_mangle]
pub extern "C" fn kanva_value_i64(value: i64) -> NativeValue {
    NativeValue::i64(value)
}

/// Create a 64-bit float value
#[no_mangle]
pub extern "C" fn kanva_value_f64(value: f64) -> NativeValue {
    NativeValue::f64(value)
}

/// Get a value's type tag (see `TypeTag` discriminants)
#[no_mangle]
pub extern "C" fn kanva_value_tag(value: NativeValue) -> u8 {
    value.tag()
}

/// Extract an i32, writing it to `out`
///
/// # Returns
/// * 0 on success
/// * -1 if the value is not an i32 or `out` is NULL
///
/// # Safety
/// `out`, when non-NULL, must point to writable memory for one i32.
#[no_mangle]
pub unsafe extern "C" fn kanva_value_as_i32(value: NativeValue, out: *mut i32) -> c_int {
    if out.is_null() {
        return -1;
    }
    match value.as_i32() {
        Some(i) => {
            *out = i;
            0
        }
        None => -1,
    }
}

/// Extract an f64, writing it to `out`
///
/// # Returns
/// * 0 on success
/// * -1 if the value is not an f64 or `out` is NULL
///
/// # Safety
/// `out`, when non-NULL, must point to writable memory for one f64.
#[no_mangle]
pub unsafe extern "C" fn kanva_value_as_f64(value: NativeValue, out: *mut f64) -> c_int {
    if out.is_null() {
        return -1;
    }
    match value.as_f64() {
        Some(f) => {
            *out = f;
            0
        }
        None => -1,
    }
}

// ============================================================================
// Interface Declaration Functions
// ============================================================================

/// Start declaring an interface
///
/// # Arguments
/// * `name` - Null-terminated interface name
///
/// # Returns
/// * Non-null pointer to KanvaInterface on success
/// * NULL if `name` is NULL or not valid UTF-8
///
/// # Safety
/// The returned interface must be consumed by `kanva_proxy_new()` or freed
/// with `kanva_interface_free()`.
#[no_mangle]
pub unsafe extern "C" fn kanva_interface_new(name: *const c_char) -> *mut KanvaInterface {
    if name.is_null() {
        return ptr::null_mut();
    }
    let name = match CStr::from_ptr(name).to_str() {
        Ok(s) => s.to_string(),
        Err(_) => return ptr::null_mut(),
    };
    let handle = Box::new(InterfaceHandle {
        name,
        methods: Vec::new(),
    });
    Box::into_raw(handle) as *mut KanvaInterface
}

/// Declare one method on an interface
///
/// # Arguments
/// * `interface` - Interface under construction (must not be NULL)
/// * `name` - Null-terminated method name
/// * `params` - Parameter type tags (may be NULL when `param_count` is 0)
/// * `param_count` - Number of parameters
/// * `returns` - Return type tag
///
/// # Returns
/// * 0 on success
/// * -1 on NULL/invalid arguments or an unknown type tag
///
/// # Safety
/// - Interface pointer must be valid (created by `kanva_interface_new()`)
/// - `params`, when non-NULL, must be valid for `param_count` bytes
#[no_mangle]
pub unsafe extern "C" fn kanva_interface_add_method(
    interface: *mut KanvaInterface,
    name: *const c_char,
    params: *const u8,
    param_count: usize,
    returns: u8,
) -> c_int {
    if interface.is_null() || name.is_null() || (params.is_null() && param_count != 0) {
        return -1;
    }
    let handle = &mut *(interface as *mut InterfaceHandle);

    let name = match CStr::from_ptr(name).to_str() {
        Ok(s) => s,
        Err(_) => return -1,
    };
    let raw_params = if param_count == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(params, param_count)
    };
    let mut param_tags = Vec::with_capacity(param_count);
    for &raw in raw_params {
        match TypeTag::from_raw(raw) {
            Some(tag) => param_tags.push(tag),
            None => return -1,
        }
    }
    let Some(return_tag) = TypeTag::from_raw(returns) else {
        return -1;
    };

    handle
        .methods
        .push(MethodDescriptor::new(name, param_tags, return_tag));
    0
}

/// Free an interface declaration that was not consumed by a proxy
///
/// # Safety
/// - Interface pointer must be valid or NULL
/// - Interface must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn kanva_interface_free(interface: *mut KanvaInterface) {
    if interface.is_null() {
        return;
    }
    drop(Box::from_raw(interface as *mut InterfaceHandle));
}

// ============================================================================
// Proxy Functions
// ============================================================================

/// Create a proxy bound to a native handle and backend
///
/// # Arguments
/// * `vtable` - Backend vtable (copied; must provide `invoke`)
/// * `handle` - Native handle previously minted by the backend
/// * `interface` - Interface declaration (consumed, even on failure)
/// * `error` - Optional pointer to receive error information
///
/// # Returns
/// * Non-null pointer to KanvaProxy on success
/// * NULL on failure (check error parameter)
///
/// # Safety
/// - The returned proxy must be freed with `kanva_proxy_destroy()`
/// - The vtable's `user_data` and callbacks must outlive the proxy
#[no_mangle]
pub unsafe extern "C" fn kanva_proxy_new(
    vtable: *const KanvaBackendVTable,
    handle: u64,
    interface: *mut KanvaInterface,
    error: *mut *mut KanvaError,
) -> *mut KanvaProxy {
    if vtable.is_null() || interface.is_null() {
        set_error(error, "Invalid arguments (null pointer)");
        if !interface.is_null() {
            kanva_interface_free(interface);
        }
        return ptr::null_mut();
    }

    let decl = Box::from_raw(interface as *mut InterfaceHandle);
    let descriptor = match InterfaceDescriptor::new(decl.name, decl.methods) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            set_error(error, &e.to_string());
            return ptr::null_mut();
        }
    };

    let backend = Arc::new(VTableBackend { vtable: *vtable });
    let proxy = Proxy::new(
        Arc::new(descriptor),
        NativeHandle::from_raw(handle),
        backend,
    );
    Box::into_raw(Box::new(ProxyHandle { proxy })) as *mut KanvaProxy
}

/// Invoke one interface method through a proxy
///
/// # Arguments
/// * `proxy` - Pointer to KanvaProxy (must not be NULL)
/// * `method` - Null-terminated method name
/// * `args` - Arguments in declaration order (may be NULL when `arg_count` is 0)
/// * `arg_count` - Number of arguments
/// * `result_out` - Receives the result on success (may be NULL to discard)
/// * `error` - Optional pointer to receive error information
///
/// # Returns
/// * 0 on success
/// * -1 on failure (check error parameter)
///
/// # Safety
/// - Proxy pointer must be valid
/// - `args`, when non-NULL, must be valid for `arg_count` values
#[no_mangle]
pub unsafe extern "C" fn kanva_proxy_call(
    proxy: *const KanvaProxy,
    method: *const c_char,
    args: *const NativeValue,
    arg_count: usize,
    result_out: *mut NativeValue,
    error: *mut *mut KanvaError,
) -> c_int {
    if proxy.is_null() || method.is_null() {
        set_error(error, "Invalid arguments (null pointer)");
        return -1;
    }
    let handle = &*(proxy as *const ProxyHandle);

    let method = match CStr::from_ptr(method).to_str() {
        Ok(s) => s,
        Err(_) => {
            set_error(error, "Invalid UTF-8 in method name");
            return -1;
        }
    };
    let Some(args) = args_slice(args, arg_count) else {
        set_error(error, "NULL args with nonzero arg_count");
        return -1;
    };

    // a panic must not unwind into the C caller
    let outcome = catch_unwind(AssertUnwindSafe(|| handle.proxy.call(method, args)));
    match outcome {
        Ok(Ok(value)) => {
            if !result_out.is_null() {
                *result_out = value;
            }
            0
        }
        Ok(Err(e)) => {
            set_error(error, &e.to_string());
            -1
        }
        Err(_) => {
            set_error(error, "panic during proxy dispatch");
            -1
        }
    }
}

/// Get the native handle a proxy is bound to
///
/// # Safety
/// Proxy pointer must be valid; returns 0 for NULL.
#[no_mangle]
pub unsafe extern "C" fn kanva_proxy_handle(proxy: *const KanvaProxy) -> u64 {
    if proxy.is_null() {
        return 0;
    }
    (*(proxy as *const ProxyHandle)).proxy.handle().as_raw()
}

/// Destroy a proxy
///
/// # Safety
/// - Proxy pointer must be valid (created by `kanva_proxy_new()`) or NULL
/// - Proxy must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn kanva_proxy_destroy(proxy: *mut KanvaProxy) {
    if proxy.is_null() {
        return;
    }
    drop(Box::from_raw(proxy as *mut ProxyHandle));
}

// ============================================================================
// Surface Functions
// ============================================================================

/// Create a draw surface bound to a native handle and backend
///
/// The surface opts in to paint callbacks at construction; the host
/// framework should consult `kanva_surface_wants_draw()`.
///
/// # Arguments
/// * `vtable` - Backend vtable (copied; must provide `draw`)
/// * `handle` - Native handle previously minted by the backend
/// * `error` - Optional pointer to receive error information
///
/// # Returns
/// * Non-null pointer to KanvaSurface on success
/// * NULL on failure (check error parameter)
///
/// # Safety
/// - The returned surface must be freed with `kanva_surface_destroy()`
/// - The vtable's `user_data` and callbacks must outlive the surface
#[no_mangle]
pub unsafe extern "C" fn kanva_surface_new(
    vtable: *const KanvaBackendVTable,
    handle: u64,
    error: *mut *mut KanvaError,
) -> *mut KanvaSurface {
    if vtable.is_null() {
        set_error(error, "Invalid arguments (null pointer)");
        return ptr::null_mut();
    }
    let backend = Arc::new(VTableBackend { vtable: *vtable });
    let surface = DrawSurface::new(NativeHandle::from_raw(handle), backend);
    Box::into_raw(Box::new(SurfaceHandle { surface })) as *mut KanvaSurface
}

/// Whether the surface opted in to explicit paint callbacks
///
/// # Returns
/// * 1 if the surface wants draw callbacks, 0 otherwise (or NULL surface)
///
/// # Safety
/// Surface pointer must be valid or NULL.
#[no_mangle]
pub unsafe extern "C" fn kanva_surface_wants_draw(surface: *const KanvaSurface) -> c_int {
    if surface.is_null() {
        return 0;
    }
    (*(surface as *const SurfaceHandle)).surface.wants_draw() as c_int
}

/// Deliver one paint request to a surface
///
/// # Arguments
/// * `surface` - Pointer to KanvaSurface (must not be NULL)
/// * `ctx` - Framework drawing context, valid only for this call
/// * `error` - Optional pointer to receive error information
///
/// # Returns
/// * 0 on success
/// * -1 on failure; the frame is lost (check error parameter)
///
/// # Safety
/// - Surface pointer must be valid
/// - `ctx` must be the framework's live drawing context for this paint cycle
#[no_mangle]
pub unsafe extern "C" fn kanva_surface_draw(
    surface: *mut KanvaSurface,
    ctx: *mut c_void,
    error: *mut *mut KanvaError,
) -> c_int {
    if surface.is_null() {
        set_error(error, "Invalid arguments (null pointer)");
        return -1;
    }
    let Some(ctx) = NonNull::new(ctx) else {
        set_error(error, "NULL drawing context");
        return -1;
    };
    let handle = &mut *(surface as *mut SurfaceHandle);

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let mut ctx = DrawContext::from_raw(ctx);
        handle.surface.on_draw(&mut ctx)
    }));
    match outcome {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            set_error(error, &e.to_string());
            -1
        }
        Err(_) => {
            set_error(error, "panic during draw dispatch");
            -1
        }
    }
}

/// Get the native handle a surface is bound to
///
/// # Safety
/// Surface pointer must be valid; returns 0 for NULL.
#[no_mangle]
pub unsafe extern "C" fn kanva_surface_handle(surface: *const KanvaSurface) -> u64 {
    if surface.is_null() {
        return 0;
    }
    (*(surface as *const SurfaceHandle)).surface.handle().as_raw()
}

/// Destroy a surface
///
/// # Safety
/// - Surface pointer must be valid (created by `kanva_surface_new()`) or NULL
/// - Surface must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn kanva_surface_destroy(surface: *mut KanvaSurface) {
    if surface.is_null() {
        return;
    }
    drop(Box::from_raw(surface as *mut SurfaceHandle));
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Kanva bridge version string
///
/// # Returns
/// * Null-terminated version string (e.g., "0.1.0")
///
/// # Safety
/// - The returned string is a static string and must not be freed
#[no_mangle]
pub unsafe extern "C" fn kanva_version() -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr() as *const c_char
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    // C-style backend: squares its i32 argument, fails on negative input,
    // records draw dispatches in user_data.
    struct TestState {
        draws: AtomicU64,
        last_draw_ctx: AtomicU64,
    }

    unsafe extern "C" fn test_invoke(
        _user_data: *mut c_void,
        handle: u64,
        method: *const KanvaMethodDesc,
        args: *const NativeValue,
        arg_count: usize,
        result_out: *mut NativeValue,
        error_out: *mut *const c_char,
    ) -> c_int {
        assert_eq!(handle, 42);
        let name = CStr::from_ptr((*method).name).to_str().unwrap();
        assert_eq!(name, "compute");
        assert_eq!(arg_count, 1);

        let n = (*args).as_i32().unwrap();
        if n < 0 {
            *error_out = b"negative input\0".as_ptr() as *const c_char;
            return -1;
        }
        *result_out = NativeValue::i32(n * n);
        0
    }

    unsafe extern "C" fn test_draw(
        user_data: *mut c_void,
        handle: u64,
        ctx: *mut c_void,
        _error_out: *mut *const c_char,
    ) -> c_int {
        assert_eq!(handle, 7);
        let state = &*(user_data as *const TestState);
        state.draws.fetch_add(1, Ordering::Relaxed);
        state.last_draw_ctx.store(ctx as u64, Ordering::Relaxed);
        0
    }

    unsafe extern "C" fn failing_draw(
        _user_data: *mut c_void,
        _handle: u64,
        _ctx: *mut c_void,
        error_out: *mut *const c_char,
    ) -> c_int {
        *error_out = b"canvas lost\0".as_ptr() as *const c_char;
        -1
    }

    fn vtable(state: *mut TestState) -> KanvaBackendVTable {
        KanvaBackendVTable {
            user_data: state as *mut c_void,
            invoke: Some(test_invoke),
            draw: Some(test_draw),
        }
    }

    unsafe fn calculator_proxy(
        vt: &KanvaBackendVTable,
        error: *mut *mut KanvaError,
    ) -> *mut KanvaProxy {
        let iface = kanva_interface_new(b"Calculator\0".as_ptr() as *const c_char);
        assert!(!iface.is_null());
        let params = [TypeTag::I32 as u8];
        let added = kanva_interface_add_method(
            iface,
            b"compute\0".as_ptr() as *const c_char,
            params.as_ptr(),
            1,
            TypeTag::I32 as u8,
        );
        assert_eq!(added, 0);
        kanva_proxy_new(vt, 42, iface, error)
    }

    #[test]
    fn test_proxy_call_success() {
        unsafe {
            let vt = vtable(ptr::null_mut());
            let mut error: *mut KanvaError = ptr::null_mut();
            let proxy = calculator_proxy(&vt, &mut error);
            assert!(!proxy.is_null());
            assert!(error.is_null());
            assert_eq!(kanva_proxy_handle(proxy), 42);

            let args = [kanva_value_i32(5)];
            let mut result = kanva_value_null();
            let status = kanva_proxy_call(
                proxy,
                b"compute\0".as_ptr() as *const c_char,
                args.as_ptr(),
                1,
                &mut result,
                &mut error,
            );
            assert_eq!(status, 0);
            assert!(error.is_null());

            let mut out = 0i32;
            assert_eq!(kanva_value_as_i32(result, &mut out), 0);
            assert_eq!(out, 25);

            kanva_proxy_destroy(proxy);
        }
    }

    #[test]
    fn test_proxy_call_failure_carries_diagnostic() {
        unsafe {
            let vt = vtable(ptr::null_mut());
            let mut error: *mut KanvaError = ptr::null_mut();
            let proxy = calculator_proxy(&vt, &mut error);

            let args = [kanva_value_i32(-1)];
            let status = kanva_proxy_call(
                proxy,
                b"compute\0".as_ptr() as *const c_char,
                args.as_ptr(),
                1,
                ptr::null_mut(),
                &mut error,
            );
            assert_eq!(status, -1);
            assert!(!error.is_null());

            let message = CStr::from_ptr(kanva_error_message(error)).to_str().unwrap();
            assert_eq!(message, "negative input");

            kanva_error_free(error);
            kanva_proxy_destroy(proxy);
        }
    }

    #[test]
    fn test_unknown_method_is_an_error() {
        unsafe {
            let vt = vtable(ptr::null_mut());
            let mut error: *mut KanvaError = ptr::null_mut();
            let proxy = calculator_proxy(&vt, &mut error);

            let status = kanva_proxy_call(
                proxy,
                b"divide\0".as_ptr() as *const c_char,
                ptr::null(),
                0,
                ptr::null_mut(),
                &mut error,
            );
            assert_eq!(status, -1);
            assert!(!error.is_null());

            kanva_error_free(error);
            kanva_proxy_destroy(proxy);
        }
    }

    #[test]
    fn test_surface_draw_roundtrip() {
        unsafe {
            let mut state = TestState {
                draws: AtomicU64::new(0),
                last_draw_ctx: AtomicU64::new(0),
            };
            let vt = vtable(&mut state);
            let mut error: *mut KanvaError = ptr::null_mut();

            let surface = kanva_surface_new(&vt, 7, &mut error);
            assert!(!surface.is_null());
            assert_eq!(kanva_surface_wants_draw(surface), 1);
            assert_eq!(kanva_surface_handle(surface), 7);

            let mut frame = 0u64;
            let ctx = &mut frame as *mut u64 as *mut c_void;
            let status = kanva_surface_draw(surface, ctx, &mut error);
            assert_eq!(status, 0);
            assert!(error.is_null());
            assert_eq!(state.draws.load(Ordering::Relaxed), 1);
            assert_eq!(state.last_draw_ctx.load(Ordering::Relaxed), ctx as u64);

            kanva_surface_destroy(surface);
        }
    }

    #[test]
    fn test_surface_draw_failure() {
        unsafe {
            let vt = KanvaBackendVTable {
                user_data: ptr::null_mut(),
                invoke: None,
                draw: Some(failing_draw),
            };
            let mut error: *mut KanvaError = ptr::null_mut();
            let surface = kanva_surface_new(&vt, 7, &mut error);

            let mut frame = 0u64;
            let status = kanva_surface_draw(
                surface,
                &mut frame as *mut u64 as *mut c_void,
                &mut error,
            );
            assert_eq!(status, -1);
            assert!(!error.is_null());

            let message = CStr::from_ptr(kanva_error_message(error)).to_str().unwrap();
            assert!(message.contains("canvas lost"));

            kanva_error_free(error);
            kanva_surface_destroy(surface);
        }
    }

    #[test]
    fn test_null_argument_handling() {
        unsafe {
            let mut error: *mut KanvaError = ptr::null_mut();

            assert!(kanva_proxy_new(ptr::null(), 1, ptr::null_mut(), &mut error).is_null());
            assert!(!error.is_null());
            kanva_error_free(error);

            let mut error: *mut KanvaError = ptr::null_mut();
            let status = kanva_proxy_call(ptr::null(), ptr::null(), ptr::null(), 0, ptr::null_mut(), &mut error);
            assert_eq!(status, -1);
            kanva_error_free(error);

            assert_eq!(kanva_surface_wants_draw(ptr::null()), 0);
            kanva_proxy_destroy(ptr::null_mut());
            kanva_surface_destroy(ptr::null_mut());
            kanva_interface_free(ptr::null_mut());
        }
    }

    #[test]
    fn test_version() {
        unsafe {
            let version = kanva_version();
            assert!(!version.is_null());
            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert!(!version_str.is_empty());
        }
    }
}
