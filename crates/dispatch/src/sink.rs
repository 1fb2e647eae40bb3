//! Caller-supplied delivery capability.

use refbridge_errors::ErrorDetail;
use refbridge_handles::RawHandle;

/// Pair of callbacks receiving exactly one outcome per batch index.
///
/// A capability, not an owned resource: the dispatcher borrows it for the
/// duration of one call and never stores it. Under a parallelizing callee
/// both callbacks may be invoked from multiple threads; synchronizing any
/// shared state they touch is the caller's responsibility.
pub trait CallbackSink {
    fn on_success(&mut self, index: usize, payload: RawHandle);
    fn on_error(&mut self, index: usize, error: ErrorDetail);
}

/// Adapter over a pair of closures.
pub struct FnSink<S, E> {
    on_success: S,
    on_error: E,
}

impl<S, E> FnSink<S, E>
where
    S: FnMut(usize, RawHandle),
    E: FnMut(usize, ErrorDetail),
{
    pub fn new(on_success: S, on_error: E) -> Self {
        Self {
            on_success,
            on_error,
        }
    }
}

impl<S, E> CallbackSink for FnSink<S, E>
where
    S: FnMut(usize, RawHandle),
    E: FnMut(usize, ErrorDetail),
{
    fn on_success(&mut self, index: usize, payload: RawHandle) {
        (self.on_success)(index, payload);
    }

    fn on_error(&mut self, index: usize, error: ErrorDetail) {
        (self.on_error)(index, error);
    }
}
