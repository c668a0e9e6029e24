//! Signature inspector.
//!
//! Reads the declared signature of a call target without invoking it.

use crate::domain::Signature;
use crate::ports::CallTarget;

/// Returns the target's signature, or `None` when the target is not invokable.
pub fn describe(target: &CallTarget) -> Option<Signature> {
    match target {
        CallTarget::Function(handler) => handler.signature(),
        CallTarget::Method(handler, method) => handler.method_signature(method),
    }
}
