//! Payload preparation seam
//!
//! The domain-specific transform applied to an input payload before dispatch
//! (circuit transpilation against a target's capability profile). It is an
//! external collaborator: deterministic, pure, cheap relative to execution.
//! A failure here means the job was never viably schedulable, so it surfaces
//! synchronously at submission time.

/// Preparation transform failure
#[derive(Debug, Clone, thiserror::Error)]
#[error("transpile failed: {0}")]
pub struct TranspileError(pub String);

/// Pure transform from input payload to dispatch-ready payload
pub trait Transpiler: Send + Sync {
    fn transpile(&self, payload: &[u8], target_name: &str) -> Result<Vec<u8>, TranspileError>;
}

/// Identity transform, used when payloads arrive already prepared for the
/// target
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranspiler;

impl Transpiler for PassthroughTranspiler {
    fn transpile(&self, payload: &[u8], _target_name: &str) -> Result<Vec<u8>, TranspileError> {
        Ok(payload.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_returns_payload_unchanged() {
        let payload = vec![0x01, 0x02, 0x03];
        let out = PassthroughTranspiler
            .transpile(&payload, "aer-simulator")
            .unwrap();
        assert_eq!(out, payload);
    }
}
