use crate::dlpack::{DLDevice, DeviceKind};
use std::fmt;

/// A device locator: which kind of device, and which device of that kind.
///
/// The index is not checked against available hardware here; a request for
/// a nonexistent device is discovered when the backend attempts allocation
/// or transfer and reports failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Context {
    kind: DeviceKind,
    index: i32,
}

impl Context {
    /// Create a new context from a device kind and index.
    pub const fn new(kind: DeviceKind, index: i32) -> Self {
        Context { kind, index }
    }

    /// Host CPU context with the given index.
    pub const fn cpu(index: i32) -> Self {
        Context::new(DeviceKind::Cpu, index)
    }

    /// Returns the device kind.
    pub fn device_kind(&self) -> DeviceKind {
        self.kind
    }

    /// Returns the device index.
    pub fn device_index(&self) -> i32 {
        self.index
    }

    /// Converts to the interchange representation handed to the backend.
    pub fn to_dlpack(&self) -> DLDevice {
        DLDevice {
            device_type: self.kind as i32,
            device_id: self.index,
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let ctx = Context::new(DeviceKind::Gpu, 2);
        assert_eq!(ctx.device_kind(), DeviceKind::Gpu);
        assert_eq!(ctx.device_index(), 2);
    }

    #[test]
    fn test_to_dlpack() {
        let dl = Context::new(DeviceKind::Metal, 1).to_dlpack();
        assert_eq!(dl.device_type, 8);
        assert_eq!(dl.device_id, 1);

        let dl = Context::cpu(0).to_dlpack();
        assert_eq!(dl.device_type, 1);
        assert_eq!(dl.device_id, 0);
    }

    #[test]
    fn test_no_index_validation() {
        // An absurd index is carried through; only the backend rejects it.
        let ctx = Context::cpu(9999);
        assert_eq!(ctx.to_dlpack().device_id, 9999);
    }

    #[test]
    fn test_display() {
        assert_eq!(Context::cpu(0).to_string(), "cpu:0");
        assert_eq!(Context::new(DeviceKind::Rocm, 3).to_string(), "rocm:3");
    }
}
