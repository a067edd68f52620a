use std::fmt;

use crate::error::ExceptionKind;

use super::{Args, MethodDescriptor, Outcome};

/// Every trap message starts with this, so unimplemented surface can be found with grep.
pub const TRAP_MARKER: &str = "TRAP:";

/// Placeholder bodies for methods that have no implementation.
/// They never look at their arguments, so any of them fits any arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trap {
    Unsupported,
    Deprecated,
    Undocumented,
    ProtectedAccess,
}

impl Trap {
    pub const ALL: [Trap; 4] = [
        Trap::Unsupported,
        Trap::Deprecated,
        Trap::Undocumented,
        Trap::ProtectedAccess,
    ];

    pub fn message(&self) -> &'static str {
        match self {
            Trap::Unsupported => "TRAP: The requested function is not yet supported",
            Trap::Deprecated => {
                "TRAP: The requested class or function is deprecated and, therefore, not supported"
            }
            Trap::Undocumented => {
                "TRAP: The requested class or function is undocumented and, therefore, not supported"
            }
            Trap::ProtectedAccess => "TRAP: The requested function is protected",
        }
    }

    pub fn raise(&self, _: Args<'_>) -> Outcome {
        Outcome::exception(ExceptionKind::UnsupportedOperation, self.message())
    }

    pub fn descriptor(self, param_slots: usize) -> MethodDescriptor {
        MethodDescriptor::new(param_slots, move |args| self.raise(args)).as_trap(self)
    }
}

impl fmt::Display for Trap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trap::Unsupported => "unsupported",
            Trap::Deprecated => "deprecated",
            Trap::Undocumented => "undocumented",
            Trap::ProtectedAccess => "protected",
        };

        write!(f, "{name}")
    }
}

/// API surface registered as traps: (signature, parameter slots, trap).
pub const TRAPPED_METHODS: &[(&str, usize, Trap)] = &[
    ("java/awt/Image.<clinit>()V", 0, Trap::Unsupported),
    ("java/awt/Image.<init>()V", 0, Trap::Unsupported),
    ("java/awt/ImageCapabilities.<init>(Z)V", 1, Trap::Unsupported),
    (
        "java/awt/image/BufferedImage.<init>(III)V",
        3,
        Trap::Unsupported,
    ),
    (
        "java/awt/image/BufferedImage.<init>(IIILjava/awt/image/IndexColorModel;)V",
        4,
        Trap::Unsupported,
    ),
    ("java/rmi/RMISecurityManager.<clinit>()V", 0, Trap::Deprecated),
    ("java/rmi/RMISecurityManager.<init>()V", 0, Trap::Deprecated),
    (
        "java/security/AccessController.doPrivileged(Ljava/security/PrivilegedAction;)Ljava/lang/Object;",
        1,
        Trap::Deprecated,
    ),
    ("java/lang/Thread.stop()V", 0, Trap::Deprecated),
    ("java/lang/Thread.suspend()V", 0, Trap::Deprecated),
    ("java/lang/Thread.resume()V", 0, Trap::Deprecated),
    ("java/sql/DriverManager.<clinit>()V", 0, Trap::Unsupported),
    (
        "java/sql/DriverPropertyInfo.<init>(Ljava/lang/String;Ljava/lang/String;)V",
        2,
        Trap::Unsupported,
    ),
    (
        "java/util/zip/CheckedInputStream.<init>(Ljava/io/InputStream;Ljava/util/zip/Checksum;)V",
        2,
        Trap::Unsupported,
    ),
    ("sun/misc/Unsafe.getUnsafe()Lsun/misc/Unsafe;", 0, Trap::Undocumented),
    ("java/lang/Object.finalize()V", 0, Trap::ProtectedAccess),
    ("java/lang/Object.clone()Ljava/lang/Object;", 0, Trap::ProtectedAccess),
];
