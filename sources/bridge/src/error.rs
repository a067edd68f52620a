use std::fmt;

use thiserror::Error;

/// The VM exception classes raised from native code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    Exception,
    RuntimeException,
    UnsupportedOperation,
    NativeMethod,
    IllegalArgument,
    NumberFormat,
    NullPointer,
    ArrayIndexOutOfBounds,
    Arithmetic,
    Security,
    NoSuchMethod,
    InternalError,
}

impl ExceptionKind {
    pub fn class_name(&self) -> &'static str {
        match self {
            ExceptionKind::Exception => "java/lang/Exception",
            ExceptionKind::RuntimeException => "java/lang/RuntimeException",
            ExceptionKind::UnsupportedOperation => "java/lang/UnsupportedOperationException",
            ExceptionKind::NativeMethod => "com/sun/jdi/NativeMethodException",
            ExceptionKind::IllegalArgument => "java/lang/IllegalArgumentException",
            ExceptionKind::NumberFormat => "java/lang/NumberFormatException",
            ExceptionKind::NullPointer => "java/lang/NullPointerException",
            ExceptionKind::ArrayIndexOutOfBounds => "java/lang/ArrayIndexOutOfBoundsException",
            ExceptionKind::Arithmetic => "java/lang/ArithmeticException",
            ExceptionKind::Security => "java/lang/SecurityException",
            ExceptionKind::NoSuchMethod => "java/lang/NoSuchMethodException",
            ExceptionKind::InternalError => "java/lang/InternalError",
        }
    }

    pub fn parent(&self) -> Option<ExceptionKind> {
        match self {
            ExceptionKind::Exception | ExceptionKind::InternalError => None,
            ExceptionKind::RuntimeException | ExceptionKind::NoSuchMethod => {
                Some(ExceptionKind::Exception)
            }
            ExceptionKind::NumberFormat => Some(ExceptionKind::IllegalArgument),
            ExceptionKind::UnsupportedOperation
            | ExceptionKind::NativeMethod
            | ExceptionKind::IllegalArgument
            | ExceptionKind::NullPointer
            | ExceptionKind::ArrayIndexOutOfBounds
            | ExceptionKind::Arithmetic
            | ExceptionKind::Security => Some(ExceptionKind::RuntimeException),
        }
    }

    /// Whether a handler for `other` catches this kind.
    pub fn is_a(&self, other: ExceptionKind) -> bool {
        let mut current = Some(*self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.parent();
        }
        false
    }
}

impl fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_name().replace('/', "."))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: {message}")]
pub struct StructuredException {
    pub kind: ExceptionKind,
    pub message: String,
}

impl StructuredException {
    pub fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Throwable {
    #[error(transparent)]
    Runtime(StructuredException),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StructuredException> for Throwable {
    fn from(value: StructuredException) -> Self {
        Throwable::Runtime(value)
    }
}

#[macro_export]
macro_rules! internal {
    ($msg:literal $(,)?) => {
        $crate::error::Throwable::Internal(anyhow::anyhow!($msg))
    };
    ($err:expr $(,)?) => {
        $crate::error::Throwable::Internal(anyhow::anyhow!($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::Throwable::Internal(anyhow::anyhow!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! throw {
    ($kind:expr, $msg:literal $(,)?) => {
        $crate::error::Throwable::Runtime($crate::error::StructuredException::new(
            $kind,
            format!($msg),
        ))
    };
    ($kind:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::error::Throwable::Runtime($crate::error::StructuredException::new(
            $kind,
            format!($fmt, $($arg)*),
        ))
    };
}

/// Failures while building or querying a registry.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("invalid signature key {0:?}")]
    InvalidSignature(String),

    #[error("{key} declares {declared} parameter slots but its descriptor takes {expected}")]
    SlotMismatch {
        key: String,
        declared: usize,
        expected: usize,
    },

    #[error("no native method registered for {0}")]
    NotFound(String),

    #[error("module {module} has invalid keys: {}", keys.join(", "))]
    InvalidModule {
        module: &'static str,
        keys: Vec<String>,
    },
}
