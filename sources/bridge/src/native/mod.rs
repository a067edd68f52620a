use std::{fmt, sync::Arc};

use enum_as_inner::EnumAsInner;

use crate::{
    error::{ExceptionKind, StructuredException, Throwable},
    frame::FrameStackRef,
    internal, throw,
    value::{ObjectRef, Value},
};

pub mod helpers;
pub mod io;
pub mod lang;
pub mod security;
pub mod traps;

use self::traps::Trap;

/// The arguments of one native call, in call order. A call without arguments
/// always sees `Empty`, never an empty slice.
#[derive(Debug, Clone, Copy)]
pub enum Args<'a> {
    Empty,
    Values(&'a [Value]),
}

impl<'a> Args<'a> {
    pub fn from_slice(values: &'a [Value]) -> Self {
        if values.is_empty() {
            Args::Empty
        } else {
            Args::Values(values)
        }
    }

    pub fn as_slice(&self) -> &'a [Value] {
        match self {
            Args::Empty => &[],
            Args::Values(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Args::Empty)
    }

    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.as_slice().get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Value> {
        self.as_slice().iter()
    }

    fn arg(&self, index: usize) -> Result<&'a Value, Throwable> {
        self.get(index)
            .ok_or_else(|| internal!("missing argument {} (got {})", index, self.len()))
    }

    /// The frame stack handle, which leads the arguments of context-aware descriptors.
    pub fn context(&self) -> Result<&'a FrameStackRef, Throwable> {
        self.arg(0)?
            .as_context()
            .ok_or_else(|| internal!("argument 0 was not a context handle"))
    }

    pub fn integral(&self, index: usize) -> Result<i64, Throwable> {
        self.arg(index)?
            .as_integral()
            .map(|i| i.value)
            .ok_or_else(|| internal!("argument {} was not integral", index))
    }

    pub fn floating(&self, index: usize) -> Result<f64, Throwable> {
        self.arg(index)?
            .as_floating()
            .map(|f| f.value)
            .ok_or_else(|| internal!("argument {} was not floating", index))
    }

    /// A non-null object argument. Null raises a NullPointerException.
    pub fn object(&self, index: usize) -> Result<&'a ObjectRef, Throwable> {
        match self.arg(index)? {
            Value::Object(obj) => Ok(obj),
            Value::Null => Err(throw!(
                ExceptionKind::NullPointer,
                "argument {} was null",
                index
            )),
            _ => Err(internal!("argument {} was not an object", index)),
        }
    }

    pub fn string(&self, index: usize) -> Result<&'a str, Throwable> {
        self.object(index)?
            .as_str()
            .ok_or_else(|| internal!("argument {} was not a string", index))
    }
}

/// What a native function produced. Consumed exactly once by the dispatcher.
#[derive(Debug, EnumAsInner)]
pub enum Outcome {
    /// A normal return; `None` for void methods.
    Value(Option<Value>),
    Exception(StructuredException),
    /// A host-level failure with no VM exception kind.
    HostError(anyhow::Error),
}

impl Outcome {
    pub fn void() -> Self {
        Outcome::Value(None)
    }

    pub fn value(value: Value) -> Self {
        Outcome::Value(Some(value))
    }

    pub fn exception(kind: ExceptionKind, message: impl Into<String>) -> Self {
        Outcome::Exception(StructuredException::new(kind, message))
    }

    pub fn host_error(message: impl fmt::Display) -> Self {
        Outcome::HostError(anyhow::anyhow!("{message}"))
    }
}

impl From<Result<Option<Value>, Throwable>> for Outcome {
    fn from(value: Result<Option<Value>, Throwable>) -> Self {
        match value {
            Ok(value) => Outcome::Value(value),
            Err(Throwable::Runtime(exception)) => Outcome::Exception(exception),
            Err(Throwable::Internal(err)) => Outcome::HostError(err),
        }
    }
}

pub type NativeFunction = Arc<dyn Fn(Args<'_>) -> Outcome + Send + Sync>;

/// Calling convention metadata plus the function that implements the method.
#[derive(Clone)]
pub struct MethodDescriptor {
    param_slots: usize,
    needs_context: bool,
    thread_safe: bool,
    trap: Option<Trap>,
    function: NativeFunction,
}

impl MethodDescriptor {
    pub fn new<F, R>(param_slots: usize, function: F) -> Self
    where
        F: Fn(Args<'_>) -> R + Send + Sync + 'static,
        R: Into<Outcome>,
    {
        Self::from_function(
            param_slots,
            Arc::new(move |args: Args<'_>| -> Outcome { function(args).into() }),
        )
    }

    pub fn from_function(param_slots: usize, function: NativeFunction) -> Self {
        Self {
            param_slots,
            needs_context: false,
            thread_safe: false,
            trap: None,
            function,
        }
    }

    /// The frame stack handle is passed as the first argument.
    pub fn with_context(mut self) -> Self {
        self.needs_context = true;
        self
    }

    /// Calls on the same receiver are serialized by the dispatcher.
    pub fn thread_safe(mut self) -> Self {
        self.thread_safe = true;
        self
    }

    pub(crate) fn as_trap(mut self, trap: Trap) -> Self {
        self.trap = Some(trap);
        self
    }

    /// Operand stack slots taken by the declared parameters. The receiver is not counted.
    pub fn param_slots(&self) -> usize {
        self.param_slots
    }

    pub fn needs_context(&self) -> bool {
        self.needs_context
    }

    pub fn is_thread_safe(&self) -> bool {
        self.thread_safe
    }

    pub fn trap(&self) -> Option<Trap> {
        self.trap
    }

    pub fn function(&self) -> &NativeFunction {
        &self.function
    }

    pub fn call(&self, args: Args<'_>) -> Outcome {
        (self.function)(args)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("param_slots", &self.param_slots)
            .field("needs_context", &self.needs_context)
            .field("thread_safe", &self.thread_safe)
            .field("trap", &self.trap)
            .finish_non_exhaustive()
    }
}

pub type NameAndType = (&'static str, &'static str);

/// A set of native methods for one class.
pub trait NativeModule {
    fn classname(&self) -> &'static str;

    fn methods(&self) -> Vec<(NameAndType, MethodDescriptor)>;
}

#[macro_export]
macro_rules! native {
    ($slots: expr => $method: expr) => {
        $crate::native::MethodDescriptor::new($slots, $method)
    };
    ($slots: expr, context => $method: expr) => {
        $crate::native::MethodDescriptor::new($slots, $method).with_context()
    };
}

#[macro_export]
macro_rules! method {
    (name: $name: expr, descriptor: $descriptor: expr => $method: expr) => {
        (($name, $descriptor), $method)
    };
}

#[macro_export]
macro_rules! module {
    ($name: ident, $class: expr) => {
        pub struct $name;

        impl $name {
            pub const CLASS: &'static str = $class;
        }
    };
}
