use std::collections::HashSet;

use enum_as_inner::EnumAsInner;
use parking_lot::{Condvar, Mutex};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::{
    error::{ExceptionKind, StructuredException},
    frame::{thread_label, FrameStackRef, BOOTSTRAP_THREAD},
    native::{Args, MethodDescriptor, Outcome},
    value::{Object, Value},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrowStatus {
    Caught,
    NotCaught,
}

/// The VM's throw/catch machinery, as seen from the bridge.
pub trait ExceptionDispatch {
    /// Deliver `exception` to the innermost handler on `frames` that covers it.
    fn throw(&self, exception: &StructuredException, frames: &FrameStackRef) -> ThrowStatus;

    /// Stop the VM. Used when no handler can exist yet.
    fn abort(&self, exception: &StructuredException) -> !;
}

/// Where a native call came from. Only used for diagnostics and tracing.
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    pub class_name: &'a str,
    pub method_name: &'a str,
    pub method_type: &'a str,
    pub has_receiver: bool,
}

impl<'a> CallSite<'a> {
    pub fn new(class_name: &'a str, method_name: &'a str, method_type: &'a str) -> Self {
        Self {
            class_name,
            method_name,
            method_type,
            has_receiver: false,
        }
    }

    pub fn with_receiver(mut self) -> Self {
        self.has_receiver = true;
        self
    }

    pub fn signature(&self) -> String {
        format!("{}.{}{}", self.class_name, self.method_name, self.method_type)
    }
}

/// An exception nobody caught. Handed back to the interpreter as a host-level error.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{diagnostic}")]
pub struct PropagatedException {
    pub kind: ExceptionKind,
    pub diagnostic: String,
}

#[derive(Debug, EnumAsInner)]
pub enum CallDisposition {
    /// Normal completion; `None` for void methods.
    Returned(Option<Value>),
    /// A handler took the exception, the interpreter resumes there.
    Caught,
    Propagated(PropagatedException),
}

/// Per-receiver exclusion for thread-safe descriptors.
#[derive(Debug, Default)]
pub struct ReceiverLocks {
    held: Mutex<HashSet<usize>>,
    released: Condvar,
}

pub struct ReceiverGuard<'a> {
    locks: &'a ReceiverLocks,
    receiver: usize,
}

impl ReceiverLocks {
    pub fn acquire(&self, receiver: usize) -> ReceiverGuard<'_> {
        let mut held = self.held.lock();
        while held.contains(&receiver) {
            self.released.wait(&mut held);
        }
        held.insert(receiver);

        ReceiverGuard {
            locks: self,
            receiver,
        }
    }
}

impl Drop for ReceiverGuard<'_> {
    fn drop(&mut self) {
        self.locks.held.lock().remove(&self.receiver);
        self.locks.released.notify_all();
    }
}

pub struct Dispatcher<E> {
    exceptions: E,
    locks: ReceiverLocks,
}

impl<E: ExceptionDispatch> Dispatcher<E> {
    pub fn new(exceptions: E) -> Self {
        Self {
            exceptions,
            locks: ReceiverLocks::default(),
        }
    }

    pub fn exceptions(&self) -> &E {
        &self.exceptions
    }

    /// Run one native call. `args` arrive in stack order, as popped from the operand stack.
    pub fn run(
        &self,
        descriptor: &MethodDescriptor,
        frames: &FrameStackRef,
        site: &CallSite<'_>,
        mut args: Vec<Value>,
        tracing: bool,
    ) -> CallDisposition {
        if descriptor.needs_context() {
            args.push(Value::Context(frames.clone()));
        }

        // Stack order to call order. The context handle ends up first.
        if args.len() > 1 {
            args.reverse();
        }

        let signature = site.signature();
        if tracing {
            info!(
                "native call {} (receiver: {}, {} args)",
                signature,
                site.has_receiver,
                args.len()
            );
        }

        let outcome = if descriptor.is_thread_safe() {
            match receiver_identity(descriptor, site, &args) {
                Ok(receiver) => {
                    let _guard = self.locks.acquire(receiver);
                    descriptor.call(Args::from_slice(&args))
                }
                Err(outcome) => outcome,
            }
        } else {
            descriptor.call(Args::from_slice(&args))
        };

        self.classify(outcome, frames, &signature)
    }

    fn classify(
        &self,
        outcome: Outcome,
        frames: &FrameStackRef,
        signature: &str,
    ) -> CallDisposition {
        let exception = match outcome {
            Outcome::Value(value) => return CallDisposition::Returned(value),
            Outcome::Exception(exception) => exception,
            Outcome::HostError(err) => {
                StructuredException::new(ExceptionKind::NativeMethod, format!("{err:#}"))
            }
        };

        let thread = frames.read().thread();
        let raised = StructuredException::new(
            exception.kind,
            format!(
                "{} in thread: {}, method: {}",
                exception.message,
                thread_label(thread),
                signature
            ),
        );

        debug!("{} raised {}", signature, raised);

        if thread == BOOTSTRAP_THREAD {
            error!("exception during bootstrap: {}", raised);
            self.exceptions.abort(&raised);
        }

        match self.exceptions.throw(&raised, frames) {
            ThrowStatus::Caught => CallDisposition::Caught,
            ThrowStatus::NotCaught => CallDisposition::Propagated(PropagatedException {
                kind: raised.kind,
                diagnostic: raised.message,
            }),
        }
    }
}

fn receiver_identity(
    descriptor: &MethodDescriptor,
    site: &CallSite<'_>,
    args: &[Value],
) -> Result<usize, Outcome> {
    let position = usize::from(descriptor.needs_context());
    match args.get(position) {
        Some(Value::Object(receiver)) if site.has_receiver => Ok(Object::identity(receiver)),
        _ => Err(Outcome::exception(
            ExceptionKind::IllegalArgument,
            "thread-safe native call has no receiver object",
        )),
    }
}
