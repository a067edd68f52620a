use std::{fmt, sync::Arc};

use parking_lot::RwLock;

use crate::error::{ExceptionKind, StructuredException};

/// Thread id used while the VM is still initialising. No handler can exist yet.
pub const BOOTSTRAP_THREAD: u64 = 0;
pub const MAIN_THREAD: u64 = 1;

pub fn thread_label(thread: u64) -> String {
    match thread {
        MAIN_THREAD => "main".to_string(),
        n => n.to_string(),
    }
}

/// An exception handler installed in a frame. `None` catches everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handler {
    pub catches: Option<ExceptionKind>,
}

impl Handler {
    pub fn covers(&self, kind: ExceptionKind) -> bool {
        match self.catches {
            Some(catches) => kind.is_a(catches),
            None => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub class_name: String,
    pub method_name: String,
    pub method_type: String,
    pub handlers: Vec<Handler>,
    /// Exception delivered to this frame's handler, waiting for the interpreter to pick it up.
    pub pending: Option<StructuredException>,
}

impl Frame {
    pub fn new(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        method_type: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            method_type: method_type.into(),
            handlers: vec![],
            pending: None,
        }
    }

    pub fn catching(mut self, kind: ExceptionKind) -> Self {
        self.handlers.push(Handler {
            catches: Some(kind),
        });
        self
    }

    pub fn catch_all(mut self) -> Self {
        self.handlers.push(Handler { catches: None });
        self
    }

    pub fn handles(&self, kind: ExceptionKind) -> bool {
        self.handlers.iter().any(|h| h.covers(kind))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}.{}", self.class_name, self.method_name)
    }
}

/// The call frames of one interpreter thread, innermost last.
#[derive(Debug)]
pub struct FrameStack {
    thread: u64,
    frames: Vec<Frame>,
}

pub type FrameStackRef = Arc<RwLock<FrameStack>>;

impl FrameStack {
    pub fn new(thread: u64) -> Self {
        Self {
            thread,
            frames: vec![],
        }
    }

    pub fn bootstrap() -> Self {
        Self::new(BOOTSTRAP_THREAD)
    }

    pub fn main() -> Self {
        Self::new(MAIN_THREAD)
    }

    pub fn shared(self) -> FrameStackRef {
        Arc::new(RwLock::new(self))
    }

    pub fn thread(&self) -> u64 {
        self.thread
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the innermost frame with a handler for `kind`.
    pub fn handler_for(&self, kind: ExceptionKind) -> Option<usize> {
        self.frames.iter().rposition(|frame| frame.handles(kind))
    }

    /// Drop every frame above `index`, leaving it on top.
    pub fn unwind_to(&mut self, index: usize) {
        self.frames.truncate(index + 1);
    }
}
