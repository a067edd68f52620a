#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use bridge::{
    dispatch::{CallSite, Dispatcher, ExceptionDispatch, ThrowStatus},
    error::{ExceptionKind, StructuredException},
    frame::{Frame, FrameStack, FrameStackRef},
    native::{Args, MethodDescriptor, NameAndType, NativeModule, Outcome},
    value::Value,
};
use tracing::Level;
use tracing_subscriber::fmt;

pub fn init_tracing() {
    let format = fmt::format()
        .with_ansi(true)
        .without_time()
        .with_level(true)
        .with_target(false)
        .with_thread_names(false)
        .with_source_location(true)
        .compact();

    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .event_format(format)
        .with_writer(std::io::stderr)
        .try_init();
}

/// A frame stack for `thread` with a single frame and no handlers.
pub fn frames_on(thread: u64) -> FrameStackRef {
    let mut frames = FrameStack::new(thread);
    frames.push(Frame::new("Test", "runTest", "()V"));
    frames.shared()
}

pub fn main_frames() -> FrameStackRef {
    frames_on(bridge::frame::MAIN_THREAD)
}

pub fn site<'a>(class_name: &'a str, method_name: &'a str, method_type: &'a str) -> CallSite<'a> {
    CallSite::new(class_name, method_name, method_type)
}

/// Remembers every throw and answers with a fixed disposition.
#[derive(Default)]
pub struct RecordingExceptions {
    pub catches: bool,
    pub thrown: Mutex<Vec<StructuredException>>,
}

impl RecordingExceptions {
    pub fn catching() -> Self {
        Self {
            catches: true,
            thrown: Mutex::new(vec![]),
        }
    }

    pub fn uncaught() -> Self {
        Self::default()
    }

    pub fn thrown(&self) -> Vec<StructuredException> {
        self.thrown.lock().expect("thrown lock to not be poisoned").clone()
    }
}

impl ExceptionDispatch for RecordingExceptions {
    fn throw(&self, exception: &StructuredException, _: &FrameStackRef) -> ThrowStatus {
        self.thrown
            .lock()
            .expect("thrown lock to not be poisoned")
            .push(exception.clone());

        if self.catches {
            ThrowStatus::Caught
        } else {
            ThrowStatus::NotCaught
        }
    }

    fn abort(&self, exception: &StructuredException) -> ! {
        panic!("fatal abort: {exception}")
    }
}

pub fn dispatcher(catches: bool) -> Dispatcher<RecordingExceptions> {
    Dispatcher::new(RecordingExceptions {
        catches,
        thrown: Mutex::new(vec![]),
    })
}

pub fn raising(kind: ExceptionKind, message: &'static str) -> MethodDescriptor {
    MethodDescriptor::new(0, move |_: Args<'_>| Outcome::exception(kind, message))
}

#[derive(Clone, Debug, Default)]
pub struct CapturedOutput {
    cursor: usize,
    /// Arguments of each call, in the order the native function saw them.
    calls: Vec<Vec<Value>>,
    /// Whether each call received the zero-argument sentinel.
    empty: Vec<bool>,
}

impl CapturedOutput {
    pub fn call(&self, index: usize) -> Vec<Value> {
        self.calls.get(index).cloned().expect("index to be in range")
    }

    pub fn was_empty(&self, index: usize) -> bool {
        *self.empty.get(index).expect("index to be in range")
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn next(&mut self) -> Vec<Value> {
        let cr = self.cursor;
        self.cursor += 1;
        self.calls.get(cr).unwrap().clone()
    }
}

static CAPTURE_COUNTER: AtomicUsize = AtomicUsize::new(0);
lazy_static::lazy_static! {
    static ref CAPTURE_STATE: Mutex<HashMap<usize, CapturedOutput>> = {
        Mutex::new(HashMap::new())
    };
}

pub fn new_capture() -> usize {
    let id = CAPTURE_COUNTER.fetch_add(1, Ordering::SeqCst);
    CAPTURE_STATE
        .lock()
        .expect("capture lock to not be poisoned")
        .insert(id, CapturedOutput::default());
    id
}

pub fn get_captures(id: usize) -> CapturedOutput {
    let states = CAPTURE_STATE
        .lock()
        .expect("capture lock to be not poisoned");
    let state = states.get(&id);
    state.expect("state to exist after test execution").clone()
}

/// A descriptor that records its arguments under capture `id` and returns void.
pub fn capturing(id: usize, param_slots: usize) -> MethodDescriptor {
    MethodDescriptor::new(param_slots, move |args: Args<'_>| {
        let mut states = CAPTURE_STATE
            .lock()
            .expect("capture lock to be not poisoned");
        let state = states
            .get_mut(&id)
            .expect("state to exist during test execution");

        state.calls.push(args.as_slice().to_vec());
        state.empty.push(matches!(args, Args::Empty));

        Outcome::void()
    })
}

/// A module of capturing natives, loaded like any other.
pub struct TestCaptures {
    pub id: usize,
}

impl NativeModule for TestCaptures {
    fn classname(&self) -> &'static str {
        "Test"
    }

    fn methods(&self) -> Vec<(NameAndType, MethodDescriptor)> {
        vec![
            (("capture", "(I)V"), capturing(self.id, 1)),
            (("capture", "(D)V"), capturing(self.id, 2)),
            (("capture", "(Ljava/lang/String;)V"), capturing(self.id, 1)),
        ]
    }
}

pub fn iassert_eq(expected: i64, actual: &Value) {
    let actual = actual.as_integral().expect("value to be integral");
    assert_eq!(expected, actual.value);
}

pub fn dassert_eq(expected: f64, actual: &Value) {
    let actual = actual.as_floating().expect("value to be floating");
    assert_eq!(expected, actual.value);
}

pub fn sassert_eq(expected: &str, actual: &Value) {
    let actual = actual
        .as_object()
        .and_then(|obj| obj.as_str())
        .expect("value to be a string");
    assert_eq!(expected, actual);
}
