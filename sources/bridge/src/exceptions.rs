use tracing::{debug, error};

use crate::{
    dispatch::{ExceptionDispatch, ThrowStatus},
    error::StructuredException,
    frame::FrameStackRef,
};

/// Delivers exceptions by unwinding the frame stack to the innermost frame
/// with a covering handler. The exception is left in that frame's `pending` slot.
#[derive(Debug, Default, Clone, Copy)]
pub struct VmExceptions;

impl ExceptionDispatch for VmExceptions {
    fn throw(&self, exception: &StructuredException, frames: &FrameStackRef) -> ThrowStatus {
        let mut frames = frames.write();

        let Some(index) = frames.handler_for(exception.kind) else {
            return ThrowStatus::NotCaught;
        };

        frames.unwind_to(index);
        if let Some(frame) = frames.top_mut() {
            debug!("{} caught {}", frame, exception.kind);
            frame.pending = Some(exception.clone());
        }

        ThrowStatus::Caught
    }

    fn abort(&self, exception: &StructuredException) -> ! {
        error!("{}", exception);
        error!("fatal: no handler can exist before the VM has started, exiting");
        std::process::exit(1)
    }
}
