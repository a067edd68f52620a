use std::sync::Arc;

use tracing::debug;

use crate::{
    collect::collect_args,
    dispatch::{CallDisposition, CallSite, Dispatcher, ExceptionDispatch},
    error::{BridgeError, Throwable},
    exceptions::VmExceptions,
    frame::FrameStackRef,
    options::BridgeOptions,
    registry::Registry,
    value::Value,
};

/// What the interpreter holds to satisfy `invoke*` instructions with native code.
pub struct NativeBridge<E = VmExceptions> {
    registry: Arc<Registry>,
    dispatcher: Dispatcher<E>,
    options: BridgeOptions,
}

impl NativeBridge<VmExceptions> {
    /// Bootstrap the standard registry and deliver exceptions through the frame stack.
    pub fn boot(options: BridgeOptions) -> Result<Self, BridgeError> {
        let registry = Registry::bootstrap(&options)?;
        Ok(Self::new(Arc::new(registry), VmExceptions, options))
    }
}

impl<E: ExceptionDispatch> NativeBridge<E> {
    pub fn new(registry: Arc<Registry>, exceptions: E, options: BridgeOptions) -> Self {
        Self {
            registry,
            dispatcher: Dispatcher::new(exceptions),
            options,
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Dispatcher<E> {
        &self.dispatcher
    }

    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    pub fn has_native(&self, site: &CallSite<'_>) -> bool {
        self.registry.contains(&site.signature())
    }

    /// Resolve the call site, pop its arguments off `operands` and run it.
    /// On error, including a site with no registered native, the operand stack is untouched.
    pub fn invoke(
        &self,
        frames: &FrameStackRef,
        site: &CallSite<'_>,
        operands: &mut Vec<Value>,
    ) -> Result<CallDisposition, Throwable> {
        let signature = site.signature();
        let descriptor = self
            .registry
            .lookup(&signature)
            .ok_or(BridgeError::NotFound(signature))
            .map_err(anyhow::Error::from)?;

        let args = collect_args(operands, descriptor.param_slots(), site.has_receiver)?;
        debug!("{} collected {} args", site.method_name, args.len());

        Ok(self
            .dispatcher
            .run(descriptor, frames, site, args, self.options.trace))
    }
}
