use std::collections::HashMap;

use support::signature::{is_valid_key, Signature};
use tracing::{debug, trace, warn};

use crate::{
    error::{BridgeError, ExceptionKind},
    native::{
        io::{IOFileDescriptor, IOPrintStream},
        lang::{LangInteger, LangMath, LangObject, LangSystem, LangThread},
        security::SecurityAccessController,
        traps::{Trap, TRAPPED_METHODS},
        Args, MethodDescriptor, NativeModule, Outcome,
    },
    options::{BridgeOptions, KeyPolicy},
    value::Value,
};

/// Signature key to native method. Filled during bootstrap, read-only afterwards.
#[derive(Debug, Default)]
pub struct Registry {
    methods: HashMap<String, MethodDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `key`. The key is stored as given.
    pub fn register(&mut self, key: impl Into<String>, descriptor: MethodDescriptor) {
        let key = key.into();
        trace!("registering {} ({} slots)", key, descriptor.param_slots());

        if self.methods.insert(key.clone(), descriptor).is_some() {
            debug!("replaced existing registration for {}", key);
        }
    }

    /// Like `register`, but refuses malformed keys and, with `check_slots`,
    /// descriptors whose slot count disagrees with the key.
    pub fn register_checked(
        &mut self,
        key: impl Into<String>,
        descriptor: MethodDescriptor,
        check_slots: bool,
    ) -> Result<(), BridgeError> {
        let key = key.into();
        let expected =
            Self::expected_slots(&key).ok_or_else(|| BridgeError::InvalidSignature(key.clone()))?;

        if check_slots && expected != descriptor.param_slots() {
            return Err(BridgeError::SlotMismatch {
                declared: descriptor.param_slots(),
                expected,
                key,
            });
        }

        self.register(key, descriptor);
        Ok(())
    }

    pub fn lookup(&self, key: &str) -> Option<&MethodDescriptor> {
        self.methods.get(key)
    }

    pub fn validate_key(key: &str) -> bool {
        is_valid_key(key)
    }

    /// Parameter slots implied by the key's descriptor, if the key parses.
    pub fn expected_slots(key: &str) -> Option<usize> {
        Signature::parse(key)
            .ok()
            .map(|sig| sig.descriptor().parameter_slots())
    }

    /// Register every method of `module`, returning how many were added.
    pub fn load(
        &mut self,
        module: &dyn NativeModule,
        options: &BridgeOptions,
    ) -> Result<usize, BridgeError> {
        let class = module.classname();
        let entries = module
            .methods()
            .into_iter()
            .map(|((name, ty), descriptor)| (format!("{class}.{name}{ty}"), descriptor))
            .collect::<Vec<_>>();

        let invalid = entries
            .iter()
            .filter(|(key, _)| !is_valid_key(key))
            .map(|(key, _)| key.clone())
            .collect::<Vec<_>>();

        if !invalid.is_empty() {
            match options.key_policy {
                KeyPolicy::Strict => {
                    return Err(BridgeError::InvalidModule {
                        module: class,
                        keys: invalid,
                    })
                }
                KeyPolicy::Lenient => {
                    warn!("{}: at least one key was invalid", class);
                    for key in &invalid {
                        debug!("invalid key {:?}", key);
                    }
                }
            }
        }

        if options.check_slots {
            for (key, descriptor) in &entries {
                if let Some(expected) = Self::expected_slots(key) {
                    if expected != descriptor.param_slots() {
                        return Err(BridgeError::SlotMismatch {
                            key: key.clone(),
                            declared: descriptor.param_slots(),
                            expected,
                        });
                    }
                }
            }
        }

        let count = entries.len();
        for (key, descriptor) in entries {
            self.register(key, descriptor);
        }

        debug!("loaded {} native methods for {}", count, class);
        Ok(count)
    }

    /// The standard registry: every built-in module plus the trapped API surface.
    pub fn bootstrap(options: &BridgeOptions) -> Result<Self, BridgeError> {
        let modules: Vec<Box<dyn NativeModule>> = vec![
            Box::new(LangObject),
            Box::new(LangMath),
            Box::new(LangSystem),
            Box::new(LangThread),
            Box::new(LangInteger),
            Box::new(IOPrintStream),
            Box::new(IOFileDescriptor),
            Box::new(SecurityAccessController),
        ];

        let mut registry = Self::new();
        for module in &modules {
            registry.load(module.as_ref(), options)?;
        }

        for (key, slots, trap) in TRAPPED_METHODS {
            let descriptor = trap.descriptor(*slots);
            match options.key_policy {
                KeyPolicy::Strict => {
                    registry.register_checked(*key, descriptor, options.check_slots)?
                }
                KeyPolicy::Lenient => registry.register(*key, descriptor),
            }
        }

        debug!("bootstrapped {} native methods", registry.len());
        Ok(registry)
    }

    /// Call a native method directly, outside any frame. Arguments are in call order.
    pub fn invoke(&self, key: &str, args: &[Value]) -> Outcome {
        match self.lookup(key) {
            Some(descriptor) => descriptor.call(Args::from_slice(args)),
            None => Outcome::exception(ExceptionKind::NoSuchMethod, key),
        }
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.methods.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// All keys, sorted.
    pub fn signatures(&self) -> Vec<&str> {
        let mut keys = self.keys().collect::<Vec<_>>();
        keys.sort_unstable();
        keys
    }

    /// Signatures still bound to a trap body, sorted.
    pub fn traps(&self) -> Vec<(&str, Trap)> {
        let mut traps = self
            .methods
            .iter()
            .filter_map(|(key, descriptor)| descriptor.trap().map(|trap| (key.as_str(), trap)))
            .collect::<Vec<_>>();
        traps.sort_unstable_by_key(|(key, _)| *key);
        traps
    }

    /// Every problem with the current entries: malformed keys and slot counts
    /// that disagree with their key.
    pub fn verify(&self) -> Vec<BridgeError> {
        self.signatures()
            .into_iter()
            .filter_map(|key| {
                let declared = self.methods.get(key)?.param_slots();
                match Self::expected_slots(key) {
                    None => Some(BridgeError::InvalidSignature(key.to_string())),
                    Some(expected) if expected != declared => Some(BridgeError::SlotMismatch {
                        key: key.to_string(),
                        declared,
                        expected,
                    }),
                    Some(_) => None,
                }
            })
            .collect()
    }
}
