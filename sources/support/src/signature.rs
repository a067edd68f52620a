use std::fmt;

use anyhow::{anyhow, Result};

use crate::descriptor::MethodType;

/// Split a signature key of the form `<class>.<method>(<params>)<return>` into its
/// class path, method name and method type. Only the shape of the key is checked:
/// one `(` followed later by one `)`, a non-empty class path, method name and
/// return descriptor.
pub fn split_key(key: &str) -> Option<(&str, &str, &str)> {
    if key.matches('(').count() != 1 || key.matches(')').count() != 1 {
        return None;
    }

    let open = key.find('(')?;
    let close = key.find(')')?;
    if close < open || close + 1 == key.len() {
        return None;
    }

    let (head, method_type) = key.split_at(open);
    let dot = head.rfind('.')?;
    let (class_name, method_name) = (&head[..dot], &head[dot + 1..]);

    if class_name.is_empty() || method_name.is_empty() {
        return None;
    }

    Some((class_name, method_name, method_type))
}

pub fn is_valid_key(key: &str) -> bool {
    split_key(key).is_some()
}

/// A fully-qualified method signature, e.g. `java/lang/Math.max(JJ)J`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    class_name: String,
    method_name: String,
    descriptor: MethodType,
}

impl Signature {
    pub fn new(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        descriptor: MethodType,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            descriptor,
        }
    }

    pub fn parse(key: &str) -> Result<Self> {
        let (class_name, method_name, method_type) =
            split_key(key).ok_or(anyhow!("malformed signature key {key:?}"))?;

        Ok(Self::new(
            class_name,
            method_name,
            MethodType::parse(method_type.to_string())?,
        ))
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn descriptor(&self) -> &MethodType {
        &self.descriptor
    }
}

impl TryFrom<&str> for Signature {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.class_name, self.method_name, self.descriptor)
    }
}
