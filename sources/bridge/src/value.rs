use std::{collections::HashMap, fmt, sync::Arc};

use enum_as_inner::EnumAsInner;
use parking_lot::RwLock;

use crate::frame::FrameStackRef;

#[derive(Clone, EnumAsInner, Debug, Copy, PartialEq, Eq)]
pub enum IntegralType {
    Int,
    Long,
}

#[derive(Clone, Debug, Copy, PartialEq)]
pub struct Integral {
    pub value: i64,
    pub ty: IntegralType,
}

#[derive(Clone, EnumAsInner, Debug, Copy, PartialEq, Eq)]
pub enum FloatingType {
    Float,
    Double,
}

#[derive(Clone, Debug, Copy, PartialEq)]
pub struct Floating {
    pub value: f64,
    pub ty: FloatingType,
}

pub type ObjectRef = Arc<Object>;

enum ObjectBody {
    Fields(RwLock<HashMap<String, Value>>),
    String(String),
}

/// A heap object as seen by native functions. Layout belongs to the interpreter;
/// the bridge only needs identity, a class name and somewhere to keep state.
pub struct Object {
    class_name: String,
    body: ObjectBody,
}

impl Object {
    pub fn new(class_name: impl Into<String>) -> ObjectRef {
        Arc::new(Self {
            class_name: class_name.into(),
            body: ObjectBody::Fields(RwLock::new(HashMap::new())),
        })
    }

    pub fn string(value: impl Into<String>) -> ObjectRef {
        Arc::new(Self {
            class_name: "java/lang/String".to_string(),
            body: ObjectBody::String(value.into()),
        })
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.body {
            ObjectBody::String(s) => Some(s),
            ObjectBody::Fields(_) => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        match &self.body {
            ObjectBody::Fields(fields) => fields.read().get(name).cloned(),
            ObjectBody::String(_) => None,
        }
    }

    /// Strings are immutable, setting a field on one is ignored.
    pub fn set_field(&self, name: impl Into<String>, value: Value) {
        if let ObjectBody::Fields(fields) = &self.body {
            fields.write().insert(name.into(), value);
        }
    }

    /// Identity hash, stable for the lifetime of the object.
    pub fn identity(this: &ObjectRef) -> usize {
        Arc::as_ptr(this) as usize
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            ObjectBody::String(s) => f.debug_tuple("String").field(s).finish(),
            ObjectBody::Fields(fields) => f
                .debug_struct("Object")
                .field("class_name", &self.class_name)
                .field("fields", &fields.read().keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// One argument or result crossing the bridge.
#[derive(Clone, EnumAsInner)]
pub enum Value {
    Integral(Integral),
    Floating(Floating),
    Object(ObjectRef),
    Null,
    /// The caller's frame stack, only ever present for descriptors that ask for it.
    Context(FrameStackRef),
}

impl Value {
    pub fn int(value: i32) -> Self {
        Value::Integral(Integral {
            value: value.into(),
            ty: IntegralType::Int,
        })
    }

    pub fn long(value: i64) -> Self {
        Value::Integral(Integral {
            value,
            ty: IntegralType::Long,
        })
    }

    pub fn bool(value: bool) -> Self {
        Value::int(i32::from(value))
    }

    pub fn float(value: f32) -> Self {
        Value::Floating(Floating {
            value: value.into(),
            ty: FloatingType::Float,
        })
    }

    pub fn double(value: f64) -> Self {
        Value::Floating(Floating {
            value,
            ty: FloatingType::Double,
        })
    }

    pub fn string(value: impl Into<String>) -> Self {
        Value::Object(Object::string(value))
    }

    /// Operand stack slots taken by this value.
    pub fn slots(&self) -> usize {
        match self {
            Value::Integral(data) => match data.ty {
                IntegralType::Int => 1,
                IntegralType::Long => 2,
            },
            Value::Floating(data) => match data.ty {
                FloatingType::Float => 1,
                FloatingType::Double => 2,
            },
            // These are all technically 'reference' types
            Value::Object(_) | Value::Null | Value::Context(_) => 1,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integral(a), Value::Integral(b)) => a == b,
            (Value::Floating(a), Value::Floating(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                Arc::ptr_eq(a, b)
                    || matches!((a.as_str(), b.as_str()), (Some(x), Some(y)) if x == y)
            }
            (Value::Null, Value::Null) => true,
            (Value::Context(a), Value::Context(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integral(i) => write!(f, "{:?}({})", i.ty, i.value),
            Value::Floating(fl) => write!(f, "{:?}({})", fl.ty, fl.value),
            Value::Object(obj) => write!(f, "{obj:?}"),
            Value::Null => write!(f, "Null"),
            Value::Context(frames) => write!(f, "Context(thread {})", frames.read().thread()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integral(i) => write!(f, "{}", i.value),
            Value::Floating(fl) => write!(f, "{}", fl.value),
            Value::Object(obj) => match obj.as_str() {
                Some(s) => write!(f, "{s}"),
                None => write!(f, "{}@{:x}", obj.class_name(), Object::identity(obj)),
            },
            Value::Null => write!(f, "null"),
            Value::Context(frames) => write!(f, "<frames of thread {}>", frames.read().thread()),
        }
    }
}
