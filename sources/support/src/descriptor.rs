use std::{fmt, iter::Peekable, str::Chars};

use anyhow::{anyhow, Result};
use enum_as_inner::EnumAsInner;

/// <BaseType> ::= 'B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z'
#[derive(EnumAsInner, Debug, PartialEq, Eq, Clone, Copy)]
pub enum BaseType {
    Boolean, // Z
    Char,    // C
    Float,   // F
    Double,  // D
    Byte,    // B
    Short,   // S
    Int,     // I
    Long,    // J
    Void,    // V
}

impl BaseType {
    /// Operand stack slots taken by a value of this type.
    pub fn slots(&self) -> usize {
        match self {
            BaseType::Long | BaseType::Double => 2,
            BaseType::Void => 0,
            _ => 1,
        }
    }

    pub fn tag(&self) -> char {
        match self {
            BaseType::Boolean => 'Z',
            BaseType::Char => 'C',
            BaseType::Float => 'F',
            BaseType::Double => 'D',
            BaseType::Byte => 'B',
            BaseType::Short => 'S',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Void => 'V',
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// <ObjectType> ::= 'L' <ClassName> ';'
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ObjectType {
    pub class_name: String,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{};", self.class_name)
    }
}

/// <ArrayType> ::= '[' <FieldType>
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ArrayType {
    pub field_type: Box<FieldType>,
}

impl fmt::Display for ArrayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.field_type)
    }
}

#[derive(EnumAsInner, Debug, PartialEq, Eq, Clone)]
pub enum FieldType {
    Base(BaseType),
    Object(ObjectType),
    Array(ArrayType),
}

impl FieldType {
    fn parse_from_iterator(chars: &mut Peekable<Chars>) -> Result<Self> {
        let first = chars.next().ok_or(anyhow!("no more chars"))?;

        Ok(match first {
            'B' => FieldType::Base(BaseType::Byte),
            'C' => FieldType::Base(BaseType::Char),
            'D' => FieldType::Base(BaseType::Double),
            'F' => FieldType::Base(BaseType::Float),
            'I' => FieldType::Base(BaseType::Int),
            'J' => FieldType::Base(BaseType::Long),
            'S' => FieldType::Base(BaseType::Short),
            'Z' => FieldType::Base(BaseType::Boolean),
            'V' => FieldType::Base(BaseType::Void),
            '[' => FieldType::Array(ArrayType {
                field_type: Box::new(FieldType::parse_from_iterator(chars)?),
            }),
            'L' => {
                let mut class_name = String::new();
                loop {
                    match chars.next() {
                        Some(';') => break,
                        Some(c) => class_name.push(c),
                        None => return Err(anyhow!("unterminated class name L{class_name}")),
                    }
                }

                if class_name.is_empty() {
                    return Err(anyhow!("empty class name"));
                }

                FieldType::Object(ObjectType { class_name })
            }
            _ => return Err(anyhow!("unknown type {first}")),
        })
    }

    pub fn parse(str: String) -> Result<Self> {
        let mut chars = str.chars().peekable();
        let ty = FieldType::parse_from_iterator(&mut chars)?;

        if let Some(extra) = chars.next() {
            return Err(anyhow!("trailing input after {ty} (at {extra})"));
        }

        Ok(ty)
    }

    /// Operand stack slots taken by a value of this type. References always take one.
    pub fn slots(&self) -> usize {
        match self {
            FieldType::Base(base) => base.slots(),
            FieldType::Object(_) | FieldType::Array(_) => 1,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Base(base) => write!(f, "{base}"),
            FieldType::Object(object) => write!(f, "{object}"),
            FieldType::Array(array) => write!(f, "{array}"),
        }
    }
}

/// <MethodType> ::= '(' { <FieldType> } ')' <FieldType>
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MethodType {
    pub parameters: Vec<FieldType>,
    pub return_type: FieldType,
}

impl MethodType {
    pub fn parse(str: String) -> Result<Self> {
        let mut chars = str.chars().peekable();
        if chars.next() != Some('(') {
            return Err(anyhow!("descriptor did not start with ("));
        }

        let mut parameters = Vec::new();

        loop {
            match chars.peek() {
                Some(')') => break,
                Some(_) => {
                    let parameter = FieldType::parse_from_iterator(&mut chars)?;
                    if parameter == FieldType::Base(BaseType::Void) {
                        return Err(anyhow!("void parameter in descriptor {str}"));
                    }
                    parameters.push(parameter);
                }
                None => return Err(anyhow!("descriptor {str} has no closing )")),
            }
        }

        // Skip )
        chars.next();

        let return_type = FieldType::parse_from_iterator(&mut chars)?;

        if chars.next().is_some() {
            return Err(anyhow!("trailing input after return type in {str}"));
        }

        Ok(MethodType {
            parameters,
            return_type,
        })
    }

    /// Operand stack slots taken by the declared parameters, excluding any receiver.
    pub fn parameter_slots(&self) -> usize {
        self.parameters.iter().map(FieldType::slots).sum()
    }

    pub fn returns_void(&self) -> bool {
        matches!(self.return_type, FieldType::Base(BaseType::Void))
    }
}

impl fmt::Display for MethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for parameter in &self.parameters {
            write!(f, "{parameter}")?;
        }
        write!(f, "){}", self.return_type)
    }
}
