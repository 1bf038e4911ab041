//! Method identity as seen by the dispatch protocol

use crate::value::TypeTag;
use std::fmt;

/// Identity of one interface method: name, parameter types, return type.
///
/// Constructed once per declared method (not per call) and borrowed by every
/// invocation that targets the method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    name: String,
    params: Vec<TypeTag>,
    returns: TypeTag,
}

impl MethodDescriptor {
    /// Create a descriptor from a method's declared shape.
    pub fn new(name: impl Into<String>, params: Vec<TypeTag>, returns: TypeTag) -> Self {
        MethodDescriptor {
            name: name.into(),
            params,
            returns,
        }
    }

    /// Method name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter types, in order
    pub fn params(&self) -> &[TypeTag] {
        &self.params
    }

    /// Declared return type
    pub fn returns(&self) -> TypeTag {
        self.returns
    }

    /// Number of declared parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Render the full signature, e.g. `compute(i32) -> i32`.
    pub fn signature(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param.name())?;
        }
        write!(f, ") -> {}", self.returns.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let desc = MethodDescriptor::new("compute", vec![TypeTag::I32], TypeTag::I32);
        assert_eq!(desc.name(), "compute");
        assert_eq!(desc.params(), &[TypeTag::I32]);
        assert_eq!(desc.returns(), TypeTag::I32);
        assert_eq!(desc.arity(), 1);
    }

    #[test]
    fn test_signature() {
        let desc = MethodDescriptor::new("compute", vec![TypeTag::I32], TypeTag::I32);
        assert_eq!(desc.signature(), "compute(i32) -> i32");

        let nullary = MethodDescriptor::new("reset", vec![], TypeTag::Void);
        assert_eq!(nullary.signature(), "reset() -> void");

        let multi = MethodDescriptor::new(
            "blend",
            vec![TypeTag::F64, TypeTag::F64, TypeTag::Bool],
            TypeTag::F64,
        );
        assert_eq!(multi.signature(), "blend(f64, f64, bool) -> f64");
    }
}
