//! Abstract syntax description language (ASDL) grammars.
//!
//! An ASDL grammar declares primitive types (leaf tokens) and composite types.
//! Each composite type has one or more constructors and each constructor has an ordered list of
//! typed fields with a cardinality. For example:
//!
//! ```text
//! var, pred
//!
//! expr = Variable(var variable)
//!      | Apply(pred predicate, expr* arguments)
//! ```
mod ast;
mod parser;

pub use ast::{AbstractSyntaxTree, AstError, FieldValue, RealizedField};
pub use parser::AsdlError;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Suffix marking a frontier node label of a field with [`Cardinality::Multiple`].
pub const MULTIPLE_SUFFIX: char = '*';

/// Grammar queries needed to track the frontier of a partially derived tree.
pub trait Grammar {
    /// Whether a frontier node with this label accepts zero or more children.
    ///
    /// Such a node stays on the frontier when a rule is applied to it.
    fn mul_cardinality(&self, node: &str) -> bool;
}

impl<T: Grammar + ?Sized> Grammar for &T {
    #[inline]
    fn mul_cardinality(&self, node: &str) -> bool {
        T::mul_cardinality(self, node)
    }
}

impl<T: Grammar + ?Sized> Grammar for Box<T> {
    #[inline]
    fn mul_cardinality(&self, node: &str) -> bool {
        T::mul_cardinality(self, node)
    }
}

/// Whether a type is a primitive (token) type or a composite (tree) type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Primitive,
    Composite,
}

/// A named ASDL type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AsdlType {
    pub name: String,
    pub kind: TypeKind,
}

impl AsdlType {
    pub fn primitive<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Primitive,
        }
    }

    pub fn composite<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Composite,
        }
    }

    #[inline]
    pub fn is_primitive(&self) -> bool {
        self.kind == TypeKind::Primitive
    }

    #[inline]
    pub fn is_composite(&self) -> bool {
        self.kind == TypeKind::Composite
    }
}

impl fmt::Display for AsdlType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Number of values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// Exactly one value.
    Single,
    /// Zero or one value. Written `type?`.
    Optional,
    /// Zero or more values. Written `type*`.
    Multiple,
}

impl Cardinality {
    /// Suffix used for this cardinality in ASDL text.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Single => "",
            Self::Optional => "?",
            Self::Multiple => "*",
        }
    }

    /// Whether `count` values are allowed.
    pub const fn allows(self, count: usize) -> bool {
        match self {
            Self::Single => count == 1,
            Self::Optional => count <= 1,
            Self::Multiple => true,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Optional => "optional",
            Self::Multiple => "multiple",
        })
    }
}

/// A constructor field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: AsdlType,
    pub cardinality: Cardinality,
}

impl Field {
    pub fn new<S: Into<String>>(name: S, ty: AsdlType, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            ty,
            cardinality,
        }
    }

    /// Label of the frontier node that this field creates when its constructor is applied.
    ///
    /// The type name, with [`MULTIPLE_SUFFIX`] appended for multiple-cardinality fields.
    pub fn node_label(&self) -> String {
        let mut label = self.ty.name.clone();
        if self.cardinality == Cardinality::Multiple {
            label.push(MULTIPLE_SUFFIX);
        }
        label
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{} {}", self.ty, self.cardinality.suffix(), self.name)
    }
}

/// A named constructor of a composite type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constructor {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Constructor {
    pub fn new<S: Into<String>>(name: S, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

impl fmt::Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.fields.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", field)?;
        }
        f.write_str(")")
    }
}

/// A grammar production: a composite type derived by one of its constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Production {
    pub ty: AsdlType,
    pub constructor: Constructor,
}

impl Production {
    pub const fn new(ty: AsdlType, constructor: Constructor) -> Self {
        Self { ty, constructor }
    }

    /// Frontier labels of the constructor fields, in field order.
    pub fn child_labels(&self) -> impl DoubleEndedIterator<Item = String> + '_ {
        self.constructor.fields.iter().map(Field::node_label)
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.ty, self.constructor)
    }
}

/// A grammar parsed from an ASDL description.
#[derive(Debug, Clone, PartialEq)]
pub struct AsdlGrammar {
    primitive_types: Vec<AsdlType>,
    /// Composite types in declaration order. Never empty.
    composite_types: Vec<AsdlType>,
    productions: Vec<Arc<Production>>,
    /// Index into `productions` by constructor name.
    constructors: HashMap<String, usize>,
}

impl AsdlGrammar {
    /// Parse a grammar from its ASDL text description.
    ///
    /// # Errors
    /// Returns an [`AsdlError`] if the text is malformed or refers to undeclared types.
    pub fn from_text(text: &str) -> Result<Self, AsdlError> {
        parser::parse(text)
    }

    /// Build a grammar from declared types and productions.
    ///
    /// # Errors
    /// Returns an error on duplicate type or constructor names,
    /// or if there are no composite types.
    pub fn new(
        primitive_types: Vec<AsdlType>,
        composite_types: Vec<AsdlType>,
        productions: Vec<Production>,
    ) -> Result<Self, AsdlError> {
        if composite_types.is_empty() {
            return Err(AsdlError::NoCompositeTypes);
        }
        let mut seen_types = HashMap::new();
        for ty in primitive_types.iter().chain(&composite_types) {
            if seen_types.insert(ty.name.as_str(), ()).is_some() {
                return Err(AsdlError::DuplicateType(ty.name.clone()));
            }
        }

        let mut constructors = HashMap::new();
        for (i, production) in productions.iter().enumerate() {
            let name = &production.constructor.name;
            if constructors.insert(name.clone(), i).is_some() {
                return Err(AsdlError::DuplicateConstructor(name.clone()));
            }
        }

        Ok(Self {
            primitive_types,
            composite_types,
            productions: productions.into_iter().map(Arc::new).collect(),
            constructors,
        })
    }

    /// The first declared composite type.
    pub fn root_type(&self) -> &AsdlType {
        &self.composite_types[0]
    }

    pub fn primitive_types(&self) -> &[AsdlType] {
        &self.primitive_types
    }

    /// All productions in declaration order.
    pub fn productions(&self) -> &[Arc<Production>] {
        &self.productions
    }

    /// Productions of the named composite type, in declaration order.
    pub fn productions_of<'a>(
        &'a self,
        type_name: &'a str,
    ) -> impl Iterator<Item = &'a Arc<Production>> + 'a {
        self.productions
            .iter()
            .filter(move |production| production.ty.name == type_name)
    }

    /// The production using the named constructor.
    pub fn production_by_constructor(&self, name: &str) -> Option<&Arc<Production>> {
        self.constructors.get(name).map(|&i| &self.productions[i])
    }

    pub fn is_primitive_type(&self, name: &str) -> bool {
        self.primitive_types.iter().any(|ty| ty.name == name)
    }

    pub fn is_composite_type(&self, name: &str) -> bool {
        self.composite_types.iter().any(|ty| ty.name == name)
    }
}

impl Grammar for AsdlGrammar {
    fn mul_cardinality(&self, node: &str) -> bool {
        node.ends_with(MULTIPLE_SUFFIX)
    }
}

impl FromStr for AsdlGrammar {
    type Err = AsdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}
