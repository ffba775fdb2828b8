//! TypeScript declaration IR.
//!
//! This module defines what the emitter builds before anything is printed:
//! - TsType: Types (keywords, references, arrays, unions, function types)
//! - TsParam: Parameters of methods and function types
//! - ClassDecl / ClassMember: Class declarations
//! - InterfaceDecl: Synthesized configuration interfaces
//! - NamespaceDecl / DeclarationFile: Output layout

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsType {
    /// Keyword types: any, void, string, number, boolean
    Keyword(TsKeyword),
    /// Named type reference: "Ext.data.Store", "Date", "BuiltinDate"
    Ref(String),
    /// String literal type, kept verbatim including its quotes
    Literal(String),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Function type: (a: string, b?: number) => any
    Function {
        params: Vec<TsParam>,
        ret: Box<TsType>,
    },
}

impl TsType {
    pub fn any() -> Self {
        TsType::Keyword(TsKeyword::Any)
    }

    pub fn void() -> Self {
        TsType::Keyword(TsKeyword::Void)
    }

    pub fn array_of(inner: TsType) -> Self {
        TsType::Array(Box::new(inner))
    }

    /// Wrap `self` in `depth` array layers.
    pub fn with_array_depth(self, depth: usize) -> Self {
        (0..depth).fold(self, |ty, _| TsType::array_of(ty))
    }

    /// Build a union of distinct alternatives in their original order,
    /// collapsing the single-member case.
    pub fn union(alternatives: Vec<TsType>) -> Self {
        let mut types: Vec<TsType> = Vec::with_capacity(alternatives.len());
        for ty in alternatives {
            if !types.contains(&ty) {
                types.push(ty);
            }
        }
        if types.len() == 1 {
            types.remove(0)
        } else {
            TsType::Union(types)
        }
    }
}

/// TypeScript keyword types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsKeyword {
    Any,
    Void,
    String,
    Number,
    Boolean,
}

/// Function or method parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsParam {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
    /// Rest parameter: `...name: T[]`
    pub rest: bool,
}

/// Interface property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsProp {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
}

/// `interface FooConfig extends BarConfig { ... }`
#[derive(Debug, Clone)]
pub struct InterfaceDecl {
    pub name: String,
    pub extends: Option<String>,
    pub properties: Vec<TsProp>,
}

/// Class member declaration
#[derive(Debug, Clone)]
pub enum ClassMember {
    Property {
        doc: Option<String>,
        is_static: bool,
        name: String,
        optional: bool,
        ty: TsType,
    },
    Method {
        doc: Option<String>,
        is_static: bool,
        name: String,
        params: Vec<TsParam>,
        ret: TsType,
    },
    Constructor {
        doc: Option<String>,
        params: Vec<TsParam>,
    },
}

/// `class Foo extends Bar { ... }`
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub doc: Option<String>,
    pub name: String,
    pub extends: Option<String>,
    pub members: Vec<ClassMember>,
}

/// One class with its companion configuration interface.
#[derive(Debug, Clone)]
pub struct ClassItem {
    pub config: Option<InterfaceDecl>,
    pub class: ClassDecl,
}

/// `declare namespace Ext.data { ... }`, or top-level items when `name` is empty.
#[derive(Debug, Clone)]
pub struct NamespaceDecl {
    pub name: String,
    pub items: Vec<ClassItem>,
}

/// `type BuiltinDate = Date;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAlias {
    pub name: String,
    pub target: String,
}

/// Complete declaration file
#[derive(Debug, Clone)]
pub struct DeclarationFile {
    pub header: Vec<String>,
    pub aliases: Vec<TypeAlias>,
    pub namespaces: Vec<NamespaceDecl>,
}
