//! TypeScript declaration emission via the Emit trait.
//!
//! Every IR node renders itself; layout decisions (indentation, which
//! declaration modifier to use) are made by the enclosing node.

use super::types::{
    ClassDecl, ClassItem, ClassMember, DeclarationFile, InterfaceDecl, NamespaceDecl, TsKeyword,
    TsParam, TsProp, TsType, TypeAlias,
};
use super::utils::quote_if_needed;

const INDENT: &str = "    ";

/// Trait for emitting TypeScript code from IR nodes.
pub trait Emit {
    /// Convert the node to its TypeScript string representation.
    fn emit(&self) -> String;
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsKeyword {
    fn emit(&self) -> String {
        match self {
            TsKeyword::Any => "any".to_string(),
            TsKeyword::Void => "void".to_string(),
            TsKeyword::String => "string".to_string(),
            TsKeyword::Number => "number".to_string(),
            TsKeyword::Boolean => "boolean".to_string(),
        }
    }
}

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Keyword(k) => k.emit(),
            TsType::Ref(name) | TsType::Literal(name) => name.clone(),
            TsType::Array(inner) => {
                // Arrow syntax and unions are ambiguous in front of []
                if matches!(**inner, TsType::Union(_) | TsType::Function { .. }) {
                    format!("({})[]", inner.emit())
                } else {
                    format!("{}[]", inner.emit())
                }
            }
            TsType::Union(types) => types
                .iter()
                .map(|t| {
                    if matches!(t, TsType::Function { .. }) {
                        format!("({})", t.emit())
                    } else {
                        t.emit()
                    }
                })
                .collect::<Vec<_>>()
                .join(" | "),
            TsType::Function { params, ret } => {
                format!("({}) => {}", emit_params(params), ret.emit())
            }
        }
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        if self.rest {
            format!("...{}: {}", self.name, self.ty.emit())
        } else {
            let opt = if self.optional { "?" } else { "" };
            format!("{}{}: {}", self.name, opt, self.ty.emit())
        }
    }
}

fn emit_params(params: &[TsParam]) -> String {
    params.iter().map(|p| p.emit()).collect::<Vec<_>>().join(", ")
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}: {};", quote_if_needed(&self.name), opt, self.ty.emit())
    }
}

impl Emit for TypeAlias {
    fn emit(&self) -> String {
        format!("declare type {} = {};", self.name, self.target)
    }
}

// =============================================================================
// Declarations
// =============================================================================

impl Emit for ClassMember {
    fn emit(&self) -> String {
        let (doc, decl) = match self {
            ClassMember::Property {
                doc,
                is_static,
                name,
                optional,
                ty,
            } => {
                let opt = if *optional { "?" } else { "" };
                (
                    doc,
                    format!(
                        "{}{}{}: {};",
                        static_prefix(*is_static),
                        quote_if_needed(name),
                        opt,
                        ty.emit()
                    ),
                )
            }
            ClassMember::Method {
                doc,
                is_static,
                name,
                params,
                ret,
            } => (
                doc,
                format!(
                    "{}{}({}): {};",
                    static_prefix(*is_static),
                    quote_if_needed(name),
                    emit_params(params),
                    ret.emit()
                ),
            ),
            ClassMember::Constructor { doc, params } => {
                (doc, format!("constructor({});", emit_params(params)))
            }
        };
        match doc {
            Some(doc) => format!("{doc}\n{decl}"),
            None => decl,
        }
    }
}

fn static_prefix(is_static: bool) -> &'static str {
    if is_static { "static " } else { "" }
}

/// Prefix every non-empty line with one indentation level.
fn indent(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{INDENT}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl InterfaceDecl {
    /// Render with the given declaration modifier (`declare ` or `export `).
    pub fn emit_with(&self, modifier: &str) -> String {
        let extends = self
            .extends
            .as_ref()
            .map(|parent| format!(" extends {parent}"))
            .unwrap_or_default();
        let mut output = format!("{modifier}interface {}{extends} {{\n", self.name);
        for prop in &self.properties {
            output.push_str(&indent(&prop.emit()));
            output.push('\n');
        }
        output.push('}');
        output
    }
}

impl ClassDecl {
    /// Render with the given declaration modifier (`declare ` or `export `).
    pub fn emit_with(&self, modifier: &str) -> String {
        let mut output = String::new();
        if let Some(doc) = &self.doc {
            output.push_str(doc);
            output.push('\n');
        }
        let extends = self
            .extends
            .as_ref()
            .map(|parent| format!(" extends {parent}"))
            .unwrap_or_default();
        output.push_str(&format!("{modifier}class {}{extends} {{\n", self.name));
        for member in &self.members {
            output.push_str(&indent(&member.emit()));
            output.push('\n');
        }
        output.push('}');
        output
    }
}

impl ClassItem {
    pub fn emit_with(&self, modifier: &str) -> String {
        match &self.config {
            Some(config) => format!(
                "{}\n{}",
                config.emit_with(modifier),
                self.class.emit_with(modifier)
            ),
            None => self.class.emit_with(modifier),
        }
    }
}

impl Emit for NamespaceDecl {
    fn emit(&self) -> String {
        if self.name.is_empty() {
            // Top-level classes are not wrapped in a namespace
            self.items
                .iter()
                .map(|item| item.emit_with("declare "))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            let body = self
                .items
                .iter()
                .map(|item| indent(&item.emit_with("export ")))
                .collect::<Vec<_>>()
                .join("\n");
            format!("declare namespace {} {{\n{body}\n}}", self.name)
        }
    }
}

impl Emit for DeclarationFile {
    fn emit(&self) -> String {
        let mut output = String::new();
        for line in &self.header {
            output.push_str("// ");
            output.push_str(line);
            output.push('\n');
        }
        for alias in &self.aliases {
            output.push_str(&alias.emit());
            output.push('\n');
        }
        for namespace in &self.namespaces {
            output.push_str(&namespace.emit());
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn func(params: Vec<TsParam>, ret: TsType) -> TsType {
        TsType::Function {
            params,
            ret: Box::new(ret),
        }
    }

    fn param(name: &str, ty: TsType, optional: bool) -> TsParam {
        TsParam {
            name: name.to_string(),
            ty,
            optional,
            rest: false,
        }
    }

    #[test]
    fn test_emit_keywords_and_arrays() {
        assert_eq!(TsType::any().emit(), "any");
        assert_eq!(
            TsType::Keyword(TsKeyword::String).with_array_depth(2).emit(),
            "string[][]"
        );
        assert_eq!(
            TsType::array_of(TsType::Union(vec![
                TsType::Keyword(TsKeyword::String),
                TsType::Keyword(TsKeyword::Number),
            ]))
            .emit(),
            "(string | number)[]"
        );
    }

    #[test]
    fn test_function_types_are_bracketed_when_ambiguous() {
        let callback = func(
            vec![param("a", TsType::Keyword(TsKeyword::String), false)],
            TsType::any(),
        );
        assert_eq!(callback.emit(), "(a: string) => any");
        assert_eq!(
            TsType::array_of(callback.clone()).emit(),
            "((a: string) => any)[]"
        );
        assert_eq!(
            TsType::Union(vec![callback, TsType::Ref("Ext.Base".into())]).emit(),
            "((a: string) => any) | Ext.Base"
        );
    }

    #[test]
    fn test_emit_params() {
        let rest = TsParam {
            name: "args".into(),
            ty: TsType::array_of(TsType::any()),
            optional: false,
            rest: true,
        };
        assert_eq!(rest.emit(), "...args: any[]");
        assert_eq!(
            param("x", TsType::Keyword(TsKeyword::Number), true).emit(),
            "x?: number"
        );
    }

    #[test]
    fn test_emit_class_members() {
        let prop = ClassMember::Property {
            doc: Some("/** doc */".into()),
            is_static: true,
            name: "data-id".into(),
            optional: true,
            ty: TsType::Keyword(TsKeyword::String),
        };
        assert_eq!(prop.emit(), "/** doc */\nstatic \"data-id\"?: string;");

        let method = ClassMember::Method {
            doc: None,
            is_static: false,
            name: "bar".into(),
            params: vec![param("x", TsType::Keyword(TsKeyword::String), false)],
            ret: TsType::Keyword(TsKeyword::Boolean),
        };
        assert_eq!(method.emit(), "bar(x: string): boolean;");

        let ctor = ClassMember::Constructor {
            doc: None,
            params: vec![param("config", TsType::Ref("FooConfig".into()), true)],
        };
        assert_eq!(ctor.emit(), "constructor(config?: FooConfig);");
    }

    #[test]
    fn test_emit_namespace_layout() {
        let item = ClassItem {
            config: Some(InterfaceDecl {
                name: "StoreConfig".into(),
                extends: Some("Ext.BaseConfig".into()),
                properties: vec![TsProp {
                    name: "url".into(),
                    ty: TsType::Keyword(TsKeyword::String),
                    optional: false,
                }],
            }),
            class: ClassDecl {
                doc: None,
                name: "Store".into(),
                extends: Some("Ext.Base".into()),
                members: vec![ClassMember::Constructor {
                    doc: None,
                    params: Vec::new(),
                }],
            },
        };
        let ns = NamespaceDecl {
            name: "Ext.data".into(),
            items: vec![item.clone()],
        };
        assert_eq!(
            ns.emit(),
            "declare namespace Ext.data {\n\
             \x20   export interface StoreConfig extends Ext.BaseConfig {\n\
             \x20       url: string;\n\
             \x20   }\n\
             \x20   export class Store extends Ext.Base {\n\
             \x20       constructor();\n\
             \x20   }\n\
             }"
        );

        let root = NamespaceDecl {
            name: String::new(),
            items: vec![item],
        };
        assert!(root.emit().starts_with("declare interface StoreConfig"));
        assert!(root.emit().contains("declare class Store extends Ext.Base {"));
    }

    #[test]
    fn test_emit_file() {
        let file = DeclarationFile {
            header: vec!["generated".into()],
            aliases: vec![TypeAlias {
                name: "BuiltinDate".into(),
                target: "Date".into(),
            }],
            namespaces: Vec::new(),
        };
        assert_eq!(file.emit(), "// generated\ndeclare type BuiltinDate = Date;\n");
    }
}
