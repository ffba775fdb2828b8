//! Conversion from JSDuck's informal type grammar to TypeScript types.
//!
//! A documented type is a list of alternatives separated by `|` or `/`. Each
//! alternative may carry trailing `[]` markers, may be `Function` with
//! attached callback parameter descriptors, may be a quoted string literal, or
//! is a builtin or class name.
//!
//! Conversion is deterministic. Its only side effects go into the
//! [`ModuleScope`]: builtin aliases it had to introduce and the diagnostics it
//! reported.

use std::collections::{BTreeMap, HashSet};

use super::diagnostics::Diagnostic;
use super::types::{TsKeyword, TsParam, TsType};
use super::utils::escape_param_name;
use crate::jsduck::{ClassRegistry, Module, ParamRecord};

/// Name JSDuck uses for the return descriptor inside callback properties.
const RETURN_PROPERTY: &str = "return";
/// Trailing marker of a variadic parameter type.
const VARIADIC_MARKER: &str = "...";

/// Target of a builtin documentation type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    Keyword(TsKeyword),
    /// `any[]`
    AnyArray,
    /// A global declared by the DOM/ES libraries; can be shadowed by a class.
    Global(&'static str),
}

fn builtin(name: &str) -> Option<Builtin> {
    let mapped = match name {
        "*" | "Arguments" | "Mixed" | "Object" | "XMLElement" => Builtin::Keyword(TsKeyword::Any),
        "Array" => Builtin::AnyArray,
        "boolean" | "Boolean" => Builtin::Keyword(TsKeyword::Boolean),
        "number" | "Number" => Builtin::Keyword(TsKeyword::Number),
        "string" | "String" => Builtin::Keyword(TsKeyword::String),
        "null" | "undefined" => Builtin::Keyword(TsKeyword::Void),
        "CSSStyleSheet" => Builtin::Global("CSSStyleSheet"),
        "CSSStyleRule" => Builtin::Global("CSSStyleRule"),
        "Date" => Builtin::Global("Date"),
        "Document" => Builtin::Global("Document"),
        "Element" => Builtin::Global("Element"),
        "Error" => Builtin::Global("Error"),
        "Event" => Builtin::Global("Event"),
        "Function" => Builtin::Global("Function"),
        "HtmlElement" | "HTMLElement" => Builtin::Global("HTMLElement"),
        "NodeList" => Builtin::Global("NodeList"),
        "RegExp" => Builtin::Global("RegExp"),
        "TextNode" => Builtin::Global("Text"),
        "Window" => Builtin::Global("Window"),
        _ => return None,
    };
    Some(mapped)
}

/// Per-namespace emission state.
///
/// Created fresh for every module; nothing in here is shared between modules.
#[derive(Debug, Default)]
pub struct ModuleScope {
    /// Base names of the classes declared in this namespace.
    shadowing: HashSet<String>,
    /// Builtin name -> alias, first write wins.
    aliases: BTreeMap<String, String>,
    diagnostics: Vec<Diagnostic>,
    class: String,
    member: String,
}

impl ModuleScope {
    /// Scope for a namespace declaring classes with the given base names.
    pub fn new<'a>(base_names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            shadowing: base_names.into_iter().map(str::to_string).collect(),
            ..Self::default()
        }
    }

    /// Scope for `module`. Names declared in enclosing namespaces are visible
    /// inside nested ones, so those shadow globals too.
    pub fn for_module(registry: &ClassRegistry, module: &Module) -> Self {
        let enclosing = registry.modules().iter().filter(|outer| {
            !outer.name.is_empty()
                && module
                    .name
                    .strip_prefix(outer.name.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
        });
        Self::new(
            enclosing
                .flat_map(|outer| outer.classes.iter())
                .map(|&id| registry.class(id).base_name()),
        )
    }

    /// Record which member is being converted, for diagnostics.
    pub fn set_context(&mut self, class: &str, member: &str) {
        class.clone_into(&mut self.class);
        member.clone_into(&mut self.member);
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.diagnostics.push(diagnostic);
    }

    /// Reference a global builtin, going through an alias if a class in this
    /// namespace shadows it.
    fn global(&mut self, name: &str) -> TsType {
        if !self.shadowing.contains(name) {
            return TsType::Ref(name.to_string());
        }
        let alias = self
            .aliases
            .entry(name.to_string())
            .or_insert_with(|| format!("Builtin{name}"));
        TsType::Ref(alias.clone())
    }

    /// Builtin name -> alias pairs introduced so far.
    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (BTreeMap<String, String>, Vec<Diagnostic>) {
        (self.aliases, self.diagnostics)
    }
}

/// Converts documented types against a registry.
#[derive(Debug, Clone, Copy)]
pub struct TypeConverter<'r> {
    registry: &'r ClassRegistry,
}

impl<'r> TypeConverter<'r> {
    pub fn new(registry: &'r ClassRegistry) -> Self {
        Self { registry }
    }

    /// Convert a documented type. `properties` describe the parameters and
    /// return value when the type is `Function`.
    pub fn convert(
        &self,
        ext_type: &str,
        properties: Option<&[ParamRecord]>,
        scope: &mut ModuleScope,
    ) -> TsType {
        self.convert_type(ext_type, properties, scope, &mut Vec::new())
    }

    /// `enums` holds the enumerations whose backing type is being converted,
    /// innermost last.
    fn convert_type(
        &self,
        ext_type: &str,
        properties: Option<&[ParamRecord]>,
        scope: &mut ModuleScope,
        enums: &mut Vec<String>,
    ) -> TsType {
        let compact: String = ext_type.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return TsType::any();
        }
        let alternatives: Vec<TsType> = compact
            .split(['|', '/'])
            .map(|slot| self.convert_slot(slot, ext_type, properties, scope, enums))
            .collect();
        TsType::union(alternatives)
    }

    fn convert_slot(
        &self,
        slot: &str,
        source_type: &str,
        properties: Option<&[ParamRecord]>,
        scope: &mut ModuleScope,
        enums: &mut Vec<String>,
    ) -> TsType {
        let (name, depth) = strip_array_suffix(slot);

        if name == "Function"
            && let Some(properties) = properties
        {
            return self
                .function_type(properties, scope)
                .with_array_depth(depth);
        }

        if name.len() >= 2 && name.starts_with('"') && name.ends_with('"') {
            return TsType::Literal(name.to_string()).with_array_depth(depth);
        }

        if name.is_empty() {
            return TsType::any().with_array_depth(depth);
        }

        if let Some(builtin) = builtin(name) {
            let ty = match builtin {
                Builtin::Keyword(keyword) => TsType::Keyword(keyword),
                Builtin::AnyArray => TsType::array_of(TsType::any()),
                Builtin::Global(global) => scope.global(global),
            };
            return ty.with_array_depth(depth);
        }

        let Some(cls) = self.registry.lookup_class(name) else {
            scope.report(Diagnostic::UnresolvedType {
                name: name.to_string(),
                source_type: source_type.to_string(),
            });
            return TsType::any().with_array_depth(depth);
        };

        let Some(backing) = cls.enum_type() else {
            return TsType::Ref(cls.name.clone()).with_array_depth(depth);
        };
        if enums.contains(&cls.name) {
            let mut chain = enums.clone();
            chain.push(cls.name.clone());
            scope.report(Diagnostic::EnumCycle { chain });
            return TsType::any().with_array_depth(depth);
        }
        enums.push(cls.name.clone());
        let ty = self.convert_type(backing, None, scope, enums);
        enums.pop();
        ty.with_array_depth(depth)
    }

    fn function_type(&self, properties: &[ParamRecord], scope: &mut ModuleScope) -> TsType {
        // No documented return value does not mean the callback returns nothing
        let mut ret = TsType::any();
        let mut params = Vec::new();
        for property in properties {
            if property.name == RETURN_PROPERTY {
                ret = self.convert(&property.ty, property.properties.as_deref(), scope);
            } else {
                params.push(property);
            }
        }
        TsType::Function {
            params: self.params(&params, None, scope),
            ret: Box::new(ret),
        }
    }

    /// Build a parameter list.
    ///
    /// - A second parameter with an already-used name is dropped.
    /// - Once one parameter is optional, all following ones are too.
    /// - A `T...` parameter becomes `...name: T[]`; if more parameters follow
    ///   it, they are all folded into it as `...name: any[]`.
    /// - `config_override`, when given, replaces the type of a parameter
    ///   documented as `config`.
    pub fn params(
        &self,
        params: &[&ParamRecord],
        config_override: Option<&TsType>,
        scope: &mut ModuleScope,
    ) -> Vec<TsParam> {
        let mut seen = HashSet::new();
        let mut optional = false;
        let mut result = Vec::with_capacity(params.len());

        for (index, param) in params.iter().enumerate() {
            let name = escape_param_name(&param.name);
            if !seen.insert(name.clone()) {
                let diagnostic = Diagnostic::DuplicateParameter {
                    class: scope.class.clone(),
                    member: scope.member.clone(),
                    param: name,
                };
                scope.report(diagnostic);
                continue;
            }

            optional = optional || param.optional;

            if let Some(element) = param.ty.trim_end().strip_suffix(VARIADIC_MARKER) {
                let element_type = if index + 1 < params.len() {
                    TsType::any()
                } else {
                    self.convert(element, param.properties.as_deref(), scope)
                };
                result.push(TsParam {
                    name,
                    ty: TsType::array_of(element_type),
                    optional: false,
                    rest: true,
                });
                break;
            }

            let ty = match config_override {
                Some(config) if param.name == "config" => config.clone(),
                _ => self.convert(&param.ty, param.properties.as_deref(), scope),
            };
            result.push(TsParam {
                name,
                ty,
                optional,
                rest: false,
            });
        }

        result
    }
}

/// Split trailing `[]` pairs off a type name, returning the name and the count.
fn strip_array_suffix(mut name: &str) -> (&str, usize) {
    let mut depth = 0;
    while let Some(stripped) = name.strip_suffix("[]") {
        name = stripped;
        depth += 1;
    }
    (name, depth)
}
