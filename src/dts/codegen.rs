//! Declaration generation from the class registry.
//!
//! This module decides, for every class and member, whether it is declared
//! and how:
//! - visibility (private, and protected on static or singleton surfaces)
//! - inherited members are not re-declared; constructors always are
//! - singletons become all-static classes without `extends` or config
//! - a method wins over a property or config of the same name
//! - constructors take a synthesized `<Class>Config` interface
//!
//! Each module is generated with its own [`ModuleScope`], so modules are
//! independent and can be generated in parallel.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::debug;

use super::convert::{ModuleScope, TypeConverter};
use super::diagnostics::Diagnostic;
use super::emit::Emit;
use super::types::{
    ClassDecl, ClassItem, ClassMember, DeclarationFile, InterfaceDecl, NamespaceDecl, TsParam,
    TsProp, TsType, TypeAlias,
};
use super::utils::doc_comment;
use crate::jsduck::{
    ClassId, ClassRecord, ClassRegistry, DECLARING_KINDS, MemberKind, MemberRecord, Module,
};

const CONSTRUCTOR: &str = "constructor";
const CONFIG_SUFFIX: &str = "Config";

/// Output settings.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Prefix of every documentation URL, e.g. `http://docs.sencha.com/extjs/4.2.5/#!/api/`.
    pub doc_url: String,
    /// Tool name and version written into the header.
    pub generator: String,
    pub generated_at: DateTime<Utc>,
    /// Generate modules on the rayon pool. The output is identical either way.
    pub parallel: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            doc_url: String::new(),
            generator: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            generated_at: Utc::now(),
            parallel: false,
        }
    }
}

/// Generated declaration text plus everything that had to be approximated.
#[derive(Debug, Clone)]
pub struct Declarations {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
    pub classes: usize,
    pub modules: usize,
}

/// Result of generating one module.
#[derive(Debug)]
struct ModuleOutput {
    namespace: NamespaceDecl,
    aliases: BTreeMap<String, String>,
    diagnostics: Vec<Diagnostic>,
}

/// Walks a [`ClassRegistry`] and produces declarations.
#[derive(Debug, Clone, Copy)]
pub struct Emitter<'r> {
    registry: &'r ClassRegistry,
    converter: TypeConverter<'r>,
    options: &'r EmitOptions,
}

impl<'r> Emitter<'r> {
    pub fn new(registry: &'r ClassRegistry, options: &'r EmitOptions) -> Self {
        Self {
            registry,
            converter: TypeConverter::new(registry),
            options,
        }
    }

    // =========================================================================
    // Member selection
    // =========================================================================

    /// Whether visibility rules allow declaring `member` on `cls` at all.
    pub fn is_member_visible(&self, cls: &ClassRecord, member: &MemberRecord) -> bool {
        !member.private && !(member.protected && (cls.singleton || member.is_static))
    }

    fn ancestors(&self, id: ClassId) -> impl Iterator<Item = ClassId> + '_ {
        std::iter::successors(self.registry.parent(id), |&ancestor| {
            self.registry.parent(ancestor)
        })
    }

    /// Whether some ancestor of `id` already declares a visible `name` on the given side.
    pub fn does_parent_emit_member(&self, id: ClassId, name: &str, is_static: bool) -> bool {
        self.ancestors(id).any(|ancestor| {
            let cls = self.registry.class(ancestor);
            self.registry
                .lookup_member(cls, name, Some(DECLARING_KINDS), Some(is_static))
                .is_some_and(|member| self.is_member_visible(cls, member))
        })
    }

    /// Whether `member` gets a declaration on class `id`.
    pub fn should_emit_member(&self, id: ClassId, member: &MemberRecord) -> bool {
        let cls = self.registry.class(id);
        if member.kind == MemberKind::Other || !self.is_member_visible(cls, member) {
            return false;
        }
        if cls.singleton {
            // Unlike other classes, a singleton has no extends clause, so
            // inherited members are declared again instead of suppressed
            return !member.is_static && !member.is_constructor();
        }
        member.is_constructor() || !self.does_parent_emit_member(id, &member.name, member.is_static)
    }

    fn emitted_constructor(&self, id: ClassId) -> Option<&'r MemberRecord> {
        let cls = self.registry.class(id);
        self.registry
            .lookup_member(cls, CONSTRUCTOR, Some(&[MemberKind::Method]), None)
            .filter(|ctor| self.should_emit_member(id, ctor))
    }

    /// Nearest ancestor that declares its own constructor, and so its own config interface.
    fn config_ancestor(&self, id: ClassId) -> Option<ClassId> {
        if !self.does_parent_emit_member(id, CONSTRUCTOR, false) {
            return None;
        }
        self.ancestors(id)
            .find(|&ancestor| self.emitted_constructor(ancestor).is_some())
    }

    // =========================================================================
    // Names and URLs
    // =========================================================================

    fn config_name(cls: &ClassRecord) -> String {
        format!("{}{CONFIG_SUFFIX}", cls.base_name())
    }

    /// Fully-qualified reference to the config interface of `cls`.
    fn config_ref(cls: &ClassRecord) -> String {
        match cls.module_name() {
            "" => Self::config_name(cls),
            module => format!("{module}.{}", Self::config_name(cls)),
        }
    }

    fn class_doc(&self, cls: &ClassRecord) -> String {
        let url = format!("{}{}", self.options.doc_url, cls.name);
        doc_comment(&cls.short_doc, &url)
    }

    fn member_doc(&self, cls: &ClassRecord, member: &MemberRecord) -> String {
        let side = if member.is_static { "static-" } else { "" };
        let url = format!(
            "{}{}-{side}{}-{}",
            self.options.doc_url,
            cls.name,
            member.kind.tag(),
            member.name
        );
        doc_comment(&member.short_doc, &url)
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// Build the `<Class>Config` interface for a class whose constructor is declared.
    pub fn config_interface(&self, id: ClassId, scope: &mut ModuleScope) -> Option<InterfaceDecl> {
        self.emitted_constructor(id)?;
        let cls = self.registry.class(id);

        let ancestor = self.config_ancestor(id).map(|a| self.registry.class(a));
        // Every config interface up the chain is inherited through `extends`
        let inherited: HashSet<&str> =
            std::iter::successors(self.config_ancestor(id), |&a| self.config_ancestor(a))
                .flat_map(|a| &self.registry.class(a).members)
                .filter(|m| m.kind == MemberKind::Config)
                .map(|m| m.name.as_str())
                .collect();

        let mut seen = HashSet::new();
        let mut properties = Vec::new();
        for member in &cls.members {
            if member.kind != MemberKind::Config
                || inherited.contains(member.name.as_str())
                || !seen.insert(member.name.as_str())
            {
                continue;
            }
            scope.set_context(&cls.name, &member.name);
            properties.push(TsProp {
                name: member.name.clone(),
                ty: self.converter.convert(&member.ty, None, scope),
                optional: !member.required,
            });
        }

        Some(InterfaceDecl {
            name: Self::config_name(cls),
            extends: ancestor.map(Self::config_ref),
            properties,
        })
    }

    fn extends_clause(&self, id: ClassId, scope: &mut ModuleScope) -> Option<String> {
        let cls = self.registry.class(id);
        if cls.singleton || cls.parent.is_empty() {
            return None;
        }
        match self.registry.parent(id) {
            Some(parent) => Some(self.registry.class(parent).name.clone()),
            None if self.registry.breaks_cycle(id) => {
                scope.report(Diagnostic::InheritanceCycle {
                    class: cls.name.clone(),
                    parent: cls.parent.clone(),
                });
                None
            }
            None => {
                scope.report(Diagnostic::UnresolvedParent {
                    class: cls.name.clone(),
                    parent: cls.parent.clone(),
                });
                None
            }
        }
    }

    pub fn emit_class(&self, id: ClassId, scope: &mut ModuleScope) -> ClassItem {
        let cls = self.registry.class(id);
        let config = self.config_interface(id, scope);
        let extends = self.extends_clause(id, scope);

        let mut declared = HashSet::new();
        let members = cls
            .members
            .iter()
            .filter_map(|member| self.emit_member(id, member, &mut declared, scope))
            .collect();

        ClassItem {
            config,
            class: ClassDecl {
                doc: Some(self.class_doc(cls)),
                name: cls.base_name().to_string(),
                extends,
                members,
            },
        }
    }

    // =========================================================================
    // Members
    // =========================================================================

    fn emit_member(
        &self,
        id: ClassId,
        member: &MemberRecord,
        declared: &mut HashSet<(MemberKind, String, bool)>,
        scope: &mut ModuleScope,
    ) -> Option<ClassMember> {
        if !self.should_emit_member(id, member) {
            return None;
        }
        let cls = self.registry.class(id);
        scope.set_context(&cls.name, &member.name);

        match member.kind {
            MemberKind::Property => {
                if self
                    .registry
                    .lookup_member(cls, &member.name, Some(&[MemberKind::Method]), None)
                    .is_some()
                {
                    scope.report(Diagnostic::PropertyShadowedByMethod {
                        class: cls.name.clone(),
                        member: member.name.clone(),
                    });
                    return None;
                }
                self.first_declaration(cls, member, declared, scope)?;
                Some(self.property(cls, member, scope))
            }
            MemberKind::Method => {
                self.first_declaration(cls, member, declared, scope)?;
                Some(self.method(cls, member, scope))
            }
            MemberKind::Config => {
                let kinds = [MemberKind::Method, MemberKind::Property];
                if self
                    .registry
                    .lookup_member(cls, &member.name, Some(&kinds), None)
                    .is_some()
                {
                    scope.report(Diagnostic::ConfigShadowed {
                        class: cls.name.clone(),
                        member: member.name.clone(),
                    });
                    return None;
                }
                if cls.singleton {
                    return None;
                }
                self.first_declaration(cls, member, declared, scope)?;
                Some(ClassMember::Property {
                    doc: Some(self.member_doc(cls, member)),
                    is_static: member.is_static,
                    name: member.name.clone(),
                    optional: false,
                    ty: self.converter.convert(&member.ty, None, scope),
                })
            }
            MemberKind::Other => None,
        }
    }

    /// `Some(())` the first time a (kind, name, side) is declared on a class.
    fn first_declaration(
        &self,
        cls: &ClassRecord,
        member: &MemberRecord,
        declared: &mut HashSet<(MemberKind, String, bool)>,
        scope: &mut ModuleScope,
    ) -> Option<()> {
        if declared.insert((member.kind, member.name.clone(), member.is_static)) {
            return Some(());
        }
        scope.report(Diagnostic::DuplicateMember {
            class: cls.name.clone(),
            member: member.name.clone(),
            kind: member.kind.tag(),
        });
        None
    }

    fn property(&self, cls: &ClassRecord, member: &MemberRecord, scope: &mut ModuleScope) -> ClassMember {
        let config = if cls.singleton {
            None
        } else {
            self.registry
                .lookup_member(cls, &member.name, Some(&[MemberKind::Config]), None)
        };
        // A property backed by a config accepts whatever the config accepts
        let ext_type = match config {
            Some(cfg) if !cfg.ty.trim().is_empty() && !member.ty.trim().is_empty() => {
                format!("{}|{}", cfg.ty, member.ty)
            }
            Some(cfg) if member.ty.trim().is_empty() => cfg.ty.clone(),
            _ => member.ty.clone(),
        };

        ClassMember::Property {
            doc: Some(self.member_doc(cls, member)),
            is_static: cls.singleton || member.is_static,
            name: member.name.clone(),
            optional: member.optional,
            ty: self.converter.convert(&ext_type, None, scope),
        }
    }

    fn method(&self, cls: &ClassRecord, member: &MemberRecord, scope: &mut ModuleScope) -> ClassMember {
        let params: Vec<_> = member.params.iter().collect();
        let doc = Some(self.member_doc(cls, member));

        if member.is_constructor() {
            let config = TsType::Ref(Self::config_ref(cls));
            let params: Vec<TsParam> = self.converter.params(&params, Some(&config), scope);
            return ClassMember::Constructor { doc, params };
        }

        let ret = match &member.returns {
            Some(ret) if !ret.ty.trim().is_empty() => {
                self.converter
                    .convert(&ret.ty, ret.properties.as_deref(), scope)
            }
            _ => TsType::void(),
        };
        ClassMember::Method {
            doc,
            is_static: cls.singleton || member.is_static,
            name: member.name.clone(),
            params: self.converter.params(&params, None, scope),
            ret,
        }
    }

    // =========================================================================
    // Modules and file
    // =========================================================================

    fn emit_module(&self, module: &Module) -> ModuleOutput {
        let mut scope = ModuleScope::for_module(self.registry, module);
        let items = module
            .classes
            .iter()
            .map(|&id| self.emit_class(id, &mut scope))
            .collect();
        let (aliases, diagnostics) = scope.into_parts();
        debug!(
            module = %module.name,
            classes = module.classes.len(),
            aliases = aliases.len(),
            "Generated module declarations."
        );
        ModuleOutput {
            namespace: NamespaceDecl {
                name: module.name.clone(),
                items,
            },
            aliases,
            diagnostics,
        }
    }

    /// Generate the declaration file for the whole registry.
    pub fn emit(&self) -> Declarations {
        let modules = self.registry.modules();
        let outputs: Vec<ModuleOutput> = if self.options.parallel {
            modules.par_iter().map(|m| self.emit_module(m)).collect()
        } else {
            modules.iter().map(|m| self.emit_module(m)).collect()
        };

        let mut aliases = BTreeMap::new();
        let mut diagnostics = Vec::new();
        let mut namespaces = Vec::with_capacity(outputs.len());
        for output in outputs {
            for (builtin, alias) in output.aliases {
                aliases.insert(alias, builtin);
            }
            diagnostics.extend(output.diagnostics);
            namespaces.push(output.namespace);
        }

        let mut header = vec![format!(
            "{} type declarations generated on {}",
            self.options.generator,
            self.options.generated_at.to_rfc3339()
        )];
        if !self.options.doc_url.is_empty() {
            header.push(format!("Documentation: {}", self.options.doc_url));
        }

        let file = DeclarationFile {
            header,
            aliases: aliases
                .into_iter()
                .map(|(name, target)| TypeAlias { name, target })
                .collect(),
            namespaces,
        };

        Declarations {
            text: file.emit(),
            diagnostics,
            classes: self.registry.len(),
            modules: modules.len(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::jsduck::RegistryOptions;
    use chrono::TimeZone;
    use serde_json::{Value, json};

    fn registry(records: Vec<Value>) -> ClassRegistry {
        let classes = records
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect();
        ClassRegistry::from_classes(classes, &RegistryOptions::default())
    }

    fn options() -> EmitOptions {
        EmitOptions {
            doc_url: "http://docs/#!/api/".into(),
            generator: "jsduck-dts test".into(),
            generated_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            parallel: false,
        }
    }

    fn generate(records: Vec<Value>) -> Declarations {
        let reg = registry(records);
        let opts = options();
        Emitter::new(&reg, &opts).emit()
    }

    fn emitted_class(reg: &ClassRegistry, name: &str) -> (String, ModuleScope) {
        let opts = options();
        let emitter = Emitter::new(reg, &opts);
        let id = reg.lookup_id(name).unwrap();
        let module = reg
            .modules()
            .iter()
            .find(|m| m.classes.contains(&id))
            .unwrap();
        let mut scope = ModuleScope::for_module(reg, module);
        let item = emitter.emit_class(id, &mut scope);
        (item.emit_with("export "), scope)
    }

    fn base_and_child() -> Vec<Value> {
        vec![
            json!({
                "name": "Ext.Base",
                "members": [
                    { "tagname": "method", "name": "constructor",
                      "params": [{ "name": "config", "type": "Object", "optional": true }] },
                    { "tagname": "cfg", "name": "id", "type": "String" },
                    { "tagname": "property", "name": "self", "type": "Ext.Base" },
                    { "tagname": "method", "name": "destroy" },
                    { "tagname": "method", "name": "internal", "protected": true },
                    { "tagname": "method", "name": "secret", "private": true },
                    { "tagname": "method", "name": "create", "static": true,
                      "return": { "type": "Ext.Base" } }
                ]
            }),
            json!({
                "name": "Ext.panel.Panel",
                "extends": "Ext.Base",
                "members": [
                    { "tagname": "method", "name": "constructor",
                      "params": [{ "name": "config", "type": "Object", "optional": true }] },
                    { "tagname": "cfg", "name": "id", "type": "String" },
                    { "tagname": "cfg", "name": "title", "type": "String", "required": true },
                    { "tagname": "cfg", "name": "border", "type": "Boolean" },
                    { "tagname": "property", "name": "self", "type": "Ext.Base" },
                    { "tagname": "method", "name": "destroy" },
                    { "tagname": "method", "name": "internal", "protected": true },
                    { "tagname": "method", "name": "secret", "private": true },
                    { "tagname": "method", "name": "create", "static": true,
                      "return": { "type": "Ext.panel.Panel" } },
                    { "tagname": "method", "name": "setTitle",
                      "params": [{ "name": "title", "type": "String" }],
                      "return": { "type": "Ext.panel.Panel" } }
                ]
            }),
        ]
    }

    #[test]
    fn test_visibility_rule() {
        let reg = registry(vec![
            json!({ "name": "Ext.Plain" }),
            json!({ "name": "Ext.Single", "singleton": true }),
        ]);
        let opts = options();
        let emitter = Emitter::new(&reg, &opts);
        let plain = reg.lookup_class("Ext.Plain").unwrap();
        let single = reg.lookup_class("Ext.Single").unwrap();
        let member = |value: Value| -> MemberRecord { serde_json::from_value(value).unwrap() };

        let public = member(json!({ "tagname": "method", "name": "a" }));
        let private = member(json!({ "tagname": "method", "name": "a", "private": true }));
        let protected = member(json!({ "tagname": "method", "name": "a", "protected": true }));
        let protected_static = member(
            json!({ "tagname": "method", "name": "a", "protected": true, "static": true }),
        );

        assert!(emitter.is_member_visible(plain, &public));
        assert!(!emitter.is_member_visible(plain, &private));
        assert!(emitter.is_member_visible(plain, &protected));
        assert!(!emitter.is_member_visible(plain, &protected_static));
        assert!(!emitter.is_member_visible(single, &protected));
        assert!(emitter.is_member_visible(single, &public));
    }

    #[test]
    fn test_inherited_members_are_not_redeclared() {
        let reg = registry(base_and_child());
        let (text, _) = emitted_class(&reg, "Ext.panel.Panel");

        assert!(text.contains("export class Panel extends Ext.Base {"), "{text}");
        assert!(!text.contains("self:"), "{text}");
        assert!(!text.contains("destroy("), "{text}");
        assert!(!text.contains("internal("), "{text}");
        assert!(!text.contains("secret("), "{text}");
        assert!(!text.contains("static create("), "{text}");
        assert!(text.contains("setTitle(title: string): Ext.panel.Panel;"), "{text}");
        assert!(text.contains("border: boolean;"), "{text}");
        // constructors are always declared
        assert!(text.contains("constructor(config?: Ext.panel.PanelConfig);"), "{text}");
    }

    #[test]
    fn test_protected_member_visible_when_parent_hides_it() {
        let reg = registry(vec![
            json!({ "name": "Ext.A", "members": [
                { "tagname": "method", "name": "hook", "private": true }
            ]}),
            json!({ "name": "Ext.B", "extends": "Ext.A", "members": [
                { "tagname": "method", "name": "hook", "protected": true }
            ]}),
        ]);
        let (text, _) = emitted_class(&reg, "Ext.B");
        assert!(text.contains("hook(): void;"), "{text}");
    }

    #[test]
    fn test_config_interface_extends_ancestor() {
        let reg = registry(base_and_child());
        let (base, _) = emitted_class(&reg, "Ext.Base");
        assert!(base.contains("export interface BaseConfig {"), "{base}");
        assert!(base.contains("id?: string;"), "{base}");

        let (panel, _) = emitted_class(&reg, "Ext.panel.Panel");
        assert!(
            panel.contains("export interface PanelConfig extends Ext.BaseConfig {"),
            "{panel}"
        );
        assert!(panel.contains("title: string;"), "{panel}");
        assert!(panel.contains("border?: boolean;"), "{panel}");
        let interface = panel.split("export class").next().unwrap();
        assert!(!interface.contains("id?:"), "{interface}");
    }

    #[test]
    fn test_config_interface_omits_options_of_every_ancestor() {
        let ctor = json!({ "tagname": "method", "name": "constructor",
                           "params": [{ "name": "config", "type": "Object", "optional": true }] });
        let reg = registry(vec![
            json!({ "name": "Ext.A", "members": [
                ctor, { "tagname": "cfg", "name": "a", "type": "String" }
            ]}),
            json!({ "name": "Ext.B", "extends": "Ext.A", "members": [
                ctor, { "tagname": "cfg", "name": "b", "type": "String" }
            ]}),
            json!({ "name": "Ext.C", "extends": "Ext.B", "members": [
                ctor,
                { "tagname": "cfg", "name": "a", "type": "Number" },
                { "tagname": "cfg", "name": "c", "type": "Boolean" }
            ]}),
        ]);

        let (text, _) = emitted_class(&reg, "Ext.C");
        let interface = text.split("export class").next().unwrap();
        assert!(
            interface.contains("export interface CConfig extends Ext.BConfig {"),
            "{interface}"
        );
        assert!(interface.contains("c?: boolean;"), "{interface}");
        assert!(!interface.contains("a?:"), "{interface}");
        assert!(!interface.contains("b?:"), "{interface}");
    }

    #[test]
    fn test_no_config_interface_without_constructor() {
        let reg = registry(vec![json!({
            "name": "Ext.util.Format",
            "members": [{ "tagname": "cfg", "name": "x", "type": "String" }]
        })]);
        let (text, _) = emitted_class(&reg, "Ext.util.Format");
        assert!(!text.contains("interface"), "{text}");
        assert!(text.contains("x: string;"), "{text}");
    }

    #[test]
    fn test_singleton_declaration() {
        let reg = registry(vec![
            json!({ "name": "Ext.data.Connection", "members": [
                { "tagname": "method", "name": "request", "return": { "type": "Object" } }
            ]}),
            json!({
                "name": "Ext.Ajax",
                "extends": "Ext.data.Connection",
                "singleton": true,
                "members": [
                    { "tagname": "method", "name": "constructor",
                      "params": [{ "name": "config", "type": "Object" }] },
                    { "tagname": "method", "name": "request", "return": { "type": "Object" } },
                    { "tagname": "method", "name": "run" },
                    { "tagname": "method", "name": "make", "static": true },
                    { "tagname": "method", "name": "guarded", "protected": true },
                    { "tagname": "property", "name": "timeout", "type": "Number" },
                    { "tagname": "cfg", "name": "timeout", "type": "Number" },
                    { "tagname": "cfg", "name": "url", "type": "String" }
                ]
            }),
        ]);
        let (text, _) = emitted_class(&reg, "Ext.Ajax");

        assert!(text.contains("export class Ajax {"), "{text}");
        assert!(!text.contains("extends"), "{text}");
        assert!(!text.contains("interface"), "{text}");
        assert!(!text.contains("constructor"), "{text}");
        assert!(text.contains("static run(): void;"), "{text}");
        assert!(text.contains("static request(): any;"), "{text}");
        assert!(text.contains("static timeout: number;"), "{text}");
        assert!(!text.contains("make("), "{text}");
        assert!(!text.contains("guarded("), "{text}");
        assert!(!text.contains("url"), "{text}");
    }

    #[test]
    fn test_method_wins_over_property_and_config() {
        let reg = registry(vec![json!({
            "name": "Ext.Foo",
            "members": [
                { "tagname": "property", "name": "layout", "type": "Object" },
                { "tagname": "cfg", "name": "layout", "type": "String" },
                { "tagname": "method", "name": "layout", "return": { "type": "Ext.Foo" } },
                { "tagname": "cfg", "name": "title", "type": "String" },
                { "tagname": "property", "name": "title", "type": "Number" }
            ]
        })]);
        let (text, scope) = emitted_class(&reg, "Ext.Foo");

        assert!(text.contains("layout(): Ext.Foo;"), "{text}");
        assert!(!text.contains("layout:"), "{text}");
        // property backed by a config accepts both types
        assert!(text.contains("title: string | number;"), "{text}");
        assert_eq!(text.matches("title:").count(), 1, "{text}");
        assert!(scope.diagnostics().contains(&Diagnostic::PropertyShadowedByMethod {
            class: "Ext.Foo".into(),
            member: "layout".into(),
        }));
    }

    #[test]
    fn test_duplicate_members_are_dropped() {
        let reg = registry(vec![json!({
            "name": "Ext.Foo",
            "members": [
                { "tagname": "property", "name": "x", "type": "String" },
                { "tagname": "property", "name": "x", "type": "Number" },
                { "tagname": "property", "name": "x", "type": "Number", "static": true }
            ]
        })]);
        let (text, scope) = emitted_class(&reg, "Ext.Foo");
        assert!(text.contains("\n    x: string;"), "{text}");
        assert!(!text.contains("\n    x: number;"), "{text}");
        assert!(text.contains("static x: number;"), "{text}");
        assert_eq!(scope.diagnostics().len(), 1);
    }

    #[test]
    fn test_unresolved_parent_omits_extends() {
        let result = generate(vec![json!({ "name": "Ext.Foo", "extends": "Ext.Unknown" })]);
        assert!(result.text.contains("export class Foo {"), "{}", result.text);
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::UnresolvedParent {
                class: "Ext.Foo".into(),
                parent: "Ext.Unknown".into(),
            }]
        );
    }

    #[test]
    fn test_inheritance_cycle_omits_closing_extends() {
        let result = generate(vec![
            json!({ "name": "Ext.A", "extends": "Ext.B" }),
            json!({ "name": "Ext.B", "extends": "Ext.A" }),
        ]);
        assert!(result.text.contains("export class A extends Ext.B {"), "{}", result.text);
        assert!(result.text.contains("export class B {"), "{}", result.text);
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::InheritanceCycle {
                class: "Ext.B".into(),
                parent: "Ext.A".into(),
            }]
        );
    }

    #[test]
    fn test_extends_uses_canonical_name() {
        let reg = registry(vec![
            json!({ "name": "Ext.Child", "extends": "Ext.OldBase" }),
            json!({ "name": "Ext.Base", "alternateClassNames": ["Ext.OldBase"] }),
        ]);
        let (text, _) = emitted_class(&reg, "Ext.Child");
        assert!(text.contains("class Child extends Ext.Base {"), "{text}");
    }

    #[test]
    fn test_builtin_alias_scoped_per_module() {
        let result = generate(vec![
            json!({ "name": "Ext.util.Date" }),
            json!({ "name": "Ext.util.Format", "members": [
                { "tagname": "method", "name": "now", "return": { "type": "Date" } },
                { "tagname": "property", "name": "last", "type": "Date" }
            ]}),
            json!({ "name": "Ext.util.sub.Parser", "members": [
                { "tagname": "method", "name": "read", "return": { "type": "Date" } }
            ]}),
            json!({ "name": "Ext.data.Field", "members": [
                { "tagname": "method", "name": "parse", "return": { "type": "Date" } }
            ]}),
        ]);
        let text = &result.text;

        assert!(text.contains("declare type BuiltinDate = Date;\n"), "{text}");
        assert_eq!(text.matches("declare type BuiltinDate").count(), 1, "{text}");
        assert!(text.contains("now(): BuiltinDate;"), "{text}");
        assert!(text.contains("last: BuiltinDate;"), "{text}");
        // nested namespaces see Ext.util.Date as well
        assert!(text.contains("read(): BuiltinDate;"), "{text}");
        // Ext.data is not inside Ext.util, so the global is used directly
        assert!(text.contains("parse(): Date;"), "{text}");
    }

    #[test]
    fn test_file_layout() {
        let result = generate(vec![
            json!({ "name": "Ext", "singleton": true, "short_doc": "The namespace.",
                    "members": [{ "tagname": "method", "name": "onReady" }] }),
            json!({ "name": "Ext.Base" }),
        ]);
        let text = &result.text;
        assert!(
            text.starts_with(
                "// jsduck-dts test type declarations generated on 2024-01-02T03:04:05+00:00\n\
                 // Documentation: http://docs/#!/api/\n"
            ),
            "{text}"
        );
        let root = text.find("declare class Ext {").unwrap();
        let namespace = text.find("declare namespace Ext {").unwrap();
        assert!(root < namespace, "{text}");
        assert!(text.contains("/** The namespace. http://docs/#!/api/Ext */"), "{text}");
        assert!(text.contains("/** http://docs/#!/api/Ext-method-onReady */"), "{text}");
        assert!(text.contains("    export class Base {"), "{text}");
    }

    #[test]
    fn test_parallel_output_matches_sequential() {
        let mut records = base_and_child();
        records.push(json!({ "name": "Ext.data.Store", "extends": "Ext.Base" }));
        records.push(json!({ "name": "Ext.grid.Panel", "extends": "Ext.panel.Panel" }));
        let reg = registry(records);

        let sequential = options();
        let parallel = EmitOptions {
            parallel: true,
            ..options()
        };
        let a = Emitter::new(&reg, &sequential).emit();
        let b = Emitter::new(&reg, &parallel).emit();
        assert_eq!(a.text, b.text);
        assert_eq!(a.diagnostics, b.diagnostics);
    }
}
