//! In-memory class model built from a JSDuck export directory.
//!
//! The registry is built once, fully, before any emission happens. Parent links
//! are resolved to [`ClassId`]s at build time so the emitter never re-parses
//! dotted names to walk the hierarchy. Inheritance cycles are broken up front
//! so every parent chain ends at a root.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::model::{ClassRecord, MemberKind, MemberRecord};
use crate::error::{Error, Result};

/// File-name prefix of the Ext JS documentation export.
pub const DEFAULT_PREFIX: &str = "Ext.";

/// Index of a class in [`ClassRegistry::classes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(usize);

/// Classes sharing a dotted prefix; emitted as one namespace.
#[derive(Debug, Clone)]
pub struct Module {
    /// Dotted prefix, empty for top-level classes.
    pub name: String,
    /// Classes in documentation order.
    pub classes: Vec<ClassId>,
}

/// How the documentation directory is read.
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// Only files whose name starts with this prefix are loaded.
    pub prefix: String,
    /// Classes whose documented parent is bogus (self-referential) and must be dropped.
    pub detached_classes: Vec<String>,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            detached_classes: vec!["Ext.Error".to_string()],
        }
    }
}

/// All documented classes plus name, alias and parent lookups.
#[derive(Debug)]
pub struct ClassRegistry {
    classes: Vec<ClassRecord>,
    by_name: HashMap<String, ClassId>,
    parents: Vec<Option<ClassId>>,
    /// Classes whose parent link was cleared to break an inheritance cycle.
    cycle_breaks: HashSet<ClassId>,
    modules: Vec<Module>,
}

impl ClassRegistry {
    /// Read every record file in `dir` and build the registry.
    pub fn load(dir: &Path, options: &RegistryOptions) -> Result<Self> {
        let mut classes = Vec::new();

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|err| Error::ReadDir {
                path: dir.to_path_buf(),
                source: err.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            if !file_name.starts_with(&options.prefix) {
                debug!(file = %file_name, "Skipping file outside the library prefix.");
                continue;
            }

            let path = entry.path();
            let contents = fs::read_to_string(path).map_err(|source| Error::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
            classes.push(parse_record(path, &contents)?);
        }

        debug!(classes = classes.len(), dir = %dir.display(), "Loaded class records.");
        Ok(Self::from_classes(classes, options))
    }

    /// Build the registry from already-parsed records, in documentation order.
    pub fn from_classes(mut classes: Vec<ClassRecord>, options: &RegistryOptions) -> Self {
        for cls in &mut classes {
            if options.detached_classes.contains(&cls.name) {
                cls.parent.clear();
            }
        }

        let mut by_name = HashMap::with_capacity(classes.len() * 2);
        for (index, cls) in classes.iter().enumerate() {
            by_name.insert(cls.name.clone(), ClassId(index));
        }
        for (index, cls) in classes.iter().enumerate() {
            for alias in &cls.aliases {
                by_name.insert(alias.clone(), ClassId(index));
            }
        }

        let parents = classes
            .iter()
            .map(|cls| {
                if cls.parent.is_empty() {
                    None
                } else {
                    by_name.get(&cls.parent).copied()
                }
            })
            .collect();

        let mut registry = Self {
            classes,
            by_name,
            parents,
            cycle_breaks: HashSet::new(),
            modules: Vec::new(),
        };
        registry.break_cycles();
        registry.modules = registry.group_modules();
        registry
    }

    /// Clear the parent link that closes each inheritance cycle.
    fn break_cycles(&mut self) {
        // 0 = unvisited, 1 = on the current path, 2 = known to reach a root
        let mut state = vec![0u8; self.classes.len()];
        for start in 0..self.classes.len() {
            let mut path = Vec::new();
            let mut current = Some(ClassId(start));
            while let Some(id) = current {
                match state[id.0] {
                    2 => break,
                    1 => {
                        // `path` ends with the class whose parent is `id`
                        if let Some(&closing) = path.last() {
                            warn!(
                                class = %self.class(closing).name,
                                parent = %self.class(id).name,
                                "Breaking inheritance cycle."
                            );
                            self.parents[closing.0] = None;
                            self.cycle_breaks.insert(closing);
                        }
                        break;
                    }
                    _ => {
                        state[id.0] = 1;
                        path.push(id);
                        current = self.parents[id.0];
                    }
                }
            }
            for id in path {
                state[id.0] = 2;
            }
        }
    }

    fn group_modules(&self) -> Vec<Module> {
        let mut modules: Vec<Module> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, cls) in self.classes.iter().enumerate() {
            let name = cls.module_name();
            let slot = *index.entry(name).or_insert_with(|| {
                modules.push(Module {
                    name: name.to_string(),
                    classes: Vec::new(),
                });
                modules.len() - 1
            });
            modules[slot].classes.push(ClassId(i));
        }
        modules.sort_by(|a, b| a.name.cmp(&b.name));
        modules
    }

    /// Look up a class by primary name or any alias.
    pub fn lookup_class(&self, name: &str) -> Option<&ClassRecord> {
        self.lookup_id(name).map(|id| self.class(id))
    }

    /// Look up a class id by primary name or any alias.
    pub fn lookup_id(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    /// Resolve an alias to the primary class name.
    pub fn normalize_class_name(&self, name: &str) -> Option<&str> {
        self.lookup_class(name).map(|cls| cls.name.as_str())
    }

    /// First member of `cls` named `name`, optionally restricted by kind and static side.
    pub fn lookup_member<'a>(
        &self,
        cls: &'a ClassRecord,
        name: &str,
        kinds: Option<&[MemberKind]>,
        is_static: Option<bool>,
    ) -> Option<&'a MemberRecord> {
        cls.members.iter().find(|member| {
            member.name == name
                && kinds.is_none_or(|kinds| kinds.contains(&member.kind))
                && is_static.is_none_or(|side| member.is_static == side)
        })
    }

    pub fn class(&self, id: ClassId) -> &ClassRecord {
        &self.classes[id.0]
    }

    /// Resolved parent, `None` for roots, for parents that are not documented
    /// and for links that closed a cycle.
    pub fn parent(&self, id: ClassId) -> Option<ClassId> {
        self.parents[id.0]
    }

    /// Whether the documented parent of `id` was dropped to break a cycle.
    pub fn breaks_cycle(&self, id: ClassId) -> bool {
        self.cycle_breaks.contains(&id)
    }

    pub fn classes(&self) -> &[ClassRecord] {
        &self.classes
    }

    /// Modules sorted by name.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

fn parse_record(path: &Path, contents: &str) -> Result<ClassRecord> {
    let value: serde_json::Value =
        serde_json::from_str(contents).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let tagname = value
        .get("tagname")
        .and_then(|tag| tag.as_str())
        .unwrap_or_default();
    if tagname != "class" {
        return Err(Error::UnknownTagname {
            path: path.to_path_buf(),
            tagname: tagname.to_string(),
        });
    }

    serde_json::from_value(value).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}
