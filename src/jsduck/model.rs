//! JSDuck `--export=full` record structs for serde deserialization.
//!
//! The export format is undocumented; this is the subset the declaration
//! emitter needs. JSDuck writes `null` for many absent values, so most fields
//! go through [`null_default`].

use serde::{Deserialize, Deserializer};

/// Deserialize `null` (or a missing field, together with `#[serde(default)]`) as `T::default()`.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One documented class, as found in a single record file.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassRecord {
    /// Fully-qualified dotted name, e.g. `Ext.data.Store`.
    pub name: String,
    #[serde(rename = "alternateClassNames", default, deserialize_with = "null_default")]
    pub aliases: Vec<String>,
    /// Parent class name; empty when the class has no parent.
    #[serde(rename = "extends", default, deserialize_with = "null_default")]
    pub parent: String,
    #[serde(default, deserialize_with = "null_default")]
    pub singleton: bool,
    /// Members in source order, including ones inherited from ancestors.
    #[serde(default, deserialize_with = "null_default")]
    pub members: Vec<MemberRecord>,
    #[serde(default, deserialize_with = "null_default")]
    pub mixins: Vec<String>,
    #[serde(rename = "enum", default)]
    pub enum_info: Option<EnumInfo>,
    #[serde(default, deserialize_with = "null_default")]
    pub short_doc: String,
}

impl ClassRecord {
    /// The last dotted segment: `Store` for `Ext.data.Store`.
    pub fn base_name(&self) -> &str {
        self.name.rsplit_once('.').map_or(self.name.as_str(), |(_, base)| base)
    }

    /// Everything before the last dotted segment; empty for top-level classes.
    pub fn module_name(&self) -> &str {
        self.name.rsplit_once('.').map_or("", |(module, _)| module)
    }

    /// The enumeration's backing type, if this class documents an enum.
    pub fn enum_type(&self) -> Option<&str> {
        self.enum_info
            .as_ref()
            .map(|info| info.ty.as_str())
            .filter(|ty| !ty.is_empty())
    }
}

/// Backing scalar type of an enumeration class.
#[derive(Debug, Clone, Deserialize)]
pub struct EnumInfo {
    #[serde(rename = "type", default, deserialize_with = "null_default")]
    pub ty: String,
}

/// Member tag kinds. JSDuck also exports events, CSS variables and mixins;
/// those land in [`MemberKind::Other`] and are never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Property,
    Method,
    Config,
    Other,
}

impl MemberKind {
    /// The JSDuck tag name, as used in documentation URLs.
    pub fn tag(self) -> &'static str {
        match self {
            MemberKind::Property => "property",
            MemberKind::Method => "method",
            MemberKind::Config => "cfg",
            MemberKind::Other => "other",
        }
    }

    fn from_tag(tag: &str) -> Self {
        match tag {
            "property" => MemberKind::Property,
            "method" => MemberKind::Method,
            "cfg" => MemberKind::Config,
            _ => MemberKind::Other,
        }
    }
}

/// Kinds consulted when deciding whether an ancestor already declares a name.
pub const DECLARING_KINDS: &[MemberKind] =
    &[MemberKind::Property, MemberKind::Method, MemberKind::Config];

/// One documented member of a class.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawMember")]
pub struct MemberRecord {
    pub name: String,
    pub kind: MemberKind,
    /// Documented type in JSDuck's informal grammar.
    pub ty: String,
    pub private: bool,
    pub protected: bool,
    pub is_static: bool,
    pub optional: bool,
    pub required: bool,
    /// Parameters, in documented order. Only methods have any.
    pub params: Vec<ParamRecord>,
    /// Return descriptor. Only methods have one.
    pub returns: Option<ParamRecord>,
    pub short_doc: String,
}

impl MemberRecord {
    pub fn is_constructor(&self) -> bool {
        self.kind == MemberKind::Method && self.name == "constructor"
    }
}

#[derive(Deserialize)]
struct RawMember {
    #[serde(default, deserialize_with = "null_default")]
    tagname: String,
    #[serde(default, deserialize_with = "null_default")]
    name: String,
    #[serde(rename = "type", default, deserialize_with = "null_default")]
    ty: String,
    #[serde(default, deserialize_with = "null_default")]
    private: bool,
    #[serde(default, deserialize_with = "null_default")]
    protected: bool,
    #[serde(rename = "static", default, deserialize_with = "null_default")]
    is_static: bool,
    #[serde(default, deserialize_with = "null_default")]
    optional: bool,
    #[serde(default, deserialize_with = "null_default")]
    required: bool,
    #[serde(default, deserialize_with = "null_default")]
    params: Vec<ParamRecord>,
    #[serde(rename = "return", default)]
    returns: Option<ParamRecord>,
    #[serde(default, deserialize_with = "null_default")]
    short_doc: String,
}

impl From<RawMember> for MemberRecord {
    fn from(raw: RawMember) -> Self {
        let kind = MemberKind::from_tag(&raw.tagname);
        let (params, returns) = if kind == MemberKind::Method {
            (raw.params, raw.returns)
        } else {
            (Vec::new(), None)
        };
        Self {
            name: raw.name,
            kind,
            ty: raw.ty,
            private: raw.private,
            protected: raw.protected,
            is_static: raw.is_static,
            optional: raw.optional,
            required: raw.required,
            params,
            returns,
            short_doc: raw.short_doc,
        }
    }
}

/// A method parameter, a return descriptor, or a callback's own parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParamRecord {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_default")]
    pub ty: String,
    #[serde(default, deserialize_with = "null_default")]
    pub optional: bool,
    /// Parameters (and `return`) of a callback type.
    #[serde(default)]
    pub properties: Option<Vec<ParamRecord>>,
    #[serde(default, deserialize_with = "null_default")]
    pub short_doc: String,
}
