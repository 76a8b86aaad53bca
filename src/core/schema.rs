//! # Database Schema Module / 数据库模式模块
//!
//! This module implements the schema engine used to validate and resolve the
//! YAML test database before it is deserialized into the typed model.
//! Schemas are composable trees of nodes: scalars, regex-validated strings,
//! file inclusions, lists, maps, structs, and a versioned `Ancestry` that
//! migrates legacy database layouts to the current one.
//!
//! 此模块实现用于在反序列化为类型化模型之前验证和解析 YAML 测试数据库的模式引擎。
//! 模式是可组合的节点树：标量、经正则验证的字符串、文件包含、列表、映射、
//! 结构体，以及将旧版数据库布局迁移到当前布局的带版本 `Ancestry`。

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

/// Invalid data error. Each layer of the schema tree that rejects a value
/// wraps the cause, so the rendered message walks from the outermost
/// container down to the offending scalar, one cause per line.
///
/// 无效数据错误。模式树中拒绝值的每一层都会包装其原因，
/// 因此渲染出的消息会从最外层容器逐行走到出错的标量。
#[derive(Debug)]
pub struct Invalid {
    msg: String,
    source: Option<Box<Invalid>>,
}

impl Invalid {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            source: None,
        }
    }

    pub fn wrap(msg: impl Into<String>, cause: Invalid) -> Self {
        Self {
            msg: msg.into(),
            source: Some(Box::new(cause)),
        }
    }

    /// The message of this layer alone, without the cause chain.
    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl fmt::Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg)?;
        if let Some(cause) = &self.source {
            write!(f, ":\n{}", cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for Invalid {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// Resolution context. Relative paths encountered during resolution are
/// interpreted against `base_dir`; scoped file inclusion narrows it to the
/// included file's directory instead of changing the process directory.
///
/// 解析上下文。解析期间遇到的相对路径以 `base_dir` 为基准；
/// 作用域文件包含会将其收窄为被包含文件所在目录，而不是改变进程目录。
#[derive(Debug, Clone)]
pub struct Context {
    base_dir: PathBuf,
}

impl Context {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Joins a possibly-relative path onto the context directory.
    pub fn join(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// A step of an [`Schema::Ancestry`] succession: either one accepted schema
/// version, or a converter carrying data from the preceding version to the
/// next one.
pub enum Step {
    Version(Schema),
    Convert(fn(Value) -> Value),
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Version(schema) => f.debug_tuple("Version").field(schema).finish(),
            Step::Convert(_) => f.debug_tuple("Convert").finish_non_exhaustive(),
        }
    }
}

/// A composable schema node.
///
/// `validate` checks a value without touching it. `resolve` validates and
/// normalizes: file references are inlined, relative paths are absolutized,
/// and legacy layouts are migrated. The resolved value is what the typed
/// database model deserializes from.
///
/// 可组合的模式节点。`validate` 只检查值而不改动它。`resolve` 验证并归一化：
/// 内联文件引用、将相对路径绝对化、迁移旧版布局。
/// 解析后的值即类型化数据库模型反序列化的来源。
#[derive(Debug)]
pub enum Schema {
    /// A plain string.
    Str,
    /// An integer number.
    Int,
    /// A floating-point number.
    Float,
    /// A boolean.
    Bool,
    /// A string that must compile as a regular expression.
    Regex,
    /// A file path, resolved to its absolute form against the context.
    RelFilePath,
    /// A path to a YAML file, resolved to the file's contents resolved
    /// against the inner schema. Relative paths inside the file keep
    /// resolving against the outer context.
    YamlFile(Box<Schema>),
    /// Like [`Schema::YamlFile`], but relative paths inside the included
    /// file resolve against that file's own directory.
    ScopedYamlFile(Box<Schema>),
    /// A sequence with every element matching one schema.
    List(Box<Schema>),
    /// A string-keyed mapping with every value matching one schema.
    Map(Box<Schema>),
    /// A string-keyed mapping with a fixed set of per-key schemas.
    /// Members outside `required` and `optional` are rejected.
    Struct {
        required: Vec<(&'static str, Schema)>,
        optional: Vec<(&'static str, Schema)>,
    },
    /// A succession of accepted schema versions interleaved with
    /// converters. Validates against any version; resolves by migrating the
    /// data forward from the first version it matches.
    Ancestry(Vec<Step>),
}

impl Schema {
    /// Builds an ancestry, checking the succession starts and ends with a
    /// schema version.
    pub fn ancestry(steps: Vec<Step>) -> Self {
        debug_assert!(!steps.is_empty());
        debug_assert!(matches!(steps.first(), Some(Step::Version(_))));
        debug_assert!(matches!(steps.last(), Some(Step::Version(_))));
        Schema::Ancestry(steps)
    }

    /// Validates a value against this schema.
    pub fn validate(&self, data: &Value, ctx: &Context) -> Result<(), Invalid> {
        match self {
            Schema::Str
            | Schema::RelFilePath
            | Schema::YamlFile(_)
            | Schema::ScopedYamlFile(_) => expect_str(data).map(|_| ()),
            Schema::Int => match data {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(()),
                other => Err(type_error(other, "an integer")),
            },
            Schema::Float => match data {
                Value::Number(n) if n.is_f64() => Ok(()),
                other => Err(type_error(other, "a floating-point number")),
            },
            Schema::Bool => match data {
                Value::Bool(_) => Ok(()),
                other => Err(type_error(other, "a boolean")),
            },
            Schema::Regex => {
                let text = expect_str(data)?;
                regex::Regex::new(text).map(|_| ()).map_err(|error| {
                    Invalid::wrap(
                        "invalid regular expression",
                        Invalid::new(error.to_string()),
                    )
                })
            }
            Schema::List(element) => {
                let items = expect_seq(data)?;
                for (index, item) in items.iter().enumerate() {
                    element.validate(item, ctx).map_err(|cause| {
                        Invalid::wrap(format!("invalid value at index {index}"), cause)
                    })?;
                }
                Ok(())
            }
            Schema::Map(value_schema) => {
                let mapping = expect_map(data)?;
                for (key, value) in mapping {
                    let key = mapping_key(key)?;
                    value_schema.validate(value, ctx).map_err(|cause| {
                        Invalid::wrap(format!("invalid value with key \"{key}\""), cause)
                    })?;
                }
                Ok(())
            }
            Schema::Struct { required, optional } => {
                let mapping = expect_map(data)?;
                for (name, member) in required {
                    match mapping.get(*name) {
                        None => {
                            return Err(Invalid::new(format!("member \"{name}\" is missing")));
                        }
                        Some(value) => member.validate(value, ctx).map_err(|cause| {
                            Invalid::wrap(format!("member \"{name}\" is invalid"), cause)
                        })?,
                    }
                }
                for (name, member) in optional {
                    if let Some(value) = mapping.get(*name) {
                        member.validate(value, ctx).map_err(|cause| {
                            Invalid::wrap(format!("member \"{name}\" is invalid"), cause)
                        })?;
                    }
                }
                for key in mapping.keys() {
                    let key = mapping_key(key)?;
                    let known = required.iter().any(|(name, _)| *name == key)
                        || optional.iter().any(|(name, _)| *name == key);
                    if !known {
                        return Err(Invalid::new(format!(
                            "unexpected member \"{key}\" encountered"
                        )));
                    }
                }
                Ok(())
            }
            Schema::Ancestry(steps) => {
                let mut last_error = None;
                for step in steps {
                    if let Step::Version(version) = step {
                        match version.validate(data, ctx) {
                            Ok(()) => return Ok(()),
                            Err(error) => last_error = Some(error),
                        }
                    }
                }
                Err(last_error.unwrap_or_else(|| Invalid::new("empty ancestry")))
            }
        }
    }

    /// Validates and normalizes a value according to this schema.
    pub fn resolve(&self, data: Value, ctx: &Context) -> Result<Value, Invalid> {
        match self {
            Schema::Str | Schema::Int | Schema::Float | Schema::Bool | Schema::Regex => {
                self.validate(&data, ctx)?;
                Ok(data)
            }
            Schema::RelFilePath => {
                let text = expect_str(&data)?;
                let absolute = ctx.join(text);
                Ok(Value::from(absolute.to_string_lossy().into_owned()))
            }
            Schema::YamlFile(inner) => resolve_yaml_file(&data, inner, ctx, false),
            Schema::ScopedYamlFile(inner) => resolve_yaml_file(&data, inner, ctx, true),
            Schema::List(element) => {
                let items = match data {
                    Value::Sequence(items) => items,
                    other => return Err(type_error(&other, "a sequence")),
                };
                let mut resolved = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    let item = element.resolve(item, ctx).map_err(|cause| {
                        Invalid::wrap(format!("invalid value at index {index}"), cause)
                    })?;
                    resolved.push(item);
                }
                Ok(Value::Sequence(resolved))
            }
            Schema::Map(value_schema) => {
                let mapping = match data {
                    Value::Mapping(mapping) => mapping,
                    other => return Err(type_error(&other, "a mapping")),
                };
                let mut resolved = serde_yaml::Mapping::with_capacity(mapping.len());
                for (key, value) in mapping {
                    let name = mapping_key(&key)?.to_string();
                    let value = value_schema.resolve(value, ctx).map_err(|cause| {
                        Invalid::wrap(format!("invalid value with key \"{name}\""), cause)
                    })?;
                    resolved.insert(key, value);
                }
                Ok(Value::Mapping(resolved))
            }
            Schema::Struct { required, optional } => {
                self.validate(&data, ctx)?;
                let mut mapping = match data {
                    Value::Mapping(mapping) => mapping,
                    other => return Err(type_error(&other, "a mapping")),
                };
                let mut resolved = serde_yaml::Mapping::with_capacity(mapping.len());
                for (name, member) in required.iter().chain(optional.iter()) {
                    if let Some(value) = mapping.remove(*name) {
                        let value = member.resolve(value, ctx).map_err(|cause| {
                            Invalid::wrap(format!("member \"{name}\" is invalid"), cause)
                        })?;
                        resolved.insert(Value::from(*name), value);
                    }
                }
                Ok(Value::Mapping(resolved))
            }
            Schema::Ancestry(steps) => {
                // Find the first matching version, then carry the data
                // through every later converter, validating against every
                // later version, and resolve with the last one that matched.
                let mut data = data;
                let mut last_valid: Option<&Schema> = None;
                let mut last_error = None;
                for step in steps {
                    match step {
                        Step::Version(version) => match version.validate(&data, ctx) {
                            Ok(()) => last_valid = Some(version),
                            Err(error) => {
                                if last_valid.is_some() {
                                    return Err(error);
                                }
                                last_error = Some(error);
                            }
                        },
                        Step::Convert(convert) => {
                            if last_valid.is_some() {
                                data = convert(data);
                            }
                        }
                    }
                }
                match last_valid {
                    Some(version) => version.resolve(data, ctx),
                    None => Err(last_error.unwrap_or_else(|| Invalid::new("empty ancestry"))),
                }
            }
        }
    }
}

fn resolve_yaml_file(
    data: &Value,
    inner: &Schema,
    ctx: &Context,
    scoped: bool,
) -> Result<Value, Invalid> {
    let text = expect_str(data)?;
    let path = ctx.join(text);
    let contents = fs::read_to_string(&path).map_err(|error| {
        Invalid::wrap(
            format!("failed to read {}", path.display()),
            Invalid::new(error.to_string()),
        )
    })?;
    let parsed: Value = serde_yaml::from_str(&contents).map_err(|error| {
        Invalid::wrap(
            format!("invalid contents of {}", path.display()),
            Invalid::new(error.to_string()),
        )
    })?;
    let inner_ctx = if scoped {
        Context::new(path.parent().unwrap_or_else(|| Path::new(".")))
    } else {
        ctx.clone()
    };
    inner
        .resolve(parsed, &inner_ctx)
        .map_err(|cause| Invalid::wrap(format!("invalid contents of {}", path.display()), cause))
}

fn expect_str(data: &Value) -> Result<&str, Invalid> {
    data.as_str().ok_or_else(|| type_error(data, "a string"))
}

fn expect_seq(data: &Value) -> Result<&Vec<Value>, Invalid> {
    data.as_sequence()
        .ok_or_else(|| type_error(data, "a sequence"))
}

fn expect_map(data: &Value) -> Result<&serde_yaml::Mapping, Invalid> {
    data.as_mapping()
        .ok_or_else(|| type_error(data, "a mapping"))
}

fn mapping_key(key: &Value) -> Result<&str, Invalid> {
    key.as_str().ok_or_else(|| {
        Invalid::new(format!(
            "key {:?} is {}, expecting a string",
            key,
            type_name(key)
        ))
    })
}

fn type_error(data: &Value, expected: &str) -> Invalid {
    Invalid::new(format!(
        "invalid type: {}, expecting {}",
        type_name(data),
        expected
    ))
}

fn type_name(data: &Value) -> &'static str {
    match data {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a floating-point number",
        Value::Number(_) => "an integer",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
