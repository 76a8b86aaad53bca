//! # Test Database Module / 测试数据库模块
//!
//! This module defines the typed model of the YAML test database: kernel
//! trees, architectures, named test sets, host types, and suites of test
//! cases. Loading happens in two phases. The schema engine first validates
//! the raw document, inlines the suite files it references, and migrates
//! legacy layouts; the normalized document is then deserialized into the
//! structs below.
//!
//! 此模块定义 YAML 测试数据库的类型化模型：内核树、架构、命名测试集、
//! 主机类型以及测试用例套件。加载分两个阶段进行。模式引擎首先验证原始文档、
//! 内联其引用的套件文件并迁移旧版布局；归一化后的文档再被反序列化为下面的结构体。

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::core::schema::{Context, Schema, Step};
use crate::infra::fs;

/// A kernel tree jobs can be generated for.
/// 可为其生成作业的内核树。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tree {
    /// Human-readable description shown by the listing command.
    /// 由列表命令显示的人类可读描述。
    #[serde(default)]
    pub description: String,
    /// Literal distro-selection XML included verbatim in every recipe
    /// generated for this tree.
    /// 逐字包含在为此树生成的每个配方中的发行版选择 XML。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distro_requires: Option<String>,
}

/// A lab host type cases can be grouped onto.
/// 测试用例可分组到的实验室主机类型。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostType {
    #[serde(default)]
    pub description: String,
    /// Pins recipes for this host type to one specific machine.
    /// 将此主机类型的配方固定到一台特定机器。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// If `true`, generated recipes ask the lab watchdog to ignore kernel
    /// panics instead of aborting the run.
    /// 若为 `true`，生成的配方会要求实验室看门狗忽略内核 panic 而不是中止运行。
    #[serde(default)]
    pub ignore_panic: bool,
    /// Literal host-selection XML included inside `hostRequires`.
    /// 包含在 `hostRequires` 内的主机选择 XML。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_requires: Option<String>,
    /// Literal partitioning XML included inside the recipe.
    /// 包含在配方内的分区 XML。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partitions: Option<String>,
}

/// One applicability pattern of a test case. Every present field constrains
/// the target; an absent field constrains nothing. All regexes are matched
/// fully anchored.
///
/// 测试用例的一条适用性模式。每个出现的字段都约束目标；缺失的字段不作约束。
/// 所有正则都做完全锚定匹配。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trees: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arches: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sets: Vec<String>,
    /// Matched against the source paths touched by the supplied patches.
    /// 与所提供补丁改动的源码路径进行匹配。
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

/// A single test case within a suite.
/// 套件中的单个测试用例。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Task path under the suite location, rendered as the fetch subdir.
    /// 套件位置下的任务路径，渲染为 fetch 的 subdir。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_duration_seconds: Option<u64>,
    /// Overrides the suite-level host type regex for this case.
    /// 覆盖套件级主机类型正则。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_type_regex: Option<String>,
    /// Waived cases are excluded from generation unless asked for.
    /// 除非明确要求，豁免用例不参与生成。
    #[serde(default)]
    pub waived: bool,
    /// Extra task parameters rendered as `param` elements.
    /// 渲染为 `param` 元素的额外任务参数。
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<Pattern>,
}

/// A suite of test cases sharing a fetch location and maintainers.
/// 共享获取位置与维护者的测试用例套件。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suite {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Base fetch URL of the suite's tasks. May contain `${...}`
    /// placeholders expanded at render time.
    /// 套件任务的基础获取 URL。可包含在渲染时展开的 `${...}` 占位符。
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_type_regex: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maintainers: Vec<String>,
    pub cases: Vec<Case>,
}

/// The whole test database.
/// 整个测试数据库。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub description: String,
    pub trees: BTreeMap<String, Tree>,
    pub arches: Vec<String>,
    /// Named test sets cases can be restricted to.
    /// 用例可被限定到的命名测试集。
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sets: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub host_types: BTreeMap<String, HostType>,
    /// Database-wide default host type regex for suites that do not set one.
    /// 未自行设置时套件使用的数据库级默认主机类型正则。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_type_regex: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suites: Vec<Suite>,
}

impl Database {
    /// Loads a database from a YAML file: schema-resolve, then deserialize.
    /// A leading `~` in the path is expanded to the home directory.
    ///
    /// 从 YAML 文件加载数据库：先模式解析，再反序列化。路径开头的 `~` 会展开为主目录。
    pub fn load(path: &Path) -> Result<Self> {
        let path = fs::expand_path(path);
        let path = fs::absolute_path(&path)?;
        let text = fs::read_to_string(&path)?;
        let raw: Value = serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let resolved = database_schema()
            .resolve(raw, &Context::new(base_dir))
            .with_context(|| format!("Invalid database {}", path.display()))?;
        let database: Database = serde_yaml::from_value(resolved)
            .with_context(|| format!("Failed to deserialize {}", path.display()))?;
        Ok(database)
    }

    /// The host type regex in effect for a case: the case's own, then the
    /// suite's, then the database default.
    pub fn effective_host_type_regex<'a>(
        &'a self,
        suite: &'a Suite,
        case: &'a Case,
    ) -> Option<&'a str> {
        case.host_type_regex
            .as_deref()
            .or(suite.host_type_regex.as_deref())
            .or(self.host_type_regex.as_deref())
    }
}

/// The schema of the suite YAML files referenced from the database file.
fn suite_schema() -> Schema {
    Schema::Struct {
        required: vec![
            ("name", Schema::Str),
            ("location", Schema::Str),
            ("cases", Schema::List(Box::new(case_schema()))),
        ],
        optional: vec![
            ("description", Schema::Str),
            ("host_type_regex", Schema::Regex),
            ("maintainers", Schema::List(Box::new(Schema::Str))),
        ],
    }
}

fn case_schema() -> Schema {
    Schema::Struct {
        required: vec![("name", Schema::Str)],
        optional: vec![
            ("description", Schema::Str),
            ("tasks", Schema::Str),
            ("max_duration_seconds", Schema::Int),
            ("host_type_regex", Schema::Regex),
            ("waived", Schema::Bool),
            ("environment", Schema::Map(Box::new(Schema::Str))),
            ("patterns", Schema::List(Box::new(pattern_schema()))),
        ],
    }
}

fn pattern_schema() -> Schema {
    Schema::Struct {
        required: vec![],
        optional: vec![
            ("trees", Schema::List(Box::new(Schema::Regex))),
            ("arches", Schema::List(Box::new(Schema::Regex))),
            ("sets", Schema::List(Box::new(Schema::Regex))),
            ("sources", Schema::List(Box::new(Schema::Regex))),
        ],
    }
}

fn host_type_schema() -> Schema {
    Schema::Struct {
        required: vec![],
        optional: vec![
            ("description", Schema::Str),
            ("hostname", Schema::Str),
            ("ignore_panic", Schema::Bool),
            ("host_requires", Schema::Str),
            ("partitions", Schema::Str),
        ],
    }
}

fn tree_schema() -> Schema {
    Schema::Struct {
        required: vec![],
        optional: vec![
            ("description", Schema::Str),
            ("distro_requires", Schema::Str),
        ],
    }
}

/// The `trees` table accepts two layouts: the legacy one mapping tree names
/// to plain description strings, and the current one mapping them to tree
/// structs. Legacy data is migrated by wrapping each description.
fn trees_schema() -> Schema {
    Schema::ancestry(vec![
        Step::Version(Schema::Map(Box::new(Schema::Str))),
        Step::Convert(wrap_tree_descriptions),
        Step::Version(Schema::Map(Box::new(tree_schema()))),
    ])
}

fn wrap_tree_descriptions(data: Value) -> Value {
    match data {
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(name, description)| {
                    let mut tree = serde_yaml::Mapping::with_capacity(1);
                    tree.insert(Value::from("description"), description);
                    (name, Value::Mapping(tree))
                })
                .collect(),
        ),
        other => other,
    }
}

/// The schema of the top-level database file. Suite entries are relative
/// paths to suite YAML files, inlined at resolution time with paths inside
/// each file resolving against that file's directory.
pub fn database_schema() -> Schema {
    Schema::Struct {
        required: vec![
            ("trees", trees_schema()),
            ("arches", Schema::List(Box::new(Schema::Str))),
        ],
        optional: vec![
            ("description", Schema::Str),
            ("sets", Schema::Map(Box::new(Schema::Str))),
            ("host_types", Schema::Map(Box::new(host_type_schema()))),
            ("host_type_regex", Schema::Regex),
            (
                "suites",
                Schema::List(Box::new(Schema::ScopedYamlFile(Box::new(suite_schema())))),
            ),
        ],
    }
}
