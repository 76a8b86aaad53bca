//! # Beaker Document Module / Beaker 文档模块
//!
//! This module renders the composed job model into the Beaker job XML
//! document. The document is built with `maud` markup: `@if` drives the
//! conditional includes (host requirements, partitions, distro selection,
//! watchdog), `@for` drives the loops over recipes and tasks. Text and
//! attribute values are escaped; the only pre-escaped insertions are the
//! literal XML snippet fields carried by the database. `${...}`
//! placeholders are expanded from the job's variable table before the
//! markup is built.
//!
//! 此模块将组合出的作业模型渲染为 Beaker 作业 XML 文档。
//! 文档使用 `maud` 标记构建：`@if` 驱动条件包含（主机要求、分区、发行版选择、
//! 看门狗），`@for` 驱动对配方与任务的循环。文本与属性值均会转义；
//! 唯一的预转义插入是数据库携带的 XML 片段字段。
//! `${...}` 占位符在构建标记前由作业的变量表展开。

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use maud::{Markup, PreEscaped, html};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::planner::{Job, Recipe, TaskSpec};

/// Declaration emitted ahead of the markup.
const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";

static VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Expands `${name}` placeholders from the variable table. An unknown
/// placeholder is an error rather than passing through into the document.
///
/// 从变量表展开 `${name}` 占位符。未知占位符会报错，而不是原样进入文档。
pub fn expand_vars(input: &str, vars: &BTreeMap<String, String>) -> Result<String> {
    let mut output = String::with_capacity(input.len());
    let mut last = 0;
    for captures in VAR_RE.captures_iter(input) {
        let matched = captures.get(0).unwrap();
        let name = &captures[1];
        let Some(value) = vars.get(name) else {
            bail!("Unknown template variable: ${{{name}}}");
        };
        output.push_str(&input[last..matched.start()]);
        output.push_str(value);
        last = matched.end();
    }
    output.push_str(&input[last..]);
    Ok(output)
}

/// Renders a composed job into the Beaker XML document.
/// 将组合出的作业渲染为 Beaker XML 文档。
pub fn render_job(job: &Job) -> Result<String> {
    let job = expand_job(job)?;
    let markup = html! {
        job {
            whiteboard { (job.description) }
            @for recipe_set in &job.recipe_sets {
                recipeSet {
                    @for recipe in &recipe_set.recipes {
                        (render_recipe(recipe))
                    }
                }
            }
        }
    };
    Ok(format!("{}\n{}", XML_DECLARATION, markup.into_string()))
}

fn render_recipe(recipe: &Recipe) -> Markup {
    html! {
        recipe whiteboard=[recipe.host_type.as_deref()] {
            @if let Some(hostname) = &recipe.hostname {
                hostRequires force=(hostname) {}
            } @else {
                @if let Some(snippet) = &recipe.host_requires {
                    hostRequires { (PreEscaped(snippet)) }
                } @else {
                    hostRequires {}
                }
            }
            @if let Some(snippet) = &recipe.distro_requires {
                distroRequires { (PreEscaped(snippet)) }
            }
            @if let Some(snippet) = &recipe.partitions {
                partitions { (PreEscaped(snippet)) }
            }
            @if recipe.ignore_panic {
                watchdog panic="ignore" {}
            }
            @for task in &recipe.tasks {
                (render_task(task))
            }
        }
    }
}

fn render_task(task: &TaskSpec) -> Markup {
    html! {
        task name=(task.name) role="STANDALONE" {
            @if let Some(fetch) = &task.fetch {
                fetch url=(fetch.url) subdir=[fetch.subdir.as_deref()] {}
            }
            @if !task.params.is_empty() {
                params {
                    @for (name, value) in &task.params {
                        param name=(name) value=(value) {}
                    }
                }
            }
        }
    }
}

/// Produces a copy of the job with every placeholder expanded: the
/// whiteboard text, fetch URLs and subdirs, parameter values, and the
/// literal snippet fields.
fn expand_job(job: &Job) -> Result<Job> {
    let vars = &job.vars;
    let mut expanded = job.clone();
    expanded.description = expand_vars(&job.description, vars)?;
    for recipe_set in &mut expanded.recipe_sets {
        for recipe in &mut recipe_set.recipes {
            expand_opt(&mut recipe.host_requires, vars)?;
            expand_opt(&mut recipe.partitions, vars)?;
            expand_opt(&mut recipe.distro_requires, vars)?;
            for task in &mut recipe.tasks {
                task.name = expand_vars(&task.name, vars)?;
                if let Some(fetch) = &mut task.fetch {
                    fetch.url = expand_vars(&fetch.url, vars)?;
                    let mut subdir = fetch.subdir.take();
                    expand_opt(&mut subdir, vars)?;
                    fetch.subdir = subdir;
                }
                for (_name, value) in &mut task.params {
                    *value = expand_vars(value, vars)?;
                }
            }
        }
    }
    Ok(expanded)
}

fn expand_opt(field: &mut Option<String>, vars: &BTreeMap<String, String>) -> Result<()> {
    if let Some(text) = field {
        *text = expand_vars(text, vars)?;
    }
    Ok(())
}
