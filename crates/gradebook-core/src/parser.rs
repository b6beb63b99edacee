//! YAML exam definition parser.
//!
//! The definition is a nested mapping: exercise id → question id → task id.
//! On every level the keys `weight` and `description` are options rather
//! than children; tasks additionally accept `max`. A task may also be given
//! as a bare integer (its `max`) or left empty (all defaults).
//!
//! ```yaml
//! 1:
//!   description: Algebra
//!   weight: 2
//!   a:
//!     description: Solve for x
//!     i: { max: 4 }
//!     ii: 6
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};

use crate::error::GradebookError;
use crate::model::{Exam, ExerciseDef, QuestionDef, TaskDef, DEFAULT_DESCRIPTION};

const WEIGHT: &str = "weight";
const DESCRIPTION: &str = "description";
const MAX: &str = "max";

/// Options applied while turning a definition into a tree.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Description for nodes that do not carry one.
    pub description_placeholder: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            description_placeholder: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

/// Read and parse an exam definition file.
pub fn parse_exam(path: &Path, options: &ParseOptions) -> Result<Exam> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exam definition: {}", path.display()))?;

    let exam = parse_exam_str(&content, options)
        .with_context(|| format!("failed to load exam definition: {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        tasks = exam.task_count(),
        points = exam.points_total(),
        "loaded exam definition"
    );
    Ok(exam)
}

/// Parse a YAML string into an [`Exam`].
pub fn parse_exam_str(content: &str, options: &ParseOptions) -> Result<Exam, GradebookError> {
    let root: Value = serde_yaml::from_str(content).map_err(|e| {
        GradebookError::MalformedDefinition {
            node: "<root>".into(),
            reason: e.to_string(),
        }
    })?;

    let defs = parse_definitions(&root, options)?;
    Exam::from_definitions(defs)
}

/// Interpret a YAML value as the list of exercise definitions.
pub fn parse_definitions(
    root: &Value,
    options: &ParseOptions,
) -> Result<Vec<ExerciseDef>, GradebookError> {
    let map = match root {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(map) => map,
        _ => return Err(malformed("<root>", "expected a mapping of exercises")),
    };

    let mut exercises = Vec::with_capacity(map.len());
    for (key, value) in map {
        let id = node_id(key, "<root>")?;
        exercises.push(parse_exercise(id, value, options)?);
    }
    Ok(exercises)
}

fn parse_exercise(
    id: String,
    value: &Value,
    options: &ParseOptions,
) -> Result<ExerciseDef, GradebookError> {
    let path = id.clone();
    let mut def = ExerciseDef::new(id).description(options.description_placeholder.clone());

    let Some(map) = branch(value, &path, "exercise")? else {
        return Ok(def);
    };
    for (key, child) in map {
        let child_id = node_id(key, &path)?;
        match child_id.as_str() {
            WEIGHT => def.weight = weight(child, &path)?,
            DESCRIPTION => def.description = description(child, &path, options)?,
            _ => {
                let question = parse_question(child_id, child, &path, options)?;
                def.questions.push(question);
            }
        }
    }
    Ok(def)
}

fn parse_question(
    id: String,
    value: &Value,
    parent: &str,
    options: &ParseOptions,
) -> Result<QuestionDef, GradebookError> {
    let path = format!("{parent}/{id}");
    let mut def = QuestionDef::new(id).description(options.description_placeholder.clone());

    let Some(map) = branch(value, &path, "question")? else {
        return Ok(def);
    };
    for (key, child) in map {
        let child_id = node_id(key, &path)?;
        match child_id.as_str() {
            WEIGHT => def.weight = weight(child, &path)?,
            DESCRIPTION => def.description = description(child, &path, options)?,
            _ => {
                let task = parse_task(child_id, child, &path, options)?;
                def.tasks.push(task);
            }
        }
    }
    Ok(def)
}

fn parse_task(
    id: String,
    value: &Value,
    parent: &str,
    options: &ParseOptions,
) -> Result<TaskDef, GradebookError> {
    let path = format!("{parent}/{id}");
    let mut def = TaskDef::new(id).description(options.description_placeholder.clone());

    match value {
        Value::Null => {}
        Value::Number(_) => def.max = max(value, &path)?,
        Value::Mapping(map) => {
            for (key, option) in map {
                let name = node_id(key, &path)?;
                match name.as_str() {
                    WEIGHT => def.weight = weight(option, &path)?,
                    MAX => def.max = max(option, &path)?,
                    DESCRIPTION => def.description = description(option, &path, options)?,
                    other => {
                        return Err(malformed(&path, &format!("unknown task option '{other}'")))
                    }
                }
            }
        }
        _ => return Err(malformed(&path, "cannot be interpreted as a task")),
    }
    Ok(def)
}

/// A branch node is either a mapping or empty.
fn branch<'a>(
    value: &'a Value,
    path: &str,
    kind: &str,
) -> Result<Option<&'a Mapping>, GradebookError> {
    match value {
        Value::Null => Ok(None),
        Value::Mapping(map) => Ok(Some(map)),
        _ => Err(malformed(path, &format!("{kind} must be a mapping"))),
    }
}

fn node_id(key: &Value, parent: &str) -> Result<String, GradebookError> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(malformed(parent, "ids must be strings or numbers")),
    }
}

fn weight(value: &Value, path: &str) -> Result<f64, GradebookError> {
    match value {
        Value::Null => Ok(1.0),
        Value::Number(n) => n
            .as_f64()
            .filter(|w| w.is_finite() && *w > 0.0)
            .ok_or_else(|| malformed(path, &format!("weight must be positive, got {n}"))),
        _ => Err(malformed(path, "weight must be a number")),
    }
}

fn max(value: &Value, path: &str) -> Result<u32, GradebookError> {
    match value {
        Value::Null => Ok(1),
        Value::Number(n) => n
            .as_u64()
            .and_then(|m| u32::try_from(m).ok())
            .filter(|m| *m > 0)
            .ok_or_else(|| malformed(path, &format!("max must be a positive integer, got {n}"))),
        _ => Err(malformed(path, "max must be a positive integer")),
    }
}

fn description(
    value: &Value,
    path: &str,
    options: &ParseOptions,
) -> Result<String, GradebookError> {
    match value {
        Value::Null => Ok(options.description_placeholder.clone()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(malformed(path, "description must be text")),
    }
}

fn malformed(node: &str, reason: &str) -> GradebookError {
    GradebookError::MalformedDefinition {
        node: node.to_string(),
        reason: reason.to_string(),
    }
}
