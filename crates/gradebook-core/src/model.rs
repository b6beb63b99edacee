//! The weighted exam tree: Exam → Exercise → Question → Task.
//!
//! The tree is built once from typed definitions (see [`ExerciseDef`]) and is
//! read-only afterwards. Children refer to their parents by index, which is
//! enough to compute apportioned weights and to form a task's global id.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::GradebookError;

/// Separator joining exercise, question and task ids into a global id.
pub const GLOBAL_ID_SEPARATOR: &str = "-";

/// The weighted point budget of a whole exam.
pub const WEIGHTED_POINTS_TOTAL: f64 = 100.0;

/// Description used when a definition omits one.
pub const DEFAULT_DESCRIPTION: &str = "(no description)";

/// Position of a task in its exam. Stable for the lifetime of the exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskKey {
    pub exercise: usize,
    pub question: usize,
    pub task: usize,
}

/// Anything in the tree below the exam that carries a weight.
pub trait WeightedNode {
    /// Local identifier, unique among siblings.
    fn id(&self) -> &str;

    /// Relative weight among siblings.
    fn weight(&self) -> f64;

    /// This node's share of the exam's weighted point budget.
    fn weighted_points_total(&self, exam: &Exam) -> f64;
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Definition of an exercise before it is linked into an [`Exam`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDef {
    pub id: String,
    pub weight: f64,
    pub description: String,
    pub questions: Vec<QuestionDef>,
}

/// Definition of a question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDef {
    pub id: String,
    pub weight: f64,
    pub description: String,
    pub tasks: Vec<TaskDef>,
}

/// Definition of a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDef {
    pub id: String,
    pub weight: f64,
    pub max: u32,
    pub description: String,
}

impl ExerciseDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            weight: 1.0,
            description: DEFAULT_DESCRIPTION.to_string(),
            questions: Vec::new(),
        }
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn question(mut self, question: QuestionDef) -> Self {
        self.questions.push(question);
        self
    }
}

impl QuestionDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            weight: 1.0,
            description: DEFAULT_DESCRIPTION.to_string(),
            tasks: Vec::new(),
        }
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn task(mut self, task: TaskDef) -> Self {
        self.tasks.push(task);
        self
    }
}

impl TaskDef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            weight: 1.0,
            max: 1,
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn max(mut self, max: u32) -> Self {
        self.max = max;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Linked tree
// ---------------------------------------------------------------------------

/// A complete exam.
#[derive(Debug, Clone)]
pub struct Exam {
    exercises: Vec<Exercise>,
    by_global_id: HashMap<String, TaskKey>,
}

/// An exercise of an exam.
#[derive(Debug, Clone)]
pub struct Exercise {
    pub id: String,
    pub weight: f64,
    pub description: String,
    questions: Vec<Question>,
}

/// A question of an exercise.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: String,
    pub weight: f64,
    pub description: String,
    tasks: Vec<Task>,
    exercise: usize,
}

/// The smallest gradable unit.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub weight: f64,
    pub max: u32,
    pub description: String,
    key: TaskKey,
    global_id: String,
}

impl Exam {
    /// Link definitions into a tree, validating weights, maxima and ids.
    pub fn from_definitions(defs: Vec<ExerciseDef>) -> Result<Self, GradebookError> {
        let mut exercises = Vec::with_capacity(defs.len());
        let mut by_global_id = HashMap::new();
        let mut exercise_ids = HashSet::new();

        for (ei, ex) in defs.into_iter().enumerate() {
            let ex_path = ex.id.clone();
            check_node(&ex_path, &ex.id, ex.weight, &mut exercise_ids)?;
            if ex.questions.is_empty() {
                return Err(malformed(&ex_path, "exercise has no questions"));
            }

            let mut questions = Vec::with_capacity(ex.questions.len());
            let mut question_ids = HashSet::new();
            for (qi, q) in ex.questions.into_iter().enumerate() {
                let q_path = format!("{}/{}", ex_path, q.id);
                check_node(&q_path, &q.id, q.weight, &mut question_ids)?;
                if q.tasks.is_empty() {
                    return Err(malformed(&q_path, "question has no tasks"));
                }

                let mut tasks = Vec::with_capacity(q.tasks.len());
                let mut task_ids = HashSet::new();
                for (ti, t) in q.tasks.into_iter().enumerate() {
                    let t_path = format!("{}/{}", q_path, t.id);
                    check_node(&t_path, &t.id, t.weight, &mut task_ids)?;
                    if t.max == 0 {
                        return Err(malformed(&t_path, "max must be a positive integer"));
                    }

                    let key = TaskKey {
                        exercise: ei,
                        question: qi,
                        task: ti,
                    };
                    let global_id = [ex.id.as_str(), q.id.as_str(), t.id.as_str()]
                        .join(GLOBAL_ID_SEPARATOR);
                    if by_global_id.insert(global_id.clone(), key).is_some() {
                        return Err(GradebookError::DuplicateGlobalId(global_id));
                    }
                    tasks.push(Task {
                        id: t.id,
                        weight: t.weight,
                        max: t.max,
                        description: t.description,
                        key,
                        global_id,
                    });
                }

                questions.push(Question {
                    id: q.id,
                    weight: q.weight,
                    description: q.description,
                    tasks,
                    exercise: ei,
                });
            }

            exercises.push(Exercise {
                id: ex.id,
                weight: ex.weight,
                description: ex.description,
                questions,
            });
        }

        tracing::debug!(
            exercises = exercises.len(),
            tasks = by_global_id.len(),
            "linked exam tree"
        );

        Ok(Self {
            exercises,
            by_global_id,
        })
    }

    /// The exam's weighted point budget.
    pub fn weighted_points_total(&self) -> f64 {
        WEIGHTED_POINTS_TOTAL
    }

    /// Sum of every task's maximum.
    pub fn points_total(&self) -> u64 {
        self.tasks().map(|t| u64::from(t.max)).sum()
    }

    pub fn exercises(&self) -> impl Iterator<Item = &Exercise> + '_ {
        self.exercises.iter()
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> + '_ {
        self.exercises.iter().flat_map(|e| e.questions.iter())
    }

    /// All tasks in tree order (exercise, question, task).
    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.questions().flat_map(|q| q.tasks.iter())
    }

    pub fn task_count(&self) -> usize {
        self.by_global_id.len()
    }

    /// Global ids of all tasks in tree order: the canonical column order.
    pub fn columns(&self) -> Vec<&str> {
        self.tasks().map(|t| t.global_id()).collect()
    }

    pub fn task(&self, key: TaskKey) -> Option<&Task> {
        self.exercises
            .get(key.exercise)?
            .questions
            .get(key.question)?
            .tasks
            .get(key.task)
    }

    pub fn task_by_global_id(&self, global_id: &str) -> Option<&Task> {
        self.by_global_id
            .get(global_id)
            .and_then(|key| self.task(*key))
    }

    /// The question owning `task`.
    pub fn question_of(&self, task: &Task) -> &Question {
        &self.exercises[task.key.exercise].questions[task.key.question]
    }

    /// The exercise owning `question`.
    pub fn exercise_of(&self, question: &Question) -> &Exercise {
        &self.exercises[question.exercise]
    }

    fn exercise_weight_sum(&self) -> f64 {
        self.exercises.iter().map(|e| e.weight).sum()
    }
}

impl Exercise {
    pub fn questions(&self) -> impl Iterator<Item = &Question> + '_ {
        self.questions.iter()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.questions.iter().flat_map(|q| q.tasks.iter())
    }

    pub fn points_total(&self) -> u64 {
        self.tasks().map(|t| u64::from(t.max)).sum()
    }

    fn question_weight_sum(&self) -> f64 {
        self.questions.iter().map(|q| q.weight).sum()
    }
}

impl Question {
    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter()
    }

    pub fn points_total(&self) -> u64 {
        self.tasks.iter().map(|t| u64::from(t.max)).sum()
    }

    fn task_weight_sum(&self) -> f64 {
        self.tasks.iter().map(|t| t.weight).sum()
    }
}

impl Task {
    /// The persistence key: `exercise-question-task`.
    pub fn global_id(&self) -> &str {
        &self.global_id
    }

    pub fn key(&self) -> TaskKey {
        self.key
    }
}

impl WeightedNode for Exercise {
    fn id(&self) -> &str {
        &self.id
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn weighted_points_total(&self, exam: &Exam) -> f64 {
        exam.weighted_points_total() * self.weight / exam.exercise_weight_sum()
    }
}

impl WeightedNode for Question {
    fn id(&self) -> &str {
        &self.id
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn weighted_points_total(&self, exam: &Exam) -> f64 {
        let exercise = exam.exercise_of(self);
        exercise.weighted_points_total(exam) * self.weight / exercise.question_weight_sum()
    }
}

impl WeightedNode for Task {
    fn id(&self) -> &str {
        &self.id
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn weighted_points_total(&self, exam: &Exam) -> f64 {
        let question = exam.question_of(self);
        question.weighted_points_total(exam) * self.weight / question.task_weight_sum()
    }
}

fn check_node(
    path: &str,
    id: &str,
    weight: f64,
    seen: &mut HashSet<String>,
) -> Result<(), GradebookError> {
    if id.trim().is_empty() {
        return Err(malformed(path, "id is empty"));
    }
    if !(weight.is_finite() && weight > 0.0) {
        return Err(malformed(
            path,
            &format!("weight must be a positive number, got {weight}"),
        ));
    }
    if !seen.insert(id.to_string()) {
        return Err(malformed(path, "id is not unique among its siblings"));
    }
    Ok(())
}

fn malformed(node: &str, reason: &str) -> GradebookError {
    GradebookError::MalformedDefinition {
        node: node.to_string(),
        reason: reason.to_string(),
    }
}
