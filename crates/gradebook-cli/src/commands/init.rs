//! The `gradebook init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("gradebook.toml").exists() {
        println!("gradebook.toml already exists, skipping.");
    } else {
        std::fs::write("gradebook.toml", SAMPLE_CONFIG)?;
        println!("Created gradebook.toml");
    }

    if std::path::Path::new("exam.yml").exists() {
        println!("exam.yml already exists, skipping.");
    } else {
        std::fs::write("exam.yml", SAMPLE_EXAM)?;
        println!("Created exam.yml");
    }

    println!("\nNext steps:");
    println!("  1. Describe your exam in exam.yml");
    println!("  2. Run: gradebook validate --exam exam.yml");
    println!("  3. Run: gradebook grade --exam exam.yml --results results.csv");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gradebook configuration

# Typed at a score prompt to drop the current student.
cancel_literal = "q"
# Typed at the student prompt to save and exit.
quit_words = ["q", "quit", "bye", "exit"]
max_attempts = 10
# raw, percent or weighted
display_mode = "raw"
description_placeholder = "(no description)"

# Lower bounds in weighted percent, inclusive. A 0 entry is required.
[[grades]]
min_percent = 92
label = "1"

[[grades]]
min_percent = 82
label = "2"

[[grades]]
min_percent = 67
label = "3"

[[grades]]
min_percent = 50
label = "4"

[[grades]]
min_percent = 30
label = "5"

[[grades]]
min_percent = 0
label = "6"
"#;

const SAMPLE_EXAM: &str = r#"# Exercises contain questions, questions contain tasks.
# weight and description are optional on every level (weight defaults to 1).
# A task is a mapping with max/weight/description, a bare max, or empty (max 1).
1:
  description: Algebra
  weight: 2
  a:
    description: Linear equations
    i: { max: 4, description: Solve for x }
    ii: 6
  b:
    description: Quadratics
    i: { max: 5, weight: 2 }
2:
  description: Geometry
  a:
    description: Triangle area
    i: 3
    ii:
"#;
