use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gradebook_core::grading::GradeScale;
use gradebook_core::model::{Exam, ExerciseDef, QuestionDef, TaskDef};
use gradebook_core::presentation::{shape, DisplayMode};
use gradebook_core::results::{ExamResult, TaskResult};

fn make_exam(exercises: usize, questions: usize, tasks: usize) -> Exam {
    let defs = (0..exercises)
        .map(|e| {
            (0..questions).fold(
                ExerciseDef::new(e.to_string()).weight((e % 3 + 1) as f64),
                |ex, q| {
                    let question = (0..tasks).fold(
                        QuestionDef::new(format!("q{q}")).weight((q % 2 + 1) as f64),
                        |qd, t| qd.task(TaskDef::new(format!("t{t}")).max((t % 5 + 1) as u32)),
                    );
                    ex.question(question)
                },
            )
        })
        .collect();
    Exam::from_definitions(defs).unwrap()
}

fn make_results(exam: &Exam, students: usize) -> Vec<ExamResult> {
    (0..students)
        .map(|s| {
            let scores = exam
                .tasks()
                .map(|t| TaskResult::new(t, (s as u32) % (t.max + 1)).unwrap())
                .collect();
            ExamResult::new(format!("student-{s}"), scores, exam).unwrap()
        })
        .collect()
}

fn bench_weighted_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("weighted_points");
    let scale = GradeScale::default();

    for (name, exam) in [
        ("small", make_exam(2, 2, 3)),
        ("large", make_exam(8, 6, 6)),
    ] {
        let results = make_results(&exam, 1);
        group.bench_function(name, |b| {
            b.iter(|| black_box(&results[0]).grade(black_box(&exam), &scale))
        });
    }

    group.finish();
}

fn bench_shape(c: &mut Criterion) {
    let mut group = c.benchmark_group("shape");
    let scale = GradeScale::default();
    let exam = make_exam(6, 4, 4);
    let results = make_results(&exam, 30);

    for mode in [DisplayMode::Raw, DisplayMode::Percent, DisplayMode::Weighted] {
        group.bench_function(mode.to_string(), |b| {
            b.iter(|| shape(black_box(&exam), black_box(&results), &scale, mode))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_weighted_points, bench_shape);
criterion_main!(benches);
