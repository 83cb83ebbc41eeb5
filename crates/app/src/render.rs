//! Plain-text rendering of questions and results.

use std::fmt::Write as _;

use comfy_table::{Cell, Table};

use exam_core::model::{ExamSettings, FinishReason};
use exam_core::scoring::{QuestionFeedback, ScoreReport, Verdict};
use exam_services::AttemptSnapshot;

const INVALID_MARKER: &str = "INVALID";

#[must_use]
pub fn instructions(settings: &ExamSettings) -> String {
    format!(
        "Exam instructions\n{}\nType `help` for commands, `submit` when done.\n",
        settings.instructions()
    )
}

#[must_use]
pub fn question(snapshot: &AttemptSnapshot<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nQuestion {}/{}  [answered {}, time left {}]",
        snapshot.index + 1,
        snapshot.total,
        snapshot.progress.answered,
        snapshot.remaining,
    );
    let _ = writeln!(out, "{}", snapshot.question.prompt());
    for option in snapshot.question.options() {
        let marker = if snapshot.answer.key() == Some(option.key()) {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(out, " {marker} {}) {}", option.key(), option.text());
    }
    let _ = writeln!(out, "Your answer: {}", snapshot.answer);
    out
}

#[must_use]
pub fn finish_reason(reason: FinishReason) -> &'static str {
    match reason {
        FinishReason::Submitted => "Exam submitted.",
        FinishReason::TimedOut => "Time is up! The exam was submitted automatically.",
    }
}

/// Summary table followed by per-question corrections.
#[must_use]
pub fn results(report: &ScoreReport) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Final score", "Correct", "Incorrect", "Skipped"]);
    table.add_row(vec![
        Cell::new(format!("{:.1}", report.total)),
        Cell::new(report.correct),
        Cell::new(report.incorrect),
        Cell::new(report.skipped),
    ]);

    let mut out = format!("\nFinal score: {:.1} points\n{table}\n", report.total);
    for detail in &report.details {
        out.push_str(&feedback(detail));
    }
    out
}

fn feedback(detail: &QuestionFeedback) -> String {
    let correct = format!(
        "{}: {}",
        detail.correct_option,
        detail.correct_text.as_deref().unwrap_or(INVALID_MARKER)
    );
    let line = match detail.verdict {
        Verdict::Correct => format!("  correct: {correct}"),
        Verdict::Skipped => format!("  skipped, the answer was {correct}"),
        Verdict::Incorrect => format!(
            "  wrong: you chose {}: {}; the answer was {correct}",
            detail.answer,
            detail.answer_text.as_deref().unwrap_or(INVALID_MARKER),
        ),
    };
    format!("{}. {}\n{line} ({:+})\n", detail.index + 1, detail.prompt, detail.points)
}
