use crate::domain::model::{Task, LANGUAGES};
use crate::presentation::theme::Theme;
use std::fmt::Write;

/// Render the task list, most recent first as given
pub fn format_tasks(tasks: &[Task], theme: &Theme, enable_emoji: bool) -> String {
    let mut output = String::new();

    let title = if enable_emoji { "🌐 Task Lingo" } else { "Task Lingo" };
    writeln!(output, "{}", (theme.title)(title)).ok();

    if tasks.is_empty() {
        writeln!(output, "  {}", (theme.meta)("No tasks yet.")).ok();
        return output;
    }

    let cutoff = "⸺".repeat(40);
    writeln!(output, "  {}", (theme.line)(&cutoff)).ok();

    for task in tasks {
        writeln!(output, "{}", format_task(task, theme, enable_emoji)).ok();
    }

    output
}

pub fn format_task(task: &Task, theme: &Theme, enable_emoji: bool) -> String {
    let mut output = String::new();

    let mark = match (task.is_complete, enable_emoji) {
        (true, true) => "✅",
        (false, true) => "⬜",
        (true, false) => "[x]",
        (false, false) => "[ ]",
    };
    let text = if task.is_complete {
        (theme.done)(&task.task)
    } else {
        (theme.task)(&task.task)
    };
    write!(output, "  {} {} {}", mark, text, (theme.id)(&format!("#{}", task.id))).ok();

    if let Some(translation) = &task.translation {
        write!(
            output,
            "\n      {}",
            (theme.translation)(&format!("Translated: {}", translation))
        )
        .ok();
    }

    write!(
        output,
        "\n      {}",
        (theme.meta)(&task.created_at.format("%Y-%m-%d %H:%M").to_string())
    )
    .ok();

    output
}

pub fn format_languages(current: &str) -> String {
    let mut output = String::new();
    for lang in LANGUAGES {
        let marker = if lang.code == current { "*" } else { " " };
        writeln!(output, " {} {:<3} {}", marker, lang.code, lang.label).ok();
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task(done: bool, translation: Option<&str>) -> Task {
        Task {
            id: "7".into(),
            task: "Buy milk".into(),
            is_complete: done,
            translation: translation.map(str::to_string),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            user_id: None,
        }
    }

    #[test]
    fn plain_rendering_shows_translation() {
        let out = format_task(&task(false, Some("Comprar leche")), &Theme::plain(), false);
        assert_eq!(
            out,
            "  [ ] Buy milk #7\n      Translated: Comprar leche\n      2024-05-01 10:00"
        );
    }

    #[test]
    fn completed_task_is_marked() {
        let out = format_task(&task(true, None), &Theme::plain(), true);
        assert!(out.starts_with("  ✅ Buy milk"));
        assert!(!out.contains("Translated"));
    }

    #[test]
    fn empty_list_message() {
        let out = format_tasks(&[], &Theme::plain(), false);
        assert_eq!(out, "Task Lingo\n  No tasks yet.\n");
    }

    #[test]
    fn languages_mark_current() {
        let out = format_languages("fr");
        assert!(out.contains(" * fr  French"));
        assert!(out.contains("   es  Spanish"));
    }
}
