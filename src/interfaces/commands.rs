use crate::application::tasks::TaskService;
use crate::domain::error::LingoError;
use crate::domain::model::{find_language, Task, LANGUAGES};
use crate::presentation::render::{format_languages, format_task, format_tasks};
use crate::presentation::theme::Theme;
use colored::Colorize;

/// A single client operation, shared by the subcommands and the shell
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    List,
    Add(String),
    Toggle(String),
    Edit(String, String),
    Delete(String),
    Translate { id: String, lang: Option<String> },
    Languages,
}

pub struct Output {
    pub json: bool,
    pub theme: Theme,
    pub enable_emoji: bool,
}

impl Output {
    fn task(&self, task: &Task) -> Result<String, LingoError> {
        if self.json {
            Ok(serde_json::to_string_pretty(task)?)
        } else {
            Ok(format_task(task, &self.theme, self.enable_emoji))
        }
    }

    fn tasks(&self, tasks: &[Task]) -> Result<String, LingoError> {
        if self.json {
            Ok(serde_json::to_string_pretty(tasks)?)
        } else {
            Ok(format_tasks(tasks, &self.theme, self.enable_emoji))
        }
    }

    /// Transient failure notice; state is left as it was
    pub fn notify_error(&self, err: &LingoError) {
        eprintln!("{}", format!("✘ {}", err).red());
    }
}

/// Run one action and return what should be printed
pub async fn run_action(
    service: &TaskService,
    action: Action,
    current_lang: &str,
    out: &Output,
) -> Result<String, LingoError> {
    match action {
        Action::List => out.tasks(&service.fetch().await?),
        Action::Add(text) => match service.add(&text).await? {
            Some(task) => out.task(&task),
            None => Ok(String::new()),
        },
        Action::Toggle(id) => out.task(&service.toggle(&id).await?),
        Action::Edit(id, text) => match service.edit(&id, &text).await? {
            Some(task) => out.task(&task),
            None => Ok(String::new()),
        },
        Action::Delete(id) => {
            service.delete(&id).await?;
            if out.json {
                Ok(serde_json::json!({ "deleted": id }).to_string())
            } else {
                Ok(format!("Deleted #{}", id))
            }
        }
        Action::Translate { id, lang } => {
            let target = lang.as_deref().unwrap_or(current_lang);
            if find_language(target).is_none() {
                tracing::debug!(target = %target, "translating to a language outside the menu");
            }
            out.task(&service.translate(&id, target).await?)
        }
        Action::Languages => {
            if out.json {
                Ok(serde_json::to_string_pretty(LANGUAGES)?)
            } else {
                Ok(format_languages(current_lang))
            }
        }
    }
}
