//! Interactive session: the list is re-read after every change, and the
//! selected translation language persists for the session.

use crate::application::tasks::TaskService;
use crate::domain::error::LingoError;
use crate::domain::model::find_language;
use crate::domain::traits::AuthProvider;
use crate::infrastructure::storage::session::{clear_session, save_session};
use crate::interfaces::commands::{run_action, Action, Output};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, PartialEq)]
pub enum ShellInput {
    Action(Action),
    SetLang(String),
    Login { email: String, password: String },
    Logout,
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
commands:
  list                      show tasks
  add <text>                add a task
  done <id>                 complete / undo a task
  edit <id> <text>          replace a task's text
  delete <id>               delete a task
  translate <id> [lang]     translate and save
  lang [code]               show or select the target language
  login <email> <password>  sign in
  logout                    sign out
  help | quit";

/// Parse one line of shell input
pub fn parse_line(line: &str) -> Result<ShellInput, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ShellInput::Empty);
    }

    let (cmd, rest) = match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    };
    let mut args = rest.split_whitespace();

    let need_id = |id: Option<&str>| id.map(str::to_string).ok_or("missing task id".to_string());

    let input = match cmd {
        "list" | "ls" => ShellInput::Action(Action::List),
        "add" => ShellInput::Action(Action::Add(rest.to_string())),
        "done" | "toggle" => ShellInput::Action(Action::Toggle(need_id(args.next())?)),
        "edit" => {
            let id = need_id(args.next())?;
            let text = rest[id.len()..].trim().to_string();
            ShellInput::Action(Action::Edit(id, text))
        }
        "delete" | "rm" => ShellInput::Action(Action::Delete(need_id(args.next())?)),
        "translate" | "tr" => ShellInput::Action(Action::Translate {
            id: need_id(args.next())?,
            lang: args.next().map(str::to_string),
        }),
        "lang" => match args.next() {
            Some(code) => ShellInput::SetLang(code.to_string()),
            None => ShellInput::Action(Action::Languages),
        },
        "login" => match (args.next(), args.next()) {
            (Some(email), Some(password)) => ShellInput::Login {
                email: email.to_string(),
                password: password.to_string(),
            },
            _ => return Err("usage: login <email> <password>".to_string()),
        },
        "logout" => ShellInput::Logout,
        "help" | "?" => ShellInput::Help,
        "quit" | "exit" | "q" => ShellInput::Quit,
        other => return Err(format!("unknown command: {} (try `help`)", other)),
    };
    Ok(input)
}

pub struct Shell {
    pub service: TaskService,
    pub auth: Option<Arc<dyn AuthProvider>>,
    pub session_path: PathBuf,
    pub output: Output,
    pub lang: String,
}

impl Shell {
    pub async fn run(mut self) -> Result<(), LingoError> {
        // Print auth-state changes as they happen
        if let Some(auth) = &self.auth {
            let mut changes = auth.subscribe();
            tokio::spawn(async move {
                while changes.changed().await.is_ok() {
                    let current = changes.borrow_and_update().clone();
                    let message = match current {
                        Some(session) => format!(
                            "Signed in as {}",
                            session.user.email.unwrap_or(session.user.id)
                        ),
                        None => "Signed out".to_string(),
                    };
                    eprintln!("{}", message.green());
                }
            });
        }

        println!("{}", HELP);
        match self.listing().await {
            Ok(list) => print!("{}", list),
            Err(e) => self.output.notify_error(&e),
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            eprint!("{} ", format!("[{}]>", self.lang).cyan());
            let Some(line) = lines.next_line().await? else {
                break;
            };

            match parse_line(&line) {
                Ok(ShellInput::Quit) => break,
                Ok(input) => match self.handle(input).await {
                    Ok(printed) => print!("{}", printed),
                    Err(e) => self.output.notify_error(&e),
                },
                Err(msg) => eprintln!("{}", msg.yellow()),
            }
        }
        Ok(())
    }

    /// Apply one input and return what should be printed; changes are
    /// followed by a fresh listing.
    async fn handle(&mut self, input: ShellInput) -> Result<String, LingoError> {
        match input {
            ShellInput::Action(action) => {
                let reread = !matches!(action, Action::List | Action::Languages);
                let printed = run_action(&self.service, action, &self.lang, &self.output).await?;
                if reread {
                    self.listing().await
                } else {
                    Ok(printed)
                }
            }
            ShellInput::SetLang(code) => {
                if find_language(&code).is_none() {
                    eprintln!("{}", format!("Note: {} is not in the language menu", code).yellow());
                }
                self.lang = code;
                Ok(String::new())
            }
            ShellInput::Login { email, password } => {
                let auth = self.require_auth()?;
                let session = auth.sign_in(&email, &password).await?;
                save_session(&self.session_path, &session).await?;
                self.listing().await
            }
            ShellInput::Logout => {
                let auth = self.require_auth()?;
                let result = auth.sign_out().await;
                clear_session(&self.session_path).await?;
                result?;
                Ok(String::new())
            }
            ShellInput::Help => Ok(format!("{}\n", HELP)),
            ShellInput::Quit | ShellInput::Empty => Ok(String::new()),
        }
    }

    fn require_auth(&self) -> Result<Arc<dyn AuthProvider>, LingoError> {
        self.auth
            .clone()
            .ok_or_else(|| LingoError::Auth("Sign-in is unavailable with the in-memory store".to_string()))
    }

    async fn listing(&self) -> Result<String, LingoError> {
        run_action(&self.service, Action::List, &self.lang, &self.output).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Session, TaskScope, User};
    use crate::domain::traits::Translator;
    use crate::infrastructure::storage::memory::MemoryTaskStore;
    use crate::infrastructure::storage::session::load_session;
    use crate::presentation::theme::Theme;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::watch;

    #[derive(Default)]
    struct Recorder {
        targets: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Translator for Recorder {
        async fn translate(&self, text: &str, target: &str) -> Result<String, LingoError> {
            self.targets.lock().unwrap().push(target.to_string());
            Ok(format!("{}:{}", target, text))
        }
    }

    struct FakeAuth {
        state: watch::Sender<Option<Session>>,
    }

    impl FakeAuth {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                state: watch::channel(None).0,
            })
        }
    }

    #[async_trait]
    impl AuthProvider for FakeAuth {
        async fn sign_in(&self, email: &str, _password: &str) -> Result<Session, LingoError> {
            let session = Session {
                access_token: "jwt".into(),
                refresh_token: Some("r1".into()),
                expires_at: None,
                user: User {
                    id: "u1".into(),
                    email: Some(email.to_string()),
                },
            };
            self.state.send_replace(Some(session.clone()));
            Ok(session)
        }

        async fn sign_up(&self, email: &str, password: &str) -> Result<Session, LingoError> {
            self.sign_in(email, password).await
        }

        async fn sign_out(&self) -> Result<(), LingoError> {
            self.state.send_replace(None);
            Ok(())
        }

        async fn refresh(&self) -> Result<Session, LingoError> {
            Err(LingoError::Auth("no refresh token".into()))
        }

        fn session(&self) -> Option<Session> {
            self.state.borrow().clone()
        }

        fn subscribe(&self) -> watch::Receiver<Option<Session>> {
            self.state.subscribe()
        }
    }

    fn shell(
        scope: TaskScope,
        auth: Option<Arc<FakeAuth>>,
        translator: Arc<Recorder>,
        session_path: PathBuf,
    ) -> Shell {
        let sessions = match &auth {
            Some(auth) => auth.subscribe(),
            None => watch::channel(None).1,
        };
        let service = TaskService::new(Arc::new(MemoryTaskStore::new()), translator, scope, sessions);
        Shell {
            service,
            auth: auth.map(|a| a as Arc<dyn AuthProvider>),
            session_path,
            output: Output {
                json: false,
                theme: Theme::plain(),
                enable_emoji: false,
            },
            lang: "es".into(),
        }
    }

    async fn first_id(shell: &Shell) -> String {
        shell.service.fetch().await.unwrap()[0].id.clone()
    }

    #[tokio::test]
    async fn changes_are_followed_by_a_fresh_listing() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell(
            TaskScope::Shared,
            None,
            Arc::new(Recorder::default()),
            dir.path().join("session.json"),
        );

        let printed = shell
            .handle(ShellInput::Action(Action::Add("Buy milk".into())))
            .await
            .unwrap();
        assert!(printed.starts_with("Task Lingo"), "{}", printed);
        assert!(printed.contains("[ ] Buy milk"), "{}", printed);

        let id = first_id(&shell).await;
        let printed = shell
            .handle(ShellInput::Action(Action::Toggle(id.clone())))
            .await
            .unwrap();
        assert!(printed.contains("[x] Buy milk"), "{}", printed);

        let printed = shell
            .handle(ShellInput::Action(Action::Edit(id.clone(), "Buy oat milk".into())))
            .await
            .unwrap();
        assert!(printed.contains("Buy oat milk"), "{}", printed);

        let printed = shell
            .handle(ShellInput::Action(Action::Delete(id)))
            .await
            .unwrap();
        assert!(printed.contains("No tasks yet."), "{}", printed);
    }

    #[tokio::test]
    async fn selected_language_is_kept_between_commands() {
        let dir = tempfile::tempdir().unwrap();
        let translator = Arc::new(Recorder::default());
        let mut shell = shell(
            TaskScope::Shared,
            None,
            translator.clone(),
            dir.path().join("session.json"),
        );

        shell.handle(ShellInput::SetLang("ja".into())).await.unwrap();
        shell
            .handle(ShellInput::Action(Action::Add("Buy milk".into())))
            .await
            .unwrap();
        let id = first_id(&shell).await;

        let printed = shell
            .handle(ShellInput::Action(Action::Translate {
                id: id.clone(),
                lang: None,
            }))
            .await
            .unwrap();
        assert!(printed.contains("Translated: ja:Buy milk"), "{}", printed);

        // an explicit language applies to that command only
        shell
            .handle(ShellInput::Action(Action::Translate {
                id,
                lang: Some("fr".into()),
            }))
            .await
            .unwrap();
        assert_eq!(shell.lang, "ja");
        assert_eq!(*translator.targets.lock().unwrap(), vec!["ja", "fr"]);
    }

    #[tokio::test]
    async fn login_saves_and_logout_clears_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let auth = FakeAuth::new();
        let mut shell = shell(
            TaskScope::PerUser,
            Some(auth.clone()),
            Arc::new(Recorder::default()),
            path.clone(),
        );

        assert!(matches!(
            shell.handle(ShellInput::Action(Action::List)).await,
            Err(LingoError::Auth(_))
        ));

        let printed = shell
            .handle(ShellInput::Login {
                email: "a@b.c".into(),
                password: "secret".into(),
            })
            .await
            .unwrap();
        assert!(printed.contains("No tasks yet."), "{}", printed);
        let saved = load_session(&path).await.unwrap().unwrap();
        assert_eq!(saved.user.id, "u1");

        shell
            .handle(ShellInput::Action(Action::Add("Buy milk".into())))
            .await
            .unwrap();
        assert_eq!(shell.service.fetch().await.unwrap()[0].user_id.as_deref(), Some("u1"));

        shell.handle(ShellInput::Logout).await.unwrap();
        assert!(!path.exists());
        assert!(auth.session().is_none());
        assert!(shell.service.fetch().await.is_err());
    }

    #[tokio::test]
    async fn memory_shell_has_no_sign_in() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell(
            TaskScope::Shared,
            None,
            Arc::new(Recorder::default()),
            dir.path().join("session.json"),
        );

        let result = shell
            .handle(ShellInput::Login {
                email: "a@b.c".into(),
                password: "secret".into(),
            })
            .await;
        assert!(matches!(result, Err(LingoError::Auth(_))));
    }

    #[test]
    fn parses_task_commands() {
        assert_eq!(parse_line("  ").unwrap(), ShellInput::Empty);
        assert_eq!(
            parse_line("add Buy  oat milk").unwrap(),
            ShellInput::Action(Action::Add("Buy  oat milk".into()))
        );
        assert_eq!(
            parse_line("edit 12 Walk the dog").unwrap(),
            ShellInput::Action(Action::Edit("12".into(), "Walk the dog".into()))
        );
        assert_eq!(
            parse_line("tr 12 ja").unwrap(),
            ShellInput::Action(Action::Translate {
                id: "12".into(),
                lang: Some("ja".into())
            })
        );
        assert_eq!(parse_line("lang fr").unwrap(), ShellInput::SetLang("fr".into()));
        assert_eq!(parse_line("lang").unwrap(), ShellInput::Action(Action::Languages));
        assert_eq!(parse_line("quit").unwrap(), ShellInput::Quit);
    }

    #[test]
    fn rejects_incomplete_input() {
        assert!(parse_line("done").is_err());
        assert!(parse_line("login someone@example.com").is_err());
        assert!(parse_line("frobnicate").is_err());
    }
}
