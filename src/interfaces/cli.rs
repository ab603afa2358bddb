use clap::{Parser, Subcommand};
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(name = "task-lingo")]
#[command(about = "A multilingual to-do list with LLM translation.")]
#[command(version)]
pub struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Keep tasks in memory instead of Supabase (shell only)
    #[arg(long, global = true)]
    pub memory: bool,

    /// Choose color theme
    #[arg(short = 'T', long, global = true)]
    pub theme: Option<String>,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Show status
    #[arg(long)]
    pub status: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// An in-memory store lives only as long as the process, so it is
    /// accepted only for the interactive shell.
    pub fn check_memory_flag(&self) -> Result<(), String> {
        match (&self.command, self.memory) {
            (_, false) | (Some(Command::Shell { .. }), true) => Ok(()),
            (_, true) => Err(
                "--memory keeps tasks only while the process runs; use it with `task-lingo shell`"
                    .to_string(),
            ),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the translation relay server
    Serve {
        /// Address to listen on (overrides config)
        #[arg(long)]
        listen: Option<SocketAddr>,
    },
    /// List tasks, most recent first
    List,
    /// Add a task
    Add {
        #[arg(num_args = 1.., required = true)]
        text: Vec<String>,
    },
    /// Mark a task complete, or undo it
    Done { id: String },
    /// Replace a task's text
    Edit {
        id: String,
        #[arg(num_args = 1.., required = true)]
        text: Vec<String>,
    },
    /// Delete a task
    Delete { id: String },
    /// Translate a task and save the translation
    Translate {
        id: String,
        /// Target language code
        #[arg(short, long)]
        lang: Option<String>,
    },
    /// Show the languages offered for translation
    Languages,
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Create the account first
        #[arg(long)]
        signup: bool,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Interactive session
    Shell {
        /// Starting target language
        #[arg(short, long)]
        lang: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_translate_with_lang() {
        let cli = Cli::try_parse_from(["task-lingo", "translate", "42", "--lang", "fr"]).unwrap();
        match cli.command {
            Some(Command::Translate { id, lang }) => {
                assert_eq!(id, "42");
                assert_eq!(lang.as_deref(), Some("fr"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn add_joins_words_and_global_flags_work() {
        let cli = Cli::try_parse_from(["task-lingo", "add", "Buy", "milk", "--memory"]).unwrap();
        assert!(cli.memory);
        match cli.command {
            Some(Command::Add { text }) => assert_eq!(text.join(" "), "Buy milk"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn serve_listen_override() {
        let cli = Cli::try_parse_from(["task-lingo", "serve", "--listen", "0.0.0.0:8080"]).unwrap();
        match cli.command {
            Some(Command::Serve { listen }) => {
                assert_eq!(listen, Some("0.0.0.0:8080".parse().unwrap()))
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn memory_store_is_shell_only() {
        let shell = Cli::try_parse_from(["task-lingo", "--memory", "shell"]).unwrap();
        assert!(shell.check_memory_flag().is_ok());

        for args in [
            vec!["task-lingo", "done", "1", "--memory"],
            vec!["task-lingo", "--memory", "list"],
            vec!["task-lingo", "--memory", "translate", "1"],
        ] {
            let cli = Cli::try_parse_from(args.clone()).unwrap();
            let err = cli.check_memory_flag().unwrap_err();
            assert!(err.contains("shell"), "{:?}", args);
        }

        let supabase = Cli::try_parse_from(["task-lingo", "list"]).unwrap();
        assert!(supabase.check_memory_flag().is_ok());
    }

    #[test]
    fn add_requires_text() {
        assert!(Cli::try_parse_from(["task-lingo", "add"]).is_err());
    }
}
