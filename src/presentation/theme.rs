use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub line: fn(&str) -> String,
    pub id: fn(&str) -> String,
    pub task: fn(&str) -> String,
    pub done: fn(&str) -> String,
    pub translation: fn(&str) -> String,
    pub meta: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "temp" | "" => Self::temp(),
            "wudao" => Self::wudao(),
            "canvas" => Self::canvas(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::temp()
            }
        }
    }

    /// No escape codes at all, for tests and pipes
    pub fn plain() -> Self {
        Self {
            title: |s| s.to_string(),
            line: |s| s.to_string(),
            id: |s| s.to_string(),
            task: |s| s.to_string(),
            done: |s| s.to_string(),
            translation: |s| s.to_string(),
            meta: |s| s.to_string(),
        }
    }

    fn temp() -> Self {
        Self {
            title: |s| s.bright_magenta().italic().bold().underline().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            id: |s| s.bright_white().dimmed().to_string(),
            task: |s| s.white().to_string(),
            done: |s| s.bright_black().strikethrough().to_string(),
            translation: |s| s.cyan().italic().to_string(),
            meta: |s| s.bright_white().dimmed().italic().to_string(),
        }
    }

    fn wudao() -> Self {
        Self {
            title: |s| s.red().italic().bold().underline().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            id: |s| s.bright_white().to_string(),
            task: |s| s.bright_white().to_string(),
            done: |s| s.green().strikethrough().to_string(),
            translation: |s| s.bright_yellow().dimmed().italic().to_string(),
            meta: |s| s.red().italic().to_string(),
        }
    }

    fn canvas() -> Self {
        Self {
            title: |s| s.blue().bold().underline().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            id: |s| s.cyan().to_string(),
            task: |s| s.black().to_string(),
            done: |s| s.bright_black().strikethrough().to_string(),
            translation: |s| s.green().italic().to_string(),
            meta: |s| s.bright_black().italic().to_string(),
        }
    }
}
