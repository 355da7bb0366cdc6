//! Line commands typed at the dashboard prompt.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Search(String),
    Site(Option<String>),
    Next,
    Prev,
    Page(usize),
    /// 1-based row on the current page.
    View(usize),
    Close,
    Logs,
    Hide,
    Escape,
    Scrape,
    Refresh,
    Help,
    Quit,
    Invalid(String),
}

pub const HELP_TEXT: &str = "\
Commands:
  search <text>   filter by title or url (empty clears)
  site [name]     filter by site (no name shows all sites)
  next | prev     change page
  page <n>        jump to page n
  view <row>      open a job from the current page
  close           close the job detail
  logs | hide     show or hide the run log
  esc             close any open panel
  scrape          start a full scrape and match run
  refresh         reload jobs and stats
  help            show this help
  quit            exit";

/// Returns `None` for blank lines.
pub fn parse_command(line: &str) -> Option<InputCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "search" | "s" => InputCommand::Search(rest.to_string()),
        "site" => InputCommand::Site((!rest.is_empty()).then(|| rest.to_string())),
        "next" | "n" => InputCommand::Next,
        "prev" | "p" => InputCommand::Prev,
        "page" => match rest.parse::<usize>() {
            Ok(page) if page > 0 => InputCommand::Page(page),
            _ => InputCommand::Invalid(format!("page expects a positive number, got {rest:?}")),
        },
        "view" | "v" => match rest.parse::<usize>() {
            Ok(row) if row > 0 => InputCommand::View(row),
            _ => InputCommand::Invalid(format!("view expects a row number, got {rest:?}")),
        },
        "close" => InputCommand::Close,
        "logs" => InputCommand::Logs,
        "hide" => InputCommand::Hide,
        "esc" => InputCommand::Escape,
        "scrape" => InputCommand::Scrape,
        "refresh" | "r" => InputCommand::Refresh,
        "help" | "?" => InputCommand::Help,
        "quit" | "q" | "exit" => InputCommand::Quit,
        other => InputCommand::Invalid(format!("unknown command {other:?}, try help")),
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_command("   "), None);
    }

    #[test]
    fn search_keeps_inner_spacing_and_allows_empty() {
        assert_eq!(
            parse_command("search  rust   engineer "),
            Some(InputCommand::Search("rust   engineer".to_string()))
        );
        assert_eq!(
            parse_command("search"),
            Some(InputCommand::Search(String::new()))
        );
    }

    #[test]
    fn site_without_name_clears_filter() {
        assert_eq!(parse_command("site"), Some(InputCommand::Site(None)));
        assert_eq!(
            parse_command("site indeed"),
            Some(InputCommand::Site(Some("indeed".to_string())))
        );
    }

    #[test]
    fn page_and_view_need_positive_numbers() {
        assert_eq!(parse_command("page 3"), Some(InputCommand::Page(3)));
        assert_eq!(parse_command("v 2"), Some(InputCommand::View(2)));
        assert!(matches!(
            parse_command("page 0"),
            Some(InputCommand::Invalid(_))
        ));
        assert!(matches!(
            parse_command("view x"),
            Some(InputCommand::Invalid(_))
        ));
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(parse_command("SCRAPE"), Some(InputCommand::Scrape));
        assert_eq!(parse_command("Quit"), Some(InputCommand::Quit));
    }

    #[test]
    fn unknown_words_are_reported() {
        assert!(matches!(
            parse_command("dance"),
            Some(InputCommand::Invalid(message)) if message.contains("dance")
        ));
    }
}
