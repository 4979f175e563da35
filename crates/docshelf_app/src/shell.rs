use docshelf_core::Msg;

pub const HELP: &str = "\
Commands:
  fetch [course-id]      fetch the course roster (replaces the list)
  course <course-id>     set the course id without fetching
  add <url> <name...>    add a document by its sharing URL
  rm <id>                remove a document
  select <id>            preview a document
  process                process the selected document remotely
  check                  check Discord uploads for the selected document
  copy                   print the \"make a copy\" URL
  open                   print the editor URL
  list                   show the catalog again
  help                   show this help
  quit                   leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Send(Vec<Msg>),
    List,
    Help,
    Quit,
}

/// Parses one line of shell input. Blank lines yield `Ok(None)`.
///
/// `now_ms` stamps manual additions so ids stay time-based.
pub fn parse_line(line: &str, now_ms: i64) -> Result<Option<ShellCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "fetch" => {
            let mut msgs = Vec::with_capacity(2);
            if let Some(course) = rest.first() {
                msgs.push(Msg::CourseIdChanged((*course).to_string()));
            }
            msgs.push(Msg::FetchClicked);
            ShellCommand::Send(msgs)
        }
        "course" => {
            let course = single_arg(&rest, "course <course-id>")?;
            ShellCommand::Send(vec![Msg::CourseIdChanged(course)])
        }
        "add" => {
            let (url, name) = rest
                .split_first()
                .ok_or_else(|| "usage: add <url> <name...>".to_string())?;
            ShellCommand::Send(vec![
                Msg::ManualNameChanged(name.join(" ")),
                Msg::ManualUrlChanged((*url).to_string()),
                Msg::AddManualSubmitted {
                    created_at_ms: now_ms,
                },
            ])
        }
        "rm" | "remove" | "delete" => {
            let id = single_arg(&rest, "rm <id>")?;
            ShellCommand::Send(vec![Msg::RemoveClicked(id)])
        }
        "select" | "use" => {
            let id = single_arg(&rest, "select <id>")?;
            ShellCommand::Send(vec![Msg::DocumentSelected(id)])
        }
        "process" => ShellCommand::Send(vec![Msg::ProcessClicked]),
        "check" => ShellCommand::Send(vec![Msg::CheckUploadsClicked]),
        "copy" => ShellCommand::Send(vec![Msg::CopyClicked]),
        "open" => ShellCommand::Send(vec![Msg::OpenClicked]),
        "list" | "ls" => ShellCommand::List,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

fn single_arg(rest: &[&str], usage: &str) -> Result<String, String> {
    match rest {
        [value] => Ok((*value).to_string()),
        _ => Err(format!("usage: {usage}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_ignored() {
        assert_eq!(parse_line("   ", 0), Ok(None));
    }

    #[test]
    fn add_joins_name_words_and_stamps_time() {
        let parsed = parse_line("add https://x/d/ABC/edit Week 3 notes", 99).unwrap();
        assert_eq!(
            parsed,
            Some(ShellCommand::Send(vec![
                Msg::ManualNameChanged("Week 3 notes".to_string()),
                Msg::ManualUrlChanged("https://x/d/ABC/edit".to_string()),
                Msg::AddManualSubmitted { created_at_ms: 99 },
            ]))
        );
    }

    #[test]
    fn add_without_name_still_submits_for_validation() {
        let parsed = parse_line("add https://x/d/ABC/edit", 1).unwrap();
        assert!(matches!(
            parsed,
            Some(ShellCommand::Send(ref msgs)) if msgs[0] == Msg::ManualNameChanged(String::new())
        ));
    }

    #[test]
    fn fetch_with_course_sets_it_first() {
        assert_eq!(
            parse_line("fetch bio-110", 0).unwrap(),
            Some(ShellCommand::Send(vec![
                Msg::CourseIdChanged("bio-110".to_string()),
                Msg::FetchClicked,
            ]))
        );
        assert_eq!(
            parse_line("FETCH", 0).unwrap(),
            Some(ShellCommand::Send(vec![Msg::FetchClicked]))
        );
    }

    #[test]
    fn missing_arguments_are_reported() {
        assert_eq!(parse_line("rm", 0), Err("usage: rm <id>".to_string()));
        assert_eq!(
            parse_line("add", 0),
            Err("usage: add <url> <name...>".to_string())
        );
        assert!(parse_line("frobnicate", 0).is_err());
    }

    #[test]
    fn control_words() {
        assert_eq!(parse_line("q", 0).unwrap(), Some(ShellCommand::Quit));
        assert_eq!(parse_line("ls", 0).unwrap(), Some(ShellCommand::List));
        assert_eq!(parse_line("?", 0).unwrap(), Some(ShellCommand::Help));
    }
}
