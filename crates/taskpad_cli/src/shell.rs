//! Interactive shell: a line-oriented session over one open store.
//!
//! # Responsibility
//! - Parse shell lines into store intents.
//! - Keep transient state (keyword, sort, edit draft) alive across lines.
//!
//! # Invariants
//! - Parsing is side-effect free; only `execute` touches the store.
//! - An unknown line never terminates the session.

use crate::{dispatch, render};
use log::info;
use std::io::{self, BufRead, Write};
use taskpad_core::{Applied, Intent, SnapshotRepository, SortMode, TaskStore};

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    Add(String),
    Delete(u64),
    Edit(u64),
    Draft(String),
    Save,
    Done(u64),
    Search(String),
    Sort(SortMode),
    List,
    Help,
    Quit,
}

pub(crate) fn run<R: SnapshotRepository>(store: &mut TaskStore<R>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();

    info!("event=shell_start module=cli status=ok count={}", store.tasks().len());
    println!(
        "taskpad shell: {} task(s) loaded, `help` lists commands",
        store.tasks().len()
    );

    loop {
        write!(stdout, "{}", prompt(store))?;
        stdout.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match parse(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => execute(store, command),
            Err(message) => println!("{message}"),
        }
    }

    info!("event=shell_stop module=cli status=ok");
    Ok(())
}

fn execute<R: SnapshotRepository>(store: &mut TaskStore<R>, command: ShellCommand) {
    match command {
        ShellCommand::Add(title) => match dispatch(store, Intent::Add { title }) {
            Applied::Ignored => println!("nothing added: title is blank"),
            _ => render(store),
        },
        ShellCommand::Delete(id) => match dispatch(store, Intent::Delete { id }) {
            Applied::Ignored => println!("no task with id {id}"),
            _ => render(store),
        },
        ShellCommand::Edit(id) => match dispatch(store, Intent::BeginEdit { id }) {
            Applied::Ignored => println!("no task with id {id}"),
            _ => println!("editing task {id}: set the new text with `title <text>`, then `save`"),
        },
        ShellCommand::Draft(title) => {
            if store.editing().is_none() {
                println!("nothing being edited; start with `edit <id>`");
            } else {
                dispatch(store, Intent::SetDraft { title });
            }
        }
        ShellCommand::Save => match dispatch(store, Intent::CommitEdit) {
            Applied::Ignored => println!("nothing being edited; start with `edit <id>`"),
            Applied::Transient => println!("edited task no longer exists; edit discarded"),
            Applied::Mutated => render(store),
        },
        ShellCommand::Done(id) => match dispatch(store, Intent::ToggleCompleted { id }) {
            Applied::Ignored => println!("no task with id {id}"),
            _ => render(store),
        },
        ShellCommand::Search(keyword) => {
            dispatch(store, Intent::SetSearch { keyword });
            render(store);
        }
        ShellCommand::Sort(mode) => {
            dispatch(store, Intent::SetSort { mode });
            render(store);
        }
        ShellCommand::List => render(store),
        ShellCommand::Help => print_help(),
        ShellCommand::Quit => {}
    }
}

fn parse(line: &str) -> Result<ShellCommand, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(ShellCommand::List);
    }
    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (trimmed, ""),
    };

    match command {
        "add" => Ok(ShellCommand::Add(rest.to_string())),
        "rm" | "del" => parse_id(rest, "rm <id>").map(ShellCommand::Delete),
        "edit" => parse_id(rest, "edit <id>").map(ShellCommand::Edit),
        "title" => Ok(ShellCommand::Draft(rest.to_string())),
        "save" => Ok(ShellCommand::Save),
        "done" => parse_id(rest, "done <id>").map(ShellCommand::Done),
        "search" => Ok(ShellCommand::Search(rest.to_string())),
        "sort" => match SortMode::parse(rest) {
            Some(mode) => Ok(ShellCommand::Sort(mode)),
            None => Err(format!(
                "unknown sort mode `{rest}`; expected default|alphabetical|date"
            )),
        },
        "list" | "ls" => Ok(ShellCommand::List),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!(
            "unknown command `{other}`; type `help` for the command list"
        )),
    }
}

fn parse_id(value: &str, usage: &str) -> Result<u64, String> {
    value.parse().map_err(|_| format!("usage: {usage}"))
}

fn prompt<R: SnapshotRepository>(store: &TaskStore<R>) -> String {
    let mut prompt = String::from("taskpad");
    if let Some(id) = store.editing() {
        prompt.push_str(&format!(" edit#{id}"));
    }
    if !store.keyword().is_empty() {
        prompt.push_str(&format!(" /{}", store.keyword()));
    }
    if store.sort() != SortMode::Default {
        prompt.push_str(&format!(" sort:{}", store.sort().as_str()));
    }
    prompt.push_str("> ");
    prompt
}

fn print_help() {
    println!("commands:");
    println!("  add <text>      add a task");
    println!("  rm <id>         delete a task (alias: del)");
    println!("  done <id>       toggle completion");
    println!("  edit <id>       start editing a task");
    println!("  title <text>    replace the draft text of the current edit");
    println!("  save            commit the current edit");
    println!("  search <text>   filter the list; `search` alone clears it");
    println!("  sort <mode>     default | alphabetical | date");
    println!("  list            print the visible tasks (alias: ls, empty line)");
    println!("  quit            exit (alias: exit)");
}

#[cfg(test)]
mod tests {
    use super::{parse, ShellCommand};
    use taskpad_core::SortMode;

    #[test]
    fn empty_line_lists() {
        assert_eq!(parse(""), Ok(ShellCommand::List));
        assert_eq!(parse("   \n"), Ok(ShellCommand::List));
    }

    #[test]
    fn add_keeps_the_rest_of_the_line() {
        assert_eq!(
            parse("add buy milk\n"),
            Ok(ShellCommand::Add("buy milk".to_string()))
        );
    }

    #[test]
    fn id_commands_parse_numeric_ids() {
        assert_eq!(parse("rm 4"), Ok(ShellCommand::Delete(4)));
        assert_eq!(parse("del 4"), Ok(ShellCommand::Delete(4)));
        assert_eq!(parse("done 2"), Ok(ShellCommand::Done(2)));
        assert_eq!(parse("edit 7"), Ok(ShellCommand::Edit(7)));
    }

    #[test]
    fn id_commands_reject_garbage_with_usage() {
        let err = parse("rm four").unwrap_err();
        assert!(err.contains("usage: rm <id>"));
        assert!(parse("done").is_err());
        assert!(parse("edit -1").is_err());
    }

    #[test]
    fn sort_accepts_known_modes_only() {
        assert_eq!(parse("sort date"), Ok(ShellCommand::Sort(SortMode::Date)));
        assert_eq!(
            parse("sort alpha"),
            Ok(ShellCommand::Sort(SortMode::Alphabetical))
        );
        assert!(parse("sort loud").is_err());
    }

    #[test]
    fn search_with_no_argument_clears_the_keyword() {
        assert_eq!(parse("search"), Ok(ShellCommand::Search(String::new())));
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(parse("ls"), Ok(ShellCommand::List));
        assert_eq!(parse("exit"), Ok(ShellCommand::Quit));
        assert_eq!(parse("?"), Ok(ShellCommand::Help));
    }

    #[test]
    fn unknown_commands_point_at_help() {
        let err = parse("frobnicate 12").unwrap_err();
        assert!(err.contains("unknown command"));
    }
}
