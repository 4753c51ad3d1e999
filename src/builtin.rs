use crate::command::{CommandFactory, ExecutableCommand, Prompt};
use crate::error::StoreError;
use crate::interpreter::Factory;
use crate::record::{Field, Record, RecordPatch};
use crate::render;
use crate::session::Session;
use crate::store::SearchOutcome;
use anyhow::{Context, Result};
use argh::{EarlyExit, FromArgs};
use std::io::Write;

/// Menu commands known to the phonebook at compile time.
///
/// Arguments typed after the menu key are parsed with [`argh`] (`FromArgs`);
/// anything missing is asked for through the [`Prompt`].
pub(crate) trait MenuCommand: Sized + FromArgs {
    /// Key selecting the command in the menu, e.g. "1".
    fn key() -> &'static str;

    /// Title shown in the menu.
    fn title() -> &'static str;

    /// Executes the command against the session's store.
    fn execute(
        self,
        prompt: &mut dyn Prompt,
        out: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()>;
}

impl<T: MenuCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        prompt: &mut dyn Prompt,
        out: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        match MenuCommand::execute(*self, prompt, out, session) {
            Ok(()) => Ok(()),
            Err(e) => match e.downcast_ref::<StoreError>() {
                Some(store_err) if store_err.is_user_error() => {
                    writeln!(out, "{}", store_err)?;
                    Ok(())
                }
                _ => Err(e),
            },
        }
    }
}

struct InvalidArgs {
    output: String,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        _prompt: &mut dyn Prompt,
        out: &mut dyn Write,
        _session: &mut Session,
    ) -> Result<()> {
        writeln!(out, "{}", self.output.trim_end())?;
        Ok(())
    }
}

impl<T: MenuCommand + 'static> CommandFactory for Factory<T> {
    fn key(&self) -> &'static str {
        T::key()
    }

    fn title(&self) -> &'static str {
        T::title()
    }

    fn try_create(&self, key: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        if key == T::key() {
            Some(match T::from_args(&[key], args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, .. }) => Box::new(InvalidArgs { output }),
            })
        } else {
            None
        }
    }
}

/// Parse a record or page number typed by the user.
///
/// `None` means the text is not a number at all. Negative numbers map to 0,
/// which every range check rejects.
fn parse_number(input: &str) -> Option<usize> {
    let n: i64 = input.trim().parse().ok()?;
    Some(usize::try_from(n).unwrap_or(0))
}

fn argument_or_prompt(
    arg: Option<String>,
    prompt: &mut dyn Prompt,
    question: &str,
) -> Result<String> {
    match arg {
        Some(value) => Ok(value),
        None => prompt.read_line(question),
    }
}

/// Ask for all six fields in order, one prompt each.
fn read_fields(prompt: &mut dyn Prompt) -> Result<Vec<(Field, String)>> {
    let mut values = Vec::with_capacity(Field::ALL.len());
    for field in Field::ALL {
        values.push((field, prompt.read_line(&format!("{}: ", field.label()))?));
    }
    Ok(values)
}

#[derive(FromArgs)]
/// Show one page of the phonebook.
pub struct Display {
    #[argh(positional)]
    /// page to show; asked for when omitted.
    pub page: Option<String>,
}

impl MenuCommand for Display {
    fn key() -> &'static str {
        "1"
    }

    fn title() -> &'static str {
        "Display Records"
    }

    fn execute(
        self,
        prompt: &mut dyn Prompt,
        out: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        let page_size = session.page_size();
        let pages = session.store.page_count(page_size);
        let question = format!("Enter page number (1 - {}): ", pages);
        let input = argument_or_prompt(self.page, prompt, &question)?;

        let Some(page) = parse_number(&input) else {
            writeln!(out, "Enter a number of page!")?;
            return Ok(());
        };
        match session.store.page(page_size, page) {
            Ok(rows) => render::table(out, &rows)?,
            Err(StoreError::InvalidPage { .. }) => writeln!(out, "Invalid page number!")?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Add a new record at the end of the phonebook.
pub struct Add {}

impl MenuCommand for Add {
    fn key() -> &'static str {
        "2"
    }

    fn title() -> &'static str {
        "Add Record"
    }

    fn execute(
        self,
        prompt: &mut dyn Prompt,
        out: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        let mut record = Record::default();
        for (field, value) in read_fields(prompt)? {
            record.set(field, value);
        }

        session.store.add(record);
        session.store.save().context("save phonebook")?;
        writeln!(out, "Record added successfully!")?;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Change fields of an existing record. Empty answers keep the old value.
pub struct Change {
    #[argh(positional)]
    /// number of the record to change; asked for when omitted.
    pub number: Option<String>,
}

impl MenuCommand for Change {
    fn key() -> &'static str {
        "3"
    }

    fn title() -> &'static str {
        "Change Record"
    }

    fn execute(
        self,
        prompt: &mut dyn Prompt,
        out: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        let input = argument_or_prompt(
            self.number,
            prompt,
            "What you want to change (tap a number): ",
        )?;
        let Some(number) = parse_number(&input) else {
            writeln!(out, "Enter a number of record!")?;
            return Ok(());
        };

        writeln!(
            out,
            "Input new values (if you dont want to change some item press enter): "
        )?;
        let mut patch = RecordPatch::new();
        for (field, value) in read_fields(prompt)? {
            patch.set(field, value);
        }

        let updated = match session.store.update(number, &patch) {
            Ok(record) => record.clone(),
            Err(StoreError::OutOfRange { .. }) => {
                writeln!(out, "Enter valid number of record")?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        session.store.save().context("save phonebook")?;

        writeln!(out, "Changes added:")?;
        render::fields(out, &updated)?;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Find records whose field equals a value.
/// Only the first valid criterion code is applied.
pub struct Find {
    #[argh(positional, greedy)]
    /// criterion codes 1-6; asked for when omitted.
    pub codes: Vec<String>,
}

impl MenuCommand for Find {
    fn key() -> &'static str {
        "4"
    }

    fn title() -> &'static str {
        "Find Record"
    }

    fn execute(
        self,
        prompt: &mut dyn Prompt,
        out: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        writeln!(out, "By what parameter need to find record: ")?;
        for field in Field::ALL {
            writeln!(out, "{}. {}", field.code(), field.label())?;
        }
        let selection = if self.codes.is_empty() {
            prompt.read_line("Select numbers of parameter to search separated by spaces: ")?
        } else {
            self.codes.join(" ")
        };

        let outcome = session.store.search(&selection, |field| {
            prompt.read_line(&format!("Input a value for parameter {}: ", field.code()))
        })?;
        match outcome {
            SearchOutcome::Matches(rows) if rows.is_empty() => {
                writeln!(out, "No records found.")?;
            }
            SearchOutcome::Matches(rows) => render::table(out, &rows)?,
            SearchOutcome::InvalidCriterion(code) => {
                writeln!(out, "Invalid parameter: {}", code)?;
            }
            SearchOutcome::NoCriteria => writeln!(out, "No search parameters given.")?,
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Delete a record. Later records move up by one number.
pub struct Delete {
    #[argh(positional)]
    /// number of the record to delete; asked for when omitted.
    pub number: Option<String>,
}

impl MenuCommand for Delete {
    fn key() -> &'static str {
        "5"
    }

    fn title() -> &'static str {
        "Delete Record"
    }

    fn execute(
        self,
        prompt: &mut dyn Prompt,
        out: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        let input =
            argument_or_prompt(self.number, prompt, "Select a number of record to delete: ")?;
        let Some(number) = parse_number(&input) else {
            writeln!(out, "Enter a number of record!")?;
            return Ok(());
        };

        session.store.delete(number)?;
        session.store.save().context("save phonebook")?;
        writeln!(out, "Record {} deleted", number)?;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Leave the phonebook.
pub struct Exit {}

impl MenuCommand for Exit {
    fn key() -> &'static str {
        "6"
    }

    fn title() -> &'static str {
        "Exit"
    }

    fn execute(
        self,
        _prompt: &mut dyn Prompt,
        out: &mut dyn Write,
        session: &mut Session,
    ) -> Result<()> {
        writeln!(out, "Exiting...")?;
        session.should_exit = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::io_adapters::ScriptedPrompt;
    use std::fs;
    use tempfile::TempDir;

    fn session_in(temp: &TempDir) -> Session {
        Session::new(Settings {
            data_file: temp.path().join("book.json"),
            page_size: 5,
        })
    }

    fn person(first: &str, last: &str) -> Record {
        Record {
            first_name: first.to_string(),
            last_name: last.to_string(),
            ..Record::default()
        }
    }

    fn run<T: MenuCommand>(cmd: T, script: &str, session: &mut Session) -> String {
        let mut prompt = ScriptedPrompt::from_script(script);
        let mut out = Vec::new();
        cmd.execute(&mut prompt, &mut out, session)
            .expect("command failed");
        String::from_utf8(out).expect("utf8")
    }

    fn run_boxed(cmd: Box<dyn ExecutableCommand>, script: &str, session: &mut Session) -> String {
        let mut prompt = ScriptedPrompt::from_script(script);
        let mut out = Vec::new();
        cmd.execute(&mut prompt, &mut out, session)
            .expect("command failed");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("3"), Some(3));
        assert_eq!(parse_number(" 12 "), Some(12));
        assert_eq!(parse_number("-1"), Some(0));
        assert_eq!(parse_number("three"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_add_appends_and_persists() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&temp);

        let out = run(
            Add {},
            "John\nSmith\nPaul\nAcme\n111\n222\n",
            &mut session,
        );
        assert_eq!(out, "Record added successfully!\n");

        let expected = Record {
            first_name: "John".into(),
            last_name: "Smith".into(),
            middle_name: "Paul".into(),
            organization: "Acme".into(),
            work_phone: "111".into(),
            personal_phone: "222".into(),
        };
        let on_disk = crate::store::load(&temp.path().join("book.json")).unwrap();
        assert_eq!(on_disk, vec![expected]);
    }

    #[test]
    fn test_display_reports_bad_page_input() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&temp);
        session.store.add(person("A", "B"));

        let out = run(Display { page: None }, "abc\n", &mut session);
        assert_eq!(out, "Enter a number of page!\n");

        let out = run(Display { page: None }, "2\n", &mut session);
        assert_eq!(out, "Invalid page number!\n");

        let out = run(Display { page: Some("1".into()) }, "", &mut session);
        assert!(out.contains("|  1   |"));
    }

    #[test]
    fn test_display_prompt_mentions_page_count() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&temp);
        for i in 0..6 {
            session.store.add(person(&i.to_string(), ""));
        }

        let mut prompt = ScriptedPrompt::from_script("2\n");
        let mut out = Vec::new();
        Display { page: None }
            .execute(&mut prompt, &mut out, &mut session)
            .unwrap();

        assert_eq!(prompt.asked(), ["Enter page number (1 - 2): "]);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("|  6   |"));
        assert!(!text.contains("|  5   |"));
    }

    #[test]
    fn test_change_updates_only_given_fields() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&temp);
        session.store.add(person("A", "B"));

        let out = run(Change { number: None }, "1\n\n\n\nInitech\n\n\n", &mut session);
        assert!(out.contains("Changes added:\n"));
        assert!(out.contains("organization - Initech\n"));
        assert!(out.contains("first_name - A\n"));

        let on_disk = crate::store::load(session.store.path()).unwrap();
        assert_eq!(
            on_disk,
            vec![Record {
                organization: "Initech".into(),
                ..person("A", "B")
            }]
        );
    }

    #[test]
    fn test_change_out_of_range_does_not_persist() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&temp);
        session.store.add(person("A", "B"));

        let out = run(Change { number: Some("2".into()) }, "Z\n\n\n\n\n\n", &mut session);
        assert!(out.ends_with("Enter valid number of record\n"));
        assert!(!session.store.path().exists());
        assert_eq!(session.store.get(1).unwrap().record, &person("A", "B"));
    }

    #[test]
    fn test_find_prints_matching_rows() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&temp);
        session.store.add(person("John", "Smith"));
        session.store.add(person("Ann", "Jones"));

        let out = run(Find { codes: Vec::new() }, "2\nJones\n", &mut session);
        assert!(out.contains("6. Personal Phone\n"));
        assert!(out.contains("Jones"));
        assert!(!out.contains("Smith"));
        assert!(out.contains("|  2   |"));
    }

    #[test]
    fn test_find_reports_invalid_code_and_empty_result() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&temp);
        session.store.add(person("John", "Smith"));

        let out = run(Find { codes: vec!["8".into(), "1".into()] }, "", &mut session);
        assert!(out.ends_with("Invalid parameter: 8\n"));

        let out = run(Find { codes: vec!["1".into()] }, "Nobody\n", &mut session);
        assert!(out.ends_with("No records found.\n"));

        let out = run(Find { codes: Vec::new() }, "\n", &mut session);
        assert!(out.ends_with("No search parameters given.\n"));
    }

    #[test]
    fn test_delete_reports_out_of_range_through_executable() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&temp);
        session.store.add(person("A", ""));

        let factory = Factory::<Delete>::default();
        let cmd = factory.try_create("5", &["7"]).expect("delete command");
        let out = run_boxed(cmd, "", &mut session);

        assert_eq!(out, "record 7 does not exist (the phonebook has 1 records)\n");
        assert_eq!(session.store.len(), 1);
        assert!(!session.store.path().exists());
    }

    #[test]
    fn test_delete_removes_and_persists() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&temp);
        for name in ["A", "B", "C"] {
            session.store.add(person(name, ""));
        }

        let out = run(Delete { number: None }, "2\n", &mut session);
        assert_eq!(out, "Record 2 deleted\n");

        let text = fs::read_to_string(session.store.path()).unwrap();
        assert!(text.contains("\"A\""));
        assert!(!text.contains("\"B\""));
        assert!(text.contains("\"C\""));
    }

    #[test]
    fn test_exit_sets_flag() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&temp);

        let out = run(Exit {}, "", &mut session);
        assert_eq!(out, "Exiting...\n");
        assert!(session.should_exit);
    }

    #[test]
    fn test_factory_matches_only_its_key() {
        let factory = Factory::<Display>::default();
        assert_eq!(factory.key(), "1");
        assert_eq!(factory.title(), "Display Records");
        assert!(factory.try_create("2", &[]).is_none());
        assert!(factory.try_create("1", &["3"]).is_some());
    }

    #[test]
    fn test_factory_reports_bad_arguments() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut session = session_in(&temp);

        let factory = Factory::<Display>::default();
        let cmd = factory.try_create("1", &["1", "2"]).expect("command");
        let out = run_boxed(cmd, "", &mut session);
        assert!(out.contains("Unrecognized argument: 2"), "{}", out);
    }
}
