use crate::record::{Field, Record};
use crate::store::Numbered;
use std::io::{Result, Write};

const NUMBER_WIDTH: usize = 4;

fn column_width(field: Field) -> usize {
    match field {
        Field::WorkPhone | Field::PersonalPhone => 15,
        _ => 20,
    }
}

fn separator(out: &mut dyn Write) -> Result<()> {
    write!(out, "+-{}-", "-".repeat(NUMBER_WIDTH))?;
    for field in Field::ALL {
        write!(out, "+-{}-", "-".repeat(column_width(field)))?;
    }
    writeln!(out, "+")
}

/// Write `rows` as a bordered table, one row per record, numbered by position
/// in the full phonebook.
pub fn table(out: &mut dyn Write, rows: &[Numbered<'_>]) -> Result<()> {
    separator(out)?;
    write!(out, "| {:^w$} ", "№", w = NUMBER_WIDTH)?;
    for field in Field::ALL {
        write!(out, "| {:^w$} ", field.label(), w = column_width(field))?;
    }
    writeln!(out, "|")?;
    separator(out)?;

    for row in rows {
        write!(out, "| {:^w$} ", row.number, w = NUMBER_WIDTH)?;
        for (field, value) in row.record.fields() {
            write!(out, "| {:^w$} ", value, w = column_width(field))?;
        }
        writeln!(out, "|")?;
        separator(out)?;
    }
    Ok(())
}

/// Write `key - value` lines for every field of `record`.
pub fn fields(out: &mut dyn Write, record: &Record) -> Result<()> {
    for (field, value) in record.fields() {
        writeln!(out, "{} - {}", field.key(), value)?;
    }
    Ok(())
}
