#![forbid(unsafe_code)]

//! Invocation output formatters (human and JSONL)

use crate::cli::commands::Invocation;
use crate::error::DappError;
use crate::types::ColorOption;
use serde_json::Value;
use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Maps the `--color` setting onto a termcolor choice for stdout
pub fn color_choice(option: ColorOption) -> ColorChoice {
    match option {
        ColorOption::Always => ColorChoice::Always,
        ColorOption::Never => ColorChoice::Never,
        ColorOption::Auto if io::stdout().is_terminal() => ColorChoice::Auto,
        ColorOption::Auto => ColorChoice::Never,
    }
}

/// Human-readable formatter
///
/// Prints the subcommand name as a header, then one `key: value` line per
/// resolved argument. Empty lists and unset values are left out.
pub struct InvocationHumanFormatter {
    color_choice: ColorChoice,
}

impl InvocationHumanFormatter {
    pub fn new(color_choice: ColorChoice) -> Self {
        InvocationHumanFormatter { color_choice }
    }

    /// Format an invocation without colors
    pub fn format(&self, invocation: &Invocation) -> Result<String, serde_json::Error> {
        let mut output = format!("{}\n", invocation.subcommand());
        for (key, value) in fields(invocation)? {
            output.push_str(&format!("  {}: {}\n", key, value));
        }
        Ok(output)
    }

    /// Write an invocation to any color-capable writer
    pub fn write(
        &self,
        invocation: &Invocation,
        writer: &mut dyn WriteColor,
    ) -> Result<(), DappError> {
        writer.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
        write!(writer, "{}", invocation.subcommand())?;
        writer.reset()?;
        writeln!(writer)?;

        for (key, value) in fields(invocation)? {
            writer.set_color(ColorSpec::new().set_bold(true))?;
            write!(writer, "  {}:", key)?;
            writer.reset()?;
            writeln!(writer, " {}", value)?;
        }
        Ok(())
    }

    pub fn write_to_stdout(&self, invocation: &Invocation) -> Result<(), DappError> {
        let mut stdout = StandardStream::stdout(self.color_choice);
        self.write(invocation, &mut stdout)?;
        stdout.flush()?;
        Ok(())
    }
}

impl Default for InvocationHumanFormatter {
    fn default() -> Self {
        Self::new(ColorChoice::Never)
    }
}

/// JSON Lines formatter: one object per invocation, tagged by `subcommand`
#[derive(Debug, Default)]
pub struct InvocationJsonlFormatter;

impl InvocationJsonlFormatter {
    pub fn new() -> Self {
        InvocationJsonlFormatter
    }

    pub fn format(&self, invocation: &Invocation) -> Result<String, serde_json::Error> {
        serde_json::to_string(invocation)
    }

    pub fn write_to_stdout(&self, invocation: &Invocation) -> Result<(), DappError> {
        let line = self.format(invocation)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        Ok(())
    }
}

fn fields(invocation: &Invocation) -> Result<Vec<(String, String)>, serde_json::Error> {
    let Value::Object(map) = serde_json::to_value(invocation)? else {
        return Ok(Vec::new());
    };
    let mut fields: Vec<(String, String)> = map
        .into_iter()
        .filter(|(key, _)| key != "subcommand")
        .filter_map(|(key, value)| render_value(&value).map(|rendered| (key, rendered)))
        .collect();
    fields.sort();
    Ok(fields)
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) if items.is_empty() => None,
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(render_value)
                .collect::<Vec<_>>()
                .join(" "),
        ),
        other => Some(other.to_string()),
    }
}
