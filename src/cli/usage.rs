//! Usage banner and version line

use crate::cli::options::OptionTable;

const BANNER: &str = "\
Usage: dapp [options] sub-command [sub-command options]

Available subcommands: (for details, dapp SUB-COMMAND --help)

dapp build [options] [APPS PATTERN ...]
dapp bp [options] [APPS PATTERN ...] REPO
dapp push [options] [APP PATTERN] REPO
dapp spush [options] [APPS PATTERN ...] REPO
dapp list [options] [APPS PATTERN ...]
dapp run [options] [APP PATTERN] [DOCKER ARGS]
dapp cleanup [options] [APPS PATTERN ...]
dapp stages

Options:
";

const FORMS_WIDTH: usize = 32;

/// Version line printed by `--version`
pub fn version_line() -> String {
    format!("dapp: {}", env!("CARGO_PKG_VERSION"))
}

/// Full help text: banner followed by one line per global option
pub fn render(table: &OptionTable) -> String {
    let mut output = String::from(BANNER);
    for definition in table.iter() {
        output.push_str(&format!(
            "    {:<width$} {}\n",
            definition.forms(),
            definition.description,
            width = FORMS_WIDTH
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Subcommand;

    #[test]
    fn test_version_line() {
        assert_eq!(
            version_line(),
            format!("dapp: {}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn test_render_lists_every_subcommand() {
        let help = render(&OptionTable::dapp());
        for subcommand in Subcommand::ALL {
            assert!(
                help.contains(&format!("dapp {}", subcommand)),
                "help is missing {}",
                subcommand
            );
        }
    }

    #[test]
    fn test_render_lists_options_in_table_order() {
        let help = render(&OptionTable::dapp());
        let options = help.split("Options:\n").nth(1).unwrap();
        let lines: Vec<&str> = options.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("--color WHEN"));
        assert!(lines[1].contains("--format FORMAT"));
        assert!(lines[2].contains("--version") && lines[2].contains("Show version"));
        assert!(lines[3].contains("-h, --help") && lines[3].contains("Show this message"));
    }
}
