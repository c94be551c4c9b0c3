//! Password command implementation.
//!
//! The `opkit password` command prints a freshly generated password.

use std::io::Write;

use crate::cli::args::PasswordArgs;
use crate::error::Result;
use crate::password::{generate_password, PasswordKind};

use super::dispatcher::{Command, CommandResult};

/// The password command implementation.
pub struct PasswordCommand {
    args: PasswordArgs,
}

impl PasswordCommand {
    pub fn new(args: PasswordArgs) -> Self {
        Self { args }
    }
}

impl Command for PasswordCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let kind = PasswordKind::parse(&self.args.kind);
        tracing::debug!(length = self.args.length, kind = %kind, "Generating password");

        let password = generate_password(self.args.length, kind)?;
        writeln!(out, "{}", password)?;
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(length: usize, kind: &str) -> String {
        let cmd = PasswordCommand::new(PasswordArgs {
            length,
            kind: kind.to_string(),
        });
        let mut out = Vec::new();
        assert!(cmd.execute(&mut out).unwrap().success);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn prints_one_line() {
        let printed = run(20, "advance");
        assert!(printed.ends_with('\n'));
        assert_eq!(printed.trim_end().len(), 20);
    }

    #[test]
    fn unknown_kind_prints_letters() {
        let printed = run(40, "bogus");
        assert!(printed.trim_end().chars().all(|c| c.is_ascii_alphabetic()));
    }
}
