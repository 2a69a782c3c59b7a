/*
* BSD 2-Clause License

* Copyright (c) 2023, Love Billenius

* Redistribution and use in source and binary forms, with or without
* modification, are permitted provided that the following conditions are met:

* 1. Redistributions of source code must retain the above copyright notice, this
*    list of conditions and the following disclaimer.

* 2. Redistributions in binary form must reproduce the above copyright notice,
*    this list of conditions and the following disclaimer in the documentation
*    and/or other materials provided with the distribution.

* THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
* AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
* IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
* DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
* FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
* DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
* SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
* CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
* OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
* OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
*/
use std::time::Duration;

use console::{style, Term};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};

use crate::Result;

/// Everything the checker shows to or asks of the user goes through here, so
/// the decision logic can be driven without a terminal.
pub trait UserInterface {
    fn message(&mut self, msg: &str);

    fn warning(&mut self, msg: &str);

    fn error(&mut self, msg: &str);

    /// Yes/no question. Answers `false` when nobody can be asked.
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Hands `url` to the platform's default handler.
    fn open_url(&mut self, url: &str) -> Result<()>;

    /// Spinner shown while a slow step runs.
    fn spinner(&self, msg: &str) -> ProgressBar {
        let bar = ProgressBar::hidden();
        bar.set_message(msg.to_string());
        bar
    }

    fn wait_for_key(&mut self) {}
}

pub struct TerminalUi {
    term: Term,
    quiet: bool,
}

impl TerminalUi {
    pub fn new(quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            quiet,
        }
    }

    pub fn is_interactive(&self) -> bool {
        !self.quiet && self.term.is_term()
    }
}

/// Name and version, printed once at start-up.
pub fn banner(ui: &mut dyn UserInterface, version: u32) {
    ui.message(&format!("TinyNvidiaUpdateChecker v{version}"));
    ui.message("This program comes with ABSOLUTELY NO WARRANTY");
    ui.message("");
}

impl UserInterface for TerminalUi {
    fn message(&mut self, msg: &str) {
        if !self.quiet {
            println!("{msg}");
        }
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("{}", style(msg).yellow());
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", style(msg).red());
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        if !self.term.is_term() {
            return Ok(false);
        }
        Ok(Confirm::new()
            .with_prompt(question)
            .default(true)
            .interact()?)
    }

    fn open_url(&mut self, url: &str) -> Result<()> {
        log::debug!("opening {url}");
        open::that(url)?;
        Ok(())
    }

    fn spinner(&self, msg: &str) -> ProgressBar {
        if self.quiet || !self.term.is_term() {
            let bar = ProgressBar::hidden();
            bar.set_message(msg.to_string());
            return bar;
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(msg.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }

    fn wait_for_key(&mut self) {
        if self.is_interactive() {
            let _ = self.term.read_key();
        }
    }
}

#[cfg(test)]
pub use mock::MockUi;

#[cfg(test)]
mod mock {
    use std::collections::VecDeque;

    use super::UserInterface;
    use crate::Result;

    /// Records every interaction and answers prompts from a queue.
    #[derive(Debug, Default)]
    pub struct MockUi {
        pub messages: Vec<String>,
        pub warnings: Vec<String>,
        pub errors: Vec<String>,
        pub prompts: Vec<String>,
        pub opened: Vec<String>,
        pub answers: VecDeque<bool>,
    }

    impl MockUi {
        pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                ..Default::default()
            }
        }
    }

    impl UserInterface for MockUi {
        fn message(&mut self, msg: &str) {
            self.messages.push(msg.to_string());
        }

        fn warning(&mut self, msg: &str) {
            self.warnings.push(msg.to_string());
        }

        fn error(&mut self, msg: &str) {
            self.errors.push(msg.to_string());
        }

        fn confirm(&mut self, question: &str) -> Result<bool> {
            self.prompts.push(question.to_string());
            Ok(self.answers.pop_front().unwrap_or(false))
        }

        fn open_url(&mut self, url: &str) -> Result<()> {
            self.opened.push(url.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_names_the_version() {
        let mut ui = MockUi::default();
        banner(&mut ui, 1000);
        assert_eq!(
            ui.messages,
            vec![
                "TinyNvidiaUpdateChecker v1000",
                "This program comes with ABSOLUTELY NO WARRANTY",
                "",
            ]
        );
    }
}
