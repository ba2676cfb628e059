//! User interaction: selection menus, confirmations, notifications

use std::io::{self, BufRead, Write};

use crate::github::open_browser;

/// Prompts the orchestrators put in front of the user
pub trait Interaction {
    /// Pick one of `options`; `None` when the user cancels
    fn select(&self, prompt: &str, options: &[String]) -> Option<usize>;

    /// Yes/no question; empty input picks `default`
    fn confirm(&self, prompt: &str, default: bool) -> bool;

    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    /// Open `url` in a browser; false when nothing could be launched
    fn open_url(&self, url: &str) -> bool;
}

/// What a line typed at a selection menu means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuInput {
    Choice(usize),
    Cancel,
    Invalid,
}

fn parse_menu_input(input: &str, option_count: usize) -> MenuInput {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("q") {
        return MenuInput::Cancel;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=option_count).contains(&n) => MenuInput::Choice(n - 1),
        _ => MenuInput::Invalid,
    }
}

fn parse_confirm_input(input: &str, default: bool) -> bool {
    match input.trim().to_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}

/// Numbered menus on stdout, answers from stdin
#[derive(Debug, Default)]
pub struct TerminalInteraction;

impl TerminalInteraction {
    pub fn new() -> Self {
        Self
    }

    /// One line from stdin; `None` on EOF or read error
    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }
}

impl Interaction for TerminalInteraction {
    fn select(&self, prompt: &str, options: &[String]) -> Option<usize> {
        if options.is_empty() {
            return None;
        }

        println!("{}", prompt);
        for (i, option) in options.iter().enumerate() {
            println!("  {:>2}) {}", i + 1, option);
        }

        loop {
            print!("Select [1-{}] (Enter to cancel): ", options.len());
            io::stdout().flush().ok();

            let line = self.read_line()?;
            match parse_menu_input(&line, options.len()) {
                MenuInput::Choice(index) => return Some(index),
                MenuInput::Cancel => return None,
                MenuInput::Invalid => println!("Please enter a number between 1 and {}.", options.len()),
            }
        }
    }

    fn confirm(&self, prompt: &str, default: bool) -> bool {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        print!("{} {} ", prompt, hint);
        io::stdout().flush().ok();

        match self.read_line() {
            Some(line) => parse_confirm_input(&line, default),
            None => default,
        }
    }

    fn info(&self, message: &str) {
        println!("{}", message);
    }

    fn warn(&self, message: &str) {
        eprintln!("⚠ {}", message);
    }

    fn open_url(&self, url: &str) -> bool {
        open_browser(url)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::Interaction;

    /// Scripted answers plus a log of everything shown
    #[derive(Default)]
    pub struct ScriptedInteraction {
        pub selections: RefCell<VecDeque<Option<usize>>>,
        pub confirmations: RefCell<VecDeque<bool>>,
        pub prompts: RefCell<Vec<(String, Vec<String>)>>,
        pub infos: RefCell<Vec<String>>,
        pub warnings: RefCell<Vec<String>>,
        pub opened: RefCell<Vec<String>>,
    }

    impl ScriptedInteraction {
        pub fn answering(selections: impl IntoIterator<Item = Option<usize>>) -> Self {
            Self {
                selections: RefCell::new(selections.into_iter().collect()),
                ..Self::default()
            }
        }

        pub fn with_confirmations(self, answers: impl IntoIterator<Item = bool>) -> Self {
            *self.confirmations.borrow_mut() = answers.into_iter().collect();
            self
        }
    }

    impl Interaction for ScriptedInteraction {
        fn select(&self, prompt: &str, options: &[String]) -> Option<usize> {
            self.prompts
                .borrow_mut()
                .push((prompt.to_string(), options.to_vec()));
            self.selections
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected menu: {}", prompt))
        }

        fn confirm(&self, _prompt: &str, default: bool) -> bool {
            self.confirmations.borrow_mut().pop_front().unwrap_or(default)
        }

        fn info(&self, message: &str) {
            self.infos.borrow_mut().push(message.to_string());
        }

        fn warn(&self, message: &str) {
            self.warnings.borrow_mut().push(message.to_string());
        }

        fn open_url(&self, url: &str) -> bool {
            self.opened.borrow_mut().push(url.to_string());
            true
        }
    }
}
