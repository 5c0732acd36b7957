//! Styled console lines. Everything stays plain when `NO_COLOR` is set.

use console::{style, StyledObject};

type Paint = fn(StyledObject<String>) -> StyledObject<String>;

/// `NO_COLOR` is set, to any value.
#[must_use]
pub fn plain_output() -> bool {
    std::env::var_os("NO_COLOR").is_some()
}

fn paint(text: impl Into<String>, colour: Paint) -> String {
    let text = text.into();
    if plain_output() {
        text
    } else {
        colour(style(text)).bold().to_string()
    }
}

/// Banner opening a pass.
pub fn print_pass_banner(title: &str) {
    println!("{}", paint(format!("--- {title} ---"), |s| s.cyan()));
}

/// Progress line for a trial that produced a value.
pub fn print_success(text: &str) {
    println!("  {} {text}", paint("[OK]", |s| s.green()));
}

/// Progress line for a trial without a value. Stays on stdout, interleaved
/// with the rest of the narration.
pub fn print_error(text: &str) {
    println!("  {} {text}", paint("[FAIL]", |s| s.red()));
}

/// Application-level error, on stderr.
pub fn print_fatal(text: &str) {
    eprintln!("{} {text}", paint("[ERROR]", |s| s.red()));
}
