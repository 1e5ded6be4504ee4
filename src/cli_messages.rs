//! CLI command messaging system
//!
//! Consistent one-line output for subcommands such as `serve`, `init-db`
//! and `insert`.

/// Kind of a command message, which decides its tag and color.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Tag {
    Info,
    Warn,
    Error,
    Success,
}

impl Tag {
    fn label(&self) -> &'static str {
        match self {
            Tag::Info => "INFO",
            Tag::Warn => "WARN",
            Tag::Error => "ERROR",
            Tag::Success => "SUCCESS",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            Tag::Info => "\x1b[1;33m",
            Tag::Warn => "\x1b[1;91m",
            Tag::Error => "\x1b[1;31m",
            Tag::Success => "\x1b[1;32m",
        }
    }
}

/// Formats a tagged message; empty details are left out.
pub fn format_message(tag: Tag, title: &str, details: &str) -> String {
    let mut line = format!("{}[{}]\x1b[0m {}", tag.color(), tag.label(), title);
    if !details.is_empty() {
        line.push_str("\t ");
        line.push_str(details);
    }
    line
}

/// Print CLI command info message
pub fn print_info(title: &str, details: &str) {
    println!("{}", format_message(Tag::Info, title, details));
}

/// Print CLI command warn message
pub fn print_warn(title: &str, details: &str) {
    println!("{}", format_message(Tag::Warn, title, details));
}

/// Print CLI command error, on stderr
pub fn print_error(title: &str, details: Option<&str>) {
    eprintln!("{}", format_message(Tag::Error, title, ""));
    if let Some(details) = details {
        eprintln!("{}", format_message(Tag::Error, "Details:", details));
    }
}

/// Print CLI command success
pub fn print_success(title: &str, details: &str) {
    println!("{}", format_message(Tag::Success, title, details));
}

#[macro_export]
macro_rules! print_cmd_info {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_info($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_warn {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_warn($title, &format!($($details)*))
    };
}

/// Macro for CLI errors
#[macro_export]
macro_rules! print_cmd_error {
    ($title:expr) => {
        $crate::cli_messages::print_error($title, None)
    };
    ($title:expr, $details:expr) => {
        $crate::cli_messages::print_error($title, Some($details))
    };
}

#[macro_export]
macro_rules! print_cmd_success {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_success($title, &format!($($details)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        assert_eq!(
            format_message(Tag::Success, "Created tables", "monitors"),
            "\x1b[1;32m[SUCCESS]\x1b[0m Created tables\t monitors"
        );
        assert_eq!(
            format_message(Tag::Warn, "No tables", ""),
            "\x1b[1;91m[WARN]\x1b[0m No tables"
        );
    }
}
