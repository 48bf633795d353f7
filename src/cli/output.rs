use colored::Colorize;

use crate::core::models::value::Value;

/// Print a success message.
pub fn success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

/// Print a warning message.
pub fn warning(msg: &str) {
    println!("  {} {}", "⚠".yellow(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a header line.
pub fn header(msg: &str) {
    println!("\n{}", msg.bold());
}

/// Print one resolved field.
pub fn value(name: &str, value: &Value) {
    let rendered = value.to_string();
    let rendered = if value.is_null() {
        rendered.dimmed()
    } else {
        rendered.normal()
    };
    println!("    {} = {}", name.cyan(), rendered);
}
