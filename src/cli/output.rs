//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the EDA Crew CLI.

use crate::dataset::DatasetProfile;
use crate::pipeline::EdaReport;
use owo_colors::OwoColorize;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the EDA Crew banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                r#"
   {}
   {}
   {}
   {}
"#,
                " ___ ___   _      ___                ".bright_cyan().bold(),
                "| __|   \\ /_\\    / __|_ _ _____ __ __".cyan().bold(),
                "| _|| |) / _ \\  | (__| '_/ -_) V  V /".blue().bold(),
                "|___|___/_/ \\_\\  \\___|_| \\___|\\_/\\_/ ".blue().bold(),
            );
            println!(
                "   {} {}\n",
                "Agent-driven exploratory data analysis".bright_white().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!(
                r#"
 ___ ___   _      ___
| __|   \ /_\    / __|_ _ _____ __ __
| _|| |) / _ \  | (__| '_/ -_) V  V /
|___|___/_/ \_\  \___|_| \___|\_/\_/

   Agent-driven exploratory data analysis v{}
"#,
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a file creation message
    pub fn created(&self, file_type: &str, path: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "✓".green().bold(),
                file_type.dimmed(),
                path.bright_white()
            );
        } else {
            println!("  [CREATED] {} {}", file_type, path);
        }
    }

    /// Print a file skipped message
    pub fn skipped(&self, path: &str, reason: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "○".yellow(),
                path.dimmed(),
                format!("({})", reason).yellow()
            );
        } else {
            println!("  [SKIPPED] {} ({})", path, reason);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a subheader
    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Print completion message
    pub fn complete(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "🚀".green(), message.bright_green().bold());
        } else {
            println!("\n  [DONE] {}", message);
        }
    }

    /// Print a block of model-written markdown, indented
    pub fn block(&self, text: &str) {
        for line in text.trim_end().lines() {
            println!("    {}", line);
        }
    }

    /// Print a table header row
    pub fn table_header(&self, columns: &[&str]) {
        let header: String = columns
            .iter()
            .map(|c| format!("{:<18}", c))
            .collect::<Vec<_>>()
            .join(" ");
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(columns.len() * 19).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(columns.len() * 19));
        }
    }

    /// Print a table row
    pub fn table_row(&self, values: &[&str]) {
        let row: String = values
            .iter()
            .map(|v| format!("{:<18}", v))
            .collect::<Vec<_>>()
            .join(" ");
        println!("    {}", row);
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }

    /// Print a finished pipeline report
    pub fn report(&self, report: &EdaReport) {
        self.header("Questions");
        if report.questions.is_empty() {
            self.warning(&report.summary);
            return;
        }
        for (i, question) in report.questions.iter().enumerate() {
            self.list_item(&format!("{}. {}", i + 1, question));
        }

        for (i, analysis) in report.analyses.iter().enumerate() {
            self.subheader(&format!("Analysis {}", i + 1));
            self.block(analysis);
        }

        self.header("Summary");
        self.block(&report.summary);
    }

    /// Print a dataset profile as a table
    pub fn profile(&self, profile: &DatasetProfile) {
        self.kv("rows", &profile.rows.to_string());
        self.kv("columns", &profile.columns.len().to_string());
        self.newline();
        self.table_header(&["Column", "Type", "Missing", "Unique"]);

        for column in &profile.columns {
            let unique = if column.distinct_capped {
                format!("{}+", column.distinct)
            } else {
                column.distinct.to_string()
            };
            let kind = column.kind.to_string();
            let missing = column.missing.to_string();
            self.table_row(&[column.name.as_str(), kind.as_str(), missing.as_str(), unique.as_str()]);
        }
    }
}
