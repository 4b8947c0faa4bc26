use std::io::{self, Write};

use crate::core::config::data::Config;

fn or_unset(value: Option<String>) -> String {
    value.unwrap_or_else(|| "(unset)".to_string())
}

impl Config {
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Current configuration:")?;
        writeln!(out, "  base-url: {}", self.base_url())?;
        writeln!(out, "  endpoint: {}", self.endpoint())?;
        writeln!(out, "  tools: {}", self.available_tools().join(", "))?;
        if self.default_tools.is_empty() {
            writeln!(out, "  default-tools: (none set)")?;
        } else {
            writeln!(out, "  default-tools: {}", self.default_tools.join(", "))?;
        }
        match self.markdown_enabled() {
            true => writeln!(out, "  markdown: on")?,
            false => writeln!(out, "  markdown: off")?,
        }
        writeln!(out, "  theme: {}", or_unset(self.theme.clone()))?;
        writeln!(
            out,
            "  reveal-interval-ms: {}",
            self.reveal_interval().as_millis()
        )?;
        writeln!(
            out,
            "  reveal-chars-per-tick: {}",
            self.reveal_chars_per_tick()
        )?;
        writeln!(out, "  log-file: {}", or_unset(self.log_file.clone()))
    }

    pub fn print_all(&self) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        let _ = self.write_summary(&mut handle);
    }
}
