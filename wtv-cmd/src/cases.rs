//! List the selectable case windows.

use crate::startup::load_registry;
use std::io::Write;
use std::path::Path;
use wtv_core::CaseWindowRegistry;

pub fn run_cases(cases: Option<&Path>) -> anyhow::Result<()> {
    let registry = load_registry(cases)?;
    let stdout = std::io::stdout();
    write_cases(&registry, stdout.lock())
}

/// Write `label,start,end` rows in registry order; the first row is the default.
pub fn write_cases<W: Write>(registry: &CaseWindowRegistry, out: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["label", "start", "end"])?;
    for case in registry.iter() {
        writer.write_record([
            case.label.as_str(),
            case.start_key(),
            case.end_key(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_cases_listed_in_order() {
        let registry = CaseWindowRegistry::embedded().unwrap();
        let mut out = Vec::new();
        write_cases(&registry, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "Case 1: 2025/01/29 - 2025/02/02,2025-01-29,2025-02-02");
        assert_eq!(lines[5], "Case 5: 2025/03/25 - 2025/03/28,2025-03-25,2025-03-28");
    }
}
