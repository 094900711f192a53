use crate::report::ScanReport;
use crate::table;

const MAX_WARNINGS_SHOWN: usize = 10;

/// Render a scan report as a human-readable console summary: declared
/// and inferred permissions with their bits, raw values, warnings, and
/// the combined permission integer.
pub fn render(report: &ScanReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n  Permission scan of {}\n\n",
        report.root.display()
    ));
    out.push_str(&format!("  Files scanned: {}\n", report.files_scanned));
    out.push_str(&format!(
        "  Files with errors: {}\n\n",
        report.files_with_errors
    ));

    if !report.aggregate.declared.is_empty() {
        out.push_str("  Declared permissions (explicit references):\n");
        for name in &report.aggregate.declared {
            push_name(&mut out, name);
        }
        out.push('\n');
    }

    if !report.aggregate.inferred.is_empty() {
        out.push_str("  Inferred permissions (method-call heuristics, best effort):\n");
        for name in &report.aggregate.inferred {
            push_name(&mut out, name);
        }
        out.push('\n');
    }

    if !report.aggregate.raw_values.is_empty() {
        out.push_str("  Raw permission integers:\n");
        for value in &report.aggregate.raw_values {
            out.push_str(&format!("    - {value} (0x{value:X})\n"));
        }
        out.push('\n');
    }

    if !report.warnings.is_empty() {
        out.push_str("  Warnings:\n");
        for warning in report.warnings.iter().take(MAX_WARNINGS_SHOWN) {
            out.push_str(&format!("    - {warning}\n"));
        }
        if report.warnings.len() > MAX_WARNINGS_SHOWN {
            out.push_str(&format!(
                "    ... and {} more\n",
                report.warnings.len() - MAX_WARNINGS_SHOWN
            ));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "  Permission integer: {} (0x{:X})\n\n",
        report.aggregate.bitmask, report.aggregate.bitmask
    ));

    out
}

fn push_name(out: &mut String, name: &str) {
    match table::bit_for(name) {
        Some(bit) => out.push_str(&format!("    - {name} (0x{bit:X})\n")),
        None => out.push_str(&format!("    - {name} (unknown)\n")),
    }
}
