use std::io::Write;

use crate::report::Report;

/// Pretty-printed JSON of a report, for piping into other tools.
pub fn write_json<W: Write>(report: &Report, out: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(out, report)
}
