/// Append-only progress notes for a run.
pub trait AuditSink: Send {
    /// Writes `lines` followed by a line break, so an empty slice leaves a
    /// blank line.
    fn note(&mut self, lines: &[&str]) -> std::io::Result<()>;
}
