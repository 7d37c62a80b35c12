use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
};

use crate::domain::repositories::audit::AuditSink;

/// Appends notes to a file, mirroring them to the log.
pub struct FileAudit {
    file: File,
}

impl FileAudit {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl AuditSink for FileAudit {
    fn note(&mut self, lines: &[&str]) -> io::Result<()> {
        mirror(lines);

        let mut text = lines.join("\n");
        text.push('\n');
        self.file.write_all(text.as_bytes())?;
        self.file.flush()
    }
}

/// Used when no note file is configured.
pub struct LogAudit;

impl AuditSink for LogAudit {
    fn note(&mut self, lines: &[&str]) -> io::Result<()> {
        mirror(lines);
        Ok(())
    }
}

fn mirror(lines: &[&str]) {
    for line in lines.iter().filter(|line| !line.is_empty()) {
        info!("{line}");
    }
}
