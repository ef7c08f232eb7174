//! Rotating file writer
//!
//! Rolls the active file over to numbered backups (`app.log.1`,
//! `app.log.2`, ...) when it would grow past a size limit, keeps a bounded
//! number of backups, removes backups older than a maximum age and can gzip
//! rotated files.

use crate::core::error::{LoggerError, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const MEGABYTE: u64 = 1024 * 1024;
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Thresholds for a [`RotatingFileWriter`]
///
/// # Examples
///
/// ```
/// use rust_log_pipeline::writers::RotationLimits;
///
/// let limits = RotationLimits::new()
///     .with_max_size_mb(5)
///     .with_max_backups(4)
///     .with_max_age_days(7)
///     .with_compression(true);
/// assert_eq!(limits.max_bytes, 5 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RotationLimits {
    /// Rotate before the active file would exceed this many bytes
    pub max_bytes: u64,
    /// Maximum number of rotated files to keep
    pub max_backups: usize,
    /// Rotated files older than this are removed
    pub max_age: Option<Duration>,
    /// Whether to gzip rotated files
    pub compress: bool,
}

impl Default for RotationLimits {
    fn default() -> Self {
        Self {
            max_bytes: 5 * MEGABYTE,
            max_backups: 4,
            max_age: Some(7 * DAY),
            compress: false,
        }
    }
}

impl RotationLimits {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_mb(mut self, megabytes: u64) -> Self {
        self.max_bytes = megabytes.saturating_mul(MEGABYTE);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(mut self, days: u64) -> Self {
        self.max_age = Some(DAY.saturating_mul(days.min(u64::from(u32::MAX)) as u32));
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// Size/count/age bounded file writer
///
/// # Examples
///
/// ```no_run
/// use rust_log_pipeline::writers::{RotatingFileWriter, RotationLimits};
/// use std::io::Write;
///
/// let mut writer = RotatingFileWriter::new("/var/log/app.log", RotationLimits::new()).unwrap();
/// writeln!(writer, "level=INFO msg=started").unwrap();
/// ```
pub struct RotatingFileWriter {
    base_path: PathBuf,
    limits: RotationLimits,
    file: Option<File>,
    current_size: u64,
    /// Consecutive failures to delete expired backups (reset on success)
    deletion_failure_count: usize,
}

impl RotatingFileWriter {
    /// Open (or create) the active file in append mode
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or opened
    pub fn new<P: AsRef<Path>>(path: P, limits: RotationLimits) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        let (file, current_size) = Self::open_active(&base_path)?;

        Ok(Self {
            base_path,
            limits,
            file: Some(file),
            current_size,
            deletion_failure_count: 0,
        })
    }

    fn open_active(path: &Path) -> Result<(File, u64)> {
        let file = super::file::append_options().open(path).map_err(|e| {
            LoggerError::io_operation(
                "opening log file",
                format!("Failed to open '{}'", path.display()),
                e,
            )
        })?;
        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("Cannot access metadata of '{}'", path.display()),
                    e,
                )
            })?
            .len();
        Ok((file, size))
    }

    /// Roll the active file over to `.1` and start a fresh one
    pub fn rotate(&mut self) -> Result<()> {
        // Release the handle before renaming
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(|e| {
                LoggerError::io_operation(
                    "rotating log file",
                    format!("Failed to flush '{}' before rotation", self.base_path.display()),
                    e,
                )
            })?;
        }

        if self.limits.max_backups == 0 {
            if self.base_path.exists() {
                fs::remove_file(&self.base_path).map_err(|e| {
                    LoggerError::io_operation(
                        "rotating log file",
                        format!("Failed to remove '{}'", self.base_path.display()),
                        e,
                    )
                })?;
            }
        } else {
            self.shift_backups()?;

            let first = self.backup_path(1);
            if self.base_path.exists() {
                fs::rename(&self.base_path, &first).map_err(|e| {
                    LoggerError::io_operation(
                        "rotating log file",
                        format!("Failed to move '{}' aside", self.base_path.display()),
                        e,
                    )
                })?;
                if self.limits.compress {
                    compress_file(&first)?;
                }
            }
        }

        let (file, size) = Self::open_active(&self.base_path)?;
        self.file = Some(file);
        self.current_size = size;

        self.remove_expired_backups();
        Ok(())
    }

    /// Drop the oldest backup and move `.i` to `.i+1`
    fn shift_backups(&self) -> Result<()> {
        let max = self.limits.max_backups;
        for oldest in [self.backup_path(max), gz_path(&self.backup_path(max))] {
            if oldest.exists() {
                if let Err(e) = fs::remove_file(&oldest) {
                    eprintln!(
                        "[WARN] Failed to remove oldest backup {}: {}",
                        oldest.display(),
                        e
                    );
                }
            }
        }

        for i in (1..max).rev() {
            for (from, to) in [
                (self.backup_path(i), self.backup_path(i + 1)),
                (gz_path(&self.backup_path(i)), gz_path(&self.backup_path(i + 1))),
            ] {
                if from.exists() {
                    fs::rename(&from, &to).map_err(|e| {
                        LoggerError::io_operation(
                            "rotating log file",
                            format!("Failed to rotate backup '{}'", from.display()),
                            e,
                        )
                    })?;
                }
            }
        }
        Ok(())
    }

    fn remove_expired_backups(&mut self) {
        let Some(max_age) = self.limits.max_age else {
            return;
        };
        let now = SystemTime::now();
        let mut failed = false;

        for path in self.backups() {
            let expired = fs::metadata(&path)
                .and_then(|m| m.modified())
                .map(|modified| now.duration_since(modified).unwrap_or(Duration::ZERO) > max_age)
                .unwrap_or(false);
            if expired {
                if let Err(e) = fs::remove_file(&path) {
                    failed = true;
                    eprintln!(
                        "[WARN] Failed to remove expired backup {}: {} (failure #{})",
                        path.display(),
                        e,
                        self.deletion_failure_count + 1
                    );
                }
            }
        }

        if failed {
            self.deletion_failure_count += 1;
        } else {
            self.deletion_failure_count = 0;
        }
    }

    /// Existing backup files, newest first
    pub fn backups(&self) -> Vec<PathBuf> {
        (1..=self.limits.max_backups)
            .flat_map(|i| {
                let plain = self.backup_path(i);
                let gz = gz_path(&plain);
                [plain, gz]
            })
            .filter(|p| p.exists())
            .collect()
    }

    /// Get backup file path for given index
    fn backup_path(&self, index: usize) -> PathBuf {
        let mut path = self.base_path.clone();
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log")
            .to_string();
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    /// Get current file size
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn limits(&self) -> &RotationLimits {
        &self.limits
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let incoming = buf.len() as u64;
        if self.current_size > 0 && self.current_size + incoming > self.limits.max_bytes {
            if let Err(e) = self.rotate() {
                // Keep logging into the current file rather than losing records
                eprintln!("[WARN] Log rotation failed: {}. Continuing with current file.", e);
                if self.file.is_none() {
                    let (file, size) = Self::open_active(&self.base_path)
                        .map_err(|reopen| io::Error::other(reopen.to_string()))?;
                    self.file = Some(file);
                    self.current_size = size;
                }
                // Avoid retrying on every write; the file may exceed the limit
                self.current_size = 0;
            }
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file not open"))?;
        let written = file.write(buf)?;
        self.current_size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for RotatingFileWriter {
    fn drop(&mut self) {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

/// Gzip `path` into `path.gz`, removing the original only after the
/// compressed copy is complete.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, BufWriter};

    let gz = gz_path(path);
    let mut tmp = gz.clone().into_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let compress = || -> io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&tmp)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
        io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::rename(&tmp, &gz)
    };

    compress().map_err(|e| {
        let _ = fs::remove_file(&tmp);
        LoggerError::io_operation(
            "compressing log file",
            format!("Failed to compress '{}'", path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[WARN] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn test_limits_builder() {
        let limits = RotationLimits::new()
            .with_max_bytes(1024)
            .with_max_backups(3)
            .with_max_age_days(2)
            .with_compression(true);

        assert_eq!(limits.max_bytes, 1024);
        assert_eq!(limits.max_backups, 3);
        assert_eq!(limits.max_age, Some(Duration::from_secs(2 * 24 * 60 * 60)));
        assert!(limits.compress);
    }

    #[test]
    fn test_writer_creation_keeps_existing_size() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("test.log");
        fs::write(&log_path, "existing\n").unwrap();

        let writer = RotatingFileWriter::new(&log_path, RotationLimits::new()).unwrap();
        assert_eq!(writer.path(), log_path);
        assert_eq!(writer.current_size(), 9);
    }

    #[test]
    fn test_size_based_rotation() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("rotation.log");

        let limits = RotationLimits::new().with_max_bytes(100).with_max_backups(3);
        let mut writer = RotatingFileWriter::new(&log_path, limits).unwrap();

        for i in 0..20 {
            writeln!(writer, "Test message number {}", i).unwrap();
        }
        writer.flush().unwrap();

        assert!(dir.path().join("rotation.log.1").exists());
        assert!(fs::metadata(&log_path).unwrap().len() <= 100);
    }

    #[test]
    fn test_backup_count_is_bounded() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("multi.log");

        let limits = RotationLimits::new().with_max_bytes(50).with_max_backups(2);
        let mut writer = RotatingFileWriter::new(&log_path, limits).unwrap();

        for i in 0..100 {
            writeln!(writer, "Entry {}", i).unwrap();
        }
        writer.flush().unwrap();

        let log_files = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_str().unwrap().starts_with("multi.log"))
            .count();
        assert_eq!(log_files, 3); // current + 2 backups
        assert_eq!(writer.backups().len(), 2);
    }

    #[test]
    fn test_forced_rotation() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("forced.log");

        let mut writer = RotatingFileWriter::new(&log_path, RotationLimits::new()).unwrap();
        writeln!(writer, "before").unwrap();
        writer.rotate().unwrap();
        writeln!(writer, "after").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "after\n");
        assert_eq!(
            fs::read_to_string(dir.path().join("forced.log.1")).unwrap(),
            "before\n"
        );
    }

    #[test]
    fn test_compressed_backups() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("zipped.log");

        let limits = RotationLimits::new().with_compression(true);
        let mut writer = RotatingFileWriter::new(&log_path, limits).unwrap();
        writeln!(writer, "compress me").unwrap();
        writer.rotate().unwrap();

        let gz = dir.path().join("zipped.log.1.gz");
        assert!(gz.exists());
        assert!(!dir.path().join("zipped.log.1").exists());

        let mut decoder = flate2::read::GzDecoder::new(File::open(gz).unwrap());
        let mut content = String::new();
        decoder.read_to_string(&mut content).unwrap();
        assert_eq!(content, "compress me\n");
    }

    #[test]
    fn test_expired_backups_removed() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("aged.log");

        let limits = RotationLimits::new().with_max_age(Duration::from_millis(50));
        let mut writer = RotatingFileWriter::new(&log_path, limits).unwrap();
        writeln!(writer, "old").unwrap();
        writer.rotate().unwrap();
        assert!(dir.path().join("aged.log.1").exists());

        std::thread::sleep(Duration::from_millis(120));
        writeln!(writer, "new").unwrap();
        writer.rotate().unwrap();

        // The fresh backup survives, the expired one is gone
        assert!(dir.path().join("aged.log.1").exists());
        assert!(!dir.path().join("aged.log.2").exists());
    }
}
