use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Append-only log file that is rotated once it would grow past `max_bytes`.
///
/// On rotation `app.log` becomes `app.log.1`, `app.log.1` becomes `app.log.2` and so
/// on; at most `backups` old files are kept. With no backups the file is truncated.
/// A single write larger than `max_bytes` still lands in one file.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    file: Option<fs_err::File>,
    len: u64,
}

impl RotatingFile {
    pub fn open(path: &Path, max_bytes: u64, backups: usize) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent)?;
        }

        let file = open_append(path)?;
        let len = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            max_bytes,
            backups,
            file: Some(file),
            len,
        })
    }

    fn rotate(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }

        if self.backups == 0 {
            fs_err::remove_file(&self.path)?;
        } else {
            for index in (1..self.backups).rev() {
                let from = backup_path(&self.path, index);
                if from.exists() {
                    fs_err::rename(&from, backup_path(&self.path, index + 1))?;
                }
            }
            fs_err::rename(&self.path, backup_path(&self.path, 1))?;
        }

        self.file = Some(open_append(&self.path)?);
        self.len = 0;
        Ok(())
    }

    fn file(&mut self) -> io::Result<&mut fs_err::File> {
        if self.file.is_none() {
            let file = open_append(&self.path)?;
            self.len = file.metadata()?.len();
            self.file = Some(file);
        }
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file is not open"))
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.len > 0 && self.len + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }

        let written = self.file()?.write(buf)?;
        self.len += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn open_append(path: &Path) -> io::Result<fs_err::File> {
    fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}

/// `app.log` -> `app.log.<index>`
fn backup_path(path: &Path, index: usize) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{}", index));
    PathBuf::from(name)
}
