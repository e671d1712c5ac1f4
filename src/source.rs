use std::env;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::debug;
use rand::{distributions::Alphanumeric, Rng};

/// Random-access octet stream backing a capture engine.
///
/// Wraps a plain file with positional reads, endian-aware integer decoding
/// and an optional scratch mode: a scratch source lives in the system temp
/// directory under a random name and is unlinked when dropped.
pub struct ByteSource {
    file: File,
    path: PathBuf,
    length: u64,
    scratch: bool,
}

impl ByteSource {
    /// Open an existing file, read-only or read-write.
    pub fn open<P: AsRef<Path>>(path: P, read_only: bool) -> io::Result<ByteSource> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(!read_only)
            .open(path)?;
        let length = file.metadata()?.len();
        Ok(ByteSource {
            file,
            path: path.to_path_buf(),
            length,
            scratch: false,
        })
    }

    /// Create a read-write scratch file in the system temp directory.
    ///
    /// The file name is 16 random alphanumeric characters followed by
    /// `suffix`. The file is unlinked when the source is dropped.
    pub fn scratch(suffix: &str) -> io::Result<ByteSource> {
        let name: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        let path = env::temp_dir().join(format!("{}{}", name, suffix));
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;
        debug!("created scratch file {}", path.display());
        Ok(ByteSource {
            file,
            path,
            length: 0,
            scratch: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total length of the underlying file, in bytes
    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Current read/write position
    pub fn tell(&mut self) -> io::Result<u64> {
        self.file.seek(SeekFrom::Current(0))
    }

    /// Seek to an absolute position
    pub fn seek_to(&mut self, pos: u64) -> io::Result<u64> {
        self.file.seek(SeekFrom::Start(pos))
    }

    /// Seek forward, relative to the current position
    pub fn skip(&mut self, count: u64) -> io::Result<u64> {
        self.file.seek(SeekFrom::Current(count as i64))
    }

    pub fn rewind(&mut self) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(0)).map(|_| ())
    }

    /// True if the current position is at (or past) the end of the file
    pub fn at_end(&mut self) -> io::Result<bool> {
        Ok(self.tell()? >= self.length)
    }

    /// Read exactly `buf.len()` bytes, then restore the read position.
    pub fn peek(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let pos = self.tell()?;
        let res = self.file.read_exact(buf);
        self.seek_to(pos)?;
        res
    }

    /// Read exactly `len` bytes into a fresh buffer.
    pub fn read_vec(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn read_u16(&mut self, big_endian: bool) -> io::Result<u16> {
        let mut buf = [0u8; 2];
        self.file.read_exact(&mut buf)?;
        Ok(if big_endian {
            u16::from_be_bytes(buf)
        } else {
            u16::from_le_bytes(buf)
        })
    }

    pub fn read_u32(&mut self, big_endian: bool) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.file.read_exact(&mut buf)?;
        Ok(if big_endian {
            u32::from_be_bytes(buf)
        } else {
            u32::from_le_bytes(buf)
        })
    }

    pub fn read_u64(&mut self, big_endian: bool) -> io::Result<u64> {
        let mut buf = [0u8; 8];
        self.file.read_exact(&mut buf)?;
        Ok(if big_endian {
            u64::from_be_bytes(buf)
        } else {
            u64::from_le_bytes(buf)
        })
    }

    /// Append or overwrite bytes at the current position.
    pub fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)?;
        let pos = self.tell()?;
        if pos > self.length {
            self.length = pos;
        }
        Ok(())
    }

    /// Truncate the file to `len` bytes.
    pub fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.file.set_len(len)?;
        self.length = len;
        self.seek_to(len).map(|_| ())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }

    pub(crate) fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }
}

impl Drop for ByteSource {
    fn drop(&mut self) {
        if self.scratch {
            // best effort; the OS temp cleaner is the backstop
            let _ = fs::remove_file(&self.path);
        }
    }
}
