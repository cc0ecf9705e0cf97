//! Disk-backed storage for behavior graph nodes.
//!
//! Liveness checking on large models cannot keep every [`BehaviorGraphNode`]
//! in memory. `NodeFile` appends node records (see [`super::persist`]) to a
//! file and remembers, per [`NodeKey`], the offset of the latest record, so
//! nodes can be evicted after construction and paged back in for analysis.
//!
//! # File Format
//!
//! The file is a plain concatenation of node records with no header. Keys are
//! not stored on disk; the in-memory offset table is the only index.
//!
//! ```text
//! offset 0:        record for node A
//! offset len(A):   record for node B
//! ...
//! ```

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;

use crate::config::LivenessConfig;
use crate::error::{PersistError, PersistResult};

use super::graph_node::{BehaviorGraphNode, NodeKey};

/// Global counter for generating unique node file names.
/// Combined with process ID to ensure uniqueness across concurrent tests.
static NODE_FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Append-only node store keyed by [`NodeKey`].
///
/// # Thread Safety
///
/// This type is **not** thread-safe. Each worker should own its own
/// `NodeFile` or wrap it in external synchronization.
pub struct NodeFile {
    path: PathBuf,
    writer: BufWriter<File>,
    /// Opened on first read
    reader: Option<BufReader<File>>,
    /// Offset where the next record goes; the file holds nothing valid past it
    write_pos: u64,
    /// Set when a torn record could not be cut off the end of the file
    poisoned: bool,
    offsets: FxHashMap<NodeKey, u64>,
    /// Reused encode buffer
    scratch: Vec<u8>,
}

impl NodeFile {
    /// Create a new node file, overwriting if it exists.
    pub fn create<P: AsRef<Path>>(path: P) -> PersistResult<Self> {
        Self::with_config(path, &LivenessConfig::default())
    }

    pub fn with_config<P: AsRef<Path>>(path: P, config: &LivenessConfig) -> PersistResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        tracing::debug!(path = %path.display(), "created node file");

        Ok(NodeFile {
            path,
            writer: BufWriter::with_capacity(config.write_buffer_bytes, file),
            reader: None,
            write_pos: 0,
            poisoned: false,
            offsets: FxHashMap::default(),
            scratch: Vec::new(),
        })
    }

    /// Create a node file with a unique name in the system temp directory.
    pub fn create_temp() -> PersistResult<Self> {
        Self::create_temp_with(&LivenessConfig::default())
    }

    /// Create a node file with a unique name in `config`'s spill directory.
    pub fn create_temp_with(config: &LivenessConfig) -> PersistResult<Self> {
        let counter = NODE_FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let filename = format!("tla2_nodes_{}_{}.gn", std::process::id(), counter);
        Self::with_config(config.spill_dir().join(filename), config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `node`'s record and return its offset.
    ///
    /// A later write of the same key supersedes the earlier record. If the
    /// write fails, whatever part of the record reached the file is cut off
    /// again and the store is left as it was. When even that fails, every
    /// further write returns [`PersistError::Poisoned`].
    pub fn write_node(&mut self, node: &BehaviorGraphNode) -> PersistResult<u64> {
        if self.poisoned {
            return Err(PersistError::Poisoned {
                path: self.path.clone(),
            });
        }
        self.scratch.clear();
        node.write_to(&mut self.scratch)?;
        if let Err(err) = self.writer.write_all(&self.scratch) {
            self.discard_torn_record();
            return Err(err.into());
        }

        let loc = self.write_pos;
        self.write_pos += self.scratch.len() as u64;
        self.offsets.insert(node.key(), loc);
        Ok(loc)
    }

    /// Drop any bytes past `write_pos` left behind by a failed append.
    fn discard_torn_record(&mut self) {
        let write_pos = self.write_pos;
        let restored = self.writer.flush().and_then(|()| {
            let file = self.writer.get_mut();
            file.set_len(write_pos)?;
            file.seek(SeekFrom::Start(write_pos)).map(drop)
        });
        if let Err(err) = restored {
            tracing::warn!(
                path = %self.path.display(),
                offset = write_pos,
                error = %err,
                "could not roll back failed node write; node file poisoned"
            );
            self.poisoned = true;
        }
    }

    /// Page a node back in. Returns `None` for keys never written.
    pub fn read_node(&mut self, key: NodeKey) -> PersistResult<Option<BehaviorGraphNode>> {
        let Some(loc) = self.offsets.get(&key).copied() else {
            return Ok(None);
        };
        let reader = self.reader_at(loc)?;
        BehaviorGraphNode::read_new(key, reader).map(Some)
    }

    /// Like [`read_node`](Self::read_node), but a missing key is an error.
    pub fn require_node(&mut self, key: NodeKey) -> PersistResult<BehaviorGraphNode> {
        self.read_node(key)?.ok_or(PersistError::UnknownNode(key))
    }

    /// Reload `node`'s transitions and checks from its stored record.
    ///
    /// Returns `false`, leaving `node` untouched, if its key was never written.
    pub fn read_node_into(&mut self, node: &mut BehaviorGraphNode) -> PersistResult<bool> {
        let Some(loc) = self.offsets.get(&node.key()).copied() else {
            return Ok(false);
        };
        let reader = self.reader_at(loc)?;
        node.read_from(reader)?;
        Ok(true)
    }

    fn reader_at(&mut self, loc: u64) -> PersistResult<&mut BufReader<File>> {
        self.writer.flush()?;
        let reader = match self.reader.take() {
            Some(reader) => reader,
            None => BufReader::new(File::open(&self.path)?),
        };
        let reader = self.reader.insert(reader);
        reader.seek(SeekFrom::Start(loc))?;
        Ok(reader)
    }

    pub fn offset_of(&self, key: NodeKey) -> Option<u64> {
        self.offsets.get(&key).copied()
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.offsets.contains_key(&key)
    }

    /// Number of distinct nodes stored
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Total bytes appended so far
    pub fn bytes_written(&self) -> u64 {
        self.write_pos
    }

    /// Keys of all stored nodes, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.offsets.keys().copied()
    }

    /// Flush buffered records to disk.
    pub fn flush(&mut self) -> PersistResult<()> {
        self.writer.flush()?;
        tracing::debug!(
            path = %self.path.display(),
            nodes = self.offsets.len(),
            bytes = self.write_pos,
            "flushed node file"
        );
        Ok(())
    }
}

impl Drop for NodeFile {
    fn drop(&mut self) {
        // Best-effort flush on drop
        let _ = self.writer.flush();
    }
}
