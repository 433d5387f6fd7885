use runcat_core::{AssetKey, Result, RunCatError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// ICO file header: reserved `0`, image type `1` (icon).
const ICO_MAGIC: [u8; 4] = [0, 0, 1, 0];

/// Raw `.ico` image data for one animation frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub key:   AssetKey,
    pub bytes: Arc<[u8]>,
}

impl Icon {
    /// Wrap `bytes`, rejecting anything that isn't an ICO image.
    pub fn from_bytes(key: AssetKey, bytes: Vec<u8>) -> Result<Self> {
        if !bytes.starts_with(&ICO_MAGIC) {
            return Err(RunCatError::System(format!(
                "'{}' is not an ICO image",
                key.file_stem()
            )));
        }
        Ok(Self { key, bytes: bytes.into() })
    }
}

/// Source of icon frames, keyed by `(theme, runner, frame)`.
pub trait IconStore: Send + Sync {
    /// Load one frame.  A missing frame is [`RunCatError::MissingAsset`].
    fn icon(&self, key: AssetKey) -> Result<Icon>;
}

/// Reads `<dir>/<theme>_<runner>_<frame>.ico`.
#[derive(Debug, Clone)]
pub struct DirIconStore {
    dir: PathBuf,
}

impl DirIconStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: AssetKey) -> PathBuf {
        self.dir.join(format!("{}.ico", key.file_stem()))
    }
}

impl IconStore for DirIconStore {
    fn icon(&self, key: AssetKey) -> Result<Icon> {
        let path = self.path_for(key);
        match std::fs::read(&path) {
            Ok(bytes) => Icon::from_bytes(key, bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RunCatError::MissingAsset(key))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, for embedding icons or for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIconStore {
    icons: HashMap<AssetKey, Icon>,
}

impl StaticIconStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, icon: Icon) {
        self.icons.insert(icon.key, icon);
    }
}

impl IconStore for StaticIconStore {
    fn icon(&self, key: AssetKey) -> Result<Icon> {
        self.icons
            .get(&key)
            .cloned()
            .ok_or(RunCatError::MissingAsset(key))
    }
}
