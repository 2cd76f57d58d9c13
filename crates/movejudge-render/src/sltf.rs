//! Transfer function lookup.
//!
//! Measured transfer functions live in a per-subject directory as
//! `<subject>/SLTF/SLTF_<angle>_<channel>.<ext>`, one file per azimuth and ear.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use movejudge_dxx::FileFormat;

use crate::error::{RenderError, RenderResult};
use crate::trajectory::{Angle, Channel};

/// Anything that can hand out the transfer function for an angle and ear.
pub trait TransferFunctionSource {
    /// Loads the impulse response measured at `angle` for `channel`.
    fn load(&self, angle: Angle, channel: Channel) -> RenderResult<Arc<[f64]>>;
}

impl<S: TransferFunctionSource + ?Sized> TransferFunctionSource for &S {
    fn load(&self, angle: Angle, channel: Channel) -> RenderResult<Arc<[f64]>> {
        (**self).load(angle, channel)
    }
}

/// Transfer functions stored as files under a subject directory.
#[derive(Debug, Clone)]
pub struct SltfDirectory {
    subject: PathBuf,
    format: FileFormat,
}

impl SltfDirectory {
    /// Opens the database of `subject`, whose files use `format`.
    pub fn new(subject: impl Into<PathBuf>, format: FileFormat) -> Self {
        Self {
            subject: subject.into(),
            format,
        }
    }

    /// Subject directory.
    pub fn subject(&self) -> &Path {
        &self.subject
    }

    /// File holding the transfer function for `angle` and `channel`.
    pub fn path(&self, angle: Angle, channel: Channel) -> PathBuf {
        self.subject.join("SLTF").join(format!(
            "SLTF_{}_{}.{}",
            angle,
            channel,
            self.format.extension()
        ))
    }
}

impl TransferFunctionSource for SltfDirectory {
    fn load(&self, angle: Angle, channel: Channel) -> RenderResult<Arc<[f64]>> {
        let path = self.path(angle, channel);
        match movejudge_dxx::read(&path) {
            Ok(samples) => Ok(samples.into()),
            Err(source) => Err(RenderError::TransferFunction {
                angle,
                channel,
                path,
                source,
            }),
        }
    }
}

/// Memoizing wrapper shared by concurrent renders.
///
/// The lock only guards the map; loads from the inner source run unlocked, so
/// two threads missing the same key may both read it and the first insert
/// wins. Failed loads are not cached.
pub struct CachedSource<S> {
    inner: S,
    cache: Mutex<HashMap<(Angle, Channel), Arc<[f64]>>>,
}

impl<S: TransferFunctionSource> CachedSource<S> {
    /// Wraps `inner` with an empty cache.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached transfer functions.
    pub fn cached_len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// The wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: TransferFunctionSource> TransferFunctionSource for CachedSource<S> {
    fn load(&self, angle: Angle, channel: Channel) -> RenderResult<Arc<[f64]>> {
        let key = (angle, channel);
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(hit));
        }

        let loaded = self.inner.load(angle, channel)?;
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(key).or_insert(loaded)))
    }
}
