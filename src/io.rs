use crate::config::*;
use crate::error::Result;
use crate::structs::{SavedStop, SavedTrip};

use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    marker::PhantomData,
    path::{Path, PathBuf},
};
use tokio::sync::Mutex;

//////////////////////////////////////////////////////////
// I/O
//////////////////////////////////////////////////////////
/// A JSON array kept in a single file. Not safe for concurrent writers.
pub struct JsonStore<T> {
    path: PathBuf,
    _item: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> JsonStore<T> {
    /// Opens the store, creating an empty array file if none exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            fs::write(&path, "[]")?;
        }
        Ok(JsonStore { path, _item: PhantomData })
    }

    pub fn read(&self) -> Result<Vec<T>> {
        let file = File::open(&self.path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn append(&self, item: T) -> Result<()> {
        let mut items = self.read()?;
        items.push(item);
        self.write(&items)
    }

    /// Replaces the item with the same key, or appends if there is none.
    pub fn upsert_by<K: PartialEq>(&self, item: T, key: impl Fn(&T) -> K) -> Result<()> {
        let mut items = self.read()?;
        let item_key = key(&item);
        match items.iter_mut().find(|x| key(&**x) == item_key) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        self.write(&items)
    }

    /// Writes next to the store, then renames over it, so readers never see
    /// a partial array.
    fn write(&self, items: &[T]) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer_pretty(&mut writer, items)?;
        writer.flush()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl<T> Clone for JsonStore<T> {
    fn clone(&self) -> Self {
        JsonStore {
            path: self.path.clone(),
            _item: PhantomData,
        }
    }
}

/// Stops and trips saved by users, written one at a time.
pub struct SavedSelections {
    stops: JsonStore<SavedStop>,
    trips: JsonStore<SavedTrip>,
    lock: Mutex<()>,
}

impl SavedSelections {
    pub fn open(data_dir: &Path) -> Result<Self> {
        Ok(SavedSelections {
            stops: JsonStore::open(data_dir.join(SAVED_STOPS_FILE))?,
            trips: JsonStore::open(data_dir.join(SAVED_TRIPS_FILE))?,
            lock: Mutex::new(()),
        })
    }

    pub async fn save_stop(&self, stop: SavedStop) -> Result<()> {
        let _guard = self.lock.lock().await;
        log::debug!("Saving stop {:?}", stop);
        let store = self.stops.clone();
        blocking(move || store.upsert_by(stop, |s| s.id.clone())).await
    }

    pub async fn save_trip(&self, trip: SavedTrip) -> Result<()> {
        let _guard = self.lock.lock().await;
        log::debug!("Saving trip {:?}", trip);
        let store = self.trips.clone();
        blocking(move || store.append(trip)).await
    }

    pub async fn stops(&self) -> Result<Vec<SavedStop>> {
        let _guard = self.lock.lock().await;
        let store = self.stops.clone();
        blocking(move || store.read()).await
    }

    pub async fn trips(&self) -> Result<Vec<SavedTrip>> {
        let _guard = self.lock.lock().await;
        let store = self.trips.clone();
        blocking(move || store.read()).await
    }
}

/// Runs file I/O off the async workers.
async fn blocking<R, F>(f: F) -> Result<R>
where
    F: FnOnce() -> Result<R> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}
