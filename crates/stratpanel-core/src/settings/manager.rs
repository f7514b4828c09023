use anyhow::{Context, Result};
use dashmap::DashMap;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs,
    path::Path,
    sync::Arc,
    time::Duration,
};
use tokio::{
    sync::{mpsc, oneshot},
    time,
};

use super::GROUP_SEPARATOR;

/// Interval at which pending changes are written to disk.
const SAVE_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Clone)]
pub struct SettingsHandle {
    inner: SettingsHandleInner,
    prefix: String,
}

#[derive(Clone)]
enum SettingsHandleInner {
    Fs(FsStorageHandle),
    InMemory(InMemoryStore),
}

impl SettingsHandle {
    pub fn open_in_memory() -> Self {
        Self {
            inner: SettingsHandleInner::InMemory(InMemoryStore::new()),
            prefix: String::new(),
        }
    }

    /// Opens a JSON settings file, creating it on the first save.
    ///
    /// A file that cannot be parsed is logged and treated as empty, it will be
    /// overwritten on the next save. Changes are written by a background task,
    /// so this must be called from within a tokio runtime.
    pub fn open_file(path: &Path) -> Result<Self> {
        Ok(Self {
            inner: SettingsHandleInner::Fs(FsStorageHandle::open_file(path)?),
            prefix: String::new(),
        })
    }

    /// A handle scoped to the sub-group `name` of this handle's group.
    pub fn group(&self, name: &str) -> SettingsHandle {
        Self {
            inner: self.inner.clone(),
            prefix: self.key(name),
        }
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.values().get(&self.key(key))?.value() {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values().get(&self.key(key))?.value() {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn get_string_list(&self, key: &str) -> Option<Vec<String>> {
        match self.values().get(&self.key(key))?.value() {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_owned))
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values().contains_key(&self.key(key))
    }

    pub fn set_string(&self, key: &str, value: &str) {
        self.set(key, Value::String(value.to_owned()));
    }

    pub fn set_bool(&self, key: &str, value: bool) {
        self.set(key, Value::Bool(value));
    }

    pub fn set_string_list(&self, key: &str, value: &[String]) {
        self.set(
            key,
            Value::Array(value.iter().cloned().map(Value::String).collect()),
        );
    }

    /// Removes `key` and everything stored below it.
    pub fn remove(&self, key: &str) {
        let key = self.key(key);
        let nested = format!("{}{}", key, GROUP_SEPARATOR);
        self.values()
            .retain(|stored, _| stored != &key && !stored.starts_with(&nested));
        self.mark_dirty();
    }

    /// Writes pending changes to disk and waits until they are stored.
    ///
    /// Does nothing for in-memory settings.
    pub async fn flush(&self) -> Result<()> {
        match &self.inner {
            SettingsHandleInner::Fs(fs) => fs.flush().await,
            SettingsHandleInner::InMemory(_) => Ok(()),
        }
    }

    fn set(&self, key: &str, value: Value) {
        self.values().insert(self.key(key), value);
        self.mark_dirty();
    }

    fn key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_owned()
        } else {
            format!("{}{}{}", self.prefix, GROUP_SEPARATOR, key)
        }
    }

    fn values(&self) -> &DashMap<String, Value> {
        match &self.inner {
            SettingsHandleInner::Fs(fs) => &fs.values,
            SettingsHandleInner::InMemory(im) => &im.values,
        }
    }

    fn mark_dirty(&self) {
        if let SettingsHandleInner::Fs(fs) = &self.inner {
            fs.mark_dirty();
        }
    }
}

enum WriterMsg {
    Dirty,
    Flush(oneshot::Sender<Result<()>>),
}

#[derive(Clone)]
struct FsStorageHandle {
    values: Arc<DashMap<String, Value>>,
    save_queue: mpsc::UnboundedSender<WriterMsg>,
}

impl FsStorageHandle {
    fn open_file(path: &Path) -> Result<Self> {
        let values = Arc::new(DashMap::new());
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, Value>>(&contents) {
                Ok(loaded) => {
                    for (key, value) in loaded {
                        values.insert(key, value);
                    }
                }
                Err(err) => {
                    log::warn!(
                        "Failed to parse settings file {}, starting empty: {}",
                        path.display(),
                        err
                    );
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read settings file {}", path.display()))
            }
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let path = path.to_path_buf();
        let task_values = Arc::clone(&values);
        tokio::spawn(async move {
            let mut dirty = false;
            let mut save_timer = time::interval(SAVE_INTERVAL);

            loop {
                tokio::select! {
                    msg = rx.recv() => match msg {
                        Some(WriterMsg::Dirty) => dirty = true,
                        Some(WriterMsg::Flush(reply)) => {
                            let result = write_settings(&path, &task_values);
                            dirty = false;
                            let _ = reply.send(result);
                        }
                        None => {
                            // All handles dropped
                            if dirty {
                                if let Err(err) = write_settings(&path, &task_values) {
                                    log::error!("Failed to save settings: {}", err);
                                }
                            }
                            break;
                        }
                    },
                    _ = save_timer.tick() => {
                        if dirty {
                            dirty = false;
                            if let Err(err) = write_settings(&path, &task_values) {
                                log::error!("Failed to save settings: {}", err);
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            values,
            save_queue: tx,
        })
    }

    fn mark_dirty(&self) {
        let _ = self.save_queue.send(WriterMsg::Dirty);
    }

    async fn flush(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.save_queue
            .send(WriterMsg::Flush(reply_tx))
            .map_err(|_| anyhow::anyhow!("Settings writer stopped"))?;
        reply_rx
            .await
            .context("Settings writer dropped the flush request")?
    }
}

fn write_settings(path: &Path, values: &DashMap<String, Value>) -> Result<()> {
    let snapshot: BTreeMap<String, Value> = values
        .iter()
        .map(|entry| (entry.key().clone(), entry.value().clone()))
        .collect();
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create settings directory {}", dir.display()))?;
    }
    let contents = serde_json::to_string_pretty(&snapshot)?;
    fs::write(path, contents)
        .with_context(|| format!("Failed to write settings file {}", path.display()))?;
    Ok(())
}

#[derive(Clone, Default)]
struct InMemoryStore {
    values: Arc<DashMap<String, Value>>,
}

impl InMemoryStore {
    fn new() -> Self {
        Self::default()
    }
}
