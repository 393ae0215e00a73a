use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Watches the known-users snapshot so the host can reload it when another
/// process rewrites it.
pub struct UsersWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<PathBuf>,
}

impl UsersWatcher {
    /// Start watching `users_path`. The parent directory is watched so that
    /// atomic replace-by-rename writes are seen too.
    pub fn start(users_path: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let target = users_path.to_path_buf();
        let dir = users_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else {
                    return;
                };
                if !matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) {
                    return;
                }
                if event.paths.iter().any(|p| p.file_name() == target.file_name()) {
                    let _ = tx.send(target.clone());
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(UsersWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking: true if the snapshot changed since the last call
    pub fn changed(&self) -> bool {
        let mut changed = false;
        while self.rx.try_recv().is_ok() {
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn reports_rewrites_of_the_users_file_only() {
        let tmp = tempfile::TempDir::new().unwrap();
        let users = tmp.path().join("users.json");
        std::fs::write(&users, "[]").unwrap();

        let watcher = UsersWatcher::start(&users).unwrap();
        assert!(!watcher.changed());

        std::fs::write(tmp.path().join("other.txt"), "x").unwrap();
        std::fs::write(&users, r#"[{"id": "u1"}]"#).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = false;
        while !seen && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
            seen = watcher.changed();
        }
        assert!(seen);
    }
}
