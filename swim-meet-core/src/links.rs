//! Local history of published share links, kept as a JSON array on disk.

use std::path::{Path, PathBuf};

use crate::models::PublishedLink;

pub const LINKS_FILE_NAME: &str = "published_links.json";

#[derive(Debug)]
pub enum LinksError {
    Io(PathBuf, std::io::Error),
    Json(PathBuf, serde_json::Error),
}

impl std::fmt::Display for LinksError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinksError::Io(path, e) => {
                write!(f, "Failed to access link history '{}': {}", path.display(), e)
            }
            LinksError::Json(path, e) => {
                write!(f, "Link history '{}' is corrupt: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for LinksError {}

#[derive(Debug, Clone)]
pub struct PublishedLinks {
    path: PathBuf,
    links: Vec<PublishedLink>,
}

impl PublishedLinks {
    /// Loads the history at `path`; a missing file is an empty history.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LinksError> {
        let path = path.into();
        let links = if path.exists() {
            let contents =
                std::fs::read_to_string(&path).map_err(|e| LinksError::Io(path.clone(), e))?;
            if contents.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&contents).map_err(|e| LinksError::Json(path.clone(), e))?
            }
        } else {
            Vec::new()
        };
        Ok(Self { path, links })
    }

    /// History file inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Result<Self, LinksError> {
        Self::load(data_dir.join(LINKS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Newest first.
    pub fn list(&self) -> &[PublishedLink] {
        &self.links
    }

    /// Records `link` at the top, replacing an older entry for the same meet.
    pub fn add(&mut self, link: PublishedLink) -> Result<(), LinksError> {
        self.links.retain(|existing| existing.id != link.id);
        self.links.insert(0, link);
        self.save()
    }

    /// Removes the entry with `id`; returns whether one existed.
    pub fn remove(&mut self, id: &str) -> Result<bool, LinksError> {
        let before = self.links.len();
        self.links.retain(|link| link.id != id);
        if self.links.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    fn save(&self) -> Result<(), LinksError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| LinksError::Io(self.path.clone(), e))?;
        }
        let json = serde_json::to_string_pretty(&self.links)
            .map_err(|e| LinksError::Json(self.path.clone(), e))?;
        std::fs::write(&self.path, json).map_err(|e| LinksError::Io(self.path.clone(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    fn link(id: &str, url: &str) -> PublishedLink {
        PublishedLink {
            id: id.into(),
            meet_name: "Winter Classic".into(),
            created_at: Utc::now(),
            url: url.into(),
            events_count: 12,
            storage: None,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let links = PublishedLinks::in_dir(dir.path()).unwrap();
        assert!(links.list().is_empty());
    }

    #[test]
    fn test_add_replaces_and_orders_newest_first() {
        let dir = tempdir().unwrap();
        let mut links = PublishedLinks::in_dir(dir.path()).unwrap();
        links.add(link("a", "https://x/?shared=1")).unwrap();
        links.add(link("b", "https://x/?shared=2")).unwrap();
        links.add(link("a", "https://x/?shared=3")).unwrap();

        let reloaded = PublishedLinks::in_dir(dir.path()).unwrap();
        let ids: Vec<_> = reloaded.list().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(reloaded.list()[0].url, "https://x/?shared=3");
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let mut links = PublishedLinks::in_dir(dir.path()).unwrap();
        links.add(link("a", "u")).unwrap();
        assert!(links.remove("a").unwrap());
        assert!(!links.remove("a").unwrap());
        assert!(PublishedLinks::in_dir(dir.path()).unwrap().list().is_empty());
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(LINKS_FILE_NAME), "{not json").unwrap();
        assert!(matches!(
            PublishedLinks::in_dir(dir.path()),
            Err(LinksError::Json(..))
        ));
    }

    #[test]
    fn test_json_is_camel_case() {
        let json = serde_json::to_value(link("a", "u")).unwrap();
        assert_eq!(json["meetName"], "Winter Classic");
        assert_eq!(json["eventsCount"], 12);
        assert!(json.get("storage").is_none());
    }
}
