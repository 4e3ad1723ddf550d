//! Repository API service
//!
//! Reads repository info, recent commits and language sizes from the public
//! GitHub REST API. Loading runs off the event loop: a loader thread fans the
//! three calls out to their own threads, joins them, and sends one snapshot
//! back over a channel that the app polls on tick.

use crate::model::repo::{
    mock_commits, mock_info, mock_languages, CommitEntry, Languages, RepoInfo, RepoSnapshot,
};
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("card-showcase/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Read-only view of one repository
pub trait RepoApi: Send + Sync {
    fn repository(&self) -> Result<RepoInfo, FetchError>;
    fn commits(&self) -> Result<Vec<CommitEntry>, FetchError>;
    fn languages(&self) -> Result<Languages, FetchError>;
}

/// [`RepoApi`] over HTTP using a blocking `reqwest` client
pub struct HttpRepoApi {
    client: reqwest::blocking::Client,
    base: String,
}

impl HttpRepoApi {
    pub fn new(
        api_base: &str,
        owner: &str,
        repo: &str,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let base = format!("{}/repos/{}/{}", api_base.trim_end_matches('/'), owner, repo);
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                url: base.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { client, base })
    }

    fn get_json<T: DeserializeOwned>(&self, suffix: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base, suffix);
        tracing::debug!(%url, "repository request");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response.json::<T>().map_err(|e| FetchError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

impl RepoApi for HttpRepoApi {
    fn repository(&self) -> Result<RepoInfo, FetchError> {
        self.get_json("")
    }

    fn commits(&self) -> Result<Vec<CommitEntry>, FetchError> {
        self.get_json("/commits?per_page=5")
    }

    fn languages(&self) -> Result<Languages, FetchError> {
        self.get_json("/languages")
    }
}

/// Run the three calls concurrently; each failed call is replaced by its mock
///
/// Returns `None` only when a request thread died, which the panel shows as a
/// load failure.
pub fn load_snapshot(api: Arc<dyn RepoApi>) -> Option<RepoSnapshot> {
    let info_api = Arc::clone(&api);
    let commits_api = Arc::clone(&api);
    let languages_api = api;

    let info = thread::spawn(move || info_api.repository());
    let commits = thread::spawn(move || commits_api.commits());
    let languages = thread::spawn(move || languages_api.languages());

    let info = info.join().ok()?;
    let commits = commits.join().ok()?;
    let languages = languages.join().ok()?;

    let now = Utc::now();
    Some(RepoSnapshot {
        info: info.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "repository info unavailable, using mock data");
            mock_info(now)
        }),
        commits: commits.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "commits unavailable, using mock data");
            mock_commits(now)
        }),
        languages: languages.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "languages unavailable, using mock data");
            mock_languages()
        }),
    })
}

/// Outcome of a finished load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(RepoSnapshot),
    Failed,
}

/// Handle on one in-flight repository load
pub struct RepoLoader {
    receiver: Receiver<Option<RepoSnapshot>>,
}

impl RepoLoader {
    pub fn spawn(api: Arc<dyn RepoApi>) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let snapshot = load_snapshot(api);
            let _ = tx.send(snapshot);
        });
        Self { receiver: rx }
    }

    /// Check for a result without blocking; `None` while still loading
    pub fn poll(&self) -> Option<LoadOutcome> {
        match self.receiver.try_recv() {
            Ok(Some(snapshot)) => Some(LoadOutcome::Loaded(snapshot)),
            Ok(None) => Some(LoadOutcome::Failed),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(LoadOutcome::Failed),
        }
    }

    /// Block until the load finishes
    pub fn wait(self) -> LoadOutcome {
        match self.receiver.recv() {
            Ok(Some(snapshot)) => LoadOutcome::Loaded(snapshot),
            _ => LoadOutcome::Failed,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::repo::FALLBACK_DESCRIPTION;

    /// API whose calls all fail, or all succeed with fixed data
    pub(crate) struct FakeApi {
        pub fail: bool,
        pub stars: u64,
    }

    impl RepoApi for FakeApi {
        fn repository(&self) -> Result<RepoInfo, FetchError> {
            if self.fail {
                return Err(FetchError::Status {
                    url: "fake".into(),
                    status: 500,
                });
            }
            Ok(RepoInfo {
                description: Some("Live data".into()),
                stargazers_count: self.stars,
                forks_count: 1,
                open_issues_count: 0,
                updated_at: None,
                language: Some("Rust".into()),
            })
        }

        fn commits(&self) -> Result<Vec<CommitEntry>, FetchError> {
            if self.fail {
                return Err(FetchError::Transport {
                    url: "fake".into(),
                    message: "connection refused".into(),
                });
            }
            Ok(Vec::new())
        }

        fn languages(&self) -> Result<Languages, FetchError> {
            if self.fail {
                return Err(FetchError::Decode {
                    url: "fake".into(),
                    message: "eof".into(),
                });
            }
            Ok(Languages::from([("Rust".to_string(), 10)]))
        }
    }

    struct PanickingApi;

    impl RepoApi for PanickingApi {
        fn repository(&self) -> Result<RepoInfo, FetchError> {
            panic!("boom")
        }
        fn commits(&self) -> Result<Vec<CommitEntry>, FetchError> {
            Ok(Vec::new())
        }
        fn languages(&self) -> Result<Languages, FetchError> {
            Ok(Languages::new())
        }
    }

    #[test]
    fn test_failed_calls_fall_back_to_mock_data() {
        let snapshot = load_snapshot(Arc::new(FakeApi {
            fail: true,
            stars: 0,
        }))
        .unwrap();
        assert_eq!(snapshot.info.description.as_deref(), Some(FALLBACK_DESCRIPTION));
        assert_eq!(snapshot.info.stargazers_count, 42);
        assert_eq!(snapshot.commits.len(), 3);
        assert_eq!(snapshot.commits[0].sha, "abc1234");
        assert_eq!(snapshot.languages, mock_languages());
    }

    #[test]
    fn test_successful_calls_are_kept() {
        let snapshot = load_snapshot(Arc::new(FakeApi {
            fail: false,
            stars: 7,
        }))
        .unwrap();
        assert_eq!(snapshot.info.stargazers_count, 7);
        assert!(snapshot.commits.is_empty());
        assert_eq!(snapshot.languages.get("Rust"), Some(&10));
    }

    #[test]
    fn test_loader_delivers_over_channel() {
        let loader = RepoLoader::spawn(Arc::new(FakeApi {
            fail: true,
            stars: 0,
        }));
        match loader.wait() {
            LoadOutcome::Loaded(snapshot) => assert_eq!(snapshot.info.forks_count, 8),
            LoadOutcome::Failed => panic!("expected a snapshot"),
        }
    }

    #[test]
    fn test_panicking_request_is_a_failure() {
        let loader = RepoLoader::spawn(Arc::new(PanickingApi));
        assert_eq!(loader.wait(), LoadOutcome::Failed);
    }

    #[test]
    fn test_http_api_builds_endpoint_base() {
        let api = HttpRepoApi::new(
            "https://api.github.com/",
            "SyntaxSidekick",
            "modern-card-collection",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            api.base,
            "https://api.github.com/repos/SyntaxSidekick/modern-card-collection"
        );
    }
}
