use std::{fmt::Display, ops::Deref, time::Duration};

use chrono::{DateTime, Utc};

use super::StdResult;

/// The identifier of a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepositoryId(pub u64);

impl Deref for RepositoryId {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for RepositoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(pub String);

impl Deref for RepositoryName {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for RepositoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The number of stars a repository has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarsCounter(pub u32);

impl Deref for StarsCounter {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for StarsCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The number of forks a repository has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForksCounter(pub u32);

impl Deref for ForksCounter {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ForksCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A repository returned by the GitHub search.
///
/// Only the identifier and the name are guaranteed to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    id: RepositoryId,
    name: RepositoryName,
    full_name: Option<String>,
    description: Option<String>,
    url: Option<String>,
    stars: Option<StarsCounter>,
    forks: Option<ForksCounter>,
    language: Option<String>,
}

impl Repository {
    /// Creates a new `Repository` with only its identity set.
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id: RepositoryId(id),
            name: RepositoryName(name.to_string()),
            full_name: None,
            description: None,
            url: None,
            stars: None,
            forks: None,
            language: None,
        }
    }

    /// Sets the `owner/name` full name.
    pub fn with_full_name(mut self, full_name: Option<String>) -> Self {
        self.full_name = full_name;
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Sets the browser URL.
    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    /// Sets the stars and forks counters.
    pub fn with_counters(mut self, stars: Option<u32>, forks: Option<u32>) -> Self {
        self.stars = stars.map(StarsCounter);
        self.forks = forks.map(ForksCounter);
        self
    }

    /// Sets the primary language.
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn id(&self) -> RepositoryId {
        self.id
    }

    pub fn name(&self) -> &RepositoryName {
        &self.name
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn stars(&self) -> Option<StarsCounter> {
        self.stars
    }

    pub fn forks(&self) -> Option<ForksCounter> {
        self.forks
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Creates a dummy `Repository` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy(id: u64) -> Self {
        Self::new(id, &format!("repository-{id}"))
            .with_full_name(Some(format!("org-1/repository-{id}")))
            .with_counters(Some(10), Some(1))
    }
}

impl Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repository: {} ({}), Stars: {}",
            self.full_name.as_deref().unwrap_or(self.name.as_str()),
            self.id,
            self.stars.map(|stars| stars.to_string()).unwrap_or_default()
        )
    }
}

/// A fetcher API rate limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherRateLimit {
    /// The maximum number of requests that can be made in the current window.
    pub limit: u32,
    /// The number of requests already made in the current window.
    pub used: u32,
    /// The remaining number of requests that can be made in the current window.
    pub remaining: u32,
    /// The time at which the rate limit will reset.
    pub reset_at: DateTime<Utc>,
}

impl FetcherRateLimit {
    /// Whether no request can be made before the reset time.
    pub fn is_exceeded(&self) -> bool {
        self.remaining == 0
    }

    /// Computes how long to wait from `now` until the window resets.
    pub fn duration_until_reset(&self, now: DateTime<Utc>) -> StdResult<Duration> {
        if self.reset_at <= now {
            return Ok(Duration::ZERO);
        }

        Ok((self.reset_at - now).to_std()?)
    }

    #[cfg(test)]
    /// Creates a dummy `FetcherRateLimit` instance for testing purposes.
    pub fn dummy() -> Self {
        Self {
            limit: 30,
            used: 1,
            remaining: 29,
            reset_at: DateTime::from_timestamp(1_735_689_600, 0).unwrap(),
        }
    }
}

impl Display for FetcherRateLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RateLimit: calls={}/{}, remaining={}, reset={}",
            self.used,
            self.limit,
            self.remaining,
            self.reset_at.to_rfc3339()
        )
    }
}
