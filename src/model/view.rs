use std::fmt::Display;

use super::Repository;

const LOADING_LABEL: &str = "Loading…";
const UNKNOWN_LABEL: &str = "?";

/// A displayable row of the search results list.
///
/// A row built from `None` is the placeholder shown while a page is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRow {
    pub name: String,
    pub description: Option<String>,
    pub stars: String,
    pub forks: String,
    pub language: Option<String>,
    pub url: Option<String>,
}

impl RepositoryRow {
    /// Creates the placeholder row.
    pub fn placeholder() -> Self {
        Self {
            name: LOADING_LABEL.to_string(),
            description: None,
            stars: UNKNOWN_LABEL.to_string(),
            forks: UNKNOWN_LABEL.to_string(),
            language: None,
            url: None,
        }
    }
}

impl From<&Repository> for RepositoryRow {
    fn from(repository: &Repository) -> Self {
        Self {
            name: repository
                .full_name()
                .unwrap_or(repository.name().as_str())
                .to_string(),
            description: repository.description().map(str::to_string),
            stars: repository
                .stars()
                .map(|stars| stars.to_string())
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            forks: repository
                .forks()
                .map(|forks| forks.to_string())
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            language: repository
                .language()
                .filter(|language| !language.is_empty())
                .map(|language| format!("Language: {language}")),
            url: repository.url().map(str::to_string),
        }
    }
}

impl From<Option<&Repository>> for RepositoryRow {
    fn from(repository: Option<&Repository>) -> Self {
        repository.map_or_else(Self::placeholder, Self::from)
    }
}

impl Display for RepositoryRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.name)?;
        if let Some(description) = &self.description {
            writeln!(f, "  {description}")?;
        }
        write!(f, "  ★ {}  ⑂ {}", self.stars, self.forks)?;
        if let Some(language) = &self.language {
            write!(f, "  {language}")?;
        }
        if let Some(url) = &self.url {
            write!(f, "\n  {url}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_row_hides_optional_fields() {
        let row = RepositoryRow::from(None);

        assert_eq!(RepositoryRow::placeholder(), row);
        assert_eq!("Loading…\n  ★ ?  ⑂ ?", row.to_string());
    }

    #[test]
    fn row_shows_every_present_field() {
        let repository = Repository::new(1, "paging")
            .with_full_name(Some("android/paging".to_string()))
            .with_description(Some("Paging samples".to_string()))
            .with_url(Some("https://github.com/android/paging".to_string()))
            .with_counters(Some(120), Some(30))
            .with_language(Some("Kotlin".to_string()));

        let row = RepositoryRow::from(&repository);

        assert_eq!(
            "android/paging\n  Paging samples\n  ★ 120  ⑂ 30  Language: Kotlin\n  https://github.com/android/paging",
            row.to_string()
        );
    }

    #[test]
    fn row_hides_missing_description_and_empty_language() {
        let repository = Repository::new(1, "paging")
            .with_counters(Some(5), Some(0))
            .with_language(Some(String::new()));

        let row = RepositoryRow::from(&repository);

        assert_eq!(None, row.description);
        assert_eq!(None, row.language);
        assert_eq!("paging\n  ★ 5  ⑂ 0", row.to_string());
    }
}
