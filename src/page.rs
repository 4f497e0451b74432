use std::cell::OnceCell;

use crate::{error::StoreError, links, markup, store::Repository};

/// A named handle over one page in a [`Repository`].
///
/// Pages are constructed on demand (one per request, in the original
/// design) and carry no durable state of their own; durability lives
/// entirely in the repository's revision history. Raw content is
/// memoized for the lifetime of the handle, the page-name set never
/// is: rendering must see pages created after this handle was made.
pub struct Page<'a> {
    repo: &'a Repository,
    name: String,
    raw: OnceCell<String>,
}

impl<'a> Page<'a> {
    pub fn new(repo: &'a Repository, name: impl Into<String>) -> Self {
        Page {
            repo,
            name: name.into(),
            raw: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The display title: the name with underscores shown as spaces.
    pub fn title(&self) -> String {
        self.name.replace('_', " ")
    }

    /// Whether the name is present in the current snapshot. A
    /// repository with no revisions at all tracks nothing.
    pub fn tracked(&self) -> Result<bool, StoreError> {
        Ok(self.repo.current_entries()?.contains(&self.name))
    }

    /// The page's current raw text, or the empty string if it has
    /// never been written. Fetched once per handle.
    pub fn raw_content(&self) -> Result<&str, StoreError> {
        if let Some(cached) = self.raw.get() {
            return Ok(cached.as_str());
        }
        let content = self.repo.read(&self.name)?.unwrap_or_default();
        Ok(self.raw.get_or_init(|| content).as_str())
    }

    /// The page rendered for display: markdown to HTML, then
    /// `[[...]]` references resolved against the live page set.
    pub fn rendered_body(&self) -> Result<String, StoreError> {
        self.rendered_body_with(markup::render)
    }

    /// Same as [`Page::rendered_body`] but with a caller-supplied
    /// text formatter as the first pipeline stage.
    pub fn rendered_body_with<F>(&self, format: F) -> Result<String, StoreError>
    where
        F: FnOnce(&str) -> String,
    {
        let html = format(self.raw_content()?);
        let known = self.repo.current_entries()?;
        Ok(links::resolve(&html, &known))
    }

    /// Commits `content` as the page's new revision, attributed
    /// `"Created {name}"` or `"Edited {name}"` depending on whether
    /// the page was tracked before this write.
    pub fn set_content(&mut self, content: &str) -> Result<(), StoreError> {
        let message = if self.tracked()? {
            format!("Edited {}", self.name)
        } else {
            format!("Created {}", self.name)
        };
        self.repo.write(&self.name, content, &message)?;
        // The memo predates the write; drop it.
        self.raw = OnceCell::new();
        Ok(())
    }

    /// Commits a revision removing the page, attributed
    /// `"Destroyed {name}"`.
    pub fn destroy(&mut self) -> Result<(), StoreError> {
        let message = format!("Destroyed {}", self.name);
        self.repo.remove(&self.name, &message)?;
        self.raw = OnceCell::new();
        Ok(())
    }
}

#[cfg(test)]
fn temp_repo() -> (tempfile::TempDir, Repository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    (dir, repo)
}

#[test]
fn test_title_derivation() {
    let (_dir, repo) = temp_repo();
    assert_eq!(Page::new(&repo, "My_Page").title(), "My Page");
    assert_eq!(Page::new(&repo, "NoUnderscore").title(), "NoUnderscore");
}

#[test]
fn test_unknown_page_is_untracked_and_empty() {
    let (_dir, repo) = temp_repo();
    let page = Page::new(&repo, "Nowhere");
    assert!(!page.tracked().unwrap());
    assert_eq!(page.raw_content().unwrap(), "");
}

#[test]
fn test_set_content_tracks_and_attributes() {
    let (_dir, repo) = temp_repo();
    let mut page = Page::new(&repo, "Home");
    page.set_content("hello").unwrap();
    assert!(page.tracked().unwrap());
    assert_eq!(page.raw_content().unwrap(), "hello");

    page.set_content("hello again").unwrap();
    assert_eq!(page.raw_content().unwrap(), "hello again");

    page.destroy().unwrap();
    assert!(!page.tracked().unwrap());

    let messages: Vec<String> = repo.history().unwrap().into_iter().map(|(_, m)| m).collect();
    assert_eq!(messages, vec!["Destroyed Home", "Edited Home", "Created Home"]);
}

#[test]
fn test_raw_content_is_memoized_per_handle() {
    let (_dir, repo) = temp_repo();
    repo.write("Home", "first", "Created Home").unwrap();
    let page = Page::new(&repo, "Home");
    assert_eq!(page.raw_content().unwrap(), "first");
    repo.write("Home", "second", "Edited Home").unwrap();
    // A handle keeps the content it already fetched; a fresh handle sees the new revision.
    assert_eq!(page.raw_content().unwrap(), "first");
    assert_eq!(Page::new(&repo, "Home").raw_content().unwrap(), "second");
}

#[test]
fn test_rendered_body_resolves_links_against_live_set() {
    let (_dir, repo) = temp_repo();
    let mut page = Page::new(&repo, "Home");
    page.set_content("go to [[About]]").unwrap();
    let body = page.rendered_body().unwrap();
    assert!(body.contains(r#"<span>About<a href="/e/About">?</a></span>"#));

    // Creating the target after this handle was made changes the rendering.
    Page::new(&repo, "About").set_content("about us").unwrap();
    let body = page.rendered_body().unwrap();
    assert!(body.contains(r#"<a href="/About">About</a>"#));
}

#[test]
fn test_rendered_body_with_custom_formatter() {
    let (_dir, repo) = temp_repo();
    repo.write("Home", "[[Home]]", "Created Home").unwrap();
    let page = Page::new(&repo, "Home");
    let body = page.rendered_body_with(|raw| raw.to_uppercase()).unwrap();
    // The formatter ran first, so the uppercased target no longer matches.
    assert!(body.contains(r#"/e/HOME"#));
}
