use url::Url;

/// Builds the fallback URL for a sub-link whose direct fetch failed
///
/// Links on a page are often written without an origin (`/about`, `contact.html`).
/// The fallback resolves the href against the seed page's directory, i.e. the
/// seed URL with its last path segment removed. A single leading `/` is treated
/// as directory-relative, so `/sibling` on `http://a.com/dir/page` becomes
/// `http://a.com/dir/sibling`. Protocol-relative and absolute hrefs resolve as
/// they would in a browser.
///
/// Returns `None` when no URL can be formed.
///
/// # Examples
///
/// ```
/// use scroopy::url::repair_link;
/// use url::Url;
///
/// let seed = Url::parse("http://a.com/dir/page").unwrap();
/// let repaired = repair_link(&seed, "/sibling").unwrap();
/// assert_eq!(repaired.as_str(), "http://a.com/dir/sibling");
/// ```
pub fn repair_link(seed: &Url, href: &str) -> Option<Url> {
    let directory = seed.join(".").ok()?;

    let relative = match href.strip_prefix('/') {
        Some(rest) if !rest.starts_with('/') => rest,
        _ => href,
    };

    directory.join(relative).ok()
}
