use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::draft::{ResumeDraft, LOGO_COUNT, MIN_ROWS};
use crate::validation::word_count::{INTERNSHIP_DESC_WORDS, PROJECT_DESC_WORDS};

/// Required URL prefix for every link field.
pub const SECURE_SCHEME: &str = "https://";

/// Identifies the field or section a validation failure belongs to.
///
/// Variant order is form order, so the first key of an [`ErrorMap`] is the
/// field the presentation layer should focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKey {
    Name,
    Photo,
    Links,
    Project(usize),
    Intern,
    Logos,
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKey::Name => f.write_str("name"),
            ErrorKey::Photo => f.write_str("photo"),
            ErrorKey::Links => f.write_str("links"),
            ErrorKey::Project(i) => write!(f, "project{i}"),
            ErrorKey::Intern => f.write_str("intern"),
            ErrorKey::Logos => f.write_str("logos"),
        }
    }
}

impl Serialize for ErrorKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Field key → human-readable message. Absence of a key means that field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap(BTreeMap<ErrorKey, String>);

impl ErrorMap {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn contains(&self, key: ErrorKey) -> bool {
        self.0.contains_key(&key)
    }

    #[cfg(test)]
    pub fn get(&self, key: ErrorKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    /// First invalid field in form order.
    pub fn first_error(&self) -> Option<ErrorKey> {
        self.0.keys().next().copied()
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = ErrorKey> + '_ {
        self.0.keys().copied()
    }

    fn insert(&mut self, key: ErrorKey, message: &str) {
        self.0.insert(key, message.to_string());
    }
}

/// Empty is vacuously secure; anything else must carry the https prefix.
pub fn is_https(url: &str) -> bool {
    url.is_empty() || url.starts_with(SECURE_SCHEME)
}

/// Every link the secure-scheme rule applies to, with its dotted path.
///
/// Cert links only count when the cert opted into a link; achievement
/// links only when filled in.
pub fn checked_links(draft: &ResumeDraft) -> Vec<(String, &str)> {
    let mut links: Vec<(String, &str)> = draft
        .contact
        .profile_links()
        .into_iter()
        .map(|(key, url)| (format!("contact.{key}"), url))
        .collect();

    for (i, cert) in draft.certs.iter().enumerate() {
        if cert.add_link {
            links.push((format!("certs.{i}.link"), cert.link.as_str()));
        }
    }
    for (i, achievement) in draft.achieves.iter().enumerate() {
        if !achievement.link.is_empty() {
            links.push((format!("achieves.{i}.link"), achievement.link.as_str()));
        }
    }
    links
}

/// Derives the full error map for `draft`. Every rule is evaluated; nothing short-circuits.
pub fn validate(draft: &ResumeDraft) -> ErrorMap {
    let mut errors = ErrorMap::default();

    if draft.personal.name.is_empty() {
        errors.insert(ErrorKey::Name, "Name is required");
    }
    if draft.personal.photo.is_none() {
        errors.insert(ErrorKey::Photo, "Profile photo is required");
    }

    for (i, project) in draft.projects.iter().take(MIN_ROWS).enumerate() {
        let complete = !project.title.is_empty()
            && !project.tech.is_empty()
            && PROJECT_DESC_WORDS.accepts(&project.desc);
        if !complete {
            errors.insert(
                ErrorKey::Project(i),
                "Each project needs title, tech and 10–30 word description",
            );
        }
    }

    // The internship section is optional as a whole.
    let intern_desc = &draft.internship.desc;
    if !intern_desc.is_empty() && !INTERNSHIP_DESC_WORDS.accepts(intern_desc) {
        errors.insert(ErrorKey::Intern, "Internship description must be 10–40 words");
    }

    if checked_links(draft).iter().any(|(_, url)| !is_https(url)) {
        errors.insert(ErrorKey::Links, "All links must start with https://");
    }

    if draft.logos.len() != LOGO_COUNT {
        errors.insert(ErrorKey::Logos, "Select exactly 4 logos");
    }

    errors
}
