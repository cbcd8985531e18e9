use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::draft::image::ImageData;
use crate::draft::lens::{lens_record, string_set, Lens};
use crate::draft::ordered_set::OrderedSet;
use crate::draft::path::{FieldPath, PathSegment};

/// Rows the form starts with (and the minimum every row list keeps).
pub const MIN_ROWS: usize = 3;
/// Upper bound for `projects`, `certs` and `achieves`.
pub const MAX_ROWS: usize = 5;
/// Exact number of logos a submittable draft carries.
pub const LOGO_COUNT: usize = 4;

pub type Rows<T> = Arc<Vec<Arc<T>>>;

/// The complete resume record for the current session.
///
/// Cloning is cheap: every section is reference-counted and shared with the
/// snapshot it was cloned from until a path update detaches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDraft {
    pub personal: Arc<Personal>,
    pub contact: Arc<Contact>,
    pub education: Arc<Education>,
    pub skills: Arc<Skills>,
    pub projects: Rows<Project>,
    pub internship: Arc<Internship>,
    pub certs: Rows<Cert>,
    pub achieves: Rows<Achievement>,
    pub qr: Arc<QrCodes>,
    pub logos: Arc<OrderedSet<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personal {
    pub name: String,
    pub photo: Option<ImageData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub personal_email: String,
    pub official_email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub leetcode: String,
    pub hackerrank: String,
}

impl Contact {
    /// Profile URLs paired with their wire key, in form order.
    pub fn profile_links(&self) -> [(&'static str, &str); 4] {
        [
            ("linkedin", self.linkedin.as_str()),
            ("github", self.github.as_str()),
            ("leetcode", self.leetcode.as_str()),
            ("hackerrank", self.hackerrank.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub btech: Degree,
    pub twelfth: SchoolRecord,
    pub tenth: SchoolRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Degree {
    pub specialization: String,
    pub year: String,
    pub gpa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolRecord {
    pub board: String,
    pub year: String,
    pub percentage: String,
    pub school: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skills {
    pub languages: OrderedSet<String>,
    pub web: OrderedSet<String>,
    pub databases: OrderedSet<String>,
    pub tools: OrderedSet<String>,
    pub others: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub tech: String,
    pub desc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Internship {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub desc: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cert {
    pub name: String,
    pub link: String,
    pub add_link: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub text: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodes {
    pub portfolio: Option<ImageData>,
    pub video: Option<ImageData>,
}

lens_record!(Personal { "name" => name, "photo" => photo });
lens_record!(Contact {
    "personalEmail" => personal_email,
    "officialEmail" => official_email,
    "phone" => phone,
    "linkedin" => linkedin,
    "github" => github,
    "leetcode" => leetcode,
    "hackerrank" => hackerrank,
});
lens_record!(Education { "btech" => btech, "twelfth" => twelfth, "tenth" => tenth });
lens_record!(Degree { "specialization" => specialization, "year" => year, "gpa" => gpa });
lens_record!(SchoolRecord {
    "board" => board,
    "year" => year,
    "percentage" => percentage,
    "school" => school,
});
lens_record!(Skills {
    "languages" => languages,
    "web" => web,
    "databases" => databases,
    "tools" => tools,
    "others" => others,
});
lens_record!(Project { "title" => title, "tech" => tech, "desc" => desc });
lens_record!(Internship {
    "title" => title,
    "company" => company,
    "duration" => duration,
    "desc" => desc,
});
lens_record!(Cert { "name" => name, "link" => link, "addLink" => add_link });
lens_record!(Achievement { "text" => text, "link" => link });
lens_record!(QrCodes { "portfolio" => portfolio, "video" => video });

impl Lens for ResumeDraft {
    fn set_at(&mut self, path: &[PathSegment], value: &Value) -> bool {
        let Some((PathSegment::Key(key), rest)) = path.split_first() else {
            return false;
        };
        match key.as_str() {
            "personal" => self.personal.set_at(rest, value),
            "contact" => self.contact.set_at(rest, value),
            "education" => self.education.set_at(rest, value),
            "skills" => self.skills.set_at(rest, value),
            "projects" => self.projects.set_at(rest, value),
            "internship" => self.internship.set_at(rest, value),
            "certs" => self.certs.set_at(rest, value),
            "achieves" => self.achieves.set_at(rest, value),
            "qr" => self.qr.set_at(rest, value),
            "logos" => match (rest.is_empty(), string_set(value)) {
                (true, Some(set)) if set.len() <= LOGO_COUNT => {
                    self.logos = Arc::new(set);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}

impl Default for ResumeDraft {
    fn default() -> Self {
        Self::empty()
    }
}

fn rows<T: Default>(n: usize) -> Rows<T> {
    Arc::new((0..n).map(|_| Arc::new(T::default())).collect())
}

/// Multi-select fields that toggle membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetField {
    Languages,
    Web,
    Databases,
    Tools,
    Logos,
}

impl SetField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "languages" => Some(SetField::Languages),
            "web" => Some(SetField::Web),
            "databases" => Some(SetField::Databases),
            "tools" => Some(SetField::Tools),
            "logos" => Some(SetField::Logos),
            _ => None,
        }
    }

    /// Membership cap, if any. Only logos are capped.
    pub fn capacity(self) -> Option<usize> {
        match self {
            SetField::Logos => Some(LOGO_COUNT),
            _ => None,
        }
    }
}

/// Row lists that grow by appending an empty row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowList {
    Projects,
    Certs,
    Achieves,
}

impl RowList {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "projects" => Some(RowList::Projects),
            "certs" => Some(RowList::Certs),
            "achieves" => Some(RowList::Achieves),
            _ => None,
        }
    }
}

/// Draft fields holding an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSlot {
    Photo,
    Portfolio,
    Video,
}

impl ImageSlot {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "photo" => Some(ImageSlot::Photo),
            "portfolio" => Some(ImageSlot::Portfolio),
            "video" => Some(ImageSlot::Video),
            _ => None,
        }
    }

    pub fn path(self) -> FieldPath {
        let (section, field) = match self {
            ImageSlot::Photo => ("personal", "photo"),
            ImageSlot::Portfolio => ("qr", "portfolio"),
            ImageSlot::Video => ("qr", "video"),
        };
        FieldPath::new(vec![
            PathSegment::Key(section.to_string()),
            PathSegment::Key(field.to_string()),
        ])
    }
}

impl ResumeDraft {
    /// The blank form a new session starts from.
    pub fn empty() -> Self {
        Self {
            personal: Arc::default(),
            contact: Arc::default(),
            education: Arc::default(),
            skills: Arc::default(),
            projects: rows(MIN_ROWS),
            internship: Arc::default(),
            certs: rows(MIN_ROWS),
            achieves: rows(MIN_ROWS),
            qr: Arc::default(),
            logos: Arc::default(),
        }
    }

    /// Shape checks a persisted snapshot must pass before it is trusted.
    pub fn is_well_formed(&self) -> bool {
        let row_bounds = MIN_ROWS..=MAX_ROWS;
        row_bounds.contains(&self.projects.len())
            && row_bounds.contains(&self.certs.len())
            && row_bounds.contains(&self.achieves.len())
            && self.logos.len() <= LOGO_COUNT
    }

    /// Returns a new snapshot with the value at `path` replaced, or `None`
    /// when the path does not resolve to a leaf accepting `value`.
    pub fn with_value(&self, path: &FieldPath, value: &Value) -> Option<Self> {
        let mut next = self.clone();
        next.set_at(path.segments(), value).then_some(next)
    }

    /// Flips membership of `item`. Adding to a full capped set yields `None`.
    pub fn with_toggled(&self, field: SetField, item: &str) -> Option<Self> {
        let item = item.to_string();
        let mut next = self.clone();
        let set = match field {
            SetField::Logos => Arc::make_mut(&mut next.logos),
            SetField::Languages => &mut Arc::make_mut(&mut next.skills).languages,
            SetField::Web => &mut Arc::make_mut(&mut next.skills).web,
            SetField::Databases => &mut Arc::make_mut(&mut next.skills).databases,
            SetField::Tools => &mut Arc::make_mut(&mut next.skills).tools,
        };
        if set.contains(&item) {
            set.remove(&item);
            return Some(next);
        }
        if field.capacity().is_some_and(|cap| set.len() >= cap) {
            return None;
        }
        set.insert(item);
        Some(next)
    }

    /// Appends an empty row while the list is shorter than `max_len`.
    pub fn with_appended_row(&self, list: RowList, max_len: usize) -> Option<Self> {
        let mut next = self.clone();
        match list {
            RowList::Projects => push_row(&mut next.projects, max_len)?,
            RowList::Certs => push_row(&mut next.certs, max_len)?,
            RowList::Achieves => push_row(&mut next.achieves, max_len)?,
        }
        Some(next)
    }

    /// Returns a new snapshot with `slot` set to `image` (or cleared).
    pub fn with_image(&self, slot: ImageSlot, image: Option<ImageData>) -> Self {
        let mut next = self.clone();
        match slot {
            ImageSlot::Photo => Arc::make_mut(&mut next.personal).photo = image,
            ImageSlot::Portfolio => Arc::make_mut(&mut next.qr).portfolio = image,
            ImageSlot::Video => Arc::make_mut(&mut next.qr).video = image,
        }
        next
    }

    #[cfg(test)]
    pub fn image(&self, slot: ImageSlot) -> Option<&ImageData> {
        match slot {
            ImageSlot::Photo => self.personal.photo.as_ref(),
            ImageSlot::Portfolio => self.qr.portfolio.as_ref(),
            ImageSlot::Video => self.qr.video.as_ref(),
        }
    }
}

fn push_row<T: Default + Clone>(rows: &mut Rows<T>, max_len: usize) -> Option<()> {
    if rows.len() >= max_len {
        return None;
    }
    Arc::make_mut(rows).push(Arc::new(T::default()));
    Some(())
}
