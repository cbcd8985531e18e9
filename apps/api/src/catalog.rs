//! Fixed option lists offered by the form's chip selectors.
//!
//! Toggling is not restricted to these; they only seed the choices.

use serde::Serialize;

pub const LANGUAGES: &[&str] = &["C", "C++", "Java", "Python", "JavaScript", "TypeScript", "Go"];
pub const WEB: &[&str] = &["HTML", "CSS", "Tailwind", "React", "Node.js", "Express", "Next.js"];
pub const DATABASES: &[&str] = &["MySQL", "MongoDB", "PostgreSQL", "SQLite", "Redis"];
pub const TOOLS: &[&str] = &["Git", "GitHub", "VS Code", "Docker", "Postman", "Figma"];
pub const LOGOS: &[&str] = &["LeetCode", "HackerRank", "NPTEL", "Coursera", "Oracle", "LinkedIn"];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Catalog {
    pub languages: &'static [&'static str],
    pub web: &'static [&'static str],
    pub databases: &'static [&'static str],
    pub tools: &'static [&'static str],
    pub logos: &'static [&'static str],
}

pub const CATALOG: Catalog = Catalog {
    languages: LANGUAGES,
    web: WEB,
    databases: DATABASES,
    tools: TOOLS,
    logos: LOGOS,
};
