//! Files written under the build directory.
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use sha2::{Digest, Sha512};
use std::fmt::Write as _;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::pipeline::ProcessedSet;

/// Where the standings for a sheet land: same relative path, `.txt` extension.
#[must_use]
pub fn standings_path(relative: &Path) -> PathBuf {
    relative.with_extension("txt")
}

/// Relative link for a page, always `/`-separated.
#[must_use]
pub fn page_link(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Write the standings of one set and return its index link.
pub fn write_standings(build_dir: &Path, set: &ProcessedSet) -> Result<String> {
    let relative = standings_path(&set.relative);
    let mut contents = set.standings.to_string();
    contents.push('\n');
    write_file(&build_dir.join(&relative), &contents)?;
    log::debug!("wrote {}", relative.display());
    Ok(page_link(&relative))
}

/// File name and contents of the build stamp for `now`.
#[must_use]
pub fn build_stamp<Tz>(now: &DateTime<Tz>) -> (String, String)
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stamp = now.format("%Y-%m-%d-%H-%M-%S").to_string();
    let mut hasher = Sha512::new();
    hasher.update(stamp.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        let _ = write!(hex, "{byte:02x}");
    }
    (format!("{stamp}.txt"), hex)
}

/// Write the build stamp file and return its index link.
pub fn write_build_stamp<Tz>(build_dir: &Path, now: &DateTime<Tz>) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let (name, digest) = build_stamp(now);
    write_file(&build_dir.join(&name), &digest)?;
    Ok(name)
}

/// HTML list of every page written during a build.
#[derive(Debug, Clone)]
pub struct IndexPage {
    path: PathBuf,
    pages: Vec<String>,
}

impl IndexPage {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            pages: Vec::new(),
        }
    }

    pub fn add(&mut self, page: impl Into<String>) {
        self.pages.push(page.into());
    }

    #[must_use]
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut items = String::new();
        for page in &self.pages {
            let _ = writeln!(
                items,
                "<li><a href=\"{}\">{}</a></li>",
                html_escape::encode_double_quoted_attribute(page),
                html_escape::encode_text(page)
            );
        }
        format!(
            "<!doctype html>\n<html lang=en>\n<head>\n<meta charset=utf-8>\n<title>index</title>\n</head>\n<body><ul>\n{items}</ul></body>\n</html>\n"
        )
    }

    pub fn write(&self) -> Result<()> {
        write_file(&self.path, &self.render())
    }
}
