use fmt::Display;
use std::collections::BTreeMap;
use std::fmt::Formatter;
use std::path::{Path, PathBuf};
use std::{fmt, fs, io};

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::front_matter::{parse_front_matter, split_front_matter};
use crate::text_utils::parse_published_at;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Posts directory {} does not exist", .path.display())]
    MissingDirectory { path: PathBuf },

    #[error("Malformed post {}: {}", .path.display(), .reason)]
    MalformedPost { path: PathBuf, reason: String },

    #[error("Could not read {}: {}", .path.display(), .source)]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Front-matter record of a post. The raw publishedAt string is kept as
/// written; it is validated as parseable when the record is built.
#[derive(Debug, Clone, PartialEq)]
pub struct PostMetadata {
    pub title: String,
    pub published_at: String,
    pub summary: String,
    pub image: Option<String>,
    /// Unrecognized front-matter keys, kept as-is.
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub slug: String,
    pub metadata: PostMetadata,
    /// Raw body after the metadata block. Rendering happens at view time.
    pub content: String,
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "slug={}, publishedAt={}\ntitle={}\ncontent:\n{}",
               self.slug,
               self.metadata.published_at,
               self.metadata.title,
               self.content
        )
    }
}

impl PostMetadata {
    /// Parsed form of publishedAt. Indexed posts always parse; records
    /// built by hand with a broken date collapse to the epoch floor.
    pub fn published_date(&self) -> NaiveDateTime {
        parse_published_at(&self.published_at).unwrap_or(NaiveDateTime::MIN)
    }
}

/// Example of a post file
/// ---
/// title: "Hello World"
/// publishedAt: "2023-05-01"
/// summary: "First post"
/// ---
///
/// # Hi
impl Post {
    pub fn from_file(file_name: &Path) -> Result<Post, IndexError> {
        let slug = slug_from_path(file_name)?;
        let raw = fs::read_to_string(file_name).map_err(|e| IndexError::UnreadableFile {
            path: file_name.to_path_buf(),
            source: e,
        })?;

        Self::from_string(file_name, &slug, &raw)
    }

    pub fn from_string(file_name: &Path, slug: &str, raw: &str) -> Result<Post, IndexError> {
        let malformed = |reason: String| IndexError::MalformedPost {
            path: file_name.to_path_buf(),
            reason,
        };

        let (block, body) = split_front_matter(raw).map_err(malformed)?;
        let metadata = parse_front_matter(block).map_err(malformed)?;

        Ok(Post {
            slug: slug.to_string(),
            metadata,
            content: body.to_string(),
        })
    }
}

/// The slug is the file name with its extension stripped. Uniqueness
/// within a posts directory comes for free from the filesystem.
pub fn slug_from_path(file_name: &Path) -> Result<String, IndexError> {
    match file_name.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => Ok(stem.to_string()),
        None => Err(IndexError::MalformedPost {
            path: file_name.to_path_buf(),
            reason: "File name does not yield a slug".to_string(),
        }),
    }
}
