use std::cmp::Ordering;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::post::{IndexError, Post};

pub struct PostList {
    pub posts_dir: PathBuf,
}

impl PostList {
    /// Reads every post file directly inside the posts directory.
    ///
    /// The order is whatever the directory enumeration yields; listing
    /// pages that want newest-first call [`sort_newest_first`] on the
    /// result. One malformed or unreadable file fails the whole call -
    /// callers that can live with partial results read file by file with
    /// [`Post::from_file`] instead.
    pub fn list_posts(&self) -> Result<Vec<Post>, IndexError> {
        let entries = fs::read_dir(self.posts_dir.as_path()).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                IndexError::MissingDirectory { path: self.posts_dir.clone() }
            } else {
                IndexError::UnreadableFile { path: self.posts_dir.clone(), source: e }
            }
        })?;

        let mut posts = vec![];
        for entry in entries {
            let entry = entry.map_err(|e| IndexError::UnreadableFile {
                path: self.posts_dir.clone(),
                source: e,
            })?;

            let file_type = entry.file_type().map_err(|e| IndexError::UnreadableFile {
                path: entry.path(),
                source: e,
            })?;
            if !file_type.is_file() {
                continue;
            }

            let file_name = entry.file_name();
            if let Some(file_name) = file_name.to_str() {
                // Posts are written as .mdx, a few older ones as .md
                if file_name.ends_with(".mdx") || file_name.ends_with(".md") {
                    posts.push(Post::from_file(&entry.path())?);
                }
            }
        }

        Ok(posts)
    }

    pub fn find_post(&self, slug: &str) -> Result<Option<Post>, IndexError> {
        let posts = self.list_posts()?;
        Ok(posts.into_iter().find(|post| post.slug == slug))
    }
}

/// Listing-page order: newest first, using the comparison the listing
/// has always used - a post goes before another only when its date is
/// strictly greater. The comparison never reports a tie, so posts
/// sharing a date keep their enumeration order. Do not replace this with
/// a three-way date comparison; it would reshuffle same-day posts.
pub fn sort_newest_first(posts: &mut [Post]) {
    for i in 1..posts.len() {
        let mut j = i;
        while j > 0 && listing_cmp(&posts[j], &posts[j - 1]) == Ordering::Less {
            posts.swap(j, j - 1);
            j -= 1;
        }
    }
}

fn listing_cmp(a: &Post, b: &Post) -> Ordering {
    if a.metadata.published_date() > b.metadata.published_date() {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}
