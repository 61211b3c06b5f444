use std::collections::HashMap;
use std::io;
use std::io::ErrorKind;

use chrono::NaiveDate;
use ramhorns::Template;

use crate::post::Post;
use crate::text_utils::format_published_at;

#[derive(ramhorns::Content)]
struct ListPage {
    post_list: Vec<ListItem>,
}

#[derive(ramhorns::Content)]
struct ListItem {
    link: String,
    title: String,
    published: String,
    summary: String,
    views: u64,
    image: String,
}

pub struct ListRenderer<'a> {
    pub template: Template<'a>,
}

impl ListRenderer<'_> {
    pub fn new(list_tpl_src: &str) -> io::Result<ListRenderer> {
        let template = match Template::new(list_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing list template: {}", e)));
            }
        };

        Ok(ListRenderer { template })
    }

    /// Renders the listing in the order given; sorting is the caller's
    /// call. `today` anchors the relative dates for the whole page.
    pub fn render(&self, posts: &[Post], views: &HashMap<String, u64>, today: NaiveDate) -> io::Result<String> {
        let mut post_list = vec![];
        for post in posts {
            let published = format_published_at(&post.metadata.published_at, today)
                .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;

            post_list.push(ListItem {
                link: format!("/blog/{}", &post.slug),
                title: post.metadata.title.clone(),
                published,
                summary: post.metadata.summary.clone(),
                views: views.get(&post.slug).copied().unwrap_or(0),
                image: post.metadata.image.clone().unwrap_or_default(),
            });
        }

        Ok(self.template.render(&ListPage { post_list }))
    }
}
