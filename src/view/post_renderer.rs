use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::post::Post;

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    title: &'a str,
    published: &'a str,
    views: u64,
    image: &'a str,
    summary: &'a str,
    post_content: &'a str,
}

pub struct PostRenderer<'a> {
    pub template: Template<'a>,
}

impl PostRenderer<'_> {
    pub fn new(view_tpl_src: &str) -> io::Result<PostRenderer> {
        let template = match Template::new(view_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing post view template: {}", e)));
            }
        };

        Ok(PostRenderer { template })
    }

    pub fn render(&self, post: &Post, post_content: &str, published: &str, views: u64) -> String {
        self.template.render(&ViewItem {
            title: post.metadata.title.as_str(),
            published,
            views,
            image: post.metadata.image.as_deref().unwrap_or(""),
            summary: post.metadata.summary.as_str(),
            post_content,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::post::PostMetadata;
    use crate::view::post_renderer::PostRenderer;

    use super::*;

    #[test]
    fn render_view() {
        let template_src = r##"
TITLE=[{{title}}]
PUBLISHED=[{{published}}]
VIEWS=[{{views}}]
IMAGE=[{{image}}]
POST_CONTENT=[{{{post_content}}}]"##;
        let post_renderer = PostRenderer::new(template_src).unwrap();
        let post = Post {
            slug: "hello-world".to_string(),
            metadata: PostMetadata {
                title: "<Hello> World".to_string(),
                published_at: "2023-05-01".to_string(),
                summary: "First post".to_string(),
                image: Some("/images/cover.png".to_string()),
                extra: Default::default(),
            },
            content: "# Hi".to_string(),
        };

        let res = post_renderer.render(&post, "<h1>Hi</h1>", "May 1, 2023 (Today)", 12);
        assert_eq!(res, r##"
TITLE=[&lt;Hello&gt; World]
PUBLISHED=[May 1, 2023 (Today)]
VIEWS=[12]
IMAGE=[/images/cover.png]
POST_CONTENT=[<h1>Hi</h1>]"##);
    }
}
