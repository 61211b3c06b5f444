use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::{fs, io};

use chrono::{NaiveDate, Utc};
use ntex::web;
use ntex_files::NamedFile;
use ramhorns::Template;
use spdlog::info;

use crate::config::Config;
use crate::counter::request_memo::RequestMemo;
use crate::counter::view_counts::ViewCounts;
use crate::counter::view_sender::ViewSender;
use crate::counter::CounterHandler;
use crate::post::{IndexError, Post};
use crate::post_list::{sort_newest_first, PostList};
use crate::post_render::render_markdown;
use crate::text_utils::format_published_at;
use crate::view::list_renderer::ListRenderer;
use crate::view::post_renderer::PostRenderer;

struct AppState {
    config: Config,
    views: ViewSender,
    view_counts: Arc<RwLock<ViewCounts>>,
    _counter: CounterHandler,
}

#[derive(ramhorns::Content)]
struct HomePage<'a> {
    site_title: &'a str,
    author: &'a str,
    post_count: i64,
}

fn index_err(e: IndexError) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, e.to_string())
}

pub fn read_template(tpl_dir: &PathBuf, file_name: &str) -> io::Result<String> {
    let full_path = tpl_dir.join(file_name);
    fs::read_to_string(full_path)
}

pub fn render_home(config: &Config) -> io::Result<String> {
    let home_tpl_src: String = match read_template(&config.paths.template_dir, "home.tpl") {
        Ok(s) => s,
        Err(e) => {
            return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error loading home template: {}", e)));
        }
    };

    let home_tpl = match Template::new(home_tpl_src) {
        Ok(x) => x,
        Err(e) => {
            return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing home template: {}", e)));
        }
    };

    let post_list = PostList { posts_dir: config.paths.posts_dir.clone() };
    let posts = post_list.list_posts().map_err(index_err)?;

    let rendered = home_tpl.render(&HomePage {
        site_title: config.site.title.as_str(),
        author: config.site.author.as_str(),
        post_count: posts.len() as i64,
    });

    Ok(rendered)
}

/// The listing is read fresh from disk, sorted newest first (the
/// indexer itself returns enumeration order) and decorated with the
/// current view totals.
pub fn render_blog_list(config: &Config, views: &HashMap<String, u64>, today: NaiveDate) -> io::Result<String> {
    let post_list = PostList { posts_dir: config.paths.posts_dir.clone() };
    let mut posts = post_list.list_posts().map_err(index_err)?;
    sort_newest_first(&mut posts);

    let tpl_src = read_template(&config.paths.template_dir, "postlist.tpl")?;
    let list_renderer = ListRenderer::new(&tpl_src)?;
    list_renderer.render(&posts, views, today)
}

pub fn render_post_page(config: &Config, post: &Post, views: u64, today: NaiveDate) -> io::Result<String> {
    let post_content = render_markdown(&post.content)?;
    let published = format_published_at(&post.metadata.published_at, today)
        .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;

    let tpl_src = read_template(&config.paths.template_dir, "view.tpl")?;
    let post_renderer = PostRenderer::new(&tpl_src)?;
    Ok(post_renderer.render(post, &post_content, &published, views))
}

// Begin: Redirect region --------
#[web::get("/blog/{slug}/")]
async fn blog_post_with_slash(path: web::types::Path<String>) -> web::HttpResponse {
    web::HttpResponse::TemporaryRedirect()
        .header("Location", format!("/blog/{}", path.into_inner()))
        .content_type("text/html; charset=utf-8")
        .finish()
}
// End: Redirect region --------

#[web::get("/")]
async fn index(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    match render_home(&state.config) {
        Ok(rendered) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(rendered),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error rendering home page: {}", e)),
    }
}

#[web::get("/blog")]
async fn blog_list(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let views = state.view_counts.read().unwrap().snapshot();
    let today = Utc::now().date_naive();

    match render_blog_list(&state.config, &views, today) {
        Ok(rendered) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(rendered),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error listing posts: {}", e)),
    }
}

#[web::get("/blog/{slug}")]
async fn blog_post(path: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let slug = path.into_inner();

    let post_list = PostList { posts_dir: state.config.paths.posts_dir.clone() };
    let post = match post_list.find_post(&slug) {
        Ok(Some(post)) => post,
        Ok(None) => {
            return web::HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body("Post not found");
        }
        Err(e) => {
            return web::HttpResponse::InternalServerError()
                .body(format!("Error loading post {}: {}", slug, e));
        }
    };

    // The count shown is the read before this request's own view lands
    let views = state.view_counts.read().unwrap().get(&slug);

    let mut memo = RequestMemo::new();
    if memo.first_call(&slug) {
        state.views.post_viewed(slug.clone()).await;
    }

    let today = Utc::now().date_naive();
    match render_post_page(&state.config, &post, views, today) {
        Ok(rendered) => web::HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(rendered),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error rendering post {}: {}", slug, e)),
    }
}

#[web::get("/public/{file_name}")]
async fn public_files(path: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> Result<NamedFile, web::Error> {
    if path.contains("../") {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let file_path = state.config.paths.public_dir.join(path.into_inner());

    Ok(NamedFile::open(file_path)?)
}

#[web::get("/robots.txt")]
async fn robots(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let base_url = &state.config.site.base_url;
    let body = format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\nHost: {}\n",
        base_url, base_url
    );

    web::HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(body)
}

pub async fn server_run(config: Config) -> io::Result<()> {
    // A broken posts directory should fail the boot, not the first visit
    let post_list = PostList { posts_dir: config.paths.posts_dir.clone() };
    let posts = post_list.list_posts().map_err(index_err)?;
    for post in posts.iter() {
        info!("Post: {}", post.slug);
    }

    let (counts, flush_secs) = match config.views {
        Some(ref views_cfg) => (
            ViewCounts::load(views_cfg.location.clone())?,
            views_cfg.flush_secs.unwrap_or(2),
        ),
        None => (ViewCounts::in_memory(), 2),
    };

    let counter = CounterHandler::new(counts, flush_secs);
    let views = counter.new_sender();
    let view_counts = counter.counts();

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;

    let app_state = Arc::new(AppState {
        config,
        views,
        view_counts,
        _counter: counter,
    });

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(index)
            .service(robots)
            .service(public_files)
            .service(blog_list)
            .service(blog_post)
            .service(blog_post_with_slash)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use crate::config::{Paths, Server, Site};

    use super::*;

    fn test_config(posts_dir: PathBuf, template_dir: PathBuf) -> Config {
        Config {
            site: Site {
                title: "Test site".to_string(),
                author: "Tester".to_string(),
                base_url: "https://example.com".to_string(),
            },
            paths: Paths {
                posts_dir,
                template_dir,
                public_dir: PathBuf::from("res/public"),
            },
            server: Server {
                address: "127.0.0.1".to_string(),
                port: 0,
            },
            log: None,
            views: None,
        }
    }

    #[test]
    fn test_render_blog_list_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("posts");
        let tpl_dir = dir.path().join("template");
        fs::create_dir(&posts_dir).unwrap();
        fs::create_dir(&tpl_dir).unwrap();

        fs::write(
            posts_dir.join("older.mdx"),
            "---\ntitle: \"Older\"\npublishedAt: \"2023-01-01\"\nsummary: \"S\"\n---\nOld body\n",
        ).unwrap();
        fs::write(
            posts_dir.join("newer.mdx"),
            "---\ntitle: \"Newer\"\npublishedAt: \"2024-01-01\"\nsummary: \"S\"\n---\nNew body\n",
        ).unwrap();
        fs::write(tpl_dir.join("postlist.tpl"), "{{#post_list}}{{title}};{{/post_list}}").unwrap();

        let config = test_config(posts_dir, tpl_dir);
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let rendered = render_blog_list(&config, &HashMap::new(), today).unwrap();
        assert_eq!(rendered, "Newer;Older;");
    }

    #[test]
    fn test_render_post_page() {
        let dir = tempfile::tempdir().unwrap();
        let tpl_dir = dir.path().join("template");
        fs::create_dir(&tpl_dir).unwrap();
        fs::write(tpl_dir.join("view.tpl"), "{{title}}|{{views}}|{{{post_content}}}").unwrap();

        let config = test_config(dir.path().join("posts"), tpl_dir);
        let post = Post::from_string(
            &PathBuf::from("posts/hello-world.mdx"),
            "hello-world",
            "---\ntitle: \"Hello World\"\npublishedAt: \"2023-05-01\"\nsummary: \"First post\"\n---\n# Hi\nContent here.\n",
        ).unwrap();

        let today = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        let rendered = render_post_page(&config, &post, 3, today).unwrap();
        assert!(rendered.starts_with("Hello World|3|"));
        assert!(rendered.contains("<h1>Hi</h1>"));
    }

    #[test]
    fn test_render_home_counts_posts() {
        let dir = tempfile::tempdir().unwrap();
        let posts_dir = dir.path().join("posts");
        let tpl_dir = dir.path().join("template");
        fs::create_dir(&posts_dir).unwrap();
        fs::create_dir(&tpl_dir).unwrap();

        fs::write(
            posts_dir.join("only.mdx"),
            "---\ntitle: \"Only\"\npublishedAt: \"2023-01-01\"\nsummary: \"S\"\n---\nBody\n",
        ).unwrap();
        fs::write(tpl_dir.join("home.tpl"), "{{site_title}} by {{author}} ({{post_count}})").unwrap();

        let config = test_config(posts_dir, tpl_dir);
        let rendered = render_home(&config).unwrap();
        assert_eq!(rendered, "Test site by Tester (1)");
    }
}
