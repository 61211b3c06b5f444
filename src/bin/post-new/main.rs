use std::fmt::Write;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use unidecode::unidecode;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Title of the post
    #[arg(short, long)]
    title: String,

    /// One-line summary shown on the listing page
    #[arg(short, long)]
    summary: Option<String>,

    /// Cover image path, e.g. /public/images/cover.png
    #[arg(short, long)]
    image: Option<String>,

    /// Post generation options
    #[arg(short, long, default_value_t = PostOutput::Stdout)]
    output: PostOutput,

    /// Directory receiving the new file when the output is file
    #[arg(short, long, default_value = "posts")]
    posts_dir: PathBuf,
}

#[derive(Clone, Debug, ValueEnum)]
enum PostOutput {
    /// Writes the new post content to the stdout
    Stdout,
    /// Writes the new post to <slug>.mdx in the posts directory
    File,
}

impl Display for PostOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PostOutput::Stdout => write!(f, "stdout"),
            PostOutput::File => write!(f, "file"),
        }
    }
}

/// URL-safe slug out of the title: transliterated, lowercased, runs of
/// everything else folded into single dashes.
fn slugify(title: &str) -> String {
    let ascii = unidecode(title);

    let mut slug = String::new();
    let mut pending_dash = false;
    for c in ascii.chars().flat_map(|c| c.to_lowercase()) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    slug
}

fn render_front_matter(title: &str, published_at: &str, summary: &str, image: Option<&str>) -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "---");
    let _ = writeln!(&mut buf, "title: \"{}\"", title);
    let _ = writeln!(&mut buf, "publishedAt: \"{}\"", published_at);
    let _ = writeln!(&mut buf, "summary: \"{}\"", summary);
    if let Some(image) = image {
        let _ = writeln!(&mut buf, "image: \"{}\"", image);
    }
    let _ = writeln!(&mut buf, "---");

    buf
}

fn render_body() -> String {
    let mut buf = String::new();

    let _ = writeln!(&mut buf, "This is a body example.");
    let _ = writeln!(&mut buf, "Please remove it and replace with your content.");
    let _ = writeln!(&mut buf, "");
    let _ = writeln!(&mut buf, "{{/* Notes to self go in comments like this one */}}");

    buf
}

fn main() -> Result<()> {
    let args = Args::parse();

    let slug = slugify(&args.title);
    if slug.is_empty() {
        bail!("Title '{}' does not yield a slug", args.title);
    }

    let published_at = Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string();
    let summary = args
        .summary
        .unwrap_or_else(|| "Replace with a one-line summary".to_string());

    let mut post = render_front_matter(&args.title, &published_at, &summary, args.image.as_deref());
    post.push('\n');
    post.push_str(&render_body());

    match args.output {
        PostOutput::Stdout => println!("{}", post),
        PostOutput::File => {
            let path = args.posts_dir.join(format!("{}.mdx", slug));
            fs::write(&path, post).with_context(|| format!("Error writing {}", path.display()))?;
            println!("Created {}", path.display());
        }
    }

    Ok(())
}
