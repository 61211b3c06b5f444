use std::io;
use std::io::ErrorKind;

use markdown::Options;

/// Strips MDX-style comment blocks before rendering. The post sources
/// are .mdx files and the author leaves notes in them.
pub fn remove_mdx_comments(body: &str) -> io::Result<String> {
    let mut res: String = String::new();
    let mut slice = Some(body);

    let start_comment = "{/*";
    let end_comment = "*/}";

    while let Some(block) = slice {
        let keep: &str = match block.find(start_comment) {
            Some(start) => {
                let next: &str = &block[(start + start_comment.len())..];
                match next.find(end_comment) {
                    Some(end) => {
                        slice = Some(&next[(end + end_comment.len())..]);
                    }
                    None => {
                        return Err(io::Error::new(
                            ErrorKind::InvalidData,
                            "Comment block is never closed",
                        ));
                    }
                };

                &block[0..start]
            }
            None => {
                slice = None;
                block
            }
        };
        res.push_str(keep);
    }

    Ok(res)
}

pub fn render_markdown(body: &str) -> io::Result<String> {
    let buf = remove_mdx_comments(body)?;
    match markdown::to_html_with_options(buf.as_str(), &Options::gfm()) {
        Ok(x) => Ok(x),
        Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, e.reason.as_str())),
    }
}
