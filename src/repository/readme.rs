use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CrawlError, Result};
use crate::model::About;

static README: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^README\.(md|txt)").expect("valid readme pattern"));

/// Find the first `README.md`/`README.txt` at the worktree root, in name order
pub fn find_readme(root: &Path) -> Result<Option<About>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| CrawlError::io("read directory", root, e))? {
        let entry = entry.map_err(|e| CrawlError::io("read directory", root, e))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    for name in names {
        let Some(caps) = README.captures(&name) else {
            continue;
        };
        let content_type = if &caps[1] == "md" { "text/markdown" } else { "text/plain" };
        let path = root.join(&name);
        let bytes = fs::read(&path).map_err(|e| CrawlError::io("read README", &path, e))?;
        return Ok(Some(About {
            content: String::from_utf8_lossy(&bytes).into_owned(),
            content_type,
        }));
    }
    Ok(None)
}
