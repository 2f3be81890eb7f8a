//! Source ingestion: turns user-supplied paths and URLs into documents.
//!
//! A filesystem path pulls in every readable text document under its
//! containing directory. A URL is fetched, reduced to readable text, and
//! snapshotted as a `.txt` file in the data directory so the page joins the
//! on-disk corpus.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use walkdir::WalkDir;

use crate::config::AppPaths;
use crate::errors::AppError;

const FETCH_TIMEOUT_SECS: u64 = 30;

const TEXT_EXTENSIONS: [&str; 8] = ["txt", "md", "markdown", "html", "htm", "csv", "json", "log"];

/// A loaded document ready for chunking.
#[derive(Debug, Clone)]
pub struct Document {
    pub source: String,
    pub text: String,
}

/// Load every source in order. A URL is snapshotted into `paths.data_dir`
/// and the whole data directory is then swept, so pre-existing corpus files
/// join the run alongside the fetched page. File paths expand to their
/// containing directory. Documents are deduplicated by source.
pub async fn load_sources(paths: &AppPaths, sources: &[String]) -> Result<Vec<Document>, AppError> {
    let mut documents = Vec::new();
    let mut seen = HashSet::new();

    for (i, source) in sources.iter().enumerate() {
        if source.starts_with("http://") || source.starts_with("https://") {
            snapshot_url(paths, source, i).await?;
            push_unique(&mut documents, &mut seen, read_directory(&paths.data_dir)?);
        } else {
            let path = Path::new(source);
            let dir = if path.is_dir() {
                path
            } else {
                path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."))
            };
            push_unique(&mut documents, &mut seen, read_directory(dir)?);
        }
    }

    Ok(documents)
}

fn push_unique(documents: &mut Vec<Document>, seen: &mut HashSet<String>, batch: Vec<Document>) {
    for doc in batch {
        if seen.insert(doc.source.clone()) {
            documents.push(doc);
        }
    }
}

/// Read all text documents under a directory (non-recursive entries first,
/// then subdirectories, in walk order).
pub fn read_directory(dir: &Path) -> Result<Vec<Document>, AppError> {
    if !dir.exists() {
        return Err(AppError::BadRequest(format!(
            "source directory does not exist: {}",
            dir.display()
        )));
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(AppError::internal)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !is_text_file(path) {
            continue;
        }

        match fs::read_to_string(path) {
            Ok(raw) => {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
                let text = if ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm") {
                    strip_html_tags(&raw)
                } else {
                    raw
                };
                if !text.trim().is_empty() {
                    documents.push(Document {
                        source: path.display().to_string(),
                        text,
                    });
                }
            }
            Err(err) => {
                tracing::warn!("skipping unreadable file {}: {}", path.display(), err);
            }
        }
    }

    Ok(documents)
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            TEXT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Fetch a URL, strip it to readable text, and persist the snapshot under
/// the data directory as `website_content_<n>.txt`.
async fn snapshot_url(paths: &AppPaths, url: &str, ordinal: usize) -> Result<(), AppError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .map_err(AppError::internal)?;

    let response = client.get(url).send().await.map_err(AppError::provider)?;
    if !response.status().is_success() {
        return Err(AppError::BadRequest(format!(
            "fetch of {} failed with status {}",
            url,
            response.status()
        )));
    }
    let body = response.text().await.map_err(AppError::provider)?;
    let text = strip_html_tags(&body);

    let snapshot_path = paths
        .data_dir
        .join(format!("website_content_{}.txt", ordinal));
    fs::create_dir_all(&paths.data_dir)?;
    fs::write(&snapshot_path, &text)?;
    tracing::info!("saved snapshot of {} to {}", url, snapshot_path.display());

    Ok(())
}

/// Reduce an HTML page to its visible text, dropping script and style
/// blocks along with the tags themselves.
pub fn strip_html_tags(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    let mut in_script = false;
    let mut in_style = false;

    let chars: Vec<char> = html.chars().collect();
    let chars_lower: Vec<char> = html.to_lowercase().chars().collect();

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        if i + 7 < chars.len() {
            let tag: String = chars_lower[i..i + 7].iter().collect();
            if tag == "<script" {
                in_script = true;
            } else if i + 6 < chars.len()
                && chars_lower[i..i + 6].iter().collect::<String>() == "<style"
            {
                in_style = true;
            }
        }

        if in_script && i + 9 <= chars.len() {
            let tag: String = chars_lower[i..i + 9].iter().collect();
            if tag == "</script>" {
                in_script = false;
                i += 9;
                continue;
            }
        }
        if in_style && i + 8 <= chars.len() {
            let tag: String = chars_lower[i..i + 8].iter().collect();
            if tag == "</style>" {
                in_style = false;
                i += 8;
                continue;
            }
        }

        if in_script || in_style {
            i += 1;
            continue;
        }

        if c == '<' {
            in_tag = true;
        } else if c == '>' {
            in_tag = false;
        } else if !in_tag {
            result.push(c);
        }

        i += 1;
    }

    let lines: Vec<&str> = result
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn html_stripping_drops_scripts_and_tags() {
        let html = r#"
            <html>
            <head><script>var x = 1;</script><style>body { color: red; }</style></head>
            <body>
                <h1>Hello</h1>
                <p>World</p>
            </body>
            </html>
        "#;

        let text = strip_html_tags(html);
        assert!(text.contains("Hello"));
        assert!(text.contains("World"));
        assert!(!text.contains('<'));
        assert!(!text.contains("var x"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn read_directory_picks_up_text_files_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha document").unwrap();
        fs::write(dir.path().join("b.md"), "# beta").unwrap();
        fs::write(dir.path().join("c.bin"), [0u8, 159, 146, 150]).unwrap();
        fs::write(dir.path().join("d.html"), "<p>gamma</p>").unwrap();

        let mut docs = read_directory(dir.path()).unwrap();
        docs.sort_by(|a, b| a.source.cmp(&b.source));

        assert_eq!(docs.len(), 3);
        assert!(docs.iter().any(|d| d.text.contains("alpha")));
        assert!(docs.iter().any(|d| d.text.contains("beta")));
        assert!(docs.iter().any(|d| d.text == "gamma"));
    }

    #[tokio::test]
    async fn overlapping_path_sources_are_deduplicated() {
        let data = tempfile::tempdir().unwrap();
        let paths = AppPaths::with_data_dir(data.path().to_path_buf());

        let corpus = tempfile::tempdir().unwrap();
        fs::write(corpus.path().join("a.txt"), "alpha").unwrap();
        fs::write(corpus.path().join("b.txt"), "beta").unwrap();

        // Two files from the same directory both expand to that directory.
        let sources = vec![
            corpus.path().join("a.txt").display().to_string(),
            corpus.path().join("b.txt").display().to_string(),
        ];
        let docs = load_sources(&paths, &sources).await.unwrap();

        assert_eq!(docs.len(), 2);
        let mut seen_sources: Vec<_> = docs.iter().map(|d| d.source.clone()).collect();
        seen_sources.sort();
        seen_sources.dedup();
        assert_eq!(seen_sources.len(), 2);
    }

    #[test]
    fn read_directory_rejects_missing_dir() {
        let err = read_directory(&PathBuf::from("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
