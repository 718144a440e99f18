use std::{borrow::Cow, path::Path};

use anyhow::{bail, Context};
use log::{debug, error, info, warn};
use serde_json::Value;

use crate::{context::IndexContext, metadata::PostRecord, store};

pub(crate) mod front_matter;
pub(crate) mod utils;

use front_matter::FrontMatterError;

/// Reads every `.md` file directly under `posts_dir` and turns its
/// front-matter into a record. Files without usable front-matter are logged
/// and left out; I/O failures abort.
pub(crate) fn collect_posts(posts_dir: &Path) -> anyhow::Result<Vec<PostRecord>> {
    let mut entries = std::fs::read_dir(posts_dir)
        .with_context(|| format!("while scanning {:?}", posts_dir))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("while scanning {:?}", posts_dir))?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut posts = vec![];
    for entry in entries {
        let path = entry.path();
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            if file_name.to_string_lossy().ends_with(".md") {
                warn!("file name {:?} is not valid UTF-8. skipping...", file_name);
            }
            continue;
        };
        let Some(stem) = file_name.strip_suffix(".md") else {
            continue;
        };
        if !path.is_file() {
            debug!("{:?} is not a regular file. skipping...", path);
            continue;
        }

        let bytes = std::fs::read(&path).with_context(|| format!("while reading {:?}", path))?;
        let content = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = content {
            warn!("{file_name} is not valid UTF-8. invalid bytes are replaced with U+FFFD.");
        }
        match front_matter::parse(&content) {
            Ok(front_matter) => {
                debug!("{file_name}: {} keys", front_matter.len());
                let record = PostRecord::new(stem, front_matter);
                if record.file() != Some(stem) {
                    let file = record
                        .fields()
                        .get("file")
                        .map(Value::to_string)
                        .unwrap_or_default();
                    warn!("`file: {file}` in the front-matter of {file_name} overrides `{stem}`.");
                }
                posts.push(record);
            }
            Err(FrontMatterError::Missing) => {
                warn!("can't find meta info in the file {file_name}. skipping...");
            }
            Err(e) => {
                error!("can't parse meta info in the file {file_name}: {e}. skipping...");
            }
        }
    }

    Ok(posts)
}

/// Rebuilds the whole index and returns the number of records written.
pub(crate) fn build_index(ctx: &IndexContext) -> anyhow::Result<usize> {
    if !ctx.posts_dir.is_dir() {
        bail!("posts directory {:?} must be a directory.", ctx.posts_dir);
    }

    let mut posts = collect_posts(&ctx.posts_dir)?;
    info!("collected {} posts from {:?}", posts.len(), ctx.posts_dir);
    utils::sort_posts(&mut posts);

    store::save_index(&ctx.index_path, &posts)
        .with_context(|| format!("while writing {:?}", ctx.index_path))?;

    Ok(posts.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn one_record_per_well_formed_file() {
        let dir = tempdir().unwrap();
        for i in 0..5 {
            write(
                dir.path(),
                &format!("post{i}.md"),
                &format!("---\ntitle: Post {i}\ntime: 2024-1-{}\n---\nbody\n", i + 1),
            );
        }

        let posts = collect_posts(dir.path()).unwrap();
        assert_eq!(posts.len(), 5);
        assert_eq!(posts[0].file(), Some("post0"));
    }

    #[test]
    fn skips_files_without_usable_front_matter() {
        let dir = tempdir().unwrap();
        write(dir.path(), "good.md", "---\ntitle: Good\n---\n");
        write(dir.path(), "bare.md", "# no front-matter\n");
        write(dir.path(), "broken.md", "---\ntitle: [oops\n---\n");
        write(dir.path(), "notes.txt", "---\ntitle: Not markdown\n---\n");
        fs::create_dir(dir.path().join("drafts.md")).unwrap();

        let posts = collect_posts(dir.path()).unwrap();
        let files: Vec<_> = posts.iter().map(|p| p.file().unwrap()).collect();
        assert_eq!(files, vec!["good"]);
    }

    #[test]
    fn non_utf8_file_does_not_abort_the_scan() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.md", "---\ntitle: A\n---\n");
        // Shift_JIS body
        fs::write(dir.path().join("sjis.md"), b"---\ntitle: \x93\xfa\x96\x7b\n---\n").unwrap();
        fs::write(dir.path().join("garbage.md"), b"\xff\xfe\x00binary").unwrap();

        let posts = collect_posts(dir.path()).unwrap();
        let files: Vec<_> = posts.iter().map(|p| p.file().unwrap()).collect();
        assert_eq!(files, vec!["a", "sjis"]);
        let title = posts[1].fields().get("title").and_then(Value::as_str).unwrap();
        assert!(title.contains('\u{FFFD}'));
    }

    #[test]
    fn front_matter_file_key_wins() {
        let dir = tempdir().unwrap();
        write(dir.path(), "hello.md", "---\nfile: renamed\ntitle: Hi\n---\n");

        let posts = collect_posts(dir.path()).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].file(), Some("renamed"));
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = tempdir().unwrap();
        assert!(collect_posts(&dir.path().join("nope")).is_err());

        let ctx = IndexContext {
            posts_dir: dir.path().join("nope"),
            index_path: dir.path().join("posts.json"),
        };
        assert!(build_index(&ctx).is_err());
        assert!(!ctx.index_path.exists());
    }

    #[test]
    fn writes_sorted_index() {
        let dir = tempdir().unwrap();
        let posts_dir = dir.path().join("_posts");
        fs::create_dir(&posts_dir).unwrap();
        write(
            &posts_dir,
            "old.md",
            indoc! {"
                ---
                title: Old
                time: 2023-5-1
                category: [life]
                ---
                old body
            "},
        );
        write(
            &posts_dir,
            "new.md",
            indoc! {"
                ---
                title: New
                time: 2024-5-1
                category: []
                ---
            "},
        );
        write(
            &posts_dir,
            "pinned.md",
            indoc! {"
                ---
                title: Pinned
                time: 2020-1-1
                z-index: 10
                ---
            "},
        );
        write(&posts_dir, "readme.md", "nothing to see\n");

        let ctx = IndexContext {
            posts_dir,
            index_path: dir.path().join("posts.json"),
        };
        assert_eq!(build_index(&ctx).unwrap(), 3);

        let written: Value =
            serde_json::from_str(&fs::read_to_string(&ctx.index_path).unwrap()).unwrap();
        assert_eq!(
            written,
            json!([
                {"file": "pinned", "title": "Pinned", "time": "2020-1-1", "z-index": 10},
                {"file": "new", "title": "New", "time": "2024-5-1", "category": []},
                {"file": "old", "title": "Old", "time": "2023-5-1", "category": ["life"]}
            ])
        );
    }

    #[test]
    fn rebuild_overwrites_previous_index() {
        let dir = tempdir().unwrap();
        let posts_dir = dir.path().join("_posts");
        fs::create_dir(&posts_dir).unwrap();
        let index_path = dir.path().join("posts.json");
        fs::write(&index_path, "x".repeat(4096)).unwrap();

        let ctx = IndexContext {
            posts_dir,
            index_path,
        };
        assert_eq!(build_index(&ctx).unwrap(), 0);
        assert_eq!(fs::read_to_string(&ctx.index_path).unwrap(), "[]");
    }
}
