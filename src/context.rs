use std::path::PathBuf;

use anyhow::Context as _;
use clap::ArgMatches;

pub(crate) const DEFAULT_POSTS_DIR: &str = "public/_posts";
pub(crate) const DEFAULT_POSTS_JSON: &str = "public/posts.json";

#[derive(Debug, Clone)]
pub(crate) struct IndexContext {
    pub posts_dir: PathBuf,
    pub index_path: PathBuf,
}

#[derive(Debug, Clone)]
pub(crate) struct ScaffoldContext {
    pub posts_dir: PathBuf,
    pub list_path: PathBuf,
    pub template_path: Option<PathBuf>,
}

impl IndexContext {
    pub fn from_matches(matches: &ArgMatches) -> anyhow::Result<Self> {
        Ok(Self {
            posts_dir: path_arg(matches, "posts_dir")?,
            index_path: path_arg(matches, "output")?,
        })
    }
}

impl ScaffoldContext {
    pub fn from_matches(matches: &ArgMatches) -> anyhow::Result<Self> {
        Ok(Self {
            posts_dir: path_arg(matches, "posts_dir")?,
            list_path: path_arg(matches, "list")?,
            template_path: matches.get_one::<PathBuf>("template").cloned(),
        })
    }
}

fn path_arg(matches: &ArgMatches, id: &str) -> anyhow::Result<PathBuf> {
    matches
        .get_one::<PathBuf>(id)
        .cloned()
        .with_context(|| format!("{id} is not set"))
}
