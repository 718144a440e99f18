use std::{
    fs::OpenOptions,
    io::{ErrorKind, Write},
    path::PathBuf,
};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use log::{debug, info};

use crate::{context::ScaffoldContext, store};

mod template;

use template::{generate_renderer, PostTemplateData, TEMPLATE_NAME};

#[derive(Debug)]
pub(crate) struct Scaffolded {
    pub name: String,
    pub post_path: PathBuf,
    pub list_updated: bool,
}

/// Keeps ASCII letters, digits, `-` and `_`.
pub(crate) fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Creates `<posts_dir>/<name>.md` from the template and records the name at
/// the front of the posts list. An existing post is never overwritten.
pub(crate) fn scaffold(
    ctx: &ScaffoldContext,
    raw_name: &str,
    today: NaiveDate,
) -> anyhow::Result<Scaffolded> {
    let name = sanitize_name(raw_name);
    if name.is_empty() {
        bail!("Please provide a post name as the first argument, e.g. postdex new post_new");
    }

    let handlebars = generate_renderer(ctx.template_path.as_deref())?;
    let content = handlebars
        .render(TEMPLATE_NAME, &PostTemplateData::new(&name, today))
        .context("while rendering the post template")?;
    // read before anything is created so an unusable list leaves no new post behind
    let names = store::load_post_list(&ctx.list_path)
        .with_context(|| format!("while reading {:?}", ctx.list_path))?;

    if !ctx.posts_dir.exists() {
        info!("creating {:?}", ctx.posts_dir);
        fs_extra::dir::create_all(&ctx.posts_dir, false)
            .with_context(|| format!("while creating {:?}", ctx.posts_dir))?;
    }

    let post_path = ctx.posts_dir.join(format!("{name}.md"));
    let mut fd = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&post_path)
    {
        Ok(fd) => fd,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            bail!("File {} already exists.", post_path.display())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("while creating {:?}", post_path));
        }
    };
    fd.write_all(content.as_bytes())
        .with_context(|| format!("while writing {:?}", post_path))?;
    debug!("wrote {} bytes to {:?}", content.len(), post_path);

    let list_updated = register_name(ctx, names, &name)?;

    Ok(Scaffolded {
        name,
        post_path,
        list_updated,
    })
}

fn register_name(
    ctx: &ScaffoldContext,
    mut names: Vec<String>,
    name: &str,
) -> anyhow::Result<bool> {
    if names.iter().any(|n| n == name) {
        info!("{name} is already listed in {:?}", ctx.list_path);
        return Ok(false);
    }

    names.insert(0, name.to_string());
    store::save_post_list(&ctx.list_path, &names)
        .with_context(|| format!("while writing {:?}", ctx.list_path))?;

    Ok(true)
}
