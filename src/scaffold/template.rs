use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use handlebars::Handlebars;
use serde::Serialize;

pub(super) const TEMPLATE_NAME: &str = "post";

const DEFAULT_TEMPLATE: &str = "---
title: {{title}}
time: {{time}}
category: []
---
";

#[derive(Serialize, Debug)]
pub(super) struct PostTemplateData<'a> {
    pub title: &'a str,
    /// `2024-3-5`, as written into new posts by default.
    pub time: String,
    /// `2024-03-05`, for templates that want a padded date.
    pub date: String,
}

impl<'a> PostTemplateData<'a> {
    pub fn new(title: &'a str, today: NaiveDate) -> Self {
        Self {
            title,
            time: today.format("%Y-%-m-%-d").to_string(),
            date: today.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Front-matter is YAML, not HTML: nothing is escaped, and a template that
/// names an unknown variable fails instead of rendering a blank.
pub(super) fn generate_renderer(template_path: Option<&Path>) -> anyhow::Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);
    match template_path {
        Some(path) => handlebars
            .register_template_file(TEMPLATE_NAME, path)
            .with_context(|| format!("while loading template {:?}", path))?,
        None => handlebars
            .register_template_string(TEMPLATE_NAME, DEFAULT_TEMPLATE)
            .context("default template")?,
    }

    Ok(handlebars)
}
