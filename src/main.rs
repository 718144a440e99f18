use std::path::PathBuf;

use anyhow::bail;
use clap::{command, Arg, ArgMatches, Command};
use context::{IndexContext, ScaffoldContext, DEFAULT_POSTS_DIR, DEFAULT_POSTS_JSON};

mod context;
mod indexer;
mod metadata;
mod scaffold;
mod store;

fn posts_dir_arg() -> Arg {
    Arg::new("posts_dir")
        .long("posts-dir")
        .help("Directory path of markdown posts")
        .value_parser(clap::value_parser!(PathBuf))
        .default_value(DEFAULT_POSTS_DIR)
}

fn cli() -> Command {
    command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands([
            Command::new("index")
                .about("Rebuild the post index from the front-matter of every post")
                .args(&[
                    posts_dir_arg(),
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Path of the index. Existing contents will be replaced.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .default_value(DEFAULT_POSTS_JSON),
                ]),
            Command::new("new")
                .about("Create a new post and add it to the posts list")
                .args(&[
                    Arg::new("name")
                        .help("Name of the post. Characters other than [A-Za-z0-9_-] are dropped."),
                    posts_dir_arg(),
                    Arg::new("list")
                        .long("list")
                        .help("Path of the posts list")
                        .value_parser(clap::value_parser!(PathBuf))
                        .default_value(DEFAULT_POSTS_JSON),
                    Arg::new("template")
                        .long("template")
                        .help("Handlebars template of a new post. Receives `title`, `time` and `date`.")
                        .value_parser(clap::value_parser!(PathBuf)),
                ]),
        ])
}

fn index(matches: &ArgMatches) -> anyhow::Result<()> {
    let ctx = IndexContext::from_matches(matches)?;
    let count = indexer::build_index(&ctx)?;
    println!(
        "Successfully updated {}, total {} posts",
        ctx.index_path.display(),
        count
    );

    Ok(())
}

fn new_post(matches: &ArgMatches) -> anyhow::Result<()> {
    let ctx = ScaffoldContext::from_matches(matches)?;
    let name = matches
        .get_one::<String>("name")
        .map(String::as_str)
        .unwrap_or_default();
    let today = chrono::Local::now().date_naive();

    let created = scaffold::scaffold(&ctx, name, today)?;
    if created.list_updated {
        println!(
            "Created {} and updated {}",
            created.post_path.display(),
            ctx.list_path.display()
        );
    } else {
        println!(
            "Created {} ({} is already listed in {})",
            created.post_path.display(),
            created.name,
            ctx.list_path.display()
        );
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // usage errors exit with 1 like every other failure
    let matches = match cli().try_get_matches() {
        Ok(matches) => matches,
        Err(e) if e.use_stderr() => {
            e.print().ok();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    match matches.subcommand() {
        Some(("index", sub_matches)) => index(sub_matches),
        Some(("new", sub_matches)) => new_post(sub_matches),
        _ => bail!("unknown subcommand"),
    }
}
