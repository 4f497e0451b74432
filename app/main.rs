use std::{
    fs::read_to_string,
    io::{stdin, Read},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use wikivault::{error::StoreError, page::Page, store::Repository};

#[derive(Parser, Debug)]
#[clap(about = "A version-controlled wiki page store")]
struct Arguments {
    #[arg(long, default_value = ".", help = "path of the wiki repository")]
    repo: PathBuf,
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[clap(about = "initialize a wiki repository")]
    Init,
    #[clap(about = "list the pages in the current snapshot")]
    List,
    #[clap(about = "print a page's raw content")]
    Show { page: String },
    #[clap(about = "print a page rendered to HTML with links resolved")]
    Render { page: String },
    #[clap(about = "save a new revision of a page")]
    Edit {
        page: String,
        #[arg(short, long, help = "read content from this file instead of stdin")]
        file: Option<PathBuf>,
    },
    #[clap(about = "remove a page in a new revision")]
    Destroy { page: String },
    #[clap(about = "show the revision history, newest first")]
    Log,
}

fn main() -> Result<(), StoreError> {
    env_logger::init();
    let args = Arguments::parse();

    if let Command::Init = args.cmd {
        let repo = Repository::init(&args.repo)?;
        println!("initialized wiki repository in {:?}", repo.root());
        return Ok(());
    }

    let repo = Repository::open(&args.repo)?;
    match args.cmd {
        Command::Init => unreachable!("handled above"),
        Command::List => {
            for name in repo.current_entries()? {
                println!("{}", name);
            }
        }
        Command::Show { page } => {
            print!("{}", Page::new(&repo, page).raw_content()?);
        }
        Command::Render { page } => {
            print!("{}", Page::new(&repo, page).rendered_body()?);
        }
        Command::Edit { page, file } => {
            let content = match file {
                Some(path) => read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            Page::new(&repo, page).set_content(&content)?;
        }
        Command::Destroy { page } => {
            Page::new(&repo, page).destroy()?;
        }
        Command::Log => {
            for (id, message) in repo.history()? {
                println!("{} {}", id, message);
            }
        }
    }
    Ok(())
}
