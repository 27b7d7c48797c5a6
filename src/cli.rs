// src/cli.rs
use std::{env, fs, path::PathBuf};

use chrono::{Local, NaiveDate};
use color_eyre::eyre::{eyre, Result, WrapErr};

use crate::clipboard::SystemClipboard;
use crate::config::consts::COOKIE_ENV;
use crate::config::options::HarvestOptions;
use crate::harvest::{Browser, Harvester, HttpBrowser, Outcome, ThreadSleeper};
use crate::progress::{CompletionReport, Progress};
use crate::specs::page::scan_page;
use crate::store::{FileStateStore, StateStore};

const HELP: &str = "\
gem_scrape: harvest tournament match history into a portable payload

USAGE:
  gem_scrape harvest <url> [--out FILE] [--import-url URL] [--max-pages N] [--fresh] [--http]
  gem_scrape resume  [--out FILE] [--import-url URL] [--http]
  gem_scrape scan <file.html> [--date YYYY-MM-DD]
  gem_scrape status
  gem_scrape reset

The session cookie is read from the GEM_COOKIE environment variable.
A persisted harvest is resumed by `harvest` unless --fresh is given.
Pages are opened in headless Chrome; --http fetches plain markup instead,
which cannot open collapsed result sections.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Harvest { url: String },
    Resume,
    Scan { file: PathBuf, date: Option<NaiveDate> },
    Status,
    Reset,
    Help,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub opts: HarvestOptions,
}

pub fn run() -> Result<()> {
    let Args { command, mut opts } = parse_args(env::args().skip(1))?;
    if command == Command::Help {
        eprintln!("{HELP}");
        return Ok(());
    }

    crate::log::init(&opts.log_path()).wrap_err("could not open the debug log")?;
    opts.net.cookie = env::var(COOKIE_ENV).ok().filter(|c| !c.trim().is_empty());

    let mut store = FileStateStore::new(opts.state_path());
    match command {
        Command::Harvest { url } => {
            let persisted = if opts.fresh { None } else { store.load()? };
            if let Some(state) = persisted {
                eprintln!(
                    "Resuming a harvest in progress ({} matches, {} pages). Use --fresh to start over.",
                    state.matches.len(),
                    state.pages_scraped
                );
                harvest(&opts, &mut store, None)
            } else {
                opts.start_url = Some(url.clone());
                harvest(&opts, &mut store, Some(url.as_str()))
            }
        }
        Command::Resume => harvest(&opts, &mut store, None),
        Command::Scan { file, date } => {
            let html = fs::read_to_string(&file).wrap_err_with(|| format!("could not read {}", file.display()))?;
            let today = date.unwrap_or_else(|| Local::now().date_naive());
            let matches = scan_page(&html, today);
            println!("{}", serde_json::to_string_pretty(&matches)?);
            eprintln!("{} matches", matches.len());
            Ok(())
        }
        Command::Status => {
            match store.load()? {
                Some(state) => {
                    println!("Harvest in progress: {}", store.path().display());
                    println!("  pages scraped: {}", state.pages_scraped);
                    println!("  matches:       {}", state.matches.len());
                    println!("  next page:     {}", state.next_url.as_deref().unwrap_or("-"));
                }
                None => println!("No harvest in progress."),
            }
            Ok(())
        }
        Command::Reset => {
            store.clear()?;
            println!("Persisted harvest discarded.");
            Ok(())
        }
        Command::Help => Ok(()),
    }
}

/// Drive the harvest through every navigation until it finishes.
fn harvest(opts: &HarvestOptions, store: &mut FileStateStore, start: Option<&str>) -> Result<()> {
    let mut browser = open_browser(opts)?;
    let mut clipboard = SystemClipboard::default();
    let mut progress = TermProgress;
    let sleeper = ThreadSleeper;
    let mut h = Harvester {
        browser: &mut *browser,
        store,
        clipboard: &mut clipboard,
        progress: &mut progress,
        sleeper: &sleeper,
        opts,
        today: Local::now().date_naive(),
    };

    let mut outcome = match start {
        Some(url) => h.start(url),
        None => h.resume(),
    };
    while let Outcome::Navigated(_) = outcome {
        outcome = h.resume();
    }

    match outcome {
        Outcome::Done(report) => {
            println!("{}", report.import_url);
            Ok(())
        }
        Outcome::Failed(msg) => Err(eyre!("harvest failed: {msg}")),
        Outcome::NothingToResume => {
            eprintln!("Nothing to resume. Start one with `gem_scrape harvest <url>`.");
            Ok(())
        }
        Outcome::Navigated(_) => Ok(()),
    }
}

#[cfg(feature = "chrome")]
fn open_browser(opts: &HarvestOptions) -> Result<Box<dyn Browser>> {
    if opts.http_only {
        return Ok(Box::new(HttpBrowser::new(opts.net.clone())?));
    }
    let chrome = crate::harvest::ChromeBrowser::launch(&opts.net)
        .wrap_err("could not start headless Chrome (use --http to fetch without it)")?;
    Ok(Box::new(chrome))
}

#[cfg(not(feature = "chrome"))]
fn open_browser(opts: &HarvestOptions) -> Result<Box<dyn Browser>> {
    Ok(Box::new(HttpBrowser::new(opts.net.clone())?))
}

struct TermProgress;

impl Progress for TermProgress {
    fn status(&mut self, status: &str, detail: &str, match_count: usize) {
        eprintln!("[{status:>10}] {detail} ({match_count} matches)");
    }

    fn complete(&mut self, r: &CompletionReport) {
        eprintln!("Collected {} matches from {} pages.", r.match_count, r.pages_scraped);
        if r.clipboard_ok {
            eprintln!("The full list is on the clipboard.");
        } else {
            eprintln!("Clipboard unavailable; use --out to keep a copy on disk.");
        }
        if !r.import_url.contains('#') {
            eprintln!("Too large for a link; paste the clipboard into the import page instead.");
        }
    }

    fn failed(&mut self, message: &str) {
        eprintln!("Harvest failed: {message}");
    }
}

pub fn parse_args<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut opts = HarvestOptions::default();
    let mut args = args.into_iter();

    let Some(sub) = args.next() else {
        return Ok(Args { command: Command::Help, opts });
    };
    let mut positional: Option<String> = None;
    let mut date = None;

    while let Some(a) = args.next() {
        match a.as_str() {
            "-o" | "--out" => opts.out = Some(PathBuf::from(args.next().ok_or_else(|| eyre!("Missing output path"))?)),
            "--import-url" => {
                let v = args.next().ok_or_else(|| eyre!("Missing value for --import-url"))?;
                url::Url::parse(&v).wrap_err_with(|| format!("Invalid import URL: {v}"))?;
                opts.import_url = v;
            }
            "--max-pages" => {
                let v: u32 = args.next().ok_or_else(|| eyre!("Missing value for --max-pages"))?.parse()?;
                if v == 0 {
                    return Err(eyre!("--max-pages must be at least 1"));
                }
                opts.max_pages = v;
            }
            "--fresh" => opts.fresh = true,
            "--http" => opts.http_only = true,
            "--date" => {
                let v = args.next().ok_or_else(|| eyre!("Missing value for --date"))?;
                date = Some(NaiveDate::parse_from_str(&v, "%Y-%m-%d").wrap_err_with(|| format!("Invalid date: {v}"))?);
            }
            "--store" => opts.store_dir = PathBuf::from(args.next().ok_or_else(|| eyre!("Missing store directory"))?),
            "-h" | "--help" => return Ok(Args { command: Command::Help, opts }),
            s if s.starts_with('-') => return Err(eyre!("Unknown arg: {a}")),
            _ if positional.is_none() => positional = Some(a.clone()),
            _ => return Err(eyre!("Unexpected argument: {a}")),
        }
    }

    let command = match sub.as_str() {
        "harvest" => Command::Harvest { url: positional.ok_or_else(|| eyre!("Missing start URL for harvest"))? },
        "resume" => Command::Resume,
        "scan" => Command::Scan {
            file: PathBuf::from(positional.ok_or_else(|| eyre!("Missing HTML file for scan"))?),
            date,
        },
        "status" => Command::Status,
        "reset" => Command::Reset,
        "help" | "-h" | "--help" => Command::Help,
        other => return Err(eyre!("Unknown command: {other}")),
    };
    if let Command::Harvest { url } = &command {
        url::Url::parse(url).wrap_err_with(|| format!("Invalid start URL: {url}"))?;
    }
    Ok(Args { command, opts })
}
