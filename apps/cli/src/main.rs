use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    config::load_settings,
    table::{SortColumn, SortDirection, TableState, TablePage},
    ChainOutcome, FilmSession, SwapiClient,
};
use shared::domain::{EpisodeId, Film};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "holonet_cli", about = "Query Star Wars films from the terminal")]
struct Cli {
    /// Overrides the configured API base URL.
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists films in release order.
    List,
    /// Prints a film's crawl and one page of its characters.
    Film {
        episode: u32,
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        #[arg(long, requires = "sort")]
        desc: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Name,
    Gender,
    Height,
}

impl From<SortArg> for SortColumn {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortColumn::Name,
            SortArg::Gender => SortColumn::Gender,
            SortArg::Height => SortColumn::Height,
        }
    }
}

fn format_film_line(film: &Film) -> String {
    format!(
        "Episode {:<3} {:<28} {}",
        film.episode_id.0, film.title, film.release_date
    )
}

fn render_page(page: &TablePage<'_>) -> Vec<String> {
    let mut lines = vec![format!(
        "{:<28} {:<14} {:>11}",
        SortColumn::Name.header(),
        SortColumn::Gender.header(),
        SortColumn::Height.header()
    )];
    lines.extend(
        page.rows
            .iter()
            .map(|c| format!("{:<28} {:<14} {:>11}", c.name, c.gender, c.height)),
    );
    lines.push(page.aggregate().footer_text());
    lines.push(format!(
        "Page {} of {} ({} rows)",
        page.page_index + 1,
        page.page_count,
        page.matching_rows
    ));
    lines
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Command::Film {
        page_size: Some(page_size),
        ..
    } = &cli.command
    {
        settings.page_size = *page_size;
    }
    settings.validate().context("invalid settings")?;

    let client = SwapiClient::new(&settings.api_url).context("failed to build api client")?;
    let session = FilmSession::new(client);
    session.load_films().await.context("failed to load films")?;

    match cli.command {
        Command::List => {
            for film in session.snapshot().await.films() {
                println!("{}", format_film_line(film));
            }
        }
        Command::Film {
            episode,
            page,
            gender,
            search,
            sort,
            desc,
            ..
        } => {
            match session.select_film(EpisodeId(episode)).await {
                ChainOutcome::Loaded { .. } => {}
                ChainOutcome::Failed(failure) => bail!(failure),
                ChainOutcome::UnknownFilm(episode) => bail!("no film with episode {episode}"),
                ChainOutcome::Superseded { generation } => {
                    bail!("selection {} was superseded", generation.0)
                }
            }
            let state = session.snapshot().await;
            let Some(film) = state.detail() else {
                bail!("film detail missing after load");
            };

            let mut table = TableState::new(settings.page_size);
            if let Some(search) = search {
                table.set_global_filter(search);
            }
            if let Some(gender) = gender {
                table.set_gender_filter(gender);
            }
            let direction = if desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            table.set_sort(sort.map(|column| (column.into(), direction)));
            table.set_page_index(page.saturating_sub(1));

            println!("Episode {}", film.episode_id);
            println!("{}", film.title);
            println!();
            println!("{}", film.opening_crawl.replace("\r\n", "\n"));
            println!();
            for line in render_page(&table.page(state.characters())) {
                println!("{line}");
            }
        }
    }

    Ok(())
}
