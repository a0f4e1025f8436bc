use clap::{Parser, Subcommand};
use log::error;
use voter_dash::commands::{run_page, run_serve, run_watch};
use voter_dash::config::Config;
use voter_dash::dashboard::{FilterState, NotYetFilter, SurveyFilter, TransferFilter, VotingFilter, PAGE_SIZE};

#[derive(Parser)]
#[clap(name = "voter-dash", about = "Voter turnout dashboard")]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the read-only voter listing endpoint.
    Serve,
    /// Poll the listing endpoint and print the dashboard as it changes.
    Watch {
        /// Only this booth (also narrows the summary)
        #[clap(long)]
        booth: Option<String>,
        /// done | not_done
        #[clap(long)]
        voting: Option<VotingFilter>,
        /// done | not_done
        #[clap(long)]
        survey: Option<SurveyFilter>,
        /// yes | no
        #[clap(long)]
        transfer: Option<TransferFilter>,
        /// pending: transferred but not yet voted
        #[clap(long)]
        not_yet: Option<NotYetFilter>,
        /// Page of the filtered list to show
        #[clap(long, default_value = "1")]
        page: u32,
        /// Print each view as JSON
        #[clap(long)]
        json: bool,
    },
    /// Fetch one server-paginated page, optionally searched.
    Page {
        #[clap(long, default_value = "1")]
        page: u32,
        #[clap(long, default_value_t = PAGE_SIZE)]
        limit: u32,
        /// Case-insensitive substring over name, card number, mobile, address and booth
        #[clap(long)]
        search: Option<String>,
        #[clap(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    // Initialize logging
    env_logger::init();

    let opts = Opts::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    let result = match opts.command {
        Command::Serve => run_serve(&config).await,
        Command::Watch {
            booth,
            voting,
            survey,
            transfer,
            not_yet,
            page,
            json,
        } => {
            let filters = FilterState {
                booth_id: booth,
                voting,
                survey,
                transfer,
                not_yet,
            };
            run_watch(&config, filters, page, json).await
        }
        Command::Page {
            page,
            limit,
            search,
            json,
        } => run_page(&config, page, limit, search.as_deref(), json).await,
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
