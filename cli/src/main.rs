//! Rise CLI - binary entry point.
//!
//! # Architecture
//!
//! The CLI is a line-oriented host screen for [`rise_engine`] flows, talking
//! to the Rise API through [`rise_engine::rise_providers::ApiClient`].
//!
//! ```text
//! main() -> command -> FlowController<GoalPlanFlow> -> Screen::PlanReview
//!                                                          |
//!                                                          v
//!                      FlowController<PlanReviewFlow> -> Screen::Success
//! ```
//!
//! # Event Loop
//!
//! Each flow runs on a fixed 50ms frame cadence:
//!
//! 1. Wait for frame tick
//! 2. Apply a finished submission, if any (`flow.poll()`)
//! 3. Drain input lines (non-blocking via [`input::LinePump`])
//! 4. Print pending toasts
//! 5. Check whether the flow exited or navigated

mod host;
mod input;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::{
    env,
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use rise_config::RiseConfig;
use rise_engine::rise_providers::{ApiClient, ApiConfig};
use rise_engine::rise_types::{Credentials, MinimumHorizon};
use rise_engine::{
    FlowController, FlowServices, GoalPlanFlow, PlanReviewFlow, Screen, SignUpFlow,
    SystemClock, ToastQueue,
};

use host::{FlowExit, TerminalNavigator, run_flow};
use input::LinePump;

/// Terminal client for creating Rise plans and accounts.
#[derive(Debug, clap::Parser)]
#[clap(name = "rise", version, about)]
struct Arguments {
    /// Rise API base URL. Falls back to `[api] base_url` in
    /// ~/.rise/config.toml.
    #[clap(long, env = rise_config::API_URL_ENV, global = true)]
    api_url: Option<String>,

    #[clap(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, clap::Subcommand)]
enum CliCommand {
    /// Create a savings plan.
    Plan,
    /// Create an account.
    #[clap(name = "signup")]
    SignUp {
        #[clap(value_parser = parse_email)]
        email: String,
    },
    /// Show balances and plans.
    Balance,
}

fn parse_email(raw: &str) -> Result<String, String> {
    let email = raw.trim();
    if email.contains('@') {
        Ok(email.to_string())
    } else {
        Err(format!("{raw:?} is not an email address"))
    }
}

fn init_tracing(config: Option<&RiseConfig>) {
    let fallback = config.and_then(RiseConfig::log_filter).unwrap_or("info");
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_rise_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Without a log file, drop logs rather than interleave them with prompts.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_rise_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in rise_log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn rise_log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.rise/logs/rise.log
    if let Some(config_path) = RiseConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("rise.log"));
    }

    // Fallback: ./.rise/logs/rise.log
    candidates.push(PathBuf::from(".rise").join("logs").join("rise.log"));

    candidates
}

fn api_client(api_url: Option<String>, config: Option<&RiseConfig>) -> Result<ApiClient> {
    let base_url = api_url
        .filter(|url| !url.trim().is_empty())
        .or_else(|| config.and_then(RiseConfig::base_url))
        .ok_or_else(|| {
            anyhow!("no API base URL configured; pass --api-url or set [api] base_url")
        })?;
    let token = config
        .and_then(RiseConfig::token)
        .or_else(|| env::var(rise_config::API_TOKEN_ENV).ok());

    let mut api = ApiConfig::new(&base_url)?.with_token(token);
    if let Some(secs) = config.and_then(RiseConfig::timeout_secs) {
        api = api.with_timeout(Duration::from_secs(secs));
    }
    ApiClient::new(api).context("failed to build HTTP client")
}

fn horizon(config: Option<&RiseConfig>) -> MinimumHorizon {
    config
        .and_then(RiseConfig::minimum_horizon_years)
        .filter(|years| *years > 0)
        .map_or(MinimumHorizon::NextDay, MinimumHorizon::Years)
}

struct Session {
    services: FlowServices,
    navigator: Arc<TerminalNavigator>,
    toasts: Arc<ToastQueue>,
    input: LinePump,
}

impl Session {
    fn new(client: ApiClient) -> Result<Self> {
        let navigator = Arc::new(TerminalNavigator::default());
        let toasts = Arc::new(ToastQueue::new());
        let services = FlowServices {
            mutations: Arc::new(client),
            navigator: navigator.clone(),
            notifier: toasts.clone(),
            clock: Arc::new(SystemClock),
        };
        Ok(Self {
            services,
            navigator,
            toasts,
            input: LinePump::new()?,
        })
    }

    async fn run<F: rise_engine::FlowDefinition>(&mut self, definition: F) -> Result<FlowExit> {
        let mut flow = FlowController::new(definition, self.services.clone())?;
        run_flow(&mut flow, &mut self.input, &self.navigator, &self.toasts).await
    }
}

async fn create_plan(session: &mut Session, horizon: MinimumHorizon) -> Result<()> {
    println!("Create a plan. /help for commands.");
    let FlowExit::Navigated(Screen::PlanReview { draft, projection }) =
        session.run(GoalPlanFlow::with_horizon(horizon)).await?
    else {
        return Ok(());
    };

    let review = PlanReviewFlow::new(draft, projection);
    let summary = review.summary(session.services.clock.today());
    println!();
    println!("Review: {}", summary.plan_name);
    println!("  Estimated returns  ₦{}", summary.total_returns);
    println!("  Maturity           {}", summary.maturity_label);
    println!(
        "  Over {} month(s)   ₦{}/month returns, ₦{}/month invested",
        summary.months, summary.monthly_returns, summary.monthly_investment
    );

    if let FlowExit::Navigated(Screen::Success(prompt)) = session.run(review).await? {
        println!();
        println!("{}", prompt.title);
        println!("{}", prompt.subtitle);
        println!("[{}]", prompt.button);
    }
    Ok(())
}

async fn sign_up(session: &mut Session, email: String) -> Result<()> {
    println!("Password for {email}:");
    let Some(password) = session.input.next_line().await? else {
        return Ok(());
    };
    if password.trim().is_empty() {
        bail!("password must not be empty");
    }

    println!("Tell us more about you. /help for commands.");
    let credentials = Credentials { email, password };
    if let FlowExit::Navigated(Screen::Success(prompt)) =
        session.run(SignUpFlow::new(credentials)).await?
    {
        println!();
        println!("{}", prompt.title);
        println!("{}", prompt.subtitle);
        println!("[{}]", prompt.button);
    }
    Ok(())
}

async fn balance(client: &ApiClient) -> Result<()> {
    let account = client.session().await?;
    let plans = client.plans().await?;
    println!("Total balance  ₦{}", account.total_balance.round_dp(2));
    println!("Total returns  ₦{}", account.total_returns.round_dp(2));
    if plans.is_empty() {
        println!("No plans yet. Run `rise plan` to create one.");
    }
    for plan in plans {
        println!(
            "  {:<20} ₦{} of ₦{}  (matures {})",
            plan.plan_name,
            plan.invested_amount.round_dp(2),
            plan.target_amount.round_dp(2),
            plan.maturity_date
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let Arguments { api_url, command } = Arguments::parse();
    let (config, config_error) = match RiseConfig::load() {
        Ok(config) => (config, None),
        Err(err) => (None, Some(err)),
    };
    init_tracing(config.as_ref());
    if let Some(err) = config_error {
        eprintln!("Ignoring config: {err}");
    }

    let client = api_client(api_url, config.as_ref())?;
    tracing::info!(base_url = %client.config().base_url(), ?command, "Starting");

    match command {
        CliCommand::Plan => {
            let mut session = Session::new(client)?;
            create_plan(&mut session, horizon(config.as_ref())).await
        }
        CliCommand::SignUp { email } => {
            let mut session = Session::new(client)?;
            sign_up(&mut session, email).await
        }
        CliCommand::Balance => balance(&client).await,
    }
}
