pub mod command;
pub mod render;

use std::{
	io::{self, Write},
	path::PathBuf,
	sync::Arc,
};

use clap::Parser;
use tokio::{
	io::{AsyncBufRead, AsyncBufReadExt, BufReader},
	task::JoinSet,
};
use tracing_subscriber::EnvFilter;

use anteater_client::SearchClient;
use anteater_session::{Outcome, SearchSession};

use crate::command::{Command, HELP};

#[derive(Debug, Parser)]
#[command(
	version = anteater_cli::VERSION,
	rename_all = "kebab",
	styles = anteater_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Search for this text before reading commands.
	#[arg(long, short = 'q', value_name = "TEXT")]
	pub query: Option<String>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = anteater_config::load(&args.config)?;
	init_tracing(&config)?;
	let client = SearchClient::new(&config.service)?;
	let session = SearchSession::new(Arc::new(client), &config.session);
	tracing::info!(
		base_url = %config.service.base_url,
		page_size = session.page_size(),
		"Search session ready."
	);

	drive(session, args.query, BufReader::new(tokio::io::stdin()), io::stdout()).await
}

/// Reads commands from `input` and renders the session to `out` after every transition.
///
/// Requests run as background tasks so the prompt stays responsive while they are in flight.
/// Returns on `quit`, or once `input` is exhausted and every request has settled.
pub async fn drive<R, W>(
	session: SearchSession,
	initial_query: Option<String>,
	input: R,
	mut out: W,
) -> color_eyre::Result<()>
where
	R: AsyncBufRead + Unpin,
	W: Write,
{
	let mut lines = input.lines();
	let mut tasks = JoinSet::new();
	let mut input_open = true;

	match initial_query {
		Some(query) => dispatch(&session, Command::Search(query), &mut tasks, &mut out)?,
		None => render::write_view(&mut out, &session.view())?,
	}

	loop {
		if !input_open && tasks.is_empty() {
			break;
		}

		tokio::select! {
			Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
				settle(&session, joined?, &mut out)?;
			},
			line = lines.next_line(), if input_open => {
				let Some(line) = line? else {
					input_open = false;

					continue;
				};

				match Command::parse(&line) {
					Ok(None) => {},
					Ok(Some(Command::Quit)) => break,
					Ok(Some(Command::Wait)) => {
						while let Some(joined) = tasks.join_next().await {
							settle(&session, joined?, &mut out)?;
						}
					},
					Ok(Some(Command::Help)) => writeln!(out, "{HELP}")?,
					Ok(Some(command)) => dispatch(&session, command, &mut tasks, &mut out)?,
					Err(err) => writeln!(out, "{err}")?,
				}
			},
		}
	}

	Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Action {
	Search,
	More,
	Summary(usize),
}

fn dispatch(
	session: &SearchSession,
	command: Command,
	tasks: &mut JoinSet<(Action, Outcome)>,
	out: &mut impl Write,
) -> io::Result<()> {
	match command {
		Command::Search(query) => {
			if query.trim().is_empty() {
				return writeln!(out, "Enter some text to search for.");
			}

			writeln!(out, "Searching for \"{}\"...", query.trim())?;

			let session = session.clone();

			tasks.spawn(async move { (Action::Search, session.submit_search(&query).await) });
		},
		Command::More => {
			let session = session.clone();

			tasks.spawn(async move { (Action::More, session.load_more().await) });
		},
		Command::Expand(position) => match session.toggle_expand(position - 1) {
			Some(true) => {
				render::write_view(out, &session.view())?;
				spawn_summary(session, position - 1, tasks);
			},
			Some(false) => render::write_view(out, &session.view())?,
			None => writeln!(out, "There is no result #{position}.")?,
		},
		Command::Summary(position) => {
			let index = position - 1;
			let collapsed = {
				let state = session.snapshot();

				state.store().get(index).is_some() && !state.store().is_expanded(index)
			};

			// Details render only for expanded entries.
			if collapsed {
				session.toggle_expand(index);
				render::write_view(out, &session.view())?;
			}

			spawn_summary(session, index, tasks);
		},
		Command::Wait | Command::Help | Command::Quit => {},
	}

	Ok(())
}

fn spawn_summary(session: &SearchSession, index: usize, tasks: &mut JoinSet<(Action, Outcome)>) {
	let session = session.clone();

	tasks.spawn(async move { (Action::Summary(index), session.ensure_summary_at(index).await) });
}

fn settle(
	session: &SearchSession,
	(action, outcome): (Action, Outcome),
	out: &mut impl Write,
) -> io::Result<()> {
	tracing::debug!(?action, ?outcome, "Request settled.");

	match (outcome, action) {
		(Outcome::Applied | Outcome::Failed, _) => render::write_view(out, &session.view()),
		(Outcome::Ignored, Action::More) => {
			let state = session.snapshot();

			if state.is_searching() || state.is_paginating() {
				writeln!(out, "Still loading. Try `more` again once results arrive.")
			} else {
				writeln!(out, "No more results to load.")
			}
		},
		(Outcome::Ignored, Action::Summary(index)) => {
			if session.snapshot().store().get(index).is_none() {
				writeln!(out, "There is no result #{}.", index + 1)
			} else {
				Ok(())
			}
		},
		(Outcome::Ignored, Action::Search) | (Outcome::Discarded, _) => Ok(()),
	}
}

fn init_tracing(config: &anteater_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
	Ok(())
}
